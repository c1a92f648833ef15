use crate::{Dispatch, MemberInfo, MemberKind, ObjectRef};

/// Decides whether calls to a member can be intercepted by a fake.
///
/// Returns the reason as `Err` when they cannot.
pub trait Interceptor: Send + Sync {
    fn check(&self, member: &MemberInfo, target: Option<&ObjectRef>) -> Result<(), String>;
}

/// Only virtual instance members declared by the target's type can be
/// intercepted.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultInterceptor;

impl Interceptor for DefaultInterceptor {
    fn check(&self, member: &MemberInfo, target: Option<&ObjectRef>) -> Result<(), String> {
        if member.kind() == MemberKind::Constructor {
            return Err("constructors can not be intercepted".to_string());
        }

        if !member.has_instance() {
            return Err("static members can not be intercepted".to_string());
        }

        match member.dispatch() {
            Dispatch::Virtual => {}
            Dispatch::NonVirtual => {
                return Err("non-virtual members can not be intercepted. Only virtual, overridable and abstract members can be intercepted".to_string());
            }
            Dispatch::Sealed => {
                return Err("sealed members can not be intercepted".to_string());
            }
        }

        match target {
            Some(target) if !target.type_info().declares(member) => Err(format!(
                "the member is declared by '{}', not by '{}'",
                member.declaring_type(),
                target.type_info().name()
            )),
            _ => Ok(()),
        }
    }
}
