use std::sync::Arc;

use crate::{
    ArgValue, AsTarget, DispatchError, FakeManager, IntoValues, Invocation, MemberKind, ObjectRef,
    TypeRef, Value, INDEXER,
};

/// A handle to a fake object.
///
/// Calls made through the handle are answered by the rules configured
/// on the fake. Clones share the same fake, which stays registered
/// until the last handle is dropped.
///
/// ```
/// use decoy::{call, Configurator, FakeRegistry, TypeInfo};
/// use std::sync::Arc;
///
/// let greeter = TypeInfo::builder("Greeter")
///     .method::<(String,), String>("greet", &["name"])
///     .build();
/// let registry = Arc::new(FakeRegistry::new());
/// let configurator = Configurator::new(registry.clone());
/// let fake = registry.create_fake(greeter);
///
/// configurator
///     .configure_call_returning::<String>(&call!(fake.greet(_)))
///     .unwrap()
///     .returns_lazily(|invocation| {
///         let name = invocation.argument::<String>(0).cloned().unwrap_or_default();
///         format!("hello {}", name)
///     });
///
/// let greeting: String = fake.call("greet", (String::from("ana"),)).unwrap();
/// assert_eq!(greeting, "hello ana");
/// ```
#[derive(Clone, Debug)]
pub struct Fake {
    manager: Arc<FakeManager>,
}

impl Fake {
    pub(crate) fn new(manager: Arc<FakeManager>) -> Self {
        Fake { manager }
    }

    pub fn object(&self) -> &ObjectRef {
        self.manager.object()
    }

    pub fn manager(&self) -> &Arc<FakeManager> {
        &self.manager
    }

    /// Calls the instance method `name` with `args`.
    pub fn call<R: Clone + 'static>(
        &self,
        name: &str,
        args: impl IntoValues,
    ) -> Result<R, DispatchError> {
        self.dispatch::<R>(MemberKind::Method, name, args.into_values())
    }

    /// Reads the property `property`.
    pub fn get<T: Clone + 'static>(&self, property: &str) -> Result<T, DispatchError> {
        self.dispatch::<T>(MemberKind::Getter, property, vec![])
    }

    /// Writes `value` to the property `property`.
    pub fn set<T: ArgValue>(&self, property: &str, value: T) -> Result<(), DispatchError> {
        self.dispatch::<()>(MemberKind::Setter, property, vec![Value::new(value)])
    }

    /// Reads the indexer at `index`.
    pub fn get_index<T: Clone + 'static>(&self, index: impl IntoValues) -> Result<T, DispatchError> {
        self.dispatch::<T>(MemberKind::Getter, INDEXER, index.into_values())
    }

    /// Writes `value` to the indexer at `index`.
    pub fn set_index<T: ArgValue>(
        &self,
        index: impl IntoValues,
        value: T,
    ) -> Result<(), DispatchError> {
        let mut arguments = index.into_values();
        arguments.push(Value::new(value));
        self.dispatch::<()>(MemberKind::Setter, INDEXER, arguments)
    }

    fn dispatch<R: Clone + 'static>(
        &self,
        kind: MemberKind,
        name: &str,
        arguments: Vec<Value>,
    ) -> Result<R, DispatchError> {
        let type_info = self.object().type_info();
        let types: Vec<TypeRef> = arguments.iter().map(Value::ty).collect();

        let member = type_info
            .find_member(kind, name, &types)
            .filter(|member| member.has_instance())
            .cloned()
            .ok_or_else(|| DispatchError::UnknownMember {
                type_name: type_info.name().to_string(),
                kind: match kind {
                    MemberKind::Method => "method",
                    MemberKind::Getter => "getter",
                    MemberKind::Setter => "setter",
                    MemberKind::Constructor => "constructor",
                },
                member: name.to_string(),
                arguments: types
                    .iter()
                    .map(TypeRef::name)
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;

        let invocation = Invocation::new(self.object().id(), type_info.name(), member, arguments);
        let expected = TypeRef::of::<R>();
        if invocation.member().return_type() != expected {
            return Err(DispatchError::ReturnType {
                call: invocation.to_string(),
                expected: expected.name(),
                actual: invocation.member().return_type().name(),
            });
        }

        let call = invocation.to_string();
        let value = self.manager.intercept(invocation)?;
        value
            .downcast_ref::<R>()
            .cloned()
            .ok_or_else(|| DispatchError::ReturnType {
                call,
                expected: expected.name(),
                actual: value.ty().name(),
            })
    }
}

impl AsTarget for Fake {
    fn as_target(&self) -> ObjectRef {
        self.object().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Access, FakeRegistry, TypeInfo};

    #[test]
    fn resolves_members_by_argument_types() {
        let ty = TypeInfo::builder("Store")
            .method::<(u32,), ()>("remove", &["id"])
            .indexer::<(u32,), String>(&["id"], Access::ReadWrite)
            .build();
        let fake = FakeRegistry::new().create_fake(ty);

        assert!(fake.call::<()>("remove", (1_u32,)).is_ok());
        assert!(fake.set_index((1_u32,), String::from("a")).is_ok());

        let error = fake.call::<()>("remove", (1_i64,)).unwrap_err();
        assert_eq!(
            error.to_string(),
            "'Store' has no method 'remove' taking (i64)"
        );
    }

    #[test]
    fn checks_the_requested_return_type() {
        let ty = TypeInfo::builder("Store")
            .property::<u32>("Len", Access::ReadOnly)
            .build();
        let fake = FakeRegistry::new().create_fake(ty);

        let error = fake.get::<i64>("Len").unwrap_err();
        assert!(matches!(error, DispatchError::ReturnType { .. }));
    }

    #[test]
    fn records_calls() {
        let ty = TypeInfo::builder("Store")
            .property::<u32>("Len", Access::ReadWrite)
            .build();
        let fake = FakeRegistry::new().create_fake(ty);

        fake.set("Len", 3_u32).expect("setters complete");
        let calls = fake.manager().recorded_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].to_string(), "Store.Len = 3");
        assert_eq!(calls[0].argument::<u32>(0), Some(&3));
    }
}
