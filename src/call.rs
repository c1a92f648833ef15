use std::{
    fmt::{self, Formatter},
    sync::Arc,
};

use crate::{render, Constraint, MemberInfo, ObjectRef, ParamInfo, ParseError};

/// One argument of a parsed call: the expectation on the value and
/// the formal parameter it is passed to.
#[derive(Clone, Debug, PartialEq)]
pub struct ArgumentDescriptor {
    constraint: Constraint,
    parameter: ParamInfo,
}

impl ArgumentDescriptor {
    /// Pairs a constraint with its parameter, fixing the type of an
    /// unbound wildcard to the parameter's type.
    pub fn new(constraint: Constraint, parameter: ParamInfo) -> Self {
        ArgumentDescriptor {
            constraint: constraint.bind(parameter.ty()),
            parameter,
        }
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    pub fn parameter(&self) -> &ParamInfo {
        &self.parameter
    }
}

/// A normalized call: which member, on which object, with what
/// expectations on each argument.
///
/// Two parsed calls are equal when they target the same object,
/// refer to the same member and have structurally equal arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedCall {
    target: Option<ObjectRef>,
    member: Arc<MemberInfo>,
    arguments: Vec<ArgumentDescriptor>,
}

impl ParsedCall {
    /// Builds a parsed call, checking that there is exactly one
    /// argument per parameter and that every argument fits its
    /// parameter's type.
    pub fn new(
        target: Option<ObjectRef>,
        member: Arc<MemberInfo>,
        arguments: Vec<ArgumentDescriptor>,
    ) -> Result<Self, ParseError> {
        if arguments.len() != member.params().len() {
            return Err(ParseError::ArgumentCount {
                member: member.accessor_name(),
                expected: member.params().len(),
                actual: arguments.len(),
            });
        }

        let misfit = arguments
            .iter()
            .zip(member.params())
            .find_map(|(arg, param)| match arg.constraint().value_type() {
                Some(ty) if ty != param.ty() => Some((param, ty)),
                _ => None,
            });

        if let Some((param, actual)) = misfit {
            return Err(ParseError::ArgumentType {
                member: member.accessor_name(),
                position: param.position(),
                expected: param.ty().name(),
                actual: actual.name(),
            });
        }

        Ok(ParsedCall::from_parts(target, member, arguments))
    }

    // callers guarantee the invariants checked by `new`
    pub(crate) fn from_parts(
        target: Option<ObjectRef>,
        member: Arc<MemberInfo>,
        arguments: Vec<ArgumentDescriptor>,
    ) -> Self {
        ParsedCall {
            target,
            member,
            arguments,
        }
    }

    pub fn target(&self) -> Option<&ObjectRef> {
        self.target.as_ref()
    }

    pub fn member(&self) -> &Arc<MemberInfo> {
        &self.member
    }

    pub fn arguments(&self) -> &[ArgumentDescriptor] {
        &self.arguments
    }
}

impl fmt::Display for ParsedCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&render::describe(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Access, MemberKind, TypeInfo, TypeRef};

    fn calculator() -> Arc<TypeInfo> {
        TypeInfo::builder("Calculator")
            .method::<(i32, i32), i32>("add", &["a", "b"])
            .property::<i32>("Result", Access::ReadWrite)
            .build()
    }

    fn add(ty: &TypeInfo) -> Arc<MemberInfo> {
        let int = TypeRef::of::<i32>();
        ty.find_member(MemberKind::Method, "add", &[int, int])
            .cloned()
            .expect("add")
    }

    #[test]
    fn binds_wildcards_to_their_parameter() {
        let ty = calculator();
        let add = add(&ty);
        let arguments = vec![
            ArgumentDescriptor::new(Constraint::any(), add.params()[0].clone()),
            ArgumentDescriptor::new(Constraint::eq(2), add.params()[1].clone()),
        ];

        let call = ParsedCall::new(Some(ObjectRef::new(ty)), add, arguments).expect("valid call");
        assert_eq!(
            call.arguments()[0].constraint().value_type(),
            Some(TypeRef::of::<i32>())
        );
        assert_eq!(call.arguments()[1].parameter().name(), "b");
    }

    #[test]
    fn rejects_missing_arguments() {
        let ty = calculator();
        let add = add(&ty);
        let arguments = vec![ArgumentDescriptor::new(
            Constraint::any(),
            add.params()[0].clone(),
        )];

        let error = ParsedCall::new(None, add, arguments).unwrap_err();
        assert_eq!(
            error,
            ParseError::ArgumentCount {
                member: "add".to_string(),
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn rejects_arguments_of_the_wrong_type() {
        let ty = calculator();
        let add = add(&ty);
        let arguments = vec![
            ArgumentDescriptor::new(Constraint::eq(1_i64), add.params()[0].clone()),
            ArgumentDescriptor::new(Constraint::any(), add.params()[1].clone()),
        ];

        let error = ParsedCall::new(None, add, arguments).unwrap_err();
        assert!(matches!(error, ParseError::ArgumentType { position: 0, .. }));
    }
}
