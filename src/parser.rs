use std::sync::Arc;

use crate::{
    ArgumentDescriptor, AsTarget, Constraint, MemberInfo, MemberKind, ObjectRef, ParseError,
    ParsedCall, TypeInfo, INDEXER,
};

/// What a call specification reaches into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecKind {
    Method,
    Property,
    Index,
}

impl SpecKind {
    fn member_kind(self) -> MemberKind {
        match self {
            SpecKind::Method => MemberKind::Method,
            SpecKind::Property | SpecKind::Index => MemberKind::Getter,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            SpecKind::Method => "method",
            SpecKind::Property => "property",
            SpecKind::Index => "indexer",
        }
    }
}

#[derive(Clone, Debug)]
enum SpecTarget {
    Instance(ObjectRef),
    Static(Arc<TypeInfo>),
}

/// A symbolic description of a member access: a method call, a
/// property read or an indexer read, with a [`Constraint`] in place
/// of each argument.
///
/// Usually written with [`call!`](crate::call!):
///
/// ```
/// use decoy::{CallSpec, Constraint, FakeRegistry, TypeInfo};
///
/// let calculator = TypeInfo::builder("Calculator")
///     .method::<(i32, i32), i32>("add", &["a", "b"])
///     .build();
/// let registry = FakeRegistry::new();
/// let calc = registry.create_fake(calculator);
///
/// let by_hand = CallSpec::method(&calc, "add")
///     .arg(Constraint::eq(1))
///     .arg(Constraint::any());
/// let by_macro = decoy::call!(calc.add(1, _));
///
/// assert_eq!(by_hand.name(), by_macro.name());
/// assert_eq!(by_hand.arguments().len(), by_macro.arguments().len());
/// ```
#[derive(Clone, Debug)]
pub struct CallSpec {
    target: SpecTarget,
    kind: SpecKind,
    name: String,
    arguments: Vec<Constraint>,
}

impl CallSpec {
    /// `target.name(..)`
    pub fn method(target: &impl AsTarget, name: impl Into<String>) -> Self {
        CallSpec::new(SpecTarget::Instance(target.as_target()), SpecKind::Method, name)
    }

    /// A call with no target object, such as `Type::name(..)`.
    pub fn static_method(type_info: Arc<TypeInfo>, name: impl Into<String>) -> Self {
        CallSpec::new(SpecTarget::Static(type_info), SpecKind::Method, name)
    }

    /// `target.name`
    pub fn property(target: &impl AsTarget, name: impl Into<String>) -> Self {
        CallSpec::new(
            SpecTarget::Instance(target.as_target()),
            SpecKind::Property,
            name,
        )
    }

    /// `target[..]`
    pub fn index(target: &impl AsTarget) -> Self {
        CallSpec::new(
            SpecTarget::Instance(target.as_target()),
            SpecKind::Index,
            INDEXER,
        )
    }

    /// Appends the constraint for the next argument.
    pub fn arg(mut self, constraint: Constraint) -> Self {
        self.arguments.push(constraint);
        self
    }

    pub fn kind(&self) -> SpecKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[Constraint] {
        &self.arguments
    }

    pub fn target(&self) -> Option<&ObjectRef> {
        match &self.target {
            SpecTarget::Instance(target) => Some(target),
            SpecTarget::Static(_) => None,
        }
    }

    pub fn type_info(&self) -> &Arc<TypeInfo> {
        match &self.target {
            SpecTarget::Instance(target) => target.type_info(),
            SpecTarget::Static(type_info) => type_info,
        }
    }

    fn new(target: SpecTarget, kind: SpecKind, name: impl Into<String>) -> Self {
        CallSpec {
            target,
            kind,
            name: name.into(),
            arguments: vec![],
        }
    }
}

/// Turns call specifications into parsed calls.
pub trait CallParser: Send + Sync {
    fn parse(&self, spec: &CallSpec) -> Result<ParsedCall, ParseError>;
}

/// Resolves call specifications against the [`TypeInfo`] of their
/// target.
///
/// Methods are resolved by name, number of arguments, and the types
/// of the typed constraints; wildcards fit any parameter. Exactly one
/// overload has to fit.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpressionParser;

impl CallParser for ExpressionParser {
    fn parse(&self, spec: &CallSpec) -> Result<ParsedCall, ParseError> {
        if spec.kind() == SpecKind::Property && !spec.arguments().is_empty() {
            return Err(ParseError::UnsupportedShape(format!(
                "property '{}' was given {} argument(s)",
                spec.name(),
                spec.arguments().len()
            )));
        }

        let type_info = spec.type_info();
        let kind = spec.kind().member_kind();

        let mut named = type_info.members_named(kind, spec.name()).peekable();
        if named.peek().is_none() {
            return Err(ParseError::UnknownMember {
                type_name: type_info.name().to_string(),
                kind: spec.kind().describe(),
                member: spec.name().to_string(),
            });
        }

        let candidates: Vec<&Arc<MemberInfo>> = named.filter(|m| fits(m, spec)).collect();
        let member = match candidates.as_slice() {
            [member] => Arc::clone(member),
            [] => {
                return Err(ParseError::NoMatchingOverload {
                    type_name: type_info.name().to_string(),
                    member: spec.name().to_string(),
                    arity: spec.arguments().len(),
                })
            }
            many => {
                return Err(ParseError::AmbiguousCall {
                    type_name: type_info.name().to_string(),
                    member: spec.name().to_string(),
                    candidates: many.len(),
                })
            }
        };

        let arguments = spec
            .arguments()
            .iter()
            .cloned()
            .zip(member.params())
            .map(|(constraint, param)| ArgumentDescriptor::new(constraint, param.clone()))
            .collect();

        ParsedCall::new(spec.target().cloned(), member, arguments)
    }
}

fn fits(member: &MemberInfo, spec: &CallSpec) -> bool {
    member.params().len() == spec.arguments().len()
        && spec
            .arguments()
            .iter()
            .zip(member.params())
            .all(|(constraint, param)| constraint.accepts(param.ty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Access, TypeRef};

    fn calculator() -> Arc<TypeInfo> {
        TypeInfo::builder("Calculator")
            .method::<(i32, i32), i32>("add", &["a", "b"])
            .method::<(i64, i64), i64>("add", &["a", "b"])
            .method::<(), ()>("clear", &[])
            .static_method::<(i32,), i32>("square", &["n"])
            .property::<i32>("Result", Access::ReadWrite)
            .indexer::<(usize,), i32>(&["slot"], Access::ReadOnly)
            .build()
    }

    #[test]
    fn resolves_overloads_by_argument_types() {
        let calc = ObjectRef::new(calculator());
        let spec = CallSpec::method(&calc, "add")
            .arg(Constraint::eq(1_i64))
            .arg(Constraint::any());

        let call = ExpressionParser.parse(&spec).expect("parsed");
        assert_eq!(call.member().return_type(), TypeRef::of::<i64>());
        assert_eq!(call.target(), Some(&calc));
        assert_eq!(
            call.arguments()[1].constraint().value_type(),
            Some(TypeRef::of::<i64>())
        );
    }

    #[test]
    fn wildcards_alone_are_ambiguous_between_overloads() {
        let calc = ObjectRef::new(calculator());
        let spec = CallSpec::method(&calc, "add")
            .arg(Constraint::any())
            .arg(Constraint::any());

        let error = ExpressionParser.parse(&spec).unwrap_err();
        assert!(matches!(error, ParseError::AmbiguousCall { candidates: 2, .. }));
    }

    #[test]
    fn unknown_members_and_overloads() {
        let calc = ObjectRef::new(calculator());

        let error = ExpressionParser
            .parse(&CallSpec::method(&calc, "subtract"))
            .unwrap_err();
        assert!(matches!(error, ParseError::UnknownMember { kind: "method", .. }));

        let error = ExpressionParser
            .parse(&CallSpec::method(&calc, "add").arg(Constraint::eq(1)))
            .unwrap_err();
        assert!(matches!(error, ParseError::NoMatchingOverload { arity: 1, .. }));
    }

    #[test]
    fn properties_and_indexers_resolve_to_getters() {
        let calc = ObjectRef::new(calculator());

        let result = ExpressionParser
            .parse(&CallSpec::property(&calc, "Result"))
            .expect("property");
        assert_eq!(result.member().kind(), MemberKind::Getter);
        assert!(result.arguments().is_empty());

        let slot = ExpressionParser
            .parse(&CallSpec::index(&calc).arg(Constraint::eq(3_usize)))
            .expect("indexer");
        assert!(slot.member().is_indexer());
        assert_eq!(slot.arguments().len(), 1);
    }

    #[test]
    fn properties_take_no_arguments() {
        let calc = ObjectRef::new(calculator());
        let spec = CallSpec::property(&calc, "Result").arg(Constraint::any());

        let error = ExpressionParser.parse(&spec).unwrap_err();
        assert!(matches!(error, ParseError::UnsupportedShape(_)));
    }

    #[test]
    fn static_calls_have_no_target() {
        let spec = CallSpec::static_method(calculator(), "square").arg(Constraint::eq(3));

        let call = ExpressionParser.parse(&spec).expect("static call");
        assert!(call.target().is_none());
        assert!(!call.member().has_instance());
    }

    #[test]
    fn parsing_is_repeatable() {
        let calc = ObjectRef::new(calculator());
        let spec = CallSpec::method(&calc, "add")
            .arg(Constraint::eq(1))
            .arg(Constraint::any());

        let first = ExpressionParser.parse(&spec).expect("first");
        let second = ExpressionParser.parse(&spec).expect("second");
        assert_eq!(first, second);
    }
}
