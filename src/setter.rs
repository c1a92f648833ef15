//! Deriving the setter call that matches a getter call.
//!
//! Given `calc.Result` this produces `calc.Result = _`, and given
//! `grid[1, _]` it produces `grid[1, _] = _`. The setter is looked up
//! on the runtime type of the call's target: a setter with the same
//! property name taking the getter's parameters followed by a value
//! of the getter's return type.

use tracing::debug;

use crate::{
    render, ArgumentDescriptor, Constraint, MemberKind, ParsedCall, SetterDerivationError,
    TypeRef,
};

/// Derives the setter of the property or indexer read by `getter`,
/// accepting any value of type `TValue`.
///
/// ```
/// use decoy::{derive_setter_from_getter, Access, CallParser, ExpressionParser, FakeRegistry, TypeInfo};
///
/// let grid = TypeInfo::builder("Grid")
///     .indexer::<(i32, i32), String>(&["row", "column"], Access::ReadWrite)
///     .build();
/// let fake = FakeRegistry::new().create_fake(grid);
///
/// let getter = ExpressionParser.parse(&decoy::call!(fake[(1, _)])).unwrap();
/// let setter = derive_setter_from_getter::<String>(&getter).unwrap();
///
/// assert_eq!(setter.to_string(), "Grid[1, _] = _");
/// ```
pub fn derive_setter_from_getter<TValue: 'static>(
    getter: &ParsedCall,
) -> Result<ParsedCall, SetterDerivationError> {
    derive_setter_with(getter, Constraint::any_of::<TValue>())
}

/// Derives the setter of the property or indexer read by `getter`,
/// with `value` as the expectation on the assigned value.
pub fn derive_setter_with(
    getter: &ParsedCall,
    value: Constraint,
) -> Result<ParsedCall, SetterDerivationError> {
    let expression = render::describe(getter);
    let member = getter.member();

    let target = match getter.target() {
        Some(target) if member.kind() == MemberKind::Getter && member.has_instance() => target,
        _ => return Err(SetterDerivationError::NotAGetter { expression }),
    };

    let mut signature: Vec<TypeRef> = member.param_types().collect();
    signature.push(member.return_type());

    let setter = target
        .type_info()
        .find_member(MemberKind::Setter, member.name(), &signature)
        .cloned()
        .ok_or_else(|| {
            if getter.arguments().is_empty() {
                SetterDerivationError::NoPropertySetter {
                    property: member.name().to_string(),
                    expression: expression.clone(),
                }
            } else {
                SetterDerivationError::NoIndexerSetter {
                    expression: expression.clone(),
                }
            }
        })?;

    if let Some(actual) = value.value_type() {
        if actual != member.return_type() {
            return Err(SetterDerivationError::ValueTypeMismatch {
                expression,
                expected: member.return_type().name(),
                actual: actual.name(),
            });
        }
    }

    let (value_param, index_params) = match setter.params().split_last() {
        Some(split) => split,
        None => return Err(SetterDerivationError::NotAGetter { expression }),
    };

    let arguments = getter
        .arguments()
        .iter()
        .take(index_params.len())
        .cloned()
        .chain(Some(ArgumentDescriptor::new(value, value_param.clone())))
        .collect();

    let derived = ParsedCall::from_parts(Some(target.clone()), setter, arguments);
    debug!(getter = %expression, setter = %derived, "derived setter");
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Access, CallParser, CallSpec, ExpressionParser, ObjectRef, TypeInfo};

    fn parse(spec: CallSpec) -> ParsedCall {
        ExpressionParser.parse(&spec).expect("parsed")
    }

    #[test]
    fn property_getters_become_assignments() {
        let ty = TypeInfo::builder("Account")
            .property::<i64>("Balance", Access::ReadWrite)
            .build();
        let account = ObjectRef::new(ty);

        let setter = derive_setter_from_getter::<i64>(&parse(CallSpec::property(
            &account, "Balance",
        )))
        .expect("setter");

        assert_eq!(setter.member().kind(), MemberKind::Setter);
        assert_eq!(setter.target(), Some(&account));
        assert_eq!(setter.arguments().len(), 1);
        assert_eq!(setter.arguments()[0].parameter().name(), "value");
        assert!(setter.arguments()[0].constraint().is_wildcard());
    }

    #[test]
    fn indexer_arguments_are_kept() {
        let ty = TypeInfo::builder("Grid")
            .indexer::<(i32, i32), String>(&["row", "column"], Access::ReadWrite)
            .build();
        let grid = ObjectRef::new(ty);
        let getter = parse(
            CallSpec::index(&grid)
                .arg(Constraint::eq(1))
                .arg(Constraint::any()),
        );

        let setter = derive_setter_with(&getter, Constraint::eq(String::from("x"))).expect("setter");
        assert_eq!(setter.to_string(), "Grid[1, _] = \"x\"");
        assert_eq!(setter.arguments()[0], getter.arguments()[0]);
        assert_eq!(setter.arguments()[2].parameter().position(), 2);
    }

    #[test]
    fn read_only_members_have_no_setter() {
        let ty = TypeInfo::builder("Clock")
            .property::<u64>("Now", Access::ReadOnly)
            .indexer::<(usize,), u64>(&["lap"], Access::ReadOnly)
            .build();
        let clock = ObjectRef::new(ty);

        let error = derive_setter_from_getter::<u64>(&parse(CallSpec::property(&clock, "Now")))
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Expression 'Clock.Now' refers to a property, but the property 'Now' does not have a setter."
        );

        let lap = parse(CallSpec::index(&clock).arg(Constraint::eq(0_usize)));
        let error = derive_setter_from_getter::<u64>(&lap).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Expression 'Clock[0]' refers to an indexed property that does not have a setter."
        );
    }

    #[test]
    fn methods_are_not_getters() {
        let ty = TypeInfo::builder("Clock")
            .method::<(), u64>("tick", &[])
            .build();
        let clock = ObjectRef::new(ty);

        let error = derive_setter_from_getter::<u64>(&parse(CallSpec::method(&clock, "tick")))
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Expression 'Clock.tick()' must refer to a property or indexer getter, but doesn't."
        );
    }

    #[test]
    fn value_type_must_match_the_property() {
        let ty = TypeInfo::builder("Account")
            .property::<i64>("Balance", Access::ReadWrite)
            .build();
        let account = ObjectRef::new(ty);
        let getter = parse(CallSpec::property(&account, "Balance"));

        let error = derive_setter_from_getter::<i32>(&getter).unwrap_err();
        assert!(matches!(
            error,
            SetterDerivationError::ValueTypeMismatch { expected: "i64", actual: "i32", .. }
        ));
    }
}
