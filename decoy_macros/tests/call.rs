use decoy::{Access, CallSpec, Constraint, FakeRegistry, SpecKind, TypeInfo};
use std::sync::Arc;

fn grid() -> Arc<TypeInfo> {
    TypeInfo::builder("Grid")
        .method::<(i32, i32), bool>("contains", &["row", "column"])
        .method::<(), ()>("clear", &[])
        .property::<usize>("Len", Access::ReadOnly)
        .indexer::<(i32,), String>(&["row"], Access::ReadWrite)
        .indexer::<(i32, i32), String>(&["row", "column"], Access::ReadWrite)
        .build()
}

fn same(a: &CallSpec, b: &CallSpec) {
    assert_eq!(a.kind(), b.kind());
    assert_eq!(a.name(), b.name());
    assert_eq!(a.arguments(), b.arguments());
    assert_eq!(a.target(), b.target());
}

#[test]
fn method_calls() {
    let fake = FakeRegistry::new().create_fake(grid());
    let row = 4;

    let spec = decoy_macros::call!(fake.contains(_, row));
    same(
        &spec,
        &CallSpec::method(&fake, "contains")
            .arg(Constraint::any())
            .arg(Constraint::eq(4)),
    );

    let spec = decoy_macros::call!(fake.clear());
    assert_eq!(spec.kind(), SpecKind::Method);
    assert!(spec.arguments().is_empty());
}

#[test]
fn explicit_equality() {
    let fake = FakeRegistry::new().create_fake(grid());

    let spec = decoy_macros::call!(fake.contains(_ == 1, _ == 2));
    same(
        &spec,
        &CallSpec::method(&fake, "contains")
            .arg(Constraint::eq(1))
            .arg(Constraint::eq(2)),
    );
}

#[test]
fn custom_matchers() {
    let fake = FakeRegistry::new().create_fake(grid());

    let spec = decoy_macros::call!(fake.contains(_ = decoy::pattern!(i32 => 0..=3), _));
    assert_eq!(spec.arguments().len(), 2);
    assert!(!spec.arguments()[0].is_wildcard());
    assert_eq!(spec.arguments()[0].value_type(), Some(decoy::TypeRef::of::<i32>()));
}

#[test]
fn properties() {
    let fake = FakeRegistry::new().create_fake(grid());

    let spec = decoy_macros::call!(fake.Len);
    same(&spec, &CallSpec::property(&fake, "Len"));
}

#[test]
fn indexers() {
    let fake = FakeRegistry::new().create_fake(grid());

    let spec = decoy_macros::call!(fake[2]);
    same(&spec, &CallSpec::index(&fake).arg(Constraint::eq(2)));

    let spec = decoy_macros::call!(fake[(2, _)]);
    same(
        &spec,
        &CallSpec::index(&fake)
            .arg(Constraint::eq(2))
            .arg(Constraint::any()),
    );
}

#[test]
fn receivers_can_be_expressions() {
    let fakes = vec![FakeRegistry::new().create_fake(grid())];

    let spec = decoy_macros::call!(fakes[0].Len);
    assert_eq!(spec.target(), Some(fakes[0].object()));
}
