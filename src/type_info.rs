use std::sync::Arc;

use crate::{
    args::ParamTypes,
    member::{MemberInfo, MemberKind, TypeRef, INDEXER},
};

/// Which accessors a property or indexer has.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    fn readable(self) -> bool {
        matches!(self, Access::ReadOnly | Access::ReadWrite)
    }

    fn writable(self) -> bool {
        matches!(self, Access::WriteOnly | Access::ReadWrite)
    }
}

/// The member table of a fakeable type.
///
/// This is what call specifications are resolved against: members
/// are looked up by kind, name and exact parameter types.
///
/// ```
/// use decoy::{Access, MemberKind, TypeInfo, TypeRef};
///
/// let calculator = TypeInfo::builder("Calculator")
///     .method::<(i32, i32), i32>("add", &["a", "b"])
///     .property::<i32>("Result", Access::ReadWrite)
///     .build();
///
/// let setter = calculator.find_member(MemberKind::Setter, "Result", &[TypeRef::of::<i32>()]);
/// assert!(setter.is_some());
/// ```
#[derive(Debug)]
pub struct TypeInfo {
    name: String,
    members: Vec<Arc<MemberInfo>>,
}

impl TypeInfo {
    pub fn builder(name: impl Into<String>) -> TypeInfoBuilder {
        TypeInfoBuilder {
            name: name.into(),
            members: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[Arc<MemberInfo>] {
        &self.members
    }

    /// Every member of the given kind and name, in declaration order.
    pub fn members_named<'a>(
        &'a self,
        kind: MemberKind,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Arc<MemberInfo>> + 'a {
        self.members
            .iter()
            .filter(move |m| m.kind() == kind && m.name() == name)
    }

    /// Finds the member with exactly these parameter types.
    pub fn find_member(
        &self,
        kind: MemberKind,
        name: &str,
        param_types: &[TypeRef],
    ) -> Option<&Arc<MemberInfo>> {
        self.members.iter().find(|m| {
            m.kind() == kind && m.name() == name && m.param_types().eq(param_types.iter().copied())
        })
    }

    pub fn declares(&self, member: &MemberInfo) -> bool {
        self.members.iter().any(|m| m.as_ref() == member)
    }
}

pub struct TypeInfoBuilder {
    name: String,
    members: Vec<MemberInfo>,
}

impl TypeInfoBuilder {
    /// Adds an overridable instance method.
    pub fn method<P: ParamTypes, R: 'static>(self, name: &str, param_names: &[&str]) -> Self {
        let member = MemberInfo::new(
            MemberKind::Method,
            self.name.clone(),
            name,
            named(P::types(), param_names),
            TypeRef::of::<R>(),
        );
        self.member(member)
    }

    pub fn static_method<P: ParamTypes, R: 'static>(
        self,
        name: &str,
        param_names: &[&str],
    ) -> Self {
        let member = MemberInfo::new(
            MemberKind::Method,
            self.name.clone(),
            name,
            named(P::types(), param_names),
            TypeRef::of::<R>(),
        )
        .into_static();
        self.member(member)
    }

    pub fn constructor<P: ParamTypes>(self, param_names: &[&str]) -> Self {
        let member = MemberInfo::new(
            MemberKind::Constructor,
            self.name.clone(),
            "new",
            named(P::types(), param_names),
            TypeRef::of::<()>(),
        );
        self.member(member)
    }

    /// Adds the accessors of a simple property of type `T`.
    pub fn property<T: 'static>(self, name: &str, access: Access) -> Self {
        self.accessors(name, vec![], TypeRef::of::<T>(), access)
    }

    /// Adds the accessors of an indexer taking `I` and holding `T`.
    pub fn indexer<I: ParamTypes, T: 'static>(
        self,
        index_names: &[&str],
        access: Access,
    ) -> Self {
        let index = named(I::types(), index_names);
        self.accessors(INDEXER, index, TypeRef::of::<T>(), access)
    }

    /// Adds a fully described member, for anything the shortcuts
    /// above do not cover.
    pub fn member(mut self, member: MemberInfo) -> Self {
        self.members.push(member);
        self
    }

    pub fn build(self) -> Arc<TypeInfo> {
        Arc::new(TypeInfo {
            name: self.name,
            members: self.members.into_iter().map(Arc::new).collect(),
        })
    }

    fn accessors(
        mut self,
        name: &str,
        index: Vec<(String, TypeRef)>,
        ty: TypeRef,
        access: Access,
    ) -> Self {
        if access.readable() {
            self.members.push(MemberInfo::new(
                MemberKind::Getter,
                self.name.clone(),
                name,
                index.clone(),
                ty,
            ));
        }

        if access.writable() {
            let mut params = index;
            params.push(("value".to_string(), ty));
            self.members.push(MemberInfo::new(
                MemberKind::Setter,
                self.name.clone(),
                name,
                params,
                TypeRef::of::<()>(),
            ));
        }

        self
    }
}

// pairs types with names, falling back to `argN` for unnamed ones
fn named(types: Vec<TypeRef>, names: &[&str]) -> Vec<(String, TypeRef)> {
    types
        .into_iter()
        .enumerate()
        .map(|(i, ty)| {
            let name = names
                .get(i)
                .map(|n| n.to_string())
                .unwrap_or_else(|| format!("arg{}", i));
            (name, ty)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Arc<TypeInfo> {
        TypeInfo::builder("Grid")
            .indexer::<(i32, i32), String>(&["row", "column"], Access::ReadWrite)
            .indexer::<(String,), String>(&["key"], Access::ReadOnly)
            .property::<usize>("Len", Access::ReadOnly)
            .property::<bool>("Dirty", Access::WriteOnly)
            .build()
    }

    #[test]
    fn indexers_get_a_getter_and_a_setter() {
        let grid = grid();
        let int = TypeRef::of::<i32>();
        let string = TypeRef::of::<String>();

        let getter = grid
            .find_member(MemberKind::Getter, INDEXER, &[int, int])
            .expect("getter");
        assert_eq!(getter.return_type(), string);
        assert_eq!(getter.params()[1].name(), "column");

        let setter = grid
            .find_member(MemberKind::Setter, INDEXER, &[int, int, string])
            .expect("setter");
        assert!(setter.return_type().is_unit());
        assert_eq!(setter.params()[2].name(), "value");
        assert_eq!(setter.params()[2].position(), 2);

        assert!(grid
            .find_member(MemberKind::Setter, INDEXER, &[string, string])
            .is_none());
    }

    #[test]
    fn access_decides_which_accessors_exist() {
        let grid = grid();
        assert_eq!(grid.members_named(MemberKind::Getter, "Len").count(), 1);
        assert_eq!(grid.members_named(MemberKind::Setter, "Len").count(), 0);
        assert_eq!(grid.members_named(MemberKind::Getter, "Dirty").count(), 0);
        assert_eq!(grid.members_named(MemberKind::Setter, "Dirty").count(), 1);
    }

    #[test]
    fn lookup_needs_exact_parameter_types() {
        let calc = TypeInfo::builder("Calculator")
            .method::<(i32, i32), i32>("add", &["a"])
            .method::<(i64, i64), i64>("add", &[])
            .build();

        let int = TypeRef::of::<i32>();
        let long = TypeRef::of::<i64>();

        let add = calc
            .find_member(MemberKind::Method, "add", &[long, long])
            .expect("add(i64, i64)");
        assert_eq!(add.return_type(), long);
        assert_eq!(add.params()[0].name(), "arg0");

        let add = calc
            .find_member(MemberKind::Method, "add", &[int, int])
            .expect("add(i32, i32)");
        assert_eq!(add.params()[0].name(), "a");
        assert_eq!(add.params()[1].name(), "arg1");

        assert!(calc.find_member(MemberKind::Method, "add", &[int]).is_none());
        assert!(calc.declares(add));
    }

    #[test]
    fn found_members_outlive_the_looked_up_name() {
        let calc = TypeInfo::builder("Calculator")
            .property::<i32>("Result", Access::ReadWrite)
            .build();

        let setter = {
            let name = format!("Res{}", "ult");
            calc.find_member(
                MemberKind::Setter,
                &name,
                &[TypeRef::of::<i32>()],
            )
        };
        assert_eq!(setter.map(|m| m.accessor_name()).as_deref(), Some("set_Result"));
    }
}
