use std::{
    any::TypeId,
    fmt::{self, Formatter},
    hash::{Hash, Hasher},
};

/// Name given to the property behind an indexer.
pub const INDEXER: &str = "Item";

/// Runtime identity of a Rust type.
///
/// Two `TypeRef`s are equal if they refer to the same type; the name
/// is only kept around for messages.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
}

impl TypeRef {
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeRef {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_unit(&self) -> bool {
        self.id == TypeId::of::<()>()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// What a member is, decided once when the member is described.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Getter,
    Setter,
    Constructor,
}

/// How calls to a member are dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dispatch {
    /// Overridable; the only kind of member a fake can intercept.
    Virtual,
    /// Was overridable but has been sealed by the declaring type.
    Sealed,
    NonVirtual,
}

/// A formal parameter of a member.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    name: String,
    ty: TypeRef,
    position: usize,
}

impl ParamInfo {
    pub fn new(name: impl Into<String>, ty: TypeRef, position: usize) -> Self {
        ParamInfo {
            name: name.into(),
            ty,
            position,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

/// Identity of a method, constructor or property accessor.
///
/// Accessors are named after their property: the getter and the
/// setter of `Result` both have the name `"Result"` and are told
/// apart by their [`MemberKind`]. The setter takes the getter's
/// parameters followed by a value of the getter's return type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemberInfo {
    name: String,
    kind: MemberKind,
    declaring_type: String,
    params: Vec<ParamInfo>,
    return_type: TypeRef,
    has_instance: bool,
    special_name: bool,
    dispatch: Dispatch,
}

impl MemberInfo {
    pub fn new(
        kind: MemberKind,
        declaring_type: impl Into<String>,
        name: impl Into<String>,
        params: impl IntoIterator<Item = (String, TypeRef)>,
        return_type: TypeRef,
    ) -> Self {
        let params = params
            .into_iter()
            .enumerate()
            .map(|(position, (name, ty))| ParamInfo::new(name, ty, position))
            .collect();

        MemberInfo {
            name: name.into(),
            kind,
            declaring_type: declaring_type.into(),
            params,
            return_type,
            has_instance: kind != MemberKind::Constructor,
            special_name: matches!(
                kind,
                MemberKind::Getter | MemberKind::Setter | MemberKind::Constructor
            ),
            dispatch: Dispatch::Virtual,
        }
    }

    /// Marks the member as not belonging to an instance.
    pub fn into_static(mut self) -> Self {
        self.has_instance = false;
        self
    }

    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    pub fn params(&self) -> &[ParamInfo] {
        &self.params
    }

    pub fn param_types(&self) -> impl Iterator<Item = TypeRef> + '_ {
        self.params.iter().map(ParamInfo::ty)
    }

    pub fn return_type(&self) -> TypeRef {
        self.return_type
    }

    pub fn has_instance(&self) -> bool {
        self.has_instance
    }

    pub fn special_name(&self) -> bool {
        self.special_name
    }

    pub fn dispatch(&self) -> Dispatch {
        self.dispatch
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self.kind, MemberKind::Getter | MemberKind::Setter)
    }

    /// True for the accessors of an indexer.
    pub fn is_indexer(&self) -> bool {
        self.is_accessor() && self.name == INDEXER
    }

    /// The conventional name of the member: `get_Result`, `set_Item`,
    /// `add`, `.ctor`.
    pub fn accessor_name(&self) -> String {
        match self.kind {
            MemberKind::Method => self.name.clone(),
            MemberKind::Getter => format!("get_{}", self.name),
            MemberKind::Setter => format!("set_{}", self.name),
            MemberKind::Constructor => ".ctor".to_string(),
        }
    }
}
