use std::{
    fmt::{self, Formatter},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use crate::TypeInfo;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an object, unique for the life of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    fn next() -> Self {
        ObjectId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A reference to an object that a call may target: its identity
/// plus its runtime type.
///
/// Holding an `ObjectRef` does not keep a fake alive.
#[derive(Clone)]
pub struct ObjectRef {
    id: ObjectId,
    type_info: Arc<TypeInfo>,
}

impl ObjectRef {
    /// A new object of the given type.
    ///
    /// Objects created this way are not fakes unless they are
    /// registered as such, see [`FakeRegistry`](crate::FakeRegistry).
    pub fn new(type_info: Arc<TypeInfo>) -> Self {
        ObjectRef {
            id: ObjectId::next(),
            type_info,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn type_info(&self) -> &Arc<TypeInfo> {
        &self.type_info
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ObjectRef {}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.type_info.name(), self.id)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.type_info.name(), self.id)
    }
}

/// Anything that can be the target of a call specification.
pub trait AsTarget {
    fn as_target(&self) -> ObjectRef;
}

impl AsTarget for ObjectRef {
    fn as_target(&self) -> ObjectRef {
        self.clone()
    }
}

impl<T: AsTarget + ?Sized> AsTarget for &T {
    fn as_target(&self) -> ObjectRef {
        (**self).as_target()
    }
}

impl<T: AsTarget + ?Sized> AsTarget for Arc<T> {
    fn as_target(&self) -> ObjectRef {
        (**self).as_target()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_object_is_distinct() {
        let ty = TypeInfo::builder("Widget").build();
        let a = ObjectRef::new(ty.clone());
        let b = ObjectRef::new(ty);

        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert!(a.to_string().starts_with("Widget#"));
    }
}
