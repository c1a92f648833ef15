use std::{
    collections::HashMap,
    sync::{Arc, Weak},
};

use parking_lot::Mutex;
use tracing::debug;

use crate::{Fake, FakeManager, FakeOptions, ObjectId, ObjectRef, TypeInfo};

/// Knows which objects are fakes.
///
/// The registry only holds weak references: a fake is forgotten once
/// every [`Fake`] handle to it has been dropped.
#[derive(Default)]
pub struct FakeRegistry {
    fakes: Mutex<HashMap<ObjectId, Weak<FakeManager>>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        FakeRegistry::default()
    }

    /// Creates a fake of the given type with the default options.
    pub fn create_fake(&self, type_info: Arc<TypeInfo>) -> Fake {
        self.create_fake_with(type_info, FakeOptions::default())
    }

    pub fn create_fake_with(&self, type_info: Arc<TypeInfo>, options: FakeOptions) -> Fake {
        let object = ObjectRef::new(type_info);
        let manager = Arc::new(FakeManager::new(object.clone(), options));

        let mut fakes = self.fakes.lock();
        fakes.retain(|_, fake| fake.strong_count() > 0);
        fakes.insert(object.id(), Arc::downgrade(&manager));
        debug!(fake = %object, ?options, "created fake");

        Fake::new(manager)
    }

    /// The manager of `target`, if it is a live fake of this registry.
    pub fn lookup(&self, target: &ObjectRef) -> Option<Arc<FakeManager>> {
        let mut fakes = self.fakes.lock();
        fakes.retain(|_, fake| fake.strong_count() > 0);
        fakes.get(&target.id()).and_then(Weak::upgrade)
    }

    pub fn is_fake(&self, target: &ObjectRef) -> bool {
        self.lookup(target).is_some()
    }

    /// How many live fakes the registry knows about.
    pub fn len(&self) -> usize {
        self.fakes
            .lock()
            .values()
            .filter(|fake| fake.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for FakeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeRegistry")
            .field("fakes", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forgets_dropped_fakes() {
        let registry = FakeRegistry::new();
        let ty = TypeInfo::builder("Service").build();

        let fake = registry.create_fake(ty.clone());
        let object = fake.object().clone();
        assert!(registry.is_fake(&object));
        assert_eq!(registry.len(), 1);

        let clone = fake.clone();
        drop(fake);
        assert!(registry.is_fake(&object));

        drop(clone);
        assert!(!registry.is_fake(&object));
        assert!(registry.is_empty());
    }

    #[test]
    fn plain_objects_are_not_fakes() {
        let registry = FakeRegistry::new();
        let ty = TypeInfo::builder("Service").build();
        let _fake = registry.create_fake(ty.clone());

        assert!(!registry.is_fake(&ObjectRef::new(ty)));
    }

    #[test]
    fn fakes_belong_to_their_registry() {
        let ty = TypeInfo::builder("Service").build();
        let fake = FakeRegistry::new().create_fake(ty);

        assert!(!FakeRegistry::new().is_fake(fake.object()));
    }
}
