use std::{
    any::Any,
    fmt::{self, Formatter},
    sync::Arc,
};

use crate::TypeRef;

/// Values that can flow through a fake as arguments or return values.
///
/// Implemented for every `'static` type that is `Debug`, `Send` and
/// `Sync`.
pub trait ArgValue: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + Send + Sync> ArgValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A type-erased argument or return value.
///
/// Cloning a `Value` is cheap: the underlying value is shared.
#[derive(Clone)]
pub struct Value {
    ty: TypeRef,
    inner: Arc<dyn ArgValue>,
}

impl Value {
    pub fn new<T: ArgValue>(value: T) -> Self {
        Value {
            ty: TypeRef::of::<T>(),
            inner: Arc::new(value),
        }
    }

    pub fn unit() -> Self {
        Value::new(())
    }

    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.ty == TypeRef::of::<T>()
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        // go through the trait object; the `Arc` is an `ArgValue` too
        ArgValue::as_any(&*self.inner).downcast_ref()
    }

    pub fn as_any(&self) -> &dyn Any {
        ArgValue::as_any(&*self.inner)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}
