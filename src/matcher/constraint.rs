use std::{
    any::Any,
    fmt::{self, Formatter},
    sync::Arc,
};

use super::{eq, ArgMatcher};
use crate::{TypeRef, Value};

/// A type-erased expectation on one argument of a call.
///
/// Constraints are either wildcards, which accept any value of the
/// parameter's type, or typed checks built from an [`ArgMatcher`].
///
/// [`Constraint::any`] does not know its type yet; it takes the type
/// of the parameter it ends up bound to when the call is parsed.
#[derive(Clone)]
pub struct Constraint {
    description: String,
    kind: Kind,
}

#[derive(Clone)]
enum Kind {
    Unbound,
    Any(TypeRef),
    Typed {
        ty: TypeRef,
        check: Arc<dyn Fn(&dyn Any) -> bool + Send + Sync>,
    },
}

impl Constraint {
    /// Matches any value of whatever parameter it is bound to.
    pub fn any() -> Self {
        Constraint {
            description: "_".to_string(),
            kind: Kind::Unbound,
        }
    }

    /// Matches any value of type `T`.
    pub fn any_of<T: 'static>() -> Self {
        Constraint {
            description: "_".to_string(),
            kind: Kind::Any(TypeRef::of::<T>()),
        }
    }

    /// Matches values equal to `expected`.
    pub fn eq<T>(expected: T) -> Self
    where
        T: fmt::Debug + PartialEq + Send + Sync + 'static,
    {
        Constraint::matching::<T, _>(eq(expected))
    }

    /// Matches values of type `T` accepted by `matcher`.
    ///
    /// ```
    /// use decoy::{matcher, Constraint, Value};
    ///
    /// let hello = Constraint::matching::<String, _>(matcher::eq(String::from("hello")));
    /// assert!(hello.matches(&Value::new(String::from("hello"))));
    /// assert!(!hello.matches(&Value::new("hello")));
    /// assert_eq!(hello.to_string(), "\"hello\"");
    /// ```
    pub fn matching<T, M>(matcher: M) -> Self
    where
        T: 'static,
        M: ArgMatcher<T> + Send + Sync + 'static,
    {
        let description = matcher.to_string();
        let check = move |value: &dyn Any| {
            value
                .downcast_ref::<T>()
                .map_or(false, |value| matcher.matches(value))
        };

        Constraint {
            description,
            kind: Kind::Typed {
                ty: TypeRef::of::<T>(),
                check: Arc::new(check),
            },
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The type of value this constraint applies to; `None` for an
    /// unbound wildcard.
    pub fn value_type(&self) -> Option<TypeRef> {
        match &self.kind {
            Kind::Unbound => None,
            Kind::Any(ty) | Kind::Typed { ty, .. } => Some(*ty),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.kind, Kind::Unbound | Kind::Any(_))
    }

    /// Whether the constraint can stand for a parameter of type `ty`.
    pub fn accepts(&self, ty: TypeRef) -> bool {
        self.value_type().map_or(true, |own| own == ty)
    }

    /// Fixes the type of an unbound wildcard; typed constraints are
    /// returned untouched.
    pub fn bind(self, ty: TypeRef) -> Self {
        match self.kind {
            Kind::Unbound => Constraint {
                description: self.description,
                kind: Kind::Any(ty),
            },
            _ => self,
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        match &self.kind {
            Kind::Unbound => true,
            Kind::Any(ty) => value.ty() == *ty,
            Kind::Typed { ty, check } => value.ty() == *ty && check(value.as_any()),
        }
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
            && self.value_type() == other.value_type()
            && self.is_wildcard() == other.is_wildcard()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Constraint");
        debug.field("description", &self.description);
        match self.value_type() {
            Some(ty) => debug.field("type", &ty),
            None => debug.field("type", &"<unbound>"),
        };
        debug.finish()
    }
}
