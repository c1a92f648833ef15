//! Tools to check if an argument of a call satisfies an expectation.
//!
//! [`ArgMatcher`]s are typed: they know the type of the argument they
//! look at. A [`Constraint`] wraps an `ArgMatcher` so it can be
//! stored in a call description and checked against type-erased
//! [`Value`](crate::Value)s.

mod any;
mod constraint;
mod eq;
mod from_fn;

pub use any::{any, Any};
pub use constraint::Constraint;
pub use eq::{eq, Eq};
pub use from_fn::FnMatcher;

use std::fmt;

/// Matcher for single argument of a method.
///
/// Implementors provide an expectation to match an argument against.
///
/// `decoy` provides [`any()`] and [`eq()`], plus the
/// [`pattern!`](crate::pattern!) and [`from_fn!`](crate::from_fn!)
/// macros which build an [`FnMatcher`].
///
/// # Examples
///
/// ## Simple matcher
///
/// ```
/// use decoy::matcher::ArgMatcher;
/// use std::fmt::{self, Formatter};
///
/// struct HasLength(usize);
///
/// // displayed as the expectation when an argument does not match
/// impl fmt::Display for HasLength {
///     fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
///         write!(f, "_.len() == {}", self.0)
///     }
/// }
///
/// impl<T> ArgMatcher<Vec<T>> for HasLength {
///     fn matches(&self, argument: &Vec<T>) -> bool {
///         argument.len() == self.0
///     }
/// }
///
/// assert!(HasLength(2).matches(&vec![1, 2]));
/// assert!(!HasLength(2).matches(&vec![1]));
/// ```
pub trait ArgMatcher<Arg: ?Sized>: fmt::Display {
    /// Checks if the argument matches the determined expectation.
    fn matches(&self, argument: &Arg) -> bool;
}
