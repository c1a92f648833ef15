use super::ArgMatcher;
use std::fmt::{self, Formatter};

/// Matcher that matches any argument.
///
/// Produced by [`any()`].
pub struct Any;

impl<Arg: ?Sized> ArgMatcher<Arg> for Any {
    fn matches(&self, _: &Arg) -> bool {
        true
    }
}

impl fmt::Display for Any {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "_")
    }
}

/// Returns a matcher that matches any argument.
///
/// ```
/// use decoy::matcher::{self, ArgMatcher};
///
/// assert!(matcher::any().matches(&5));
/// assert!(matcher::any().matches("hello"));
/// ```
pub fn any() -> Any {
    Any
}
