use std::{borrow::Borrow, fmt};

use super::ArgMatcher;

/// Accepts arguments equal to the held value, also through borrows: an
/// `Eq<String>` checks `String`s and `&String`s alike.
///
/// Described by the `Debug` output of the value.
pub struct Eq<Expected>(Expected);

impl<Arg, Expected> ArgMatcher<Arg> for Eq<Expected>
where
    Arg: Borrow<Expected>,
    Expected: fmt::Debug + PartialEq,
{
    fn matches(&self, actual: &Arg) -> bool {
        *actual.borrow() == self.0
    }
}

impl<Expected: fmt::Debug> fmt::Display for Eq<Expected> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// Matches arguments equal to `expected`.
///
/// ```
/// use decoy::matcher::{self, ArgMatcher};
///
/// let is_five = matcher::eq(5);
/// assert!(ArgMatcher::<i32>::matches(&is_five, &5));
/// assert!(!ArgMatcher::<i32>::matches(&is_five, &4));
/// assert_eq!(is_five.to_string(), "5");
/// ```
pub fn eq<Expected: fmt::Debug + PartialEq>(expected: Expected) -> Eq<Expected> {
    Eq(expected)
}
