use super::ArgMatcher;
use std::{fmt, marker::PhantomData};

/// An [`ArgMatcher`] made from a closure and the text describing it.
///
/// Usually built through [`from_fn!`](crate::from_fn!) or
/// [`pattern!`](crate::pattern!), which describe the matcher with its
/// own source text.
pub struct FnMatcher<Arg: ?Sized, F> {
    check: F,
    description: String,
    _arg: PhantomData<fn(&Arg)>,
}

impl<Arg: ?Sized, F: Fn(&Arg) -> bool> FnMatcher<Arg, F> {
    pub fn new(check: F, description: impl Into<String>) -> Self {
        FnMatcher {
            check,
            description: description.into(),
            _arg: PhantomData,
        }
    }
}

impl<Arg: ?Sized, F: Fn(&Arg) -> bool> ArgMatcher<Arg> for FnMatcher<Arg, F> {
    fn matches(&self, argument: &Arg) -> bool {
        (self.check)(argument)
    }
}

impl<Arg: ?Sized, F> fmt::Display for FnMatcher<Arg, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Builds an [`FnMatcher`] from a closure, described by the closure's
/// source text in mismatch reports.
///
/// ```
/// use decoy::{from_fn, matcher::ArgMatcher, Constraint, Value};
///
/// let positive = from_fn!(|n: &i32| *n > 0);
/// assert!(positive.matches(&3));
/// assert!(!positive.matches(&-3));
///
/// let constraint = Constraint::matching(positive);
/// assert!(constraint.matches(&Value::new(7)));
/// ```
#[macro_export]
macro_rules! from_fn {
    ($check:expr) => {
        $crate::matcher::FnMatcher::new($check, stringify!($check))
    };
}

/// Builds an [`FnMatcher`] accepting arguments that match a pattern.
///
/// Written either `pattern!(pattern)` or `pattern!(type => pattern)`.
/// The typed form is needed when nothing else fixes the argument type,
/// such as inside `call!`. Alternatives and a trailing `if` guard are
/// allowed.
///
/// ```
/// use decoy::{pattern, matcher::ArgMatcher};
///
/// let small = pattern!(i32 => 0..=9);
/// assert!(small.matches(&4));
/// assert!(!small.matches(&12));
///
/// let some_even = pattern!(Option<u32> => Some(n) if n % 2 == 0);
/// assert!(some_even.matches(&Some(4)));
/// assert!(!some_even.matches(&None));
/// ```
#[macro_export]
macro_rules! pattern {
    ($( $pattern:pat_param )|+ $( if $guard:expr )? $(,)?) => {
        $crate::matcher::FnMatcher::new(
            move |arg| matches!(arg, $( $pattern )|+ $( if $guard )?),
            stringify!($( $pattern )|+ $( if $guard )?),
        )
    };
    ($ty:ty => $( $pattern:pat_param )|+ $( if $guard:expr )? $(,)?) => {
        $crate::matcher::FnMatcher::new(
            move |arg: &$ty| matches!(arg, $( $pattern )|+ $( if $guard )?),
            stringify!($( $pattern )|+ $( if $guard )?),
        )
    };
}
