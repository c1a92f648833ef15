use paste::paste;

use crate::{ArgValue, TypeRef, Value};

/// Parameter lists, spelled as tuples.
///
/// Implemented for tuples of up to ten elements. A single parameter
/// is a one element tuple: `(i32,)`.
pub trait ParamTypes {
    fn types() -> Vec<TypeRef>;
}

/// Argument lists, spelled as tuples.
///
/// Implemented for tuples of up to ten [`ArgValue`]s. A single
/// argument is a one element tuple: `(5,)`.
pub trait IntoValues {
    fn into_values(self) -> Vec<Value>;
}

impl ParamTypes for () {
    fn types() -> Vec<TypeRef> {
        vec![]
    }
}

impl IntoValues for () {
    fn into_values(self) -> Vec<Value> {
        vec![]
    }
}

impl IntoValues for Vec<Value> {
    fn into_values(self) -> Vec<Value> {
        self
    }
}

// (a,b,c) => tuple!(b,c)
macro_rules! peel {
    ($idx:tt, $($other:tt,)*) => (tuple! { $($other,)* })
}

// implement ParamTypes and IntoValues for tuples
macro_rules! tuple {
    () => ();
    ($($idx:tt,)+) => (
        paste! {
            impl<$([<A $idx>]: 'static),+> ParamTypes for ($([<A $idx>],)+) {
                fn types() -> Vec<TypeRef> {
                    vec![$(TypeRef::of::<[<A $idx>]>()),+]
                }
            }

            impl<$([<A $idx>]: ArgValue),+> IntoValues for ($([<A $idx>],)+) {
                fn into_values(self) -> Vec<Value> {
                    let ($([<a $idx>],)+) = self;
                    vec![$(Value::new([<a $idx>])),+]
                }
            }
        }
        peel! { $($idx,)+ }
    )
}

tuple! { 9, 8, 7, 6, 5, 4, 3, 2, 1, 0, }
