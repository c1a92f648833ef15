//! Call configuration for fake objects.
//!
//! A fake is an object whose calls are answered by rules instead of
//! by an implementation. Types describe their members with a
//! [`TypeInfo`]; a [`FakeRegistry`] creates fakes of those types; a
//! [`Configurator`] turns call specifications, usually written with
//! [`call!`], into rules registered on the fake.
//!
//! ```
//! use decoy::{call, Access, Configurator, FakeRegistry, TypeInfo};
//! use std::sync::Arc;
//!
//! let calculator = TypeInfo::builder("Calculator")
//!     .method::<(i32, i32), i32>("add", &["a", "b"])
//!     .property::<i32>("Result", Access::ReadWrite)
//!     .build();
//!
//! let registry = Arc::new(FakeRegistry::new());
//! let configurator = Configurator::new(registry.clone());
//! let calc = registry.create_fake(calculator);
//!
//! configurator
//!     .configure_call_returning::<i32>(&call!(calc.add(1, _)))
//!     .unwrap()
//!     .returns(100);
//!
//! assert_eq!(calc.call::<i32>("add", (1, 2)).unwrap(), 100);
//! // no rule matches `add(2, 2)`
//! assert!(calc.call::<i32>("add", (2, 2)).is_err());
//! ```

mod args;
mod call;
mod configuration;
mod configurator;
mod error;
mod fake;
mod interception;
mod invocation;
mod manager;
mod member;
mod object;
mod options;
mod parser;
mod registry;
mod rule;
mod setter;
mod type_info;
mod value;

pub mod matcher;
pub mod render;

pub use args::{IntoValues, ParamTypes};
pub use call::{ArgumentDescriptor, ParsedCall};
pub use configuration::{
    AnyCallConfiguration, CallConfiguration, PropertySetterConfiguration,
    ReturnValueConfiguration,
};
pub use configurator::{Configurator, ConfiguratorBuilder};
pub use error::{ConfigError, DispatchError, ParseError, SetterDerivationError};
pub use fake::Fake;
pub use interception::{DefaultInterceptor, Interceptor};
pub use invocation::Invocation;
pub use manager::FakeManager;
pub use matcher::Constraint;
pub use member::{Dispatch, MemberInfo, MemberKind, ParamInfo, TypeRef, INDEXER};
pub use object::{AsTarget, ObjectId, ObjectRef};
pub use options::FakeOptions;
pub use parser::{CallParser, CallSpec, ExpressionParser, SpecKind};
pub use registry::FakeRegistry;
pub use rule::{CallRule, DefaultRuleFactory, RuleFactory, RuleMatcher, Times};
pub use setter::{derive_setter_from_getter, derive_setter_with};
pub use type_info::{Access, TypeInfo, TypeInfoBuilder};
pub use value::{ArgValue, Value};

/// Captures a member access as a [`CallSpec`].
///
/// The receiver can be anything implementing [`AsTarget`], such as a
/// [`Fake`] or an [`ObjectRef`]. Three shapes are supported:
///
/// * `call!(receiver.method(args...))`: a method call
/// * `call!(receiver.Property)`: a property read
/// * `call!(receiver[index])` or `call!(receiver[(i, j)])`: an indexer
///   read
///
/// Each argument is turned into a [`Constraint`]:
///
/// * `_`: any value of the parameter's type
/// * `expr` or `_ == expr`: a value equal to `expr`
/// * `_ = matcher`: a value accepted by the given
///   [`ArgMatcher`](matcher::ArgMatcher). The matcher has to implement
///   `ArgMatcher` for a single type, like the ones made by
///   [`pattern!`] with an explicit type.
///
/// ```
/// use decoy::{call, pattern, Access, FakeRegistry, SpecKind, TypeInfo};
///
/// let grid = TypeInfo::builder("Grid")
///     .method::<(i32,), bool>("contains", &["n"])
///     .property::<usize>("Len", Access::ReadOnly)
///     .indexer::<(i32, i32), String>(&["row", "column"], Access::ReadWrite)
///     .build();
/// let fake = FakeRegistry::new().create_fake(grid);
///
/// let contains = call!(fake.contains(_ = pattern!(i32 => 0..=9)));
/// assert_eq!(contains.kind(), SpecKind::Method);
/// assert!(!contains.arguments()[0].is_wildcard());
///
/// let len = call!(fake.Len);
/// assert_eq!(len.kind(), SpecKind::Property);
///
/// let cell = call!(fake[(1, _)]);
/// assert_eq!(cell.kind(), SpecKind::Index);
/// assert_eq!(cell.arguments().len(), 2);
/// ```
pub use decoy_macros::call;
