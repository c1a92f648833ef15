//! Handles returned by a [`Configurator`](crate::Configurator) to set
//! how the rule it just registered answers calls.
//!
//! The rule is live as soon as the handle exists: calls made on the
//! fake before any behavior is set get the default answer, `()` for
//! members returning `()` and an error for anything else.

use std::{marker::PhantomData, sync::Arc};

use tracing::debug;

use crate::{
    derive_setter_with,
    rule::Behavior,
    ArgValue, CallRule, ConfigError, Constraint, FakeManager, Interceptor, Invocation, ParsedCall,
    RuleFactory, TypeRef, Value,
};

/// Configures a rule registered for a call.
///
/// By default the rule answers every matching call. See [`times`]
/// and [`once`] to limit it.
///
/// [`times`]: CallConfiguration::times
/// [`once`]: CallConfiguration::once
#[derive(Clone, Debug)]
pub struct CallConfiguration {
    manager: Arc<FakeManager>,
    rule: Arc<CallRule>,
}

impl CallConfiguration {
    pub(crate) fn new(manager: Arc<FakeManager>, rule: Arc<CallRule>) -> Self {
        CallConfiguration { manager, rule }
    }

    /// Runs `callback` for every matching call; the call returns `()`.
    pub fn invokes(self, mut callback: impl FnMut(&Invocation) + Send + 'static) -> Self {
        self.rule.set_behavior(Behavior::invoke(move |invocation| {
            callback(invocation);
            Value::unit()
        }));
        self
    }

    /// Makes every matching call fail with `error`.
    ///
    /// The error is returned as the source of
    /// [`DispatchError::Raised`](crate::DispatchError::Raised).
    pub fn throws(self, error: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.rule.set_behavior(Behavior::Fail(Arc::new(error)));
        self
    }

    /// Answers matching calls with `()`.
    pub fn does_nothing(self) -> Self {
        self.rule.set_behavior(Behavior::Return(Value::unit()));
        self
    }

    /// Limits the rule to the next `times` matching calls. Zero
    /// exhausts it right away.
    pub fn times(self, times: usize) -> Self {
        self.rule.set_times(times);
        self
    }

    pub fn once(self) -> Self {
        self.times(1)
    }

    /// Only answer calls whose arguments satisfy `predicate`.
    ///
    /// `description` explains the predicate when a call is rejected.
    pub fn when_args(
        self,
        predicate: impl Fn(&Invocation) -> bool + Send + Sync + 'static,
        description: impl Into<String>,
    ) -> Self {
        self.rule
            .set_predicate(Arc::new(predicate), description.into());
        self
    }

    pub fn rule(&self) -> &Arc<CallRule> {
        &self.rule
    }

    pub fn manager(&self) -> &Arc<FakeManager> {
        &self.manager
    }

    fn returns_value(self, value: Value) -> Self {
        self.rule.set_behavior(Behavior::Return(value));
        self
    }

    fn returns_with<T: ArgValue>(
        self,
        mut callback: impl FnMut(&Invocation) -> T + Send + 'static,
    ) -> Self {
        self.rule
            .set_behavior(Behavior::invoke(move |invocation| Value::new(callback(invocation))));
        self
    }
}

// the shared surface of the typed handles, forwarded to their
// `CallConfiguration`
macro_rules! forward_configuration {
    ($handle:ident $(<$param:ident>)?) => {
        impl$(<$param>)? $handle$(<$param>)? {
            /// Runs `callback` for every matching call; the call returns `()`.
            pub fn invokes(self, callback: impl FnMut(&Invocation) + Send + 'static) -> Self {
                self.map(|config| config.invokes(callback))
            }

            /// Makes every matching call fail with `error`.
            pub fn throws(self, error: impl std::error::Error + Send + Sync + 'static) -> Self {
                self.map(|config| config.throws(error))
            }

            /// Answers matching calls with `()`.
            pub fn does_nothing(self) -> Self {
                self.map(CallConfiguration::does_nothing)
            }

            /// Limits the rule to the next `times` matching calls.
            pub fn times(self, times: usize) -> Self {
                self.map(|config| config.times(times))
            }

            pub fn once(self) -> Self {
                self.map(CallConfiguration::once)
            }

            /// Only answer calls whose arguments satisfy `predicate`.
            pub fn when_args(
                self,
                predicate: impl Fn(&Invocation) -> bool + Send + Sync + 'static,
                description: impl Into<String>,
            ) -> Self {
                self.map(|config| config.when_args(predicate, description))
            }

            pub fn rule(&self) -> &Arc<CallRule> {
                self.inner.rule()
            }

            pub fn manager(&self) -> &Arc<FakeManager> {
                self.inner.manager()
            }

            fn map(mut self, f: impl FnOnce(CallConfiguration) -> CallConfiguration) -> Self {
                self.inner = f(self.inner);
                self
            }
        }
    };
}

/// Configures a rule registered for a call to a member returning `T`.
///
/// ```
/// use decoy::{call, Configurator, FakeRegistry, TypeInfo};
/// use std::sync::Arc;
///
/// let calculator = TypeInfo::builder("Calculator")
///     .method::<(i32, i32), i32>("add", &["a", "b"])
///     .build();
/// let registry = Arc::new(FakeRegistry::new());
/// let calc = registry.create_fake(calculator);
///
/// Configurator::new(registry.clone())
///     .configure_call_returning::<i32>(&call!(calc.add(1, _)))
///     .unwrap()
///     .returns(10)
///     .once();
///
/// assert_eq!(calc.call::<i32>("add", (1, 2)).unwrap(), 10);
/// // exhausted
/// assert!(calc.call::<i32>("add", (1, 2)).is_err());
/// ```
#[derive(Debug)]
pub struct ReturnValueConfiguration<T> {
    inner: CallConfiguration,
    // handles do not own a T
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ReturnValueConfiguration<T> {
    fn clone(&self) -> Self {
        ReturnValueConfiguration {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: ArgValue + Clone> ReturnValueConfiguration<T> {
    pub(crate) fn new(inner: CallConfiguration) -> Self {
        ReturnValueConfiguration {
            inner,
            _marker: PhantomData,
        }
    }

    /// Answers matching calls with a clone of `value`.
    pub fn returns(self, value: T) -> Self {
        self.map(|config| config.returns_value(Value::new(value)))
    }

    /// Answers matching calls with whatever `callback` returns for
    /// them.
    pub fn returns_lazily(self, callback: impl FnMut(&Invocation) -> T + Send + 'static) -> Self {
        self.map(|config| config.returns_with(callback))
    }
}

forward_configuration!(ReturnValueConfiguration<T>);

/// Configures a rule answering every call on a fake.
#[derive(Clone, Debug)]
pub struct AnyCallConfiguration {
    inner: CallConfiguration,
}

impl AnyCallConfiguration {
    pub(crate) fn new(inner: CallConfiguration) -> Self {
        AnyCallConfiguration { inner }
    }

    /// Narrows the rule to members returning `T`.
    ///
    /// Calls to members returning anything else are left to other
    /// rules.
    pub fn with_return_type<T: ArgValue + Clone>(self) -> ReturnValueConfiguration<T> {
        self.inner.rule().set_return_type(TypeRef::of::<T>());
        ReturnValueConfiguration::new(self.inner)
    }
}

forward_configuration!(AnyCallConfiguration);

/// Configures a rule registered for assignments to a property or an
/// indexer.
///
/// By default any value of type `TValue` is matched; [`to`] and
/// [`to_value`] narrow that down.
///
/// [`to`]: PropertySetterConfiguration::to
/// [`to_value`]: PropertySetterConfiguration::to_value
pub struct PropertySetterConfiguration<TValue> {
    inner: CallConfiguration,
    getter: ParsedCall,
    interceptor: Arc<dyn Interceptor>,
    rule_factory: Arc<dyn RuleFactory>,
    _marker: PhantomData<fn(TValue)>,
}

impl<TValue: ArgValue> PropertySetterConfiguration<TValue> {
    pub(crate) fn new(
        inner: CallConfiguration,
        getter: ParsedCall,
        interceptor: Arc<dyn Interceptor>,
        rule_factory: Arc<dyn RuleFactory>,
    ) -> Self {
        PropertySetterConfiguration {
            inner,
            getter,
            interceptor,
            rule_factory,
            _marker: PhantomData,
        }
    }

    /// Only match assignments of values satisfying `value`.
    ///
    /// The registered rule is replaced by one for the narrowed
    /// assignment. Its behavior and limits are kept. Fails if the rule
    /// was removed from its fake in the meantime.
    pub fn to(self, value: Constraint) -> Result<Self, ConfigError> {
        let setter = derive_setter_with(&self.getter, value)?;
        self.interceptor
            .check(setter.member(), setter.target())
            .map_err(|reason| ConfigError::Interception {
                member: setter.to_string(),
                reason,
            })?;

        let rule = Arc::new(self.rule_factory.build(setter));
        let manager = self.inner.manager().clone();
        let replaced = rule.take_over_from(self.inner.rule(), || {
            manager.replace_rule(self.inner.rule(), rule.clone())
        });
        if !replaced {
            return Err(ConfigError::Unregistered {
                rule: self.inner.rule().to_string(),
            });
        }
        debug!(getter = %self.getter, rule = %rule, "narrowed setter rule");

        Ok(PropertySetterConfiguration {
            inner: CallConfiguration::new(manager, rule),
            ..self
        })
    }

    /// Only match assignments of values equal to `value`.
    pub fn to_value(self, value: TValue) -> Result<Self, ConfigError>
    where
        TValue: PartialEq,
    {
        self.to(Constraint::eq(value))
    }

    /// The getter call the assignment was derived from.
    pub fn getter(&self) -> &ParsedCall {
        &self.getter
    }
}

impl<TValue> std::fmt::Debug for PropertySetterConfiguration<TValue> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertySetterConfiguration")
            .field("getter", &self.getter)
            .field("rule", self.inner.rule())
            .finish()
    }
}

forward_configuration!(PropertySetterConfiguration<TValue>);
