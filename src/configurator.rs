use std::sync::Arc;

use tracing::debug;

use crate::{
    derive_setter_from_getter, AnyCallConfiguration, ArgValue, AsTarget, CallConfiguration,
    CallParser, CallRule, CallSpec, ConfigError, DefaultInterceptor, DefaultRuleFactory,
    ExpressionParser, FakeManager, FakeRegistry, Interceptor, ObjectRef, ParsedCall,
    PropertySetterConfiguration, ReturnValueConfiguration, RuleFactory, TypeRef,
};

/// Entry point for configuring how fakes answer calls.
///
/// Every `configure_*` operation validates the whole request before
/// touching the fake: when one returns an error, no rule has been
/// registered.
///
/// ```
/// use decoy::{call, Access, Configurator, FakeRegistry, TypeInfo};
/// use std::sync::Arc;
///
/// let thermostat = TypeInfo::builder("Thermostat")
///     .property::<f32>("Target", Access::ReadWrite)
///     .build();
/// let registry = Arc::new(FakeRegistry::new());
/// let configurator = Configurator::new(registry.clone());
/// let fake = registry.create_fake(thermostat);
///
/// configurator
///     .configure_call_returning::<f32>(&call!(fake.Target))
///     .unwrap()
///     .returns(21.5);
///
/// assert_eq!(fake.get::<f32>("Target").unwrap(), 21.5);
/// ```
pub struct Configurator {
    registry: Arc<FakeRegistry>,
    parser: Arc<dyn CallParser>,
    interceptor: Arc<dyn Interceptor>,
    rule_factory: Arc<dyn RuleFactory>,
}

impl Configurator {
    /// A configurator for the fakes of `registry` with the default
    /// parser, interception policy and rule factory.
    pub fn new(registry: Arc<FakeRegistry>) -> Self {
        Configurator::builder(registry).build()
    }

    pub fn builder(registry: Arc<FakeRegistry>) -> ConfiguratorBuilder {
        ConfiguratorBuilder {
            registry,
            parser: Arc::new(ExpressionParser),
            interceptor: Arc::new(DefaultInterceptor),
            rule_factory: Arc::new(DefaultRuleFactory),
        }
    }

    pub fn registry(&self) -> &Arc<FakeRegistry> {
        &self.registry
    }

    /// Registers a rule for the call described by `spec`.
    pub fn configure_call(&self, spec: &CallSpec) -> Result<CallConfiguration, ConfigError> {
        let call = self.parse(spec)?;
        self.register(call)
    }

    /// Registers a rule for the call described by `spec`, whose member
    /// must return `T`.
    pub fn configure_call_returning<T: ArgValue + Clone>(
        &self,
        spec: &CallSpec,
    ) -> Result<ReturnValueConfiguration<T>, ConfigError> {
        let call = self.parse(spec)?;

        let returns = call.member().return_type();
        if returns != TypeRef::of::<T>() {
            return Err(ConfigError::Precondition(format!(
                "{} returns {}, not {}",
                call,
                returns,
                TypeRef::of::<T>()
            )));
        }

        self.register(call).map(ReturnValueConfiguration::new)
    }

    /// Registers a rule answering any call made on `target`.
    ///
    /// Rules for specific calls take precedence over it, whenever they
    /// were registered.
    pub fn configure_any_call(
        &self,
        target: &impl AsTarget,
    ) -> Result<AnyCallConfiguration, ConfigError> {
        let target = target.as_target();
        let manager = self.ensure_is_fake(Some(&target))?.ok_or_else(|| {
            ConfigError::Precondition(format!("{} has no owning fake", target))
        })?;

        let rule = Arc::new(self.rule_factory.build_any_call(&target));
        manager.add_rule(rule.clone());

        Ok(AnyCallConfiguration::new(CallConfiguration::new(manager, rule)))
    }

    /// Registers a rule for assignments to the property or indexer read
    /// by `spec`.
    ///
    /// ```
    /// use decoy::{call, Access, Configurator, FakeRegistry, TypeInfo};
    /// use std::sync::{Arc, Mutex};
    ///
    /// let account = TypeInfo::builder("Account")
    ///     .property::<i64>("Balance", Access::ReadWrite)
    ///     .build();
    /// let registry = Arc::new(FakeRegistry::new());
    /// let fake = registry.create_fake(account);
    /// let seen = Arc::new(Mutex::new(vec![]));
    ///
    /// let log = seen.clone();
    /// Configurator::new(registry.clone())
    ///     .configure_setter::<i64>(&call!(fake.Balance))
    ///     .unwrap()
    ///     .invokes(move |assignment| {
    ///         log.lock().unwrap().extend(assignment.argument::<i64>(0).copied());
    ///     });
    ///
    /// fake.set("Balance", 100_i64).unwrap();
    /// assert_eq!(*seen.lock().unwrap(), vec![100]);
    /// ```
    pub fn configure_setter<TValue: ArgValue>(
        &self,
        spec: &CallSpec,
    ) -> Result<PropertySetterConfiguration<TValue>, ConfigError> {
        let getter = self.parse(spec)?;
        let setter = derive_setter_from_getter::<TValue>(&getter)?;
        let configuration = self.register(setter)?;

        Ok(PropertySetterConfiguration::new(
            configuration,
            getter,
            self.interceptor.clone(),
            self.rule_factory.clone(),
        ))
    }

    // precondition, parsing and the guards shared by every call path
    fn parse(&self, spec: &CallSpec) -> Result<ParsedCall, ConfigError> {
        if spec.name().is_empty() {
            return Err(ConfigError::Precondition(
                "the call specification does not name a member".to_string(),
            ));
        }

        let call = self.parser.parse(spec)?;
        self.ensure_is_fake(call.target())?;
        self.ensure_interceptable(&call)?;
        Ok(call)
    }

    fn register(&self, call: ParsedCall) -> Result<CallConfiguration, ConfigError> {
        // setters come here after their getter has been checked
        self.ensure_interceptable(&call)?;

        let manager = self.manager_of(&call)?;
        let rule: Arc<CallRule> = Arc::new(self.rule_factory.build(call));
        manager.add_rule(rule.clone());

        Ok(CallConfiguration::new(manager, rule))
    }

    fn ensure_is_fake(
        &self,
        target: Option<&ObjectRef>,
    ) -> Result<Option<Arc<FakeManager>>, ConfigError> {
        match target {
            None => Ok(None),
            Some(target) => match self.registry.lookup(target) {
                Some(manager) => Ok(Some(manager)),
                None => Err(ConfigError::NotAFake {
                    target: target.to_string(),
                }),
            },
        }
    }

    fn ensure_interceptable(&self, call: &ParsedCall) -> Result<(), ConfigError> {
        self.interceptor
            .check(call.member(), call.target())
            .map_err(|reason| {
                debug!(call = %call, %reason, "rejected non-interceptable call");
                ConfigError::Interception {
                    member: call.to_string(),
                    reason,
                }
            })
    }

    fn manager_of(&self, call: &ParsedCall) -> Result<Arc<FakeManager>, ConfigError> {
        self.ensure_is_fake(call.target())?
            .ok_or_else(|| ConfigError::Precondition(format!("{} has no owning fake", call)))
    }
}

/// Replaces the collaborators of a [`Configurator`].
pub struct ConfiguratorBuilder {
    registry: Arc<FakeRegistry>,
    parser: Arc<dyn CallParser>,
    interceptor: Arc<dyn Interceptor>,
    rule_factory: Arc<dyn RuleFactory>,
}

impl ConfiguratorBuilder {
    pub fn parser(mut self, parser: impl CallParser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    pub fn interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptor = Arc::new(interceptor);
        self
    }

    pub fn rule_factory(mut self, rule_factory: impl RuleFactory + 'static) -> Self {
        self.rule_factory = Arc::new(rule_factory);
        self
    }

    pub fn build(self) -> Configurator {
        Configurator {
            registry: self.registry,
            parser: self.parser,
            interceptor: self.interceptor,
            rule_factory: self.rule_factory,
        }
    }
}
