use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::{
    rule::Skipped, CallRule, DispatchError, FakeOptions, Invocation, ObjectRef, Value,
};

/// The rules and recorded calls of one fake.
///
/// Rules are kept in registration order. A call is answered by the
/// newest member specific rule that applies to it, and only when none
/// does by the newest applicable any-call rule.
pub struct FakeManager {
    object: ObjectRef,
    options: FakeOptions,
    rules: RwLock<Vec<Arc<CallRule>>>,
    calls: Mutex<Vec<Invocation>>,
}

impl FakeManager {
    pub(crate) fn new(object: ObjectRef, options: FakeOptions) -> Self {
        FakeManager {
            object,
            options,
            rules: RwLock::default(),
            calls: Mutex::default(),
        }
    }

    /// The fake this manager is for.
    pub fn object(&self) -> &ObjectRef {
        &self.object
    }

    pub fn options(&self) -> FakeOptions {
        self.options
    }

    pub fn add_rule(&self, rule: Arc<CallRule>) {
        debug!(fake = %self.object, rule = %rule, "registered call rule");
        self.rules.write().push(rule);
    }

    /// Puts `new` where `old` was. Returns false, and does nothing,
    /// if `old` is not registered here.
    pub fn replace_rule(&self, old: &Arc<CallRule>, new: Arc<CallRule>) -> bool {
        let mut rules = self.rules.write();
        match rules.iter().position(|rule| Arc::ptr_eq(rule, old)) {
            Some(index) => {
                debug!(fake = %self.object, old = %old, new = %new, "replaced call rule");
                rules[index] = new;
                true
            }
            None => false,
        }
    }

    pub fn remove_rule(&self, rule: &Arc<CallRule>) -> bool {
        let mut rules = self.rules.write();
        let before = rules.len();
        rules.retain(|r| !Arc::ptr_eq(r, rule));
        rules.len() != before
    }

    /// The registered rules, oldest first.
    pub fn rules(&self) -> Vec<Arc<CallRule>> {
        self.rules.read().clone()
    }

    /// Every call made on the fake so far, oldest first.
    pub fn recorded_calls(&self) -> Vec<Invocation> {
        self.calls.lock().clone()
    }

    /// Answers a call made on the fake.
    pub fn intercept(&self, invocation: Invocation) -> Result<Value, DispatchError> {
        trace!(call = %invocation, "intercepting");

        if self.options.record_calls {
            self.calls.lock().push(invocation.clone());
        }

        // rules may configure this same fake while they run
        let rules = self.rules.read().clone();
        let (any_call, specific): (Vec<_>, Vec<_>) =
            rules.iter().partition(|rule| rule.is_any_call());

        let mut reasons = vec![];
        for rule in specific.into_iter().rev().chain(any_call.into_iter().rev()) {
            match rule.apply(&invocation) {
                Ok(answer) => {
                    trace!(call = %invocation, rule = %rule, "answered");
                    return answer;
                }
                Err(Skipped::Unrelated) => {}
                Err(Skipped::Mismatch(reason)) => reasons.push(reason),
                Err(Skipped::Exhausted) => reasons.push(format!(
                    "{}\n  Already answered {} time(s); no answers left.",
                    rule,
                    rule.applied()
                )),
            }
        }

        if invocation.member().return_type().is_unit() && !self.options.strict {
            trace!(call = %invocation, "unconfigured call completed");
            return Ok(Value::unit());
        }

        Err(DispatchError::Unconfigured {
            call: invocation.to_string(),
            reasons,
        })
    }
}

impl std::fmt::Debug for FakeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeManager")
            .field("object", &self.object)
            .field("options", &self.options)
            .field("rules", &self.rules.read().len())
            .finish()
    }
}
