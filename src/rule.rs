use std::{
    fmt::{self, Formatter},
    num::NonZeroUsize,
    sync::Arc,
};

use parking_lot::Mutex;

use crate::{render, DispatchError, Invocation, ObjectId, ObjectRef, ParsedCall, TypeRef, Value};

/// Which calls a rule applies to.
#[derive(Clone, Debug)]
pub enum RuleMatcher {
    /// Calls to the member of the parsed call, on its target, with
    /// arguments that satisfy its constraints.
    Call(ParsedCall),
    /// Every call made on the target.
    AnyCall { target: ObjectId, description: String },
}

type Callback = Arc<Mutex<Box<dyn FnMut(&Invocation) -> Value + Send>>>;
type Predicate = Arc<dyn Fn(&Invocation) -> bool + Send + Sync>;

#[derive(Clone)]
pub(crate) enum Behavior {
    Default,
    Return(Value),
    Invoke(Callback),
    Fail(Arc<dyn std::error::Error + Send + Sync>),
}

impl Behavior {
    pub(crate) fn invoke(callback: impl FnMut(&Invocation) -> Value + Send + 'static) -> Self {
        Behavior::Invoke(Arc::new(Mutex::new(Box::new(callback))))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Times {
    Always,
    Times(NonZeroUsize),
}

impl Times {
    pub fn decrement(self) -> Option<Self> {
        match self {
            Times::Always => Some(self),
            Times::Times(n) => NonZeroUsize::new(n.get() - 1).map(Times::Times),
        }
    }
}

#[derive(Clone)]
struct RuleState {
    behavior: Behavior,
    // `None` once exhausted
    times: Option<Times>,
    predicate: Option<(Predicate, String)>,
    return_type: Option<TypeRef>,
    applied: usize,
}

impl Default for RuleState {
    fn default() -> Self {
        RuleState {
            behavior: Behavior::Default,
            times: Some(Times::Always),
            predicate: None,
            return_type: None,
            applied: 0,
        }
    }
}

/// Why a rule did not answer a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Skipped {
    /// The call is for another member or another fake.
    Unrelated,
    Mismatch(String),
    Exhausted,
}

/// A rule registered on a fake: what calls it matches and how it
/// answers them.
///
/// The matcher is fixed when the rule is built. Its behavior, call
/// count limit and extra filters are set through the configuration
/// handle that registered it, and may change after registration.
pub struct CallRule {
    matcher: RuleMatcher,
    state: Mutex<RuleState>,
}

impl CallRule {
    pub fn for_call(call: ParsedCall) -> Self {
        CallRule {
            matcher: RuleMatcher::Call(call),
            state: Mutex::default(),
        }
    }

    pub fn any_call(target: &ObjectRef) -> Self {
        CallRule {
            matcher: RuleMatcher::AnyCall {
                target: target.id(),
                description: format!("any call on {}", target),
            },
            state: Mutex::default(),
        }
    }

    pub fn matcher(&self) -> &RuleMatcher {
        &self.matcher
    }

    pub fn is_any_call(&self) -> bool {
        matches!(self.matcher, RuleMatcher::AnyCall { .. })
    }

    /// How many calls this rule has answered.
    pub fn applied(&self) -> usize {
        self.state.lock().applied
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.lock().times.is_none()
    }

    pub(crate) fn set_behavior(&self, behavior: Behavior) {
        self.state.lock().behavior = behavior;
    }

    pub(crate) fn set_times(&self, times: usize) {
        self.state.lock().times = NonZeroUsize::new(times).map(Times::Times);
    }

    pub(crate) fn set_predicate(&self, predicate: Predicate, description: String) {
        self.state.lock().predicate = Some((predicate, description));
    }

    pub(crate) fn set_return_type(&self, return_type: TypeRef) {
        self.state.lock().return_type = Some(return_type);
    }

    /// Copies the behavior, limits and filters of `other` into this
    /// rule, then runs `install`. Calls reaching `other` meanwhile wait
    /// until `install` returns.
    pub(crate) fn take_over_from<R>(&self, other: &CallRule, install: impl FnOnce() -> R) -> R {
        let state = other.state.lock();
        *self.state.lock() = state.clone();
        install()
    }

    /// Answers the invocation if this rule applies to it.
    ///
    /// The outer `Result` tells if the rule answered; the inner one is
    /// the answer.
    pub(crate) fn apply(
        &self,
        invocation: &Invocation,
    ) -> Result<Result<Value, DispatchError>, Skipped> {
        self.check_matcher(invocation)?;

        let predicate = {
            let state = self.state.lock();
            if let Some(return_type) = state.return_type {
                if invocation.member().return_type() != return_type {
                    return Err(Skipped::Unrelated);
                }
            }
            state.predicate.clone()
        };

        // evaluated unlocked: predicates may call into the fake, even this rule
        if let Some((predicate, description)) = predicate {
            if !predicate(invocation) {
                return Err(Skipped::Mismatch(format!(
                    "{} did not satisfy: {}",
                    invocation, description
                )));
            }
        }

        let answer = {
            let mut state = self.state.lock();
            let times = state.times.ok_or(Skipped::Exhausted)?;
            state.times = times.decrement();
            state.applied += 1;

            match &state.behavior {
                Behavior::Default => Answer::Default,
                Behavior::Return(value) => Answer::Ready(Ok(value.clone())),
                Behavior::Fail(error) => Answer::Ready(Err(DispatchError::Raised(error.clone()))),
                Behavior::Invoke(callback) => Answer::Callback(callback.clone()),
            }
        };

        // the state lock is released so callbacks may call into the fake
        Ok(match answer {
            Answer::Ready(answer) => answer,
            Answer::Callback(callback) => {
                let mut callback = callback.lock();
                Ok((*callback)(invocation))
            }
            Answer::Default if invocation.member().return_type().is_unit() => Ok(Value::unit()),
            Answer::Default => Err(DispatchError::NoReturnValue {
                call: invocation.to_string(),
            }),
        })
    }

    fn check_matcher(&self, invocation: &Invocation) -> Result<(), Skipped> {
        match &self.matcher {
            RuleMatcher::AnyCall { target, .. } => {
                if *target == invocation.target() {
                    Ok(())
                } else {
                    Err(Skipped::Unrelated)
                }
            }
            RuleMatcher::Call(call) => {
                let same_target = call.target().map(ObjectRef::id) == Some(invocation.target());
                let same_member = Arc::ptr_eq(call.member(), invocation.member())
                    || call.member() == invocation.member();
                if !same_target || !same_member {
                    return Err(Skipped::Unrelated);
                }

                let matched: Vec<bool> = call
                    .arguments()
                    .iter()
                    .zip(invocation.arguments())
                    .map(|(arg, value)| arg.constraint().matches(value))
                    .collect();

                if matched.len() == invocation.arguments().len() && matched.iter().all(|m| *m) {
                    return Ok(());
                }

                let expected: Vec<_> = call
                    .arguments()
                    .iter()
                    .map(|arg| arg.constraint().to_string())
                    .collect();
                let actual: Vec<_> = invocation
                    .arguments()
                    .iter()
                    .map(|value| format!("{:?}", value))
                    .collect();

                Err(Skipped::Mismatch(format!(
                    "{}\n{}",
                    render::describe(call),
                    mismatch(&expected, &actual, &matched)
                )))
            }
        }
    }
}

enum Answer {
    Default,
    Ready(Result<Value, DispatchError>),
    Callback(Callback),
}

/// Formats which arguments did not match their expectation.
fn mismatch(expected: &[String], actual: &[String], matched: &[bool]) -> String {
    let padded: Vec<(String, String)> = expected
        .iter()
        .zip(actual)
        .map(|(expected, actual)| {
            let width = expected.len().max(actual.len());
            (
                format!("{:<width$}", expected, width = width),
                format!("{:<width$}", actual, width = width),
            )
        })
        .collect();

    if let ([(expected, actual)], [_]) = (padded.as_slice(), matched) {
        return format!(
            "  Argument did not match.
    Expected: {}
    Actual:   {}",
            expected, actual
        );
    }

    let expected_line: Vec<_> = padded.iter().map(|(e, _)| e.as_str()).collect();
    let actual_line: Vec<_> = padded.iter().map(|(_, a)| a.as_str()).collect();
    let mut message = format!(
        "  Arguments did not match
    Expected: [{}]
    Actual:   [{}]",
        expected_line.join(", "),
        actual_line.join(", ")
    );

    padded
        .iter()
        .zip(matched)
        .enumerate()
        .filter(|(_, (_, did_match))| !**did_match)
        .for_each(|(i, ((expected, actual), _))| {
            message.push_str(&format!(
                "
    Argument {}:
      Expected: {}
      Actual:   {}",
                i, expected, actual
            ));
        });

    message
}

impl fmt::Display for CallRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.matcher {
            RuleMatcher::Call(call) => f.write_str(&render::describe(call)),
            RuleMatcher::AnyCall { description, .. } => f.write_str(description),
        }
    }
}

impl fmt::Debug for CallRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CallRule")
            .field("matcher", &self.to_string())
            .field(
                "behavior",
                match &state.behavior {
                    Behavior::Default => &"Default",
                    Behavior::Return(_) => &"Return",
                    Behavior::Invoke(_) => &"Invoke",
                    Behavior::Fail(_) => &"Fail",
                },
            )
            .field("times", &state.times)
            .field("applied", &state.applied)
            .finish()
    }
}

/// Builds the rules registered by a configuration.
pub trait RuleFactory: Send + Sync {
    fn build(&self, call: ParsedCall) -> CallRule;

    fn build_any_call(&self, target: &ObjectRef) -> CallRule;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultRuleFactory;

impl RuleFactory for DefaultRuleFactory {
    fn build(&self, call: ParsedCall) -> CallRule {
        CallRule::for_call(call)
    }

    fn build_any_call(&self, target: &ObjectRef) -> CallRule {
        CallRule::any_call(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Access, ArgumentDescriptor, CallParser, CallSpec, Constraint, ExpressionParser, IntoValues,
        MemberKind, TypeInfo,
    };

    struct Setup {
        calc: ObjectRef,
        add: ParsedCall,
    }

    fn setup() -> Setup {
        let ty = TypeInfo::builder("Calculator")
            .method::<(i32, i32), i32>("add", &["a", "b"])
            .method::<(), ()>("clear", &[])
            .property::<i32>("Result", Access::ReadWrite)
            .build();
        let calc = ObjectRef::new(ty);
        let add = ExpressionParser
            .parse(
                &CallSpec::method(&calc, "add")
                    .arg(Constraint::eq(1))
                    .arg(Constraint::any()),
            )
            .expect("add");

        Setup { calc, add }
    }

    fn invoke(target: &ObjectRef, kind: MemberKind, name: &str, args: impl IntoValues) -> Invocation {
        let member = target
            .type_info()
            .members_named(kind, name)
            .next()
            .cloned()
            .expect("member");
        Invocation::new(target.id(), target.type_info().name(), member, args.into_values())
    }

    #[test]
    fn answers_matching_calls() {
        let Setup { calc, add } = setup();
        let rule = CallRule::for_call(add);
        rule.set_behavior(Behavior::Return(Value::new(10)));

        let answer = rule
            .apply(&invoke(&calc, MemberKind::Method, "add", (1, 5)))
            .expect("applies")
            .expect("answers");
        assert_eq!(answer.downcast_ref::<i32>(), Some(&10));
        assert_eq!(rule.applied(), 1);
    }

    #[test]
    fn explains_argument_mismatches() {
        let Setup { calc, add } = setup();
        let rule = CallRule::for_call(add);

        let skipped = rule
            .apply(&invoke(&calc, MemberKind::Method, "add", (2, 5)))
            .unwrap_err();
        match skipped {
            Skipped::Mismatch(message) => {
                assert!(message.starts_with("Calculator.add(1, _)"));
                assert!(message.contains("Expected: [1, _]"));
                assert!(message.contains("Actual:   [2, 5]"));
                assert!(message.contains("Argument 0:"));
                assert!(!message.contains("Argument 1:"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn ignores_other_members_and_targets() {
        let Setup { calc, add } = setup();
        let rule = CallRule::for_call(add);

        let clear = invoke(&calc, MemberKind::Method, "clear", ());
        assert_eq!(rule.apply(&clear).unwrap_err(), Skipped::Unrelated);

        let other = ObjectRef::new(calc.type_info().clone());
        let add = invoke(&other, MemberKind::Method, "add", (1, 1));
        assert_eq!(rule.apply(&add).unwrap_err(), Skipped::Unrelated);
    }

    #[test]
    fn exhausts_after_the_given_times() {
        let Setup { calc, add } = setup();
        let rule = CallRule::for_call(add);
        rule.set_behavior(Behavior::Return(Value::new(3)));
        rule.set_times(2);

        let call = invoke(&calc, MemberKind::Method, "add", (1, 1));
        assert!(rule.apply(&call).is_ok());
        assert!(!rule.is_exhausted());
        assert!(rule.apply(&call).is_ok());
        assert!(rule.is_exhausted());
        assert_eq!(rule.apply(&call).unwrap_err(), Skipped::Exhausted);
    }

    #[test]
    fn default_behavior_only_answers_unit_members() {
        let Setup { calc, .. } = setup();
        let rule = CallRule::any_call(&calc);

        let clear = rule
            .apply(&invoke(&calc, MemberKind::Method, "clear", ()))
            .expect("applies");
        assert!(clear.expect("unit").is::<()>());

        let result = rule
            .apply(&invoke(&calc, MemberKind::Getter, "Result", ()))
            .expect("applies");
        assert!(matches!(result, Err(DispatchError::NoReturnValue { .. })));
    }

    #[test]
    fn callbacks_see_the_invocation() {
        let Setup { calc, add } = setup();
        let rule = CallRule::for_call(add);
        rule.set_behavior(Behavior::invoke(|invocation| {
            let a = invocation.argument::<i32>(0).copied().unwrap_or_default();
            let b = invocation.argument::<i32>(1).copied().unwrap_or_default();
            Value::new(a * 100 + b)
        }));

        let answer = rule
            .apply(&invoke(&calc, MemberKind::Method, "add", (1, 7)))
            .expect("applies")
            .expect("answers");
        assert_eq!(answer.downcast_ref::<i32>(), Some(&107));
    }

    #[test]
    fn copying_state_keeps_the_source_answering() {
        let Setup { calc, add } = setup();
        let old = CallRule::for_call(add.clone());
        old.set_behavior(Behavior::Return(Value::new(8)));
        old.set_times(1);

        let new = CallRule::for_call(add);
        assert!(new.take_over_from(&old, || true));

        let call = invoke(&calc, MemberKind::Method, "add", (1, 1));
        let answer = new.apply(&call).expect("applies").expect("answers");
        assert_eq!(answer.downcast_ref::<i32>(), Some(&8));
        assert!(new.is_exhausted());

        let answer = old.apply(&call).expect("applies").expect("answers");
        assert_eq!(answer.downcast_ref::<i32>(), Some(&8));
    }

    #[test]
    fn predicates_may_reenter_their_rule() {
        let Setup { calc, add } = setup();
        let rule = Arc::new(CallRule::for_call(add));
        rule.set_behavior(Behavior::Return(Value::new(3)));

        let weak = Arc::downgrade(&rule);
        let nested = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let target = calc.clone();
        rule.set_predicate(
            Arc::new(move |_: &Invocation| {
                if nested.swap(true, std::sync::atomic::Ordering::SeqCst) {
                    return true;
                }
                let inner = invoke(&target, MemberKind::Method, "add", (1, 2));
                let rule = weak.upgrade().expect("rule alive");
                matches!(rule.apply(&inner), Ok(Ok(_)))
            }),
            "reentrant".to_string(),
        );

        let answer = rule
            .apply(&invoke(&calc, MemberKind::Method, "add", (1, 1)))
            .expect("applies")
            .expect("answers");
        assert_eq!(answer.downcast_ref::<i32>(), Some(&3));
        assert_eq!(rule.applied(), 2);
    }

    #[test]
    fn parsed_calls_can_be_built_by_hand() {
        let Setup { calc, .. } = setup();
        let member = calc
            .type_info()
            .members_named(MemberKind::Setter, "Result")
            .next()
            .cloned()
            .expect("setter");
        let value = ArgumentDescriptor::new(Constraint::eq(4), member.params()[0].clone());
        let call = ParsedCall::new(Some(calc.clone()), member, vec![value]).expect("setter call");
        let rule = CallRule::for_call(call);

        assert!(rule
            .apply(&invoke(&calc, MemberKind::Setter, "Result", (4,)))
            .is_ok());
        assert!(matches!(
            rule.apply(&invoke(&calc, MemberKind::Setter, "Result", (5,))),
            Err(Skipped::Mismatch(_))
        ));
    }
}
