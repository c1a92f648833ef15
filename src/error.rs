use std::sync::Arc;

/// Why a call configuration was rejected.
///
/// Nothing is registered on a fake when any of these are returned.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid call specification: {0}")]
    Precondition(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("the target of the call specification ({target}) is not a fake object")]
    NotAFake { target: String },

    #[error("the member '{member}' can not be intercepted: {reason}")]
    Interception { member: String, reason: String },

    #[error(transparent)]
    SetterDerivation(#[from] SetterDerivationError),

    #[error("the rule '{rule}' is no longer registered on its fake")]
    Unregistered { rule: String },
}

/// Why a call specification could not be turned into a parsed call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("'{type_name}' has no {kind} named '{member}'")]
    UnknownMember {
        type_name: String,
        kind: &'static str,
        member: String,
    },

    #[error("no overload of '{type_name}.{member}' takes {arity} argument(s) of the given types")]
    NoMatchingOverload {
        type_name: String,
        member: String,
        arity: usize,
    },

    #[error("the call to '{type_name}.{member}' matches {candidates} overloads; constrain the arguments with typed values")]
    AmbiguousCall {
        type_name: String,
        member: String,
        candidates: usize,
    },

    #[error("'{member}' takes {expected} argument(s) but {actual} were given")]
    ArgumentCount {
        member: String,
        expected: usize,
        actual: usize,
    },

    #[error("argument {position} of '{member}' is constrained as {actual} but the parameter is {expected}")]
    ArgumentType {
        member: String,
        position: usize,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("unsupported call specification: {0}")]
    UnsupportedShape(String),
}

/// Why a setter could not be derived from a getter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetterDerivationError {
    #[error("Expression '{expression}' must refer to a property or indexer getter, but doesn't.")]
    NotAGetter { expression: String },

    #[error("Expression '{expression}' refers to a property, but the property '{property}' does not have a setter.")]
    NoPropertySetter {
        property: String,
        expression: String,
    },

    #[error("Expression '{expression}' refers to an indexed property that does not have a setter.")]
    NoIndexerSetter { expression: String },

    #[error("Expression '{expression}' holds values of type {expected}, not {actual}.")]
    ValueTypeMismatch {
        expression: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Why a call made on a fake could not be answered.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DispatchError {
    #[error("'{type_name}' has no {kind} '{member}' taking ({arguments})")]
    UnknownMember {
        type_name: String,
        kind: &'static str,
        member: String,
        arguments: String,
    },

    #[error("✗ {call} was never configured{}", explain(.reasons))]
    Unconfigured { call: String, reasons: Vec<String> },

    #[error("✗ {call} was configured without a return value")]
    NoReturnValue { call: String },

    #[error("✗ {call} returned {actual} but {expected} was requested")]
    ReturnType {
        call: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{0}")]
    Raised(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

fn explain(reasons: &[String]) -> String {
    if reasons.is_empty() {
        String::new()
    } else {
        format!("\n\n{}", reasons.join("\n\n"))
    }
}
