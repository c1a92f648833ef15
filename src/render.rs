//! Human readable descriptions of calls, for messages.
//!
//! Rendering never fails: whatever cannot be resolved shows up as
//! `<?>`.

use std::fmt::{self, Write};

use crate::{Invocation, MemberInfo, MemberKind, ParsedCall};

const UNKNOWN: &str = "<?>";

/// Describes a parsed call the way it would be written against the
/// fake: `Calculator.add(1, _)`, `Calculator.Result`,
/// `Calculator.Result = _`, `Grid[1, _]`.
pub fn describe(call: &ParsedCall) -> String {
    let owner = match call.target() {
        Some(target) => target.type_info().name(),
        None => call.member().declaring_type(),
    };
    let arguments: Vec<_> = call
        .arguments()
        .iter()
        .map(|arg| arg.constraint().to_string())
        .collect();

    access(owner, call.member(), &arguments)
}

/// Describes a call made on a fake, with the actual argument values.
pub fn describe_invocation(invocation: &Invocation) -> String {
    let arguments: Vec<_> = invocation
        .arguments()
        .iter()
        .map(|value| format!("{:?}", value))
        .collect();

    access(invocation.type_name(), invocation.member(), &arguments)
}

fn access(owner: &str, member: &MemberInfo, arguments: &[String]) -> String {
    let mut rendered = String::new();
    // writing into a String cannot fail
    let _ = write_access(&mut rendered, owner, member, arguments);
    rendered
}

fn write_access(
    out: &mut String,
    owner: &str,
    member: &MemberInfo,
    arguments: &[String],
) -> fmt::Result {
    let owner = if owner.is_empty() { UNKNOWN } else { owner };

    match member.kind() {
        MemberKind::Getter if member.is_indexer() => {
            write!(out, "{}[{}]", owner, arguments.join(", "))
        }
        MemberKind::Getter => write!(out, "{}.{}", owner, member.name()),
        MemberKind::Setter => {
            let (value, index) = match arguments.split_last() {
                Some((value, index)) => (value.as_str(), index),
                None => (UNKNOWN, arguments),
            };
            if member.is_indexer() {
                write!(out, "{}[{}] = {}", owner, index.join(", "), value)
            } else {
                write!(out, "{}.{} = {}", owner, member.name(), value)
            }
        }
        MemberKind::Method => write!(
            out,
            "{}.{}({})",
            owner,
            member.name(),
            arguments.join(", ")
        ),
        MemberKind::Constructor => write!(out, "new {}({})", owner, arguments.join(", ")),
    }
}
