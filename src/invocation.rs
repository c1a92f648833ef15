use std::{
    fmt::{self, Formatter},
    sync::Arc,
};

use crate::{render, MemberInfo, ObjectId, Value};

/// A call that was made on a fake.
#[derive(Clone, Debug)]
pub struct Invocation {
    target: ObjectId,
    type_name: String,
    member: Arc<MemberInfo>,
    arguments: Vec<Value>,
}

impl Invocation {
    pub fn new(
        target: ObjectId,
        type_name: impl Into<String>,
        member: Arc<MemberInfo>,
        arguments: Vec<Value>,
    ) -> Self {
        Invocation {
            target,
            type_name: type_name.into(),
            member,
            arguments,
        }
    }

    pub fn target(&self) -> ObjectId {
        self.target
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn member(&self) -> &Arc<MemberInfo> {
        &self.member
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// The argument at `position`, if it is a `T`.
    pub fn argument<T: 'static>(&self, position: usize) -> Option<&T> {
        self.arguments.get(position)?.downcast_ref()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&render::describe_invocation(self))
    }
}
