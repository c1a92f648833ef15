/// Per fake settings, chosen when the fake is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FakeOptions {
    /// Fail unconfigured calls to members returning `()` instead of
    /// letting them complete.
    pub strict: bool,
    /// Keep every invocation so it can be inspected later with
    /// [`FakeManager::recorded_calls`](crate::FakeManager::recorded_calls).
    pub record_calls: bool,
}

impl FakeOptions {
    pub fn strict() -> Self {
        FakeOptions {
            strict: true,
            ..FakeOptions::default()
        }
    }
}

impl Default for FakeOptions {
    fn default() -> Self {
        FakeOptions {
            strict: false,
            record_calls: true,
        }
    }
}
