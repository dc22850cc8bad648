//! Session-scoped prompt bookkeeping.

/// Tracks whether the operator has already been prompted this process
/// lifetime.
///
/// Initialized fresh at process start and passed explicitly into each
/// [`ensure_ready`](crate::Orchestrator::ensure_ready) call. The flag is
/// set the first time the operator declines an install or an install
/// attempt fails, and is never reset. Once set, the orchestrator fails
/// fast instead of showing another interactive prompt, so repeated startup
/// attempts cannot turn into repeated modal interruptions.
///
/// Single-threaded use requires no locking; a multi-threaded host must
/// guard the session with mutual exclusion.
#[derive(Debug, Default, Clone)]
pub struct PromptSession {
    prompts_exhausted: bool,
}

impl PromptSession {
    /// Creates a fresh session with prompting available.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            prompts_exhausted: false,
        }
    }

    /// Whether interactive prompting has been exhausted.
    #[must_use]
    pub const fn prompts_exhausted(&self) -> bool {
        self.prompts_exhausted
    }

    /// Marks prompting as exhausted for the rest of the process lifetime.
    pub const fn exhaust(&mut self) {
        self.prompts_exhausted = true;
    }
}
