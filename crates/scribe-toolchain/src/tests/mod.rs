//! Shared test doubles for the provisioning crates, plus crate-level BDD
//! coverage.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;

use scribe_exec::{CommandRunner, ExecError, InvocationResult, ToolInvocation};


/// One scripted outcome for a matched invocation.
#[derive(Debug, Clone)]
enum ScriptedOutcome {
    Ok { stdout: String },
    Fail { status: i32, stderr: String },
    NotFound,
}

/// A [`CommandRunner`] that answers invocations from scripted rules and
/// records every call for later assertions.
///
/// Rules match on an argument prefix; the first matching rule wins and may
/// answer any number of calls. An unscripted invocation panics, which
/// doubles as a "this command must never run" assertion.
#[derive(Debug, Default)]
pub(crate) struct ScriptedRunner {
    rules: Vec<(Vec<String>, ScriptedOutcome)>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Scripts a zero-exit outcome with the given stdout.
    pub(crate) fn ok<I>(mut self, prefix: I, stdout: &str) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        self.rules.push((
            prefix.into_iter().map(str::to_owned).collect(),
            ScriptedOutcome::Ok {
                stdout: stdout.to_owned(),
            },
        ));
        self
    }

    /// Scripts a non-zero exit with the given status and stderr.
    pub(crate) fn fail<I>(mut self, prefix: I, status: i32, stderr: &str) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        self.rules.push((
            prefix.into_iter().map(str::to_owned).collect(),
            ScriptedOutcome::Fail {
                status,
                stderr: stderr.to_owned(),
            },
        ));
        self
    }

    /// Scripts a missing-executable outcome.
    pub(crate) fn not_found<I>(mut self, prefix: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        self.rules.push((
            prefix.into_iter().map(str::to_owned).collect(),
            ScriptedOutcome::NotFound,
        ));
        self
    }

    /// Rendered command lines of every invocation seen so far.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn matching_outcome(&self, args: &[String]) -> Option<ScriptedOutcome> {
        self.rules
            .iter()
            .find(|(prefix, _)| args.len() >= prefix.len() && args.starts_with(prefix))
            .map(|(_, outcome)| outcome.clone())
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<InvocationResult, ExecError> {
        self.calls.borrow_mut().push(invocation.display_line());
        let outcome = self
            .matching_outcome(invocation.argv())
            .unwrap_or_else(|| panic!("unscripted invocation: {}", invocation.display_line()));
        match outcome {
            ScriptedOutcome::Ok { stdout } => Ok(InvocationResult::new(0, stdout, String::new())),
            ScriptedOutcome::Fail { status, stderr } => Err(ExecError::NonZeroExit {
                command: invocation.program().to_owned(),
                status,
                stderr,
            }),
            ScriptedOutcome::NotFound => Err(ExecError::ToolNotFound {
                command: invocation.program().to_owned(),
            }),
        }
    }
}

/// An [`Interaction`](crate::Interaction) double that records messages and
/// answers prompts from a queue.
///
/// An empty answer queue makes `confirm` panic, which doubles as a "no
/// prompt may be shown" assertion.
#[derive(Debug, Default)]
pub(crate) struct RecordingInteraction {
    answers: RefCell<VecDeque<bool>>,
    confirms: RefCell<Vec<String>>,
    notices: RefCell<Vec<String>>,
}

impl RecordingInteraction {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues one prompt answer.
    pub(crate) fn answering(self, answer: bool) -> Self {
        self.answers.borrow_mut().push_back(answer);
        self
    }

    pub(crate) fn confirms(&self) -> Vec<String> {
        self.confirms.borrow().clone()
    }

    pub(crate) fn notices(&self) -> Vec<String> {
        self.notices.borrow().clone()
    }

    /// Whether any notice contains the given fragment.
    pub(crate) fn notified_about(&self, fragment: &str) -> bool {
        self.notices
            .borrow()
            .iter()
            .any(|notice| notice.contains(fragment))
    }
}

impl crate::Interaction for RecordingInteraction {
    fn confirm(&self, message: &str) -> bool {
        self.confirms.borrow_mut().push(message.to_owned());
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected prompt: {message}"))
    }

    fn notify(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_owned());
    }
}

/// Materializes a fake manager executable and returns the directory that
/// holds it plus a rendered search-path value pointing at it.
pub(crate) fn fake_manager_dir(name: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let tool: PathBuf = dir.path().join(name);
    std::fs::write(&tool, "#!/bin/sh\n").expect("write fake manager");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = std::fs::metadata(&tool).expect("metadata").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&tool, perms).expect("set permissions");
    }
    let path_value = dir.path().display().to_string();
    (dir, path_value)
}
