//! Blocking process execution with captured output.
//!
//! [`ProcessRunner`] implements the [`CommandRunner`] trait by spawning a
//! real child process, waiting for it to terminate, and capturing both
//! output streams in full. There is no imposed timeout; a hung tool blocks
//! the caller, which may wrap the call with its own bound.

use std::process::{Command, Stdio};
use std::sync::Arc;

use tracing::debug;

use crate::error::ExecError;
use crate::invocation::{InvocationResult, ToolInvocation};

/// Tracing target for runner operations.
const RUNNER_TARGET: &str = "scribe_exec::runner";

/// Trait abstracting external-tool execution for testability.
///
/// The production implementation is [`ProcessRunner`]. Test code implements
/// this trait to script per-invocation outcomes without spawning real
/// processes.
///
/// # Example
///
/// ```
/// use scribe_exec::{CommandRunner, ExecError, InvocationResult, ToolInvocation};
///
/// struct AlwaysSucceeds;
///
/// impl CommandRunner for AlwaysSucceeds {
///     fn run(&self, _invocation: &ToolInvocation) -> Result<InvocationResult, ExecError> {
///         Ok(InvocationResult::new(0, String::new(), String::new()))
///     }
/// }
/// ```
pub trait CommandRunner {
    /// Runs the invocation to completion and returns its captured output.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::ToolNotFound`] when the executable cannot be
    /// located, [`ExecError::Spawn`] for other spawn failures, and
    /// [`ExecError::NonZeroExit`] when the tool terminates with a non-zero
    /// status.
    fn run(&self, invocation: &ToolInvocation) -> Result<InvocationResult, ExecError>;
}

/// Executes invocations by spawning real OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<InvocationResult, ExecError> {
        let mut command = Command::new(invocation.program());
        command
            .args(invocation.argv())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = invocation.working_dir_path() {
            command.current_dir(dir);
        }

        // `Command::env` layers onto the inherited environment without
        // touching the parent process, so overlay entries win on collision.
        for (key, value) in invocation.env_overlay() {
            command.env(key, value);
        }

        suppress_console_window(&mut command);

        debug!(
            target: RUNNER_TARGET,
            command = %invocation.display_line(),
            "running external tool"
        );

        let output = command.output().map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                ExecError::ToolNotFound {
                    command: invocation.program().to_owned(),
                }
            } else {
                ExecError::Spawn {
                    command: invocation.program().to_owned(),
                    source: Arc::new(err),
                }
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let status = output.status.code().unwrap_or(-1);

        debug!(
            target: RUNNER_TARGET,
            command = %invocation.display_line(),
            status,
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            "external tool exited"
        );

        if !output.status.success() {
            return Err(ExecError::NonZeroExit {
                command: invocation.program().to_owned(),
                status,
                stderr,
            });
        }

        Ok(InvocationResult::new(status, stdout, stderr))
    }
}

/// Keeps spawned tools from flashing a console window on Windows.
///
/// Observable behaviour is unchanged on every platform.
#[cfg(windows)]
fn suppress_console_window(command: &mut Command) {
    use std::os::windows::process::CommandExt;

    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    command.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn suppress_console_window(_command: &mut Command) {}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn missing_executable_reports_tool_not_found() {
        let invocation = ToolInvocation::new("scribe-test-no-such-binary");
        let err = ProcessRunner.run(&invocation).expect_err("should fail");
        assert!(matches!(err, ExecError::ToolNotFound { .. }));
    }

    #[cfg(unix)]
    #[rstest]
    fn captures_stdout_on_success() {
        let invocation = ToolInvocation::new("/bin/sh")
            .arg("-c")
            .arg("printf 'hello'");
        let result = ProcessRunner.run(&invocation).expect("sh should run");
        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.stdout(), "hello");
    }

    #[cfg(unix)]
    #[rstest]
    fn non_zero_exit_carries_status_and_stderr() {
        let invocation = ToolInvocation::new("/bin/sh")
            .arg("-c")
            .arg("printf 'boom' >&2; exit 3");
        let err = ProcessRunner.run(&invocation).expect_err("should fail");
        match err {
            ExecError::NonZeroExit {
                status, stderr, ..
            } => {
                assert_eq!(status, 3);
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected NonZeroExit, got: {other}"),
        }
    }

    #[cfg(unix)]
    #[rstest]
    fn env_overlay_wins_over_ambient_environment() {
        // SAFETY: test-local variable, no other thread reads it.
        unsafe { std::env::set_var("SCRIBE_EXEC_TEST_VAR", "ambient") };
        let invocation = ToolInvocation::new("/bin/sh")
            .arg("-c")
            .arg("printf '%s' \"$SCRIBE_EXEC_TEST_VAR\"")
            .env("SCRIBE_EXEC_TEST_VAR", "overlay");
        let result = ProcessRunner.run(&invocation).expect("sh should run");
        assert_eq!(result.stdout(), "overlay");
        // The ambient environment is untouched.
        assert_eq!(
            std::env::var("SCRIBE_EXEC_TEST_VAR").as_deref(),
            Ok("ambient")
        );
    }

    #[cfg(unix)]
    #[rstest]
    fn working_dir_is_applied() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let invocation = ToolInvocation::new("/bin/sh")
            .arg("-c")
            .arg("pwd")
            .working_dir(dir.path());
        let result = ProcessRunner.run(&invocation).expect("sh should run");
        let reported = std::path::PathBuf::from(result.stdout().trim());
        // Compare canonicalised paths; macOS tempdirs sit behind symlinks.
        assert_eq!(
            reported.canonicalize().expect("canonicalise reported"),
            dir.path().canonicalize().expect("canonicalise tempdir")
        );
    }
}
