//! Invocation descriptions and captured results.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A single external-process execution request.
///
/// Built with the builder-style `arg`/`env`/`working_dir` methods and
/// consumed by a [`CommandRunner`](crate::CommandRunner). The environment
/// overlay is merged onto the ambient process environment at spawn time;
/// overlay entries win on key collision and the ambient environment is
/// never mutated.
///
/// # Example
///
/// ```
/// use scribe_exec::ToolInvocation;
///
/// let invocation = ToolInvocation::new("rustup")
///     .arg("component")
///     .args(["list", "--toolchain", "nightly"])
///     .env("PATH", "/usr/bin");
/// assert_eq!(invocation.program(), "rustup");
/// assert_eq!(invocation.argv().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    env: HashMap<String, String>,
}

impl ToolInvocation {
    /// Creates an invocation of the given program with no arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: HashMap::new(),
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory for the spawned process.
    #[must_use]
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Adds one environment overlay entry.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Merges a map of environment overlay entries.
    #[must_use]
    pub fn envs(mut self, entries: &HashMap<String, String>) -> Self {
        self.env
            .extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Returns the program name.
    #[must_use]
    pub fn program(&self) -> &str {
        self.program.as_str()
    }

    /// Returns the argument vector, excluding the program name.
    ///
    /// Named `argv` to keep the builder method [`ToolInvocation::args`]
    /// unambiguous.
    #[must_use]
    pub fn argv(&self) -> &[String] {
        self.args.as_slice()
    }

    /// Returns the working directory, when one was set.
    #[must_use]
    pub fn working_dir_path(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// Returns the environment overlay.
    #[must_use]
    pub const fn env_overlay(&self) -> &HashMap<String, String> {
        &self.env
    }

    /// Renders the command line for log output.
    #[must_use]
    pub fn display_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Outcome of a successful [`ToolInvocation`].
///
/// Produced only for zero exit statuses; non-zero exits surface as
/// [`ExecError::NonZeroExit`](crate::ExecError::NonZeroExit). Both output
/// streams are captured in full before the result is returned.
#[derive(Debug, Clone)]
pub struct InvocationResult {
    exit_code: i32,
    stdout: String,
    stderr: String,
}

impl InvocationResult {
    /// Builds a result from captured process output.
    #[must_use]
    pub const fn new(exit_code: i32, stdout: String, stderr: String) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
        }
    }

    /// Process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Captured standard output, decoded as UTF-8 (lossily).
    #[must_use]
    pub fn stdout(&self) -> &str {
        self.stdout.as_str()
    }

    /// Captured standard error, decoded as UTF-8 (lossily).
    #[must_use]
    pub fn stderr(&self) -> &str {
        self.stderr.as_str()
    }
}
