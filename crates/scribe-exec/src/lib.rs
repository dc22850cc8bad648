//! Synchronous external-tool execution for the Scribe workspace.
//!
//! The `scribe-exec` crate is the leaf layer of the provisioning stack: it
//! describes a single external-process execution request as a
//! [`ToolInvocation`], runs it to completion through a [`CommandRunner`],
//! and classifies the outcome as an [`InvocationResult`] or an
//! [`ExecError`]. Higher layers (the provisioning prober and orchestrator)
//! never touch `std::process` directly; they depend on the
//! [`CommandRunner`] trait so tests can substitute scripted outcomes.
//!
//! # Example
//!
//! ```no_run
//! use scribe_exec::{CommandRunner, ProcessRunner, ToolInvocation};
//!
//! let invocation = ToolInvocation::new("rustup").arg("toolchain").arg("list");
//! let runner = ProcessRunner;
//! let result = runner.run(&invocation)?;
//! assert_eq!(result.exit_code(), 0);
//! # Ok::<(), scribe_exec::ExecError>(())
//! ```

pub mod error;
pub mod invocation;
pub mod lookup;
pub mod runner;

pub use self::error::ExecError;
pub use self::invocation::{InvocationResult, ToolInvocation};
pub use self::lookup::find_in_path;
pub use self::runner::{CommandRunner, ProcessRunner};
