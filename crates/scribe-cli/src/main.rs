//! CLI entrypoint for the Scribe language-server toolkit.
//!
//! The binary delegates to [`scribe_cli::run`], which parses arguments,
//! installs telemetry, and executes the requested catalogue or
//! provisioning command.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    scribe_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
