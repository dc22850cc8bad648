//! Command-line runtime for the Scribe language-server toolkit.
//!
//! The crate owns argument parsing, telemetry bootstrapping, and the
//! catalogue and provisioning subcommands. [`run`] is exercised both from
//! the binary entrypoint and from tests, where the IO streams are
//! substituted with in-memory buffers.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use scribe_catalog::Catalog;
use scribe_toolchain::ChannelParseError;
use thiserror::Error;

mod cli;
mod commands;
mod interact;
mod telemetry;

use cli::{Cli, CliCommand};

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    if let Err(error) = telemetry::init() {
        let _ = writeln!(stderr, "{error}");
        return ExitCode::FAILURE;
    }

    let result = Cli::try_parse_from(args)
        .map_err(AppError::CliUsage)
        .and_then(|cli| dispatch(cli, stdout, stderr));
    match result {
        Ok(exit_code) => exit_code,
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch<W, E>(cli: Cli, stdout: &mut W, stderr: &mut E) -> Result<ExitCode, AppError>
where
    W: Write,
    E: Write,
{
    let path_value = std::env::var("PATH").unwrap_or_default();
    match cli.command {
        CliCommand::List => {
            let catalog = Catalog::builtin(&cli.server_dir);
            commands::list(&catalog, &path_value, stdout)
        }
        CliCommand::Check { server } => {
            let catalog = Catalog::builtin(&cli.server_dir);
            commands::check(&catalog, &server, &path_value, stdout)
        }
        CliCommand::Provision {
            channel,
            assume_yes,
        } => commands::provision(channel.as_deref(), assume_yes, stdout, stderr),
    }
}

/// Errors surfaced to the operator on stderr.
#[derive(Debug, Error)]
pub(crate) enum AppError {
    /// Argument parsing failed; the payload renders clap's usage text.
    #[error("{0}")]
    CliUsage(clap::Error),
    /// The requested server is not in the catalogue.
    #[error("unknown server '{name}'; run `scribe list` to see the catalogue")]
    UnknownServer {
        /// The name that failed to resolve.
        name: String,
    },
    /// The requested release channel is malformed.
    #[error("invalid channel: {0}")]
    Channel(#[from] ChannelParseError),
    /// Writing to an output stream failed.
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
}
