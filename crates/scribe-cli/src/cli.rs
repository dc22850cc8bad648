//! CLI argument definitions for the Scribe toolkit.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line interface for the Scribe language-server toolkit.
#[derive(Parser, Debug)]
#[command(name = "scribe", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Directory bundled server scripts are resolved against.
    #[arg(long, value_name = "DIR", default_value = "/opt/scribe/servers")]
    pub(crate) server_dir: PathBuf,
    /// The command to execute.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Structured subcommands for the Scribe CLI.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Lists the catalogued language servers.
    List,
    /// Reports launch readiness for one server.
    Check {
        /// Catalogue name of the server (for example `rust`).
        #[arg(value_name = "SERVER")]
        server: String,
    },
    /// Runs the toolchain provisioning workflow for the managed server.
    Provision {
        /// Release channel to provision instead of the stock one.
        #[arg(long, value_name = "CHANNEL")]
        channel: Option<String>,
        /// Answers every prompt with yes.
        #[arg(long)]
        assume_yes: bool,
    },
}
