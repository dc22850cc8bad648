//! Implementations of the CLI subcommands.

use std::collections::HashMap;
use std::io::Write;
use std::process::ExitCode;

use scribe_catalog::Catalog;
use scribe_exec::ProcessRunner;
use scribe_toolchain::{
    Interaction, ManagerProfile, Orchestrator, PromptSession, RuntimeEnvBuilder, SOURCE_PATH_VAR,
};
use tracing::debug;

use crate::AppError;
use crate::interact::ConsoleInteraction;

/// Tracing target for command execution.
const COMMANDS_TARGET: &str = "scribe_cli::commands";

/// Platform list separator for search-path style variables.
#[cfg(windows)]
const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
const PATH_LIST_SEPARATOR: char = ':';

/// Renders the catalogue with per-server availability.
pub(crate) fn list<W: Write>(
    catalog: &Catalog,
    path_value: &str,
    stdout: &mut W,
) -> Result<ExitCode, AppError> {
    for name in catalog.names() {
        let Some(config) = catalog.get(name) else {
            continue;
        };
        let status = if config.is_available(path_value) {
            "available"
        } else {
            "missing"
        };
        writeln!(stdout, "{name:<12} {:<28} [{status}]", config.title())
            .map_err(AppError::WriteOutput)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Reports launch readiness for one catalogued server.
pub(crate) fn check<W: Write>(
    catalog: &Catalog,
    name: &str,
    path_value: &str,
    stdout: &mut W,
) -> Result<ExitCode, AppError> {
    let Some(config) = catalog.get(name) else {
        return Err(AppError::UnknownServer {
            name: name.to_owned(),
        });
    };

    writeln!(stdout, "{}", config.title()).map_err(AppError::WriteOutput)?;
    writeln!(
        stdout,
        "  command: {} {}",
        config.command(),
        config.launch_args().join(" ")
    )
    .map_err(AppError::WriteOutput)?;
    let languages: Vec<&str> = config
        .languages()
        .iter()
        .map(|language| language.id.as_str())
        .collect();
    writeln!(stdout, "  languages: {}", languages.join(", ")).map_err(AppError::WriteOutput)?;
    if let Some(profile) = config.provisioning() {
        writeln!(
            stdout,
            "  managed by {} ({} channel)",
            profile.manager(),
            profile.channel()
        )
        .map_err(AppError::WriteOutput)?;
    }

    let available = config.is_available(path_value);
    let status = if available {
        String::from("available")
    } else {
        format!("missing; install {} to enable this server", config.command())
    };
    writeln!(stdout, "  status: {status}").map_err(AppError::WriteOutput)?;

    Ok(if available {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Runs the toolchain provisioning workflow against the real system.
pub(crate) fn provision<W: Write, E: Write>(
    channel: Option<&str>,
    assume_yes: bool,
    stdout: &mut W,
    stderr: &mut E,
) -> Result<ExitCode, AppError> {
    let profile = match channel {
        Some(raw) => ManagerProfile::rust_default().with_channel(raw.parse()?),
        None => ManagerProfile::rust_default(),
    };
    debug!(
        target: COMMANDS_TARGET,
        manager = profile.manager(),
        channel = %profile.channel(),
        "starting provisioning"
    );

    let runner = ProcessRunner;
    let interaction = ConsoleInteraction::new(stderr, assume_yes);
    let overlay = HashMap::from([(String::from("PATH"), manager_search_path(&profile))]);
    let orchestrator = Orchestrator::new(&profile, &runner, &interaction).with_env(overlay);
    let mut session = PromptSession::new();
    if !orchestrator.ensure_ready(&mut session) {
        return Ok(ExitCode::FAILURE);
    }

    let Some(env) = RuntimeEnvBuilder::new(&runner, &profile).build() else {
        interaction.notify(&format!(
            "could not determine the {} toolchain environment",
            profile.channel()
        ));
        return Ok(ExitCode::FAILURE);
    };

    writeln!(
        stdout,
        "{} toolchain is ready on the {} channel",
        profile.manager(),
        profile.channel()
    )
    .map_err(AppError::WriteOutput)?;
    if let Some(source_path) = env.get(SOURCE_PATH_VAR) {
        writeln!(stdout, "{SOURCE_PATH_VAR}={source_path}").map_err(AppError::WriteOutput)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// The ambient search path extended with the manager's local binary
/// directory, so a per-user install is found even when the CLI was not
/// launched from a login shell.
fn manager_search_path(profile: &ManagerProfile) -> String {
    let ambient = std::env::var("PATH").unwrap_or_default();
    let Some(dir) = profile.local_bin_dir() else {
        return ambient;
    };
    if ambient.is_empty() {
        return dir.display().to_string();
    }
    let mut joined = ambient;
    joined.push(PATH_LIST_SEPARATOR);
    joined.push_str(&dir.display().to_string());
    joined
}
