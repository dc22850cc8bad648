//! Presence detection for toolchains and components.
//!
//! The prober asks the manager for its installed-toolchain and
//! installed-component listings and matches each required name against the
//! output. Matching is deliberately conservative: a listing line counts
//! only when it carries an installed-marker annotation, so a
//! partially-downloaded or merely-known component still triggers
//! installation.
//!
//! Runner failures during detection never escape this module as errors;
//! they collapse to "not present". Absence of the manager tool itself is
//! reported separately by the orchestrator's up-front existence check.

use std::collections::HashMap;

use scribe_exec::CommandRunner;
use tracing::warn;

use crate::manager::ManagerProfile;

/// Tracing target for probe operations.
const PROBE_TARGET: &str = "scribe_toolchain::probe";

/// Annotations the manager uses to mark a listing entry as installed.
const INSTALLED_MARKERS: [&str; 2] = ["(default)", "(installed)"];

/// Decides whether required toolchains and components are already present.
///
/// Borrows the runner, profile, and environment overlay; the checks
/// themselves have no side effects beyond running the listing commands.
#[derive(Debug)]
pub struct Prober<'a, R> {
    runner: &'a R,
    profile: &'a ManagerProfile,
    env: &'a HashMap<String, String>,
}

impl<'a, R: CommandRunner> Prober<'a, R> {
    /// Creates a prober over the given runner and profile.
    ///
    /// `env` is the overlay applied to every listing invocation (usually
    /// the synthesized runtime environment).
    #[must_use]
    pub const fn new(
        runner: &'a R,
        profile: &'a ManagerProfile,
        env: &'a HashMap<String, String>,
    ) -> Self {
        Self {
            runner,
            profile,
            env,
        }
    }

    /// Whether the profile's channel is installed.
    #[must_use]
    pub fn has_toolchain(&self) -> bool {
        let invocation = self.profile.toolchain_list_invocation().envs(self.env);
        match self.runner.run(&invocation) {
            Ok(result) => {
                listing_reports_installed(result.stdout(), self.profile.channel().as_str())
            }
            Err(err) => {
                warn!(
                    target: PROBE_TARGET,
                    manager = self.profile.manager(),
                    error = %err,
                    "toolchain listing failed, treating channel as absent"
                );
                false
            }
        }
    }

    /// Whether every member of the profile's component set is installed.
    ///
    /// A logical AND over per-component checks against a single listing
    /// invocation.
    #[must_use]
    pub fn has_components(&self) -> bool {
        let invocation = self.profile.component_list_invocation().envs(self.env);
        let listing = match self.runner.run(&invocation) {
            Ok(result) => result,
            Err(err) => {
                warn!(
                    target: PROBE_TARGET,
                    manager = self.profile.manager(),
                    error = %err,
                    "component listing failed, treating components as absent"
                );
                return false;
            }
        };

        self.profile
            .components()
            .names()
            .iter()
            .all(|component| listing_reports_installed(listing.stdout(), component))
    }
}

/// Whether any line of the listing reports `name` as installed.
///
/// A line matches when it begins with `name` (listings append target
/// suffixes, e.g. `rust-src-x86_64-unknown-linux-gnu`) and ends with one
/// of the installed-marker annotations. A line that merely names the
/// entry does not count.
#[must_use]
pub fn listing_reports_installed(listing: &str, name: &str) -> bool {
    listing
        .lines()
        .any(|line| line_reports_installed(line, name))
}

fn line_reports_installed(line: &str, name: &str) -> bool {
    let trimmed = line.trim();
    trimmed.strip_prefix(name).is_some_and(|rest| {
        INSTALLED_MARKERS
            .iter()
            .any(|marker| rest.trim_end().ends_with(marker))
    })
}
