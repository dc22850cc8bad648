//! Runtime environment synthesis for the managed language server.
//!
//! Downstream tooling (the language server's source-navigation backend)
//! reads a source-path variable; when the operator has not set one, it is
//! synthesized from the detected toolchain installation root. The search
//! path is extended with the manager's well-known local binary directory
//! so a per-user install is found even when the host was not launched from
//! a login shell.

use std::collections::HashMap;
use std::path::Path;

use scribe_exec::CommandRunner;
use tracing::{debug, warn};

use crate::manager::ManagerProfile;

/// Tracing target for environment synthesis.
const ENV_TARGET: &str = "scribe_toolchain::env";

/// Variable read by downstream source-navigation tooling.
pub const SOURCE_PATH_VAR: &str = "RUST_SRC_PATH";

/// Platform list separator for search-path style variables.
#[cfg(windows)]
const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
const PATH_LIST_SEPARATOR: char = ':';

/// Builds the environment overlay used for manager invocations and the
/// language-server launch.
///
/// # Example
///
/// ```no_run
/// use scribe_exec::ProcessRunner;
/// use scribe_toolchain::{ManagerProfile, RuntimeEnvBuilder};
///
/// let profile = ManagerProfile::rust_default();
/// let runner = ProcessRunner;
/// let overlay = RuntimeEnvBuilder::new(&runner, &profile).build();
/// # drop(overlay);
/// ```
#[derive(Debug)]
pub struct RuntimeEnvBuilder<'a, R> {
    runner: &'a R,
    profile: &'a ManagerProfile,
    include_lib_path: bool,
}

impl<'a, R: CommandRunner> RuntimeEnvBuilder<'a, R> {
    /// Creates a builder over the given runner and profile.
    #[must_use]
    pub const fn new(runner: &'a R, profile: &'a ManagerProfile) -> Self {
        Self {
            runner,
            profile,
            include_lib_path: false,
        }
    }

    /// Also extends the dynamic-linker search variables with the
    /// toolchain's library directory.
    #[must_use]
    pub const fn with_lib_path(mut self, include: bool) -> Self {
        self.include_lib_path = include;
        self
    }

    /// Builds the overlay from the ambient process environment.
    ///
    /// Returns `None` when the toolchain installation root cannot be
    /// detected, which usually means the manager itself is absent.
    #[must_use]
    pub fn build(&self) -> Option<HashMap<String, String>> {
        let ambient: HashMap<String, String> = std::env::vars().collect();
        self.build_with_ambient(&ambient)
    }

    /// Builds the overlay from an explicit ambient-environment snapshot.
    ///
    /// Split out from [`RuntimeEnvBuilder::build`] so tests can supply the
    /// ambient environment instead of mutating the real one.
    #[must_use]
    pub fn build_with_ambient(
        &self,
        ambient: &HashMap<String, String>,
    ) -> Option<HashMap<String, String>> {
        let mut overlay = HashMap::new();

        let ambient_path = ambient.get("PATH").map(String::as_str).unwrap_or_default();
        let search_path = match self.profile.local_bin_dir() {
            Some(dir) => append_list_entry(ambient_path, dir),
            None => ambient_path.to_owned(),
        };
        overlay.insert(String::from("PATH"), search_path);

        let sysroot = self.detect_sysroot(&overlay)?;

        let source_path = ambient.get(SOURCE_PATH_VAR).cloned().unwrap_or_else(|| {
            Path::new(&sysroot)
                .join("lib")
                .join("rustlib")
                .join("src")
                .join("rust")
                .join("src")
                .display()
                .to_string()
        });
        overlay.insert(String::from(SOURCE_PATH_VAR), source_path);

        if self.include_lib_path {
            let lib_dir = Path::new(&sysroot).join("lib");
            for var in ["LD_LIBRARY_PATH", "DYLD_LIBRARY_PATH"] {
                let current = ambient.get(var).map(String::as_str).unwrap_or_default();
                overlay.insert(var.to_owned(), append_list_entry(current, &lib_dir));
            }
        }

        Some(overlay)
    }

    fn detect_sysroot(&self, overlay: &HashMap<String, String>) -> Option<String> {
        let invocation = self.profile.sysroot_invocation().envs(overlay);
        match self.runner.run(&invocation) {
            Ok(result) => {
                let sysroot = result.stdout().trim().to_owned();
                if sysroot.is_empty() {
                    warn!(
                        target: ENV_TARGET,
                        manager = self.profile.manager(),
                        "sysroot detection produced no output"
                    );
                    return None;
                }
                debug!(target: ENV_TARGET, sysroot = %sysroot, "detected toolchain sysroot");
                Some(sysroot)
            }
            Err(err) => {
                warn!(
                    target: ENV_TARGET,
                    manager = self.profile.manager(),
                    error = %err,
                    "could not read the toolchain sysroot"
                );
                None
            }
        }
    }
}

/// Appends one directory to a list-style variable value.
fn append_list_entry(value: &str, dir: &Path) -> String {
    let rendered = dir.display().to_string();
    if value.is_empty() {
        return rendered;
    }
    let mut joined = value.to_owned();
    joined.push(PATH_LIST_SEPARATOR);
    joined.push_str(&rendered);
    joined
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rstest::rstest;

    use super::*;
    use crate::channel::{Channel, ComponentSet};
    use crate::tests::ScriptedRunner;

    fn profile() -> ManagerProfile {
        ManagerProfile::new(
            "rustup",
            Channel::new("nightly"),
            ComponentSet::new("rust-src", Vec::<String>::new()),
        )
        .with_local_bin_dir(Some(PathBuf::from("/home/dev/.cargo/bin")))
    }

    fn ambient(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[rstest]
    fn synthesizes_source_path_from_sysroot() {
        let runner = ScriptedRunner::new().ok(["run", "nightly", "rustc"], "/opt/sysroot\n");
        let overlay = RuntimeEnvBuilder::new(&runner, &profile())
            .build_with_ambient(&ambient(&[("PATH", "/usr/bin")]))
            .expect("overlay should build");

        assert_eq!(
            overlay.get("PATH").map(String::as_str),
            Some("/usr/bin:/home/dev/.cargo/bin")
        );
        assert_eq!(
            overlay.get(SOURCE_PATH_VAR).map(String::as_str),
            Some("/opt/sysroot/lib/rustlib/src/rust/src")
        );
    }

    #[rstest]
    fn preserves_operator_supplied_source_path() {
        let runner = ScriptedRunner::new().ok(["run", "nightly", "rustc"], "/opt/sysroot\n");
        let overlay = RuntimeEnvBuilder::new(&runner, &profile())
            .build_with_ambient(&ambient(&[
                ("PATH", "/usr/bin"),
                (SOURCE_PATH_VAR, "/custom/src"),
            ]))
            .expect("overlay should build");

        assert_eq!(
            overlay.get(SOURCE_PATH_VAR).map(String::as_str),
            Some("/custom/src")
        );
    }

    #[rstest]
    fn sysroot_failure_yields_none() {
        let runner = ScriptedRunner::new().fail(["run", "nightly", "rustc"], 1, "no toolchain");
        let overlay = RuntimeEnvBuilder::new(&runner, &profile())
            .build_with_ambient(&ambient(&[("PATH", "/usr/bin")]));
        assert!(overlay.is_none());
    }

    #[rstest]
    fn missing_manager_yields_none() {
        let runner = ScriptedRunner::new().not_found(["run", "nightly", "rustc"]);
        let overlay = RuntimeEnvBuilder::new(&runner, &profile())
            .build_with_ambient(&ambient(&[("PATH", "/usr/bin")]));
        assert!(overlay.is_none());
    }

    #[rstest]
    fn lib_path_extension_is_opt_in() {
        let runner = ScriptedRunner::new().ok(["run", "nightly", "rustc"], "/opt/sysroot\n");
        let stock = profile();
        let builder = RuntimeEnvBuilder::new(&runner, &stock).with_lib_path(true);
        let overlay = builder
            .build_with_ambient(&ambient(&[("PATH", "/usr/bin"), ("LD_LIBRARY_PATH", "/lib")]))
            .expect("overlay should build");

        assert_eq!(
            overlay.get("LD_LIBRARY_PATH").map(String::as_str),
            Some("/lib:/opt/sysroot/lib")
        );
        assert_eq!(
            overlay.get("DYLD_LIBRARY_PATH").map(String::as_str),
            Some("/opt/sysroot/lib")
        );
    }
}
