//! Client-startup hook and notification routing.
//!
//! [`LaunchGuard::ready_to_start`] is consulted before the host spawns a
//! language server. For plain servers it verifies the launch command is
//! on the search path; for servers backed by a managed toolchain it runs
//! the provisioning workflow and then synthesizes the launch environment.
//! [`NotificationHub`] routes server-to-client notifications to
//! subscribed handlers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use scribe_exec::CommandRunner;
use scribe_toolchain::{Interaction, Orchestrator, PromptSession, RuntimeEnvBuilder};

use crate::server::ServerConfig;
use crate::workspace::find_marker;

/// Tracing target for startup checks.
const STARTUP_TARGET: &str = "scribe_catalog::startup";

/// Platform list separator for search-path style variables.
#[cfg(windows)]
const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
const PATH_LIST_SEPARATOR: char = ':';

/// Startup gate run before the host spawns a language server.
pub struct LaunchGuard<'a, R, I> {
    runner: &'a R,
    interaction: &'a I,
    ambient: HashMap<String, String>,
}

impl<'a, R: CommandRunner, I: Interaction> LaunchGuard<'a, R, I> {
    /// Creates a guard over the given runner and interaction surface,
    /// snapshotting the ambient process environment.
    #[must_use]
    pub fn new(runner: &'a R, interaction: &'a I) -> Self {
        Self {
            runner,
            interaction,
            ambient: std::env::vars().collect(),
        }
    }

    /// Replaces the ambient-environment snapshot.
    ///
    /// Tests supply a controlled environment here instead of mutating the
    /// real one.
    #[must_use]
    pub fn with_ambient_env(mut self, ambient: HashMap<String, String>) -> Self {
        self.ambient = ambient;
        self
    }

    /// Decides whether the server may be spawned.
    ///
    /// Issues workspace advisories for `folders`, verifies the launch
    /// command (or, for managed servers, runs the provisioning workflow
    /// and builds the launch environment), and returns `false` with a
    /// `notify` message when the server must not start.
    pub fn ready_to_start(
        &self,
        config: &ServerConfig,
        folders: &[PathBuf],
        session: &mut PromptSession,
    ) -> bool {
        self.advise_on_workspace(config, folders);

        let Some(profile) = config.provisioning() else {
            return self.command_available(config);
        };

        let search_path = self.extended_search_path(profile.local_bin_dir().map(PathBuf::as_path));
        let overlay: HashMap<String, String> =
            HashMap::from([(String::from("PATH"), search_path)]);
        let orchestrator =
            Orchestrator::new(profile, self.runner, self.interaction).with_env(overlay);
        if !orchestrator.ensure_ready(session) {
            return false;
        }

        // The toolchain is in place; a failure here means sysroot
        // detection broke after a successful install.
        if self.launch_environment(config).is_none() {
            self.interaction.notify(&format!(
                "could not determine the {} toolchain environment",
                profile.channel()
            ));
            return false;
        }
        debug!(
            target: STARTUP_TARGET,
            server = config.name(),
            "startup checks passed"
        );
        true
    }

    /// Environment overlay for the server launch.
    ///
    /// Plain servers launch with the ambient environment unchanged;
    /// managed servers receive the synthesized toolchain overlay, or
    /// `None` when it cannot be built.
    #[must_use]
    pub fn launch_environment(&self, config: &ServerConfig) -> Option<HashMap<String, String>> {
        config.provisioning().map_or_else(
            || Some(HashMap::new()),
            |profile| RuntimeEnvBuilder::new(self.runner, profile).build_with_ambient(&self.ambient),
        )
    }

    fn command_available(&self, config: &ServerConfig) -> bool {
        let path_value = self.ambient.get("PATH").map(String::as_str).unwrap_or_default();
        if config.is_available(path_value) {
            return true;
        }
        self.interaction.notify(&format!(
            "{} must be installed to run {}",
            config.command(),
            config.title()
        ));
        false
    }

    /// Workspace advisories for servers with project-manifest expectations.
    /// Each advisory is issued at most once per call. The manifest
    /// advisory fires only when no folder carries one (an empty folder
    /// list counts as carrying none).
    fn advise_on_workspace(&self, config: &ServerConfig, folders: &[PathBuf]) {
        if config.provisioning().is_none() {
            return;
        }
        if folders
            .iter()
            .all(|folder| find_marker(folder, "Cargo.toml").is_none())
        {
            self.interaction.notify(
                "A Cargo.toml file must be at the root of the workspace \
                 in order to support all features",
            );
        }
        if folders
            .iter()
            .any(|folder| find_marker(folder, "rls.toml").is_some())
        {
            self.interaction.notify(
                "rls.toml files are deprecated; move their settings into the host configuration",
            );
        }
    }

    fn extended_search_path(&self, local_bin_dir: Option<&Path>) -> String {
        let ambient_path = self.ambient.get("PATH").map(String::as_str).unwrap_or_default();
        let Some(dir) = local_bin_dir else {
            return ambient_path.to_owned();
        };
        if ambient_path.is_empty() {
            return dir.display().to_string();
        }
        let mut joined = ambient_path.to_owned();
        joined.push(PATH_LIST_SEPARATOR);
        joined.push_str(&dir.display().to_string());
        joined
    }
}

/// Handler invoked with a notification's `params` payload.
pub type NotificationHandler = Box<dyn Fn(&Value) + Send>;

/// Server-to-client notification methods treated as progress traffic and
/// surfaced through status reporting rather than dialogs.
pub const PROGRESS_METHODS: [&str; 4] = [
    "textDocument/publishDiagnostics",
    "window/progress",
    // Pre-standard progress notifications still emitted by older servers.
    "rustDocument/beginBuild",
    "rustDocument/diagnosticsEnd",
];

/// Routes server-to-client notifications to subscribed handlers.
#[derive(Default)]
pub struct NotificationHub {
    handlers: HashMap<String, Vec<NotificationHandler>>,
}

impl NotificationHub {
    /// Creates a hub with no subscriptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a handler to a notification method. Several handlers may
    /// subscribe to the same method; they run in subscription order.
    pub fn subscribe(&mut self, method: impl Into<String>, handler: NotificationHandler) {
        self.handlers.entry(method.into()).or_default().push(handler);
    }

    /// Dispatches a notification, returning `true` when at least one
    /// handler was subscribed to its method.
    #[must_use]
    pub fn dispatch(&self, method: &str, params: &Value) -> bool {
        let Some(handlers) = self.handlers.get(method) else {
            debug!(
                target: STARTUP_TARGET,
                method, "unhandled server notification"
            );
            return false;
        };
        for handler in handlers {
            handler(params);
        }
        true
    }
}

/// Subscribes `forward` to every progress-style notification method.
pub fn register_progress_handlers<F>(hub: &mut NotificationHub, forward: F)
where
    F: Fn(&str, &Value) + Send + Sync + 'static,
{
    let forward = std::sync::Arc::new(forward);
    for method in PROGRESS_METHODS {
        let forward = std::sync::Arc::clone(&forward);
        hub.subscribe(
            method,
            Box::new(move |params| forward(method, params)),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;

    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    use scribe_exec::{ExecError, InvocationResult, ToolInvocation};
    use scribe_toolchain::ManagerProfile;

    use super::*;
    use crate::server::LanguageScope;

    // ------------------------------------------------------------------
    // Test doubles
    // ------------------------------------------------------------------

    enum Outcome {
        Ok(String),
        Fail(i32, String),
    }

    /// Prefix-matches invocations against scripted rules; unscripted
    /// invocations panic so tests notice unexpected commands.
    struct ScriptedRunner {
        rules: Vec<(Vec<String>, Outcome)>,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedRunner {
        fn new() -> Self {
            Self {
                rules: Vec::new(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn ok<const N: usize>(mut self, prefix: [&str; N], stdout: &str) -> Self {
            self.rules.push((
                prefix.iter().map(ToString::to_string).collect(),
                Outcome::Ok(stdout.to_owned()),
            ));
            self
        }

        fn fail<const N: usize>(mut self, prefix: [&str; N], status: i32, stderr: &str) -> Self {
            self.rules.push((
                prefix.iter().map(ToString::to_string).collect(),
                Outcome::Fail(status, stderr.to_owned()),
            ));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, invocation: &ToolInvocation) -> Result<InvocationResult, ExecError> {
            self.calls.borrow_mut().push(invocation.display_line());
            let args = invocation.argv();
            let rule = self
                .rules
                .iter()
                .find(|(prefix, _)| args.starts_with(prefix))
                .unwrap_or_else(|| panic!("unscripted invocation: {}", invocation.display_line()));
            match &rule.1 {
                Outcome::Ok(stdout) => Ok(InvocationResult::new(0, stdout.clone(), String::new())),
                Outcome::Fail(status, stderr) => Err(ExecError::NonZeroExit {
                    command: invocation.program().to_owned(),
                    status: *status,
                    stderr: stderr.clone(),
                }),
            }
        }
    }

    /// Records notices; confirmations always answer yes.
    struct RecordingInteraction {
        notices: RefCell<Vec<String>>,
    }

    impl RecordingInteraction {
        fn new() -> Self {
            Self {
                notices: RefCell::new(Vec::new()),
            }
        }

        fn notified_about(&self, fragment: &str) -> bool {
            self.notices.borrow().iter().any(|n| n.contains(fragment))
        }
    }

    impl Interaction for RecordingInteraction {
        fn confirm(&self, _message: &str) -> bool {
            true
        }

        fn notify(&self, message: &str) {
            self.notices.borrow_mut().push(message.to_owned());
        }
    }

    fn fake_binary_dir(name: &str) -> (TempDir, String) {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").expect("write fake binary");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(&path).expect("metadata").permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&path, perms).expect("set permissions");
        }
        let rendered = dir.path().display().to_string();
        (dir, rendered)
    }

    fn ambient(path: &str) -> HashMap<String, String> {
        HashMap::from([(String::from("PATH"), path.to_owned())])
    }

    fn plain_config() -> ServerConfig {
        ServerConfig::new("html", "HTML Language Server", "node")
            .args(["html-languageserver.js", "--stdio"])
            .language(LanguageScope::new("html", ["text.html.basic"], ["html"]))
    }

    fn managed_config(bin_dir: &str) -> ServerConfig {
        ServerConfig::new("rust", "Rust Language Server", "rustup")
            .args(["run", "nightly", "rls"])
            .language(LanguageScope::new("rust", ["source.rust"], ["rust"]))
            .provisioned_by(
                ManagerProfile::rust_default().with_local_bin_dir(Some(PathBuf::from(bin_dir))),
            )
    }

    fn everything_installed_runner() -> ScriptedRunner {
        ScriptedRunner::new()
            .ok(["update"], "rustup unchanged\n")
            .ok(["toolchain", "list"], "stable\nnightly (default)\n")
            .ok(
                ["component", "list"],
                "rust-analysis (installed)\nrust-src (installed)\nrls-preview (installed)\n",
            )
            .ok(["run", "nightly", "rustc"], "/opt/sysroot\n")
    }

    // ------------------------------------------------------------------
    // Launch guard
    // ------------------------------------------------------------------

    #[rstest]
    fn missing_command_blocks_startup() {
        let empty = TempDir::new().expect("tempdir");
        let runner = ScriptedRunner::new();
        let interaction = RecordingInteraction::new();
        let guard = LaunchGuard::new(&runner, &interaction)
            .with_ambient_env(ambient(&empty.path().display().to_string()));
        let mut session = PromptSession::new();

        assert!(!guard.ready_to_start(&plain_config(), &[], &mut session));
        assert!(interaction.notified_about("node must be installed to run HTML Language Server"));
        assert!(runner.calls().is_empty());
    }

    #[rstest]
    fn available_command_passes() {
        let (_dir, path) = fake_binary_dir("node");
        let runner = ScriptedRunner::new();
        let interaction = RecordingInteraction::new();
        let guard = LaunchGuard::new(&runner, &interaction).with_ambient_env(ambient(&path));
        let mut session = PromptSession::new();

        assert!(guard.ready_to_start(&plain_config(), &[], &mut session));
    }

    #[rstest]
    fn managed_server_provisions_and_builds_environment() {
        let (_dir, path) = fake_binary_dir("rustup");
        let runner = everything_installed_runner();
        let interaction = RecordingInteraction::new();
        let guard = LaunchGuard::new(&runner, &interaction).with_ambient_env(ambient(&path));
        let mut session = PromptSession::new();

        assert!(guard.ready_to_start(&managed_config(&path), &[], &mut session));
        let overlay = guard
            .launch_environment(&managed_config(&path))
            .expect("launch environment");
        assert!(overlay.contains_key("RUST_SRC_PATH"));
    }

    #[rstest]
    fn missing_manager_blocks_managed_server() {
        let empty = TempDir::new().expect("tempdir");
        let path = empty.path().display().to_string();
        let runner = ScriptedRunner::new();
        let interaction = RecordingInteraction::new();
        let guard = LaunchGuard::new(&runner, &interaction).with_ambient_env(ambient(&path));
        let mut session = PromptSession::new();

        assert!(!guard.ready_to_start(&managed_config(&path), &[], &mut session));
        assert!(interaction.notified_about("rustup is not installed"));
        assert!(runner.calls().is_empty());
    }

    #[rstest]
    fn sysroot_failure_after_provisioning_blocks_startup() {
        let (_dir, path) = fake_binary_dir("rustup");
        let runner = ScriptedRunner::new()
            .ok(["update"], "rustup unchanged\n")
            .ok(["toolchain", "list"], "nightly (default)\n")
            .ok(
                ["component", "list"],
                "rust-analysis (installed)\nrust-src (installed)\nrls-preview (installed)\n",
            )
            .fail(["run", "nightly", "rustc"], 1, "missing rustc");
        let interaction = RecordingInteraction::new();
        let guard = LaunchGuard::new(&runner, &interaction).with_ambient_env(ambient(&path));
        let mut session = PromptSession::new();

        assert!(!guard.ready_to_start(&managed_config(&path), &[], &mut session));
        assert!(interaction.notified_about("toolchain environment"));
    }

    #[rstest]
    fn workspace_without_manifest_gets_an_advisory() {
        let (_dir, path) = fake_binary_dir("rustup");
        let folder = TempDir::new().expect("tempdir");
        let runner = everything_installed_runner();
        let interaction = RecordingInteraction::new();
        let guard = LaunchGuard::new(&runner, &interaction).with_ambient_env(ambient(&path));
        let mut session = PromptSession::new();

        assert!(guard.ready_to_start(
            &managed_config(&path),
            &[folder.path().to_path_buf()],
            &mut session
        ));
        assert!(interaction.notified_about("A Cargo.toml file must be at the root"));
    }

    #[rstest]
    fn manifest_advisory_is_suppressed_when_any_folder_has_one() {
        let (_dir, path) = fake_binary_dir("rustup");
        let bare = TempDir::new().expect("tempdir");
        let with_manifest = TempDir::new().expect("tempdir");
        fs::write(with_manifest.path().join("Cargo.toml"), "[package]\n")
            .expect("write manifest");
        let runner = everything_installed_runner();
        let interaction = RecordingInteraction::new();
        let guard = LaunchGuard::new(&runner, &interaction).with_ambient_env(ambient(&path));
        let mut session = PromptSession::new();

        assert!(guard.ready_to_start(
            &managed_config(&path),
            &[bare.path().to_path_buf(), with_manifest.path().to_path_buf()],
            &mut session
        ));
        assert!(
            !interaction.notified_about("A Cargo.toml file must be at the root"),
            "one folder carries the manifest"
        );
    }

    #[rstest]
    fn empty_folder_list_gets_the_manifest_advisory() {
        let (_dir, path) = fake_binary_dir("rustup");
        let runner = everything_installed_runner();
        let interaction = RecordingInteraction::new();
        let guard = LaunchGuard::new(&runner, &interaction).with_ambient_env(ambient(&path));
        let mut session = PromptSession::new();

        assert!(guard.ready_to_start(&managed_config(&path), &[], &mut session));
        assert!(interaction.notified_about("A Cargo.toml file must be at the root"));
    }

    #[rstest]
    fn deprecated_settings_file_gets_an_advisory() {
        let (_dir, path) = fake_binary_dir("rustup");
        let folder = TempDir::new().expect("tempdir");
        fs::write(folder.path().join("Cargo.toml"), "[package]\n").expect("write manifest");
        fs::write(folder.path().join("rls.toml"), "").expect("write rls.toml");
        let runner = everything_installed_runner();
        let interaction = RecordingInteraction::new();
        let guard = LaunchGuard::new(&runner, &interaction).with_ambient_env(ambient(&path));
        let mut session = PromptSession::new();

        assert!(guard.ready_to_start(
            &managed_config(&path),
            &[folder.path().to_path_buf()],
            &mut session
        ));
        assert!(interaction.notified_about("rls.toml files are deprecated"));
    }

    #[rstest]
    fn plain_server_launch_environment_is_empty() {
        let runner = ScriptedRunner::new();
        let interaction = RecordingInteraction::new();
        let guard = LaunchGuard::new(&runner, &interaction).with_ambient_env(ambient("/usr/bin"));
        let overlay = guard
            .launch_environment(&plain_config())
            .expect("launch environment");
        assert!(overlay.is_empty());
    }

    // ------------------------------------------------------------------
    // Notification hub
    // ------------------------------------------------------------------

    #[rstest]
    fn dispatch_reaches_subscribed_handlers_in_order() {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut hub = NotificationHub::new();
        for tag in ["first", "second"] {
            let seen = std::sync::Arc::clone(&seen);
            hub.subscribe(
                "window/progress",
                Box::new(move |_| seen.lock().expect("lock").push(tag)),
            );
        }

        assert!(hub.dispatch("window/progress", &json!({"title": "Building"})));
        assert_eq!(*seen.lock().expect("lock"), vec!["first", "second"]);
    }

    #[rstest]
    fn unsubscribed_method_reports_unhandled() {
        let hub = NotificationHub::new();
        assert!(!hub.dispatch("window/showMessage", &json!({})));
    }

    #[rstest]
    fn progress_registration_covers_every_progress_method() {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut hub = NotificationHub::new();
        {
            let seen = std::sync::Arc::clone(&seen);
            register_progress_handlers(&mut hub, move |method, _| {
                seen.lock().expect("lock").push(method.to_owned());
            });
        }

        for method in PROGRESS_METHODS {
            assert!(hub.dispatch(method, &json!({})));
        }
        assert_eq!(seen.lock().expect("lock").len(), PROGRESS_METHODS.len());
    }
}
