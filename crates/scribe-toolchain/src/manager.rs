//! Description of the external toolchain manager.
//!
//! A [`ManagerProfile`] bundles everything the prober and orchestrator need
//! to talk to one version-manager installation: the manager command, the
//! release channel to track, the component set the language server
//! requires, and the well-known local binary directory appended to the
//! search path. The profile builds every [`ToolInvocation`] itself so the
//! exact argv shapes live in one place.

use std::path::PathBuf;

use scribe_exec::{ToolInvocation, find_in_path};

use crate::channel::{Channel, ComponentSet};

/// Configuration for one managed toolchain ecosystem.
///
/// # Example
///
/// ```
/// use scribe_toolchain::ManagerProfile;
///
/// let profile = ManagerProfile::rust_default();
/// assert_eq!(profile.manager(), "rustup");
/// let listing = profile.toolchain_list_invocation();
/// assert_eq!(listing.argv(), ["toolchain", "list"]);
/// ```
#[derive(Debug, Clone)]
pub struct ManagerProfile {
    manager: String,
    channel: Channel,
    components: ComponentSet,
    local_bin_dir: Option<PathBuf>,
}

impl ManagerProfile {
    /// Builds a profile for an arbitrary manager command.
    #[must_use]
    pub fn new(manager: impl Into<String>, channel: Channel, components: ComponentSet) -> Self {
        Self {
            manager: manager.into(),
            channel,
            components,
            local_bin_dir: None,
        }
    }

    /// The stock profile for the Rust language server: `rustup` on the
    /// nightly channel with the analysis, source, and server-preview
    /// components.
    #[must_use]
    pub fn rust_default() -> Self {
        let components = ComponentSet::new("rust-analysis", ["rust-src", "rls-preview"]);
        Self::new("rustup", Channel::new(Channel::NIGHTLY), components)
            .with_local_bin_dir(default_cargo_bin_dir())
    }

    /// Overrides the release channel.
    #[must_use]
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    /// Sets the local binary directory appended to the search path before
    /// the manager is invoked.
    #[must_use]
    pub fn with_local_bin_dir(mut self, dir: impl Into<Option<PathBuf>>) -> Self {
        self.local_bin_dir = dir.into();
        self
    }

    /// Returns the manager command name.
    #[must_use]
    pub fn manager(&self) -> &str {
        self.manager.as_str()
    }

    /// Returns the tracked release channel.
    #[must_use]
    pub const fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Returns the required component set.
    #[must_use]
    pub const fn components(&self) -> &ComponentSet {
        &self.components
    }

    /// Returns the local binary directory, when one is configured.
    #[must_use]
    pub fn local_bin_dir(&self) -> Option<&PathBuf> {
        self.local_bin_dir.as_ref()
    }

    /// Whether the manager executable can be located on the given search
    /// path.
    #[must_use]
    pub fn is_on_path(&self, path_value: &str) -> bool {
        find_in_path(&self.manager, path_value).is_some()
    }

    /// `<manager> update` — the best-effort self-update.
    #[must_use]
    pub fn update_invocation(&self) -> ToolInvocation {
        ToolInvocation::new(&self.manager).arg("update")
    }

    /// `<manager> toolchain list` — the installed-toolchain listing.
    #[must_use]
    pub fn toolchain_list_invocation(&self) -> ToolInvocation {
        ToolInvocation::new(&self.manager).args(["toolchain", "list"])
    }

    /// `<manager> toolchain install <channel>`.
    #[must_use]
    pub fn toolchain_install_invocation(&self) -> ToolInvocation {
        ToolInvocation::new(&self.manager)
            .args(["toolchain", "install"])
            .arg(self.channel.as_str())
    }

    /// `<manager> component list --toolchain <channel>`.
    #[must_use]
    pub fn component_list_invocation(&self) -> ToolInvocation {
        ToolInvocation::new(&self.manager)
            .args(["component", "list", "--toolchain"])
            .arg(self.channel.as_str())
    }

    /// `<manager> component add <component> --toolchain <channel>`.
    #[must_use]
    pub fn component_add_invocation(&self, component: &str) -> ToolInvocation {
        ToolInvocation::new(&self.manager)
            .args(["component", "add"])
            .arg(component)
            .args(["--toolchain"])
            .arg(self.channel.as_str())
    }

    /// `<manager> run <channel> <command> <args…>` — runs a tool from the
    /// managed toolchain, used both for sysroot detection and for
    /// launching the language server itself.
    #[must_use]
    pub fn run_invocation<I, S>(&self, command: &str, args: I) -> ToolInvocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ToolInvocation::new(&self.manager)
            .arg("run")
            .arg(self.channel.as_str())
            .arg(command)
            .args(args)
    }

    /// The invocation that prints the toolchain's installation root.
    #[must_use]
    pub fn sysroot_invocation(&self) -> ToolInvocation {
        self.run_invocation("rustc", ["--print", "sysroot"])
    }
}

/// The conventional per-user cargo binary directory, when the home
/// directory can be determined.
#[must_use]
pub fn default_cargo_bin_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".cargo").join("bin"))
}
