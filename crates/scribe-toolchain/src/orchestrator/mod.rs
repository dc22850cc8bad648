//! The provisioning state machine.
//!
//! [`Orchestrator::ensure_ready`] drives the machine
//! `Start → Updating → CheckingToolchain → InstallingToolchain →
//! CheckingComponents → InstallingComponents → Ready`, with a parallel
//! `Failed` terminal reachable from every non-`Ready` phase. The manager
//! self-update is best-effort; toolchain and component installation are
//! fatal on failure. Interactive prompts are governed by the
//! [`PromptSession`]: one prompt per missing requirement per process
//! lifetime, and a decline or a failed install exhausts prompting for the
//! rest of the session.

use std::collections::HashMap;

use scribe_exec::{CommandRunner, ExecError};
use tracing::{debug, warn};

use crate::interact::Interaction;
use crate::manager::ManagerProfile;
use crate::probe::Prober;
use crate::session::PromptSession;

/// Tracing target for orchestrator operations.
const ORCHESTRATOR_TARGET: &str = "scribe_toolchain::orchestrator";

/// Phases of the provisioning state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionPhase {
    /// Entry phase; verifies the manager tool exists at all.
    Start,
    /// Best-effort manager self-update.
    Updating,
    /// Probing for the required toolchain.
    CheckingToolchain,
    /// Installing the missing toolchain after operator confirmation.
    InstallingToolchain,
    /// Probing for the required component set.
    CheckingComponents,
    /// Installing missing components after operator confirmation.
    InstallingComponents,
    /// Terminal: every requirement is satisfied.
    Ready,
    /// Terminal: a requirement could not be satisfied.
    Failed,
}

/// Sequences manager update, toolchain install, and component install.
///
/// The orchestrator is stateless between calls apart from the
/// [`PromptSession`] passed into [`Orchestrator::ensure_ready`], which is
/// the only piece of state shared across repeated startup attempts within
/// one process lifetime.
#[derive(Debug)]
pub struct Orchestrator<'a, R, I> {
    profile: &'a ManagerProfile,
    runner: &'a R,
    interaction: &'a I,
    env: HashMap<String, String>,
    search_path: String,
}

impl<'a, R: CommandRunner, I: Interaction> Orchestrator<'a, R, I> {
    /// Creates an orchestrator over the given profile, runner, and
    /// interaction surface.
    ///
    /// The search path used for the manager existence check defaults to
    /// the ambient `PATH`; [`Orchestrator::with_env`] overrides it when
    /// the overlay carries its own `PATH` entry.
    #[must_use]
    pub fn new(profile: &'a ManagerProfile, runner: &'a R, interaction: &'a I) -> Self {
        Self {
            profile,
            runner,
            interaction,
            env: HashMap::new(),
            search_path: std::env::var("PATH").unwrap_or_default(),
        }
    }

    /// Applies an environment overlay to every manager invocation.
    #[must_use]
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        if let Some(path) = env.get("PATH") {
            self.search_path = path.clone();
        }
        self.env = env;
        self
    }

    /// Runs the machine to a terminal phase.
    ///
    /// Returns `true` iff the machine reaches
    /// [`ProvisionPhase::Ready`]. On `false` the caller must not launch
    /// the language server; a `notify` message explaining the failure has
    /// already been issued.
    pub fn ensure_ready(&self, session: &mut PromptSession) -> bool {
        let mut phase = ProvisionPhase::Start;
        loop {
            debug!(target: ORCHESTRATOR_TARGET, ?phase, "provisioning phase");
            phase = match phase {
                ProvisionPhase::Start => self.enter(),
                ProvisionPhase::Updating => self.update(),
                ProvisionPhase::CheckingToolchain => self.check_toolchain(session),
                ProvisionPhase::InstallingToolchain => self.install_toolchain(session),
                ProvisionPhase::CheckingComponents => self.check_components(session),
                ProvisionPhase::InstallingComponents => self.install_components(session),
                ProvisionPhase::Ready => return true,
                ProvisionPhase::Failed => return false,
            };
        }
    }

    /// Manager existence precheck; nothing else runs when it fails.
    fn enter(&self) -> ProvisionPhase {
        if self.profile.is_on_path(&self.search_path) {
            return ProvisionPhase::Updating;
        }
        self.interaction.notify(&format!(
            "{} is not installed; cannot provision the {} toolchain",
            self.profile.manager(),
            self.profile.channel()
        ));
        ProvisionPhase::Failed
    }

    /// Best-effort self-update; a failure is reported but never fatal.
    fn update(&self) -> ProvisionPhase {
        let invocation = self.profile.update_invocation().envs(&self.env);
        match self.runner.run(&invocation) {
            Ok(result) => {
                // Imperfect with several toolchains installed, where one may
                // update while another is unchanged, but parsing the full
                // update report is not worth the trouble.
                if result.stdout().contains("unchanged") {
                    self.interaction
                        .notify(&format!("{} is up to date", self.profile.manager()));
                } else {
                    self.interaction.notify(&format!(
                        "{} updated; restart the host for changes to take effect",
                        self.profile.manager()
                    ));
                }
            }
            Err(err) => {
                warn!(
                    target: ORCHESTRATOR_TARGET,
                    manager = self.profile.manager(),
                    error = %err,
                    "manager self-update failed, continuing"
                );
                self.interaction.notify(&format!(
                    "an error occurred while updating {}",
                    self.profile.manager()
                ));
            }
        }
        ProvisionPhase::CheckingToolchain
    }

    fn check_toolchain(&self, session: &mut PromptSession) -> ProvisionPhase {
        if self.prober().has_toolchain() {
            return ProvisionPhase::CheckingComponents;
        }
        if session.prompts_exhausted() {
            self.interaction.notify(&format!(
                "the {} toolchain is not installed",
                self.profile.channel()
            ));
            return ProvisionPhase::Failed;
        }
        let confirmed = self.interaction.confirm(&format!(
            "The {} toolchain is not installed.\nInstall now?",
            self.profile.channel()
        ));
        if confirmed {
            return ProvisionPhase::InstallingToolchain;
        }
        session.exhaust();
        self.interaction.notify(&format!(
            "cannot continue without the {} toolchain",
            self.profile.channel()
        ));
        ProvisionPhase::Failed
    }

    fn install_toolchain(&self, session: &mut PromptSession) -> ProvisionPhase {
        self.interaction.notify(&format!(
            "installing the {} toolchain…",
            self.profile.channel()
        ));
        let invocation = self.profile.toolchain_install_invocation().envs(&self.env);
        match self.runner.run(&invocation) {
            Ok(_) => {
                self.interaction.notify(&format!(
                    "{} toolchain installed successfully",
                    self.profile.channel()
                ));
                ProvisionPhase::CheckingComponents
            }
            Err(err) => {
                session.exhaust();
                self.fail_install(&err, &format!("the {} toolchain", self.profile.channel()))
            }
        }
    }

    fn check_components(&self, session: &mut PromptSession) -> ProvisionPhase {
        if self.prober().has_components() {
            return ProvisionPhase::Ready;
        }
        if session.prompts_exhausted() {
            self.interaction
                .notify("language server components are not installed");
            return ProvisionPhase::Failed;
        }
        let confirmed = self
            .interaction
            .confirm("Language server components are not installed.\nInstall now?");
        if confirmed {
            return ProvisionPhase::InstallingComponents;
        }
        session.exhaust();
        self.interaction
            .notify("cannot continue without the required components");
        ProvisionPhase::Failed
    }

    /// Installs each component in set order, aborting at the first
    /// failure. Components installed before the failure stay installed.
    fn install_components(&self, session: &mut PromptSession) -> ProvisionPhase {
        self.interaction.notify("installing components…");
        for component in self.profile.components().names() {
            let invocation = self.profile.component_add_invocation(component).envs(&self.env);
            if let Err(err) = self.runner.run(&invocation) {
                session.exhaust();
                return self.fail_install(&err, &format!("component '{component}'"));
            }
            debug!(
                target: ORCHESTRATOR_TARGET,
                component, "component installed"
            );
        }
        self.interaction.notify("components installed successfully");
        ProvisionPhase::Ready
    }

    /// Reports a failed install, distinguishing a missing manager from an
    /// install the manager itself rejected.
    fn fail_install(&self, err: &ExecError, requirement: &str) -> ProvisionPhase {
        warn!(
            target: ORCHESTRATOR_TARGET,
            requirement,
            error = %err,
            "install attempt failed"
        );
        if err.is_tool_not_found() {
            self.interaction.notify(&format!(
                "{} is not installed; cannot provision {requirement}",
                self.profile.manager()
            ));
        } else {
            self.interaction
                .notify(&format!("could not install {requirement}"));
        }
        ProvisionPhase::Failed
    }

    fn prober(&self) -> Prober<'_, R> {
        Prober::new(self.runner, self.profile, &self.env)
    }
}
