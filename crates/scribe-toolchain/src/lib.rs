//! Toolchain provisioning for externally managed language servers.
//!
//! The `scribe-toolchain` crate implements the provisioning workflow that
//! runs before a language server backed by a version-managed toolchain can
//! start. It is layered on top of [`scribe_exec`]:
//!
//! - the [`Prober`](probe::Prober) inspects the manager's listing output to
//!   decide whether a required toolchain or component set is already
//!   present;
//! - the [`Orchestrator`](orchestrator::Orchestrator) sequences the
//!   manager self-update, toolchain installation, and component
//!   installation, prompting the operator at most once per missing
//!   requirement and short-circuiting once everything is satisfied.
//!
//! Operator interaction goes through the [`Interaction`] seam so hosts can
//! supply dialogs, terminal prompts, or scripted answers. The
//! [`PromptSession`] flag is explicit state passed into each
//! [`ensure_ready`](orchestrator::Orchestrator::ensure_ready) call,
//! keeping test cases isolated from one another.
//!
//! # Example
//!
//! ```no_run
//! use scribe_exec::ProcessRunner;
//! use scribe_toolchain::{Interaction, ManagerProfile, Orchestrator, PromptSession};
//!
//! struct Silent;
//! impl Interaction for Silent {
//!     fn confirm(&self, _message: &str) -> bool {
//!         false
//!     }
//!     fn notify(&self, _message: &str) {}
//! }
//!
//! let profile = ManagerProfile::rust_default();
//! let runner = ProcessRunner;
//! let mut session = PromptSession::new();
//! let orchestrator = Orchestrator::new(&profile, &runner, &Silent);
//! let ready = orchestrator.ensure_ready(&mut session);
//! # drop(ready);
//! ```

pub mod channel;
pub mod env;
pub mod interact;
pub mod manager;
pub mod orchestrator;
pub mod probe;
pub mod session;

#[cfg(test)]
mod tests;

pub use self::channel::{Channel, ChannelParseError, ComponentSet, EmptyComponentSetError};
pub use self::env::{RuntimeEnvBuilder, SOURCE_PATH_VAR};
pub use self::interact::Interaction;
pub use self::manager::ManagerProfile;
pub use self::orchestrator::{Orchestrator, ProvisionPhase};
pub use self::probe::Prober;
pub use self::session::PromptSession;
