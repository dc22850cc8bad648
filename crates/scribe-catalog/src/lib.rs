//! Declarative language-server catalog and launch-readiness checks.
//!
//! The `scribe-catalog` crate holds the per-language configuration the
//! host's LSP client consumes: one [`ServerConfig`] per language server
//! with its launch command line, workspace scope/syntax matching rows,
//! and default settings payloads. The [`Catalog`] registry stores the
//! stock definitions and any host-registered overrides.
//!
//! Configuration here is data; the only behaviour is the
//! [`LaunchGuard`](startup::LaunchGuard), the client-startup hook that
//! verifies a server's required binary exists and, for servers backed by
//! a managed toolchain, runs the provisioning workflow from
//! [`scribe_toolchain`] before the host may spawn anything.

pub mod builtin;
pub mod catalog;
pub mod server;
pub mod startup;
pub mod workspace;

pub use self::catalog::{Catalog, CatalogError};
pub use self::server::{LanguageScope, ServerConfig};
pub use self::startup::{
    LaunchGuard, NotificationHandler, NotificationHub, PROGRESS_METHODS,
    register_progress_handlers,
};
pub use self::workspace::find_marker;
