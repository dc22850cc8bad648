//! Per-server configuration types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use scribe_exec::find_in_path;
use scribe_toolchain::ManagerProfile;

use crate::catalog::CatalogError;

/// One language a server handles, with the host's matching rows.
///
/// `scopes` are the grammar scope selectors the host matches against open
/// documents; `syntaxes` are the syntax-definition names it matches
/// against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageScope {
    /// Language identifier reported to the server (e.g. `rust`).
    pub id: String,
    /// Grammar scope selectors (e.g. `source.rust`).
    pub scopes: Vec<String>,
    /// Syntax-definition names (e.g. `rust`).
    pub syntaxes: Vec<String>,
}

impl LanguageScope {
    /// Builds a matching row for one language.
    #[must_use]
    pub fn new<I, S, J, T>(id: impl Into<String>, scopes: I, syntaxes: J) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            id: id.into(),
            scopes: scopes.into_iter().map(Into::into).collect(),
            syntaxes: syntaxes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Configuration for launching and matching one language server.
///
/// Validated on registration: the name, title, and at least one language
/// row must be present.
///
/// # Example
///
/// ```
/// use scribe_catalog::{LanguageScope, ServerConfig};
///
/// let config = ServerConfig::new("html", "HTML Language Server", "node")
///     .arg("html-languageserver.js")
///     .arg("--stdio")
///     .language(LanguageScope::new("html", ["text.html.basic"], ["html"]));
/// assert_eq!(config.command(), "node");
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    name: String,
    title: String,
    command: String,
    args: Vec<String>,
    languages: Vec<LanguageScope>,
    init_options: Value,
    settings: Value,
    provisioning: Option<ManagerProfile>,
}

impl ServerConfig {
    /// Creates a configuration for the given catalog name, human-readable
    /// server title, and launch command.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            command: command.into(),
            args: Vec::new(),
            languages: Vec::new(),
            init_options: Value::Null,
            settings: Value::Null,
            provisioning: None,
        }
    }

    /// Appends one launch argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several launch arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Adds one language matching row.
    #[must_use]
    pub fn language(mut self, language: LanguageScope) -> Self {
        self.languages.push(language);
        self
    }

    /// Sets the initialization options sent with the LSP handshake.
    #[must_use]
    pub fn init_options(mut self, options: Value) -> Self {
        self.init_options = options;
        self
    }

    /// Sets the default workspace settings payload.
    #[must_use]
    pub fn settings(mut self, settings: Value) -> Self {
        self.settings = settings;
        self
    }

    /// Attaches a toolchain-manager profile; the launch guard will run the
    /// provisioning workflow for this server before startup.
    #[must_use]
    pub fn provisioned_by(mut self, profile: ManagerProfile) -> Self {
        self.provisioning = Some(profile);
        self
    }

    /// Catalog name (e.g. `rust`).
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Human-readable server title (e.g. `Rust Language Server`).
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// The executable the host spawns.
    #[must_use]
    pub fn command(&self) -> &str {
        self.command.as_str()
    }

    /// Launch arguments, excluding the command itself.
    #[must_use]
    pub fn launch_args(&self) -> &[String] {
        self.args.as_slice()
    }

    /// Language matching rows.
    #[must_use]
    pub fn languages(&self) -> &[LanguageScope] {
        self.languages.as_slice()
    }

    /// Initialization options, `Null` when none are configured.
    #[must_use]
    pub const fn initialization_options(&self) -> &Value {
        &self.init_options
    }

    /// Default settings payload, `Null` when none is configured.
    #[must_use]
    pub const fn default_settings(&self) -> &Value {
        &self.settings
    }

    /// The attached toolchain-manager profile, when this server is backed
    /// by a managed toolchain.
    #[must_use]
    pub const fn provisioning(&self) -> Option<&ManagerProfile> {
        self.provisioning.as_ref()
    }

    /// Whether the required launch command can be located on the given
    /// search path.
    #[must_use]
    pub fn is_available(&self, path_value: &str) -> bool {
        find_in_path(&self.command, path_value).is_some()
    }

    /// Whether any language row matches the given grammar scope.
    #[must_use]
    pub fn matches_scope(&self, scope: &str) -> bool {
        self.languages
            .iter()
            .any(|language| language.scopes.iter().any(|s| s == scope))
    }

    /// Whether any language row matches the given syntax name.
    #[must_use]
    pub fn matches_syntax(&self, syntax: &str) -> bool {
        let lower = syntax.to_ascii_lowercase();
        self.languages
            .iter()
            .any(|language| language.syntaxes.iter().any(|s| s.to_ascii_lowercase() == lower))
    }

    /// Validates the configuration for registration.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidConfig`] when the name, title, or
    /// language rows are missing.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::InvalidConfig {
                message: String::from("server name must not be empty"),
            });
        }
        if self.title.trim().is_empty() {
            return Err(CatalogError::InvalidConfig {
                message: format!("server '{}' has no title", self.name),
            });
        }
        if self.command.trim().is_empty() {
            return Err(CatalogError::InvalidConfig {
                message: format!("server '{}' has no launch command", self.name),
            });
        }
        if self.languages.is_empty() {
            return Err(CatalogError::InvalidConfig {
                message: format!("server '{}' declares no languages", self.name),
            });
        }
        Ok(())
    }
}
