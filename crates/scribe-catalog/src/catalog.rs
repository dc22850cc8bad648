//! Registry of language-server configurations.
//!
//! The [`Catalog`] stores validated [`ServerConfig`] entries keyed by
//! name and answers the host's lookup questions: which server handles a
//! grammar scope, which handles a syntax, what is registered at all.
//! Duplicate registrations for the same name are rejected.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::builtin::builtin_configs;
use crate::server::ServerConfig;

/// Errors arising from catalog operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A configuration failed validation.
    #[error("invalid server configuration: {message}")]
    InvalidConfig {
        /// Description of the validation failure.
        message: String,
    },

    /// A server with the same name is already registered.
    #[error("server '{name}' is already registered")]
    Duplicate {
        /// Name that was registered twice.
        name: String,
    },
}

/// Registry of available language-server configurations.
///
/// # Example
///
/// ```
/// use std::path::Path;
///
/// use scribe_catalog::Catalog;
///
/// let catalog = Catalog::builtin(Path::new("/opt/scribe/servers"));
/// assert!(catalog.get("rust").is_some());
/// assert_eq!(
///     catalog.find_for_scope("source.css").map(|c| c.name()),
///     Some("css")
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    servers: HashMap<String, ServerConfig>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding the stock server definitions.
    ///
    /// `server_dir` is the directory bundled server scripts are resolved
    /// against. The stock definitions validate by construction, so
    /// registration cannot fail here.
    #[must_use]
    pub fn builtin(server_dir: &Path) -> Self {
        let mut catalog = Self::new();
        for config in builtin_configs(server_dir) {
            // Stock names are unique and validated; failures would be a
            // programming error caught by the builtin tests.
            drop(catalog.register(config));
        }
        catalog
    }

    /// Registers a server configuration after validation.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidConfig`] when validation fails and
    /// [`CatalogError::Duplicate`] when the name is already taken.
    pub fn register(&mut self, config: ServerConfig) -> Result<(), CatalogError> {
        config.validate()?;
        let name = config.name().to_owned();
        if self.servers.contains_key(&name) {
            return Err(CatalogError::Duplicate { name });
        }
        self.servers.insert(name, config);
        Ok(())
    }

    /// Looks up a server by catalog name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ServerConfig> {
        self.servers.get(name)
    }

    /// Returns the server handling the given grammar scope, if any.
    #[must_use]
    pub fn find_for_scope(&self, scope: &str) -> Option<&ServerConfig> {
        self.servers.values().find(|c| c.matches_scope(scope))
    }

    /// Returns the server handling the given syntax name, if any.
    #[must_use]
    pub fn find_for_syntax(&self, syntax: &str) -> Option<&ServerConfig> {
        self.servers.values().find(|c| c.matches_syntax(syntax))
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.servers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered servers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}
