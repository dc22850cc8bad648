//! Release channels and required component sets.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A named release track of the managed toolchain.
///
/// Fixed for the lifetime of one provisioning session; read-only
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Channel(String);

impl Channel {
    /// The channel the built-in rust profile tracks.
    pub const NIGHTLY: &'static str = "nightly";

    /// Creates a channel from an identifier such as `stable` or `nightly`.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    /// Returns the channel identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Errors raised when parsing channel identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("channel identifier must not be empty")]
pub struct ChannelParseError;

impl FromStr for Channel {
    type Err = ChannelParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ChannelParseError);
        }
        Ok(Self::new(trimmed))
    }
}

/// The ordered set of add-on components a language server requires.
///
/// Non-empty by construction: [`ComponentSet::new`] takes the first member
/// separately, so an empty set cannot be expressed. Installation order
/// follows the order given here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSet(Vec<String>);

impl ComponentSet {
    /// Builds a component set from its first member and any further ones.
    #[must_use]
    pub fn new<I, S>(first: impl Into<String>, rest: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names = vec![first.into()];
        names.extend(rest.into_iter().map(Into::into));
        Self(names)
    }

    /// Builds a component set from a vector, rejecting an empty one.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyComponentSetError`] when `names` has no members.
    pub fn try_from_names(names: Vec<String>) -> Result<Self, EmptyComponentSetError> {
        if names.is_empty() {
            return Err(EmptyComponentSetError);
        }
        Ok(Self(names))
    }

    /// Returns the component names in installation order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        self.0.as_slice()
    }

    /// Returns the number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with collection types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Error raised when a component set would be empty.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("a component set must name at least one component")]
pub struct EmptyComponentSetError;
