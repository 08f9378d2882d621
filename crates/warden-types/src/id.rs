//! Identifier and key types for warden.
//!
//! Two families live here:
//!
//! - **Keys** ([`UserKey`], [`ProjectKey`], [`RepositorySlug`]): the
//!   human-facing strings that configuration refers to.
//! - **Entity IDs** ([`ProjectId`], [`RepositoryId`]): UUID-based handles
//!   carried by resolved entity references.
//!
//! # Empty Means Absent
//!
//! Configuration stores optional scope fields as plain strings, so an
//! empty string and a missing value must mean the same thing.
//! [`ProjectKey::parse`] and [`RepositorySlug::parse`] are the only place
//! where that normalization happens: they return `None` for empty input,
//! so a constructed key is never empty. Anything else, including
//! surrounding whitespace, is kept verbatim; a padded key names a
//! different (usually missing) scope.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a key is built from an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} must not be empty")]
pub struct EmptyKeyError {
    kind: &'static str,
}

impl EmptyKeyError {
    /// Which key type rejected the input ("project key", "repository slug").
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

/// Stable key identifying a user for permission lookups.
///
/// # Example
///
/// ```
/// use warden_types::UserKey;
///
/// let key = UserKey::new("alice");
/// assert_eq!(key.as_str(), "alice");
/// assert_eq!(format!("{key}"), "user:alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserKey(String);

impl UserKey {
    /// Creates a user key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// Declares a non-empty string key with `parse` normalization.
macro_rules! non_empty_key {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parses a key, treating empty input as absent.
            ///
            /// The input is stored verbatim.
            #[must_use]
            pub fn parse(raw: &str) -> Option<Self> {
                if raw.is_empty() {
                    None
                } else {
                    Some(Self(raw.to_string()))
                }
            }

            /// Returns the key as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = EmptyKeyError;

            fn try_from(raw: String) -> Result<Self, Self::Error> {
                Self::parse(&raw).ok_or(EmptyKeyError { kind: $kind })
            }
        }

        impl TryFrom<&str> for $name {
            type Error = EmptyKeyError;

            fn try_from(raw: &str) -> Result<Self, Self::Error> {
                Self::parse(raw).ok_or(EmptyKeyError { kind: $kind })
            }
        }

        impl From<$name> for String {
            fn from(key: $name) -> Self {
                key.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

non_empty_key!(
    /// Key of a project (e.g. `ACME`).
    ///
    /// # Example
    ///
    /// ```
    /// use warden_types::ProjectKey;
    ///
    /// assert!(ProjectKey::parse("").is_none());
    /// assert_eq!(ProjectKey::parse(" ACME").map(|k| k.to_string()), Some(" ACME".into()));
    /// assert_eq!(ProjectKey::parse("ACME").map(|k| k.to_string()), Some("ACME".into()));
    /// ```
    ProjectKey,
    "project key"
);

non_empty_key!(
    /// Slug of a repository within a project (e.g. `repo1`).
    RepositorySlug,
    "repository slug"
);

/// Declares a UUID-backed entity identifier.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new identifier with a random UUID v4.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the inner UUID.
            #[must_use]
            pub fn uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a resolved project entity.
    ProjectId,
    "project"
);

entity_id!(
    /// Identifier of a resolved repository entity.
    RepositoryId,
    "repo"
);
