//! Configuration types.
//!
//! A field left out of a layer does not touch earlier layers. For
//! `buttons` that includes an explicit `buttons = []`: an empty list reads
//! the same as an absent one, so a later layer can replace the inherited
//! buttons but cannot clear them.

use serde::{Deserialize, Serialize};
use warden_auth::{PolicyElement, RestrictionLevel};

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers.
///
/// # Serialization
///
/// Serializes to TOML for file storage. Every field is optional in the
/// config file.
///
/// # Example
///
/// ```
/// use warden_auth::RestrictionLevel;
/// use warden_runtime::config::WardenConfig;
///
/// let config = WardenConfig::default();
/// assert_eq!(config.admin_restriction(), RestrictionLevel::AdminOnly);
/// assert!(config.buttons.is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WardenConfig {
    /// Restriction level gating the admin pages.
    ///
    /// `None` means "not set in this layer"; the effective value falls
    /// back to [`RestrictionLevel::default`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_restriction: Option<RestrictionLevel>,

    /// Restricted action buttons. Empty means "not set in this layer".
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<PolicyElement>,
}

impl WardenConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective admin restriction level.
    #[must_use]
    pub fn admin_restriction(&self) -> RestrictionLevel {
        self.admin_restriction.unwrap_or_default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// `admin_restriction` is overridden whenever `other` sets it, so a
    /// later layer can tighten the level back to the default. `buttons`
    /// is replaced as a whole when `other` defines any; button lists are
    /// never concatenated across layers, and an empty list in `other`
    /// leaves `self.buttons` unchanged.
    pub fn merge(&mut self, other: &Self) {
        if other.admin_restriction.is_some() {
            self.admin_restriction = other.admin_restriction;
        }
        if !other.buttons.is_empty() {
            self.buttons = other.buttons.clone();
        }
    }
}
