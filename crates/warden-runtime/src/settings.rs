//! Config-backed [`SettingsSource`].
//!
//! Provides [`ConfiguredSettings`], which serves the admin restriction
//! level and the configured buttons from a loaded [`WardenConfig`].
//!
//! # Architecture
//!
//! ```text
//! SettingsSource trait (warden-auth)         ← abstract definition
//!          │
//!          └── ConfiguredSettings (THIS MODULE)   ← concrete impl
//!                   │
//!                   └── ConfigLoader → WardenConfig
//! ```
//!
//! # Reloading
//!
//! The config sits behind a `RwLock`. [`reload`](ConfiguredSettings::reload)
//! re-runs the loader and swaps the config in one write. A failed reload
//! leaves the previous config in place.

use crate::config::{ConfigError, ConfigLoader, WardenConfig};
use parking_lot::RwLock;
use warden_auth::{CollaboratorError, PolicyElement, RestrictionLevel, SettingsSource};

/// Settings served from layered configuration.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use warden_auth::testing::{GrantTable, InMemoryDirectory, StaticIdentity};
/// use warden_auth::{AccessResolver, Identity, RestrictionLevel, ScopeRef};
/// use warden_runtime::config::WardenConfig;
/// use warden_runtime::ConfiguredSettings;
///
/// let settings = Arc::new(ConfiguredSettings::new(WardenConfig {
///     admin_restriction: Some(RestrictionLevel::Everyone),
///     ..Default::default()
/// }));
///
/// let resolver = AccessResolver::new(
///     Arc::new(StaticIdentity::signed_in(Identity::user("alice"))),
///     Arc::new(InMemoryDirectory::new()),
///     Arc::new(GrantTable::new()),
///     settings,
/// );
///
/// assert!(resolver.is_admin_allowed(&ScopeRef::Global).unwrap());
/// ```
#[derive(Debug)]
pub struct ConfiguredSettings {
    config: RwLock<WardenConfig>,
    loader: Option<ConfigLoader>,
}

impl ConfiguredSettings {
    /// Serves a fixed config. [`reload`](Self::reload) is a no-op.
    #[must_use]
    pub fn new(config: WardenConfig) -> Self {
        Self {
            config: RwLock::new(config),
            loader: None,
        }
    }

    /// Loads config through `loader` and keeps it for later reloads.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the initial load fails.
    pub fn load(loader: ConfigLoader) -> Result<Self, ConfigError> {
        let config = loader.load()?;
        Ok(Self {
            config: RwLock::new(config),
            loader: Some(loader),
        })
    }

    /// Re-runs the loader and replaces the current config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if loading fails; the previous config is kept.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let Some(loader) = &self.loader else {
            return Ok(());
        };

        match loader.load() {
            Ok(config) => {
                self.replace(config);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "settings reload failed, keeping previous config");
                Err(e)
            }
        }
    }

    /// Replaces the current config.
    pub fn replace(&self, config: WardenConfig) {
        let mut current = self.config.write();
        if current.admin_restriction() != config.admin_restriction() {
            tracing::info!(
                from = %current.admin_restriction(),
                to = %config.admin_restriction(),
                "admin restriction changed"
            );
        }
        *current = config;
    }

    /// Returns a copy of the current config.
    #[must_use]
    pub fn snapshot(&self) -> WardenConfig {
        self.config.read().clone()
    }

    /// Returns a copy of the configured buttons, in configuration order.
    #[must_use]
    pub fn buttons(&self) -> Vec<PolicyElement> {
        self.config.read().buttons.clone()
    }
}

impl SettingsSource for ConfiguredSettings {
    fn admin_restriction(&self) -> Result<RestrictionLevel, CollaboratorError> {
        Ok(self.config.read().admin_restriction())
    }
}
