//! Warden runtime - configuration and settings layer.
//!
//! This crate connects the authorization resolver in `warden-auth` to
//! on-disk configuration. It provides the layered TOML config and the
//! config-backed settings collaborator.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  warden-types   : Identity, ScopeRef, keys, ErrorCode    │
//! ├──────────────────────────────────────────────────────────┤
//! │  warden-auth    : RestrictionLevel, AccessResolver,      │
//! │                   collaborator traits, diagnostics       │
//! ├──────────────────────────────────────────────────────────┤
//! │  warden-runtime : (THIS CRATE)                           │
//! │    config/      : WardenConfig, ConfigLoader             │
//! │    settings     : ConfiguredSettings (SettingsSource)    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! ## [`config`] - Configuration Management
//!
//! - [`WardenConfig`](config::WardenConfig): admin restriction + buttons
//! - [`ConfigLoader`](config::ConfigLoader): global → project → env layering
//!
//! ## [`settings`] - Settings Source
//!
//! - [`ConfiguredSettings`]: serves the loaded config to `AccessResolver`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use warden_runtime::config::ConfigLoader;
//! use warden_runtime::ConfiguredSettings;
//!
//! let settings = Arc::new(ConfiguredSettings::load(
//!     ConfigLoader::new().with_project_root("."),
//! )?);
//! let buttons = settings.buttons();
//! # Ok::<(), warden_runtime::config::ConfigError>(())
//! ```

pub mod config;
pub mod settings;

pub use config::{ConfigError, ConfigLoader, WardenConfig};
pub use settings::ConfiguredSettings;
