//! Configuration management with hierarchical layering.
//!
//! # Architecture
//!
//! Configuration is loaded from multiple sources with priority-based merging:
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌───────────────────────────────────────────┐
//! │  1. Environment Variables (WARDEN_*)      │  Runtime override
//! ├───────────────────────────────────────────┤
//! │  2. Project Config (.warden/config.toml)  │  Project-specific
//! ├───────────────────────────────────────────┤
//! │  3. Global Config (~/.warden/config.toml) │  Installation defaults
//! ├───────────────────────────────────────────┤
//! │  4. Default Values (compile-time)         │  Fallback
//! └───────────────────────────────────────────┘
//! ```
//!
//! `admin_restriction` is taken from the highest layer that sets it.
//! `buttons` is taken whole from the highest layer with a non-empty list;
//! an empty list cannot clear buttons inherited from a lower layer.
//!
//! # Usage
//!
//! ```no_run
//! use warden_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .with_project_root("/path/to/project")
//!     .load()?;
//!
//! for button in &config.buttons {
//!     println!("{button}");
//! }
//! # Ok::<(), warden_runtime::config::ConfigError>(())
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Values |
//! |----------|--------------|--------|
//! | `WARDEN_ADMIN_RESTRICTION` | `admin_restriction` | `EVERYONE`, `ADMIN`, `SYSTEM_ADMIN` |
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.warden/config.toml
//!
//! # Who may open the admin pages
//! admin_restriction = "ADMIN"
//!
//! [[buttons]]
//! name = "Trigger build"
//! restriction = "EVERYONE"
//!
//! [[buttons]]
//! name = "Merge"
//! restriction = "ADMIN"
//! project_key = "ACME"
//! repository_slug = "repo1"
//! ```

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::{save_config, ConfigLoader};
pub use types::WardenConfig;

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".warden")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".warden";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding `admin_restriction`.
pub const ADMIN_RESTRICTION_ENV: &str = "WARDEN_ADMIN_RESTRICTION";
