//! Layered loading of [`WardenConfig`].
//!
//! Layers apply in this order, later ones winning per
//! [`WardenConfig::merge`]:
//!
//! 1. built-in defaults
//! 2. `~/.warden/config.toml`
//! 3. `<project root>/.warden/config.toml`
//! 4. `WARDEN_ADMIN_RESTRICTION`

use super::{
    default_config_path, ConfigError, WardenConfig, ADMIN_RESTRICTION_ENV, PROJECT_CONFIG_DIR,
    PROJECT_CONFIG_FILE,
};
use std::path::{Path, PathBuf};
use tracing::debug;
use warden_auth::RestrictionLevel;

/// Builds a [`WardenConfig`] from files and the environment.
///
/// # Example
///
/// ```no_run
/// use warden_runtime::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_project_root("/path/to/project")
///     .skip_env_vars()
///     .load()?;
/// # Ok::<(), warden_runtime::config::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Overrides [`default_config_path`].
    global_config_path: Option<PathBuf>,
    project_root: Option<PathBuf>,
    skip_env: bool,
    skip_global: bool,
    skip_project: bool,
}

impl ConfigLoader {
    /// Loader reading the home directory file and the environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            global_config_path: None,
            project_root: None,
            skip_env: false,
            skip_global: false,
            skip_project: false,
        }
    }

    /// Reads the global layer from `path` instead of the home directory.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Enables the project layer at `<path>/.warden/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Ignores `WARDEN_ADMIN_RESTRICTION`.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips global config loading.
    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Skips project config loading.
    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    /// Resolves the effective configuration.
    ///
    /// A layer whose file does not exist is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unreadable or malformed file and for
    /// an unrecognized environment level.
    pub fn load(&self) -> Result<WardenConfig, ConfigError> {
        let mut config = WardenConfig::default();

        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if let Some(global_config) = self.load_file(&global_path)? {
                debug!(path = %global_path.display(), "Loaded global config");
                config.merge(&global_config);
            }
        }

        if !self.skip_project {
            if let Some(ref project_root) = self.project_root {
                let project_config_path = project_root
                    .join(PROJECT_CONFIG_DIR)
                    .join(PROJECT_CONFIG_FILE);

                if let Some(project_config) = self.load_file(&project_config_path)? {
                    debug!(
                        path = %project_config_path.display(),
                        project = %project_root.display(),
                        "Loaded project config"
                    );
                    config.merge(&project_config);
                }
            }
        }

        if !self.skip_env {
            self.apply_env_vars(&mut config)?;
        }

        debug!(
            admin_restriction = %config.admin_restriction(),
            buttons = config.buttons.len(),
            "Configuration resolved"
        );

        Ok(config)
    }

    /// `None` when `path` is absent.
    fn load_file(&self, path: &Path) -> Result<Option<WardenConfig>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

        let config =
            WardenConfig::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;

        Ok(Some(config))
    }

    fn apply_env_vars(&self, config: &mut WardenConfig) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var(ADMIN_RESTRICTION_ENV) {
            config.admin_restriction = Some(parse_level(ADMIN_RESTRICTION_ENV, &val)?);
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-insensitive, unlike the TOML representation.
fn parse_level(name: &str, value: &str) -> Result<RestrictionLevel, ConfigError> {
    value
        .parse::<RestrictionLevel>()
        .map_err(|e| ConfigError::invalid_env_var(name, e.to_string()))
}

/// Saves a config to `path`, creating the parent directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be written.
pub fn save_config(config: &WardenConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
    }

    let toml = config.to_toml()?;
    std::fs::write(path, toml).map_err(|e| ConfigError::write_file(path, e))?;

    Ok(())
}
