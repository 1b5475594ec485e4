use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::discovery::{find_database_path, MendeleyPaths};
use crate::errors::{LookupError, Result};

/// Name of the configuration file inside the application's config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Name of the per-user directory holding our configuration.
pub const APP_DIR: &str = "mendeley-lookup";

/// Plugin settings, stored under the `[mendeley]` section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Path to the Mendeley SQLite database chosen by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
}

/// On-disk layout of the config file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    mendeley: LookupConfig,
}

impl LookupConfig {
    /// Returns the configured database path, ignoring blank values.
    pub fn configured_database_path(&self) -> Option<PathBuf> {
        self.database_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    /// Records a new database path. A blank path keeps the current value.
    pub fn set_database_path(&mut self, path: &str) {
        let path = path.trim();
        if !path.is_empty() {
            self.database_path = Some(path.to_string());
        }
    }

    /// Returns the configured database path, falling back to discovering
    /// Mendeley's default database when none is set.
    pub fn effective_database_path(&self, paths: Option<&MendeleyPaths>) -> Option<PathBuf> {
        self.configured_database_path()
            .or_else(|| paths.and_then(find_database_path))
    }
}

/// Returns the default location of the configuration file, or `None` if the
/// platform has no per-user config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Loads the configuration from `config_path`.
///
/// If the file does not exist, returns the default (empty) configuration.
pub fn load_config(config_path: &Path) -> Result<LookupConfig> {
    if !config_path.exists() {
        return Ok(LookupConfig::default());
    }

    let contents = fs::read_to_string(config_path).map_err(|e| LookupError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let file: ConfigFile = toml::from_str(&contents).map_err(|e| LookupError::Config {
        message: format!(
            "failed to parse config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    Ok(file.mendeley)
}

/// Saves the configuration to `config_path` using an atomic write.
///
/// Writes to a temporary file first and then renames it to the final location,
/// so a partial write never corrupts the configuration.
pub fn save_config(config_path: &Path, config: &LookupConfig) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| LookupError::Config {
            message: format!(
                "failed to create config directory '{}': {}",
                parent.display(),
                e
            ),
        })?;
    }

    let tmp_path = config_path.with_extension("tmp");

    let file = ConfigFile {
        mendeley: config.clone(),
    };
    let contents = toml::to_string_pretty(&file).map_err(|e| LookupError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &contents).map_err(|e| LookupError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, config_path).map_err(|e| LookupError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    tracing::info!(path = %config_path.display(), "saved configuration");
    Ok(())
}
