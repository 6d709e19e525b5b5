use crate::merge::{SourceNames, SOURCE_CLUSTER_NAME, SOURCE_USER_NAME};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User preferences read from `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    #[serde(default)]
    pub backup: bool,
    #[serde(default)]
    pub source: SourceConfig,
}

/// Entry names to pick from the piped source configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct SourceConfig {
    #[serde(default = "default_cluster_name")]
    pub cluster: String,
    #[serde(default = "default_user_name")]
    pub user: String,
}

fn default_cluster_name() -> String {
    SOURCE_CLUSTER_NAME.to_string()
}

fn default_user_name() -> String {
    SOURCE_USER_NAME.to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self { cluster: default_cluster_name(), user: default_user_name() }
    }
}

impl From<&SourceConfig> for SourceNames {
    fn from(config: &SourceConfig) -> Self {
        Self { cluster: config.cluster.clone(), user: config.user.clone() }
    }
}

impl AppConfig {
    /// Load the application configuration from the default path
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Unable to determine the config directory
    /// - Unable to read the config file (other than it not existing)
    /// - The config file contains invalid TOML
    pub fn load() -> Result<Option<Self>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config at {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Get the path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if unable to determine the config directory
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
            Ok(PathBuf::from(config_home).join("metalogin").join("config.toml"))
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", "metalogin") {
            Ok(proj_dirs.config_dir().join("config.toml"))
        } else {
            anyhow::bail!("Could not determine config directory")
        }
    }

    pub fn source_names(&self) -> SourceNames {
        SourceNames::from(&self.source)
    }
}
