use crate::domain::error::{AppError, Result};
use crate::domain::import_config::ImportConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "inventory-import.toml";
pub const CONFIG_PATH_ENV: &str = "INVENTORY_IMPORT_CONFIG";
pub const ENV_PREFIX: &str = "INVENTORY_IMPORT_";

/// Loads `ImportConfig` from defaults, an optional TOML file and the environment
pub struct ConfigService {
    config_path: PathBuf,
}

impl ConfigService {
    pub fn new() -> Self {
        let config_path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self { config_path }
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn figment(&self) -> Figment {
        Figment::from(Serialized::defaults(ImportConfig::default()))
            .merge(Toml::file(&self.config_path))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"))
    }

    /// Extract and validate the configuration
    pub fn load(&self) -> Result<ImportConfig> {
        Self::extract(self.figment())
    }

    fn extract(figment: Figment) -> Result<ImportConfig> {
        let config: ImportConfig = figment
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Failed to load config: {}", e)))?;
        config.check()?;

        debug!(
            batch_size = config.batch_size,
            sink = ?config.sink,
            "Loaded import configuration"
        );
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
