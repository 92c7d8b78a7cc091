use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{Config, ConfigError};

/// Main application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
}

impl App {
    /// Create a new application instance, loading config from `config_path`
    /// or the default location
    pub fn new(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _) = Config::load_validated(config_path)?;
        Ok(Self::with_config(config))
    }

    /// Create an application around an already loaded config
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Prepare the data directory
    pub fn initialize(&mut self) -> Result<()> {
        let data_dir = &self.config.data_dir;
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        tracing::info!("Application initialized (data dir: {})", data_dir.display());
        Ok(())
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Location of the weather cache database
    pub fn weather_db_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.weather.database_file)
    }
}
