use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Placeholder substituted with a region id in the forecast URL template.
pub const AREA_CODE_PLACEHOLDER: &str = "{area_code}";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the weather cache database
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Calculator settings
    #[serde(default)]
    pub calc: CalcConfig,

    /// Weather settings
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalcConfig {
    /// Decimal places kept when a result is not a whole number
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

fn default_decimal_places() -> u32 {
    6
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            decimal_places: default_decimal_places(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// JMA area list (regions are its `offices` entries)
    #[serde(default = "default_area_url")]
    pub area_url: String,

    /// Forecast URL with `{area_code}` standing in for the region id
    #[serde(default = "default_forecast_url_template")]
    pub forecast_url_template: String,

    /// SQLite file name, relative to `data_dir`
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Retries for transient HTTP failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Age after which a cached forecast is refetched (0 = never)
    #[serde(default)]
    pub cache_ttl_minutes: u32,
}

fn default_area_url() -> String {
    "https://www.jma.go.jp/bosai/common/const/area.json".to_string()
}

fn default_forecast_url_template() -> String {
    "https://www.jma.go.jp/bosai/forecast/data/forecast/{area_code}.json".to_string()
}

fn default_database_file() -> String {
    "weather_data.db".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            area_url: default_area_url(),
            forecast_url_template: default_forecast_url_template(),
            database_file: default_database_file(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            cache_ttl_minutes: 0,
        }
    }
}

impl WeatherConfig {
    /// Forecast URL for one region.
    pub fn forecast_url(&self, region_id: &str) -> String {
        self.forecast_url_template
            .replace(AREA_CODE_PLACEHOLDER, region_id)
    }

    /// Cache TTL, or `None` when cached forecasts never expire.
    pub fn cache_ttl(&self) -> Option<std::time::Duration> {
        match self.cache_ttl_minutes {
            0 => None,
            minutes => Some(std::time::Duration::from_secs(u64::from(minutes) * 60)),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("benri")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            calc: CalcConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path().map_err(|e| ConfigError::Io(format!("{:#}", e)))?;
        Self::load_from(&path)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config at {}, writing defaults", path.display());
            let config = Self::default();
            config
                .save_to(path)
                .map_err(|e| ConfigError::Io(format!("{:#}", e)))?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails; warnings are logged.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult), ConfigError> {
        let config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.calc.decimal_places > 15 {
            result.add_error(
                "calc.decimal_places",
                format!(
                    "Decimal places must be at most 15, got {}",
                    self.calc.decimal_places
                ),
            );
        }

        validate_url(&self.weather.area_url, "weather.area_url", &mut result);

        if !self
            .weather
            .forecast_url_template
            .contains(AREA_CODE_PLACEHOLDER)
        {
            result.add_error(
                "weather.forecast_url_template",
                format!("Template must contain {}", AREA_CODE_PLACEHOLDER),
            );
        } else {
            validate_url(
                &self.weather.forecast_url("000000"),
                "weather.forecast_url_template",
                &mut result,
            );
        }

        if self.weather.database_file.trim().is_empty() {
            result.add_error("weather.database_file", "Database file name is empty");
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if self.weather.cache_ttl_minutes > 7 * 24 * 60 {
            result.add_warning(
                "weather.cache_ttl_minutes",
                "Cached forecasts are kept for more than a week",
            );
        }

        result
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("benri");

        Ok(config_dir.join("config.toml"))
    }
}

/// Validate a URL field
fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}
