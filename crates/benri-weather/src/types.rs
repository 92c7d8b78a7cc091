use benri_core::error::{ReqwestErrorExt, RusqliteErrorExt};
use benri_core::{AppError, NetworkError};
use serde::{Deserialize, Serialize};

/// A forecast region (a JMA forecast office)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
}

/// Forecast text for one area inside a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaForecast {
    pub area_name: String,
    pub weather: String,
}

/// Where a forecast was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastSource {
    Cache,
    Network,
}

impl ForecastSource {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Cache => "cached",
            Self::Network => "fetched",
        }
    }
}

/// Forecast for every area of a region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionForecast {
    pub region_id: String,
    pub region_name: String,
    pub areas: Vec<AreaForecast>,
    pub source: ForecastSource,
}

/// Weather provider and cache errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Cache error: {0}")]
    Cache(#[from] rusqlite::Error),
    #[error("Unknown region: {0}")]
    UnknownRegion(String),
    #[error("No forecast for region {0}")]
    NoForecast(String),
}

impl From<WeatherError> for AppError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::Network(e) => AppError::Network(e.into_network_error()),
            WeatherError::Status { status, url } => AppError::Network(NetworkError::ServerError {
                status,
                message: url,
            }),
            WeatherError::Parse(s) => AppError::Network(NetworkError::InvalidResponse(s)),
            WeatherError::Cache(e) => AppError::Database(e.into_database_error()),
            WeatherError::UnknownRegion(id) => {
                AppError::Weather(benri_core::WeatherError::RegionNotFound(id))
            }
            WeatherError::NoForecast(id) => {
                AppError::Weather(benri_core::WeatherError::NoForecast(id))
            }
        }
    }
}
