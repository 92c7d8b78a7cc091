//! Regional weather forecasts for Benri
//!
//! Fetches the JMA forecast-office list and per-region forecasts, caching
//! both in SQLite so repeat lookups work offline.

pub mod cache;
pub mod provider;
pub mod retry;
pub mod service;
pub mod types;

pub use cache::WeatherCache;
pub use provider::WeatherProvider;
pub use retry::RetryConfig;
pub use service::WeatherService;
pub use types::*;
