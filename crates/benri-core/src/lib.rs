pub mod app;
pub mod config;
pub mod error;

pub use app::App;
pub use config::{CalcConfig, Config, ValidationResult, WeatherConfig};
pub use error::{AppError, CalcError, ConfigError, DatabaseError, NetworkError, WeatherError};

use anyhow::Result;

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Initialize the core application
pub fn init() -> Result<()> {
    // Logs go to stderr so calculator output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Benri core initialized");
    Ok(())
}
