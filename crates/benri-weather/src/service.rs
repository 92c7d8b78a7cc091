//! Fetch-then-cache weather lookups.
//!
//! Forecasts are served from the SQLite cache when present and fetched from
//! JMA otherwise. The cache lock is only held for synchronous database work,
//! never across a request.

use std::path::Path;
use std::time::Duration;

use benri_core::WeatherConfig;
use parking_lot::Mutex;

use crate::cache::WeatherCache;
use crate::provider::WeatherProvider;
use crate::types::{ForecastSource, Region, RegionForecast, WeatherError};

pub struct WeatherService {
    provider: WeatherProvider,
    cache: Mutex<WeatherCache>,
    max_age: Option<Duration>,
}

impl WeatherService {
    pub fn new(provider: WeatherProvider, cache: WeatherCache, max_age: Option<Duration>) -> Self {
        Self {
            provider,
            cache: Mutex::new(cache),
            max_age,
        }
    }

    /// Build the provider and open the cache database at `db_path`.
    pub fn from_config(config: &WeatherConfig, db_path: &Path) -> Result<Self, WeatherError> {
        let provider = WeatherProvider::new(config)?;
        let cache = WeatherCache::new(db_path)?;
        Ok(Self::new(provider, cache, config.cache_ttl()))
    }

    /// Refresh the region list from JMA and return what the cache holds.
    ///
    /// A failed fetch falls back to previously cached regions; the error is
    /// only returned when there is nothing cached to show.
    pub async fn sync_regions(&self) -> Result<Vec<Region>, WeatherError> {
        let fetch_error = match self.provider.fetch_regions().await {
            Ok(regions) if regions.is_empty() => {
                tracing::warn!("Area list contained no regions, keeping cached list");
                None
            }
            Ok(regions) => {
                self.cache.lock().store_regions(&regions)?;
                None
            }
            Err(e) => {
                tracing::warn!("Failed to fetch regions, using cached list: {}", e);
                Some(e)
            }
        };

        let regions = self.cached_regions()?;
        match fetch_error {
            Some(e) if regions.is_empty() => Err(e),
            _ => Ok(regions),
        }
    }

    /// Regions from the cache only.
    pub fn cached_regions(&self) -> Result<Vec<Region>, WeatherError> {
        self.cache.lock().list_regions()
    }

    /// Forecast for `region_id`, from cache when available.
    pub async fn forecast(&self, region_id: &str) -> Result<RegionForecast, WeatherError> {
        let region = self.lookup_region(region_id).await?;

        let cached = self.cache.lock().forecast(&region.id, self.max_age)?;
        if !cached.is_empty() {
            tracing::debug!("Serving {} from cache ({} areas)", region.id, cached.len());
            return Ok(RegionForecast {
                region_id: region.id,
                region_name: region.name,
                areas: cached,
                source: ForecastSource::Cache,
            });
        }

        tracing::info!("Fetching forecast for {} ({})", region.name, region.id);
        self.fetch_and_store(region).await
    }

    /// Forecast for `region_id`, always fetched; replaces the cached rows.
    pub async fn refresh_forecast(&self, region_id: &str) -> Result<RegionForecast, WeatherError> {
        let region = self.lookup_region(region_id).await?;
        self.fetch_and_store(region).await
    }

    /// Resolve a region from the cache, fetching the region list first when
    /// nothing has been cached yet.
    async fn lookup_region(&self, region_id: &str) -> Result<Region, WeatherError> {
        let region_id = region_id.trim();

        let cached = self.cache.lock().region(region_id)?;
        if let Some(region) = cached {
            return Ok(region);
        }

        let have_regions = !self.cached_regions()?.is_empty();
        if !have_regions {
            tracing::info!("Region list not cached yet, fetching it");
            self.sync_regions().await?;
            let fetched = self.cache.lock().region(region_id)?;
            if let Some(region) = fetched {
                return Ok(region);
            }
        }

        Err(WeatherError::UnknownRegion(region_id.to_string()))
    }

    async fn fetch_and_store(&self, region: Region) -> Result<RegionForecast, WeatherError> {
        let areas = self.provider.fetch_forecast(&region.id).await?;

        self.cache
            .lock()
            .replace_forecast(&region.id, &region.name, &areas)?;

        Ok(RegionForecast {
            region_id: region.id,
            region_name: region.name,
            areas,
            source: ForecastSource::Network,
        })
    }
}
