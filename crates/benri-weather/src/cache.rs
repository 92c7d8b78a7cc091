//! SQLite cache for regions and forecasts, keyed by region id.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::types::{AreaForecast, Region, WeatherError};

const INSERT_FORECAST: &str = r#"
    INSERT INTO weather (region_id, region_name, area_name, weather, fetched_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
"#;

/// SQLite cache for weather data.
pub struct WeatherCache {
    conn: Connection,
}

impl WeatherCache {
    /// Open (or create) the cache at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, WeatherError> {
        let conn = Connection::open(path)?;
        let cache = Self { conn };
        cache.init_schema()?;
        Ok(cache)
    }

    /// Create an in-memory cache (for testing).
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, WeatherError> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.init_schema()?;
        Ok(cache)
    }

    fn init_schema(&self) -> Result<(), WeatherError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS regions (
                region_id TEXT PRIMARY KEY,
                region_name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS weather (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                region_id TEXT NOT NULL,
                region_name TEXT NOT NULL,
                area_name TEXT NOT NULL,
                weather TEXT NOT NULL,
                fetched_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_weather_region ON weather(region_id);
            "#,
        )?;
        Ok(())
    }

    /// Insert or update regions.
    pub fn store_regions(&mut self, regions: &[Region]) -> Result<(), WeatherError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO regions (region_id, region_name) VALUES (?1, ?2)",
            )?;
            for region in regions {
                stmt.execute(params![region.id, region.name])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// All cached regions, ordered by id.
    pub fn list_regions(&self) -> Result<Vec<Region>, WeatherError> {
        let mut stmt = self
            .conn
            .prepare("SELECT region_id, region_name FROM regions ORDER BY region_id")?;

        let rows = stmt.query_map([], |row| {
            Ok(Region {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Look up one region.
    pub fn region(&self, region_id: &str) -> Result<Option<Region>, WeatherError> {
        let region = self
            .conn
            .query_row(
                "SELECT region_id, region_name FROM regions WHERE region_id = ?1",
                params![region_id],
                |row| {
                    Ok(Region {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(region)
    }

    /// Persist one area's forecast text.
    ///
    /// Rows written for the same fetch should share `fetched_at` so they come
    /// back in insertion order.
    pub fn store_forecast(
        &self,
        region_id: &str,
        region_name: &str,
        area_name: &str,
        weather: &str,
        fetched_at: DateTime<Utc>,
    ) -> Result<(), WeatherError> {
        self.conn.execute(
            INSERT_FORECAST,
            params![
                region_id,
                region_name,
                area_name,
                weather,
                fetched_at.timestamp_millis()
            ],
        )?;
        Ok(())
    }

    /// Swap the cached forecast of a region for a freshly fetched one.
    pub fn replace_forecast(
        &mut self,
        region_id: &str,
        region_name: &str,
        areas: &[AreaForecast],
    ) -> Result<(), WeatherError> {
        let now = Utc::now().timestamp_millis();
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM weather WHERE region_id = ?1", params![region_id])?;
        {
            let mut stmt = tx.prepare(INSERT_FORECAST)?;
            for area in areas {
                stmt.execute(params![region_id, region_name, area.area_name, area.weather, now])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Cached forecast for a region, newest first and in fetch order within a
    /// batch. With `max_age`, older rows are ignored.
    pub fn forecast(
        &self,
        region_id: &str,
        max_age: Option<Duration>,
    ) -> Result<Vec<AreaForecast>, WeatherError> {
        let cutoff = match max_age {
            Some(age) => Utc::now().timestamp_millis() - age.as_millis() as i64,
            None => i64::MIN,
        };

        let mut stmt = self.conn.prepare(
            r#"
            SELECT area_name, weather FROM weather
            WHERE region_id = ?1 AND fetched_at >= ?2
            ORDER BY fetched_at DESC, id ASC
            "#,
        )?;

        let rows = stmt.query_map(params![region_id, cutoff], |row| {
            Ok(AreaForecast {
                area_name: row.get(0)?,
                weather: row.get(1)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Drop the cached forecast of a region.
    pub fn clear_forecast(&self, region_id: &str) -> Result<usize, WeatherError> {
        let removed = self
            .conn
            .execute("DELETE FROM weather WHERE region_id = ?1", params![region_id])?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    fn create_test_cache() -> WeatherCache {
        WeatherCache::in_memory().expect("Failed to create in-memory cache")
    }

    fn area(name: &str, weather: &str) -> AreaForecast {
        AreaForecast {
            area_name: name.to_string(),
            weather: weather.to_string(),
        }
    }

    fn tokyo() -> Region {
        Region {
            id: "130000".to_string(),
            name: "東京都".to_string(),
        }
    }

    #[test]
    fn test_store_and_list_regions() {
        let mut cache = create_test_cache();
        cache
            .store_regions(&[
                tokyo(),
                Region {
                    id: "016000".to_string(),
                    name: "石狩・空知・後志地方".to_string(),
                },
            ])
            .unwrap();

        let regions = cache.list_regions().unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].id, "016000");
        assert_eq!(regions[1], tokyo());
    }

    #[test]
    fn test_store_regions_replaces_names() {
        let mut cache = create_test_cache();
        cache.store_regions(&[tokyo()]).unwrap();
        cache
            .store_regions(&[Region {
                id: "130000".to_string(),
                name: "Tokyo".to_string(),
            }])
            .unwrap();

        let regions = cache.list_regions().unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "Tokyo");
    }

    #[test]
    fn test_region_lookup() {
        let mut cache = create_test_cache();
        cache.store_regions(&[tokyo()]).unwrap();

        assert_eq!(cache.region("130000").unwrap(), Some(tokyo()));
        assert_eq!(cache.region("999999").unwrap(), None);
    }

    #[test]
    fn test_forecast_empty_for_unknown_region() {
        let cache = create_test_cache();
        assert!(cache.forecast("130000", None).unwrap().is_empty());
    }

    #[test]
    fn test_store_forecast_keeps_batch_order() {
        let cache = create_test_cache();
        let fetched_at = Utc::now();
        cache
            .store_forecast("130000", "東京都", "東京地方", "晴れ", fetched_at)
            .unwrap();
        cache
            .store_forecast("130000", "東京都", "伊豆諸島北部", "くもり", fetched_at)
            .unwrap();
        cache
            .store_forecast("270000", "大阪府", "大阪府", "雨", fetched_at)
            .unwrap();

        let rows = cache.forecast("130000", None).unwrap();
        assert_eq!(
            rows,
            vec![area("東京地方", "晴れ"), area("伊豆諸島北部", "くもり")]
        );
    }

    #[test]
    fn test_newer_batch_comes_first() {
        let cache = create_test_cache();
        let earlier = Utc::now() - chrono::Duration::minutes(5);
        cache
            .store_forecast("130000", "東京都", "東京地方", "晴れ", earlier)
            .unwrap();
        cache
            .store_forecast("130000", "東京都", "東京地方", "雨", Utc::now())
            .unwrap();

        let rows = cache.forecast("130000", None).unwrap();
        assert_eq!(rows[0].weather, "雨");
        assert_eq!(rows[1].weather, "晴れ");
    }

    #[test]
    fn test_replace_forecast_swaps_rows() {
        let mut cache = create_test_cache();
        cache
            .replace_forecast("130000", "東京都", &[area("東京地方", "晴れ")])
            .unwrap();
        cache
            .replace_forecast(
                "130000",
                "東京都",
                &[area("東京地方", "雨"), area("伊豆諸島北部", "くもり")],
            )
            .unwrap();

        let rows = cache.forecast("130000", None).unwrap();
        assert_eq!(
            rows,
            vec![area("東京地方", "雨"), area("伊豆諸島北部", "くもり")]
        );
    }

    #[test]
    fn test_max_age_filters_stale_rows() {
        let cache = create_test_cache();
        let stale = Utc::now().timestamp_millis() - 2 * 60 * 60 * 1000;
        cache
            .conn
            .execute(
                "INSERT INTO weather (region_id, region_name, area_name, weather, fetched_at) \
                 VALUES ('130000', '東京都', '東京地方', '晴れ', ?1)",
                params![stale],
            )
            .unwrap();

        assert_eq!(cache.forecast("130000", None).unwrap().len(), 1);
        assert!(cache
            .forecast("130000", Some(Duration::from_secs(3600)))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_clear_forecast() {
        let mut cache = create_test_cache();
        cache
            .replace_forecast("130000", "東京都", &[area("東京地方", "晴れ")])
            .unwrap();
        cache
            .replace_forecast("270000", "大阪府", &[area("大阪府", "雨")])
            .unwrap();

        assert_eq!(cache.clear_forecast("130000").unwrap(), 1);
        assert!(cache.forecast("130000", None).unwrap().is_empty());
        assert_eq!(cache.forecast("270000", None).unwrap().len(), 1);
    }

    #[test]
    fn test_file_backed_cache_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather_data.db");

        {
            let mut cache = WeatherCache::new(&path).unwrap();
            cache.store_regions(&[tokyo()]).unwrap();
        }

        let cache = WeatherCache::new(&path).unwrap();
        assert_eq!(cache.list_regions().unwrap(), vec![tokyo()]);
    }
}
