//! JMA (Japan Meteorological Agency) forecast client.
//!
//! Two documents are used: the area list, whose `offices` map gives the
//! forecast regions, and the per-office forecast report.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use benri_core::WeatherConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::retry::{with_retry, RetryConfig};
use crate::types::{AreaForecast, Region, WeatherError};

const USER_AGENT: &str = concat!("benri/", env!("CARGO_PKG_VERSION"));

/// Separator between the entries of an area's `weathers` array.
const WEATHER_SEPARATOR: &str = ", ";

#[derive(Debug, Deserialize)]
struct AreaDocument {
    #[serde(default)]
    offices: BTreeMap<String, OfficeEntry>,
}

#[derive(Debug, Deserialize)]
struct OfficeEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ForecastReport {
    #[serde(rename = "timeSeries", default)]
    time_series: Vec<TimeSeries>,
}

#[derive(Debug, Deserialize)]
struct TimeSeries {
    #[serde(default)]
    areas: Vec<SeriesArea>,
}

#[derive(Debug, Deserialize)]
struct SeriesArea {
    area: AreaRef,
    #[serde(default)]
    weathers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AreaRef {
    name: String,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    config: WeatherConfig,
    retry: RetryConfig,
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            config: config.clone(),
            retry: RetryConfig::with_max_retries(config.max_retries),
        })
    }

    /// Override the retry policy (tests use zero delays).
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch the list of forecast regions, ordered by region id.
    pub async fn fetch_regions(&self) -> Result<Vec<Region>, WeatherError> {
        let document: AreaDocument = self.fetch_json(&self.config.area_url).await?;

        let regions: Vec<Region> = document
            .offices
            .into_iter()
            .map(|(id, office)| Region {
                id,
                name: office.name,
            })
            .collect();

        tracing::info!("Fetched {} regions", regions.len());
        Ok(regions)
    }

    /// Fetch the current forecast text for each area of `region_id`.
    pub async fn fetch_forecast(&self, region_id: &str) -> Result<Vec<AreaForecast>, WeatherError> {
        let url = self.config.forecast_url(region_id);
        let reports: Vec<ForecastReport> = self.fetch_json(&url).await?;

        let areas = reports
            .into_iter()
            .next()
            .and_then(|report| report.time_series.into_iter().next())
            .map(|series| series.areas)
            .unwrap_or_default();

        if areas.is_empty() {
            return Err(WeatherError::NoForecast(region_id.to_string()));
        }

        let forecasts: Vec<AreaForecast> = areas
            .into_iter()
            .map(|a| AreaForecast {
                area_name: a.area.name,
                weather: a.weathers.join(WEATHER_SEPARATOR),
            })
            .collect();

        tracing::info!("Fetched forecast for {} ({} areas)", region_id, forecasts.len());
        Ok(forecasts)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, WeatherError> {
        tracing::debug!("GET {}", url);

        let response = with_retry(&self.retry, || self.client.get(url).send()).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| WeatherError::Parse(format!("{}: {}", url, e)))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> WeatherConfig {
        WeatherConfig {
            area_url: format!("{}/common/const/area.json", server.uri()),
            forecast_url_template: format!(
                "{}/forecast/data/forecast/{{area_code}}.json",
                server.uri()
            ),
            max_retries: 0,
            ..WeatherConfig::default()
        }
    }

    fn forecast_body() -> serde_json::Value {
        serde_json::json!([
            {
                "publishingOffice": "気象庁",
                "timeSeries": [
                    {
                        "timeDefines": ["2026-10-19T11:00:00+09:00"],
                        "areas": [
                            {
                                "area": { "name": "東京地方", "code": "130010" },
                                "weatherCodes": ["101"],
                                "weathers": ["晴れ　時々　くもり", "くもり"]
                            },
                            {
                                "area": { "name": "伊豆諸島北部", "code": "130020" },
                                "weathers": ["くもり"]
                            }
                        ]
                    },
                    { "areas": [] }
                ]
            },
            { "timeSeries": [] }
        ])
    }

    #[tokio::test]
    async fn test_fetch_regions_sorted_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/common/const/area.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "centers": { "010100": { "name": "北海道地方" } },
                "offices": {
                    "130000": { "name": "東京都", "enName": "Tokyo" },
                    "016000": { "name": "石狩・空知・後志地方" }
                }
            })))
            .mount(&server)
            .await;

        let provider = WeatherProvider::new(&test_config(&server)).unwrap();
        let regions = provider.fetch_regions().await.unwrap();

        assert_eq!(
            regions,
            vec![
                Region { id: "016000".into(), name: "石狩・空知・後志地方".into() },
                Region { id: "130000".into(), name: "東京都".into() },
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_forecast_joins_weathers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast/data/forecast/130000.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;

        let provider = WeatherProvider::new(&test_config(&server)).unwrap();
        let areas = provider.fetch_forecast("130000").await.unwrap();

        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].area_name, "東京地方");
        assert_eq!(areas[0].weather, "晴れ　時々　くもり, くもり");
        assert_eq!(areas[1].weather, "くもり");
    }

    #[tokio::test]
    async fn test_empty_report_is_no_forecast() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast/data/forecast/999999.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let provider = WeatherProvider::new(&test_config(&server)).unwrap();
        let err = provider.fetch_forecast("999999").await.unwrap_err();
        assert!(matches!(err, WeatherError::NoForecast(ref id) if id == "999999"));
    }

    #[tokio::test]
    async fn test_not_found_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let provider = WeatherProvider::new(&test_config(&server)).unwrap();
        let err = provider.fetch_forecast("000000").await.unwrap_err();
        assert!(matches!(err, WeatherError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let provider = WeatherProvider::new(&test_config(&server)).unwrap();
        let err = provider.fetch_regions().await.unwrap_err();
        assert!(matches!(err, WeatherError::Parse(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;

        let provider = WeatherProvider::new(&test_config(&server))
            .unwrap()
            .with_retry_config(RetryConfig::new(2, 0, 0));
        let areas = provider.fetch_forecast("130000").await.unwrap();
        assert_eq!(areas.len(), 2);
    }
}
