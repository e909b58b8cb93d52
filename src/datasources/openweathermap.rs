use super::WeatherProvider;
use crate::config::OpenWeatherMapConfig;
use crate::error::{AdvisorError, Result};
use crate::models::{meters_per_second_to_kmh, DataSource, WeatherSnapshot};
use serde::Deserialize;

const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: OpenWeatherMapConfig,
}

// OpenWeatherMap API response structures
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    main: OwmMain,
    wind: OwmWind,
    #[serde(default)]
    rain: Option<OwmPrecipitation>,
    #[serde(default)]
    snow: Option<OwmPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64, // m/s in metric units
}

#[derive(Debug, Deserialize)]
struct OwmPrecipitation {
    #[serde(rename = "1h", default)]
    one_hour: Option<f64>,
    #[serde(rename = "3h", default)]
    three_hour: Option<f64>,
}

impl OwmPrecipitation {
    fn millimeters(&self) -> f64 {
        self.one_hour.or(self.three_hour).unwrap_or(0.0)
    }
}

impl OpenWeatherMapClient {
    pub fn new(config: OpenWeatherMapConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn current_url(&self) -> String {
        format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            API_BASE_URL, self.config.latitude, self.config.longitude, self.config.api_key
        )
    }

    /// Fetch current conditions from OpenWeatherMap
    pub async fn fetch_current(&self) -> Result<WeatherSnapshot> {
        let response = self
            .client
            .get(self.current_url())
            .send()
            .await
            .map_err(|e| AdvisorError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::DataSourceUnavailable(format!(
                "OpenWeatherMap returned {}: {}",
                status, body
            )));
        }

        let owm_response: OwmCurrentResponse = response.json().await.map_err(|e| {
            AdvisorError::DataSourceUnavailable(format!(
                "Failed to parse OpenWeatherMap response: {}",
                e
            ))
        })?;

        Ok(convert_response(&owm_response))
    }
}

fn convert_response(response: &OwmCurrentResponse) -> WeatherSnapshot {
    // Combine rain and snow precipitation
    let rain_mm = response.rain.as_ref().map_or(0.0, |r| r.millimeters());
    let snow_mm = response.snow.as_ref().map_or(0.0, |s| s.millimeters());

    WeatherSnapshot {
        temperature_c: response.main.temp,
        humidity_pct: response.main.humidity,
        precipitation_mm: rain_mm + snow_mm,
        wind_speed_kmh: meters_per_second_to_kmh(response.wind.speed),
    }
}

impl WeatherProvider for OpenWeatherMapClient {
    fn source(&self) -> DataSource {
        DataSource::OpenWeatherMap
    }

    async fn current(&self) -> Result<WeatherSnapshot> {
        self.fetch_current().await
    }

    async fn test_connection(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.current_url())
            .send()
            .await
            .map_err(|e| AdvisorError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e)))?;

        Ok(response.status().is_success())
    }
}
