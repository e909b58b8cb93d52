pub mod homeassistant;
pub mod openweathermap;
pub mod simulated;

pub use homeassistant::HomeAssistantTelemetry;
pub use openweathermap::OpenWeatherMapClient;
pub use simulated::{SimulatedTelemetry, SimulatedWeather};

use crate::config::{TelemetryConfig, WeatherConfig};
use crate::error::Result;
use crate::models::{DataSource, TelemetrySnapshot, WeatherSnapshot};
use std::future::Future;

/// Field sensors, real or simulated.
pub trait TelemetryProvider: Send + Sync {
    fn source(&self) -> DataSource;

    fn read(&self) -> impl Future<Output = Result<TelemetrySnapshot>> + Send;

    fn test_connection(&self) -> impl Future<Output = Result<bool>> + Send;
}

/// Current weather conditions at the farm.
pub trait WeatherProvider: Send + Sync {
    fn source(&self) -> DataSource;

    fn current(&self) -> impl Future<Output = Result<WeatherSnapshot>> + Send;

    fn test_connection(&self) -> impl Future<Output = Result<bool>> + Send;
}

/// Telemetry backend chosen from configuration at startup.
pub enum TelemetrySource {
    Simulated(SimulatedTelemetry),
    HomeAssistant(HomeAssistantTelemetry),
}

impl TelemetrySource {
    pub fn from_config(config: &TelemetryConfig) -> Self {
        // Only use Home Assistant if a token is configured
        match config.homeassistant.as_ref().filter(|c| !c.token.is_empty()) {
            Some(ha) => {
                tracing::info!(url = %ha.url, "Reading field sensors from Home Assistant");
                TelemetrySource::HomeAssistant(HomeAssistantTelemetry::new(ha.clone()))
            }
            None => {
                tracing::info!("Home Assistant not configured - using simulated telemetry");
                TelemetrySource::Simulated(match config.simulation_seed {
                    Some(seed) => SimulatedTelemetry::with_seed(seed),
                    None => SimulatedTelemetry::new(),
                })
            }
        }
    }
}

impl TelemetryProvider for TelemetrySource {
    fn source(&self) -> DataSource {
        match self {
            TelemetrySource::Simulated(p) => p.source(),
            TelemetrySource::HomeAssistant(p) => p.source(),
        }
    }

    async fn read(&self) -> Result<TelemetrySnapshot> {
        match self {
            TelemetrySource::Simulated(p) => p.read().await,
            TelemetrySource::HomeAssistant(p) => p.read().await,
        }
    }

    async fn test_connection(&self) -> Result<bool> {
        match self {
            TelemetrySource::Simulated(p) => p.test_connection().await,
            TelemetrySource::HomeAssistant(p) => p.test_connection().await,
        }
    }
}

/// Weather backend chosen from configuration at startup.
pub enum WeatherSource {
    Simulated(SimulatedWeather),
    OpenWeatherMap(OpenWeatherMapClient),
}

impl WeatherSource {
    pub fn from_config(config: &WeatherConfig) -> Self {
        match config
            .openweathermap
            .as_ref()
            .filter(|c| c.enabled && !c.api_key.is_empty())
        {
            Some(owm) => {
                tracing::info!("OpenWeatherMap client configured for current conditions");
                WeatherSource::OpenWeatherMap(OpenWeatherMapClient::new(owm.clone()))
            }
            None => {
                tracing::info!("OpenWeatherMap not configured - using simulated weather");
                WeatherSource::Simulated(match config.simulation_seed {
                    Some(seed) => SimulatedWeather::with_seed(seed),
                    None => SimulatedWeather::new(),
                })
            }
        }
    }
}

impl WeatherProvider for WeatherSource {
    fn source(&self) -> DataSource {
        match self {
            WeatherSource::Simulated(p) => p.source(),
            WeatherSource::OpenWeatherMap(p) => p.source(),
        }
    }

    async fn current(&self) -> Result<WeatherSnapshot> {
        match self {
            WeatherSource::Simulated(p) => p.current().await,
            WeatherSource::OpenWeatherMap(p) => p.current().await,
        }
    }

    async fn test_connection(&self) -> Result<bool> {
        match self {
            WeatherSource::Simulated(p) => p.test_connection().await,
            WeatherSource::OpenWeatherMap(p) => p.test_connection().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HomeAssistantConfig, OpenWeatherMapConfig};

    #[test]
    fn telemetry_defaults_to_simulation() {
        let source = TelemetrySource::from_config(&TelemetryConfig::default());
        assert_eq!(source.source(), DataSource::Simulated);
    }

    #[test]
    fn telemetry_without_token_stays_simulated() {
        let config = TelemetryConfig {
            simulation_seed: Some(3),
            homeassistant: Some(HomeAssistantConfig {
                token: String::new(),
                ..HomeAssistantConfig::default()
            }),
        };
        let source = TelemetrySource::from_config(&config);
        assert_eq!(source.source(), DataSource::Simulated);
    }

    #[test]
    fn telemetry_uses_home_assistant_with_token() {
        let config = TelemetryConfig {
            simulation_seed: None,
            homeassistant: Some(HomeAssistantConfig {
                token: "secret".into(),
                ..HomeAssistantConfig::default()
            }),
        };
        let source = TelemetrySource::from_config(&config);
        assert_eq!(source.source(), DataSource::HomeAssistant);
    }

    #[test]
    fn disabled_weather_client_falls_back_to_simulation() {
        let config = WeatherConfig {
            simulation_seed: None,
            openweathermap: Some(OpenWeatherMapConfig {
                api_key: "key".into(),
                latitude: 13.75,
                longitude: 100.5,
                enabled: false,
            }),
        };
        assert_eq!(
            WeatherSource::from_config(&config).source(),
            DataSource::Simulated
        );
    }

    #[tokio::test]
    async fn seeded_sources_are_reproducible() {
        let config = TelemetryConfig {
            simulation_seed: Some(42),
            homeassistant: None,
        };
        let a = TelemetrySource::from_config(&config).read().await.unwrap();
        let b = TelemetrySource::from_config(&config).read().await.unwrap();
        assert_eq!(a, b);
    }
}
