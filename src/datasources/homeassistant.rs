use super::TelemetryProvider;
use crate::config::{HomeAssistantConfig, TemperatureUnit};
use crate::error::{AdvisorError, Result};
use crate::models::{fahrenheit_to_celsius, DataSource, TelemetrySnapshot};
use serde::Deserialize;

/// Field sensors exposed as Home Assistant entities.
pub struct HomeAssistantTelemetry {
    client: reqwest::Client,
    config: HomeAssistantConfig,
}

#[derive(Debug, Deserialize)]
struct EntityState {
    state: String,
    #[allow(dead_code)]
    entity_id: String,
}

impl HomeAssistantTelemetry {
    pub fn new(config: HomeAssistantConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn read_all(&self) -> Result<TelemetrySnapshot> {
        let entities = &self.config.entities;

        let (moisture, temperature, humidity, light, ph, soil_temperature) = tokio::try_join!(
            self.get_entity_value(&entities.soil_moisture),
            self.get_entity_value(&entities.temperature),
            self.get_entity_value(&entities.humidity),
            self.get_entity_value(&entities.light_intensity),
            self.get_entity_value(&entities.soil_ph),
            self.get_entity_value(&entities.soil_temperature),
        )?;

        Ok(TelemetrySnapshot {
            soil_moisture_pct: moisture,
            temperature_c: self.to_celsius(temperature),
            humidity_pct: humidity,
            light_intensity: light,
            soil_ph: ph,
            soil_temperature_c: self.to_celsius(soil_temperature),
        })
    }

    fn to_celsius(&self, value: f64) -> f64 {
        match self.config.temperature_unit {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => fahrenheit_to_celsius(value),
        }
    }

    async fn get_entity_value(&self, entity_id: &str) -> Result<f64> {
        let url = format!("{}/api/states/{}", self.config.url, entity_id);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.token))
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| AdvisorError::DataSourceUnavailable(format!("Home Assistant: {}", e)))?;

        if !response.status().is_success() {
            return Err(AdvisorError::DataSourceUnavailable(format!(
                "Home Assistant returned {} for {}",
                response.status(),
                entity_id
            )));
        }

        let entity: EntityState = response.json().await.map_err(|e| {
            AdvisorError::DataSourceUnavailable(format!(
                "Failed to parse Home Assistant response: {}",
                e
            ))
        })?;

        parse_state(entity_id, &entity.state)
    }
}

/// Sensors report "unavailable" or "unknown" while offline.
fn parse_state(entity_id: &str, state: &str) -> Result<f64> {
    state.trim().parse::<f64>().map_err(|_| {
        AdvisorError::DataSourceUnavailable(format!(
            "{} reported non-numeric state '{}'",
            entity_id, state
        ))
    })
}

impl TelemetryProvider for HomeAssistantTelemetry {
    fn source(&self) -> DataSource {
        DataSource::HomeAssistant
    }

    async fn read(&self) -> Result<TelemetrySnapshot> {
        self.read_all().await
    }

    async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/api/", self.config.url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.token))
            .send()
            .await
            .map_err(|e| AdvisorError::DataSourceUnavailable(format!("Home Assistant: {}", e)))?;

        Ok(response.status().is_success())
    }
}
