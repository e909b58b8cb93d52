use crate::datasources::{TelemetryProvider, WeatherProvider};
use crate::error::{AdvisorError, Result};
use crate::logic::fallback::{fallback_recommendation, MoistureEstimator};
use crate::logic::rules::DecisionEngine;
use crate::models::{
    DataSource, Recommendation, Settings, TelemetrySnapshot, WeatherSnapshot, Zone,
};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Fetches fresh snapshots and turns them into a recommendation.
///
/// The advisor only reads. Dropping a pending `recommend` future leaves no
/// partial state behind.
pub struct Advisor<T, W> {
    telemetry: T,
    weather: W,
    engine: DecisionEngine,
    estimator: MoistureEstimator,
    timeout: Duration,
}

impl<T: TelemetryProvider, W: WeatherProvider> Advisor<T, W> {
    pub fn new(telemetry: T, weather: W, timeout: Duration) -> Self {
        Self {
            telemetry,
            weather,
            engine: DecisionEngine::new(),
            estimator: MoistureEstimator::new(),
            timeout,
        }
    }

    pub fn with_estimator(mut self, estimator: MoistureEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Never fails: any provider problem yields the degraded recommendation.
    pub async fn recommend(&self, settings: &Settings, zones: &[Zone]) -> Recommendation {
        match self.gather().await {
            Ok((telemetry, weather)) => {
                debug!(?telemetry, ?weather, "Snapshots gathered");
                self.engine.recommend(&telemetry, &weather, settings, zones)
            }
            Err(e) => {
                warn!(error = %e, "Live data unavailable - using fallback recommendation");
                fallback_recommendation(self.estimator.sample(), settings, zones)
            }
        }
    }

    async fn gather(&self) -> Result<(TelemetrySnapshot, WeatherSnapshot)> {
        let (telemetry, weather) = tokio::time::timeout(self.timeout, async {
            tokio::join!(self.telemetry.read(), self.weather.current())
        })
        .await
        .map_err(|_| {
            AdvisorError::DataSourceUnavailable(format!(
                "providers did not respond within {}s",
                self.timeout.as_secs_f64()
            ))
        })?;

        let telemetry = telemetry?;
        let weather = weather?;

        if !telemetry.is_plausible() {
            return Err(AdvisorError::InvalidData(format!(
                "implausible telemetry from {}: {:?}",
                self.telemetry.source(),
                telemetry
            )));
        }
        if !weather.is_plausible() {
            return Err(AdvisorError::InvalidData(format!(
                "implausible weather from {}: {:?}",
                self.weather.source(),
                weather
            )));
        }

        Ok((telemetry, weather))
    }

    pub async fn check_connections(&self) -> ConnectionStatus {
        let (telemetry_ok, weather_ok) = tokio::join!(
            self.telemetry.test_connection(),
            self.weather.test_connection()
        );

        ConnectionStatus {
            telemetry: self.telemetry.source(),
            telemetry_ok: telemetry_ok.unwrap_or_else(|e| {
                warn!(error = %e, "Telemetry connection check failed");
                false
            }),
            weather: self.weather.source(),
            weather_ok: weather_ok.unwrap_or_else(|e| {
                warn!(error = %e, "Weather connection check failed");
                false
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStatus {
    pub telemetry: DataSource,
    pub telemetry_ok: bool,
    pub weather: DataSource,
    pub weather_ok: bool,
}

impl ConnectionStatus {
    pub fn all_connected(&self) -> bool {
        self.telemetry_ok && self.weather_ok
    }
}
