use crate::error::{AdvisorError, Result};
use serde::{Deserialize, Serialize};

/// Operator policy read by every decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub auto_mode: bool,
    pub moisture_threshold_pct: f64,
    pub temperature_threshold_c: f64,
    pub max_daily_water_liters: f64,
    /// Stored and reported; no rule consumes it yet.
    pub conservation_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_mode: true,
            moisture_threshold_pct: 30.0,
            temperature_threshold_c: 30.0,
            max_daily_water_liters: 500.0,
            conservation_mode: false,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if !self.max_daily_water_liters.is_finite() || self.max_daily_water_liters <= 0.0 {
            return Err(AdvisorError::InvalidSettings(format!(
                "max_daily_water_liters must be positive, got {}",
                self.max_daily_water_liters
            )));
        }
        if !(0.0..=100.0).contains(&self.moisture_threshold_pct) {
            return Err(AdvisorError::InvalidSettings(format!(
                "moisture_threshold_pct must be within 0-100, got {}",
                self.moisture_threshold_pct
            )));
        }
        if !self.temperature_threshold_c.is_finite() {
            return Err(AdvisorError::InvalidSettings(
                "temperature_threshold_c must be a finite number".into(),
            ));
        }
        Ok(())
    }

    /// Field-wise merge. The result is validated before it is returned, so a
    /// rejected update never yields a half-applied record.
    pub fn merged(&self, update: &SettingsUpdate) -> Result<Settings> {
        let merged = Settings {
            auto_mode: update.auto_mode.unwrap_or(self.auto_mode),
            moisture_threshold_pct: update
                .moisture_threshold_pct
                .unwrap_or(self.moisture_threshold_pct),
            temperature_threshold_c: update
                .temperature_threshold_c
                .unwrap_or(self.temperature_threshold_c),
            max_daily_water_liters: update
                .max_daily_water_liters
                .unwrap_or(self.max_daily_water_liters),
            conservation_mode: update.conservation_mode.unwrap_or(self.conservation_mode),
        };
        merged.validate()?;
        Ok(merged)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moisture_threshold_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_threshold_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_daily_water_liters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conservation_mode: Option<bool>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self == &SettingsUpdate::default()
    }
}
