use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrigationReason {
    Scheduled,
    SensorTriggered,
    Manual,
}

impl IrrigationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            IrrigationReason::Scheduled => "Scheduled",
            IrrigationReason::SensorTriggered => "Sensor Triggered",
            IrrigationReason::Manual => "Manual",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "scheduled" => Some(IrrigationReason::Scheduled),
            "sensortriggered" => Some(IrrigationReason::SensorTriggered),
            "manual" => Some(IrrigationReason::Manual),
            _ => None,
        }
    }
}

impl std::fmt::Display for IrrigationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A past irrigation run. Appended to the ledger and never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Option<i64>,
    pub date: DateTime<Utc>,
    pub water_used_liters: f64,
    pub duration_minutes: f64,
    pub zones: Vec<u32>,
    pub efficiency_pct: u8,
    pub reason: IrrigationReason,
    pub savings_pct: f64,
}

impl HistoryEntry {
    pub fn new(reason: IrrigationReason, date: DateTime<Utc>) -> Self {
        Self {
            id: None,
            date,
            water_used_liters: 0.0,
            duration_minutes: 0.0,
            zones: Vec::new(),
            efficiency_pct: 0,
            reason,
            savings_pct: 0.0,
        }
    }

    pub fn with_zones(mut self, zones: Vec<u32>) -> Self {
        self.zones = zones;
        self
    }

    pub fn with_water(mut self, liters: f64, minutes: f64) -> Self {
        self.water_used_liters = liters;
        self.duration_minutes = minutes;
        self
    }

    pub fn with_efficiency(mut self, efficiency_pct: u8) -> Self {
        self.efficiency_pct = efficiency_pct;
        self
    }

    pub fn with_savings(mut self, savings_pct: f64) -> Self {
        self.savings_pct = savings_pct;
        self
    }

    /// Start time plus duration. Saturates at the latest representable
    /// instant so a corrupt stored duration cannot break reads.
    pub fn completes_at(&self) -> DateTime<Utc> {
        completion_time(self.date, self.duration_minutes).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn covers_zone(&self, zone_id: u32) -> bool {
        self.zones.contains(&zone_id)
    }
}

/// `start + minutes`, or `None` when the sum is not a representable instant.
pub fn completion_time(start: DateTime<Utc>, minutes: f64) -> Option<DateTime<Utc>> {
    if !minutes.is_finite() {
        return None;
    }
    let run = TimeDelta::try_milliseconds((minutes * 60_000.0).round() as i64)?;
    start.checked_add_signed(run)
}

/// Result of a manual irrigation start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationStart {
    pub water_amount_liters: f64,
    pub duration_minutes: f64,
    pub estimated_completion_time: DateTime<Utc>,
}
