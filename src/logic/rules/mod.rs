pub mod engine;
pub mod heat_stress;
pub mod humidity;
pub mod low_moisture;
pub mod rainfall;

pub use engine::DecisionEngine;

use crate::models::{Priority, Settings, TelemetrySnapshot, WeatherSnapshot};

/// Everything a rule may look at for one decision.
#[derive(Debug, Clone, Copy)]
pub struct DecisionInput<'a> {
    pub telemetry: &'a TelemetrySnapshot,
    pub weather: &'a WeatherSnapshot,
    pub settings: &'a Settings,
}

/// What a rule contributes to the decision when its conditions are met.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// Irrigation is needed at (at least) this priority.
    Irrigate { priority: Priority, reason: String },
    /// Scale the eventual water volume and duration.
    Adjust { factor: f64, reason: String },
    /// Cancel irrigation outright, discarding every other reason.
    Veto {
        reason: String,
        next_check_hours: f64,
    },
}

/// Trait for irrigation rules
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate the rule and return its contribution if conditions are met
    fn evaluate(&self, input: &DecisionInput<'_>) -> Option<RuleOutcome>;
}
