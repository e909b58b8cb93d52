use super::WeatherSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Scaling applied to the base water volume.
    pub fn volume_factor(&self) -> f64 {
        match self {
            Priority::Low => 1.0,
            Priority::Medium => 1.2,
            Priority::High => 1.5,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One irrigation directive. Built fresh per request and never mutated
/// after it is returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub should_irrigate: bool,
    pub soil_moisture_pct: i32,
    pub priority: Priority,
    pub water_amount_liters: f64,
    pub duration_minutes: f64,
    pub reasons: Vec<String>,
    pub summary: String,
    pub next_check_hours: f64,
    pub efficiency_score: u8,
    pub zones: Vec<u32>,
    /// Conditions the weather rules saw. Absent on degraded output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSnapshot>,
    /// Set when sensor or weather data was unavailable.
    pub degraded: bool,
}

impl Recommendation {
    pub const NO_ACTION_SUMMARY: &'static str = "Soil conditions within target range";

    pub fn summarize(reasons: &[String]) -> String {
        if reasons.is_empty() {
            Self::NO_ACTION_SUMMARY.to_string()
        } else {
            reasons.join("; ")
        }
    }

    /// The zero-water shape every "do not irrigate" outcome must have.
    pub fn is_idle_consistent(&self) -> bool {
        self.should_irrigate
            || (self.water_amount_liters == 0.0
                && self.duration_minutes == 0.0
                && self.zones.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_ordering() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
        assert_eq!(Priority::Medium.max(Priority::High), Priority::High);
    }

    #[test]
    fn priority_volume_factor() {
        assert_eq!(Priority::High.volume_factor(), 1.5);
        assert_eq!(Priority::Medium.volume_factor(), 1.2);
        assert_eq!(Priority::Low.volume_factor(), 1.0);
    }

    #[test]
    fn priority_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
    }

    #[test]
    fn summary_joins_reasons() {
        let reasons = vec![
            "Low soil moisture: 25%".to_string(),
            "Light rain - reduced irrigation".to_string(),
        ];
        assert_eq!(
            Recommendation::summarize(&reasons),
            "Low soil moisture: 25%; Light rain - reduced irrigation"
        );
        assert_eq!(
            Recommendation::summarize(&[]),
            Recommendation::NO_ACTION_SUMMARY
        );
    }
}
