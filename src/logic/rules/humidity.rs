use super::{DecisionInput, Rule, RuleOutcome};

const HIGH_HUMIDITY_PCT: f64 = 85.0;
const HIGH_HUMIDITY_FACTOR: f64 = 0.8;

/// Humid air slows evaporation and wet foliage invites fungal disease, so
/// watering is trimmed to 80% above 85% humidity.
pub struct HumidityRule;

impl Rule for HumidityRule {
    fn id(&self) -> &'static str {
        "high_humidity"
    }

    fn name(&self) -> &'static str {
        "High Humidity"
    }

    fn evaluate(&self, input: &DecisionInput<'_>) -> Option<RuleOutcome> {
        if input.weather.humidity_pct <= HIGH_HUMIDITY_PCT {
            return None;
        }

        Some(RuleOutcome::Adjust {
            factor: HIGH_HUMIDITY_FACTOR,
            reason: "High humidity - reduced watering to prevent fungal issues".to_string(),
        })
    }
}
