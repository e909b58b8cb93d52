use super::{DecisionInput, Rule, RuleOutcome};

const HEAVY_RAIN_MM: f64 = 5.0;
const LIGHT_RAIN_MM: f64 = 2.0;
const LIGHT_RAIN_FACTOR: f64 = 0.7;
const RAIN_RECHECK_HOURS: f64 = 6.0;

pub const RAIN_VETO_REASON: &str = "Recent rainfall - irrigation not needed";

/// Rainfall rule - lets the weather do the watering
///
/// Conditions:
/// - >5mm: irrigation cancelled regardless of soil or heat readings
/// - >2mm: volume and duration scaled to 70%
pub struct RainfallRule;

impl Rule for RainfallRule {
    fn id(&self) -> &'static str {
        "rainfall"
    }

    fn name(&self) -> &'static str {
        "Rainfall Override"
    }

    fn evaluate(&self, input: &DecisionInput<'_>) -> Option<RuleOutcome> {
        let precipitation = input.weather.precipitation_mm;

        if precipitation > HEAVY_RAIN_MM {
            Some(RuleOutcome::Veto {
                reason: RAIN_VETO_REASON.to_string(),
                next_check_hours: RAIN_RECHECK_HOURS,
            })
        } else if precipitation > LIGHT_RAIN_MM {
            Some(RuleOutcome::Adjust {
                factor: LIGHT_RAIN_FACTOR,
                reason: "Light rain - reduced irrigation".to_string(),
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::rules::fixtures;

    fn evaluate(precipitation: f64) -> Option<RuleOutcome> {
        let telemetry = fixtures::telemetry(15.0, 24.0);
        let weather = fixtures::weather(precipitation, 70.0);
        let settings = fixtures::settings();
        RainfallRule.evaluate(&DecisionInput {
            telemetry: &telemetry,
            weather: &weather,
            settings: &settings,
        })
    }

    #[test]
    fn dry_weather_is_ignored() {
        assert_eq!(evaluate(0.0), None);
        assert_eq!(evaluate(2.0), None);
    }

    #[test]
    fn light_rain_scales_volume() {
        assert_eq!(
            evaluate(3.5),
            Some(RuleOutcome::Adjust {
                factor: 0.7,
                reason: "Light rain - reduced irrigation".into(),
            })
        );
        // Exactly 5mm is still light rain
        assert!(matches!(evaluate(5.0), Some(RuleOutcome::Adjust { .. })));
    }

    #[test]
    fn heavy_rain_vetoes() {
        assert_eq!(
            evaluate(8.0),
            Some(RuleOutcome::Veto {
                reason: RAIN_VETO_REASON.into(),
                next_check_hours: 6.0,
            })
        );
    }
}
