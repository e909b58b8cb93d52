use super::{DecisionInput, Rule, RuleOutcome};
use crate::models::Priority;

/// Moisture below which a dry zone is treated as urgent.
const CRITICAL_MOISTURE_PCT: f64 = 20.0;

/// Primary trigger: soil drier than the operator's threshold.
///
/// Severity levels:
/// - Medium: below threshold
/// - High: below 20%
pub struct LowMoistureRule;

impl Rule for LowMoistureRule {
    fn id(&self) -> &'static str {
        "low_moisture"
    }

    fn name(&self) -> &'static str {
        "Low Soil Moisture"
    }

    fn evaluate(&self, input: &DecisionInput<'_>) -> Option<RuleOutcome> {
        let moisture = input.telemetry.soil_moisture_pct;
        if moisture >= input.settings.moisture_threshold_pct {
            return None;
        }

        let priority = if moisture < CRITICAL_MOISTURE_PCT {
            Priority::High
        } else {
            Priority::Medium
        };

        Some(RuleOutcome::Irrigate {
            priority,
            reason: format!("Low soil moisture: {}%", moisture),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::rules::fixtures;

    fn evaluate(moisture: f64) -> Option<RuleOutcome> {
        let telemetry = fixtures::telemetry(moisture, 24.0);
        let weather = fixtures::weather(0.0, 70.0);
        let settings = fixtures::settings();
        LowMoistureRule.evaluate(&DecisionInput {
            telemetry: &telemetry,
            weather: &weather,
            settings: &settings,
        })
    }

    #[test]
    fn quiet_at_or_above_threshold() {
        assert_eq!(evaluate(30.0), None);
        assert_eq!(evaluate(55.0), None);
    }

    #[test]
    fn medium_priority_below_threshold() {
        assert_eq!(
            evaluate(25.0),
            Some(RuleOutcome::Irrigate {
                priority: Priority::Medium,
                reason: "Low soil moisture: 25%".into(),
            })
        );
    }

    #[test]
    fn high_priority_when_critically_dry() {
        match evaluate(15.0) {
            Some(RuleOutcome::Irrigate { priority, .. }) => assert_eq!(priority, Priority::High),
            other => panic!("expected irrigate outcome, got {:?}", other),
        }
    }

    #[test]
    fn fractional_readings_keep_their_precision() {
        match evaluate(22.5) {
            Some(RuleOutcome::Irrigate { reason, .. }) => {
                assert_eq!(reason, "Low soil moisture: 22.5%")
            }
            other => panic!("expected irrigate outcome, got {:?}", other),
        }
    }
}
