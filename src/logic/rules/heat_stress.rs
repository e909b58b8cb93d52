use super::{DecisionInput, Rule, RuleOutcome};
use crate::models::Priority;

/// Above this moisture the root zone holds enough water to ride out the heat.
const HEAT_STRESS_MOISTURE_CEILING_PCT: f64 = 40.0;

/// Heat stress rule - hot air over moderately dry soil
///
/// Conditions:
/// - Air temperature above the operator's threshold
/// - Soil moisture below 40%
///
/// Always requests high priority; the engine keeps the highest priority any
/// rule asks for, so this can only escalate.
pub struct HeatStressRule;

impl Rule for HeatStressRule {
    fn id(&self) -> &'static str {
        "heat_stress"
    }

    fn name(&self) -> &'static str {
        "Heat Stress"
    }

    fn evaluate(&self, input: &DecisionInput<'_>) -> Option<RuleOutcome> {
        let telemetry = input.telemetry;
        if telemetry.temperature_c <= input.settings.temperature_threshold_c
            || telemetry.soil_moisture_pct >= HEAT_STRESS_MOISTURE_CEILING_PCT
        {
            return None;
        }

        Some(RuleOutcome::Irrigate {
            priority: Priority::High,
            reason: format!("Heat stress detected: {}°C", telemetry.temperature_c),
        })
    }
}
