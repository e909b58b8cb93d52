use super::{
    heat_stress::HeatStressRule, humidity::HumidityRule, low_moisture::LowMoistureRule,
    rainfall::RainfallRule, DecisionInput, Rule, RuleOutcome,
};
use crate::logic::calculations::{duration_minutes, efficiency_score, water_volume};
use crate::models::{
    Priority, Recommendation, Settings, TelemetrySnapshot, WeatherSnapshot, Zone,
};

pub const DEFAULT_NEXT_CHECK_HOURS: f64 = 4.0;

const DROUGHT_SENSITIVE_MOISTURE_PCT: f64 = 30.0;
const HEAT_SENSITIVE_TEMPERATURE_C: f64 = 32.0;

/// Evaluates the irrigation rules in order and folds their outcomes into a
/// single recommendation. Holds no state between calls.
pub struct DecisionEngine {
    rules: Vec<Box<dyn Rule>>,
}

/// Accumulated rule outcomes before quantities are computed.
#[derive(Debug, Default)]
struct Decision {
    should_irrigate: bool,
    priority: Priority,
    adjustment: Vec<f64>,
    reasons: Vec<String>,
    veto: Option<(String, f64)>,
}

impl Decision {
    fn apply(&mut self, outcome: RuleOutcome) {
        if self.veto.is_some() {
            return;
        }
        match outcome {
            RuleOutcome::Irrigate { priority, reason } => {
                self.should_irrigate = true;
                self.priority = self.priority.max(priority);
                self.reasons.push(reason);
            }
            RuleOutcome::Adjust { factor, reason } => {
                self.adjustment.push(factor);
                self.reasons.push(reason);
            }
            RuleOutcome::Veto {
                reason,
                next_check_hours,
            } => {
                self.veto = Some((reason, next_check_hours));
            }
        }
    }

    fn combined_adjustment(&self) -> f64 {
        self.adjustment.iter().product()
    }
}

impl DecisionEngine {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(LowMoistureRule),
            Box::new(HeatStressRule),
            Box::new(RainfallRule),
            Box::new(HumidityRule),
        ];

        Self { rules }
    }

    pub fn recommend(
        &self,
        telemetry: &TelemetrySnapshot,
        weather: &WeatherSnapshot,
        settings: &Settings,
        zones: &[Zone],
    ) -> Recommendation {
        let input = DecisionInput {
            telemetry,
            weather,
            settings,
        };

        let mut decision = Decision::default();
        for rule in &self.rules {
            if let Some(outcome) = rule.evaluate(&input) {
                tracing::debug!(rule = rule.id(), ?outcome, "Rule fired");
                decision.apply(outcome);
            }
        }

        let moisture = telemetry.soil_moisture_pct;
        let efficiency = efficiency_score(moisture, weather);

        if let Some((reason, next_check_hours)) = decision.veto {
            let reasons = vec![reason];
            return Recommendation {
                should_irrigate: false,
                soil_moisture_pct: moisture.round() as i32,
                priority: Priority::Low,
                water_amount_liters: 0.0,
                duration_minutes: 0.0,
                summary: Recommendation::summarize(&reasons),
                reasons,
                next_check_hours,
                efficiency_score: efficiency,
                zones: Vec::new(),
                weather: Some(*weather),
                degraded: false,
            };
        }

        let (water, duration, selected) = if decision.should_irrigate {
            let water = water_volume(
                moisture,
                telemetry.temperature_c,
                decision.priority,
                decision.combined_adjustment(),
                settings.max_daily_water_liters,
            );
            (
                water,
                duration_minutes(water),
                select_zones(zones, telemetry),
            )
        } else {
            (0.0, 0.0, Vec::new())
        };

        let priority = if decision.should_irrigate {
            decision.priority
        } else {
            Priority::Low
        };

        Recommendation {
            should_irrigate: decision.should_irrigate,
            soil_moisture_pct: moisture.round() as i32,
            priority,
            water_amount_liters: water,
            duration_minutes: duration,
            summary: Recommendation::summarize(&decision.reasons),
            reasons: decision.reasons,
            next_check_hours: DEFAULT_NEXT_CHECK_HOURS,
            efficiency_score: efficiency,
            zones: selected,
            weather: Some(*weather),
            degraded: false,
        }
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the zones to water, in registry order.
///
/// Drought-sensitive crops are included when the soil is below 30%, heat
/// sensitive ones above 32°C. When neither applies the first zone is used.
pub fn select_zones(zones: &[Zone], telemetry: &TelemetrySnapshot) -> Vec<u32> {
    let dry = telemetry.soil_moisture_pct < DROUGHT_SENSITIVE_MOISTURE_PCT;
    let hot = telemetry.temperature_c > HEAT_SENSITIVE_TEMPERATURE_C;

    let selected: Vec<u32> = zones
        .iter()
        .filter(|z| {
            (dry && z.category.is_drought_sensitive()) || (hot && z.category.is_heat_sensitive())
        })
        .map(|z| z.id)
        .collect();

    if selected.is_empty() {
        zones.first().map(|z| vec![z.id]).unwrap_or_default()
    } else {
        selected
    }
}
