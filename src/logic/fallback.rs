//! Degraded-mode recommendation used when live data is unavailable.

use crate::logic::calculations::duration_minutes;
use crate::models::{Priority, Recommendation, Settings, Zone};
use std::ops::Range;
use std::sync::{Mutex, PoisonError};

pub const FALLBACK_REASON: &str =
    "Sensor or weather data unavailable - using estimated soil moisture";

const ESTIMATED_MOISTURE_PCT: Range<f64> = 30.0..70.0;
const IRRIGATE_BELOW_PCT: f64 = 35.0;
const FALLBACK_WATER_LITERS: f64 = 150.0;
const FALLBACK_EFFICIENCY: u8 = 75;
const FALLBACK_NEXT_CHECK_HOURS: f64 = 2.0;

/// Stand-in for the soil probe when it cannot be read.
pub struct MoistureEstimator {
    rng: Mutex<fastrand::Rng>,
}

impl MoistureEstimator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }

    /// Uniform in [30, 70).
    pub fn sample(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let span = ESTIMATED_MOISTURE_PCT.end - ESTIMATED_MOISTURE_PCT.start;
        ESTIMATED_MOISTURE_PCT.start + rng.f64() * span
    }
}

impl Default for MoistureEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the conservative recommendation for an estimated moisture level.
pub fn fallback_recommendation(
    estimated_moisture_pct: f64,
    settings: &Settings,
    zones: &[Zone],
) -> Recommendation {
    let should_irrigate = estimated_moisture_pct < IRRIGATE_BELOW_PCT;

    let (water, duration, selected, priority) = if should_irrigate {
        let water = FALLBACK_WATER_LITERS.min(settings.max_daily_water_liters);
        let selected = zones.first().map(|z| vec![z.id]).unwrap_or_default();
        (water, duration_minutes(water), selected, Priority::Medium)
    } else {
        (0.0, 0.0, Vec::new(), Priority::Low)
    };

    let reasons = vec![FALLBACK_REASON.to_string()];
    Recommendation {
        should_irrigate,
        soil_moisture_pct: estimated_moisture_pct.round() as i32,
        priority,
        water_amount_liters: water,
        duration_minutes: duration,
        summary: Recommendation::summarize(&reasons),
        reasons,
        next_check_hours: FALLBACK_NEXT_CHECK_HOURS,
        efficiency_score: FALLBACK_EFFICIENCY,
        zones: selected,
        weather: None,
        degraded: true,
    }
}
