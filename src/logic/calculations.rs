use crate::models::{Priority, WeatherSnapshot};

/// Moisture level the volume sizing aims to restore.
pub const TARGET_MOISTURE_PCT: f64 = 50.0;

/// Litres needed to lift one percentage point of moisture deficit.
pub const LITERS_PER_DEFICIT_POINT: f64 = 8.0;

/// Assumed delivery rate of a zone valve.
pub const FLOW_RATE_LITERS_PER_MINUTE: f64 = 10.0;

const REFERENCE_TEMPERATURE_C: f64 = 25.0;

/// Percentage points of moisture missing from the target level.
pub fn moisture_deficit(soil_moisture_pct: f64) -> f64 {
    (TARGET_MOISTURE_PCT - soil_moisture_pct).max(0.0)
}

/// Evaporation scaling; never shrinks the volume below baseline.
pub fn temperature_factor(temperature_c: f64) -> f64 {
    (temperature_c / REFERENCE_TEMPERATURE_C).max(1.0)
}

/// Litres to apply, rounded to whole litres and never above `cap_liters`.
///
/// `adjustment` is the product of every weather reduction that applied.
pub fn water_volume(
    soil_moisture_pct: f64,
    temperature_c: f64,
    priority: Priority,
    adjustment: f64,
    cap_liters: f64,
) -> f64 {
    let base = moisture_deficit(soil_moisture_pct) * LITERS_PER_DEFICIT_POINT
        * priority.volume_factor();
    let sized = base * temperature_factor(temperature_c) * adjustment;
    // Rounding a fractional cap up would breach it, so clamp twice.
    sized.min(cap_liters).round().min(cap_liters)
}

/// Whole minutes needed to deliver `liters` at the fixed flow rate.
pub fn duration_minutes(liters: f64) -> f64 {
    (liters / FLOW_RATE_LITERS_PER_MINUTE).round()
}

/// Water delivered by a manual run across `zone_count` zones.
pub fn manual_water_volume(zone_count: usize, minutes: f64) -> f64 {
    zone_count as f64 * minutes * FLOW_RATE_LITERS_PER_MINUTE
}

/// How favourable current conditions are for watering, 20-100.
pub fn efficiency_score(soil_moisture_pct: f64, weather: &WeatherSnapshot) -> u8 {
    let mut score: i32 = 80;

    if soil_moisture_pct > 40.0 && soil_moisture_pct < 60.0 {
        score += 10;
    }
    if soil_moisture_pct < 30.0 || soil_moisture_pct > 70.0 {
        score -= 15;
    }
    if weather.humidity_pct > 60.0 && weather.humidity_pct < 80.0 {
        score += 5;
    }
    if weather.temperature_c > 20.0 && weather.temperature_c < 28.0 {
        score += 5;
    }

    score.clamp(20, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather(temperature: f64, humidity: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature_c: temperature,
            humidity_pct: humidity,
            precipitation_mm: 0.0,
            wind_speed_kmh: 5.0,
        }
    }

    #[test]
    fn deficit_is_never_negative() {
        assert_eq!(moisture_deficit(25.0), 25.0);
        assert_eq!(moisture_deficit(50.0), 0.0);
        assert_eq!(moisture_deficit(72.0), 0.0);
    }

    #[test]
    fn temperature_factor_floor() {
        assert_eq!(temperature_factor(10.0), 1.0);
        assert_eq!(temperature_factor(25.0), 1.0);
        assert!((temperature_factor(35.0) - 1.4).abs() < 1e-9);
    }

    #[test]
    fn medium_priority_volume() {
        // deficit 25 * 8 * 1.2 = 240, temp factor 1
        assert_eq!(water_volume(25.0, 24.0, Priority::Medium, 1.0, 500.0), 240.0);
    }

    #[test]
    fn high_priority_hot_volume() {
        // deficit 35 * 8 * 1.5 = 420, * 35/25 = 588 -> capped at 500
        assert_eq!(water_volume(15.0, 35.0, Priority::High, 1.0, 500.0), 500.0);
        assert_eq!(water_volume(15.0, 35.0, Priority::High, 1.0, 1000.0), 588.0);
    }

    #[test]
    fn adjustments_compose() {
        // 240 * 0.7 * 0.8 = 134.4 -> 134
        assert_eq!(
            water_volume(25.0, 24.0, Priority::Medium, 0.7 * 0.8, 500.0),
            134.0
        );
    }

    #[test]
    fn fractional_cap_is_never_exceeded() {
        let volume = water_volume(10.0, 30.0, Priority::High, 1.0, 100.6);
        assert!(volume <= 100.6);
    }

    #[test]
    fn duration_from_flow_rate() {
        assert_eq!(duration_minutes(240.0), 24.0);
        assert_eq!(duration_minutes(134.0), 13.0);
        assert_eq!(duration_minutes(0.0), 0.0);
    }

    #[test]
    fn manual_volume() {
        assert_eq!(manual_water_volume(2, 20.0), 400.0);
        assert_eq!(manual_water_volume(0, 20.0), 0.0);
    }

    #[test]
    fn efficiency_ideal_conditions() {
        // 80 + 10 + 5 + 5
        assert_eq!(efficiency_score(50.0, &weather(24.0, 70.0)), 100);
    }

    #[test]
    fn efficiency_dry_soil_penalty() {
        // 80 - 15 + 5 + 5
        assert_eq!(efficiency_score(25.0, &weather(24.0, 70.0)), 75);
        // 80 - 15
        assert_eq!(efficiency_score(80.0, &weather(35.0, 90.0)), 65);
    }

    #[test]
    fn efficiency_boundaries_are_exclusive() {
        assert_eq!(efficiency_score(40.0, &weather(20.0, 60.0)), 80);
        assert_eq!(efficiency_score(60.0, &weather(28.0, 80.0)), 80);
        assert_eq!(efficiency_score(30.0, &weather(15.0, 50.0)), 80);
        assert_eq!(efficiency_score(70.0, &weather(15.0, 50.0)), 80);
    }
}
