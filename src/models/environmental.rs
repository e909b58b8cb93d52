use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    Simulated,
    HomeAssistant,
    OpenWeatherMap,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Simulated => "Simulated",
            DataSource::HomeAssistant => "Field Sensors",
            DataSource::OpenWeatherMap => "OpenWeatherMap",
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reading of the field sensors, taken at request time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub soil_moisture_pct: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub light_intensity: f64,
    pub soil_ph: f64,
    pub soil_temperature_c: f64,
}

impl TelemetrySnapshot {
    /// Check the physical ranges a sensor can report.
    pub fn is_plausible(&self) -> bool {
        (0.0..=100.0).contains(&self.soil_moisture_pct)
            && (0.0..=100.0).contains(&self.humidity_pct)
            && (0.0..=14.0).contains(&self.soil_ph)
            && self.light_intensity >= 0.0
            && self.temperature_c.is_finite()
            && self.soil_temperature_c.is_finite()
    }
}

/// Current conditions reported by the weather service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub precipitation_mm: f64,
    pub wind_speed_kmh: f64,
}

impl WeatherSnapshot {
    pub fn is_plausible(&self) -> bool {
        self.temperature_c.is_finite()
            && (0.0..=100.0).contains(&self.humidity_pct)
            && self.precipitation_mm >= 0.0
            && self.wind_speed_kmh >= 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    #[default]
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Rising => "↑ Rising",
            Trend::Falling => "↓ Falling",
            Trend::Stable => "→ Stable",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

pub fn meters_per_second_to_kmh(mps: f64) -> f64 {
    mps * 3.6
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telemetry() -> TelemetrySnapshot {
        TelemetrySnapshot {
            soil_moisture_pct: 42.0,
            temperature_c: 24.0,
            humidity_pct: 65.0,
            light_intensity: 540.0,
            soil_ph: 6.8,
            soil_temperature_c: 19.5,
        }
    }

    #[test]
    fn fahrenheit_to_celsius_known_values() {
        assert!((fahrenheit_to_celsius(32.0) - 0.0).abs() < 0.001);
        assert!((fahrenheit_to_celsius(212.0) - 100.0).abs() < 0.001);
        assert!((fahrenheit_to_celsius(-40.0) - (-40.0)).abs() < 0.001);
        // Heat stress default threshold: 30°C = 86°F
        assert!((fahrenheit_to_celsius(86.0) - 30.0).abs() < 0.001);
    }

    #[test]
    fn wind_speed_conversion() {
        assert!((meters_per_second_to_kmh(10.0) - 36.0).abs() < 0.001);
        assert_eq!(meters_per_second_to_kmh(0.0), 0.0);
    }

    #[test]
    fn telemetry_plausibility() {
        assert!(telemetry().is_plausible());

        let mut wet = telemetry();
        wet.soil_moisture_pct = 104.0;
        assert!(!wet.is_plausible());

        let mut acidic = telemetry();
        acidic.soil_ph = -1.0;
        assert!(!acidic.is_plausible());

        let mut broken = telemetry();
        broken.temperature_c = f64::NAN;
        assert!(!broken.is_plausible());
    }

    #[test]
    fn weather_plausibility() {
        let weather = WeatherSnapshot {
            temperature_c: 22.0,
            humidity_pct: 70.0,
            precipitation_mm: 0.0,
            wind_speed_kmh: 12.0,
        };
        assert!(weather.is_plausible());

        let negative_rain = WeatherSnapshot {
            precipitation_mm: -0.5,
            ..weather
        };
        assert!(!negative_rain.is_plausible());
    }

    #[test]
    fn data_source_display() {
        assert_eq!(DataSource::Simulated.as_str(), "Simulated");
        assert_eq!(DataSource::HomeAssistant.as_str(), "Field Sensors");
        assert_eq!(DataSource::OpenWeatherMap.as_str(), "OpenWeatherMap");
    }

    #[test]
    fn trend_display() {
        assert!(Trend::Rising.as_str().contains("Rising"));
        assert!(Trend::Falling.as_str().contains("Falling"));
        assert!(Trend::Stable.as_str().contains("Stable"));
    }
}
