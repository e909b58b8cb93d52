//! Seeded stand-ins for field hardware and the weather service.
//!
//! Each reading is an independent uniform draw within a plausible range.
//! With a fixed seed the sequence of readings is reproducible.

use super::{TelemetryProvider, WeatherProvider};
use crate::error::Result;
use crate::models::{DataSource, TelemetrySnapshot, WeatherSnapshot};
use std::ops::Range;
use std::sync::{Mutex, PoisonError};

const SOIL_MOISTURE_PCT: Range<f64> = 20.0..80.0;
const AIR_TEMPERATURE_C: Range<f64> = 18.0..38.0;
const AIR_HUMIDITY_PCT: Range<f64> = 35.0..95.0;
const LIGHT_INTENSITY: Range<f64> = 0.0..1000.0;
const SOIL_PH: Range<f64> = 5.5..7.5;
const SOIL_TEMPERATURE_C: Range<f64> = 15.0..30.0;

const WIND_SPEED_KMH: Range<f64> = 0.0..30.0;
const SHOWER_MM: Range<f64> = 0.5..10.0;
/// Share of readings that report rain.
const SHOWER_CHANCE: f64 = 0.2;

fn draw(rng: &mut fastrand::Rng, range: Range<f64>) -> f64 {
    let value = range.start + rng.f64() * (range.end - range.start);
    // one decimal, like the sensors report
    (value * 10.0).round() / 10.0
}

pub struct SimulatedTelemetry {
    rng: Mutex<fastrand::Rng>,
}

impl SimulatedTelemetry {
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

    pub fn sample(&self) -> TelemetrySnapshot {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        TelemetrySnapshot {
            soil_moisture_pct: draw(&mut rng, SOIL_MOISTURE_PCT),
            temperature_c: draw(&mut rng, AIR_TEMPERATURE_C),
            humidity_pct: draw(&mut rng, AIR_HUMIDITY_PCT),
            light_intensity: draw(&mut rng, LIGHT_INTENSITY),
            soil_ph: draw(&mut rng, SOIL_PH),
            soil_temperature_c: draw(&mut rng, SOIL_TEMPERATURE_C),
        }
    }
}

impl Default for SimulatedTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryProvider for SimulatedTelemetry {
    fn source(&self) -> DataSource {
        DataSource::Simulated
    }

    async fn read(&self) -> Result<TelemetrySnapshot> {
        Ok(self.sample())
    }

    async fn test_connection(&self) -> Result<bool> {
        Ok(true)
    }
}

pub struct SimulatedWeather {
    rng: Mutex<fastrand::Rng>,
}

impl SimulatedWeather {
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

    pub fn sample(&self) -> WeatherSnapshot {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let precipitation_mm = if rng.f64() < SHOWER_CHANCE {
            draw(&mut rng, SHOWER_MM)
        } else {
            0.0
        };
        WeatherSnapshot {
            temperature_c: draw(&mut rng, AIR_TEMPERATURE_C),
            humidity_pct: draw(&mut rng, AIR_HUMIDITY_PCT),
            precipitation_mm,
            wind_speed_kmh: draw(&mut rng, WIND_SPEED_KMH),
        }
    }
}

impl Default for SimulatedWeather {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherProvider for SimulatedWeather {
    fn source(&self) -> DataSource {
        DataSource::Simulated
    }

    async fn current(&self) -> Result<WeatherSnapshot> {
        Ok(self.sample())
    }

    async fn test_connection(&self) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telemetry_stays_in_range() {
        let sim = SimulatedTelemetry::with_seed(7);
        for _ in 0..500 {
            let reading = sim.sample();
            assert!(reading.is_plausible(), "implausible reading {:?}", reading);
            assert!((20.0..=80.0).contains(&reading.soil_moisture_pct));
            assert!((5.5..=7.5).contains(&reading.soil_ph));
        }
    }

    #[test]
    fn weather_stays_in_range() {
        let sim = SimulatedWeather::with_seed(11);
        let mut showers = 0;
        for _ in 0..500 {
            let weather = sim.sample();
            assert!(weather.is_plausible(), "implausible weather {:?}", weather);
            assert!(weather.precipitation_mm <= 10.0);
            if weather.precipitation_mm > 0.0 {
                showers += 1;
            }
        }
        // Mostly dry, but not always
        assert!(showers > 0 && showers < 250, "showers = {}", showers);
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = SimulatedTelemetry::with_seed(99);
        let b = SimulatedTelemetry::with_seed(99);
        for _ in 0..10 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn readings_vary() {
        let sim = SimulatedTelemetry::with_seed(5);
        let first = sim.sample();
        let differs = (0..10).any(|_| sim.sample() != first);
        assert!(differs);
    }
}
