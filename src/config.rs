use crate::error::{AdvisorError, Result};
use crate::models::{Settings, Zone};
use dialoguer::{Input, Password};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound on how long a recommendation may wait for its providers.
pub const MAX_PROVIDER_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "Zone::defaults")]
    pub zones: Vec<Zone>,
    /// Starting policy; persisted operator changes take precedence.
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,
}

fn default_provider_timeout_secs() -> u64 {
    MAX_PROVIDER_TIMEOUT_SECS
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TelemetryConfig {
    /// Fixes the simulated sensor sequence when no hardware is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation_seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homeassistant: Option<HomeAssistantConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WeatherConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation_seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openweathermap: Option<OpenWeatherMapConfig>,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct HomeAssistantConfig {
    pub url: String,
    pub token: String,
    #[serde(default)]
    pub entities: SensorEntities,
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
}

impl std::fmt::Debug for HomeAssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomeAssistantConfig")
            .field("url", &self.url)
            .field("token", &"[REDACTED]")
            .field("entities", &self.entities)
            .field("temperature_unit", &self.temperature_unit)
            .finish()
    }
}

impl Default for HomeAssistantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8123".into(),
            token: String::new(),
            entities: SensorEntities::default(),
            temperature_unit: TemperatureUnit::Celsius,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SensorEntities {
    pub soil_moisture: String,
    pub temperature: String,
    pub humidity: String,
    pub light_intensity: String,
    pub soil_ph: String,
    pub soil_temperature: String,
}

impl Default for SensorEntities {
    fn default() -> Self {
        Self {
            soil_moisture: "sensor.field_soil_moisture".into(),
            temperature: "sensor.field_temperature".into(),
            humidity: "sensor.field_humidity".into(),
            light_intensity: "sensor.field_light_intensity".into(),
            soil_ph: "sensor.field_soil_ph".into(),
            soil_temperature: "sensor.field_soil_temperature".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Fahrenheit,
    #[default]
    Celsius,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OpenWeatherMapConfig {
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl std::fmt::Debug for OpenWeatherMapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMapConfig")
            .field("api_key", &"[REDACTED]")
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(AdvisorError::Config(format!(
                "Config file not found at {:?}. Run `irrigation-advisor init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| AdvisorError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    /// Parse YAML after substituting `${VAR}` references from the environment.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| AdvisorError::Config(format!("Failed to parse config: {}", e)))?;

        config.settings.validate()?;
        Ok(config)
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("irrigation-advisor").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/irrigation-advisor/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AdvisorError::Config("Cannot determine config directory".into()))?
            .join("irrigation-advisor");
        Ok(config_dir.join("config.yaml"))
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs.clamp(1, MAX_PROVIDER_TIMEOUT_SECS))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up the irrigation advisor.");
        println!("Zones start from the default vegetable/orchard/herb layout; edit the file to change them.");
        println!();

        let defaults = Settings::default();

        // --- Irrigation policy ---
        println!("Irrigation Policy");
        let moisture_threshold_pct: f64 = Input::new()
            .with_prompt("  Moisture threshold (%)")
            .default(defaults.moisture_threshold_pct)
            .interact_text()
            .map_err(input_error)?;

        let temperature_threshold_c: f64 = Input::new()
            .with_prompt("  Heat stress threshold (°C)")
            .default(defaults.temperature_threshold_c)
            .interact_text()
            .map_err(input_error)?;

        let max_daily_water_liters: f64 = Input::new()
            .with_prompt("  Max daily water (L)")
            .default(defaults.max_daily_water_liters)
            .interact_text()
            .map_err(input_error)?;

        println!();

        // --- Home Assistant (optional) ---
        println!("Home Assistant field sensors (leave URL blank to simulate)");
        let ha_url: String = Input::new()
            .with_prompt("  URL")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(input_error)?;

        let homeassistant = if ha_url.is_empty() {
            None
        } else {
            let token: String = Password::new()
                .with_prompt("  Token")
                .allow_empty_password(true)
                .interact()
                .map_err(input_error)?;

            let soil_moisture: String = Input::new()
                .with_prompt("  Soil moisture entity")
                .default(SensorEntities::default().soil_moisture)
                .interact_text()
                .map_err(input_error)?;

            Some(HomeAssistantConfig {
                url: ha_url,
                token,
                entities: SensorEntities {
                    soil_moisture,
                    ..SensorEntities::default()
                },
                temperature_unit: TemperatureUnit::Celsius,
            })
        };

        println!();

        // --- OpenWeatherMap (optional) ---
        println!("OpenWeatherMap (leave API key blank to simulate)");
        let owm_api_key: String = Input::new()
            .with_prompt("  API key")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(input_error)?;

        let openweathermap = if owm_api_key.is_empty() {
            None
        } else {
            let latitude: f64 = Input::new()
                .with_prompt("  Latitude")
                .default(13.75)
                .interact_text()
                .map_err(input_error)?;

            let longitude: f64 = Input::new()
                .with_prompt("  Longitude")
                .default(100.5)
                .interact_text()
                .map_err(input_error)?;

            Some(OpenWeatherMapConfig {
                api_key: owm_api_key,
                latitude,
                longitude,
                enabled: true,
            })
        };

        println!();

        let config = Config {
            settings: Settings {
                moisture_threshold_pct,
                temperature_threshold_c,
                max_daily_water_liters,
                ..defaults
            },
            telemetry: TelemetryConfig {
                simulation_seed: None,
                homeassistant,
            },
            weather: WeatherConfig {
                simulation_seed: None,
                openweathermap,
            },
            ..Config::default()
        };
        config.settings.validate()?;

        // Write to default config path
        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| AdvisorError::Config(format!("Failed to serialize config: {}", e)))?;

        // Write with a header comment
        let content = format!(
            "# Irrigation Advisor Configuration\n# Generated by `irrigation-advisor init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| AdvisorError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        // CLI override takes priority
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("IRRIGATION_ADVISOR_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| AdvisorError::Config("Cannot determine data directory".into()))?
            .join("irrigation-advisor");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("irrigation-advisor.db"))
    }
}

fn input_error(e: impl std::fmt::Display) -> AdvisorError {
    AdvisorError::Config(format!("Input error: {}", e))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zones: Zone::defaults(),
            settings: Settings::default(),
            telemetry: TelemetryConfig::default(),
            weather: WeatherConfig::default(),
            provider_timeout_secs: MAX_PROVIDER_TIMEOUT_SECS,
        }
    }
}
