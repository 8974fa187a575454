//! Scenario configuration (TOML or JSON) and preset definitions.

use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDate, NaiveTime, TimeDelta};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::sim::policy::StepSizing;
use crate::sim::types::SimConfig;

/// Top-level scenario configuration.
///
/// All fields have defaults matching the baseline scenario. Load from a file
/// with [`ScenarioConfig::from_file`] or use [`ScenarioConfig::baseline`] for
/// the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Battery parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Daily charge/dispatch schedule.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Synthetic market generator parameters.
    #[serde(default)]
    pub market: MarketConfig,
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of days of market data to generate (must be > 0).
    pub days: u32,
    /// Market interval length in minutes (must divide a day evenly).
    pub interval_minutes: u32,
    /// Master random seed.
    pub seed: u64,
    /// First simulated day; defaults to `days` before today.
    pub start_date: Option<NaiveDate>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            days: 90,
            interval_minutes: 5,
            seed: 42,
            start_date: None,
        }
    }
}

impl SimulationConfig {
    /// Timing configuration for the engine and the market generator.
    ///
    /// # Panics
    ///
    /// Panics on values rejected by [`ScenarioConfig::validate`].
    pub fn sim_config(&self) -> SimConfig {
        SimConfig::new(self.interval_minutes, self.days, self.seed)
    }

    /// The configured start date, or `days` before today when unset.
    pub fn resolved_start_date(&self) -> NaiveDate {
        self.start_date.unwrap_or_else(|| {
            Local::now().date_naive() - TimeDelta::days(i64::from(self.days))
        })
    }
}

/// Battery parameters.
///
/// The short keys `capacity`, `charge_rate` and `dispatch_rate` are accepted
/// for compatibility with older JSON configuration files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Label used in reports and exported column names.
    pub name: String,
    /// Storable energy (MWh).
    #[serde(alias = "capacity")]
    pub capacity_mwh: f64,
    /// Maximum charging power (MW).
    #[serde(alias = "charge_rate")]
    pub charge_rate_mw: f64,
    /// Maximum discharging power (MW).
    #[serde(alias = "dispatch_rate")]
    pub dispatch_rate_mw: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            name: "BESS1".to_string(),
            capacity_mwh: 100.0,
            charge_rate_mw: 50.0,
            dispatch_rate_mw: 50.0,
        }
    }
}

/// Daily time-of-day schedule. Window bounds are inclusive, written `HH:MM:SS`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    pub charge_start: NaiveTime,
    pub charge_end: NaiveTime,
    pub dispatch_start: NaiveTime,
    pub dispatch_end: NaiveTime,
    /// Conversion from rate to per-interval energy.
    pub sizing: StepSizing,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            charge_start: hm(11, 0),
            charge_end: hm(14, 0),
            dispatch_start: hm(17, 0),
            dispatch_end: hm(19, 0),
            sizing: StepSizing::IntervalDuration,
        }
    }
}

/// Synthetic market generator parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketConfig {
    /// Price before seasonal and daily multipliers ($/MWh).
    pub base_price: f64,
    /// Relative standard deviation of price noise.
    pub volatility: f64,
    /// Probability of a price spike in any interval.
    pub spike_probability: f64,
    /// Demand before multipliers (MW).
    pub base_demand_mw: f64,
    /// Standard deviation of demand noise (MW).
    pub demand_noise_mw: f64,
    /// Demand floor (MW).
    pub min_demand_mw: f64,
    /// Solar output at solar noon on a clear day (MW).
    pub max_solar_mw: f64,
    /// Lower bound of uniform wind output (MW).
    pub wind_min_mw: f64,
    /// Upper bound of uniform wind output (MW).
    pub wind_max_mw: f64,
    /// Market price floor ($/MWh).
    pub price_floor: f64,
    /// Market price cap ($/MWh).
    pub price_cap: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_price: 45.0,
            volatility: 0.15,
            spike_probability: 0.01,
            base_demand_mw: 8_000.0,
            demand_noise_mw: 200.0,
            min_demand_mw: 4_000.0,
            max_solar_mw: 2_500.0,
            wind_min_mw: 500.0,
            wind_max_mw: 3_000.0,
            price_floor: -16_000.0,
            price_cap: 16_600.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.capacity_mwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: a 100 MWh / 50 MW battery on the
    /// default 11:00–14:00 charge and 17:00–19:00 dispatch windows.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the legacy preset: per-interval energy is `rate / 20`,
    /// regardless of interval length.
    pub fn legacy_divisor() -> Self {
        Self {
            schedule: ScheduleConfig {
                sizing: StepSizing::FixedDivisor { divisor: 20 },
                ..ScheduleConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the long-duration preset: four hours of storage and a wider
    /// evening dispatch window.
    pub fn long_duration() -> Self {
        Self {
            battery: BatteryConfig {
                name: "BESS4H".to_string(),
                capacity_mwh: 200.0,
                ..BatteryConfig::default()
            },
            schedule: ScheduleConfig {
                charge_start: hm(10, 0),
                charge_end: hm(15, 0),
                dispatch_start: hm(16, 0),
                dispatch_end: hm(21, 0),
                ..ScheduleConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "legacy_divisor", "long_duration"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "legacy_divisor" => Ok(Self::legacy_divisor()),
            "long_duration" => Ok(Self::long_duration()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario file, choosing JSON for `.json` files and TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or does not parse.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };

        info!(path = %path.display(), battery = %config.battery.name, "loaded scenario");
        Ok(config)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Parses a scenario from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the JSON is invalid or contains unknown fields.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::new("json", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.days == 0 {
            errors.push(ConfigError::new("simulation.days", "must be > 0"));
        }
        if s.interval_minutes == 0 || (24 * 60) % s.interval_minutes != 0 {
            errors.push(ConfigError::new(
                "simulation.interval_minutes",
                "must be > 0 and divide 1440 evenly",
            ));
        }

        let bat = &self.battery;
        if bat.name.trim().is_empty() {
            errors.push(ConfigError::new("battery.name", "must not be empty"));
        }
        for (field, value) in [
            ("battery.capacity_mwh", bat.capacity_mwh),
            ("battery.charge_rate_mw", bat.charge_rate_mw),
            ("battery.dispatch_rate_mw", bat.dispatch_rate_mw),
        ] {
            if !(value.is_finite() && value > 0.0) {
                errors.push(ConfigError::new(field, "must be a positive number"));
            }
        }

        if let StepSizing::FixedDivisor { divisor: 0 } = self.schedule.sizing {
            errors.push(ConfigError::new("schedule.sizing.divisor", "must be > 0"));
        }

        let m = &self.market;
        for (field, value) in [
            ("market.base_price", m.base_price),
            ("market.volatility", m.volatility),
            ("market.spike_probability", m.spike_probability),
            ("market.base_demand_mw", m.base_demand_mw),
            ("market.demand_noise_mw", m.demand_noise_mw),
            ("market.min_demand_mw", m.min_demand_mw),
            ("market.max_solar_mw", m.max_solar_mw),
            ("market.wind_min_mw", m.wind_min_mw),
            ("market.wind_max_mw", m.wind_max_mw),
            ("market.price_floor", m.price_floor),
            ("market.price_cap", m.price_cap),
        ] {
            if !value.is_finite() {
                errors.push(ConfigError::new(field, "must be a finite number"));
            }
        }
        if !(0.0..=1.0).contains(&m.spike_probability) {
            errors.push(ConfigError::new("market.spike_probability", "must be in [0.0, 1.0]"));
        }
        if m.volatility < 0.0 {
            errors.push(ConfigError::new("market.volatility", "must be >= 0"));
        }
        if m.demand_noise_mw < 0.0 {
            errors.push(ConfigError::new("market.demand_noise_mw", "must be >= 0"));
        }
        if m.min_demand_mw <= 0.0 {
            errors.push(ConfigError::new("market.min_demand_mw", "must be > 0"));
        }
        if m.wind_min_mw > m.wind_max_mw {
            errors.push(ConfigError::new("market.wind_min_mw", "must be <= market.wind_max_mw"));
        }
        if m.price_floor >= m.price_cap {
            errors.push(ConfigError::new("market.price_floor", "must be < market.price_cap"));
        }

        errors
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}
