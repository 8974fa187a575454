//! Core simulation types: timing configuration, per-interval context, and records.

use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Centralized simulation timing configuration.
///
/// The engine uses `interval_minutes` as the nominal interval length when a
/// sequence is too short to infer it, and the synthetic market uses it as the
/// sampling frequency.
///
/// # Examples
///
/// ```
/// use bess_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(5, 2, 42);
/// assert_eq!(cfg.intervals_per_day(), 288);
/// assert_eq!(cfg.total_intervals(), 576);
/// ```
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Length of one market interval in minutes.
    pub interval_minutes: u32,
    /// Number of days to simulate.
    pub days: u32,
    /// Master random seed for reproducibility.
    pub seed: u64,
}

impl SimConfig {
    /// Creates a new timing configuration.
    ///
    /// # Panics
    ///
    /// Panics if `interval_minutes` is zero or longer than a day, or if `days` is zero.
    pub fn new(interval_minutes: u32, days: u32, seed: u64) -> Self {
        assert!(
            (1..=MINUTES_PER_DAY).contains(&interval_minutes),
            "interval_minutes must be in 1..=1440"
        );
        assert!(days > 0, "days must be > 0");
        Self {
            interval_minutes,
            days,
            seed,
        }
    }

    /// Nominal interval length.
    pub fn interval(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.interval_minutes))
    }

    /// Number of whole intervals in one day.
    pub fn intervals_per_day(&self) -> usize {
        (MINUTES_PER_DAY / self.interval_minutes) as usize
    }

    /// Total number of intervals across all days.
    pub fn total_intervals(&self) -> usize {
        self.intervals_per_day() * self.days as usize
    }
}

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// What a dispatch policy sees of one interval.
#[derive(Debug, Clone, Copy)]
pub struct IntervalContext {
    /// Start of the interval.
    pub timestamp: NaiveDateTime,
    /// Length of the interval.
    pub duration: TimeDelta,
}

impl IntervalContext {
    pub fn new(timestamp: NaiveDateTime, duration: TimeDelta) -> Self {
        Self {
            timestamp,
            duration,
        }
    }

    /// Energy moved at `rate_mw` over the whole interval (MWh).
    pub fn energy_at_mwh(&self, rate_mw: f64) -> f64 {
        // multiply first; dividing the duration first rounds 5-minute steps down
        rate_mw * self.duration.num_milliseconds() as f64 / MILLIS_PER_HOUR
    }
}

/// Outcome of one simulated market interval.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRecord {
    /// Start of the interval.
    pub timestamp: NaiveDateTime,
    /// Spot price during the interval (currency/MWh).
    pub spot_price: f64,
    /// Energy moved (negative = charging, positive = dispatching, zero = idle).
    pub dispatch_mw: f64,
    /// `spot_price * dispatch_mw`: negative when buying, positive when selling.
    pub cost: f64,
    /// Stored energy right after this interval (MWh).
    pub capacity_after: f64,
}

impl fmt::Display for SimulationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | price={:>9.2} $/MWh | dispatch={:>7.3} | cost={:>10.2} | stored={:>7.3} MWh",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.spot_price,
            self.dispatch_mw,
            self.cost,
            self.capacity_after,
        )
    }
}
