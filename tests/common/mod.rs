//! Shared test fixtures for integration tests.

use bess_sim::devices::Battery;
use bess_sim::market::MarketInterval;
use bess_sim::sim::policy::{StepSizing, TimeOfDayPolicy};
use bess_sim::sim::types::SimConfig;
use bess_sim::sim::window::DailyWindow;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Default simulation configuration (5-minute intervals, 1 day, seed 42).
pub fn default_config() -> SimConfig {
    SimConfig::new(5, 1, 42)
}

/// Midnight of the fixture day.
pub fn day_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid timestamp")
}

/// One full day of 5-minute intervals at a constant price.
pub fn flat_day(price: f64) -> Vec<MarketInterval> {
    let config = default_config();
    (0..config.total_intervals())
        .map(|i| MarketInterval::new(day_start() + TimeDelta::minutes(5 * i as i64), price))
        .collect()
}

/// Reference battery (10 MWh, 20 MW charge/dispatch, empty).
pub fn reference_battery() -> Battery {
    Battery::new("BESS1", 10.0, 20.0, 20.0).expect("valid battery")
}

/// Default schedule (charge 11:00–14:00, dispatch 17:00–19:00) with the given sizing.
pub fn default_policy(sizing: StepSizing) -> TimeOfDayPolicy {
    TimeOfDayPolicy::new(
        DailyWindow::from_hm((11, 0), (14, 0)).expect("valid window"),
        DailyWindow::from_hm((17, 0), (19, 0)).expect("valid window"),
        sizing,
    )
}

/// Default schedule with the legacy `rate / 20` step.
pub fn legacy_policy() -> TimeOfDayPolicy {
    default_policy(StepSizing::FixedDivisor { divisor: 20 })
}
