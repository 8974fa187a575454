//! Dispatch policies deciding what the battery does in each interval.

use serde::Deserialize;
use tracing::debug;

use crate::config::ScheduleConfig;
use crate::devices::Battery;

use super::types::IntervalContext;
use super::window::DailyWindow;

/// Trait defining a rule that operates a battery one interval at a time.
///
/// Implementations mutate the battery through its bounded
/// [`Battery::charge`] / [`Battery::dispatch`] operations only, so the
/// capacity invariant holds regardless of the rule.
pub trait DispatchPolicy {
    /// Operates the battery for one interval and returns the energy moved.
    ///
    /// Negative values mean energy was absorbed (charging), positive values
    /// mean energy was released (dispatching), zero means idle.
    ///
    /// Must be called exactly once per interval, in chronological order,
    /// since the stored energy carries forward.
    fn decide(&self, battery: &mut Battery, context: &IntervalContext) -> f64;
}

/// How much energy a rate translates into for one interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case", deny_unknown_fields)]
pub enum StepSizing {
    /// `rate * interval_hours`: works for any sampling granularity.
    #[default]
    IntervalDuration,
    /// `rate / divisor` regardless of interval length.
    ///
    /// A divisor of 20 reproduces the legacy five-minute tuning.
    FixedDivisor { divisor: u32 },
}

impl StepSizing {
    /// Energy requested from the battery for one interval at `rate_mw`.
    pub fn step_energy_mwh(&self, rate_mw: f64, context: &IntervalContext) -> f64 {
        match *self {
            Self::IntervalDuration => context.energy_at_mwh(rate_mw),
            Self::FixedDivisor { divisor } => rate_mw / f64::from(divisor.max(1)),
        }
    }
}

/// Fixed time-of-day schedule: charge in one daily window, dispatch in another.
///
/// The charge window takes precedence if the two overlap. Outside both windows
/// the battery idles and is left untouched.
#[derive(Debug, Clone, Copy)]
pub struct TimeOfDayPolicy {
    pub charge_window: DailyWindow,
    pub dispatch_window: DailyWindow,
    pub sizing: StepSizing,
}

impl TimeOfDayPolicy {
    pub fn new(charge_window: DailyWindow, dispatch_window: DailyWindow, sizing: StepSizing) -> Self {
        Self {
            charge_window,
            dispatch_window,
            sizing,
        }
    }

    /// Builds the policy from the scenario's schedule section.
    pub fn from_config(config: &ScheduleConfig) -> Self {
        let policy = Self::new(
            DailyWindow::new(config.charge_start, config.charge_end),
            DailyWindow::new(config.dispatch_start, config.dispatch_end),
            config.sizing,
        );
        debug!(
            charge = %format_window(&policy.charge_window),
            dispatch = %format_window(&policy.dispatch_window),
            sizing = ?policy.sizing,
            "built time-of-day policy"
        );
        policy
    }
}

impl Default for TimeOfDayPolicy {
    fn default() -> Self {
        Self::from_config(&ScheduleConfig::default())
    }
}

impl DispatchPolicy for TimeOfDayPolicy {
    fn decide(&self, battery: &mut Battery, context: &IntervalContext) -> f64 {
        let time = context.timestamp.time();

        if self.charge_window.contains(time) {
            let request = self.sizing.step_energy_mwh(battery.charge_rate_mw(), context);
            let charged = battery.charge(request);
            if charged > 0.0 { -charged } else { 0.0 }
        } else if self.dispatch_window.contains(time) {
            let request = self.sizing.step_energy_mwh(battery.dispatch_rate_mw(), context);
            battery.dispatch(request)
        } else {
            0.0
        }
    }
}

fn format_window(window: &DailyWindow) -> String {
    format!("{}-{}", window.start.format("%H:%M:%S"), window.end.format("%H:%M:%S"))
}
