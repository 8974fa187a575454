//! Simulation engine that drives a battery through a sequence of market intervals.

use chrono::TimeDelta;
use tracing::{debug, info, warn};

use crate::devices::Battery;
use crate::error::{Result, SimError};
use crate::market::MarketInterval;

use super::policy::DispatchPolicy;
use super::types::{IntervalContext, SimConfig, SimulationRecord};

/// Simulation engine owning the battery, its dispatch policy, and configuration.
///
/// Generic over `P: DispatchPolicy` for static dispatch. The battery is owned
/// exclusively by the engine and mutated once per interval, in order.
pub struct Engine<P: DispatchPolicy> {
    config: SimConfig,
    battery: Battery,
    policy: P,
}

impl<P: DispatchPolicy> Engine<P> {
    /// Creates a new simulation engine.
    ///
    /// # Arguments
    ///
    /// * `config` - Timing configuration (nominal interval length)
    /// * `battery` - Battery to operate, normally empty
    /// * `policy` - Dispatch rule applied to every interval
    pub fn new(config: SimConfig, battery: Battery, policy: P) -> Self {
        Self {
            config,
            battery,
            policy,
        }
    }

    /// Executes one interval and returns its record.
    ///
    /// # Arguments
    ///
    /// * `interval` - Market interval to trade in
    /// * `duration` - Length of the interval
    ///
    /// # Returns
    ///
    /// A `SimulationRecord` with the energy moved, its cost, and the stored
    /// energy after the operation.
    pub fn step(&mut self, interval: &MarketInterval, duration: TimeDelta) -> SimulationRecord {
        let context = IntervalContext::new(interval.timestamp, duration);
        let dispatch_mw = self.policy.decide(&mut self.battery, &context);

        SimulationRecord {
            timestamp: interval.timestamp,
            spot_price: interval.spot_price,
            dispatch_mw,
            cost: interval.spot_price * dispatch_mw,
            capacity_after: self.battery.current_capacity_mwh(),
        }
    }

    /// Executes every interval in order and returns one record per interval.
    ///
    /// Every interval lasts the sampling granularity of the sequence, the
    /// smallest gap between consecutive timestamps, so a hole in the data
    /// never moves more than the rated power allows. A lone interval uses the
    /// configured nominal length.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfOrderInput`] if timestamps are not strictly
    /// increasing. Nothing is simulated in that case and the battery is left
    /// untouched.
    pub fn run(&mut self, intervals: &[MarketInterval]) -> Result<Vec<SimulationRecord>> {
        check_chronological(intervals)?;

        info!(
            battery = self.battery.name(),
            intervals = intervals.len(),
            "starting simulation"
        );

        let duration = self.granularity(intervals);
        debug!(minutes = duration.num_minutes(), "inferred interval length");

        let mut results = Vec::with_capacity(intervals.len());
        for interval in intervals {
            results.push(self.step(interval, duration));
        }

        if !intervals.is_empty() && results.iter().all(|r| r.dispatch_mw == 0.0) {
            warn!("battery never left idle; check the schedule windows against the data");
        }
        debug!(
            stored_mwh = self.battery.current_capacity_mwh(),
            "simulation finished"
        );

        Ok(results)
    }

    /// Smallest gap between consecutive timestamps; a lone interval uses the
    /// configured nominal length. Missing rows never lengthen an interval.
    fn granularity(&self, intervals: &[MarketInterval]) -> TimeDelta {
        intervals
            .windows(2)
            .map(|pair| pair[1].timestamp - pair[0].timestamp)
            .min()
            .unwrap_or_else(|| self.config.interval())
    }

    /// Returns a reference to the battery (for reporting and KPI queries).
    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    /// Returns a reference to the simulation configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

/// Verifies that timestamps are strictly increasing.
///
/// # Errors
///
/// Returns [`SimError::OutOfOrderInput`] for the first interval that does not
/// come after its predecessor, duplicates included.
pub fn check_chronological(intervals: &[MarketInterval]) -> Result<()> {
    for (index, pair) in intervals.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(SimError::OutOfOrderInput {
                index: index + 1,
                previous: pair[0].timestamp,
                current: pair[1].timestamp,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::sim::policy::{StepSizing, TimeOfDayPolicy};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 4)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .expect("valid timestamp")
    }

    fn engine(sizing: StepSizing) -> Engine<TimeOfDayPolicy> {
        let battery = Battery::new("BESS1", 10.0, 20.0, 20.0).expect("valid battery");
        let policy = TimeOfDayPolicy {
            sizing,
            ..TimeOfDayPolicy::default()
        };
        Engine::new(SimConfig::new(5, 1, 0), battery, policy)
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let mut engine = engine(StepSizing::IntervalDuration);
        let results = engine.run(&[]).expect("empty input is valid");
        assert!(results.is_empty());
        assert_eq!(engine.battery().current_capacity_mwh(), 0.0);
    }

    #[test]
    fn record_cost_is_price_times_dispatch() {
        let mut engine = engine(StepSizing::FixedDivisor { divisor: 20 });
        let intervals = vec![
            MarketInterval::new(at(11, 0), 40.0),
            MarketInterval::new(at(11, 5), -12.5),
        ];
        let results = engine.run(&intervals).expect("ordered input");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].dispatch_mw, -1.0);
        assert_eq!(results[0].cost, -40.0);
        assert_eq!(results[0].capacity_after, 1.0);
        // Charging into a negative price earns money.
        assert_eq!(results[1].cost, 12.5);
        assert_eq!(results[1].capacity_after, 2.0);
    }

    #[test]
    fn durations_follow_timestamp_gaps() {
        let mut engine = engine(StepSizing::IntervalDuration);
        let intervals = vec![
            MarketInterval::new(at(11, 0), 50.0),
            MarketInterval::new(at(11, 15), 50.0),
            MarketInterval::new(at(11, 30), 50.0),
        ];
        let results = engine.run(&intervals).expect("ordered input");
        // 20 MW for 15 minutes = 5 MWh, then clamped to the remaining 5 MWh.
        assert_eq!(results[0].dispatch_mw, -5.0);
        assert_eq!(results[1].dispatch_mw, -5.0);
        assert_eq!(results[2].dispatch_mw, 0.0);
        assert_eq!(engine.battery().current_capacity_mwh(), 10.0);
    }

    #[test]
    fn missing_rows_do_not_stretch_intervals() {
        let battery = Battery::new("BESS1", 100.0, 20.0, 20.0).expect("valid battery");
        let mut engine = Engine::new(SimConfig::new(5, 1, 0), battery, TimeOfDayPolicy::default());
        let intervals = vec![
            MarketInterval::new(at(11, 0), 50.0),
            MarketInterval::new(at(11, 5), 50.0),
            MarketInterval::new(at(13, 0), 50.0),
        ];
        let results = engine.run(&intervals).expect("ordered input");

        let step = 20.0 * 5.0 / 60.0;
        for r in &results {
            assert_eq!(r.dispatch_mw, -step, "at {}", r.timestamp);
        }
        assert_eq!(engine.battery().current_capacity_mwh(), 5.0);
    }

    #[test]
    fn lone_interval_uses_nominal_length() {
        let mut engine = engine(StepSizing::IntervalDuration);
        let results = engine
            .run(&[MarketInterval::new(at(12, 0), 50.0)])
            .expect("single interval");
        assert!((results[0].dispatch_mw + 20.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_out_of_order_input_without_mutation() {
        let mut engine = engine(StepSizing::IntervalDuration);
        let intervals = vec![
            MarketInterval::new(at(11, 0), 50.0),
            MarketInterval::new(at(11, 10), 50.0),
            MarketInterval::new(at(11, 5), 50.0),
        ];
        let err = engine.run(&intervals).unwrap_err();
        assert_eq!(
            err,
            SimError::OutOfOrderInput {
                index: 2,
                previous: at(11, 10),
                current: at(11, 5),
            }
        );
        assert_eq!(engine.battery().current_capacity_mwh(), 0.0);
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let intervals = vec![
            MarketInterval::new(at(11, 0), 50.0),
            MarketInterval::new(at(11, 0), 51.0),
        ];
        assert!(check_chronological(&intervals).is_err());
    }

    #[test]
    fn step_idles_outside_windows() {
        let mut engine = engine(StepSizing::IntervalDuration);
        let record = engine.step(&MarketInterval::new(at(3, 0), 99.0), TimeDelta::minutes(5));
        assert_eq!(record.dispatch_mw, 0.0);
        assert_eq!(record.cost, 0.0);
        assert_eq!(record.capacity_after, 0.0);
    }
}
