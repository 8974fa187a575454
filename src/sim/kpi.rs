//! Post-hoc KPI computation from simulation results.

use std::fmt;

use crate::devices::Battery;
use crate::reporting::format_currency;

use super::types::SimulationRecord;

/// Aggregate key performance indicators derived from a complete simulation run.
///
/// Computed post-hoc from the record sequence so reported figures always
/// agree with the exported rows.
#[derive(Debug, Clone)]
pub struct KpiReport {
    /// Battery label.
    pub battery_name: String,
    /// Sum of all interval costs; positive means the battery made money.
    pub net_revenue: f64,
    /// Cost summed over charging intervals; negative unless prices went negative.
    pub charging_cost: f64,
    /// Cost summed over dispatching intervals.
    pub dispatch_revenue: f64,
    /// Energy absorbed over the run (MWh, >= 0).
    pub energy_charged_mwh: f64,
    /// Energy released over the run (MWh, >= 0).
    pub energy_dispatched_mwh: f64,
    /// Mean stored energy after each interval (MWh).
    pub mean_capacity_mwh: f64,
    /// Highest stored energy after any interval (MWh).
    pub peak_capacity_mwh: f64,
    /// Released energy divided by capacity.
    pub equivalent_full_cycles: f64,
    /// Intervals spent charging.
    pub charging_intervals: usize,
    /// Intervals spent dispatching.
    pub dispatching_intervals: usize,
    /// Intervals spent idle.
    pub idle_intervals: usize,
}

impl KpiReport {
    /// Computes all KPIs from the complete record sequence.
    ///
    /// # Arguments
    ///
    /// * `results` - Complete simulation records
    /// * `battery` - The simulated battery, for its name and capacity
    pub fn from_results(results: &[SimulationRecord], battery: &Battery) -> Self {
        let mut report = Self {
            battery_name: battery.name().to_string(),
            net_revenue: 0.0,
            charging_cost: 0.0,
            dispatch_revenue: 0.0,
            energy_charged_mwh: 0.0,
            energy_dispatched_mwh: 0.0,
            mean_capacity_mwh: 0.0,
            peak_capacity_mwh: 0.0,
            equivalent_full_cycles: 0.0,
            charging_intervals: 0,
            dispatching_intervals: 0,
            idle_intervals: 0,
        };

        if results.is_empty() {
            return report;
        }

        let mut capacity_sum = 0.0_f64;

        for r in results {
            report.net_revenue += r.cost;

            if r.dispatch_mw < 0.0 {
                report.charging_cost += r.cost;
                report.energy_charged_mwh -= r.dispatch_mw;
                report.charging_intervals += 1;
            } else if r.dispatch_mw > 0.0 {
                report.dispatch_revenue += r.cost;
                report.energy_dispatched_mwh += r.dispatch_mw;
                report.dispatching_intervals += 1;
            } else {
                report.idle_intervals += 1;
            }

            capacity_sum += r.capacity_after;
            report.peak_capacity_mwh = report.peak_capacity_mwh.max(r.capacity_after);
        }

        report.mean_capacity_mwh = capacity_sum / results.len() as f64;
        report.equivalent_full_cycles = report.energy_dispatched_mwh / battery.capacity_mwh();
        report
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} KPI Report ---", self.battery_name)?;
        writeln!(f, "Net revenue:           {}", format_currency(self.net_revenue))?;
        writeln!(f, "Charging cost:         {}", format_currency(self.charging_cost))?;
        writeln!(f, "Dispatch revenue:      {}", format_currency(self.dispatch_revenue))?;
        writeln!(f, "Energy charged:        {:.3} MWh", self.energy_charged_mwh)?;
        writeln!(f, "Energy dispatched:     {:.3} MWh", self.energy_dispatched_mwh)?;
        writeln!(f, "Mean stored energy:    {:.3} MWh", self.mean_capacity_mwh)?;
        writeln!(f, "Peak stored energy:    {:.3} MWh", self.peak_capacity_mwh)?;
        writeln!(f, "Equivalent cycles:     {:.2}", self.equivalent_full_cycles)?;
        write!(
            f,
            "Intervals:             {} charging / {} dispatching / {} idle",
            self.charging_intervals, self.dispatching_intervals, self.idle_intervals
        )
    }
}
