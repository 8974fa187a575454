//! Integration tests for the default daily schedule on a flat-price day.

mod common;

use approx::assert_relative_eq;
use bess_sim::config::ScenarioConfig;
use bess_sim::error::SimError;
use bess_sim::market::{MarketSummary, SyntheticMarket};
use bess_sim::sim::engine::Engine;
use bess_sim::sim::kpi::KpiReport;
use bess_sim::sim::policy::{StepSizing, TimeOfDayPolicy};
use bess_sim::sim::types::SimulationRecord;
use chrono::{NaiveDate, NaiveTime, TimeDelta, Timelike};

/// Build the reference engine used across integration tests.
fn build_engine(policy: TimeOfDayPolicy) -> Engine<TimeOfDayPolicy> {
    Engine::new(common::default_config(), common::reference_battery(), policy)
}

fn in_window(r: &SimulationRecord, start: (u32, u32), end: (u32, u32)) -> bool {
    let t = r.timestamp.time();
    let start = NaiveTime::from_hms_opt(start.0, start.1, 0).expect("valid time");
    let end = NaiveTime::from_hms_opt(end.0, end.1, 0).expect("valid time");
    t >= start && t <= end
}

fn window_cost(records: &[SimulationRecord], start: (u32, u32), end: (u32, u32)) -> f64 {
    records
        .iter()
        .filter(|r| in_window(r, start, end))
        .map(|r| r.cost)
        .sum()
}

fn capacity_at(records: &[SimulationRecord], hour: u32, minute: u32) -> f64 {
    records
        .iter()
        .find(|r| r.timestamp.hour() == hour && r.timestamp.minute() == minute)
        .map(|r| r.capacity_after)
        .expect("timestamp present")
}

#[test]
fn full_run_produces_one_record_per_interval() {
    let mut engine = build_engine(common::legacy_policy());
    let intervals = common::flat_day(50.0);
    let records = engine.run(&intervals).expect("chronological input");
    assert_eq!(records.len(), 288);
    for (m, r) in intervals.iter().zip(&records) {
        assert_eq!(m.timestamp, r.timestamp);
        assert_eq!(m.spot_price, r.spot_price);
    }
}

#[test]
fn legacy_divisor_reproduces_reference_day() {
    let mut engine = build_engine(common::legacy_policy());
    let records = engine.run(&common::flat_day(50.0)).expect("chronological input");

    // 1 MWh per step: full after ten charging intervals
    assert_eq!(capacity_at(&records, 11, 45), 10.0);
    assert_eq!(capacity_at(&records, 11, 40), 9.0);
    assert_eq!(capacity_at(&records, 14, 0), 10.0);
    assert_eq!(capacity_at(&records, 16, 55), 10.0);
    assert_eq!(capacity_at(&records, 17, 45), 0.0);
    assert_eq!(capacity_at(&records, 19, 0), 0.0);

    assert_eq!(window_cost(&records, (11, 0), (14, 0)), -500.0);
    assert_eq!(window_cost(&records, (17, 0), (19, 0)), 500.0);
    assert_eq!(engine.battery().current_capacity_mwh(), 0.0);
}

#[test]
fn interval_duration_reaches_full_in_six_steps() {
    let mut engine = build_engine(common::default_policy(StepSizing::IntervalDuration));
    let records = engine.run(&common::flat_day(50.0)).expect("chronological input");

    assert_relative_eq!(capacity_at(&records, 11, 20), 25.0 / 3.0, max_relative = 1e-12);
    assert_eq!(capacity_at(&records, 11, 25), 10.0);
    assert_eq!(capacity_at(&records, 14, 0), 10.0);
    assert_eq!(capacity_at(&records, 17, 25), 0.0);

    assert_relative_eq!(window_cost(&records, (11, 0), (14, 0)), -500.0, max_relative = 1e-9);
    assert_relative_eq!(window_cost(&records, (17, 0), (19, 0)), 500.0, max_relative = 1e-9);
}

#[test]
fn charge_cost_negative_and_dispatch_cost_positive() {
    let mut engine = build_engine(common::legacy_policy());
    let records = engine.run(&common::flat_day(50.0)).expect("chronological input");
    for r in &records {
        if in_window(r, (11, 0), (14, 0)) {
            assert!(r.dispatch_mw <= 0.0);
            assert!(r.cost <= 0.0);
        } else if in_window(r, (17, 0), (19, 0)) {
            assert!(r.dispatch_mw >= 0.0);
            assert!(r.cost >= 0.0);
        } else {
            assert_eq!(r.dispatch_mw, 0.0);
        }
    }
}

#[test]
fn capacity_stays_within_bounds_for_every_record() {
    let config = ScenarioConfig::baseline();
    let sim_config = config.simulation.sim_config();
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
    let intervals = SyntheticMarket::new(config.market.clone(), &sim_config, start).generate();

    let mut engine = build_engine(common::default_policy(StepSizing::IntervalDuration));
    let records = engine.run(&intervals).expect("chronological input");
    for r in &records {
        assert!(r.capacity_after >= 0.0);
        assert!(r.capacity_after <= 10.0);
        assert_eq!(r.cost, r.spot_price * r.dispatch_mw);
    }
}

#[test]
fn kpi_report_totals_match_records() {
    let mut engine = build_engine(common::legacy_policy());
    let records = engine.run(&common::flat_day(50.0)).expect("chronological input");
    let kpi = KpiReport::from_results(&records, engine.battery());

    assert_eq!(kpi.net_revenue, 0.0);
    assert_eq!(kpi.charging_cost, -500.0);
    assert_eq!(kpi.dispatch_revenue, 500.0);
    assert_eq!(kpi.energy_charged_mwh, 10.0);
    assert_eq!(kpi.energy_dispatched_mwh, 10.0);
    assert_eq!(kpi.charging_intervals, 10);
    assert_eq!(kpi.dispatching_intervals, 10);
    assert_eq!(kpi.idle_intervals, 268);
    assert_relative_eq!(kpi.equivalent_full_cycles, 1.0);
}

#[test]
fn empty_input_leaves_battery_untouched() {
    let mut engine = build_engine(common::legacy_policy());
    let records = engine.run(&[]).expect("empty input is valid");
    assert!(records.is_empty());
    assert_eq!(engine.battery().current_capacity_mwh(), 0.0);
}

#[test]
fn permuted_order_changes_trajectory() {
    let intervals = common::flat_day(50.0);
    let step = TimeDelta::minutes(5);

    let mut forward = build_engine(common::legacy_policy());
    let forward_net: f64 = intervals.iter().map(|m| forward.step(m, step).cost).sum();

    let mut reversed = build_engine(common::legacy_policy());
    let reversed_net: f64 = intervals.iter().rev().map(|m| reversed.step(m, step).cost).sum();

    // reversed: the dispatch window comes first, with nothing stored
    assert_eq!(forward_net, 0.0);
    assert_eq!(reversed_net, -500.0);
    assert_eq!(forward.battery().current_capacity_mwh(), 0.0);
    assert_eq!(reversed.battery().current_capacity_mwh(), 10.0);
}

#[test]
fn run_rejects_permuted_order() {
    let mut intervals = common::flat_day(50.0);
    intervals.swap(100, 200);

    let mut engine = build_engine(common::legacy_policy());
    match engine.run(&intervals) {
        Err(SimError::OutOfOrderInput { index, .. }) => assert_eq!(index, 101),
        other => panic!("expected out-of-order error, got {other:?}"),
    }
    assert_eq!(engine.battery().current_capacity_mwh(), 0.0);
}

#[test]
fn determinism_two_identical_runs_produce_identical_results() {
    let config = ScenarioConfig::baseline();
    let sim_config = config.simulation.sim_config();
    let start = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");

    let run = || {
        let intervals = SyntheticMarket::new(config.market.clone(), &sim_config, start).generate();
        let mut engine = build_engine(TimeOfDayPolicy::from_config(&config.schedule));
        engine.run(&intervals).expect("chronological input")
    };

    assert_eq!(run(), run());
}

#[test]
fn synthetic_market_summary_covers_all_intervals() {
    let config = ScenarioConfig::baseline();
    let mut sim_config = config.simulation.clone();
    sim_config.days = 3;
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
    let intervals =
        SyntheticMarket::new(config.market.clone(), &sim_config.sim_config(), start).generate();

    let summary = MarketSummary::from_intervals(&intervals).expect("non-empty data");
    assert_eq!(summary.intervals, 3 * 288);
    assert!(summary.price.min >= config.market.price_floor);
    assert!(summary.price.max <= config.market.price_cap);
    assert!(summary.demand.is_some());
}
