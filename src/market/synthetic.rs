use std::f64::consts::PI;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::info;

use crate::config::MarketConfig;
use crate::sim::types::SimConfig;

use super::MarketInterval;

/// Share of price spikes that jump straight towards the market cap.
const EXTREME_SPIKE_SHARE: f64 = 0.1;
/// Renewable/demand ratio above which negative prices become possible.
const OVERSUPPLY_THRESHOLD: f64 = 0.8;
/// Ceiling on the per-interval negative-price probability.
const MAX_NEGATIVE_PRICE_CHANCE: f64 = 0.15;
/// Share of negative-price events that fall towards the market floor.
const EXTREME_NEGATIVE_SHARE: f64 = 0.05;

/// A synthetic spot market in the style of the NSW region of the NEM.
///
/// `SyntheticMarket` produces a price, demand and generation trace with
/// seasonal and daily demand cycles, gaussian price volatility, occasional
/// price spikes, and negative prices during renewable oversupply. The output
/// is fully determined by the seed.
#[derive(Debug, Clone)]
pub struct SyntheticMarket {
    /// Generator parameters.
    pub params: MarketConfig,

    /// First timestamp of the trace.
    start: NaiveDateTime,

    /// Length of one interval in minutes.
    interval_minutes: u32,

    /// Number of intervals to produce.
    total_intervals: usize,

    /// Random number generator for all stochastic components.
    rng: StdRng,
}

impl SyntheticMarket {
    /// Creates a generator starting at midnight of `start_date`.
    ///
    /// # Arguments
    ///
    /// * `params` - Price, demand and generation parameters
    /// * `config` - Simulation timing (interval length, days, seed)
    /// * `start_date` - First simulated day
    pub fn new(params: MarketConfig, config: &SimConfig, start_date: NaiveDate) -> Self {
        Self {
            params,
            start: start_date.and_time(chrono::NaiveTime::MIN),
            interval_minutes: config.interval_minutes,
            total_intervals: config.total_intervals(),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Generates the full interval trace in chronological order.
    pub fn generate(&mut self) -> Vec<MarketInterval> {
        let step = chrono::TimeDelta::minutes(i64::from(self.interval_minutes));
        let mut intervals = Vec::with_capacity(self.total_intervals);
        let mut timestamp = self.start;
        for _ in 0..self.total_intervals {
            intervals.push(self.interval_at(timestamp));
            timestamp += step;
        }

        info!(
            intervals = intervals.len(),
            start = %self.start,
            "generated synthetic market data"
        );
        intervals
    }

    fn interval_at(&mut self, timestamp: NaiveDateTime) -> MarketInterval {
        let p = &self.params;
        let hour = timestamp.hour();
        let seasonal = seasonal_multiplier(timestamp.month());
        let mut demand_mult = daily_demand_multiplier(hour);
        if timestamp.weekday().number_from_monday() >= 6 {
            demand_mult *= 0.8;
        }

        let mut spot_price = p.base_price * seasonal * demand_mult;
        spot_price *= 1.0 + gaussian_noise(&mut self.rng, p.volatility);

        if self.rng.random::<f64>() < p.spike_probability {
            if self.rng.random::<f64>() < EXTREME_SPIKE_SHARE {
                spot_price = self.rng.random_range(5_000.0..=15_000.0);
            } else {
                spot_price *= self.rng.random_range(3.0..=8.0);
            }
        }

        let demand = (p.base_demand_mw * demand_mult * seasonal
            + gaussian_noise(&mut self.rng, p.demand_noise_mw))
        .max(p.min_demand_mw);

        let solar = if (6..=18).contains(&hour) {
            let angle = (f64::from(hour) - 6.0) * PI / 12.0;
            p.max_solar_mw * angle.sin().powi(2) * self.rng.random_range(0.7..=1.0)
        } else {
            0.0
        };
        let wind = self.rng.random_range(p.wind_min_mw..=p.wind_max_mw);
        let renewable = solar + wind;
        let losses = demand * self.rng.random_range(0.05..=0.10);

        let oversupply = renewable / demand;
        if oversupply > OVERSUPPLY_THRESHOLD {
            let chance = ((oversupply - OVERSUPPLY_THRESHOLD) * 0.5).min(MAX_NEGATIVE_PRICE_CHANCE);
            if self.rng.random::<f64>() < chance {
                spot_price = if self.rng.random::<f64>() < EXTREME_NEGATIVE_SHARE {
                    self.rng.random_range(-16_000.0..=-1_000.0)
                } else {
                    self.rng.random_range(-200.0..=-5.0)
                };
            }
        }

        let spot_price = spot_price.clamp(p.price_floor, p.price_cap);

        MarketInterval {
            timestamp,
            spot_price: round_to(spot_price, 2),
            demand_mw: Some(round_to(demand, 1)),
            solar_generation_mw: Some(round_to(solar, 1)),
            wind_generation_mw: Some(round_to(wind, 1)),
            renewable_generation_mw: Some(round_to(renewable, 1)),
            renewable_percentage: Some(round_to(oversupply * 100.0, 1)),
            network_losses_mw: Some(round_to(losses, 1)),
        }
    }
}

/// Summer cooling and winter heating lift demand (southern hemisphere seasons).
fn seasonal_multiplier(month: u32) -> f64 {
    match month {
        12 | 1 | 2 => 1.4,
        6..=8 => 1.2,
        _ => 1.0,
    }
}

fn daily_demand_multiplier(hour: u32) -> f64 {
    match hour {
        6..=9 => 1.6,
        17..=20 => 1.8,
        22..=23 | 0..=5 => 0.6,
        _ => 1.0,
    }
}

/// Gaussian noise via the Box-Muller transform.
///
/// Returns a sample with mean 0 and the given standard deviation.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    z0 * std_dev
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}
