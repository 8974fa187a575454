use std::fmt;

use chrono::NaiveDateTime;

use super::MarketInterval;

/// Descriptive statistics of a market data set.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSummary {
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,
    pub intervals: usize,
    pub price: Stats,
    /// `None` when no interval carries demand data.
    pub demand: Option<Stats>,
    pub renewable_percentage: Option<Stats>,
}

/// Basic statistics over a series of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; zero for a single value.
    pub std_dev: f64,
}

impl Stats {
    /// Returns `None` for an empty series.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = if values.len() > 1 {
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            mean,
            median,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            std_dev: variance.sqrt(),
        })
    }
}

impl MarketSummary {
    /// Summarizes the given intervals; `None` if there are none.
    pub fn from_intervals(intervals: &[MarketInterval]) -> Option<Self> {
        let first = intervals.iter().map(|i| i.timestamp).min()?;
        let last = intervals.iter().map(|i| i.timestamp).max()?;

        let prices: Vec<f64> = intervals.iter().map(|i| i.spot_price).collect();
        let demand: Vec<f64> = intervals.iter().filter_map(|i| i.demand_mw).collect();
        let renewables: Vec<f64> = intervals
            .iter()
            .filter_map(|i| i.renewable_percentage)
            .collect();

        Some(Self {
            first,
            last,
            intervals: intervals.len(),
            price: Stats::from_values(&prices)?,
            demand: Stats::from_values(&demand),
            renewable_percentage: Stats::from_values(&renewables),
        })
    }
}

impl fmt::Display for MarketSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Market Data Summary ---")?;
        writeln!(f, "Data period:     {} to {}", self.first, self.last)?;
        writeln!(f, "Total intervals: {}", self.intervals)?;
        writeln!(f, "Spot price ($/MWh):")?;
        writeln!(f, "  Mean:    ${:.2}", self.price.mean)?;
        writeln!(f, "  Median:  ${:.2}", self.price.median)?;
        writeln!(f, "  Min:     ${:.2}", self.price.min)?;
        writeln!(f, "  Max:     ${:.2}", self.price.max)?;
        write!(f, "  Std dev: ${:.2}", self.price.std_dev)?;
        if let Some(demand) = &self.demand {
            writeln!(f)?;
            writeln!(f, "Demand (MW):")?;
            writeln!(f, "  Mean:    {:.1} MW", demand.mean)?;
            writeln!(f, "  Peak:    {:.1} MW", demand.max)?;
            write!(f, "  Minimum: {:.1} MW", demand.min)?;
        }
        if let Some(renewables) = &self.renewable_percentage {
            writeln!(f)?;
            writeln!(f, "Renewable generation:")?;
            writeln!(f, "  Average share: {:.1}%", renewables.mean)?;
            write!(f, "  Max share:     {:.1}%", renewables.max)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .and_then(|d| d.and_hms_opt(h, 0, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn stats_of_known_series() {
        let stats = Stats::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).expect("non-empty");
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.median, 4.5);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        // sample variance = 32 / 7
        assert!((stats.std_dev - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn stats_single_value() {
        let stats = Stats::from_values(&[-3.0]).expect("non-empty");
        assert_eq!(stats.median, -3.0);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn empty_intervals_have_no_summary() {
        assert!(MarketSummary::from_intervals(&[]).is_none());
    }

    #[test]
    fn price_only_data_has_no_demand_stats() {
        let intervals = vec![
            MarketInterval::new(at(1), 30.0),
            MarketInterval::new(at(0), 50.0),
        ];
        let summary = MarketSummary::from_intervals(&intervals).expect("non-empty");
        assert_eq!(summary.first, at(0));
        assert_eq!(summary.last, at(1));
        assert_eq!(summary.price.mean, 40.0);
        assert!(summary.demand.is_none());

        let text = summary.to_string();
        assert!(text.contains("Total intervals: 2"));
        assert!(!text.contains("Demand"));
    }

    #[test]
    fn demand_stats_when_present() {
        let mut a = MarketInterval::new(at(0), 30.0);
        a.demand_mw = Some(7000.0);
        let mut b = MarketInterval::new(at(1), 30.0);
        b.demand_mw = Some(9000.0);
        let summary = MarketSummary::from_intervals(&[a, b]).expect("non-empty");
        let demand = summary.demand.expect("demand present");
        assert_eq!(demand.mean, 8000.0);
        assert_eq!(demand.max, 9000.0);
    }
}
