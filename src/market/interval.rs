use chrono::NaiveDateTime;

/// One settlement interval of the spot market.
///
/// Only `timestamp` and `spot_price` drive the simulation. The remaining
/// fields describe grid conditions and are carried through to reports and
/// exports untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketInterval {
    /// Start of the interval (naive local time).
    pub timestamp: NaiveDateTime,
    /// Spot price in currency per MWh, may be negative.
    pub spot_price: f64,
    /// Regional demand (MW).
    pub demand_mw: Option<f64>,
    /// Solar generation (MW).
    pub solar_generation_mw: Option<f64>,
    /// Wind generation (MW).
    pub wind_generation_mw: Option<f64>,
    /// Total renewable generation (MW).
    pub renewable_generation_mw: Option<f64>,
    /// Renewable generation as a percentage of demand.
    pub renewable_percentage: Option<f64>,
    /// Network losses (MW).
    pub network_losses_mw: Option<f64>,
}

impl MarketInterval {
    /// Creates an interval carrying only a timestamp and a price.
    pub fn new(timestamp: NaiveDateTime, spot_price: f64) -> Self {
        Self {
            timestamp,
            spot_price,
            demand_mw: None,
            solar_generation_mw: None,
            wind_generation_mw: None,
            renewable_generation_mw: None,
            renewable_percentage: None,
            network_losses_mw: None,
        }
    }
}
