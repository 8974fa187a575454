use std::fmt;

use crate::config::BatteryConfig;
use crate::error::{Result, SimError};

/// A grid-scale battery energy storage system trading against the spot market.
///
/// `Battery` holds fixed capacity and rate limits and tracks how much energy is
/// currently stored. Both [`Battery::charge`] and [`Battery::dispatch`] saturate
/// silently at the capacity bounds instead of failing.
///
/// # Sign Convention (Market)
/// - Negative dispatch: energy absorbed from the market (charging, a cost)
/// - Positive dispatch: energy released into the market (discharging, revenue)
#[derive(Debug, Clone)]
pub struct Battery {
    /// Label used for output columns and reports.
    name: String,

    /// Maximum storable energy in megawatt-hours.
    capacity_mwh: f64,

    /// Nominal maximum charging power in megawatts.
    charge_rate_mw: f64,

    /// Nominal maximum discharging power in megawatts.
    dispatch_rate_mw: f64,

    /// Energy currently stored, always within `0.0..=capacity_mwh`.
    current_capacity_mwh: f64,
}

impl Battery {
    /// Creates an empty battery with the specified parameters.
    ///
    /// # Arguments
    ///
    /// * `name` - Label for output columns
    /// * `capacity_mwh` - Storable energy in MWh (must be > 0)
    /// * `charge_rate_mw` - Maximum charging power in MW (must be > 0)
    /// * `dispatch_rate_mw` - Maximum discharging power in MW (must be > 0)
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] if any numeric parameter is
    /// zero, negative, or not finite.
    pub fn new(
        name: impl Into<String>,
        capacity_mwh: f64,
        charge_rate_mw: f64,
        dispatch_rate_mw: f64,
    ) -> Result<Self> {
        ensure_positive("capacity", capacity_mwh)?;
        ensure_positive("charge_rate", charge_rate_mw)?;
        ensure_positive("dispatch_rate", dispatch_rate_mw)?;

        Ok(Self {
            name: name.into(),
            capacity_mwh,
            charge_rate_mw,
            dispatch_rate_mw,
            current_capacity_mwh: 0.0,
        })
    }

    /// Builds a battery from its scenario configuration section.
    ///
    /// # Errors
    ///
    /// Same as [`Battery::new`].
    pub fn from_config(config: &BatteryConfig) -> Result<Self> {
        Self::new(
            config.name.clone(),
            config.capacity_mwh,
            config.charge_rate_mw,
            config.dispatch_rate_mw,
        )
    }

    /// Stores up to `amount_mwh` of energy and returns how much was accepted.
    ///
    /// The accepted amount is `min(amount_mwh, capacity - current_capacity)`.
    /// Negative requests are treated as zero.
    pub fn charge(&mut self, amount_mwh: f64) -> f64 {
        let headroom = self.capacity_mwh - self.current_capacity_mwh;
        let delivered = amount_mwh.max(0.0).min(headroom);

        // Snap to the bound so repeated top-ups cannot drift past it.
        self.current_capacity_mwh = if delivered >= headroom {
            self.capacity_mwh
        } else {
            (self.current_capacity_mwh + delivered).min(self.capacity_mwh)
        };

        delivered
    }

    /// Releases up to `amount_mwh` of stored energy and returns how much was released.
    ///
    /// The released amount is `min(amount_mwh, current_capacity)`.
    /// Negative requests are treated as zero.
    pub fn dispatch(&mut self, amount_mwh: f64) -> f64 {
        let available = self.current_capacity_mwh;
        let delivered = amount_mwh.max(0.0).min(available);

        self.current_capacity_mwh = if delivered >= available {
            0.0
        } else {
            available - delivered
        };

        delivered
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity_mwh(&self) -> f64 {
        self.capacity_mwh
    }

    pub fn charge_rate_mw(&self) -> f64 {
        self.charge_rate_mw
    }

    pub fn dispatch_rate_mw(&self) -> f64 {
        self.dispatch_rate_mw
    }

    /// Energy currently stored (MWh).
    pub fn current_capacity_mwh(&self) -> f64 {
        self.current_capacity_mwh
    }

    /// Stored energy as a fraction of capacity (0.0 to 1.0).
    pub fn state_of_charge(&self) -> f64 {
        self.current_capacity_mwh / self.capacity_mwh
    }

    pub fn is_full(&self) -> bool {
        self.current_capacity_mwh >= self.capacity_mwh
    }

    pub fn is_empty(&self) -> bool {
        self.current_capacity_mwh <= 0.0
    }
}

impl fmt::Display for Battery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "Capacity:       {:.2} MWh", self.capacity_mwh)?;
        writeln!(f, "Charge rate:    {:.2} MW", self.charge_rate_mw)?;
        writeln!(f, "Dispatch rate:  {:.2} MW", self.dispatch_rate_mw)?;
        write!(f, "Current charge: {:.2} MWh", self.current_capacity_mwh)
    }
}

fn ensure_positive(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { parameter, value })
    }
}
