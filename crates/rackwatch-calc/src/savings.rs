//! ---
//! rw_section: "08-energy-models-optimization"
//! rw_subsection: "module"
//! rw_type: "source"
//! rw_scope: "code"
//! rw_description: "Energy and cost comparison against a fixed per-rack baseline."
//! rw_version: "v0.1.0"
//! rw_owner: "tbd"
//! ---
use rackwatch_sim::Snapshot;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, Result};

pub const DEFAULT_TRADITIONAL_WATTS_PER_RACK: f64 = 1000.0;
pub const DEFAULT_PRICE_PER_KWH: f64 = 0.12;

const HOURS_PER_DAY: f64 = 24.0;
const DAYS_PER_YEAR: f64 = 365.0;
const WATTS_PER_KILOWATT: f64 = 1000.0;

/// Business assumptions behind the savings comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsParams {
    /// Power a conventionally managed rack is assumed to draw.
    pub assumed_traditional_watts_per_rack: f64,
    /// Electricity price in currency units per kWh.
    pub price_per_kwh: f64,
}

impl Default for SavingsParams {
    fn default() -> Self {
        Self {
            assumed_traditional_watts_per_rack: DEFAULT_TRADITIONAL_WATTS_PER_RACK,
            price_per_kwh: DEFAULT_PRICE_PER_KWH,
        }
    }
}

impl SavingsParams {
    pub fn validate(&self) -> Result<()> {
        check_non_negative(
            "assumed_traditional_watts_per_rack",
            self.assumed_traditional_watts_per_rack,
        )?;
        check_non_negative("price_per_kwh", self.price_per_kwh)?;
        Ok(())
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CalcError::InvalidConfiguration { field, value })
    }
}

/// Savings of the measured snapshot relative to the traditional baseline.
///
/// Negative figures mean the snapshot drew more than the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SavingsEstimate {
    pub rack_count: usize,
    pub traditional_power_w: f64,
    pub aggregate_power_w: f64,
    pub energy_saved_kwh_per_day: f64,
    pub daily_savings_cost: f64,
    pub yearly_savings_cost: f64,
}

impl SavingsEstimate {
    pub fn energy_saved_kwh_per_year(&self) -> f64 {
        self.energy_saved_kwh_per_day * DAYS_PER_YEAR
    }

    /// Yearly savings if every one of `sites` installations behaved like this one.
    pub fn fleet_projection(&self, sites: u32) -> f64 {
        self.yearly_savings_cost * f64::from(sites)
    }
}

pub fn estimate_savings(snapshot: &Snapshot, params: &SavingsParams) -> Result<SavingsEstimate> {
    params.validate()?;

    let rack_count = snapshot.len();
    let aggregate_power_w: f64 = snapshot.iter().map(|reading| reading.power_w()).sum();
    let traditional_power_w = params.assumed_traditional_watts_per_rack * rack_count as f64;
    let energy_saved_kwh_per_day =
        (traditional_power_w - aggregate_power_w) * HOURS_PER_DAY / WATTS_PER_KILOWATT;
    let daily_savings_cost = energy_saved_kwh_per_day * params.price_per_kwh;
    let yearly_savings_cost = daily_savings_cost * DAYS_PER_YEAR;

    debug!(
        rack_count,
        aggregate_power_w, traditional_power_w, energy_saved_kwh_per_day, "estimated savings"
    );

    Ok(SavingsEstimate {
        rack_count,
        traditional_power_w,
        aggregate_power_w,
        energy_saved_kwh_per_day,
        daily_savings_cost,
        yearly_savings_cost,
    })
}
