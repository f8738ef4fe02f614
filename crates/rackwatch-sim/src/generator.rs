//! ---
//! rw_section: "11-simulation"
//! rw_subsection: "module"
//! rw_type: "source"
//! rw_scope: "code"
//! rw_description: "Uniform random rack telemetry generator."
//! rw_version: "v0.1.0"
//! rw_owner: "tbd"
//! ---
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::frames::{RackReading, Snapshot};

/// Racks shown when no explicit list is configured.
pub const DEFAULT_RACK_NAMES: [&str; 3] = ["Rack A", "Rack B", "Rack C"];

const TEMPERATURE_RANGE_C: (f64, f64) = (22.0, 38.0);
const POWER_RANGE_W: (f64, f64) = (400.0, 900.0);
const WORKLOAD_RANGE_PCT: (u8, u8) = (60, 95);

/// Draws fresh snapshots from an injectable random source.
///
/// Temperature and power are sampled from half-open ranges, workload from an
/// inclusive integer range. Each field is drawn independently.
#[derive(Debug)]
pub struct TelemetryGenerator<R = StdRng> {
    rng: R,
    temperature: Uniform<f64>,
    power: Uniform<f64>,
    workload: Uniform<u8>,
}

impl TelemetryGenerator<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> TelemetryGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            temperature: Uniform::new(TEMPERATURE_RANGE_C.0, TEMPERATURE_RANGE_C.1),
            power: Uniform::new(POWER_RANGE_W.0, POWER_RANGE_W.1),
            workload: Uniform::new_inclusive(WORKLOAD_RANGE_PCT.0, WORKLOAD_RANGE_PCT.1),
        }
    }

    /// Produce one reading per rack name, in the order given.
    pub fn generate_snapshot<S: AsRef<str>>(&mut self, rack_names: &[S]) -> Snapshot {
        let readings: Vec<RackReading> = rack_names
            .iter()
            .map(|name| self.reading(name.as_ref()))
            .collect();
        debug!(racks = readings.len(), "generated telemetry snapshot");
        Snapshot::new(readings)
    }

    fn reading(&mut self, name: &str) -> RackReading {
        let temperature_c = self.temperature.sample(&mut self.rng);
        let power_w = self.power.sample(&mut self.rng);
        let workload_pct = self.workload.sample(&mut self.rng);
        RackReading::new(name, temperature_c, power_w, workload_pct)
    }
}
