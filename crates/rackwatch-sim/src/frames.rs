//! ---
//! rw_section: "11-simulation"
//! rw_subsection: "module"
//! rw_type: "source"
//! rw_scope: "code"
//! rw_description: "Rack readings and snapshots produced per refresh."
//! rw_version: "v0.1.0"
//! rw_owner: "tbd"
//! ---
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Rack temperature above which a reading is considered hot.
pub const OVERHEAT_THRESHOLD_C: f64 = 35.0;
/// Workload above which a reading is considered overloaded.
pub const OVERLOAD_THRESHOLD_PCT: u8 = 90;

/// Derived health classification of a single rack reading.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, strum::Display, strum::AsRefStr,
)]
pub enum RackStatus {
    Normal,
    High,
}

/// One synthetic measurement of a rack. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct RackReading {
    name: String,
    temperature_c: f64,
    power_w: f64,
    workload_pct: u8,
}

impl RackReading {
    pub fn new(name: impl Into<String>, temperature_c: f64, power_w: f64, workload_pct: u8) -> Self {
        Self {
            name: name.into(),
            temperature_c,
            power_w,
            workload_pct,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn power_w(&self) -> f64 {
        self.power_w
    }

    pub fn workload_pct(&self) -> u8 {
        self.workload_pct
    }

    pub fn is_overheating(&self) -> bool {
        self.temperature_c > OVERHEAT_THRESHOLD_C
    }

    pub fn is_overloaded(&self) -> bool {
        self.workload_pct > OVERLOAD_THRESHOLD_PCT
    }

    /// Always recomputed from the measured fields, never stored.
    pub fn status(&self) -> RackStatus {
        if self.is_overheating() || self.is_overloaded() {
            RackStatus::High
        } else {
            RackStatus::Normal
        }
    }
}

impl Serialize for RackReading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RackReading", 5)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("temperature_c", &self.temperature_c)?;
        state.serialize_field("power_w", &self.power_w)?;
        state.serialize_field("workload_pct", &self.workload_pct)?;
        state.serialize_field("status", &self.status())?;
        state.end()
    }
}

/// Ordered set of readings, one per configured rack, produced by a single refresh.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Snapshot {
    generated_at: DateTime<Utc>,
    readings: Vec<RackReading>,
}

impl Snapshot {
    pub fn new(readings: Vec<RackReading>) -> Self {
        Self {
            generated_at: Utc::now(),
            readings,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn readings(&self) -> &[RackReading] {
        &self.readings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RackReading> {
        self.readings.iter()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a RackReading;
    type IntoIter = std::slice::Iter<'a, RackReading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}
