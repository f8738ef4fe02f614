//! ---
//! rw_section: "11-simulation"
//! rw_subsection: "01-bootstrap"
//! rw_type: "source"
//! rw_scope: "code"
//! rw_description: "Telemetry generator module exports and shared types."
//! rw_version: "v0.1.0"
//! rw_owner: "tbd"
//! ---
//! Synthetic rack telemetry for Rackwatch.
//!
//! Every refresh draws a brand-new [`Snapshot`] from a [`TelemetryGenerator`];
//! nothing is carried over between snapshots apart from the random source.

pub mod frames;
pub mod generator;

pub use frames::{
    RackReading, RackStatus, Snapshot, OVERHEAT_THRESHOLD_C, OVERLOAD_THRESHOLD_PCT,
};
pub use generator::{TelemetryGenerator, DEFAULT_RACK_NAMES};
