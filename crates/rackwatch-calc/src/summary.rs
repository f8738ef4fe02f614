//! ---
//! rw_section: "08-energy-models-optimization"
//! rw_subsection: "module"
//! rw_type: "source"
//! rw_scope: "code"
//! rw_description: "Headline dashboard metrics for a snapshot."
//! rw_version: "v0.1.0"
//! rw_owner: "tbd"
//! ---
use rackwatch_sim::{RackStatus, Snapshot};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub average_temperature_c: Option<f64>,
    pub total_power_w: f64,
    pub peak_workload_pct: Option<u8>,
    pub high_status_racks: usize,
}

pub fn summarize(snapshot: &Snapshot) -> DashboardSummary {
    let total_temperature: f64 = snapshot.iter().map(|r| r.temperature_c()).sum();
    let average_temperature_c =
        (!snapshot.is_empty()).then(|| total_temperature / snapshot.len() as f64);

    DashboardSummary {
        average_temperature_c,
        total_power_w: snapshot.iter().map(|r| r.power_w()).sum(),
        peak_workload_pct: snapshot.iter().map(|r| r.workload_pct()).max(),
        high_status_racks: snapshot
            .iter()
            .filter(|r| r.status() == RackStatus::High)
            .count(),
    }
}
