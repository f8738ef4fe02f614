//! ---
//! rw_section: "08-energy-models-optimization"
//! rw_subsection: "module"
//! rw_type: "source"
//! rw_scope: "code"
//! rw_description: "Per-rack threshold alerts with remediation hints."
//! rw_version: "v0.1.0"
//! rw_owner: "tbd"
//! ---
use std::fmt;

use rackwatch_sim::Snapshot;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertKind {
    /// Temperature above the overheat threshold.
    Overheating,
    /// Workload above the overload threshold.
    Overload,
}

/// A single threshold breach for one rack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub rack: String,
    pub kind: AlertKind,
}

impl Alert {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AlertKind::Overheating => write!(
                f,
                "{} is overheating. Reinforcement AI recommends increasing cooling by 15%.",
                self.rack
            ),
            AlertKind::Overload => write!(
                f,
                "{} nearing overload. Suggest triggering workload migration.",
                self.rack
            ),
        }
    }
}

/// Flat alert list in rack order; a rack's temperature alert precedes its workload alert.
pub fn evaluate_alerts(snapshot: &Snapshot) -> Vec<Alert> {
    let mut alerts = Vec::new();
    for reading in snapshot {
        if reading.is_overheating() {
            alerts.push(Alert {
                rack: reading.name().to_owned(),
                kind: AlertKind::Overheating,
            });
        }
        if reading.is_overloaded() {
            alerts.push(Alert {
                rack: reading.name().to_owned(),
                kind: AlertKind::Overload,
            });
        }
    }
    alerts
}
