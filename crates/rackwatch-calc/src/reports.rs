//! ---
//! rw_section: "08-energy-models-optimization"
//! rw_subsection: "module"
//! rw_type: "source"
//! rw_scope: "code"
//! rw_description: "JSON report export for evaluated snapshots."
//! rw_version: "v0.1.0"
//! rw_owner: "tbd"
//! ---
use std::{
    fs,
    path::{Path, PathBuf},
};

use rackwatch_sim::Snapshot;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{errors::Result, summary::DashboardSummary, Evaluation, SavingsParams};

pub const DASHBOARD_REPORT_FILE: &str = "dashboard.json";

/// A snapshot together with everything derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport<'a> {
    pub snapshot: &'a Snapshot,
    pub summary: DashboardSummary,
    pub params: SavingsParams,
    pub evaluation: &'a Evaluation,
    pub alert_messages: Vec<String>,
}

impl<'a> EvaluationReport<'a> {
    pub fn new(
        snapshot: &'a Snapshot,
        params: SavingsParams,
        evaluation: &'a Evaluation,
    ) -> Self {
        Self {
            snapshot,
            summary: crate::summarize(snapshot),
            params,
            evaluation,
            alert_messages: evaluation.alert_messages(),
        }
    }

    pub fn exporter(&self) -> ReportExporter<'_, 'a> {
        ReportExporter::new(self)
    }
}

#[derive(Debug)]
pub struct ReportExporter<'r, 'a> {
    report: &'r EvaluationReport<'a>,
}

impl<'r, 'a> ReportExporter<'r, 'a> {
    pub fn new(report: &'r EvaluationReport<'a>) -> Self {
        Self { report }
    }

    /// Writes `dashboard.json` into `output_dir`, creating the directory if needed.
    pub fn export(&self, output_dir: &Path) -> Result<PathBuf> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir)?;
        }

        let timestamp = self.report.snapshot.generated_at().to_rfc3339();
        let envelope = ReportEnvelope {
            timestamp: &timestamp,
            schema: dashboard_schema(),
            data: self.report,
        };

        let path = output_dir.join(DASHBOARD_REPORT_FILE);
        write_json(&path, &envelope)?;
        info!("Report exported to {}", path.display());
        Ok(path)
    }
}

#[derive(Debug, Serialize)]
struct ReportEnvelope<'a, T: Serialize> {
    timestamp: &'a str,
    schema: serde_json::Value,
    data: &'a T,
}

fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let serialized = serde_json::to_string_pretty(value)?;
    fs::write(path, serialized)?;
    Ok(())
}

fn dashboard_schema() -> serde_json::Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "EvaluationReport",
        "type": "object",
        "properties": {
            "snapshot": {
                "type": "object",
                "properties": {
                    "generated_at": {"type": "string", "format": "date-time"},
                    "readings": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": {"type": "string"},
                                "temperature_c": {"type": "number"},
                                "power_w": {"type": "number"},
                                "workload_pct": {"type": "integer"},
                                "status": {"enum": ["Normal", "High"]}
                            },
                            "required": ["name", "temperature_c", "power_w", "workload_pct", "status"]
                        }
                    }
                },
                "required": ["generated_at", "readings"]
            },
            "summary": {
                "type": "object",
                "properties": {
                    "average_temperature_c": {"type": ["number", "null"]},
                    "total_power_w": {"type": "number"},
                    "peak_workload_pct": {"type": ["integer", "null"]},
                    "high_status_racks": {"type": "integer"}
                }
            },
            "params": {
                "type": "object",
                "properties": {
                    "assumed_traditional_watts_per_rack": {"type": "number"},
                    "price_per_kwh": {"type": "number"}
                },
                "required": ["assumed_traditional_watts_per_rack", "price_per_kwh"]
            },
            "evaluation": {
                "type": "object",
                "properties": {
                    "alerts": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "rack": {"type": "string"},
                                "kind": {"enum": ["overheating", "overload"]}
                            },
                            "required": ["rack", "kind"]
                        }
                    },
                    "estimate": {
                        "type": "object",
                        "properties": {
                            "rack_count": {"type": "integer"},
                            "traditional_power_w": {"type": "number"},
                            "aggregate_power_w": {"type": "number"},
                            "energy_saved_kwh_per_day": {"type": "number"},
                            "daily_savings_cost": {"type": "number"},
                            "yearly_savings_cost": {"type": "number"}
                        }
                    }
                },
                "required": ["alerts", "estimate"]
            },
            "alert_messages": {"type": "array", "items": {"type": "string"}}
        },
        "required": ["snapshot", "summary", "params", "evaluation", "alert_messages"]
    })
}
