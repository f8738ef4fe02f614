//! ---
//! rw_section: "08-energy-models-optimization"
//! rw_subsection: "module"
//! rw_type: "source"
//! rw_scope: "code"
//! rw_description: "Alert evaluation and savings estimation over rack snapshots."
//! rw_version: "v0.1.0"
//! rw_owner: "tbd"
//! ---
pub mod alerts;
pub mod errors;
pub mod reports;
pub mod savings;
pub mod summary;

use rackwatch_sim::Snapshot;
use serde::Serialize;
use tracing::info;

pub use alerts::{evaluate_alerts, Alert, AlertKind};
pub use errors::{CalcError, Result};
pub use reports::{EvaluationReport, ReportExporter};
pub use savings::{estimate_savings, SavingsEstimate, SavingsParams};
pub use summary::{summarize, DashboardSummary};

/// Everything derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub alerts: Vec<Alert>,
    pub estimate: SavingsEstimate,
}

impl Evaluation {
    pub fn alert_messages(&self) -> Vec<String> {
        self.alerts.iter().map(Alert::message).collect()
    }
}

/// Derives alerts and the savings estimate for a snapshot.
///
/// Pure and idempotent: the same snapshot and params always give the same result.
pub fn evaluate(snapshot: &Snapshot, params: &SavingsParams) -> Result<Evaluation> {
    let estimate = estimate_savings(snapshot, params)?;
    let alerts = evaluate_alerts(snapshot);
    info!(
        racks = snapshot.len(),
        alerts = alerts.len(),
        yearly_savings = estimate.yearly_savings_cost,
        "snapshot evaluated"
    );
    Ok(Evaluation { alerts, estimate })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rackwatch_sim::{RackReading, TelemetryGenerator, DEFAULT_RACK_NAMES};

    #[test]
    fn evaluate_combines_alerts_and_estimate() {
        let snapshot = Snapshot::new(vec![
            RackReading::new("Rack A", 36.0, 500.0, 95),
            RackReading::new("Rack B", 30.0, 600.0, 70),
            RackReading::new("Rack C", 25.0, 700.0, 91),
        ]);
        let evaluation = evaluate(&snapshot, &SavingsParams::default()).unwrap();
        assert_eq!(
            evaluation.alert_messages(),
            vec![
                "Rack A is overheating. Reinforcement AI recommends increasing cooling by 15%.",
                "Rack A nearing overload. Suggest triggering workload migration.",
                "Rack C nearing overload. Suggest triggering workload migration.",
            ]
        );
        assert!((evaluation.estimate.yearly_savings_cost - 1261.44).abs() < 1e-6);
    }

    #[test]
    fn evaluate_is_idempotent() {
        let snapshot = TelemetryGenerator::seeded(5).generate_snapshot(&DEFAULT_RACK_NAMES);
        let params = SavingsParams::default();
        let first = evaluate(&snapshot, &params).unwrap();
        let second = evaluate(&snapshot, &params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn alert_count_is_bounded_by_twice_the_racks() {
        let mut generator = TelemetryGenerator::seeded(11);
        let names: Vec<String> = (0..10).map(|i| format!("Rack {i}")).collect();
        for _ in 0..100 {
            let snapshot = generator.generate_snapshot(&names);
            let evaluation = evaluate(&snapshot, &SavingsParams::default()).unwrap();
            assert!(evaluation.alerts.len() <= 2 * snapshot.len());
        }
    }

    #[test]
    fn evaluate_fails_fast_on_invalid_params() {
        let params = SavingsParams {
            assumed_traditional_watts_per_rack: 1000.0,
            price_per_kwh: -0.5,
        };
        let err = evaluate(&Snapshot::empty(), &params).unwrap_err();
        assert!(err.to_string().contains("price_per_kwh"));
    }
}
