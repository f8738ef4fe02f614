//! ---
//! rw_section: "05-networking-external-interfaces"
//! rw_subsection: "binary"
//! rw_type: "source"
//! rw_scope: "code"
//! rw_description: "Table, JSON and CSV rendering of refresh results."
//! rw_version: "v0.1.0"
//! rw_owner: "tbd"
//! ---
use std::io::Write;

use anyhow::Result;
use rackwatch_calc::{summarize, EvaluationReport};
use rackwatch_sim::{RackReading, RackStatus};
use serde::Serialize;

use crate::snapshot::{Refresh, RunSettings};

const RULE: &str = "-------------------------------------------------------------------------------";

/// Temperature span covered by the bar column, matching the generator's range.
const BAR_MIN_C: f64 = 22.0;
const BAR_MAX_C: f64 = 38.0;
const BAR_WIDTH: usize = 16;

/// Horizontal temperature bar; `#` marks a rack in `High` status, `=` a normal one.
pub fn temperature_bar(reading: &RackReading) -> String {
    let fraction =
        ((reading.temperature_c() - BAR_MIN_C) / (BAR_MAX_C - BAR_MIN_C)).clamp(0.0, 1.0);
    let filled = ((fraction * BAR_WIDTH as f64).round() as usize).max(1);
    let fill = match reading.status() {
        RackStatus::High => '#',
        RackStatus::Normal => '=',
    };
    let mut bar = String::with_capacity(BAR_WIDTH);
    bar.extend(std::iter::repeat(fill).take(filled));
    bar.extend(std::iter::repeat('.').take(BAR_WIDTH - filled));
    bar
}

pub fn write_dashboard(
    out: &mut impl Write,
    refresh: &Refresh,
    total: u32,
    fleet_sites: u32,
) -> Result<()> {
    let snapshot = &refresh.snapshot;
    let summary = summarize(snapshot);
    let estimate = &refresh.evaluation.estimate;

    writeln!(
        out,
        "=== Refresh {}/{} @ {} ===",
        refresh.index,
        total,
        snapshot.generated_at().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(
        out,
        "Avg Temp: {}  |  Total Power: {:.0} W  |  Peak Workload: {}",
        summary
            .average_temperature_c
            .map(|t| format!("{t:.1} °C"))
            .unwrap_or_else(|| "n/a".into()),
        summary.total_power_w,
        summary
            .peak_workload_pct
            .map(|w| format!("{w} %"))
            .unwrap_or_else(|| "n/a".into()),
    )?;
    writeln!(out, "{RULE}")?;
    writeln!(
        out,
        "{:<16} {:>10} {:>10} {:>13}  {:<8}  {}",
        "Rack", "Temp (°C)", "Power (W)", "Workload (%)", "Status", "Temperature"
    )?;
    for reading in snapshot {
        let status = match reading.status() {
            RackStatus::High => "High (!)",
            RackStatus::Normal => "Normal",
        };
        writeln!(
            out,
            "{:<16} {:>10.1} {:>10.0} {:>13}  {:<8}  {}",
            reading.name(),
            reading.temperature_c(),
            reading.power_w(),
            reading.workload_pct(),
            status,
            temperature_bar(reading)
        )?;
    }
    writeln!(out, "{RULE}")?;

    writeln!(out, "Alerts & suggestions:")?;
    if refresh.evaluation.alerts.is_empty() {
        writeln!(out, "  none")?;
    }
    for message in refresh.evaluation.alert_messages() {
        writeln!(out, "  ! {message}")?;
    }

    writeln!(out, "Energy savings estimation (AI vs traditional):")?;
    writeln!(
        out,
        "  Traditional baseline: {:.0} W  |  Actual draw: {:.0} W",
        estimate.traditional_power_w, estimate.aggregate_power_w
    )?;
    writeln!(
        out,
        "  Energy saved: {:.2} kWh/day  |  {:.0} kWh/year",
        estimate.energy_saved_kwh_per_day,
        estimate.energy_saved_kwh_per_year()
    )?;
    writeln!(
        out,
        "  Money saved: ${:.2}/day  |  ${:.2}/year",
        estimate.daily_savings_cost, estimate.yearly_savings_cost
    )?;
    writeln!(
        out,
        "  Scaled to {} sites: ${:.2}/year",
        fleet_sites,
        estimate.fleet_projection(fleet_sites)
    )?;
    writeln!(out)?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct RefreshDocument<'a> {
    refresh: u32,
    #[serde(flatten)]
    report: EvaluationReport<'a>,
    energy_saved_kwh_per_year: f64,
    fleet_sites: u32,
    fleet_yearly_savings_cost: f64,
}

pub fn write_json(out: &mut impl Write, refreshes: &[Refresh], settings: &RunSettings) -> Result<()> {
    let documents: Vec<RefreshDocument<'_>> = refreshes
        .iter()
        .map(|refresh| RefreshDocument {
            refresh: refresh.index,
            report: EvaluationReport::new(&refresh.snapshot, settings.params, &refresh.evaluation),
            energy_saved_kwh_per_year: refresh.evaluation.estimate.energy_saved_kwh_per_year(),
            fleet_sites: settings.fleet_sites,
            fleet_yearly_savings_cost: refresh
                .evaluation
                .estimate
                .fleet_projection(settings.fleet_sites),
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &documents)?;
    writeln!(out)?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    refresh: u32,
    rack: &'a str,
    temperature_c: String,
    power_w: String,
    workload_pct: u8,
    status: RackStatus,
}

/// CSV sink written one refresh at a time; the header precedes the first row.
pub struct CsvOutput<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvOutput<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(out),
        }
    }

    pub fn write_refresh(&mut self, refresh: &Refresh) -> Result<()> {
        for reading in &refresh.snapshot {
            self.writer.serialize(CsvRow {
                refresh: refresh.index,
                rack: reading.name(),
                temperature_c: format!("{:.1}", reading.temperature_c()),
                power_w: format!("{:.0}", reading.power_w()),
                workload_pct: reading.workload_pct(),
                status: reading.status(),
            })?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rackwatch_calc::{evaluate, SavingsParams};
    use rackwatch_sim::{RackReading, Snapshot};

    fn refresh() -> Refresh {
        let snapshot = Snapshot::new(vec![
            RackReading::new("Rack A", 36.04, 500.4, 95),
            RackReading::new("Rack B", 30.0, 600.0, 70),
            RackReading::new("Rack C", 25.0, 699.6, 65),
        ]);
        let evaluation = evaluate(&snapshot, &SavingsParams::default()).unwrap();
        Refresh {
            index: 1,
            snapshot,
            evaluation,
        }
    }

    fn settings() -> RunSettings {
        RunSettings {
            racks: vec!["Rack A".into(), "Rack B".into(), "Rack C".into()],
            seed: None,
            params: SavingsParams::default(),
            fleet_sites: 1000,
        }
    }

    #[test]
    fn dashboard_lists_racks_alerts_and_savings() {
        let mut out = Vec::new();
        write_dashboard(&mut out, &refresh(), 1, 1000).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Refresh 1/1"));
        assert!(text.contains("Total Power: 1800 W"));
        assert!(text.contains("Peak Workload: 95 %"));
        assert!(text.contains("36.0"));
        assert!(text.contains("High (!)"));
        assert!(text.contains("Temperature"));
        assert!(text.contains(&temperature_bar(&RackReading::new("Rack A", 36.04, 500.4, 95))));
        assert!(text.contains("! Rack A is overheating."));
        assert!(text.contains("! Rack A nearing overload."));
        assert!(text.contains("$1261.44/year"));
        assert!(text.contains("Scaled to 1000 sites: $1261440.00/year"));
    }

    #[test]
    fn json_carries_fleet_projection() {
        let mut out = Vec::new();
        write_json(&mut out, &[refresh()], &settings()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["refresh"], 1);
        assert_eq!(value[0]["fleet_sites"], 1000);
        assert_eq!(value[0]["snapshot"]["readings"].as_array().unwrap().len(), 3);
        assert_eq!(value[0]["alert_messages"].as_array().unwrap().len(), 2);
        let projected = value[0]["fleet_yearly_savings_cost"].as_f64().unwrap();
        assert!((projected - 1_261_440.0).abs() < 1e-3);
    }

    #[test]
    fn csv_rounds_like_the_dashboard() {
        let mut out = Vec::new();
        let mut csv = CsvOutput::new(&mut out);
        csv.write_refresh(&refresh()).unwrap();
        csv.finish().unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("refresh,rack,temperature_c,power_w,workload_pct,status")
        );
        assert_eq!(lines.next(), Some("1,Rack A,36.0,500,95,High"));
        assert_eq!(lines.next(), Some("1,Rack B,30.0,600,70,Normal"));
        assert_eq!(lines.next(), Some("1,Rack C,25.0,700,65,Normal"));
    }

    #[test]
    fn temperature_bar_scales_and_marks_status() {
        let cool = temperature_bar(&RackReading::new("Rack B", 22.0, 500.0, 70));
        assert_eq!(cool, "=...............");

        let warm = temperature_bar(&RackReading::new("Rack B", 30.0, 500.0, 70));
        assert_eq!(warm, "========........");

        let hot = temperature_bar(&RackReading::new("Rack A", 38.0, 500.0, 70));
        assert_eq!(hot, "################");

        // Overload alone flags the rack even at a moderate temperature.
        let loaded = temperature_bar(&RackReading::new("Rack C", 30.0, 500.0, 95));
        assert_eq!(loaded, "########........");
    }
}
