//! ---
//! rw_section: "05-networking-external-interfaces"
//! rw_subsection: "binary"
//! rw_type: "source"
//! rw_scope: "code"
//! rw_description: "Refresh loop: generate, evaluate, render."
//! rw_version: "v0.1.0"
//! rw_owner: "tbd"
//! ---
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, ValueEnum};
use rackwatch_calc::{evaluate, Evaluation, EvaluationReport, SavingsParams};
use rackwatch_common::{validate_racks, AppConfig};
use rackwatch_sim::{Snapshot, TelemetryGenerator};
use tracing::info;

use crate::render;

/// Upper bound for `--refreshes`; JSON output holds every refresh until the array is written.
pub const MAX_REFRESHES: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Random seed for reproducible telemetry (overrides simulation.random_seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Rack to include; repeat for several. Defaults to the configured racks.
    #[arg(long = "rack", value_name = "NAME")]
    pub racks: Vec<String>,

    /// Number of independent refreshes to perform
    #[arg(
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=MAX_REFRESHES as i64)
    )]
    pub refreshes: u32,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Directory receiving a dashboard.json report per refresh
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Electricity price per kWh (overrides savings.price_per_kwh)
    #[arg(long)]
    pub price_per_kwh: Option<f64>,

    /// Assumed traditional draw per rack in watts (overrides savings.assumed_traditional_watts_per_rack)
    #[arg(long)]
    pub traditional_watts: Option<f64>,

    /// Site count for the fleet projection (overrides savings.fleet_sites)
    #[arg(long)]
    pub sites: Option<u32>,
}

/// Everything a single refresh produced.
#[derive(Debug)]
pub struct Refresh {
    pub index: u32,
    pub snapshot: Snapshot,
    pub evaluation: Evaluation,
}

/// Settings for a run after merging CLI flags over the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub racks: Vec<String>,
    pub seed: Option<u64>,
    pub params: SavingsParams,
    pub fleet_sites: u32,
}

impl RunSettings {
    pub fn merge(args: &SnapshotArgs, config: &AppConfig) -> Result<Self> {
        let racks = if args.racks.is_empty() {
            config.racks.clone()
        } else {
            args.racks.clone()
        };
        validate_racks(&racks).context("invalid rack selection")?;
        let mut params = config.savings.params();
        if let Some(price) = args.price_per_kwh {
            params.price_per_kwh = price;
        }
        if let Some(watts) = args.traditional_watts {
            params.assumed_traditional_watts_per_rack = watts;
        }
        params.validate()?;
        let fleet_sites = args.sites.unwrap_or(config.savings.fleet_sites);
        if fleet_sites == 0 {
            return Err(anyhow!("sites must be greater than zero"));
        }
        Ok(Self {
            racks,
            seed: args.seed.or(config.simulation.random_seed),
            params,
            fleet_sites,
        })
    }
}

pub fn run(args: &SnapshotArgs, config: &AppConfig, out: &mut impl Write) -> Result<()> {
    if args.refreshes == 0 || args.refreshes > MAX_REFRESHES {
        return Err(anyhow!(
            "refreshes must be between 1 and {MAX_REFRESHES}, got {}",
            args.refreshes
        ));
    }
    let settings = RunSettings::merge(args, config)?;
    let total = args.refreshes;

    match args.format {
        OutputFormat::Table => {
            for refresh in refreshes(&settings, total) {
                let refresh = refresh?;
                export_report(args.report_dir.as_deref(), &refresh, total, &settings)?;
                render::write_dashboard(out, &refresh, total, settings.fleet_sites)?;
            }
        }
        OutputFormat::Csv => {
            let mut csv = render::CsvOutput::new(&mut *out);
            for refresh in refreshes(&settings, total) {
                let refresh = refresh?;
                export_report(args.report_dir.as_deref(), &refresh, total, &settings)?;
                csv.write_refresh(&refresh)?;
            }
            csv.finish()?;
        }
        OutputFormat::Json => {
            let collected = collect_refreshes(&settings, total)?;
            for refresh in &collected {
                export_report(args.report_dir.as_deref(), refresh, total, &settings)?;
            }
            render::write_json(out, &collected, &settings)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Lazily performs `count` refreshes, each with a freshly generated snapshot.
pub fn refreshes(
    settings: &RunSettings,
    count: u32,
) -> impl Iterator<Item = Result<Refresh>> + '_ {
    let mut generator = match settings.seed {
        Some(seed) => TelemetryGenerator::seeded(seed),
        None => TelemetryGenerator::from_entropy(),
    };
    (1..=count).map(move |index| -> Result<Refresh> {
        let snapshot = generator.generate_snapshot(&settings.racks);
        let evaluation = evaluate(&snapshot, &settings.params)?;
        Ok(Refresh {
            index,
            snapshot,
            evaluation,
        })
    })
}

pub fn collect_refreshes(settings: &RunSettings, count: u32) -> Result<Vec<Refresh>> {
    refreshes(settings, count).collect()
}

fn export_report(
    dir: Option<&Path>,
    refresh: &Refresh,
    total: u32,
    settings: &RunSettings,
) -> Result<()> {
    let Some(dir) = dir else {
        return Ok(());
    };
    let target = if total == 1 {
        dir.to_path_buf()
    } else {
        dir.join(format!("refresh-{}", refresh.index))
    };
    let report = EvaluationReport::new(&refresh.snapshot, settings.params, &refresh.evaluation);
    let path = report
        .exporter()
        .export(&target)
        .with_context(|| format!("failed to export report to {}", target.display()))?;
    info!(refresh = refresh.index, path = %path.display(), "dashboard report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn base_args() -> SnapshotArgs {
        SnapshotArgs {
            seed: Some(42),
            racks: Vec::new(),
            refreshes: 1,
            format: OutputFormat::Table,
            report_dir: None,
            price_per_kwh: None,
            traditional_watts: None,
            sites: None,
        }
    }

    #[test]
    fn merge_prefers_cli_overrides() {
        let mut args = base_args();
        args.racks = vec!["Row 9".into()];
        args.price_per_kwh = Some(0.3);
        args.sites = Some(5);
        let settings = RunSettings::merge(&args, &AppConfig::default()).unwrap();
        assert_eq!(settings.racks, vec!["Row 9"]);
        assert_eq!(settings.params.price_per_kwh, 0.3);
        assert_eq!(settings.params.assumed_traditional_watts_per_rack, 1000.0);
        assert_eq!(settings.fleet_sites, 5);
        assert_eq!(settings.seed, Some(42));
    }

    #[test]
    fn merge_falls_back_to_config() {
        let mut args = base_args();
        args.seed = None;
        let mut config = AppConfig::default();
        config.simulation.random_seed = Some(9);
        let settings = RunSettings::merge(&args, &config).unwrap();
        assert_eq!(settings.racks, config.racks);
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.fleet_sites, 1000);
    }

    #[test]
    fn merge_rejects_negative_overrides() {
        let mut args = base_args();
        args.traditional_watts = Some(-10.0);
        assert!(RunSettings::merge(&args, &AppConfig::default()).is_err());

        let mut args = base_args();
        args.sites = Some(0);
        assert!(RunSettings::merge(&args, &AppConfig::default()).is_err());
    }

    #[test]
    fn merge_rejects_blank_or_duplicate_rack_overrides() {
        let mut args = base_args();
        args.racks = vec!["Rack A".into(), "Rack A".into()];
        let err = RunSettings::merge(&args, &AppConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("more than once"));

        let mut args = base_args();
        args.racks = vec!["Rack A".into(), "  ".into()];
        let err = RunSettings::merge(&args, &AppConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("must not be blank"));
    }

    #[test]
    fn seeded_refreshes_are_reproducible_and_independent() {
        let settings = RunSettings::merge(&base_args(), &AppConfig::default()).unwrap();
        let first = collect_refreshes(&settings, 3).unwrap();
        let second = collect_refreshes(&settings, 3).unwrap();
        assert_eq!(first.len(), 3);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.snapshot.readings(), b.snapshot.readings());
            assert_eq!(a.evaluation, b.evaluation);
        }
        assert_ne!(first[0].snapshot.readings(), first[1].snapshot.readings());
    }

    #[test]
    fn run_rejects_out_of_range_refreshes() {
        for count in [0, MAX_REFRESHES + 1] {
            let mut args = base_args();
            args.refreshes = count;
            let mut out = Vec::new();
            assert!(run(&args, &AppConfig::default(), &mut out).is_err());
            assert!(out.is_empty());
        }
    }

    #[test]
    fn refresh_flag_is_bounded_at_parse_time() {
        use clap::Parser;

        #[derive(Debug, Parser)]
        struct Harness {
            #[command(flatten)]
            args: SnapshotArgs,
        }

        assert!(Harness::try_parse_from(["rackwatchctl", "--refreshes", "0"]).is_err());
        let over = (MAX_REFRESHES + 1).to_string();
        assert!(Harness::try_parse_from(["rackwatchctl", "--refreshes", over.as_str()]).is_err());
        let max = MAX_REFRESHES.to_string();
        let parsed =
            Harness::try_parse_from(["rackwatchctl", "--refreshes", max.as_str()]).unwrap();
        assert_eq!(parsed.args.refreshes, MAX_REFRESHES);
    }

    #[test]
    fn streamed_csv_matches_collected_refreshes() {
        let mut args = base_args();
        args.refreshes = 3;
        args.format = OutputFormat::Csv;
        let mut streamed = Vec::new();
        run(&args, &AppConfig::default(), &mut streamed).unwrap();

        let settings = RunSettings::merge(&args, &AppConfig::default()).unwrap();
        let collected = collect_refreshes(&settings, 3).unwrap();
        let mut expected = Vec::new();
        let mut csv = render::CsvOutput::new(&mut expected);
        for refresh in &collected {
            csv.write_refresh(refresh).unwrap();
        }
        csv.finish().unwrap();
        assert_eq!(streamed, expected);
    }

    #[test]
    fn run_writes_one_report_per_refresh() {
        let dir = tempdir().unwrap();
        let mut args = base_args();
        args.refreshes = 2;
        args.report_dir = Some(dir.path().to_path_buf());
        let mut out = Vec::new();
        run(&args, &AppConfig::default(), &mut out).unwrap();
        assert!(dir.path().join("refresh-1/dashboard.json").is_file());
        assert!(dir.path().join("refresh-2/dashboard.json").is_file());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Refresh 1/2"));
        assert!(text.contains("Refresh 2/2"));
    }

    #[test]
    fn empty_rack_list_renders_zeroed_savings() {
        let mut config = AppConfig::default();
        config.racks.clear();
        let mut args = base_args();
        args.format = OutputFormat::Json;
        let mut out = Vec::new();
        run(&args, &config, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let estimate = &value[0]["evaluation"]["estimate"];
        assert_eq!(estimate["rack_count"], 0);
        assert_eq!(estimate["yearly_savings_cost"], 0.0);
    }
}
