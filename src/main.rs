//! Asset Remuneration CLI
//!
//! Projects a fixed-asset inventory under the adjusted and unadjusted
//! amortization policies and prints the QRR/JCP/JR cash flow.

use anyhow::{Context, Result};
use asset_remuneration::asset::load_assets;
use asset_remuneration::projection::{AmortizationMode, FlowTiming, ProjectionConfig, ProjectionEngine};
use asset_remuneration::report::{write_json, write_projection_dir, write_run_directory};
use asset_remuneration::{ProjectionResult, ScenarioRunner};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Adjusted,
    Unadjusted,
    Both,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TimingArg {
    SameYear,
    Lagged,
}

impl From<TimingArg> for FlowTiming {
    fn from(arg: TimingArg) -> Self {
        match arg {
            TimingArg::SameYear => FlowTiming::SameYear,
            TimingArg::Lagged => FlowTiming::Lagged,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "asset_remuneration", version, about = "Regulatory asset remuneration cash-flow model")]
struct Cli {
    /// Asset inventory CSV (ATIVO, VNR, VIDA ÚTIL [ANOS], VMU)
    input: PathBuf,

    /// JSON file with projection parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Discount rate (TMA) as a fraction, e.g. 0.10
    #[arg(long)]
    discount_rate: Option<f64>,

    /// Projection horizon in years
    #[arg(long)]
    horizon: Option<u32>,

    /// Placement of JR in the cash flow
    #[arg(long, value_enum)]
    flow_timing: Option<TimingArg>,

    /// Amortization policy to run
    #[arg(long, value_enum, default_value = "both")]
    mode: ModeArg,

    /// Directory for the CSV tables
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the full result as JSON instead of the summary table
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn projection_config(&self) -> Result<ProjectionConfig> {
        let mut config = match &self.config {
            Some(path) => ProjectionConfig::from_json_path(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            None => ProjectionConfig::default(),
        };
        if let Some(rate) = self.discount_rate {
            config.discount_rate = rate;
        }
        if let Some(horizon) = self.horizon {
            config.horizon_years = horizon;
        }
        if let Some(timing) = self.flow_timing {
            config.flow_timing = timing.into();
        }
        config.validate()?;
        Ok(config)
    }
}

fn print_result(result: &ProjectionResult) {
    println!("\n{} mode", result.mode.as_str().to_uppercase());
    println!("{:>5} {:>16} {:>16} {:>16} {:>16}", "Year", "VNR", "VMU", "QRR", "JCP");
    println!("{}", "-".repeat(73));
    for (snapshot, flow) in result.snapshots.iter().zip(&result.flows.rows) {
        println!(
            "{:>5} {:>16.2} {:>16.2} {:>16.2} {:>16.2}",
            snapshot.year,
            snapshot.total.replacement_value,
            snapshot.total.market_value_in_use,
            flow.qrr,
            flow.jcp,
        );
    }
    println!(
        "{:>5} {:>16} {:>16} {:>16.2} {:>16.2}",
        "TOTAL", "", "", result.flows.total.qrr, result.flows.total.jcp
    );

    println!("\n{:>7} {:>16} {:>16} {:>16}", "Period", "Flow", "PV", "Cumulative PV");
    for point in &result.cash_flow.points {
        println!(
            "{:>7} {:>16.2} {:>16.2} {:>16.2}",
            point.period, point.flow, point.present_value, point.cumulative_present_value
        );
    }
    println!("  JR total: {:.2}", result.flows.total.jr);
    println!("  NPV: {:.2}", result.npv());
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.projection_config()?;

    let raw = load_assets(&cli.input)
        .with_context(|| format!("Failed to load assets from {}", cli.input.display()))?;

    let single = match cli.mode {
        ModeArg::Adjusted => Some(AmortizationMode::Adjusted),
        ModeArg::Unadjusted => Some(AmortizationMode::Unadjusted),
        ModeArg::Both => None,
    };

    match single {
        Some(mode) => {
            let result = ProjectionEngine::new(config)?.project_raw(&raw, mode)?;
            if let Some(dir) = &cli.output_dir {
                write_projection_dir(&dir.join(mode.as_str()), &result)?;
            }
            if cli.json {
                write_json(std::io::stdout().lock(), &result)?;
            } else {
                print_result(&result);
            }
        }
        None => {
            let scenario = ScenarioRunner::new(config)?.run_both_raw(&raw)?;
            if let Some(dir) = &cli.output_dir {
                write_run_directory(dir, &scenario)?;
            }
            if cli.json {
                write_json(std::io::stdout().lock(), &scenario)?;
            } else {
                print_result(&scenario.adjusted);
                print_result(&scenario.unadjusted);
                println!("\nNPV spread (adjusted - unadjusted): {:.2}", scenario.npv_spread());
            }
        }
    }

    Ok(())
}
