//! Lease Simulator CLI
//!
//! Runs a single simulation or a sensitivity sweep from a JSON parameter file
//! (or the built-in defaults) and prints the results.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use lease_simulator::params::load_params;
use lease_simulator::report::{write_rows_csv, write_sweep_csv};
use lease_simulator::{
    ScenarioRunner, SensitivityReport, SimulationEngine, SimulationParams, SweepAxis, SweepMetric,
};

/// Amounts are reported in units of ten thousand
const REPORT_UNIT: f64 = 10_000.0;

/// Device-leasing cash-flow simulator
#[derive(Parser)]
#[command(name = "lease-sim", version, about = "Device-leasing cash-flow simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate one configuration and print the monthly table
    Run(RunArgs),
    /// Re-run the simulation across one parameter and report its effect
    Sweep(SweepArgs),
}

#[derive(Args)]
struct CommonArgs {
    /// JSON parameter file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible order generation
    #[arg(long)]
    seed: Option<u64>,

    /// Write the table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Print metrics as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SweepArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Parameter to sweep
    #[arg(long, value_enum)]
    axis: AxisArg,

    /// Comma-separated values (the axis's standard grid when omitted)
    #[arg(long, value_delimiter = ',')]
    values: Vec<f64>,

    /// Metric used for interpolation and slope
    #[arg(long, value_enum, default_value = "net-profit")]
    metric: MetricArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AxisArg {
    BadDebt,
    Prepayment,
    ProductMix,
    FirstPaymentUplift,
}

impl From<AxisArg> for SweepAxis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::BadDebt => SweepAxis::BadDebtRate,
            AxisArg::Prepayment => SweepAxis::PrepaymentRate,
            AxisArg::ProductMix => SweepAxis::Product1Ratio,
            AxisArg::FirstPaymentUplift => SweepAxis::FirstPaymentUplift,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MetricArg {
    NetProfit,
    PeakExposure,
    Breakeven,
}

impl From<MetricArg> for SweepMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::NetProfit => SweepMetric::NetProfit,
            MetricArg::PeakExposure => SweepMetric::PeakExposure,
            MetricArg::Breakeven => SweepMetric::BreakevenMonth,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
        Command::Sweep(args) => sweep(args),
    }
}

fn load(common: &CommonArgs) -> Result<SimulationParams> {
    match &common.config {
        Some(path) => load_params(path)
            .with_context(|| format!("failed to load parameters from {}", path.display())),
        None => Ok(SimulationParams::default()),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let params = load(&args.common)?;
    let engine = SimulationEngine::new(params).context("invalid simulation parameters")?;

    let mut rng = match args.common.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let result = engine.simulate(&mut rng);
    let metrics = result.metrics();

    if let Some(path) = &args.common.csv {
        write_rows_csv(path, &result.rows())
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    println!("{:>5} {:>7} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Month", "Orders", "Investment", "CumInvest", "Repayment", "NetCF", "CumNetCF");
    println!("{}", "-".repeat(90));
    for row in result.rows() {
        println!("{:>5} {:>7} {:>14.1} {:>14.1} {:>14.1} {:>14.1} {:>14.1}",
            row.month,
            row.orders,
            row.investment,
            row.cumulative_investment,
            row.repayment,
            row.net_cashflow,
            row.cumulative_cashflow,
        );
    }

    println!("\nSummary (amounts in units of {}):", REPORT_UNIT);
    println!("  Investment months:    {}", engine.params().months);
    println!("  Total orders:         {}", metrics.total_orders);
    println!("  Peak exposure:        {:.2}", metrics.peak_exposure / REPORT_UNIT);
    println!("  Total investment:     {:.2}", metrics.total_investment / REPORT_UNIT);
    println!("  Net profit:           {:.2}", metrics.net_profit / REPORT_UNIT);
    println!("  Return on investment: {}", percent(metrics.return_on_investment));
    println!("  Return on exposure:   {}", percent(metrics.return_on_peak_exposure));
    println!("  Annualized IRR:       {}", percent(metrics.annualized_irr));
    match metrics.breakeven_month {
        Some(month) => println!("  Breakeven:            month {}", month),
        None => println!("  Breakeven:            not reached"),
    }

    Ok(())
}

fn sweep(args: SweepArgs) -> Result<()> {
    let params = load(&args.common)?;
    let axis = SweepAxis::from(args.axis);
    let metric = SweepMetric::from(args.metric);
    let values = if args.values.is_empty() {
        axis.default_grid()
    } else {
        args.values.clone()
    };

    let mut runner = ScenarioRunner::new(params).context("invalid simulation parameters")?;
    if let Some(seed) = args.common.seed {
        runner = runner.with_seed(seed);
    }
    let report = runner
        .sweep(axis, &values)
        .with_context(|| format!("sweep over {} failed", axis.name()))?;

    if let Some(path) = &args.common.csv {
        write_sweep_csv(path, &report)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    print_sweep(&report, metric);
    Ok(())
}

fn print_sweep(report: &SensitivityReport, metric: SweepMetric) {
    println!("Sensitivity of {} (amounts in units of {})", report.axis.name(), REPORT_UNIT);
    println!("{:>10} {:>12} {:>14} {:>10}", "Value", "NetProfit", "PeakExposure", "Breakeven");
    println!("{}", "-".repeat(50));
    for point in &report.points {
        let breakeven = point
            .metrics
            .breakeven_month
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:>10.4} {:>12.2} {:>14.2} {:>10}",
            point.value,
            point.metrics.net_profit / REPORT_UNIT,
            point.metrics.peak_exposure / REPORT_UNIT,
            breakeven,
        );
    }

    let scale = match metric {
        SweepMetric::BreakevenMonth => 1.0,
        _ => REPORT_UNIT,
    };
    if let Some(current) = report.at_current(metric) {
        println!("\nAt current {} = {:.4}: {:?} ≈ {:.2}",
            report.axis.name(), report.current_value, metric, current / scale);
    }
    if let Some(slope) = report.average_slope(metric) {
        // Reported per percentage point of the swept parameter
        println!("Average change per percentage point: {:.2}", slope / 100.0 / scale);
    }
}

fn percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}%", v * 100.0))
        .unwrap_or_else(|| "n/a".to_string())
}
