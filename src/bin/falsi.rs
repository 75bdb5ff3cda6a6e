use anyhow::{Context, Result};
use clap::Parser;
use falsi::root_finding::TableRow;
use falsi::{IterateOutcome, Simulation, SimulationCfg};

/// Falsi - step through the regula falsi method on a formula in `x`
#[derive(Parser, Debug)]
#[command(name = "falsi")]
#[command(about = "Run regula falsi iterations and print the iteration table", long_about = None)]
struct Args {
    /// Formula in `x`, e.g. "x**2 - 4"
    #[arg(long, short = 'f')]
    formula: String,

    /// Left starting point
    #[arg(long, allow_negative_numbers = true)]
    x1: f64,

    /// Right starting point
    #[arg(long, allow_negative_numbers = true)]
    x2: f64,

    /// Decimal places every stored value is rounded to
    #[arg(long, short = 'p', default_value_t = SimulationCfg::DEFAULT_PRECISION)]
    precision: u32,

    /// Number of iterations to push after the seed record
    #[arg(long, short = 'n', default_value_t = 0)]
    iterations: usize,

    /// Iterate until f(xm) is exactly zero (bounded by --max-iter)
    #[arg(long, conflicts_with = "iterations")]
    run: bool,

    /// Iteration cap for --run
    #[arg(long, default_value_t = SimulationCfg::DEFAULT_MAX_ITER)]
    max_iter: usize,

    /// Print the plot summary of this iteration (1-based)
    #[arg(long)]
    view: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{fmt, EnvFilter};

    // Use RUST_LOG to control log level, default to WARN if not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cfg = SimulationCfg::new()
        .set_precision(args.precision)
        .set_max_iter(args.max_iter)?;
    let mut sim = Simulation::new(cfg);

    let report = sim
        .start(&args.formula, args.x1, args.x2, args.precision)
        .context("cannot push first iteration")?;
    if let Some(warning) = report.warning {
        eprintln!("warning: {warning}");
    }

    if args.run {
        let run = sim.run(None)?;
        eprintln!("stopped after {} iteration(s): {:?}", run.appended, run.termination_reason);
    } else {
        for _ in 0..args.iterations {
            let outcome = sim.iterate()?;
            if let IterateOutcome::AlreadyConverged { .. } = outcome {
                eprintln!("info: no longer iterating, f({}) is already 0", outcome.record().mid);
                break;
            }
        }
    }

    println!("{}", TableRow::HEADERS.join(" | "));
    for (i, record) in sim.history().iter().enumerate() {
        println!("{}", record.row(i + 1));
    }

    if let Some(index) = args.view {
        let snapshot = sim.snapshot(index)?;
        let m = snapshot.markers;
        println!();
        println!("{}", snapshot.title);
        println!("x range : [{}, {}]", snapshot.x_range.0, snapshot.x_range.1);
        println!("samples : {} (resolution {})", snapshot.samples.len(), sim.cfg().resolution());
        println!("xl      : ({}, {})", m.left.0, m.left.1);
        println!("xr      : ({}, {})", m.right.0, m.right.1);
        println!("xm      : ({}, {})", m.root.0, m.root.1);
    }

    Ok(())
}
