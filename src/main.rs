//! Loopwalk - DC circuit current walker
//!
//! Builds one of the standard single-source circuits, propagates a seed
//! current from the source and prints the resulting circuit state.
//!
//! # Usage
//!
//! ```bash
//! loopwalk parallel-series --emf 100 -r 10 -r 20 --series 30 --seed-current 9
//! RUST_LOG=trace loopwalk series -r 10 -r 20
//! ```

use clap::{Parser, ValueEnum};
use log::{info, warn};
use loopwalk::{
    circuit::{self, validate_circuit, SourceLoop},
    error::Result,
    solver::check_balance,
    CurrentWalker, PropagationConfig, SplitPolicy, DEFAULT_SEED_CURRENT,
};

/// Wiring pattern around the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Topology {
    /// Source and the first resistor only
    Single,
    /// All resistors in one chain
    Series,
    /// All resistors side by side
    Parallel,
    /// Resistors side by side, then the series resistor
    ParallelSeries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Split {
    Normalized,
    Raw,
}

impl From<Split> for SplitPolicy {
    fn from(split: Split) -> Self {
        match split {
            Split::Normalized => SplitPolicy::Normalized,
            Split::Raw => SplitPolicy::Raw,
        }
    }
}

/// Resistive DC circuit current walker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Wiring pattern to build
    #[arg(value_enum, default_value_t = Topology::ParallelSeries)]
    topology: Topology,

    /// Source EMF in volts
    #[arg(short, long, default_value_t = 100.0)]
    emf: f64,

    /// Resistance of each resistor in ohms (repeatable)
    #[arg(short, long = "resistor", value_name = "OHMS", default_values_t = [10.0, 20.0])]
    resistors: Vec<f64>,

    /// Series resistor for the parallel-series pattern, in ohms
    #[arg(long, default_value_t = 30.0)]
    series: f64,

    /// Current injected at the source, in amps
    #[arg(short = 'i', long, default_value_t = DEFAULT_SEED_CURRENT)]
    seed_current: f64,

    /// How current is divided at branch points
    #[arg(long, value_enum, default_value_t = Split::Normalized)]
    split: Split,

    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn build(args: &Args) -> Result<SourceLoop> {
    match args.topology {
        Topology::Single => circuit::series_loop(args.emf, &args.resistors[..args.resistors.len().min(1)]),
        Topology::Series => circuit::series_loop(args.emf, &args.resistors),
        Topology::Parallel => circuit::parallel_loop(args.emf, &args.resistors),
        Topology::ParallelSeries => circuit::parallel_series_loop(args.emf, &args.resistors, args.series),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    // Build and check the circuit
    let SourceLoop {
        mut circuit, source, ..
    } = build(&args)?;
    validate_circuit(&circuit)?;

    // Propagate
    let config = PropagationConfig::new().with_split_policy(args.split.into());
    let walker = CurrentWalker::with_config(config);
    let report = walker.propagate(&mut circuit, source, args.seed_current)?;
    if report.degenerate_splits > 0 {
        warn!("{} branch points had zero total weight", report.degenerate_splits);
    }

    print!("{}", circuit.summary());

    match check_balance(&circuit, source) {
        Ok(balance) => info!(
            "Loop residual {} V ({})",
            balance.residual,
            if balance.is_balanced(walker.config().balance_tolerance) {
                "balanced"
            } else {
                "unbalanced"
            }
        ),
        Err(e) => warn!("Balance check skipped: {}", e),
    }

    Ok(())
}
