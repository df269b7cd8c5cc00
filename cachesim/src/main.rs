use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use clap::error::ErrorKind;
use clap::Parser;
use log::info;
use cachelib::config::{CacheGeometry, ReplacementPolicyConfig, DEFAULT_SEED};
use cachelib::error::SimulationError;
use cachelib::io::open_trace;
use cachelib::report::{Report, ReportMode};
use cachelib::simulator::Simulator;

const USAGE: &str = "cachesim <n_sets> <block_size> <associativity> <R|L|F> <0|1> <trace_file>";

#[derive(Parser, Debug)]
#[command(about = String::from("Set associative cache simulator"), override_usage = USAGE)]
struct Args {
    /// Number of sets, a power of two
    n_sets: u32,
    /// Block size in bytes, a power of two
    block_size: u32,
    /// Lines per set
    associativity: u32,
    /// Replacement policy: R (random), L (LRU), or F (FIFO)
    #[arg(allow_hyphen_values = true)]
    policy: String,
    /// 0 for the full report, anything else for a single line
    #[arg(allow_hyphen_values = true)]
    mode: String,
    /// Binary trace of 4 byte big-endian addresses
    #[arg(allow_hyphen_values = true)]
    trace: PathBuf,

    /// Print how long the simulation took
    #[arg(short, long)]
    performance: bool,

    /// Print the parsed geometry and how many lines were never filled
    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            // Wrong argument count or an unparsable number
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SimulationError> {
    let start = Instant::now();
    let policy: ReplacementPolicyConfig = args.policy.parse()?;
    let geometry = CacheGeometry::new(args.n_sets, args.block_size, args.associativity)?;
    let trace = open_trace(&args.trace)?;
    info!("Loaded {} bytes of trace from {}", trace.len(), args.trace.display());
    let mut simulator = Simulator::new(geometry, policy, DEFAULT_SEED);
    let stats = simulator.simulate(&trace);
    print!("{}", Report::new(&stats, ReportMode::from_flag(&args.mode)));
    if args.performance {
        let simulation_time = simulator.get_execution_time();
        let total_time = start.elapsed();
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!(
            "Total execution time (includes opening the trace and output): {}s",
            total_time.as_nanos() as f64 / 1e9
        )
    }
    if args.debug {
        println!("Parsed geometry: {geometry}, {policy} replacement");
        println!("Uninitialised cache lines: {}", simulator.get_uninitialised_line_count());
    }
    Ok(())
}
