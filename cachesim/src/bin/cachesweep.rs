use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use clap::error::ErrorKind;
use clap::Parser;
use cachelib::config::SweepConfig;
use cachelib::error::SimulationError;
use cachelib::io::open_trace;
use cachelib::sweep::run_sweep;

#[derive(Parser, Debug)]
#[command(about = String::from("Runs several cache configurations over one trace in parallel"))]
struct Args {
    /// JSON file with a list of runs
    #[arg(allow_hyphen_values = true)]
    config: PathBuf,
    /// Binary trace of 4 byte big-endian addresses
    #[arg(allow_hyphen_values = true)]
    trace: PathBuf,

    /// Print how long the sweep took
    #[arg(short, long)]
    performance: bool,
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
    let config = SweepConfig::from_path(&args.config)?;
    let trace = open_trace(&args.trace)?;
    log::info!("Sweeping {} configurations", config.runs.len());
    let results = run_sweep(&config, &trace)?;
    let json = serde_json::to_string_pretty(&results).map_err(SimulationError::OutputSerialise)?;
    println!("{json}");
    if args.performance {
        println!("Total execution time: {}s", start.elapsed().as_nanos() as f64 / 1e9);
    }
    Ok(())
}
