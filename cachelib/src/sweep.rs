use std::panic;
use std::thread;
use log::debug;
use serde::Serialize;
use crate::cache::CacheTrait;
use crate::config::{CacheGeometry, ReplacementPolicyConfig, SweepConfig};
use crate::error::SimulationError;
use crate::simulator::Simulator;
use crate::stats::{CacheRatios, CacheStats};

/// The outcome of one run of a sweep. Can be serialised for output
#[derive(Debug, Clone, Serialize)]
pub struct SweepResult {
    pub name: String,
    pub geometry: CacheGeometry,
    pub replacement_policy: ReplacementPolicyConfig,
    pub seed: u64,
    pub stats: CacheStats,
    pub ratios: CacheRatios,
}

/// Simulates every configuration of a sweep over the same trace
///
/// A single run can't be split up, as each access depends on everything before it, but separate
/// runs share nothing. Each one gets its own simulator on its own thread.
///
/// Every configuration is validated before any simulation starts, so a bad entry fails the whole
/// sweep up front
///
/// # Arguments
///
/// * `config`: The runs to perform
/// * `trace`: The trace bytes, in the same format as [`Simulator::simulate`]
///
/// returns: Result<Vec<SweepResult>, SimulationError>, in the same order as the configuration
pub fn run_sweep(config: &SweepConfig, trace: &[u8]) -> Result<Vec<SweepResult>, SimulationError> {
    let simulators = config
        .runs
        .iter()
        .map(|run| Simulator::from_config(run).map(|sim| (run, sim)))
        .collect::<Result<Vec<_>, _>>()?;

    let results = thread::scope(|scope| {
        let handles: Vec<_> = simulators
            .into_iter()
            .map(|(run, mut simulator)| {
                scope.spawn(move || {
                    debug!("Starting sweep run {}", run.name);
                    let stats = simulator.simulate(trace);
                    let elapsed = simulator.get_execution_time();
                    debug!("Finished sweep run {} in {:?}", run.name, elapsed);
                    SweepResult {
                        name: run.name.clone(),
                        geometry: *simulator.cache().geometry(),
                        replacement_policy: run.replacement_policy,
                        seed: run.seed,
                        stats,
                        ratios: stats.ratios(),
                    }
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
            .collect::<Vec<_>>()
    });
    Ok(results)
}
