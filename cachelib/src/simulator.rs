use std::time::{Duration, Instant};
use log::{debug, info};
use crate::cache::{CacheTrait, GenericCache};
use crate::config::{CacheGeometry, ReplacementPolicyConfig, SimulationConfig};
use crate::error::SimulationError;
use crate::stats::CacheStats;

/// Bytes per trace record: one big-endian u32 address
pub const RECORD_SIZE: usize = 4;

/// The simulator feeds a trace through a cache and keeps track of how long that takes.
///
/// It supports calling simulate multiple times, each call continues the same run and adds to the
/// time taken
pub struct Simulator {
    cache: GenericCache,
    simulation_time: Duration,
}

impl Simulator {
    /// Creates a new simulator with a cold cache
    ///
    /// # Arguments
    ///
    /// * `geometry`: The cache shape
    /// * `policy`: Which replacement policy every set uses
    /// * `seed`: Seed for the random policy, see [`crate::config::DEFAULT_SEED`]
    ///
    /// returns: Simulator
    pub fn new(geometry: CacheGeometry, policy: ReplacementPolicyConfig, seed: u64) -> Self {
        debug!("Simulating {policy} replacement on {geometry}");
        Self {
            cache: GenericCache::new(geometry, policy, seed),
            simulation_time: Duration::new(0, 0),
        }
    }

    /// Creates a new simulator from a configuration, usually resulting from parsing JSON
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        Ok(Self::new(config.geometry()?, config.replacement_policy, config.seed))
    }

    /// Simulates the cache over a trace held in a byte array.
    ///
    /// The trace is a flat run of 4 byte big-endian addresses. Any partial record at the end is
    /// ignored.
    ///
    /// Reads from the byte array are *guaranteed to be sequential*. This means that when using
    /// something like mmap, one can advise the operating system that sequential reads will be
    /// used, which can increase read performance
    ///
    /// # Arguments
    ///
    /// * `bytes`: The input byte array
    ///
    /// returns: CacheStats, the counters after this trace
    pub fn simulate(&mut self, bytes: &[u8]) -> CacheStats {
        let trailing = bytes.len() % RECORD_SIZE;
        if trailing != 0 {
            debug!("Ignoring {trailing} trailing bytes which don't make up a full record");
        }
        self.simulate_addresses(decode_trace(bytes))
    }

    /// Simulates the cache over addresses which have already been decoded
    pub fn simulate_addresses<I: IntoIterator<Item = u32>>(&mut self, addresses: I) -> CacheStats {
        let start = Instant::now();
        let before = self.cache.stats().accesses;
        for address in addresses {
            self.cache.access(address);
        }
        let elapsed = start.elapsed();
        self.simulation_time += elapsed;
        let stats = self.cache.stats();
        info!(
            "Simulated {} accesses in {}s",
            stats.accesses - before,
            elapsed.as_nanos() as f64 / 1e9
        );
        stats
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache(&self) -> &GenericCache {
        &self.cache
    }

    /// Gets the wall-clock execution time spent simulating
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    /// Gets the number of lines that were never filled
    pub fn get_uninitialised_line_count(&self) -> u64 {
        self.cache.get_uninitialised_line_count()
    }
}

/// Decodes a trace into addresses, dropping a trailing partial record
///
/// # Examples
///
/// ```
/// use cachelib::simulator::decode_trace;
/// let bytes = [0x00, 0x00, 0x01, 0x00, 0xDE, 0xAD, 0xBE, 0xEF, 0xFF];
/// assert_eq!(decode_trace(&bytes).collect::<Vec<_>>(), vec![0x100, 0xDEAD_BEEF]);
/// ```
pub fn decode_trace(bytes: &[u8]) -> impl Iterator<Item = u32> + '_ {
    bytes
        .chunks_exact(RECORD_SIZE)
        .map(|record| u32::from_be_bytes([record[0], record[1], record[2], record[3]]))
}
