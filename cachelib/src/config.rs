use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::SimulationError;

/// Seed used for the random replacement policy unless a configuration overrides it
///
/// Fixed rather than time based so that two runs over the same trace always agree
pub const DEFAULT_SEED: u64 = 0;

/// The shape of a cache: how many sets, how large each block is, and how many lines per set
///
/// Can only be built through [`CacheGeometry::new`], so every geometry in circulation has
/// power-of-two sets and blocks and fits inside the 32-bit address space
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct CacheGeometry {
    n_sets: u32,
    block_size: u32,
    associativity: u32,
}

impl CacheGeometry {
    /// Validates and creates a geometry
    ///
    /// # Arguments
    ///
    /// * `n_sets`: Number of sets, a power of two
    /// * `block_size`: Bytes per block, a power of two
    /// * `associativity`: Lines per set, at least 1
    ///
    /// returns: Result<CacheGeometry, SimulationError>
    pub fn new(n_sets: u32, block_size: u32, associativity: u32) -> Result<Self, SimulationError> {
        let dimensions =
            [("n_sets", n_sets), ("block_size", block_size), ("associativity", associativity)];
        for (field, value) in dimensions {
            if value == 0 {
                return Err(SimulationError::ZeroDimension { field });
            }
        }
        for (field, value) in [("n_sets", n_sets), ("block_size", block_size)] {
            if !value.is_power_of_two() {
                return Err(SimulationError::NotPowerOfTwo { field, value });
            }
        }
        let span = n_sets as u128 * block_size as u128 * associativity as u128;
        if span > u32::MAX as u128 {
            return Err(SimulationError::AddressSpaceExceeded { n_sets, block_size, associativity });
        }
        Ok(Self { n_sets, block_size, associativity })
    }

    pub fn n_sets(&self) -> u32 {
        self.n_sets
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn associativity(&self) -> u32 {
        self.associativity
    }

    /// Number of low address bits selecting a byte within a block
    pub fn offset_bits(&self) -> u32 {
        self.block_size.trailing_zeros()
    }

    /// Number of address bits selecting the set
    pub fn index_bits(&self) -> u32 {
        self.n_sets.trailing_zeros()
    }

    /// Width of the tag stored in each line
    pub fn tag_bits(&self) -> u32 {
        u32::BITS - self.index_bits() - self.offset_bits()
    }

    /// Total number of lines across every set
    pub fn line_capacity(&self) -> u64 {
        self.n_sets as u64 * self.associativity as u64
    }
}

impl fmt::Display for CacheGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sets x {}B blocks x {}-way", self.n_sets, self.block_size, self.associativity)
    }
}

/// The replacement policy - lru, fifo, or random. Defaults to lru.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplacementPolicyConfig {
    #[default]
    #[serde(alias = "lru", alias = "L")]
    LeastRecentlyUsed,
    #[serde(alias = "fifo", alias = "F")]
    FirstInFirstOut,
    #[serde(alias = "random", alias = "R")]
    Random,
}

/// Parses the single letter used on the command line: `L`, `F`, or `R`
impl FromStr for ReplacementPolicyConfig {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(ReplacementPolicyConfig::LeastRecentlyUsed),
            "F" => Ok(ReplacementPolicyConfig::FirstInFirstOut),
            "R" => Ok(ReplacementPolicyConfig::Random),
            other => Err(SimulationError::InvalidPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for ReplacementPolicyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReplacementPolicyConfig::LeastRecentlyUsed => "LRU",
            ReplacementPolicyConfig::FirstInFirstOut => "FIFO",
            ReplacementPolicyConfig::Random => "Random",
        })
    }
}

/// A configuration for a single simulation run, as found in a sweep file
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    pub name: String,
    pub n_sets: u32,
    pub block_size: u32,
    pub associativity: u32,
    #[serde(default = "ReplacementPolicyConfig::default")]
    pub replacement_policy: ReplacementPolicyConfig,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl SimulationConfig {
    /// Validates the geometry of this run
    pub fn geometry(&self) -> Result<CacheGeometry, SimulationError> {
        CacheGeometry::new(self.n_sets, self.block_size, self.associativity)
    }
}

/// A set of independent simulation runs over the same trace
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    pub runs: Vec<SimulationConfig>,
}

impl SweepConfig {
    /// Reads a sweep from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|source| SimulationError::ConfigOpen { path: path.to_path_buf(), source })?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|source| SimulationError::ConfigParse { path: path.to_path_buf(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_bit_widths() {
        let geometry = CacheGeometry::new(256, 64, 4).unwrap();
        assert_eq!(geometry.offset_bits(), 6);
        assert_eq!(geometry.index_bits(), 8);
        assert_eq!(geometry.tag_bits(), 18);
        assert_eq!(geometry.line_capacity(), 1024);
    }

    #[test]
    fn geometry_rejects_zero_and_non_powers_of_two() {
        assert!(matches!(
            CacheGeometry::new(0, 4, 1),
            Err(SimulationError::ZeroDimension { field: "n_sets" })
        ));
        assert!(matches!(
            CacheGeometry::new(4, 4, 0),
            Err(SimulationError::ZeroDimension { field: "associativity" })
        ));
        assert!(matches!(
            CacheGeometry::new(3, 4, 1),
            Err(SimulationError::NotPowerOfTwo { field: "n_sets", value: 3 })
        ));
        assert!(matches!(
            CacheGeometry::new(4, 12, 1),
            Err(SimulationError::NotPowerOfTwo { field: "block_size", value: 12 })
        ));
        // Associativity need not be a power of two
        assert!(CacheGeometry::new(4, 4, 3).is_ok());
    }

    #[test]
    fn geometry_must_fit_address_space() {
        // 2^16 * 2^16 * 1 = 2^32, one past u32::MAX
        let err = CacheGeometry::new(1 << 16, 1 << 16, 1).unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, SimulationError::AddressSpaceExceeded { .. }));
        assert!(CacheGeometry::new(1 << 16, 1 << 15, 1).is_ok());
        assert!(CacheGeometry::new(1 << 31, 1, u32::MAX).is_err());
    }

    #[test]
    fn policy_letters() {
        let parse = |s: &str| s.parse::<ReplacementPolicyConfig>();
        assert_eq!(parse("L").unwrap(), ReplacementPolicyConfig::LeastRecentlyUsed);
        assert_eq!(parse("F").unwrap(), ReplacementPolicyConfig::FirstInFirstOut);
        assert_eq!(parse("R").unwrap(), ReplacementPolicyConfig::Random);
        for bad in ["l", "LRU", "", "X"] {
            let err = bad.parse::<ReplacementPolicyConfig>().unwrap_err();
            assert!(err.is_configuration());
        }
    }

    #[test]
    fn sweep_config_from_json() {
        let json = r#"{
            "runs": [
                { "name": "small_lru", "n_sets": 16, "block_size": 4, "associativity": 2,
                  "replacement_policy": "lru" },
                { "name": "small_rand", "n_sets": 16, "block_size": 4, "associativity": 2,
                  "replacement_policy": "R", "seed": 7 },
                { "name": "default_policy", "n_sets": 1, "block_size": 1, "associativity": 8 }
            ]
        }"#;
        let sweep: SweepConfig = serde_json::from_str(json).unwrap();
        assert_eq!(sweep.runs.len(), 3);
        assert_eq!(sweep.runs[0].replacement_policy, ReplacementPolicyConfig::LeastRecentlyUsed);
        assert_eq!(sweep.runs[0].seed, DEFAULT_SEED);
        assert_eq!(sweep.runs[1].replacement_policy, ReplacementPolicyConfig::Random);
        assert_eq!(sweep.runs[1].seed, 7);
        assert_eq!(sweep.runs[2].replacement_policy, ReplacementPolicyConfig::default());
        assert_eq!(sweep.runs[2].geometry().unwrap().line_capacity(), 8);
    }

    #[test]
    fn default_policy_is_lru() {
        assert_eq!(ReplacementPolicyConfig::default(), ReplacementPolicyConfig::LeastRecentlyUsed);
    }
}
