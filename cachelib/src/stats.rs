use serde::{Deserialize, Serialize};
use crate::set::AccessOutcome;

/// Counters accumulated by a cache over one run
///
/// `hits + misses == accesses` and the three miss kinds always add up to `misses`
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub accesses: u64,
    pub hits: u64,
    pub misses: u64,
    pub miss_compulsory: u64,
    pub miss_capacity: u64,
    pub miss_conflict: u64,
    /// Lines holding a block, across every set
    pub total_valid_lines: u64,
}

/// Hit and miss rates derived from [`CacheStats`], all fractions in `[0, 1]`
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheRatios {
    pub hit_rate: f64,
    pub miss_rate: f64,
    pub compulsory: f64,
    pub capacity: f64,
    pub conflict: f64,
}

impl CacheStats {
    pub(crate) fn record(&mut self, outcome: AccessOutcome) {
        self.accesses += 1;
        match outcome {
            AccessOutcome::Hit => self.hits += 1,
            AccessOutcome::MissCompulsory => {
                self.misses += 1;
                self.miss_compulsory += 1;
                self.total_valid_lines += 1;
            }
            AccessOutcome::MissCapacity => {
                self.misses += 1;
                self.miss_capacity += 1;
            }
            AccessOutcome::MissConflict => {
                self.misses += 1;
                self.miss_conflict += 1;
            }
        }
    }

    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.accesses)
    }

    pub fn miss_rate(&self) -> f64 {
        ratio(self.misses, self.accesses)
    }

    /// Compulsory misses as a fraction of all misses
    pub fn compulsory_ratio(&self) -> f64 {
        ratio(self.miss_compulsory, self.misses)
    }

    pub fn capacity_ratio(&self) -> f64 {
        ratio(self.miss_capacity, self.misses)
    }

    pub fn conflict_ratio(&self) -> f64 {
        ratio(self.miss_conflict, self.misses)
    }

    pub fn ratios(&self) -> CacheRatios {
        CacheRatios {
            hit_rate: self.hit_rate(),
            miss_rate: self.miss_rate(),
            compulsory: self.compulsory_ratio(),
            capacity: self.capacity_ratio(),
            conflict: self.conflict_ratio(),
        }
    }
}

// An empty denominator means nothing happened, report 0 instead of NaN
fn ratio(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
