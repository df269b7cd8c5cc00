use log::debug;
use rand::SeedableRng;
use crate::address::{AddressDecoder, DecodedAddress};
use crate::config::{CacheGeometry, ReplacementPolicyConfig};
use crate::replacement_policies::{
    FirstInFirstOut, LeastRecentlyUsed, Random, ReplacementPolicy, SimRng,
};
use crate::set::{AccessOutcome, CacheSet};
use crate::stats::CacheStats;

/// A generic trait for caches
///
/// Technically not required as we're using static dispatch instead of dyn Cache, but this gives
/// one place to call into whichever policy the cache was built with
pub trait CacheTrait {
    /// Simulates one access, updating the addressed set and the counters
    ///
    /// Every 32-bit address is valid input, this never fails
    ///
    /// # Arguments
    ///
    /// * `address`: The byte address being accessed. Only the block it falls in matters
    ///
    /// returns: AccessOutcome
    fn access(&mut self, address: u32) -> AccessOutcome;

    /// A snapshot of the counters so far
    fn stats(&self) -> CacheStats;

    fn geometry(&self) -> &CacheGeometry;

    /// Gets the number of lines which have never been filled. Useful for analysing cache
    /// performance or debugging
    fn get_uninitialised_line_count(&self) -> u64;
}

/// A set associative cache, parameterised by a replacement policy
///
/// We rely on monomorphisation and inlining of the replacement policy functions, so each policy
/// gets what amounts to its own specialised implementation without writing one.
///
/// The cache owns every set and the random generator handed to them, so independent caches never
/// share state and can be simulated on separate threads
pub struct Cache<R: ReplacementPolicy> {
    geometry: CacheGeometry,
    decoder: AddressDecoder,
    sets: Box<[CacheSet<R>]>,
    rng: SimRng,
    stats: CacheStats,
}

impl<R: ReplacementPolicy> Cache<R> {
    /// Creates a cold cache
    ///
    /// # Arguments
    ///
    /// * `geometry`: The validated cache shape
    /// * `seed`: Seed for the generator used by the random policy. Other policies never draw
    /// from it
    ///
    /// returns: Cache<R>
    pub fn new(geometry: CacheGeometry, seed: u64) -> Self {
        debug!(
            "Building cache: {geometry} (tag {} / index {} / offset {} bits), seed {seed}",
            geometry.tag_bits(),
            geometry.index_bits(),
            geometry.offset_bits()
        );
        let associativity = geometry.associativity() as usize;
        Self {
            geometry,
            decoder: AddressDecoder::new(&geometry),
            sets: (0..geometry.n_sets()).map(|_| CacheSet::new(associativity)).collect(),
            rng: SimRng::seed_from_u64(seed),
            stats: CacheStats::default(),
        }
    }

    pub fn sets(&self) -> &[CacheSet<R>] {
        &self.sets
    }

    /// Splits an address the same way `access` does
    pub fn decode(&self, address: u32) -> DecodedAddress {
        self.decoder.decode(address)
    }
}

impl<R: ReplacementPolicy> CacheTrait for Cache<R> {
    #[inline]
    fn access(&mut self, address: u32) -> AccessOutcome {
        let DecodedAddress { tag, index, .. } = self.decoder.decode(address);
        let cache_full = self.stats.total_valid_lines == self.geometry.line_capacity();
        let outcome = self.sets[index as usize].access(tag, cache_full, &mut self.rng);
        self.stats.record(outcome);
        outcome
    }

    fn stats(&self) -> CacheStats {
        self.stats
    }

    fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    fn get_uninitialised_line_count(&self) -> u64 {
        self.geometry.line_capacity() - self.stats.total_valid_lines
    }
}

/// Enum for the three replacement policies provided by the library
///
/// Branching explicitly on every implementation lets the compiler see the concrete types and
/// inline the policies, which a trait object would hide on every single access
pub enum GenericCache {
    LeastRecentlyUsed(Cache<LeastRecentlyUsed>),
    FirstInFirstOut(Cache<FirstInFirstOut>),
    Random(Cache<Random>),
}

impl GenericCache {
    pub fn new(geometry: CacheGeometry, policy: ReplacementPolicyConfig, seed: u64) -> Self {
        match policy {
            ReplacementPolicyConfig::LeastRecentlyUsed => {
                Cache::<LeastRecentlyUsed>::new(geometry, seed).into()
            }
            ReplacementPolicyConfig::FirstInFirstOut => {
                Cache::<FirstInFirstOut>::new(geometry, seed).into()
            }
            ReplacementPolicyConfig::Random => Cache::<Random>::new(geometry, seed).into(),
        }
    }

    pub fn policy(&self) -> ReplacementPolicyConfig {
        match self {
            GenericCache::LeastRecentlyUsed(_) => ReplacementPolicyConfig::LeastRecentlyUsed,
            GenericCache::FirstInFirstOut(_) => ReplacementPolicyConfig::FirstInFirstOut,
            GenericCache::Random(_) => ReplacementPolicyConfig::Random,
        }
    }
}

impl From<Cache<LeastRecentlyUsed>> for GenericCache {
    fn from(value: Cache<LeastRecentlyUsed>) -> Self {
        Self::LeastRecentlyUsed(value)
    }
}

impl From<Cache<FirstInFirstOut>> for GenericCache {
    fn from(value: Cache<FirstInFirstOut>) -> Self {
        Self::FirstInFirstOut(value)
    }
}

impl From<Cache<Random>> for GenericCache {
    fn from(value: Cache<Random>) -> Self {
        Self::Random(value)
    }
}

impl CacheTrait for GenericCache {
    fn access(&mut self, address: u32) -> AccessOutcome {
        match self {
            GenericCache::LeastRecentlyUsed(c) => c.access(address),
            GenericCache::FirstInFirstOut(c) => c.access(address),
            GenericCache::Random(c) => c.access(address),
        }
    }

    fn stats(&self) -> CacheStats {
        match self {
            GenericCache::LeastRecentlyUsed(c) => c.stats(),
            GenericCache::FirstInFirstOut(c) => c.stats(),
            GenericCache::Random(c) => c.stats(),
        }
    }

    fn geometry(&self) -> &CacheGeometry {
        match self {
            GenericCache::LeastRecentlyUsed(c) => c.geometry(),
            GenericCache::FirstInFirstOut(c) => c.geometry(),
            GenericCache::Random(c) => c.geometry(),
        }
    }

    fn get_uninitialised_line_count(&self) -> u64 {
        match self {
            GenericCache::LeastRecentlyUsed(c) => c.get_uninitialised_line_count(),
            GenericCache::FirstInFirstOut(c) => c.get_uninitialised_line_count(),
            GenericCache::Random(c) => c.get_uninitialised_line_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SEED;

    fn geometry(n_sets: u32, block_size: u32, associativity: u32) -> CacheGeometry {
        CacheGeometry::new(n_sets, block_size, associativity).unwrap()
    }

    #[test]
    fn addresses_in_one_block_share_a_line() {
        let mut cache: Cache<LeastRecentlyUsed> = Cache::new(geometry(4, 16, 1), DEFAULT_SEED);
        assert_eq!(cache.access(0x100), AccessOutcome::MissCompulsory);
        for address in 0x101..0x110 {
            assert_eq!(cache.access(address), AccessOutcome::Hit);
        }
        assert_eq!(cache.access(0x110), AccessOutcome::MissCompulsory);
    }

    #[test]
    fn conflict_when_other_sets_have_room() {
        // 2 sets, direct mapped, 1 byte blocks: even addresses go to set 0
        let mut cache: Cache<FirstInFirstOut> = Cache::new(geometry(2, 1, 1), DEFAULT_SEED);
        assert_eq!(cache.access(0), AccessOutcome::MissCompulsory);
        assert_eq!(cache.access(2), AccessOutcome::MissConflict);
        assert_eq!(cache.access(1), AccessOutcome::MissCompulsory);
        assert_eq!(cache.access(4), AccessOutcome::MissCapacity);
        let stats = cache.stats();
        assert_eq!((stats.miss_compulsory, stats.miss_conflict, stats.miss_capacity), (2, 1, 1));
        assert_eq!(stats.total_valid_lines, 2);
        assert_eq!(cache.get_uninitialised_line_count(), 0);
    }

    #[test]
    fn lru_hit_reorders_without_touching_tags() {
        let mut cache: Cache<LeastRecentlyUsed> = Cache::new(geometry(1, 1, 3), DEFAULT_SEED);
        for address in [7, 8, 9] {
            cache.access(address);
        }
        let before: Vec<u32> = cache.sets()[0].lines().iter().map(|l| l.tag).collect();
        for _ in 0..5 {
            assert_eq!(cache.access(7), AccessOutcome::Hit);
        }
        let after: Vec<u32> = cache.sets()[0].lines().iter().map(|l| l.tag).collect();
        assert_eq!(before, after);
        assert_eq!(cache.sets()[0].policy().order(), vec![1, 2, 0]);
        assert_eq!(cache.stats().misses, 3);
    }

    #[test]
    fn generic_cache_dispatches_to_policy() {
        for policy in [
            ReplacementPolicyConfig::LeastRecentlyUsed,
            ReplacementPolicyConfig::FirstInFirstOut,
            ReplacementPolicyConfig::Random,
        ] {
            let mut cache = GenericCache::new(geometry(8, 4, 2), policy, DEFAULT_SEED);
            assert_eq!(cache.policy(), policy);
            assert_eq!(cache.get_uninitialised_line_count(), 16);
            assert_eq!(cache.access(0xABCD), AccessOutcome::MissCompulsory);
            assert_eq!(cache.access(0xABCD), AccessOutcome::Hit);
            assert_eq!(cache.get_uninitialised_line_count(), 15);
            assert_eq!(cache.geometry().n_sets(), 8);
        }
    }
}
