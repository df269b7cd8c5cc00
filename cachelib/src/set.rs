use crate::replacement_policies::{ReplacementPolicy, SimRng};

/// What happened to a single access
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccessOutcome {
    Hit,
    /// The block went into a line that had never been filled
    MissCompulsory,
    /// A line was evicted while the cache as a whole was full
    MissCapacity,
    /// A line was evicted although other sets still had room
    MissConflict,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub valid: bool,
    pub tag: u32,
}

/// One set of a cache: a fixed number of lines and the replacement state that orders them
pub struct CacheSet<R: ReplacementPolicy> {
    lines: Box<[Line]>,
    policy: R,
}

impl<R: ReplacementPolicy> CacheSet<R> {
    pub fn new(associativity: usize) -> Self {
        Self {
            lines: vec![Line::default(); associativity].into_boxed_slice(),
            policy: R::new(associativity),
        }
    }

    /// Looks up a tag, filling or evicting a line on a miss
    ///
    /// Hits are checked first, then the lowest numbered invalid line is filled, and only once every
    /// line is valid does the policy pick a victim
    ///
    /// # Arguments
    ///
    /// * `tag`: The tag of the requested block
    /// * `cache_full`: Whether every line of the whole cache was valid before this access, decides
    /// between capacity and conflict misses
    /// * `rng`: The owning cache's generator, for the random policy
    ///
    /// returns: AccessOutcome
    pub fn access(&mut self, tag: u32, cache_full: bool, rng: &mut SimRng) -> AccessOutcome {
        if let Some(line) = self.lines.iter().position(|l| l.valid && l.tag == tag) {
            self.policy.update_on_hit(line);
            return AccessOutcome::Hit;
        }
        if let Some(line) = self.lines.iter().position(|l| !l.valid) {
            self.lines[line] = Line { valid: true, tag };
            self.policy.update_on_fill(line);
            return AccessOutcome::MissCompulsory;
        }
        let victim = self.policy.get_victim(rng);
        self.lines[victim].tag = tag;
        if cache_full {
            AccessOutcome::MissCapacity
        } else {
            AccessOutcome::MissConflict
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn policy(&self) -> &R {
        &self.policy
    }

    pub fn valid_line_count(&self) -> usize {
        self.lines.iter().filter(|l| l.valid).count()
    }
}
