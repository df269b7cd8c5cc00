use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Random number generator owned by each cache and lent to its policies
pub type SimRng = ChaCha8Rng;

/// Marks the end of the recency list
const NIL: usize = usize::MAX;

/// A generic trait for implementing replacement policies. One instance tracks one set, and can be
/// used to parameterise a Cache.
///
/// Line indices are local to the set, in `0..associativity`
pub trait ReplacementPolicy {
    /// Creates the policy state for a single, empty set
    fn new(associativity: usize) -> Self
    where
        Self: Sized;

    /// Updates the policy when a valid line is hit
    ///
    /// Not applicable for some policies, a default which does nothing is provided
    fn update_on_hit(&mut self, _line: usize) {}

    /// Updates the policy when a previously invalid line is filled
    fn update_on_fill(&mut self, line: usize);

    /// Used by the set to pick a line to evict when every line is valid.
    ///
    /// Implementations should assume that when this method returns, the victim line has been
    /// replaced with the new block, and update their state accordingly
    ///
    /// # Arguments
    ///
    /// * `rng`: The cache's random number generator, only consumed by policies which need it
    ///
    /// returns: usize
    fn get_victim(&mut self, rng: &mut SimRng) -> usize;
}

/// Least Recently Used replacement policy
///
/// Keeps the valid lines of the set in a doubly linked list threaded through two arrays indexed by
/// line, least recently used at the head and most recently used at the tail. Moving a line to the
/// tail is O(1) and never allocates
pub struct LeastRecentlyUsed {
    prev: Box<[usize]>,
    next: Box<[usize]>,
    head: usize,
    tail: usize,
}

impl LeastRecentlyUsed {
    fn unlink(&mut self, line: usize) {
        let (prev, next) = (self.prev[line], self.next[line]);
        if prev == NIL {
            self.head = next;
        } else {
            self.next[prev] = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.prev[next] = prev;
        }
        self.prev[line] = NIL;
        self.next[line] = NIL;
    }

    fn push_back(&mut self, line: usize) {
        self.prev[line] = self.tail;
        self.next[line] = NIL;
        if self.tail == NIL {
            self.head = line;
        } else {
            self.next[self.tail] = line;
        }
        self.tail = line;
    }

    fn move_to_back(&mut self, line: usize) {
        if self.tail != line {
            self.unlink(line);
            self.push_back(line);
        }
    }

    /// Lines from least to most recently used
    pub fn order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.next.len());
        let mut line = self.head;
        while line != NIL {
            out.push(line);
            line = self.next[line];
        }
        out
    }
}

impl ReplacementPolicy for LeastRecentlyUsed {
    fn new(associativity: usize) -> Self {
        Self {
            prev: vec![NIL; associativity].into_boxed_slice(),
            next: vec![NIL; associativity].into_boxed_slice(),
            head: NIL,
            tail: NIL,
        }
    }

    fn update_on_hit(&mut self, line: usize) {
        self.move_to_back(line);
    }

    fn update_on_fill(&mut self, line: usize) {
        self.push_back(line);
    }

    fn get_victim(&mut self, _rng: &mut SimRng) -> usize {
        let victim = self.head;
        debug_assert_ne!(victim, NIL, "eviction requested from a set with no valid lines");
        self.move_to_back(victim);
        victim
    }
}

/// First In First Out replacement policy
///
/// A fixed capacity ring buffer of line indices in fill order. Hits don't affect it
pub struct FirstInFirstOut {
    queue: Box<[usize]>,
    head: usize,
    len: usize,
}

impl FirstInFirstOut {
    fn enqueue(&mut self, line: usize) {
        debug_assert!(self.len < self.queue.len(), "FIFO queue overflow");
        let tail = (self.head + self.len) % self.queue.len();
        self.queue[tail] = line;
        self.len += 1;
    }

    fn dequeue(&mut self) -> usize {
        debug_assert!(self.len > 0, "FIFO queue underflow");
        let line = self.queue[self.head];
        self.head = (self.head + 1) % self.queue.len();
        self.len -= 1;
        line
    }

    /// Lines from oldest to newest
    pub fn order(&self) -> Vec<usize> {
        (0..self.len).map(|i| self.queue[(self.head + i) % self.queue.len()]).collect()
    }
}

impl ReplacementPolicy for FirstInFirstOut {
    fn new(associativity: usize) -> Self {
        Self {
            queue: vec![0; associativity].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    fn update_on_fill(&mut self, line: usize) {
        self.enqueue(line);
    }

    fn get_victim(&mut self, _rng: &mut SimRng) -> usize {
        let victim = self.dequeue();
        // The replacement block is now the newest in the set
        self.enqueue(victim);
        victim
    }
}

/// Random replacement policy
///
/// Stateless apart from the set size, draws victims uniformly from every line of the set using
/// the cache's seeded generator
pub struct Random {
    associativity: usize,
}

impl ReplacementPolicy for Random {
    fn new(associativity: usize) -> Self {
        Self { associativity }
    }

    fn update_on_fill(&mut self, _line: usize) {}

    fn get_victim(&mut self, rng: &mut SimRng) -> usize {
        rng.gen_range(0..self.associativity)
    }
}
