//! # CacheLib
//!
//! Cachelib is a library for simulating a single level set associative cache over a trace of
//! 32-bit addresses
//!
//! It provides a generic cache implementation which can be parameterised by a replacement policy
//! (LRU, FIFO, or random), counts hits and misses, and splits misses into compulsory, capacity,
//! and conflict misses. A simulator drives the cache over binary trace files, and sweeps run many
//! independent configurations side by side
//!
//! Blocks are modelled as atomic: the offset bits of an address are decoded but never affect
//! whether an access hits

/// Splits addresses into tag, set index, and block offset
pub mod address;

/// Contains the implementation of the cache, and a utility enum for the existing cache types
pub mod cache;

/// Contains the cache geometry and the JSON input format for sweeps
pub mod config;

/// Errors raised while setting up a simulation
pub mod error;

/// Opening trace files
pub mod io;

/// Contains the provided replacement policies, with a trait for implementing custom replacement
/// policies
pub mod replacement_policies;

/// Formats statistics for the terminal
pub mod report;

/// A single cache set and the outcome of an access to it
pub mod set;

/// Contains the simulator used to run a trace through a given cache configuration
pub mod simulator;

/// Hit and miss counters
pub mod stats;

/// Runs several independent simulations over one trace in parallel
pub mod sweep;


/// Contains utilities for building traces in tests and benchmarks.
pub mod util;
