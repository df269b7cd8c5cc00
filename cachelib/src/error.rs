use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while setting up a simulation
///
/// All of these are detected before the first access is simulated; the per-access path itself is
/// total and never fails
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid replacement policy: {0} (expected one of R, L, F)")]
    InvalidPolicy(String),

    #[error("{field} must be at least 1")]
    ZeroDimension { field: &'static str },

    #[error("{field} must be a power of two, got {value}")]
    NotPowerOfTwo { field: &'static str, value: u32 },

    #[error(
        "Cache of {n_sets} sets x {block_size} bytes x {associativity} ways is larger than the \
         32-bit address space"
    )]
    AddressSpaceExceeded {
        n_sets: u32,
        block_size: u32,
        associativity: u32,
    },

    #[error("Couldn't open the trace file at path {}: {source}", path.display())]
    TraceOpen { path: PathBuf, source: io::Error },

    #[error("Couldn't memory map the trace file at path {}: {source}", path.display())]
    TraceMap { path: PathBuf, source: io::Error },

    #[error("Couldn't open the config file at path {}: {source}", path.display())]
    ConfigOpen { path: PathBuf, source: io::Error },

    #[error("Couldn't parse the config file at path {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Couldn't serialise the output: {0}")]
    OutputSerialise(#[source] serde_json::Error),
}

impl SimulationError {
    /// True for static misconfigurations of the cache itself, as opposed to I/O failures
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SimulationError::InvalidPolicy(_)
                | SimulationError::ZeroDimension { .. }
                | SimulationError::NotPowerOfTwo { .. }
                | SimulationError::AddressSpaceExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_and_output_errors_are_not_configuration() {
        let json_err = serde_json::from_str::<u32>("x").unwrap_err();
        let err = SimulationError::OutputSerialise(json_err);
        assert!(!err.is_configuration());
        assert!(err.to_string().starts_with("Couldn't serialise the output"));
        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = SimulationError::ConfigOpen { path: PathBuf::from("sweep.json"), source: missing };
        assert!(!err.is_configuration());
        assert!(err.to_string().contains("sweep.json"));
    }
}
