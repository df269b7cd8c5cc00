use std::fs::File;
use std::ops::Deref;
use std::path::Path;
use crate::error::SimulationError;

/// The raw bytes of a trace file, either memory mapped or read into memory
pub enum TraceBytes {
    #[cfg(unix)]
    Mapped(memmap2::Mmap),
    Buffered(Vec<u8>),
}

impl Deref for TraceBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            #[cfg(unix)]
            TraceBytes::Mapped(m) => &m[..],
            TraceBytes::Buffered(b) => b.as_slice(),
        }
    }
}

/// Opens a trace file for simulation
///
/// The simulator reads the trace strictly front to back, so on unix we memory map it and advise
/// the OS of sequential access
pub fn open_trace<P: AsRef<Path>>(path: P) -> Result<TraceBytes, SimulationError> {
    let path = path.as_ref();
    let open_err =
        |source: std::io::Error| SimulationError::TraceOpen { path: path.to_path_buf(), source };
    let file = File::open(path).map_err(open_err)?;
    // Compatibility on other systems
    #[cfg(not(unix))]
    {
        use std::io::Read;
        let mut file = file;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).map_err(open_err)?;
        Ok(TraceBytes::Buffered(buf))
    }
    // Memory map the file for speed on unix systems
    #[cfg(unix)]
    {
        use memmap2::{Advice, Mmap};
        let len = file.metadata().map_err(open_err)?.len();
        // Nothing to map
        if len == 0 {
            return Ok(TraceBytes::Buffered(Vec::new()));
        }
        let map_err =
            |source: std::io::Error| SimulationError::TraceMap { path: path.to_path_buf(), source };
        // Safety: the mapping is read only and lives no longer than this simulation; the trace
        // must not be truncated by another process while we run
        let m = unsafe { Mmap::map(&file) }.map_err(map_err)?;
        m.advise(Advice::Sequential).map_err(map_err)?;
        Ok(TraceBytes::Mapped(m))
    }
}
