use rand::{Rng, SeedableRng};
use crate::replacement_policies::SimRng;
use crate::simulator::RECORD_SIZE;

/// Encodes addresses in the trace file format, 4 bytes big-endian each
pub fn encode_trace(addresses: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(addresses.len() * RECORD_SIZE);
    for address in addresses {
        out.extend_from_slice(&address.to_be_bytes());
    }
    out
}

/// `len` addresses starting at `start`, `stride` bytes apart, wrapping on overflow
pub fn strided_trace(start: u32, stride: u32, len: usize) -> Vec<u32> {
    let mut address = start;
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        out.push(address);
        address = address.wrapping_add(stride);
    }
    out
}

/// `len` addresses drawn uniformly from `0..span`. The same seed always gives the same trace
pub fn random_trace(seed: u64, span: u32, len: usize) -> Vec<u32> {
    let mut rng = SimRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(0..span.max(1))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::decode_trace;

    #[test]
    fn encode_is_big_endian() {
        assert_eq!(encode_trace(&[0x0102_0304, 0xFF]), vec![1, 2, 3, 4, 0, 0, 0, 0xFF]);
    }

    #[test]
    fn encoded_trace_decodes() {
        let trace = random_trace(3, 1 << 20, 100);
        assert_eq!(decode_trace(&encode_trace(&trace)).collect::<Vec<_>>(), trace);
    }

    #[test]
    fn strided_wraps() {
        assert_eq!(strided_trace(u32::MAX - 1, 2, 3), vec![u32::MAX - 1, 0, 2]);
    }
}
