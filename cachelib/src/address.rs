use crate::config::CacheGeometry;

/// An address split into its three fields
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DecodedAddress {
    pub tag: u32,
    pub index: u32,
    /// Byte within the block. Blocks are modelled as atomic, so this never influences a hit or a
    /// miss; it is kept so a decoded address can be fully reassembled
    pub offset: u32,
}

/// Splits 32-bit addresses into tag, set index, and block offset for one geometry
///
/// The masks and shifts are worked out once at construction, the decode itself is three shifts
/// and two masks
#[derive(Debug, Copy, Clone)]
pub struct AddressDecoder {
    offset_mask: u32,
    index_mask: u32,
    offset_bits: u32,
    tag_shift: u32,
}

impl AddressDecoder {
    pub fn new(geometry: &CacheGeometry) -> Self {
        let offset_bits = geometry.offset_bits();
        // The geometry fits in 32 bits, so offset_bits + index_bits <= 31 and every shift is
        // in range
        Self {
            offset_mask: geometry.block_size() - 1,
            index_mask: geometry.n_sets() - 1,
            offset_bits,
            tag_shift: offset_bits + geometry.index_bits(),
        }
    }

    #[inline(always)]
    pub fn decode(&self, address: u32) -> DecodedAddress {
        DecodedAddress {
            tag: address >> self.tag_shift,
            index: (address >> self.offset_bits) & self.index_mask,
            offset: address & self.offset_mask,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder(n_sets: u32, block_size: u32, associativity: u32) -> AddressDecoder {
        AddressDecoder::new(&CacheGeometry::new(n_sets, block_size, associativity).unwrap())
    }

    #[test]
    fn splits_fields() {
        // 4 offset bits, 3 index bits
        let d = decoder(8, 16, 2);
        let decoded = d.decode(0b1011_010_0110);
        assert_eq!(decoded, DecodedAddress { tag: 0b1011, index: 0b010, offset: 0b0110 });
    }

    #[test]
    fn single_set_single_byte_blocks() {
        let d = decoder(1, 1, 1);
        assert_eq!(d.decode(0), DecodedAddress { tag: 0, index: 0, offset: 0 });
        assert_eq!(d.decode(u32::MAX), DecodedAddress { tag: u32::MAX, index: 0, offset: 0 });
    }

    #[test]
    fn offset_does_not_change_tag_or_index() {
        let d = decoder(64, 32, 4);
        let base = d.decode(0x1234_5660);
        for byte in 0..32 {
            let other = d.decode(0x1234_5660 + byte);
            assert_eq!((other.tag, other.index), (base.tag, base.index));
            assert_eq!(other.offset, byte);
        }
    }

    #[test]
    fn fields_reassemble() {
        let d = decoder(1 << 10, 1 << 6, 1);
        for address in [0u32, 1, 0xDEAD_BEEF, u32::MAX, 0x8000_0000] {
            let f = d.decode(address);
            assert_eq!((f.tag << 16) | (f.index << 6) | f.offset, address);
        }
    }
}
