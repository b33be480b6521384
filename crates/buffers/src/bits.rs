//! Fixed-width bit packing.
//!
//! Codes are written LSB-first: code `i` occupies bits `i*width..(i+1)*width`
//! of the output stream, and the final byte is zero padded.

/// Number of bytes needed to hold `count` codes of `width` bits.
pub fn packed_len(count: usize, width: u32) -> usize {
    (count * width as usize).div_ceil(8)
}

/// Packs `codes` (each `< 1 << width`) into a byte vector.
pub fn pack(codes: impl IntoIterator<Item = u8>, width: u32) -> Vec<u8> {
    debug_assert!((1..=8).contains(&width));
    let mut out = Vec::new();
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    for code in codes {
        acc |= u32::from(code) << bits;
        bits += width;
        while bits >= 8 {
            out.push(acc as u8);
            acc >>= 8;
            bits -= 8;
        }
    }
    if bits > 0 {
        out.push(acc as u8);
    }
    out
}

/// Unpacks `count` codes of `width` bits from `data`.
///
/// Returns `None` when `data` is too short to hold `count` codes.
pub fn unpack(data: &[u8], count: usize, width: u32) -> Option<Vec<u8>> {
    if data.len() < packed_len(count, width) {
        return None;
    }
    let mask: u32 = (1 << width) - 1;
    let mut out = Vec::with_capacity(count);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut bytes = data.iter();
    for _ in 0..count {
        while bits < width {
            acc |= u32::from(*bytes.next()?) << bits;
            bits += 8;
        }
        out.push((acc & mask) as u8);
        acc >>= width;
        bits -= width;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nibbles_low_first() {
        assert_eq!(pack([0x1, 0x2, 0x3], 4), vec![0x21, 0x03]);
        assert_eq!(unpack(&[0x21, 0x03], 3, 4).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn seven_bit_codes() {
        let codes: Vec<u8> = b"hello world".to_vec();
        let packed = pack(codes.iter().copied(), 7);
        assert_eq!(packed.len(), packed_len(codes.len(), 7));
        assert_eq!(unpack(&packed, codes.len(), 7).unwrap(), codes);
    }

    #[test]
    fn short_input_is_rejected() {
        assert!(unpack(&[0xff], 3, 5).is_none());
    }

    #[test]
    fn widths_round_trip() {
        for width in 1..=8u32 {
            let codes: Vec<u8> = (0..37u32).map(|i| (i % (1 << width)) as u8).collect();
            let packed = pack(codes.iter().copied(), width);
            assert_eq!(unpack(&packed, codes.len(), width).unwrap(), codes);
        }
    }
}
