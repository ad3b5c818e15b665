//! Endian-parameterized Byte Codec
//!
//! This module provides the primitive decoders and encoders the redo pipeline
//! is built on: fixed-width integers (16/32/56/64 bits) and the database's
//! commit-number (SCN) field encodings, in both byte orders.
//!
//! ## Why a Value, Not Function Pointers?
//!
//! The source database reports its platform byte order exactly once, during
//! bootstrap. Everything downstream of that point is endian-agnostic: it
//! holds a single [`ByteOrder`] and calls methods on it. This replaces a
//! grab-bag of per-width function pointers with one `Copy` value that can be
//! passed by reference through the whole pipeline.
//!
//! ## SCN Field Encodings
//!
//! An SCN occupies a six- or eight-byte field and comes in two flavors:
//!
//! - **Regular** ([`ByteOrder::read_scn`]): six bytes of payload; if the
//!   high bit of the last payload byte is set, the field is eight bytes and
//!   carries a 63-bit value with a shuffled byte layout.
//! - **Reversed** ([`ByteOrder::read_scn_reversed`]): used inside file
//!   headers, with the two high-order payload bytes leading the field.
//!
//! Six `0xFF` payload bytes are the wire form of the [`ZERO_SCN`] sentinel
//! in both flavors. The exact bit placement is load-bearing: it matches the
//! on-disk format byte for byte, including the reversed big-endian variant's
//! flag-bit placement, which is preserved as observed rather than made
//! symmetric with its little-endian sibling.

/// In-memory sentinel for "no SCN". On the wire this is six `0xFF` bytes.
pub const ZERO_SCN: u64 = u64::MAX;

/// The 48-bit SCN forms hold values below this bound; anything at or above
/// it takes the flag-bit eight-byte form.
pub const SCN_48BIT_LIMIT: u64 = 0x8000_0000_0000;

/// Byte order of the source database platform, bound once at bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    /// Read a 16-bit unsigned integer from the first two bytes of `buf`.
    pub fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            ByteOrder::LittleEndian => (buf[0] as u16) | ((buf[1] as u16) << 8),
            ByteOrder::BigEndian => ((buf[0] as u16) << 8) | (buf[1] as u16),
        }
    }

    /// Read a 32-bit unsigned integer from the first four bytes of `buf`.
    pub fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            ByteOrder::LittleEndian => {
                (buf[0] as u32)
                    | ((buf[1] as u32) << 8)
                    | ((buf[2] as u32) << 16)
                    | ((buf[3] as u32) << 24)
            }
            ByteOrder::BigEndian => {
                ((buf[0] as u32) << 24)
                    | ((buf[1] as u32) << 16)
                    | ((buf[2] as u32) << 8)
                    | (buf[3] as u32)
            }
        }
    }

    /// Read a 56-bit unsigned integer from the first seven bytes of `buf`.
    pub fn read_u56(self, buf: &[u8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => {
                (buf[0] as u64)
                    | ((buf[1] as u64) << 8)
                    | ((buf[2] as u64) << 16)
                    | ((buf[3] as u64) << 24)
                    | ((buf[4] as u64) << 32)
                    | ((buf[5] as u64) << 40)
                    | ((buf[6] as u64) << 48)
            }
            ByteOrder::BigEndian => {
                ((buf[0] as u64) << 48)
                    | ((buf[1] as u64) << 40)
                    | ((buf[2] as u64) << 32)
                    | ((buf[3] as u64) << 24)
                    | ((buf[4] as u64) << 16)
                    | ((buf[5] as u64) << 8)
                    | (buf[6] as u64)
            }
        }
    }

    /// Read a 64-bit unsigned integer from the first eight bytes of `buf`.
    pub fn read_u64(self, buf: &[u8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => {
                (buf[0] as u64)
                    | ((buf[1] as u64) << 8)
                    | ((buf[2] as u64) << 16)
                    | ((buf[3] as u64) << 24)
                    | ((buf[4] as u64) << 32)
                    | ((buf[5] as u64) << 40)
                    | ((buf[6] as u64) << 48)
                    | ((buf[7] as u64) << 56)
            }
            ByteOrder::BigEndian => {
                ((buf[0] as u64) << 56)
                    | ((buf[1] as u64) << 48)
                    | ((buf[2] as u64) << 40)
                    | ((buf[3] as u64) << 32)
                    | ((buf[4] as u64) << 24)
                    | ((buf[5] as u64) << 16)
                    | ((buf[6] as u64) << 8)
                    | (buf[7] as u64)
            }
        }
    }

    /// Write a 16-bit unsigned integer into the first two bytes of `buf`.
    pub fn write_u16(self, buf: &mut [u8], val: u16) {
        match self {
            ByteOrder::LittleEndian => {
                buf[0] = val as u8;
                buf[1] = (val >> 8) as u8;
            }
            ByteOrder::BigEndian => {
                buf[0] = (val >> 8) as u8;
                buf[1] = val as u8;
            }
        }
    }

    /// Write a 32-bit unsigned integer into the first four bytes of `buf`.
    pub fn write_u32(self, buf: &mut [u8], val: u32) {
        match self {
            ByteOrder::LittleEndian => {
                buf[0] = val as u8;
                buf[1] = (val >> 8) as u8;
                buf[2] = (val >> 16) as u8;
                buf[3] = (val >> 24) as u8;
            }
            ByteOrder::BigEndian => {
                buf[0] = (val >> 24) as u8;
                buf[1] = (val >> 16) as u8;
                buf[2] = (val >> 8) as u8;
                buf[3] = val as u8;
            }
        }
    }

    /// Write a 56-bit unsigned integer into the first seven bytes of `buf`.
    /// Bits above 55 are discarded.
    pub fn write_u56(self, buf: &mut [u8], val: u64) {
        match self {
            ByteOrder::LittleEndian => {
                buf[0] = val as u8;
                buf[1] = (val >> 8) as u8;
                buf[2] = (val >> 16) as u8;
                buf[3] = (val >> 24) as u8;
                buf[4] = (val >> 32) as u8;
                buf[5] = (val >> 40) as u8;
                buf[6] = (val >> 48) as u8;
            }
            ByteOrder::BigEndian => {
                buf[0] = (val >> 48) as u8;
                buf[1] = (val >> 40) as u8;
                buf[2] = (val >> 32) as u8;
                buf[3] = (val >> 24) as u8;
                buf[4] = (val >> 16) as u8;
                buf[5] = (val >> 8) as u8;
                buf[6] = val as u8;
            }
        }
    }

    /// Write a 64-bit unsigned integer into the first eight bytes of `buf`.
    pub fn write_u64(self, buf: &mut [u8], val: u64) {
        match self {
            ByteOrder::LittleEndian => {
                buf[0] = val as u8;
                buf[1] = (val >> 8) as u8;
                buf[2] = (val >> 16) as u8;
                buf[3] = (val >> 24) as u8;
                buf[4] = (val >> 32) as u8;
                buf[5] = (val >> 40) as u8;
                buf[6] = (val >> 48) as u8;
                buf[7] = (val >> 56) as u8;
            }
            ByteOrder::BigEndian => {
                buf[0] = (val >> 56) as u8;
                buf[1] = (val >> 48) as u8;
                buf[2] = (val >> 40) as u8;
                buf[3] = (val >> 32) as u8;
                buf[4] = (val >> 24) as u8;
                buf[5] = (val >> 16) as u8;
                buf[6] = (val >> 8) as u8;
                buf[7] = val as u8;
            }
        }
    }

    /// Read a regular SCN field (six bytes, or eight when the flag bit in
    /// the last payload byte is set). Six `0xFF` bytes decode to
    /// [`ZERO_SCN`].
    pub fn read_scn(self, buf: &[u8]) -> u64 {
        if buf[..6] == [0xFF; 6] {
            return ZERO_SCN;
        }
        match self {
            ByteOrder::LittleEndian => {
                if buf[5] & 0x80 == 0x80 {
                    (buf[0] as u64)
                        | ((buf[1] as u64) << 8)
                        | ((buf[2] as u64) << 16)
                        | ((buf[3] as u64) << 24)
                        | ((buf[6] as u64) << 32)
                        | ((buf[7] as u64) << 40)
                        | ((buf[4] as u64) << 48)
                        | (((buf[5] & 0x7F) as u64) << 56)
                } else {
                    (buf[0] as u64)
                        | ((buf[1] as u64) << 8)
                        | ((buf[2] as u64) << 16)
                        | ((buf[3] as u64) << 24)
                        | ((buf[4] as u64) << 32)
                        | ((buf[5] as u64) << 40)
                }
            }
            ByteOrder::BigEndian => {
                if buf[0] & 0x80 == 0x80 {
                    (buf[5] as u64)
                        | ((buf[4] as u64) << 8)
                        | ((buf[3] as u64) << 16)
                        | ((buf[2] as u64) << 24)
                        | ((buf[7] as u64) << 32)
                        | ((buf[6] as u64) << 40)
                        | ((buf[1] as u64) << 48)
                        | (((buf[0] & 0x7F) as u64) << 56)
                } else {
                    (buf[5] as u64)
                        | ((buf[4] as u64) << 8)
                        | ((buf[3] as u64) << 16)
                        | ((buf[2] as u64) << 24)
                        | ((buf[1] as u64) << 32)
                        | ((buf[0] as u64) << 40)
                }
            }
        }
    }

    /// Read a reversed-header SCN field: the two high-order payload bytes
    /// lead the field and the flag bit lives in byte 1.
    ///
    /// The eight-byte form never populates bits 32..47, and the big-endian
    /// variant masks the flag off byte 0 while testing it on byte 1; both
    /// behaviors match the on-disk format as observed and are pinned by
    /// tests.
    pub fn read_scn_reversed(self, buf: &[u8]) -> u64 {
        if buf[..6] == [0xFF; 6] {
            return ZERO_SCN;
        }
        match self {
            ByteOrder::LittleEndian => {
                if buf[1] & 0x80 == 0x80 {
                    (buf[2] as u64)
                        | ((buf[3] as u64) << 8)
                        | ((buf[4] as u64) << 16)
                        | ((buf[5] as u64) << 24)
                        | ((buf[0] as u64) << 48)
                        | (((buf[1] & 0x7F) as u64) << 56)
                } else {
                    (buf[2] as u64)
                        | ((buf[3] as u64) << 8)
                        | ((buf[4] as u64) << 16)
                        | ((buf[5] as u64) << 24)
                        | ((buf[0] as u64) << 32)
                        | ((buf[1] as u64) << 40)
                }
            }
            ByteOrder::BigEndian => {
                if buf[1] & 0x80 == 0x80 {
                    (buf[5] as u64)
                        | ((buf[4] as u64) << 8)
                        | ((buf[3] as u64) << 16)
                        | ((buf[2] as u64) << 24)
                        | ((buf[1] as u64) << 48)
                        | (((buf[0] & 0x7F) as u64) << 56)
                } else {
                    (buf[5] as u64)
                        | ((buf[4] as u64) << 8)
                        | ((buf[3] as u64) << 16)
                        | ((buf[2] as u64) << 24)
                        | ((buf[1] as u64) << 32)
                        | ((buf[0] as u64) << 40)
                }
            }
        }
    }

    /// Write a regular SCN field. Values below [`SCN_48BIT_LIMIT`] take the
    /// six-byte form; larger values take the eight-byte flag-bit form.
    pub fn write_scn(self, buf: &mut [u8], val: u64) {
        match self {
            ByteOrder::LittleEndian => {
                if val < SCN_48BIT_LIMIT {
                    buf[0] = val as u8;
                    buf[1] = (val >> 8) as u8;
                    buf[2] = (val >> 16) as u8;
                    buf[3] = (val >> 24) as u8;
                    buf[4] = (val >> 32) as u8;
                    buf[5] = (val >> 40) as u8;
                } else {
                    buf[0] = val as u8;
                    buf[1] = (val >> 8) as u8;
                    buf[2] = (val >> 16) as u8;
                    buf[3] = (val >> 24) as u8;
                    buf[4] = (val >> 48) as u8;
                    buf[5] = ((val >> 56) as u8) | 0x80;
                    buf[6] = (val >> 32) as u8;
                    buf[7] = (val >> 40) as u8;
                }
            }
            ByteOrder::BigEndian => {
                if val < SCN_48BIT_LIMIT {
                    buf[5] = val as u8;
                    buf[4] = (val >> 8) as u8;
                    buf[3] = (val >> 16) as u8;
                    buf[2] = (val >> 24) as u8;
                    buf[1] = (val >> 32) as u8;
                    buf[0] = (val >> 40) as u8;
                } else {
                    buf[5] = val as u8;
                    buf[4] = (val >> 8) as u8;
                    buf[3] = (val >> 16) as u8;
                    buf[2] = (val >> 24) as u8;
                    buf[1] = (val >> 48) as u8;
                    buf[0] = ((val >> 56) as u8) | 0x80;
                    buf[7] = (val >> 32) as u8;
                    buf[6] = (val >> 40) as u8;
                }
            }
        }
    }

    /// Write a reversed-header SCN field, inverting [`read_scn_reversed`]
    /// over its representable domain (the eight-byte form cannot carry bits
    /// 32..47).
    pub fn write_scn_reversed(self, buf: &mut [u8], val: u64) {
        match self {
            ByteOrder::LittleEndian => {
                if val < SCN_48BIT_LIMIT {
                    buf[2] = val as u8;
                    buf[3] = (val >> 8) as u8;
                    buf[4] = (val >> 16) as u8;
                    buf[5] = (val >> 24) as u8;
                    buf[0] = (val >> 32) as u8;
                    buf[1] = (val >> 40) as u8;
                } else {
                    buf[2] = val as u8;
                    buf[3] = (val >> 8) as u8;
                    buf[4] = (val >> 16) as u8;
                    buf[5] = (val >> 24) as u8;
                    buf[0] = (val >> 48) as u8;
                    buf[1] = ((val >> 56) as u8) | 0x80;
                }
            }
            ByteOrder::BigEndian => {
                if val < SCN_48BIT_LIMIT {
                    buf[5] = val as u8;
                    buf[4] = (val >> 8) as u8;
                    buf[3] = (val >> 16) as u8;
                    buf[2] = (val >> 24) as u8;
                    buf[1] = (val >> 32) as u8;
                    buf[0] = (val >> 40) as u8;
                } else {
                    buf[5] = val as u8;
                    buf[4] = (val >> 8) as u8;
                    buf[3] = (val >> 16) as u8;
                    buf[2] = (val >> 24) as u8;
                    buf[1] = (val >> 48) as u8;
                    buf[0] = ((val >> 56) as u8) & 0x7F;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS: [ByteOrder; 2] = [ByteOrder::LittleEndian, ByteOrder::BigEndian];

    // ---------------------------------------------------------------
    // Fixed-width round-trips
    // ---------------------------------------------------------------

    #[test]
    fn test_u16_roundtrip() {
        for order in ORDERS {
            for val in [0u16, 1, 0x00FF, 0xFF00, 0x1234, u16::MAX] {
                let mut buf = [0u8; 2];
                order.write_u16(&mut buf, val);
                assert_eq!(order.read_u16(&buf), val, "{:?} {:#x}", order, val);
            }
        }
    }

    #[test]
    fn test_u32_roundtrip() {
        for order in ORDERS {
            for val in [0u32, 1, 0xDEAD_BEEF, 0x0102_0304, u32::MAX] {
                let mut buf = [0u8; 4];
                order.write_u32(&mut buf, val);
                assert_eq!(order.read_u32(&buf), val, "{:?} {:#x}", order, val);
            }
        }
    }

    #[test]
    fn test_u56_roundtrip() {
        for order in ORDERS {
            for val in [0u64, 1, 0x00FF_FFFF_FFFF_FFFF, 0x0012_3456_789A_BCDE] {
                let mut buf = [0u8; 7];
                order.write_u56(&mut buf, val);
                assert_eq!(order.read_u56(&buf), val, "{:?} {:#x}", order, val);
            }
        }
    }

    #[test]
    fn test_u64_roundtrip() {
        for order in ORDERS {
            for val in [0u64, 1, 0x0102_0304_0506_0708, u64::MAX] {
                let mut buf = [0u8; 8];
                order.write_u64(&mut buf, val);
                assert_eq!(order.read_u64(&buf), val, "{:?} {:#x}", order, val);
            }
        }
    }

    #[test]
    fn test_u16_byte_layout() {
        let mut buf = [0u8; 2];
        ByteOrder::LittleEndian.write_u16(&mut buf, 0x1234);
        assert_eq!(buf, [0x34, 0x12]);
        ByteOrder::BigEndian.write_u16(&mut buf, 0x1234);
        assert_eq!(buf, [0x12, 0x34]);
    }

    #[test]
    fn test_u32_byte_layout() {
        let mut buf = [0u8; 4];
        ByteOrder::LittleEndian.write_u32(&mut buf, 0x1234_5678);
        assert_eq!(buf, [0x78, 0x56, 0x34, 0x12]);
        ByteOrder::BigEndian.write_u32(&mut buf, 0x1234_5678);
        assert_eq!(buf, [0x12, 0x34, 0x56, 0x78]);
    }

    // ---------------------------------------------------------------
    // Regular SCN: sentinel
    // ---------------------------------------------------------------

    #[test]
    fn test_scn_sentinel_reads_as_zero_scn() {
        let buf = [0xFFu8; 8];
        for order in ORDERS {
            assert_eq!(order.read_scn(&buf), ZERO_SCN);
            assert_eq!(order.read_scn_reversed(&buf), ZERO_SCN);
        }
    }

    #[test]
    fn test_scn_sentinel_checks_only_payload_bytes() {
        // Trailing bytes beyond the six payload bytes do not matter.
        let mut buf = [0xFFu8; 8];
        buf[6] = 0x00;
        buf[7] = 0x00;
        for order in ORDERS {
            assert_eq!(order.read_scn(&buf), ZERO_SCN);
        }
    }

    #[test]
    fn test_scn_no_finite_encoding_collides_with_sentinel() {
        // The all-ones payload is reserved: any finite write leaves at least
        // one payload byte below 0xFF or the flag region distinct.
        for order in ORDERS {
            for val in [0u64, 0x7FFF_FFFF_FFFF, 0x8000_0000_0000, 0x7FFF_FFFF_FFFF_FFFE] {
                let mut buf = [0u8; 8];
                order.write_scn(&mut buf, val);
                assert_ne!(order.read_scn(&buf), ZERO_SCN, "{:?} {:#x}", order, val);
            }
        }
    }

    // ---------------------------------------------------------------
    // Regular SCN: 48-bit / 64-bit boundary
    // ---------------------------------------------------------------

    #[test]
    fn test_scn_boundary_values_roundtrip() {
        for order in ORDERS {
            for val in [
                0u64,
                1,
                0x7FFF_FFFF_FFFF, // largest 48-bit form
                0x8000_0000_0000, // smallest flag-bit form
                0x8000_0000_0001,
                0x1234_5678_9ABC_DEF0,
                0x7FFF_FFFF_FFFF_FFFE, // largest value distinct from the sentinel wire form
            ] {
                let mut buf = [0u8; 8];
                order.write_scn(&mut buf, val);
                assert_eq!(order.read_scn(&buf), val, "{:?} {:#x}", order, val);
            }
        }
    }

    #[test]
    fn test_scn_48bit_form_little_endian_layout() {
        let mut buf = [0u8; 8];
        ByteOrder::LittleEndian.write_scn(&mut buf, 0x7FFF_FFFF_FFFF);
        // Six payload bytes, no flag, trailing bytes untouched.
        assert_eq!(&buf[..6], &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F]);
        assert_eq!(&buf[6..], &[0x00, 0x00]);
    }

    #[test]
    fn test_scn_64bit_form_sets_flag_in_byte5_little_endian() {
        let mut buf = [0u8; 8];
        ByteOrder::LittleEndian.write_scn(&mut buf, 0x8000_0000_0000);
        assert_eq!(buf[5] & 0x80, 0x80);
        assert_eq!(ByteOrder::LittleEndian.read_scn(&buf), 0x8000_0000_0000);
    }

    #[test]
    fn test_scn_64bit_form_sets_flag_in_byte0_big_endian() {
        let mut buf = [0u8; 8];
        ByteOrder::BigEndian.write_scn(&mut buf, 0x8000_0000_0000);
        assert_eq!(buf[0] & 0x80, 0x80);
        assert_eq!(ByteOrder::BigEndian.read_scn(&buf), 0x8000_0000_0000);
    }

    #[test]
    fn test_scn_64bit_little_endian_byte_shuffle() {
        // val bits: 0..31 in b0..b3, 32..39 in b6, 40..47 in b7,
        // 48..55 in b4, 56..62 in b5 (under the flag).
        let val: u64 = (0x12u64 << 56) | (0x34u64 << 48) | (0x56u64 << 40) | (0x78u64 << 32) | 0x9ABC_DEF0;
        let mut buf = [0u8; 8];
        ByteOrder::LittleEndian.write_scn(&mut buf, val);
        assert_eq!(buf, [0xF0, 0xDE, 0xBC, 0x9A, 0x34, 0x12 | 0x80, 0x78, 0x56]);
        assert_eq!(ByteOrder::LittleEndian.read_scn(&buf), val);
    }

    // ---------------------------------------------------------------
    // Reversed SCN
    // ---------------------------------------------------------------

    #[test]
    fn test_scn_reversed_48bit_roundtrip_little_endian() {
        for val in [0u64, 1, 0x7BCD_1234_5678, 0x7FFF_FFFF_FFFF] {
            let mut buf = [0u8; 8];
            ByteOrder::LittleEndian.write_scn_reversed(&mut buf, val);
            assert_eq!(
                ByteOrder::LittleEndian.read_scn_reversed(&buf),
                val,
                "{:#x}",
                val
            );
        }
    }

    #[test]
    fn test_scn_reversed_48bit_roundtrip_big_endian() {
        // The big-endian decode tests its flag on byte 1, which holds bits
        // 32..39 of a six-byte value, so the round-trip domain keeps bit 39
        // clear.
        for val in [0u64, 1, 0x7B4D_1234_5678, 0x7F7F_FFFF_FFFF] {
            let mut buf = [0u8; 8];
            ByteOrder::BigEndian.write_scn_reversed(&mut buf, val);
            assert_eq!(
                ByteOrder::BigEndian.read_scn_reversed(&buf),
                val,
                "{:#x}",
                val
            );
        }
    }

    #[test]
    fn test_scn_reversed_big_endian_bit39_reads_as_flag() {
        // Pinned quirk: a six-byte big-endian value with bit 39 set decodes
        // through the eight-byte branch, shuffling its high bytes.
        let val: u64 = 0x7BCD_1234_5678; // bits 32..39 are 0xCD, bit 39 set
        let mut buf = [0u8; 8];
        ByteOrder::BigEndian.write_scn_reversed(&mut buf, val);
        let back = ByteOrder::BigEndian.read_scn_reversed(&buf);
        assert_eq!(back, (0x7Bu64 << 56) | (0xCDu64 << 48) | 0x1234_5678);
        assert_ne!(back, val);
    }

    #[test]
    fn test_scn_reversed_48bit_little_endian_layout() {
        let mut buf = [0u8; 8];
        ByteOrder::LittleEndian.write_scn_reversed(&mut buf, 0x1122_3344_5566);
        // High-order payload bytes lead the field.
        assert_eq!(&buf[..6], &[0x22, 0x11, 0x66, 0x55, 0x44, 0x33]);
    }

    #[test]
    fn test_scn_reversed_64bit_little_endian_roundtrip_without_mid_bits() {
        // The eight-byte reversed form carries bits 0..31 and 48..62 only,
        // so the vectors keep bits 32..47 clear.
        for val in [
            0x0001_0000_0000_0000u64,
            (0x12u64 << 56) | (0xB4u64 << 48) | 0x1234_5678,
            (0x7Fu64 << 56) | 0xFFFF_FFFF,
        ] {
            let mut buf = [0u8; 8];
            ByteOrder::LittleEndian.write_scn_reversed(&mut buf, val);
            assert_eq!(
                ByteOrder::LittleEndian.read_scn_reversed(&buf),
                val,
                "{:#x}",
                val
            );
        }
    }

    #[test]
    fn test_scn_reversed_64bit_drops_mid_bits() {
        // Bits 32..47 have no home in the reversed eight-byte form.
        let val: u64 = 0x4000_FFFF_0000_1234;
        let mut buf = [0u8; 8];
        ByteOrder::LittleEndian.write_scn_reversed(&mut buf, val);
        let back = ByteOrder::LittleEndian.read_scn_reversed(&buf);
        assert_eq!(back, val & !0x0000_FFFF_0000_0000);
    }

    #[test]
    fn test_scn_reversed_big_endian_flag_read_from_byte1() {
        // Big-endian reversed decode takes the eight-byte branch off byte 1,
        // masking byte 0; pinned byte-level vector.
        let buf = [0x12u8, 0xB4, 0x12, 0x34, 0x56, 0x78, 0x00, 0x00];
        let val = ByteOrder::BigEndian.read_scn_reversed(&buf);
        assert_eq!(
            val,
            ((0x12u64 & 0x7F) << 56) | (0xB4u64 << 48) | 0x1234_5678
        );
    }

    #[test]
    fn test_scn_reversed_big_endian_flag_masked_from_byte0() {
        let buf = [0x92u8, 0xB4, 0x12, 0x34, 0x56, 0x78, 0x00, 0x00];
        let val = ByteOrder::BigEndian.read_scn_reversed(&buf);
        // 0x92 & 0x7F == 0x12: the high bit of byte 0 does not survive.
        assert_eq!(val >> 56, 0x12);
    }

    #[test]
    fn test_scn_reversed_big_endian_roundtrip_when_byte1_carries_flag() {
        // Values whose bit 55 is set keep the decode on the eight-byte
        // branch, so the writer inverts cleanly.
        let val: u64 = (0x12u64 << 56) | (0xB4u64 << 48) | 0x1234_5678;
        let mut buf = [0u8; 8];
        ByteOrder::BigEndian.write_scn_reversed(&mut buf, val);
        assert_eq!(ByteOrder::BigEndian.read_scn_reversed(&buf), val);
    }

    #[test]
    fn test_scn_reversed_48bit_big_endian_layout() {
        let mut buf = [0u8; 8];
        ByteOrder::BigEndian.write_scn_reversed(&mut buf, 0x1122_3344_5566);
        assert_eq!(&buf[..6], &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
    }
}
