//! # Complement-Sum Checksum
//!
//! Sectioned complement-sum checksum over an arbitrary-width header.
//!
//! The header is split into four sections of `k = ceil(bits / 4)` bits taken
//! from the low end; the fourth section takes every remaining high bit. The
//! sections are summed and the low `k` bits of the sum are complemented.
//! Carry bits above `k` pass through unchanged.

use super::protocol::CHECKSUM_SECTIONS;
use crate::error::{FrameError, Result};

/// A computed checksum and the number of bits it occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksum {
    pub value: u64,
    pub width: u32,
}

impl Checksum {
    /// Truncate or zero-pad the checksum to exactly `width` bits
    pub fn fit_to(self, width: u32) -> Self {
        Self {
            value: self.value & low_mask(width),
            width,
        }
    }
}

/// Number of bits needed to represent `value` (0 for zero)
pub fn bit_length(value: u64) -> u32 {
    u64::BITS - value.leading_zeros()
}

/// Mask of `width` low ones
pub fn low_mask(width: u32) -> u64 {
    if width >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Section width `k` used for a header
///
/// # Errors
///
/// Returns [`FrameError::DegenerateHeader`] for a zero header
pub fn section_width(header: u64) -> Result<u32> {
    if header == 0 {
        return Err(FrameError::DegenerateHeader);
    }

    Ok(bit_length(header).div_ceil(CHECKSUM_SECTIONS))
}

/// Split a header into its four checksum sections, low section first
///
/// # Errors
///
/// Returns [`FrameError::DegenerateHeader`] for a zero header
pub fn split_sections(header: u64) -> Result<[u64; 4]> {
    let k = section_width(header)?;
    let mask = low_mask(k);

    let mut rest = header;
    let mut sections = [0u64; 4];
    for section in sections.iter_mut().take(3) {
        *section = rest & mask;
        rest >>= k;
    }
    sections[3] = rest;

    Ok(sections)
}

/// Compute the complement-sum checksum of a header
///
/// The result's width is `max(k, bit_length(sum))`; it may be wider than `k`
/// when the section sum carries.
///
/// # Errors
///
/// Returns [`FrameError::DegenerateHeader`] for a zero header
///
/// # Examples
///
/// ```
/// use bitframe::frame::checksum::compute_checksum;
///
/// // 1 | 00000001 | 00000101 | 00000011
/// let checksum = compute_checksum(0x1_01_05_03)?;
/// assert_eq!(checksum.value, 102);
/// assert_eq!(checksum.width, 7);
/// # Ok::<(), bitframe::error::FrameError>(())
/// ```
pub fn compute_checksum(header: u64) -> Result<Checksum> {
    let k = section_width(header)?;

    // k <= 16 and the sections are k-bit values, so the sum cannot overflow
    let sum: u64 = split_sections(header)?.iter().sum();
    let value = sum ^ low_mask(k);

    Ok(Checksum {
        value,
        width: k.max(bit_length(sum)),
    })
}

/// Bit-by-bit checksum (slow, for verification)
///
/// Walks the header one bit at a time instead of masking whole sections.
#[cfg(test)]
fn compute_checksum_slow(header: u64) -> Result<Checksum> {
    let len = bit_length(header);
    if len == 0 {
        return Err(FrameError::DegenerateHeader);
    }
    let k = len.div_ceil(4);

    let mut sections = [0u64; 4];
    for bit in 0..len {
        let index = ((bit / k) as usize).min(3);
        let offset = bit - k * index as u32;
        sections[index] |= ((header >> bit) & 1) << offset;
    }

    let sum: u64 = sections.iter().sum();
    let mut value = sum;
    for bit in 0..k {
        value ^= 1 << bit;
    }

    let width = if bit_length(sum) > k { bit_length(sum) } else { k };
    Ok(Checksum { value, width })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO_HEADER: u64 = 0b1_00000001_00000101_00000011;

    #[test]
    fn test_bit_length() {
        assert_eq!(bit_length(0), 0);
        assert_eq!(bit_length(1), 1);
        assert_eq!(bit_length(0b1000), 4);
        assert_eq!(bit_length(DEMO_HEADER), 25);
        assert_eq!(bit_length(u64::MAX), 64);
    }

    #[test]
    fn test_low_mask() {
        assert_eq!(low_mask(0), 0);
        assert_eq!(low_mask(7), 0x7F);
        assert_eq!(low_mask(63), u64::MAX >> 1);
        assert_eq!(low_mask(64), u64::MAX);
    }

    #[test]
    fn test_demo_header_sections() {
        assert_eq!(DEMO_HEADER, 16_844_035);
        assert_eq!(section_width(DEMO_HEADER).unwrap(), 7);
        assert_eq!(split_sections(DEMO_HEADER).unwrap(), [3, 10, 4, 8]);
    }

    #[test]
    fn test_demo_header_checksum() {
        // sum = 25, 25 ^ 0x7F = 102
        let checksum = compute_checksum(DEMO_HEADER).unwrap();
        assert_eq!(checksum, Checksum { value: 102, width: 7 });
    }

    #[test]
    fn test_zero_header_is_degenerate() {
        assert!(matches!(compute_checksum(0), Err(FrameError::DegenerateHeader)));
        assert!(matches!(split_sections(0), Err(FrameError::DegenerateHeader)));
        assert!(matches!(section_width(0), Err(FrameError::DegenerateHeader)));
    }

    #[test]
    fn test_single_bit_header() {
        // k = 1, sum = 1, complement of the low bit is 0
        let checksum = compute_checksum(1).unwrap();
        assert_eq!(checksum, Checksum { value: 0, width: 1 });
    }

    #[test]
    fn test_carry_bits_left_untouched() {
        // 16 ones: k = 4, sections 15 each, sum 60 = 0b111100
        let checksum = compute_checksum(0xFFFF).unwrap();
        assert_eq!(checksum.value, 0b110011);
        assert_eq!(checksum.width, 6);
        assert_eq!(checksum.value >> 4, 60 >> 4, "bits above k come straight from the sum");
    }

    #[test]
    fn test_fourth_section_takes_remaining_bits() {
        // 13 bits: k = 4, the top section holds only bit 12
        let header = 1 << 12;
        assert_eq!(split_sections(header).unwrap(), [0, 0, 0, 1]);
        assert_eq!(compute_checksum(header).unwrap(), Checksum { value: 14, width: 4 });
    }

    #[test]
    fn test_checksum_is_deterministic() {
        for header in [1u64, 2, 0xFF, DEMO_HEADER, 0x1_00_00_00, u64::MAX >> 3] {
            assert_eq!(compute_checksum(header).unwrap(), compute_checksum(header).unwrap());
        }
    }

    #[test]
    fn test_checksum_matches_slow() {
        let headers = [
            1u64,
            0b10,
            0b1011,
            0xFF,
            0x1234,
            DEMO_HEADER,
            0x1_01_00_00,
            0x1_FF_FF_FF,
            0xDEAD_BEEF,
            u64::MAX,
        ];

        for &header in headers.iter() {
            assert_eq!(
                compute_checksum(header).unwrap(),
                compute_checksum_slow(header).unwrap(),
                "Checksum mismatch for header: {:#x}",
                header
            );
        }
    }

    #[test]
    fn test_checksum_changes_with_header() {
        let a = compute_checksum(DEMO_HEADER).unwrap();
        let b = compute_checksum(DEMO_HEADER + 1).unwrap();
        assert_ne!(a.value, b.value, "Checksum should change when header changes");
    }

    #[test]
    fn test_fit_to_truncates_and_pads() {
        let checksum = Checksum { value: 102, width: 7 };
        assert_eq!(checksum.fit_to(6), Checksum { value: 38, width: 6 });
        assert_eq!(checksum.fit_to(9), Checksum { value: 102, width: 9 });
    }
}
