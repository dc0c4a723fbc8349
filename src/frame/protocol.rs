//! # Frame Protocol Constants and Types
//!
//! Core layout definitions for the bit-packed frame.
//!
//! ```text
//! msb                                                             lsb
//! | leading (1) | source (P) | destination (P) | data (D) | checksum |
//! ```

use std::fmt;

use bitvec::prelude::*;
use serde::Deserialize;

use super::checksum::{bit_length, low_mask, Checksum};
use crate::error::{FrameError, Result};

/// Framing marker prepended to every frame (always 1)
pub const LEADING_BIT: u64 = 0b1;

/// Width of the framing marker in bits
pub const LEADING_BIT_WIDTH: u32 = 1;

/// Default width of source and destination address fields
pub const DEFAULT_PORT_WIDTH: u32 = 8;

/// Default width of the payload field
pub const DEFAULT_DATA_WIDTH: u32 = 8;

/// Default address of this node
pub const DEFAULT_SOURCE_ADDRESS: u64 = 1;

/// Number of sections the checksum engine splits a header into
pub const CHECKSUM_SECTIONS: u32 = 4;

/// Frames are packed into a single `u64`
pub const MAX_FRAME_WIDTH: u32 = u64::BITS;

/// How the computed checksum is placed into the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumPolicy {
    /// Truncate or zero-pad the checksum to the nominal width.
    /// Every frame of a layout has the same width.
    #[default]
    Fixed,

    /// Shift the checksum in at whatever width the engine returned.
    /// Frame width varies with the header's bit length and the carry out of the sum.
    Natural,
}

/// Bit layout of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    /// Width of both address fields
    pub port_width: u32,

    /// Width of the payload field
    pub data_width: u32,

    /// Address written into the source field of every frame
    pub source_address: u64,

    /// Placement of the checksum field
    pub checksum_policy: ChecksumPolicy,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            port_width: DEFAULT_PORT_WIDTH,
            data_width: DEFAULT_DATA_WIDTH,
            source_address: DEFAULT_SOURCE_ADDRESS,
            checksum_policy: ChecksumPolicy::default(),
        }
    }
}

impl FrameLayout {
    /// Width of the unchecked header (leading bit + addresses + data)
    pub fn header_width(&self) -> u32 {
        LEADING_BIT_WIDTH + self.addressed_width()
    }

    /// Nominal checksum width: a quarter of the address and data bits, rounded up
    ///
    /// The leading bit is not counted here even though the engine sees it,
    /// so the computed checksum is usually one bit wider than this.
    pub fn nominal_checksum_width(&self) -> u32 {
        self.addressed_width().div_ceil(CHECKSUM_SECTIONS)
    }

    /// Upper bound on the width the checksum engine can return for this layout
    ///
    /// Four sections of at most `k` bits sum to less than `4 * 2^k`.
    pub fn max_checksum_width(&self) -> u32 {
        self.header_width().div_ceil(CHECKSUM_SECTIONS) + 2
    }

    /// Widest frame this layout can produce
    pub fn max_frame_width(&self) -> u32 {
        let checksum = match self.checksum_policy {
            ChecksumPolicy::Fixed => self.nominal_checksum_width(),
            ChecksumPolicy::Natural => self.max_checksum_width(),
        };
        self.header_width() + checksum
    }

    /// Check that the layout is usable
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Either field width is zero
    /// - The widest possible frame does not fit in 64 bits
    /// - The source address does not fit in the port width
    pub fn validate(&self) -> Result<()> {
        if self.port_width == 0 {
            return Err(FrameError::InvalidLayout(
                "port_width must be greater than 0".to_string(),
            ));
        }

        if self.data_width == 0 {
            return Err(FrameError::InvalidLayout(
                "data_width must be greater than 0".to_string(),
            ));
        }

        // Checked before the width arithmetic below can overflow
        if self.port_width > MAX_FRAME_WIDTH || self.data_width > MAX_FRAME_WIDTH {
            return Err(FrameError::InvalidLayout(format!(
                "field widths must not exceed {} bits",
                MAX_FRAME_WIDTH
            )));
        }

        if self.max_frame_width() > MAX_FRAME_WIDTH {
            return Err(FrameError::InvalidLayout(format!(
                "frame may be {} bits wide, limit is {}",
                self.max_frame_width(),
                MAX_FRAME_WIDTH
            )));
        }

        if self.source_address > low_mask(self.port_width) {
            return Err(FrameError::AddressOutOfRange {
                field: "source",
                value: self.source_address,
                width: self.port_width,
            });
        }

        Ok(())
    }

    fn addressed_width(&self) -> u32 {
        2 * self.port_width + self.data_width
    }
}

/// A packed frame: header followed by its checksum
///
/// Immutable once built by [`FrameEncoder`](super::encoder::FrameEncoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    header: u64,
    header_width: u32,
    checksum: u64,
    checksum_width: u32,
    port_width: u32,
    data_width: u32,
}

impl Frame {
    pub(crate) fn new(layout: &FrameLayout, header: u64, checksum: Checksum) -> Self {
        Self {
            header,
            header_width: layout.header_width(),
            checksum: checksum.value,
            checksum_width: checksum.width,
            port_width: layout.port_width,
            data_width: layout.data_width,
        }
    }

    /// The packed frame value
    pub fn value(&self) -> u64 {
        (self.header << self.checksum_width) | self.checksum
    }

    /// Total frame width (header + checksum field)
    pub fn width(&self) -> u32 {
        self.header_width + self.checksum_width
    }

    /// The header the checksum was computed over
    pub fn header(&self) -> u64 {
        self.header
    }

    pub fn header_width(&self) -> u32 {
        self.header_width
    }

    /// The checksum field as placed in the frame
    pub fn checksum(&self) -> u64 {
        self.checksum
    }

    pub fn checksum_width(&self) -> u32 {
        self.checksum_width
    }

    pub fn source(&self) -> u64 {
        (self.header >> (self.data_width + self.port_width)) & low_mask(self.port_width)
    }

    pub fn destination(&self) -> u64 {
        (self.header >> self.data_width) & low_mask(self.port_width)
    }

    pub fn data(&self) -> u64 {
        self.header & low_mask(self.data_width)
    }

    /// Render the frame msb-first at its natural bit length
    ///
    /// The leading bit is always set, so the natural length equals [`Frame::width`].
    pub fn bits(&self) -> BitVec<u64, Msb0> {
        let value = self.value();
        let len = bit_length(value);
        value.view_bits::<Msb0>()[(u64::BITS - len) as usize..].to_bitvec()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:b}", self.value())
    }
}
