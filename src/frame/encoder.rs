//! # Frame Encoder
//!
//! Packs addresses and data into a header and appends its checksum.

use tracing::debug;

use super::checksum::{compute_checksum, low_mask};
use super::protocol::*;
use crate::error::{FrameError, Result};

/// Builds frames for a fixed layout and source address
#[derive(Debug, Clone)]
pub struct FrameEncoder {
    layout: FrameLayout,
}

impl FrameEncoder {
    /// Create an encoder for a layout
    ///
    /// # Errors
    ///
    /// Returns error if the layout fails [`FrameLayout::validate`]
    pub fn new(layout: FrameLayout) -> Result<Self> {
        layout.validate()?;
        Ok(Self { layout })
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Pack the unchecked header
    ///
    /// ```text
    /// leading (1) | source (port_width) | destination (port_width) | data (data_width)
    /// ```
    ///
    /// # Errors
    ///
    /// Returns error if `destination` or `data` does not fit its field
    pub fn encode_header(&self, destination: u64, data: u64) -> Result<u64> {
        let FrameLayout {
            port_width,
            data_width,
            source_address,
            ..
        } = self.layout;

        if destination > low_mask(port_width) {
            return Err(FrameError::AddressOutOfRange {
                field: "destination",
                value: destination,
                width: port_width,
            });
        }

        if data > low_mask(data_width) {
            return Err(FrameError::DataOutOfRange {
                value: data,
                width: data_width,
            });
        }

        let mut header = LEADING_BIT;
        header = (header << port_width) | source_address;
        header = (header << port_width) | destination;
        header = (header << data_width) | data;

        Ok(header)
    }

    /// Encode a complete frame
    ///
    /// # Arguments
    ///
    /// * `destination` - Destination address (must fit `port_width`)
    /// * `data` - Payload (must fit `data_width`)
    ///
    /// # Returns
    ///
    /// * `Result<Frame>` - Header with its checksum appended per the layout's [`ChecksumPolicy`]
    ///
    /// # Examples
    ///
    /// ```
    /// use bitframe::frame::encoder::FrameEncoder;
    /// use bitframe::frame::protocol::FrameLayout;
    ///
    /// let encoder = FrameEncoder::new(FrameLayout::default())?;
    /// let frame = encoder.encode(5, 3)?;
    /// assert_eq!(frame.value(), 1_078_018_278);
    /// assert_eq!(frame.width(), 31);
    /// # Ok::<(), bitframe::error::FrameError>(())
    /// ```
    pub fn encode(&self, destination: u64, data: u64) -> Result<Frame> {
        let header = self.encode_header(destination, data)?;
        let checksum = compute_checksum(header)?;

        let field = match self.layout.checksum_policy {
            ChecksumPolicy::Fixed => {
                let width = self.layout.nominal_checksum_width();
                if checksum.width > width {
                    debug!(
                        "Truncating {}-bit checksum {:#b} to {} bits",
                        checksum.width, checksum.value, width
                    );
                }
                checksum.fit_to(width)
            }
            ChecksumPolicy::Natural => checksum,
        };

        Ok(Frame::new(&self.layout, header, field))
    }
}
