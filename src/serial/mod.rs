//! # Bit-Serial Transmission Module
//!
//! Emits frames as a timed bit stream with blind redundancy.
//!
//! This module handles:
//! - Rendering a frame msb-first at its natural bit length
//! - Pacing each bit by `1 / baud_rate` seconds
//! - Repeating the whole frame `idempotence_runs` times
//! - Pausing between runs for a fixed multiple of the bit delay
//!
//! There is no acknowledgement channel and no cancellation: a transmission
//! always completes every run unless the port fails.

pub mod port_trait;

use std::time::Duration;

use tracing::{debug, info};

use crate::error::{FrameError, Result};
use crate::frame::protocol::Frame;
use port_trait::BitPort;

/// Default line rate in bits per second
pub const DEFAULT_BAUD_RATE: u32 = 1200;

/// Default number of times each frame is sent
pub const DEFAULT_IDEMPOTENCE_RUNS: u32 = 5;

/// Default pause between runs, in bit periods
pub const DEFAULT_IDEMPOTENCE_DELAY_BITS: u32 = 10;

/// Line timing and redundancy policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTiming {
    /// Hold after every emitted bit
    pub bit_delay: Duration,

    /// Number of full repetitions of a frame
    pub runs: u32,

    /// Pause between consecutive runs
    pub run_delay: Duration,
}

impl Default for LinkTiming {
    fn default() -> Self {
        let bit_delay = Duration::from_secs(1) / DEFAULT_BAUD_RATE;
        Self {
            bit_delay,
            runs: DEFAULT_IDEMPOTENCE_RUNS,
            run_delay: bit_delay * DEFAULT_IDEMPOTENCE_DELAY_BITS,
        }
    }
}

impl LinkTiming {
    /// Derive timing from a baud rate
    ///
    /// # Arguments
    ///
    /// * `baud_rate` - Bits per second; the bit delay is `1 / baud_rate` seconds
    /// * `runs` - Number of times each frame is sent
    /// * `delay_bits` - Pause between runs, in bit periods
    ///
    /// # Errors
    ///
    /// Returns error if `baud_rate` or `runs` is zero
    pub fn from_baud(baud_rate: u32, runs: u32, delay_bits: u32) -> Result<Self> {
        if baud_rate == 0 {
            return Err(FrameError::InvalidTiming(
                "baud_rate must be greater than 0".to_string(),
            ));
        }

        if runs == 0 {
            return Err(FrameError::InvalidTiming(
                "idempotence_runs must be greater than 0".to_string(),
            ));
        }

        let bit_delay = Duration::from_secs(1) / baud_rate;
        Ok(Self {
            bit_delay,
            runs,
            run_delay: bit_delay * delay_bits,
        })
    }

    /// Time to emit one run of `bits` bits
    pub fn run_duration(&self, bits: u32) -> Duration {
        self.bit_delay * bits
    }

    /// Time to emit every run of `bits` bits, including inter-run pauses
    pub fn total_duration(&self, bits: u32) -> Duration {
        self.run_duration(bits) * self.runs + self.run_delay * self.runs.saturating_sub(1)
    }
}

/// Outcome of a completed transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitReport {
    /// Runs sent
    pub runs: u32,

    /// Bits in one run
    pub bits_per_run: u32,

    /// Bits emitted across all runs
    pub bits_emitted: u64,
}

/// Sends frames over a [`BitPort`]
pub struct Transmitter<P> {
    port: P,
    timing: LinkTiming,
}

impl<P> std::fmt::Debug for Transmitter<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transmitter")
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

impl<P: BitPort> Transmitter<P> {
    pub fn new(port: P, timing: LinkTiming) -> Self {
        Self { port, timing }
    }

    pub fn timing(&self) -> &LinkTiming {
        &self.timing
    }

    pub fn into_port(self) -> P {
        self.port
    }

    /// Transmit a frame with blind redundancy
    ///
    /// Each run emits every bit of the frame msb-first, holding the line for
    /// one bit delay after each. Runs are separated by the run delay.
    ///
    /// # Errors
    ///
    /// Returns error if the port fails; remaining runs are not attempted
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bitframe::frame::encoder::FrameEncoder;
    /// use bitframe::frame::protocol::FrameLayout;
    /// use bitframe::serial::port_trait::WriterPort;
    /// use bitframe::serial::{LinkTiming, Transmitter};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let frame = FrameEncoder::new(FrameLayout::default())?.encode(5, 3)?;
    ///     let port = WriterPort::new(tokio::io::stdout());
    ///     let mut transmitter = Transmitter::new(port, LinkTiming::default());
    ///     transmitter.transmit(&frame).await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn transmit(&mut self, frame: &Frame) -> Result<TransmitReport> {
        let bits = frame.bits();
        let bits_per_run = bits.len() as u32;

        info!(
            "Transmitting frame {} ({} bits, {} runs, ~{:?})",
            frame,
            bits_per_run,
            self.timing.runs,
            self.timing.total_duration(bits_per_run)
        );

        for run in 0..self.timing.runs {
            if run > 0 {
                self.port.hold(self.timing.run_delay).await?;
            }

            for bit in bits.iter().by_vals() {
                self.port.emit_bit(bit).await?;
                self.port.hold(self.timing.bit_delay).await?;
            }

            self.port.flush().await?;
            debug!("Completed run {}/{}", run + 1, self.timing.runs);
        }

        Ok(TransmitReport {
            runs: self.timing.runs,
            bits_per_run,
            bits_emitted: u64::from(bits_per_run) * u64::from(self.timing.runs),
        })
    }
}
