//! # bitframe
//!
//! Point-to-point message framing over a bit-serial line.
//!
//! This library packs a leading marker bit, source and destination addresses
//! and a data payload into a single integer, appends a complement-sum
//! checksum, and emits the result as a timed bit stream repeated several
//! times for blind redundancy.

pub mod config;
pub mod error;
pub mod frame;
pub mod serial;
