//! # Frame Module
//!
//! Bit-packed frame encoding.
//!
//! This module handles:
//! - Packing leading bit, source, destination and data into a header
//! - Complement-sum checksum over the header
//! - Placing the checksum per the configured policy

pub mod protocol;
pub mod encoder;
pub mod checksum;
