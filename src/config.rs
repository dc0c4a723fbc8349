//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{FrameError, Result};
use crate::frame::protocol::{
    ChecksumPolicy, FrameLayout, DEFAULT_DATA_WIDTH, DEFAULT_PORT_WIDTH, DEFAULT_SOURCE_ADDRESS,
};
use crate::serial::{
    LinkTiming, DEFAULT_BAUD_RATE, DEFAULT_IDEMPOTENCE_DELAY_BITS, DEFAULT_IDEMPOTENCE_RUNS,
};

/// Upper bound on repetitions of a single frame
const MAX_IDEMPOTENCE_RUNS: u32 = 100;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub frame: FrameConfig,

    #[serde(default)]
    pub link: LinkConfig,
}

/// Frame layout configuration
#[derive(Debug, Deserialize, Clone)]
pub struct FrameConfig {
    #[serde(default = "default_port_width")]
    pub port_width: u32,

    #[serde(default = "default_data_width")]
    pub data_width: u32,

    #[serde(default = "default_source_address")]
    pub source_address: u64,

    #[serde(default)]
    pub checksum_policy: ChecksumPolicy,
}

/// Bit-serial link configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LinkConfig {
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_idempotence_runs")]
    pub idempotence_runs: u32,

    #[serde(default = "default_idempotence_delay_bits")]
    pub idempotence_delay_bits: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            port_width: default_port_width(),
            data_width: default_data_width(),
            source_address: default_source_address(),
            checksum_policy: ChecksumPolicy::default(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud_rate: default_baud_rate(),
            idempotence_runs: default_idempotence_runs(),
            idempotence_delay_bits: default_idempotence_delay_bits(),
        }
    }
}

// Default value functions
fn default_port_width() -> u32 { DEFAULT_PORT_WIDTH }
fn default_data_width() -> u32 { DEFAULT_DATA_WIDTH }
fn default_source_address() -> u64 { DEFAULT_SOURCE_ADDRESS }

fn default_baud_rate() -> u32 { DEFAULT_BAUD_RATE }
fn default_idempotence_runs() -> u32 { DEFAULT_IDEMPOTENCE_RUNS }
fn default_idempotence_delay_bits() -> u32 { DEFAULT_IDEMPOTENCE_DELAY_BITS }

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bitframe::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Frame layout described by this configuration
    pub fn layout(&self) -> FrameLayout {
        FrameLayout {
            port_width: self.frame.port_width,
            data_width: self.frame.data_width,
            source_address: self.frame.source_address,
            checksum_policy: self.frame.checksum_policy,
        }
    }

    /// Link timing described by this configuration
    ///
    /// # Errors
    ///
    /// Returns error if the baud rate or run count is zero
    pub fn timing(&self) -> Result<LinkTiming> {
        LinkTiming::from_baud(
            self.link.baud_rate,
            self.link.idempotence_runs,
            self.link.idempotence_delay_bits,
        )
    }

    /// Validate configuration values
    ///
    /// # Returns
    ///
    /// * `Result<()>` - Ok if valid, Err if invalid
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        // Widths, packing limit and source address
        self.layout().validate()?;

        if self.link.baud_rate == 0 {
            return Err(FrameError::Config(toml::de::Error::custom(
                "baud_rate must be greater than 0",
            )));
        }

        if self.link.idempotence_runs == 0 || self.link.idempotence_runs > MAX_IDEMPOTENCE_RUNS {
            return Err(FrameError::Config(toml::de::Error::custom(format!(
                "idempotence_runs must be between 1 and {}",
                MAX_IDEMPOTENCE_RUNS
            ))));
        }

        Ok(())
    }
}
