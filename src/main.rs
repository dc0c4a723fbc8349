//! # bitframe
//!
//! Encode a single frame and transmit it as a bit stream on stdout.
//!
//! ```text
//! bitframe [DESTINATION] [DATA]
//! ```

use anyhow::{Context, Result};
use tracing::info;

use bitframe::config::Config;
use bitframe::frame::encoder::FrameEncoder;
use bitframe::serial::port_trait::WriterPort;
use bitframe::serial::Transmitter;

/// Environment variable naming the configuration file
const CONFIG_ENV: &str = "BITFRAME_CONFIG";

/// Destination used when none is given on the command line
const DEFAULT_DESTINATION: u64 = 5;

/// Payload used when none is given on the command line
const DEFAULT_DATA: u64 = 3;

/// Main entry point for bitframe
///
/// # Control Flow
///
/// 1. Set up logging on stderr (stdout carries the bit stream)
/// 2. Load configuration from `BITFRAME_CONFIG`, or use built-in defaults
/// 3. Encode `(destination, data)` into a frame
/// 4. Transmit the frame to stdout with the configured redundancy
///
/// # Errors
///
/// Returns error if:
/// - The configuration file cannot be read or is invalid
/// - An argument is not a number or does not fit its field
/// - Writing to stdout fails
///
/// # Examples
///
/// ```bash
/// cargo run --release -- 5 3
/// ```
///
/// Expected output (stderr):
/// ```text
/// INFO bitframe: bitframe v0.1.0 starting...
/// INFO bitframe::serial: Transmitting frame 1000000010000010100000011100110 (31 bits, 5 runs, ~162.499935ms)
/// INFO bitframe: Sent 155 bits in 5 runs
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("bitframe v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            info!("Loading configuration from {}", path.to_string_lossy());
            Config::load(&path)
                .with_context(|| format!("failed to load {}", path.to_string_lossy()))?
        }
        None => Config::default(),
    };

    let mut args = std::env::args().skip(1);
    let destination = parse_arg(args.next(), "destination", DEFAULT_DESTINATION)?;
    let data = parse_arg(args.next(), "data", DEFAULT_DATA)?;

    let encoder = FrameEncoder::new(config.layout())?;
    let frame = encoder
        .encode(destination, data)
        .with_context(|| format!("cannot frame destination={} data={}", destination, data))?;

    info!(
        "Encoded source={} destination={} data={} checksum={:#b} -> {}",
        frame.source(),
        frame.destination(),
        frame.data(),
        frame.checksum(),
        frame.value()
    );

    let mut transmitter = Transmitter::new(WriterPort::new(tokio::io::stdout()), config.timing()?);
    let report = transmitter.transmit(&frame).await?;

    info!("Sent {} bits in {} runs", report.bits_emitted, report.runs);

    Ok(())
}

/// Parse an optional numeric argument, falling back to `default`
fn parse_arg(arg: Option<String>, name: &str, default: u64) -> Result<u64> {
    match arg {
        Some(value) => value
            .parse()
            .with_context(|| format!("{} must be a non-negative integer, got {:?}", name, value)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arg_default() {
        assert_eq!(parse_arg(None, "data", DEFAULT_DATA).unwrap(), 3);
    }

    #[test]
    fn test_parse_arg_value() {
        assert_eq!(parse_arg(Some("42".to_string()), "data", 0).unwrap(), 42);
    }

    #[test]
    fn test_parse_arg_rejects_garbage() {
        let err = parse_arg(Some("-1".to_string()), "destination", 0).unwrap_err();
        assert!(err.to_string().contains("destination"));
    }

    #[test]
    fn test_demo_inputs_encode() {
        let encoder = FrameEncoder::new(Config::default().layout()).unwrap();
        let frame = encoder.encode(DEFAULT_DESTINATION, DEFAULT_DATA).unwrap();
        assert_eq!(frame.value(), 1_078_018_278);
    }
}
