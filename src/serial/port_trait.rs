//! Trait abstraction for bit-serial port operations to enable testing

use async_trait::async_trait;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Trait for bit-serial output
///
/// The port owns waiting as well as emitting so that line timing can be
/// observed without a real clock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BitPort: Send {
    /// Emit a single bit
    async fn emit_bit(&mut self, bit: bool) -> io::Result<()>;

    /// Hold the line for `duration`
    async fn hold(&mut self, duration: Duration) -> io::Result<()>;

    /// Flush any buffered output
    async fn flush(&mut self) -> io::Result<()>;
}

/// Emits each bit as an ASCII `0`/`1` line on an async writer
pub struct WriterPort<W> {
    writer: W,
}

impl<W> WriterPort<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W> BitPort for WriterPort<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn emit_bit(&mut self, bit: bool) -> io::Result<()> {
        let line: &[u8] = if bit { b"1\n" } else { b"0\n" };
        self.writer.write_all(line).await?;
        // Each bit must be visible before the line is held
        self.writer.flush().await
    }

    async fn hold(&mut self, duration: Duration) -> io::Result<()> {
        tokio::time::sleep(duration).await;
        Ok(())
    }

    async fn flush(&mut self) -> io::Result<()> {
        self.writer.flush().await
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Something the port was asked to do
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum PortEvent {
        Bit(bool),
        Hold(Duration),
        Flush,
    }

    /// Mock port that records every call in order
    #[derive(Clone)]
    pub struct RecordingPort {
        pub events: Arc<Mutex<Vec<PortEvent>>>,
        pub emit_error: Arc<Mutex<Option<io::ErrorKind>>>,
    }

    impl RecordingPort {
        pub fn new() -> Self {
            Self {
                events: Arc::new(Mutex::new(Vec::new())),
                emit_error: Arc::new(Mutex::new(None)),
            }
        }

        pub fn events(&self) -> Vec<PortEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn emitted_bits(&self) -> Vec<bool> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    PortEvent::Bit(bit) => Some(bit),
                    _ => None,
                })
                .collect()
        }

        pub fn holds(&self) -> Vec<Duration> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    PortEvent::Hold(duration) => Some(duration),
                    _ => None,
                })
                .collect()
        }

        pub fn set_emit_error(&self, error: io::ErrorKind) {
            *self.emit_error.lock().unwrap() = Some(error);
        }
    }

    #[async_trait]
    impl BitPort for RecordingPort {
        async fn emit_bit(&mut self, bit: bool) -> io::Result<()> {
            if let Some(error) = *self.emit_error.lock().unwrap() {
                return Err(io::Error::new(error, "Mock emit error"));
            }
            self.events.lock().unwrap().push(PortEvent::Bit(bit));
            Ok(())
        }

        async fn hold(&mut self, duration: Duration) -> io::Result<()> {
            self.events.lock().unwrap().push(PortEvent::Hold(duration));
            Ok(())
        }

        async fn flush(&mut self) -> io::Result<()> {
            self.events.lock().unwrap().push(PortEvent::Flush);
            Ok(())
        }
    }
}
