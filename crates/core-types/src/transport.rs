use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("IO Error: {0}")]
    Io(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Not connected")]
    NotConnected,
}

/// Serial parameters applied when a port is opened.
///
/// Data format is always 8N1 without flow control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialConfig {
    pub baud_rate: u32,
    /// Blocking read timeout in milliseconds.
    pub timeout_ms: u64,
}

impl SerialConfig {
    pub fn new(baud_rate: u32, timeout_ms: u64) -> Self {
        Self {
            baud_rate,
            timeout_ms,
        }
    }
}

/// An open, byte-oriented serial handle.
///
/// All calls block; implementations are expected to return quickly.
pub trait SerialIo: Send {
    /// Write all bytes to the device.
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Read up to `max` bytes. A read timeout yields an empty vector.
    fn read_bytes(&mut self, max: usize) -> Result<Vec<u8>, TransportError>;

    /// Number of bytes waiting in the input buffer.
    fn bytes_available(&mut self) -> Result<usize, TransportError>;
}

/// Platform access: device enumeration and opening handles.
pub trait SerialBackend: Send {
    /// Names of the serial devices currently present, sorted.
    fn list_devices(&self) -> Result<Vec<String>, TransportError>;

    fn open(&self, device: &str, config: &SerialConfig)
        -> Result<Box<dyn SerialIo>, TransportError>;
}
