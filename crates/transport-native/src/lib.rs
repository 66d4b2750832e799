//! # Native Transport
//!
//! [`SerialBackend`] over the `serialport` crate: OS device enumeration and
//! blocking 8N1 handles without flow control.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use actor_runtime::monitor_debug;
use core_types::{SerialBackend, SerialConfig, SerialIo, TransportError};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

fn io_error(e: impl std::fmt::Display) -> TransportError {
    TransportError::Io(e.to_string())
}

/// Serial ports as the operating system reports them.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl NativeBackend {
    pub fn new() -> Self {
        Self
    }
}

impl SerialBackend for NativeBackend {
    fn list_devices(&self) -> Result<Vec<String>, TransportError> {
        let mut names: Vec<String> = serialport::available_ports()
            .map_err(io_error)?
            .into_iter()
            .map(|p| p.port_name)
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    fn open(
        &self,
        device: &str,
        config: &SerialConfig,
    ) -> Result<Box<dyn SerialIo>, TransportError> {
        let port = serialport::new(device, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(config.timeout_ms))
            .open()
            .map_err(|e| TransportError::ConnectionFailed(format!("{device}: {e}")))?;

        monitor_debug!("Opened {} at {} baud (8N1)", device, config.baud_rate);
        Ok(Box::new(NativePort { port }))
    }
}

/// An open OS serial handle.
pub struct NativePort {
    port: Box<dyn SerialPort>,
}

impl SerialIo for NativePort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.port.write_all(data).map_err(io_error)?;
        self.port.flush().map_err(io_error)
    }

    fn read_bytes(&mut self, max: usize) -> Result<Vec<u8>, TransportError> {
        let mut buf = vec![0u8; max];
        match self.port.read(&mut buf) {
            Ok(n) => {
                buf.truncate(n);
                Ok(buf)
            }
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(Vec::new()),
            Err(e) => Err(io_error(e)),
        }
    }

    fn bytes_available(&mut self) -> Result<usize, TransportError> {
        let pending = self.port.bytes_to_read().map_err(io_error)?;
        Ok(usize::try_from(pending).unwrap_or(usize::MAX))
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_is_sorted() {
        // Whatever the host has, the list comes back sorted and unique
        if let Ok(names) = NativeBackend::new().list_devices() {
            let mut sorted = names.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(names, sorted);
        }
    }

    #[test]
    fn test_open_missing_device_fails() {
        let result = NativeBackend::new().open(
            "/dev/moromonitor-does-not-exist",
            &SerialConfig::new(9600, 100),
        );
        assert!(matches!(result, Err(TransportError::ConnectionFailed(_))));
    }
}
