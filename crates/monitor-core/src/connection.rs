use core_types::{SerialBackend, SerialConfig, SerialIo};
use monitor_protocol::{MonitorError, PortInfo, PortState};

use crate::stats::{PortStats, StatsHandle};
use actor_runtime::monitor_debug;

/// One port slot's connection: the device name plus, while open, the
/// platform handle.
///
/// Every I/O call on a closed connection fails with
/// [`MonitorError::PortClosed`]; OS failures come back as
/// [`MonitorError::Io`].
pub struct PortConnection {
    device_name: String,
    handle: Option<Box<dyn SerialIo>>,
    config: Option<SerialConfig>,
    stats: StatsHandle,
}

impl std::fmt::Debug for PortConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortConnection")
            .field("device_name", &self.device_name)
            .field("open", &self.handle.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl PortConnection {
    pub fn new(device_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            handle: None,
            config: None,
            stats: StatsHandle::default(),
        }
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn open(
        &mut self,
        backend: &dyn SerialBackend,
        config: SerialConfig,
    ) -> Result<(), MonitorError> {
        if self.handle.is_some() {
            return Err(MonitorError::AlreadyOpen(self.device_name.clone()));
        }
        let handle = backend.open(&self.device_name, &config)?;
        self.handle = Some(handle);
        self.config = Some(config);
        self.stats.record_open();
        monitor_debug!("{} opened at {} baud", self.device_name, config.baud_rate);
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), MonitorError> {
        let handle = self.handle.take().ok_or(MonitorError::PortClosed)?;
        drop(handle);
        self.config = None;
        self.stats.reset();
        monitor_debug!("{} closed", self.device_name);
        Ok(())
    }

    pub fn is_alive(&self) -> bool {
        self.handle.is_some()
    }

    /// Parameters the handle was opened with.
    pub fn config(&self) -> Option<SerialConfig> {
        self.config
    }

    pub fn stats(&self) -> PortStats {
        self.stats.snapshot()
    }

    /// Shared view of the statistics record.
    pub fn stats_handle(&self) -> StatsHandle {
        self.stats.clone()
    }

    /// Details for display; `None` while closed.
    pub fn info(&self) -> Option<PortInfo> {
        let config = self.config?;
        let stats = self.stats.snapshot();
        Some(PortInfo {
            name: self.device_name.clone(),
            state: PortState::Open,
            baud_rate: config.baud_rate,
            bytes_sent: stats.bytes_sent,
            bytes_received: stats.bytes_received,
            opened_at: stats.opened_at,
            last_sent_at: stats.last_sent_at,
            last_received_at: stats.last_received_at,
        })
    }

    fn io(&mut self) -> Result<&mut Box<dyn SerialIo>, MonitorError> {
        self.handle.as_mut().ok_or(MonitorError::PortClosed)
    }

    pub fn send_bytes(&mut self, data: &[u8]) -> Result<(), MonitorError> {
        self.io()?.write_bytes(data)?;
        self.stats.record_sent(data.len());
        Ok(())
    }

    pub fn receive_bytes(&mut self, max: usize) -> Result<Vec<u8>, MonitorError> {
        let data = self.io()?.read_bytes(max)?;
        self.stats.record_received(data.len());
        Ok(data)
    }

    pub fn bytes_available(&mut self) -> Result<usize, MonitorError> {
        Ok(self.io()?.bytes_available()?)
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use core_types::mock::MockBackend;

    fn config() -> SerialConfig {
        SerialConfig::new(9600, 100)
    }

    #[test]
    fn test_io_on_closed_connection() {
        let mut conn = PortConnection::new("COM1");
        assert_eq!(conn.send_bytes(b"x"), Err(MonitorError::PortClosed));
        assert_eq!(conn.receive_bytes(1), Err(MonitorError::PortClosed));
        assert_eq!(conn.bytes_available(), Err(MonitorError::PortClosed));
        assert_eq!(conn.close(), Err(MonitorError::PortClosed));
        assert!(conn.info().is_none());
    }

    #[test]
    fn test_open_twice_rejected() {
        let backend = MockBackend::new(["COM1"]);
        let mut conn = PortConnection::new("COM1");
        conn.open(&backend, config()).unwrap();
        assert_eq!(
            conn.open(&backend, config()),
            Err(MonitorError::AlreadyOpen("COM1".into()))
        );
    }

    #[test]
    fn test_counters_track_io_and_reset_on_close() {
        let backend = MockBackend::new(["COM1"]);
        let mut conn = PortConnection::new("COM1");
        conn.open(&backend, config()).unwrap();

        conn.send_bytes(b"abc").unwrap();
        backend.inject_rx("COM1", b"hello");
        assert_eq!(conn.bytes_available().unwrap(), 5);
        assert_eq!(conn.receive_bytes(5).unwrap(), b"hello");

        let mut last_sent = 0;
        for chunk in [&b"d"[..], b"ef"] {
            conn.send_bytes(chunk).unwrap();
            let sent = conn.stats().bytes_sent;
            assert!(sent > last_sent);
            last_sent = sent;
        }

        let info = conn.info().unwrap();
        assert_eq!(info.bytes_sent, 6);
        assert_eq!(info.bytes_received, 5);
        assert_eq!(info.baud_rate, 9600);
        assert_eq!(backend.take_tx("COM1"), b"abcdef");

        let observer = conn.stats_handle();
        conn.close().unwrap();
        assert_eq!(observer.snapshot(), PortStats::default());
        assert!(!conn.is_alive());
    }

    #[test]
    fn test_os_error_surfaces_as_io() {
        let backend = MockBackend::new(["COM1"]);
        let mut conn = PortConnection::new("COM1");
        conn.open(&backend, config()).unwrap();
        backend.set_fail_io(true);

        let err = conn.send_bytes(b"x").unwrap_err();
        assert_eq!(err.kind(), "Io");
        assert_eq!(conn.stats().bytes_sent, 0);
    }

    #[test]
    fn test_open_missing_device_fails() {
        let backend = MockBackend::new(Vec::<String>::new());
        let mut conn = PortConnection::new("COM9");
        assert!(conn.open(&backend, config()).is_err());
        assert!(!conn.is_alive());
    }
}
