//! In-memory serial backend for tests.
//!
//! A `MockBackend` is cheap to clone; every clone (and every port it opens)
//! shares the same device table, so a test can keep one handle to inject
//! received bytes and inspect written bytes while the code under test owns
//! another.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::transport::{SerialBackend, SerialConfig, SerialIo, TransportError};

#[derive(Debug, Default)]
struct MockState {
    devices: Vec<String>,
    rx: HashMap<String, VecDeque<u8>>,
    tx: HashMap<String, Vec<u8>>,
    opened: Vec<(String, SerialConfig)>,
    fail_io: bool,
    fail_open: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn new<I, S>(devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let backend = Self::default();
        backend.set_devices(devices);
        backend
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the set of devices the OS reports.
    pub fn set_devices<I, S>(&self, devices: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut devices: Vec<String> = devices.into_iter().map(Into::into).collect();
        devices.sort();
        self.lock().devices = devices;
    }

    /// Queue bytes as if the device had sent them.
    pub fn inject_rx(&self, device: &str, bytes: &[u8]) {
        self.lock()
            .rx
            .entry(device.to_string())
            .or_default()
            .extend(bytes.iter().copied());
    }

    /// Drain everything written to `device` so far.
    pub fn take_tx(&self, device: &str) -> Vec<u8> {
        self.lock().tx.remove(device).unwrap_or_default()
    }

    /// Make every subsequent I/O call fail with an OS-level error.
    pub fn set_fail_io(&self, fail: bool) {
        self.lock().fail_io = fail;
    }

    /// Make every subsequent open fail even for listed devices.
    pub fn set_fail_open(&self, fail: bool) {
        self.lock().fail_open = fail;
    }

    /// Every successful open, in order.
    pub fn opened(&self) -> Vec<(String, SerialConfig)> {
        self.lock().opened.clone()
    }
}

impl SerialBackend for MockBackend {
    fn list_devices(&self) -> Result<Vec<String>, TransportError> {
        Ok(self.lock().devices.clone())
    }

    fn open(
        &self,
        device: &str,
        config: &SerialConfig,
    ) -> Result<Box<dyn SerialIo>, TransportError> {
        let mut state = self.lock();
        if !state.devices.iter().any(|d| d == device) {
            return Err(TransportError::ConnectionFailed(format!(
                "{device}: no such device"
            )));
        }
        if state.fail_open {
            return Err(TransportError::ConnectionFailed(format!(
                "{device}: access denied"
            )));
        }
        state.opened.push((device.to_string(), *config));
        Ok(Box::new(MockPort {
            device: device.to_string(),
            backend: self.clone(),
        }))
    }
}

struct MockPort {
    device: String,
    backend: MockBackend,
}

impl MockPort {
    fn check(&self, state: &MockState) -> Result<(), TransportError> {
        if state.fail_io {
            return Err(TransportError::Io("simulated driver failure".into()));
        }
        if !state.devices.iter().any(|d| *d == self.device) {
            return Err(TransportError::Io(format!("{}: device removed", self.device)));
        }
        Ok(())
    }
}

impl SerialIo for MockPort {
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut state = self.backend.lock();
        self.check(&state)?;
        state
            .tx
            .entry(self.device.clone())
            .or_default()
            .extend_from_slice(data);
        Ok(())
    }

    fn read_bytes(&mut self, max: usize) -> Result<Vec<u8>, TransportError> {
        let mut state = self.backend.lock();
        self.check(&state)?;
        let Some(queue) = state.rx.get_mut(&self.device) else {
            return Ok(Vec::new());
        };
        let n = max.min(queue.len());
        Ok(queue.drain(..n).collect())
    }

    fn bytes_available(&mut self) -> Result<usize, TransportError> {
        let state = self.backend.lock();
        self.check(&state)?;
        Ok(state.rx.get(&self.device).map_or(0, VecDeque::len))
    }
}
