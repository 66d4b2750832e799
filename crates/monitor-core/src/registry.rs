use core_types::{SerialBackend, SerialConfig};
use monitor_protocol::{MonitorError, PortInfo, PortSnapshot, PortState};

use crate::connection::PortConnection;
use actor_runtime::{monitor_info, monitor_warn};

struct Slot {
    conn: PortConnection,
    state: PortState,
}

/// What a device scan changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Some slot changed state
    pub changed: bool,
    /// The active port whose device vanished (its handle has been closed)
    pub lost_active: Option<String>,
}

/// Fixed set of port slots with at most one open ("active") port.
///
/// Individual connections know nothing about each other; the single-open
/// rule lives here. The only way to open a slot is [`activate_one`], which
/// closes the previous active port first.
///
/// [`activate_one`]: PortRegistry::activate_one
pub struct PortRegistry {
    slots: Vec<Slot>,
    active: Option<usize>,
    params: SerialConfig,
}

impl PortRegistry {
    pub fn new<I, S>(names: I, params: SerialConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots = names
            .into_iter()
            .map(|name| Slot {
                conn: PortConnection::new(name),
                state: PortState::Disconnected,
            })
            .collect();
        Self {
            slots,
            active: None,
            params,
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.slots.iter().map(|s| s.conn.device_name()).collect()
    }

    pub fn states(&self) -> Vec<PortState> {
        self.slots.iter().map(|s| s.state).collect()
    }

    pub fn state_of(&self, name: &str) -> Option<PortState> {
        self.index_of(name)
            .and_then(|i| self.slots.get(i))
            .map(|s| s.state)
    }

    pub fn snapshots(&self) -> Vec<PortSnapshot> {
        self.slots
            .iter()
            .map(|s| PortSnapshot::new(s.conn.device_name(), s.state))
            .collect()
    }

    /// Parameters used for the next open.
    pub fn params(&self) -> SerialConfig {
        self.params
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    fn active_slot(&self) -> Option<&Slot> {
        self.active.and_then(|i| self.slots.get(i))
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active_slot().map(|s| s.conn.device_name())
    }

    pub fn active_info(&self) -> Option<PortInfo> {
        self.active_slot().and_then(|s| s.conn.info())
    }

    pub fn active_connection_mut(&mut self) -> Result<&mut PortConnection, MonitorError> {
        let idx = self.active.ok_or(MonitorError::NoActivePort)?;
        self.slots
            .get_mut(idx)
            .map(|s| &mut s.conn)
            .ok_or(MonitorError::NoActivePort)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.conn.device_name() == name)
    }

    fn transition(&mut self, idx: usize, new_state: PortState) -> Result<bool, MonitorError> {
        let slot = self
            .slots
            .get_mut(idx)
            .ok_or_else(|| MonitorError::InvalidTransition(format!("no slot #{idx}")))?;
        if !slot.state.can_transition_to(new_state) {
            return Err(MonitorError::InvalidTransition(format!(
                "{}: {:?} → {:?}",
                slot.conn.device_name(),
                slot.state,
                new_state
            )));
        }
        let changed = slot.state != new_state;
        slot.state = new_state;
        Ok(changed)
    }

    /// Recompute every slot from the enumerated device names.
    ///
    /// Slots whose device is listed become `Closed` (or stay `Open` while the
    /// handle lives); unlisted slots become `Disconnected`. An open handle
    /// whose device disappeared is closed.
    pub fn update_connection_state(&mut self, devices: &[String]) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        for idx in 0..self.slots.len() {
            let Some(slot) = self.slots.get_mut(idx) else {
                continue;
            };
            let present = devices.iter().any(|d| d == slot.conn.device_name());

            let new_state = match (slot.conn.is_alive(), present) {
                (true, true) => PortState::Open,
                (true, false) => {
                    let _ = slot.conn.close();
                    if self.active == Some(idx) {
                        self.active = None;
                        outcome.lost_active = Some(slot.conn.device_name().to_string());
                    }
                    PortState::Disconnected
                }
                (false, true) => PortState::Closed,
                (false, false) => PortState::Disconnected,
            };

            match self.transition(idx, new_state) {
                Ok(changed) => outcome.changed |= changed,
                Err(e) => monitor_warn!("Port scan: {}", e),
            }
        }

        if let Some(name) = &outcome.lost_active {
            monitor_warn!("{} disappeared while open", name);
        }
        outcome
    }

    /// Make `name` the only open port, or close the active port for `None`.
    ///
    /// The previous active port is closed before the new one is opened. If
    /// the open fails, no port is active afterwards.
    pub fn activate_one(
        &mut self,
        name: Option<&str>,
        backend: &dyn SerialBackend,
    ) -> Result<(), MonitorError> {
        let target = match name {
            None => None,
            Some(n) => Some(
                self.index_of(n)
                    .ok_or_else(|| MonitorError::UnknownPort(n.to_string()))?,
            ),
        };

        if target.is_some() && target == self.active {
            return Ok(());
        }

        if let Some(idx) = target {
            let state = self.slots.get(idx).map(|s| s.state);
            if state == Some(PortState::Disconnected) {
                return Err(MonitorError::PortUnavailable(
                    name.unwrap_or_default().to_string(),
                ));
            }
        }

        self.deactivate();

        let Some(idx) = target else {
            return Ok(());
        };
        let params = self.params;
        let slot = self
            .slots
            .get_mut(idx)
            .ok_or_else(|| MonitorError::UnknownPort(name.unwrap_or_default().to_string()))?;
        slot.conn.open(backend, params)?;
        self.transition(idx, PortState::Open)?;
        self.active = Some(idx);
        monitor_info!(
            "Activated {} at {} baud",
            name.unwrap_or_default(),
            params.baud_rate
        );
        Ok(())
    }

    /// Close the active port. Returns its name if one was open.
    pub fn deactivate(&mut self) -> Option<String> {
        let idx = self.active.take()?;
        let slot = self.slots.get_mut(idx)?;
        let name = slot.conn.device_name().to_string();
        if let Err(e) = slot.conn.close() {
            monitor_warn!("Closing {}: {}", name, e);
        }
        if let Err(e) = self.transition(idx, PortState::Closed) {
            monitor_warn!("{}", e);
        }
        monitor_info!("Deactivated {}", name);
        Some(name)
    }

    /// Store new parameters and reopen the active port with them.
    pub fn set_params_and_reopen(
        &mut self,
        params: SerialConfig,
        backend: &dyn SerialBackend,
    ) -> Result<(), MonitorError> {
        self.params = params;
        let Some(name) = self.deactivate() else {
            return Ok(());
        };
        self.activate_one(Some(&name), backend)
    }

    /// First closed slot, when nothing is active.
    pub fn auto_connect_target(&self) -> Option<&str> {
        if self.has_active() {
            return None;
        }
        self.slots
            .iter()
            .find(|s| s.state == PortState::Closed)
            .map(|s| s.conn.device_name())
    }
}

impl Drop for PortRegistry {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use core_types::mock::MockBackend;

    fn devices(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn registry() -> PortRegistry {
        PortRegistry::new(["COM1", "COM2", "COM3"], SerialConfig::new(9600, 100))
    }

    fn open_count(reg: &PortRegistry) -> usize {
        reg.states().iter().filter(|s| **s == PortState::Open).count()
    }

    #[test]
    fn test_scan_maps_devices_to_states() {
        let mut reg = registry();
        assert_eq!(reg.states(), vec![PortState::Disconnected; 3]);

        let outcome = reg.update_connection_state(&devices(&["COM2", "/dev/ttyS0"]));
        assert!(outcome.changed);
        assert_eq!(
            reg.states(),
            vec![PortState::Disconnected, PortState::Closed, PortState::Disconnected]
        );

        let again = reg.update_connection_state(&devices(&["COM2"]));
        assert!(!again.changed);
    }

    #[test]
    fn test_activate_switches_single_open_port() {
        let backend = MockBackend::new(["COM1", "COM2"]);
        let mut reg = registry();
        reg.update_connection_state(&backend.list_devices().unwrap());

        reg.activate_one(Some("COM1"), &backend).unwrap();
        assert_eq!(reg.active_name(), Some("COM1"));
        assert_eq!(reg.state_of("COM1"), Some(PortState::Open));

        reg.activate_one(Some("COM2"), &backend).unwrap();
        assert_eq!(reg.active_name(), Some("COM2"));
        assert_eq!(reg.state_of("COM1"), Some(PortState::Closed));
        assert_eq!(reg.state_of("COM2"), Some(PortState::Open));
        assert_eq!(open_count(&reg), 1);

        reg.activate_one(None, &backend).unwrap();
        assert!(!reg.has_active());
        assert_eq!(open_count(&reg), 0);
    }

    #[test]
    fn test_activate_rejects_unknown_and_disconnected() {
        let backend = MockBackend::new(["COM1"]);
        let mut reg = registry();
        reg.update_connection_state(&backend.list_devices().unwrap());
        reg.activate_one(Some("COM1"), &backend).unwrap();

        assert_eq!(
            reg.activate_one(Some("COM9"), &backend),
            Err(MonitorError::UnknownPort("COM9".into()))
        );
        assert_eq!(
            reg.activate_one(Some("COM3"), &backend),
            Err(MonitorError::PortUnavailable("COM3".into()))
        );
        // Rejected requests leave the active port alone
        assert_eq!(reg.active_name(), Some("COM1"));
    }

    #[test]
    fn test_failed_open_leaves_nothing_active() {
        let backend = MockBackend::new(["COM1", "COM2"]);
        let mut reg = registry();
        reg.update_connection_state(&backend.list_devices().unwrap());
        reg.activate_one(Some("COM1"), &backend).unwrap();

        // COM2 vanishes between the scan and the open
        backend.set_devices(["COM1"]);
        assert!(reg.activate_one(Some("COM2"), &backend).is_err());
        assert!(!reg.has_active());
        assert_eq!(open_count(&reg), 0);
    }

    #[test]
    fn test_unplug_closes_active_port() {
        let backend = MockBackend::new(["COM1"]);
        let mut reg = registry();
        reg.update_connection_state(&backend.list_devices().unwrap());
        reg.activate_one(Some("COM1"), &backend).unwrap();

        let outcome = reg.update_connection_state(&[]);
        assert_eq!(outcome.lost_active.as_deref(), Some("COM1"));
        assert!(!reg.has_active());
        assert_eq!(reg.state_of("COM1"), Some(PortState::Disconnected));
    }

    #[test]
    fn test_reopen_with_new_params() {
        let backend = MockBackend::new(["COM2"]);
        let mut reg = registry();
        reg.update_connection_state(&backend.list_devices().unwrap());
        reg.activate_one(Some("COM2"), &backend).unwrap();

        reg.set_params_and_reopen(SerialConfig::new(115200, 100), &backend)
            .unwrap();
        assert_eq!(reg.active_info().unwrap().baud_rate, 115200);
        let opened = backend.opened();
        assert_eq!(opened.len(), 2);
        assert_eq!(opened[1].1.baud_rate, 115200);
    }

    #[test]
    fn test_params_without_active_port() {
        let backend = MockBackend::new(["COM2"]);
        let mut reg = registry();
        reg.set_params_and_reopen(SerialConfig::new(300, 100), &backend)
            .unwrap();
        assert_eq!(reg.params().baud_rate, 300);
        assert!(backend.opened().is_empty());
    }

    #[test]
    fn test_auto_connect_target() {
        let backend = MockBackend::new(["COM2", "COM3"]);
        let mut reg = registry();
        assert_eq!(reg.auto_connect_target(), None);

        reg.update_connection_state(&backend.list_devices().unwrap());
        assert_eq!(reg.auto_connect_target(), Some("COM2"));

        reg.activate_one(Some("COM3"), &backend).unwrap();
        assert_eq!(reg.auto_connect_target(), None);
    }
}
