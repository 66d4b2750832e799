use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local};

/// Usage record of one connection
///
/// Counters only grow while the port is open and go back to zero on close.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortStats {
    pub opened_at: Option<DateTime<Local>>,
    pub last_sent_at: Option<DateTime<Local>>,
    pub last_received_at: Option<DateTime<Local>>,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

/// Shared, lock-guarded [`PortStats`]
///
/// Clones observe the same record; the connection writes it, anyone holding a
/// clone may read it.
#[derive(Debug, Clone, Default)]
pub struct StatsHandle {
    inner: Arc<Mutex<PortStats>>,
}

impl StatsHandle {
    fn lock(&self) -> MutexGuard<'_, PortStats> {
        // Every update is a whole-field write, so a poisoned record is still usable
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> PortStats {
        self.lock().clone()
    }

    pub(crate) fn record_open(&self) {
        let mut stats = self.lock();
        *stats = PortStats {
            opened_at: Some(Local::now()),
            ..PortStats::default()
        };
    }

    pub(crate) fn record_sent(&self, n: usize) {
        let mut stats = self.lock();
        stats.bytes_sent = stats.bytes_sent.saturating_add(n as u64);
        stats.last_sent_at = Some(Local::now());
    }

    pub(crate) fn record_received(&self, n: usize) {
        if n == 0 {
            return;
        }
        let mut stats = self.lock();
        stats.bytes_received = stats.bytes_received.saturating_add(n as u64);
        stats.last_received_at = Some(Local::now());
    }

    pub(crate) fn reset(&self) {
        *self.lock() = PortStats::default();
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate_and_reset() {
        let stats = StatsHandle::default();
        stats.record_open();
        stats.record_sent(3);
        stats.record_sent(2);
        stats.record_received(7);

        let observer = stats.clone();
        let snap = observer.snapshot();
        assert_eq!(snap.bytes_sent, 5);
        assert_eq!(snap.bytes_received, 7);
        assert!(snap.opened_at.is_some());
        assert!(snap.last_sent_at.is_some());

        stats.reset();
        assert_eq!(observer.snapshot(), PortStats::default());
    }

    #[test]
    fn test_empty_read_does_not_touch_timestamp() {
        let stats = StatsHandle::default();
        stats.record_received(0);
        assert!(stats.snapshot().last_received_at.is_none());
    }
}
