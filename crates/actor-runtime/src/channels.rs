use futures_channel::mpsc;
use monitor_protocol::{MonitorError, SystemEvent, UiCommand};

use crate::monitor_debug;

/// Timer-driven poll kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Enumerate devices and refresh slot states
    PortScan,
    /// Drain pending bytes from the active port
    Receive,
}

/// Everything the monitor actor can receive
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorMessage {
    /// Commands from UI
    UiCommand(UiCommand),
    /// Timer ticks
    Tick(Tick),
}

/// Handles for running the actor
pub struct MonitorHandles {
    pub monitor_rx: mpsc::Receiver<MonitorMessage>,
    pub event_tx: mpsc::Sender<SystemEvent>,
}

/// Channel manager for UI ↔ actor communication
pub struct ChannelManager {
    // Bounded so a stalled actor cannot grow the queue without limit
    monitor_tx: mpsc::Sender<MonitorMessage>,
    event_rx: mpsc::Receiver<SystemEvent>,
}

impl ChannelManager {
    /// Create a new channel manager and actor handles
    ///
    /// Returns (ChannelManager for UI, MonitorHandles for the actor)
    ///
    /// Channel capacities:
    /// - monitor_tx: 256 - UI commands and ticks (a 10 ms receive tick fills
    ///   it only if the actor is stalled for seconds)
    /// - event_tx: 8192 - Log text and status for UI (high frequency)
    pub fn new() -> (Self, MonitorHandles) {
        let (monitor_tx, monitor_rx) = mpsc::channel(256);
        let (event_tx, event_rx) = mpsc::channel(8192);

        let handles = MonitorHandles {
            monitor_rx,
            event_tx,
        };

        let manager = Self {
            monitor_tx,
            event_rx,
        };

        (manager, handles)
    }

    // One long-lived sender: per-message clones each get a free slot and bypass the bound
    fn send(&mut self, msg: MonitorMessage) -> Result<(), MonitorError> {
        self.monitor_tx.try_send(msg).map_err(|e| {
            if e.is_full() {
                MonitorError::Overloaded("Too many pending commands. Please slow down.".into())
            } else {
                MonitorError::ChannelClosed("Monitor has shut down".into())
            }
        })
    }

    /// Send a UI command to the monitor
    pub fn send_command(&mut self, cmd: UiCommand) -> Result<(), MonitorError> {
        monitor_debug!("UI command: {:?}", cmd);
        self.send(MonitorMessage::UiCommand(cmd))
    }

    /// Deliver a timer tick
    ///
    /// A tick that finds the queue full is an error the caller may ignore:
    /// the next tick will do the same work.
    pub fn send_tick(&mut self, tick: Tick) -> Result<(), MonitorError> {
        self.send(MonitorMessage::Tick(tick))
    }

    /// Get mutable reference to event receiver
    pub fn event_receiver(&mut self) -> &mut mpsc::Receiver<SystemEvent> {
        &mut self.event_rx
    }

    /// Take ownership of event receiver
    pub fn take_event_receiver(&mut self) -> mpsc::Receiver<SystemEvent> {
        let (_new_tx, new_rx) = mpsc::channel(1);
        // _new_tx is dropped: the receiver should only be taken once
        std::mem::replace(&mut self.event_rx, new_rx)
    }
}

impl Default for ChannelManager {
    fn default() -> Self {
        Self::new().0
    }
}
