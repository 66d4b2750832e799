//! Error Handling Guidelines
//!
//! Messages say what failed, why when known, and what to do next:
//! - ✅ "Port COM3 is not available: device not connected. Plug it in or pick another slot."
//! - ❌ "Error" (too vague)
//!
//! Every error ends up as user-visible status text; none is fatal.

use core_types::TransportError;
use decoders::DecodeError;
use thiserror::Error;

/// Unified error type for monitor operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MonitorError {
    /// I/O attempted on a connection that has no open handle
    #[error("Port is closed: open a port before sending or receiving")]
    PortClosed,

    /// Hardware or driver failure reported by the OS
    #[error("Serial I/O failed: {0}")]
    Io(String),

    /// Invalid hex text, unencodable text or out-of-range bytes
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Name is not one of the configured slots
    #[error("Unknown port '{0}': not one of the configured slots")]
    UnknownPort(String),

    /// Slot exists but its device is not connected
    #[error("Port {0} is not available: device not connected. Plug it in or pick another slot.")]
    PortUnavailable(String),

    /// Open requested on an already open connection
    #[error("Port {0} is already open")]
    AlreadyOpen(String),

    /// State transition was rejected
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    /// Send requested with no port selected
    #[error("No port is open: select a port first")]
    NoActivePort,

    /// Communication channel closed
    #[error("Channel closed: {0}")]
    ChannelClosed(String),

    /// Bounded channel full
    #[error("System overloaded: {0}")]
    Overloaded(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MonitorError {
    /// Short variant name used in status lines ("Failed to send data: Io").
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PortClosed => "PortClosed",
            Self::Io(_) => "Io",
            Self::MalformedInput(_) => "MalformedInput",
            Self::UnknownPort(_) => "UnknownPort",
            Self::PortUnavailable(_) => "PortUnavailable",
            Self::AlreadyOpen(_) => "AlreadyOpen",
            Self::InvalidTransition(_) => "InvalidTransition",
            Self::NoActivePort => "NoActivePort",
            Self::ChannelClosed(_) => "ChannelClosed",
            Self::Overloaded(_) => "Overloaded",
            Self::Config(_) => "Config",
        }
    }
}

impl From<TransportError> for MonitorError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::NotConnected => MonitorError::PortClosed,
            TransportError::Io(msg) => MonitorError::Io(msg),
            TransportError::ConnectionFailed(msg) => {
                MonitorError::Io(format!("could not open port: {msg}"))
            }
        }
    }
}

impl From<DecodeError> for MonitorError {
    fn from(e: DecodeError) -> Self {
        MonitorError::MalformedInput(e.to_string())
    }
}
