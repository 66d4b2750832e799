use crate::state::PortState;
use chrono::{DateTime, Local};
use core_types::RenderMode;
use serde::{Deserialize, Serialize};

/// Baud rates offered for selection
pub const BAUD_RATES: [u32; 9] = [300, 1200, 2400, 4800, 9600, 19200, 38400, 57600, 115200];

/// Status text longer than this is cut and suffixed with " ..."
pub const STATUS_TRUNCATE: usize = 80;

/// One row of the port list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortSnapshot {
    pub name: String,
    pub state: PortState,
}

impl PortSnapshot {
    pub fn new(name: impl Into<String>, state: PortState) -> Self {
        Self {
            name: name.into(),
            state,
        }
    }

    /// `"COM3 OPEN"`, `"COM3 CLOSED"`; disconnected slots show only their name.
    pub fn label(&self) -> String {
        match self.state {
            PortState::Disconnected => self.name.clone(),
            state => format!("{} {}", self.name, state.label()),
        }
    }
}

/// Details of the active port
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortInfo {
    pub name: String,
    pub state: PortState,
    pub baud_rate: u32,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub opened_at: Option<DateTime<Local>>,
    pub last_sent_at: Option<DateTime<Local>>,
    pub last_received_at: Option<DateTime<Local>>,
}

impl PortInfo {
    /// Key/value rows for a details panel, in display order.
    pub fn detail_rows(&self) -> Vec<(&'static str, String)> {
        fn when(t: &Option<DateTime<Local>>) -> String {
            t.map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string())
        }

        vec![
            ("Device", self.name.clone()),
            ("State", self.state.label().to_string()),
            ("Baud", format!("{} baud", self.baud_rate)),
            ("Sent", format!("{} bytes", self.bytes_sent)),
            ("Received", format!("{} bytes", self.bytes_received)),
            ("Opened", when(&self.opened_at)),
            ("Last TX", when(&self.last_sent_at)),
            ("Last RX", when(&self.last_received_at)),
        ]
    }
}

/// Validation state of the send fields
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InputIndicator {
    /// Nothing to send
    Empty,
    /// Hex parsed and every byte is printable
    OkBytes,
    /// Hex parsed but some byte has no printable form
    OkBytesButNgEncoding,
    /// Text encoded to bytes
    OkText,
    /// Hex text is malformed
    NgBytes,
    /// Text has characters that do not fit in one byte
    NgText,
}

/// Content of one send field: either a real value or a greyed-out hint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldText {
    Value(String),
    Placeholder(String),
}

impl FieldText {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Value(s) | Self::Placeholder(s) => s,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// Everything a front-end needs to draw the send fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SenderView {
    pub indicator: InputIndicator,
    pub hex: FieldText,
    pub text: FieldText,
    /// `None` while editing the live buffer
    pub history_pointer: Option<usize>,
    pub append_newline: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// User-visible status line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub message: String,
    pub at: DateTime<Local>,
}

impl StatusMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(StatusLevel::Error, message)
    }

    fn new(level: StatusLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            at: Local::now(),
        }
    }

    /// Truncated message with its timestamp, e.g. `"Data sent: 41 (2025-01-01 12:00:00)"`.
    pub fn display(&self) -> String {
        let message = if self.message.chars().count() > STATUS_TRUNCATE {
            let cut: String = self.message.chars().take(STATUS_TRUNCATE).collect();
            format!("{cut} ...")
        } else {
            self.message.clone()
        };
        format!("{} ({})", message, self.at.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Commands from UI to the monitor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum UiCommand {
    /// Make `name` the single open port; `None` closes the active port
    SelectPort { name: Option<String> },

    /// Change the baud rate; the active port is reopened with it
    SetBaudRate { baud: u32 },

    /// Open the first available port whenever none is active
    SetAutoConnect { enabled: bool },

    /// Switch between hex dump and text stream rendering
    SetRenderMode { mode: RenderMode },

    /// Clear the log before the next receive tick
    ClearLog,

    /// Hex field edited
    EditHex { text: String },

    /// Text field edited
    EditText { text: String },

    /// Append `\n` to every sent payload
    SetAppendNewline { enabled: bool },

    /// Send the current payload
    Flush,

    /// Recall an older payload
    HistoryUp,

    /// Recall a newer payload, or return to the live buffer
    HistoryDown,

    /// Re-emit port list, active port and sender view
    RequestSnapshot,
}

/// Events from the monitor to UI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SystemEvent {
    /// Some slot changed state
    PortsChanged { ports: Vec<PortSnapshot> },

    /// Active port opened, closed or reconfigured
    ActivePortChanged { info: Option<PortInfo> },

    /// Rendered text to append to the log
    LogAppended { text: String },

    /// Log should be emptied
    LogCleared,

    /// Rendering switched
    RenderModeChanged { mode: RenderMode },

    /// Send fields changed
    SenderUpdated { view: SenderView },

    /// Status message for user display
    Status(StatusMessage),
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_label() {
        assert_eq!(PortSnapshot::new("COM1", PortState::Open).label(), "COM1 OPEN");
        assert_eq!(
            PortSnapshot::new("COM2", PortState::Closed).label(),
            "COM2 CLOSED"
        );
        assert_eq!(
            PortSnapshot::new("COM3", PortState::Disconnected).label(),
            "COM3"
        );
    }

    #[test]
    fn test_status_truncation() {
        let long = "x".repeat(100);
        let status = StatusMessage::error(long);
        let shown = status.display();
        assert!(shown.starts_with(&format!("{} ...", "x".repeat(STATUS_TRUNCATE))));

        let short = StatusMessage::info("Data sent: 41");
        assert!(short.display().starts_with("Data sent: 41 ("));
        assert_eq!(short.level, StatusLevel::Info);
    }

    #[test]
    fn test_detail_rows() {
        let info = PortInfo {
            name: "COM4".into(),
            state: PortState::Open,
            baud_rate: 115200,
            bytes_sent: 3,
            bytes_received: 0,
            opened_at: None,
            last_sent_at: None,
            last_received_at: None,
        };
        let rows = info.detail_rows();
        assert_eq!(rows[0], ("Device", "COM4".to_string()));
        assert_eq!(rows[2], ("Baud", "115200 baud".to_string()));
        assert_eq!(rows[7], ("Last RX", "-".to_string()));
    }

    #[test]
    fn test_command_serialization() {
        let cmd = UiCommand::SetRenderMode {
            mode: RenderMode::Text,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let back: UiCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, back);
    }
}
