use chrono::{Local, NaiveTime};
use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod transport;
pub use transport::{SerialBackend, SerialConfig, SerialIo, TransportError};

/// Represents the direction of data flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    Rx, // Received from device
    Tx, // Sent to device
}

/// How a finished session is turned into log text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Fixed-width hex + ASCII dump
    #[default]
    Hex,
    /// Raw decoded text stream
    Text,
}

impl std::str::FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(RenderMode::Hex),
            "text" => Ok(RenderMode::Text),
            other => Err(format!("unknown render mode '{other}' (expected hex or text)")),
        }
    }
}

/// A batch of bytes observed within a single poll tick.
///
/// Sessions are immutable; build one with [`SessionBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByteSession {
    bytes: Vec<u8>,
    /// Local wall-clock time at which the session began.
    timestamp: NaiveTime,
    channel: Channel,
}

impl ByteSession {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn timestamp(&self) -> NaiveTime {
        self.timestamp
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Timestamp rendered as `HH:MM:SS.ffffff` (always 15 characters).
    pub fn timestamp_label(&self) -> String {
        self.timestamp.format("%H:%M:%S%.6f").to_string()
    }
}

/// Append-only accumulator for a session that is still being collected.
#[derive(Debug)]
pub struct SessionBuilder {
    bytes: Vec<u8>,
    timestamp: NaiveTime,
    channel: Channel,
}

impl SessionBuilder {
    pub fn new_rx() -> Self {
        Self::at(Local::now().time(), Channel::Rx)
    }

    pub fn new_tx() -> Self {
        Self::at(Local::now().time(), Channel::Tx)
    }

    /// Start a session with an explicit timestamp.
    pub fn at(timestamp: NaiveTime, channel: Channel) -> Self {
        Self {
            bytes: Vec::with_capacity(256),
            timestamp,
            channel,
        }
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Close the session. Consumes the builder so nothing can be appended afterwards.
    pub fn finish(self) -> ByteSession {
        ByteSession {
            bytes: self.bytes,
            timestamp: self.timestamp,
            channel: self.channel,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_session_builder_appends_in_order() {
        let ts = NaiveTime::from_hms_micro_opt(9, 27, 50, 120).unwrap();
        let mut builder = SessionBuilder::at(ts, Channel::Rx);
        builder.append(b"Hel");
        builder.append(b"lo");
        let session = builder.finish();

        assert_eq!(session.bytes(), b"Hello");
        assert_eq!(session.channel(), Channel::Rx);
        assert_eq!(session.timestamp(), ts);
    }

    #[test]
    fn test_timestamp_label_is_fixed_width() {
        let whole_second = NaiveTime::from_hms_opt(1, 2, 3).unwrap();
        let session = SessionBuilder::at(whole_second, Channel::Rx).finish();
        assert_eq!(session.timestamp_label(), "01:02:03.000000");
        assert_eq!(session.timestamp_label().len(), 15);
    }

    #[test]
    fn test_session_serialization() {
        let mut builder = SessionBuilder::new_tx();
        builder.append(&[0x01, 0x02, 0x03]);
        let session = builder.finish();
        let json = serde_json::to_string(&session).unwrap();
        let deserialized: ByteSession = serde_json::from_str(&json).unwrap();
        assert_eq!(session, deserialized);
    }

    #[test]
    fn test_render_mode_parsing() {
        assert_eq!("hex".parse::<RenderMode>(), Ok(RenderMode::Hex));
        assert_eq!("TEXT".parse::<RenderMode>(), Ok(RenderMode::Text));
        assert!("ascii".parse::<RenderMode>().is_err());
        assert_eq!(RenderMode::default(), RenderMode::Hex);
    }
}
