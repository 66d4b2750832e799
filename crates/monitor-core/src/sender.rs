use decoders::{decode_ascii, format_hex_compact, parse_hex};
use monitor_protocol::{FieldText, InputIndicator, MonitorError, SenderView};

use crate::constants::sender::{
    EMPTY_PLACEHOLDER_HEX, EMPTY_PLACEHOLDER_TEXT, FAILED_TO_DECODE, FAILED_TO_ENCODE,
    MALFORMED_BYTES, NEWLINE,
};
use crate::history::SendHistory;

/// Both send fields plus the payload they describe.
#[derive(Debug, Clone, PartialEq)]
struct Fields {
    indicator: InputIndicator,
    payload: Vec<u8>,
    hex: FieldText,
    text: FieldText,
}

impl Fields {
    fn empty() -> Self {
        Self {
            indicator: InputIndicator::Empty,
            payload: Vec::new(),
            hex: FieldText::Placeholder(EMPTY_PLACEHOLDER_HEX.to_string()),
            text: FieldText::Placeholder(EMPTY_PLACEHOLDER_TEXT.to_string()),
        }
    }

    fn from_hex(input: &str) -> Self {
        let bytes = match parse_hex(input) {
            Ok(bytes) => bytes,
            Err(_) => {
                return Self {
                    indicator: InputIndicator::NgBytes,
                    payload: Vec::new(),
                    hex: FieldText::Value(input.to_string()),
                    text: FieldText::Placeholder(MALFORMED_BYTES.to_string()),
                }
            }
        };
        if bytes.is_empty() {
            return Self::empty();
        }
        let (indicator, text) = match decode_ascii(&bytes) {
            Ok(decoded) => (InputIndicator::OkBytes, FieldText::Value(decoded)),
            Err(_) => (
                InputIndicator::OkBytesButNgEncoding,
                FieldText::Placeholder(FAILED_TO_DECODE.to_string()),
            ),
        };
        Self {
            indicator,
            payload: bytes,
            hex: FieldText::Value(input.to_string()),
            text,
        }
    }

    fn from_text(input: &str) -> Self {
        if input.is_empty() {
            return Self::empty();
        }
        match encode_latin1(input) {
            Some(bytes) => Self {
                indicator: InputIndicator::OkText,
                hex: FieldText::Value(format_hex_compact(&bytes)),
                payload: bytes,
                text: FieldText::Value(input.to_string()),
            },
            None => Self {
                indicator: InputIndicator::NgText,
                payload: Vec::new(),
                hex: FieldText::Placeholder(FAILED_TO_ENCODE.to_string()),
                text: FieldText::Value(input.to_string()),
            },
        }
    }
}

/// One byte per char; `None` if any char is above U+00FF.
fn encode_latin1(text: &str) -> Option<Vec<u8>> {
    text.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect()
}

/// The hex/text send fields, their validation indicator and the send history.
///
/// While a history entry is recalled, edits go to a transient copy; stepping
/// back down to the live buffer restores whatever was typed before.
#[derive(Debug, Clone)]
pub struct SendBuffer {
    live: Fields,
    recalled: Option<Fields>,
    history: SendHistory,
    append_newline: bool,
}

impl SendBuffer {
    pub fn new(history_capacity: usize, append_newline: bool) -> Self {
        Self {
            live: Fields::empty(),
            recalled: None,
            history: SendHistory::new(history_capacity),
            append_newline,
        }
    }

    fn visible(&self) -> &Fields {
        self.recalled.as_ref().unwrap_or(&self.live)
    }

    fn visible_mut(&mut self) -> &mut Fields {
        self.recalled.as_mut().unwrap_or(&mut self.live)
    }

    pub fn edit_hex(&mut self, text: &str) {
        *self.visible_mut() = Fields::from_hex(text);
    }

    pub fn edit_text(&mut self, text: &str) {
        *self.visible_mut() = Fields::from_text(text);
    }

    pub fn indicator(&self) -> InputIndicator {
        self.visible().indicator
    }

    pub fn payload(&self) -> &[u8] {
        &self.visible().payload
    }

    pub fn append_newline(&self) -> bool {
        self.append_newline
    }

    pub fn set_append_newline(&mut self, enabled: bool) {
        self.append_newline = enabled;
    }

    pub fn history(&self) -> &SendHistory {
        &self.history
    }

    /// Bytes to put on the wire, or `None` when there is nothing to send.
    ///
    /// Malformed input is an error; an empty buffer only sends a lone
    /// newline when the append-newline option is on.
    pub fn prepare_flush(&self) -> Result<Option<Vec<u8>>, MonitorError> {
        let fields = self.visible();
        match fields.indicator {
            InputIndicator::NgBytes => Err(MonitorError::MalformedInput(MALFORMED_BYTES.into())),
            InputIndicator::NgText => Err(MonitorError::MalformedInput(FAILED_TO_ENCODE.into())),
            InputIndicator::Empty if !self.append_newline => Ok(None),
            _ => {
                let mut out = fields.payload.clone();
                if self.append_newline {
                    out.push(NEWLINE);
                }
                Ok(Some(out))
            }
        }
    }

    /// Record the visible payload as sent and reset both fields.
    pub fn commit_sent(&mut self) {
        let payload = std::mem::take(&mut self.visible_mut().payload);
        if !payload.is_empty() {
            self.history.push(payload);
        }
        self.live = Fields::empty();
        self.recalled = None;
    }

    fn load_pointer(&mut self) {
        self.recalled = self
            .history
            .current()
            .map(|entry| Fields::from_hex(&format_hex_compact(entry)));
    }

    /// Recall the next older payload. Returns whether the view changed.
    pub fn history_up(&mut self) -> bool {
        if !self.history.up() {
            return false;
        }
        self.load_pointer();
        true
    }

    /// Recall the next newer payload or return to the live buffer.
    pub fn history_down(&mut self) -> bool {
        if !self.history.down() {
            return false;
        }
        self.load_pointer();
        true
    }

    pub fn view(&self) -> SenderView {
        let fields = self.visible();
        SenderView {
            indicator: fields.indicator,
            hex: fields.hex.clone(),
            text: fields.text.clone(),
            history_pointer: self.history.pointer(),
            append_newline: self.append_newline,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn buffer() -> SendBuffer {
        SendBuffer::new(10, false)
    }

    fn send(buf: &mut SendBuffer) -> Vec<u8> {
        let out = buf.prepare_flush().unwrap().unwrap();
        buf.commit_sent();
        out
    }

    #[test]
    fn test_hex_edit_mirrors_text() {
        let mut buf = buffer();
        buf.edit_hex("48 65 6C 6c 6f");
        let view = buf.view();
        assert_eq!(view.indicator, InputIndicator::OkBytes);
        assert_eq!(view.text, FieldText::Value("Hello".into()));
        assert_eq!(buf.payload(), b"Hello");
    }

    #[test]
    fn test_hex_edit_outcomes() {
        let mut buf = buffer();

        buf.edit_hex("4");
        assert_eq!(buf.indicator(), InputIndicator::NgBytes);
        assert_eq!(buf.view().text, FieldText::Placeholder(MALFORMED_BYTES.into()));

        buf.edit_hex("00ff");
        assert_eq!(buf.indicator(), InputIndicator::OkBytesButNgEncoding);
        assert_eq!(buf.view().text, FieldText::Placeholder(FAILED_TO_DECODE.into()));
        assert_eq!(buf.payload(), &[0x00, 0xff]);

        buf.edit_hex("   ");
        assert_eq!(buf.view(), SendBuffer::new(10, false).view());
    }

    #[test]
    fn test_text_edit_outcomes() {
        let mut buf = buffer();

        buf.edit_text("Hi\u{e9}");
        assert_eq!(buf.indicator(), InputIndicator::OkText);
        assert_eq!(buf.view().hex, FieldText::Value("4869e9".into()));

        buf.edit_text("日本");
        assert_eq!(buf.indicator(), InputIndicator::NgText);
        assert_eq!(buf.view().hex, FieldText::Placeholder(FAILED_TO_ENCODE.into()));

        buf.edit_text("");
        assert_eq!(buf.indicator(), InputIndicator::Empty);
        assert!(buf.view().hex.is_placeholder());
    }

    #[test]
    fn test_flush_rules() {
        let mut buf = buffer();
        assert_eq!(buf.prepare_flush(), Ok(None));

        buf.edit_hex("zz");
        assert!(matches!(
            buf.prepare_flush(),
            Err(MonitorError::MalformedInput(_))
        ));

        buf.set_append_newline(true);
        buf.edit_text("");
        assert_eq!(buf.prepare_flush(), Ok(Some(vec![0x0A])));

        buf.edit_text("A");
        assert_eq!(send(&mut buf), vec![0x41, 0x0A]);
        assert_eq!(buf.indicator(), InputIndicator::Empty);
        // History keeps the payload without the newline
        assert_eq!(buf.history().get(0), Some(&b"A"[..]));
    }

    #[test]
    fn test_history_recall_and_restore_live_buffer() {
        let mut buf = buffer();
        buf.edit_text("first");
        send(&mut buf);
        buf.edit_hex("0102");
        send(&mut buf);

        buf.edit_text("draft");
        assert!(buf.history_up());
        let view = buf.view();
        assert_eq!(view.history_pointer, Some(0));
        assert_eq!(view.hex, FieldText::Value("0102".into()));
        assert_eq!(view.indicator, InputIndicator::OkBytesButNgEncoding);

        assert!(buf.history_up());
        assert_eq!(buf.view().text, FieldText::Value("first".into()));
        assert!(!buf.history_up());

        // Editing a recalled entry leaves the history alone
        buf.edit_text("changed");
        assert_eq!(buf.history().get(1), Some(&b"first"[..]));

        assert!(buf.history_down());
        assert!(buf.history_down());
        assert_eq!(buf.view().history_pointer, None);
        assert_eq!(buf.view().text, FieldText::Value("draft".into()));
        assert!(!buf.history_down());
    }

    #[test]
    fn test_send_recalled_entry() {
        let mut buf = buffer();
        buf.edit_text("ping");
        send(&mut buf);
        buf.history_up();
        assert_eq!(send(&mut buf), b"ping");
        // Consecutive duplicate is collapsed
        assert_eq!(buf.history().len(), 1);
        assert_eq!(buf.view().history_pointer, None);
    }
}
