use core_types::ByteSession;

use crate::ascii::{is_printable, PLACEHOLDER};
use crate::Renderer;

/// Raw decoded text stream.
///
/// Line breaks and tabs pass through so the device's own line structure is
/// kept; other non-printable bytes become [`PLACEHOLDER`].
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TextRenderer {
    fn render(&self, session: &ByteSession) -> String {
        session
            .bytes()
            .iter()
            .map(|&b| match b {
                b'\n' | b'\r' | b'\t' => char::from(b),
                b if is_printable(b) => char::from(b),
                _ => PLACEHOLDER,
            })
            .collect()
    }

    fn id(&self) -> &'static str {
        "text"
    }

    fn name(&self) -> &'static str {
        "Text Stream"
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use core_types::SessionBuilder;

    fn render(bytes: &[u8]) -> String {
        let mut builder = SessionBuilder::new_rx();
        builder.append(bytes);
        TextRenderer::new().render(&builder.finish())
    }

    #[test]
    fn test_text_passthrough() {
        assert_eq!(render(b"Hello\r\nWorld\n"), "Hello\r\nWorld\n");
        assert_eq!(render(b"a\tb"), "a\tb");
    }

    #[test]
    fn test_text_placeholder() {
        // ESC [ 31 m keeps its printable tail
        assert_eq!(render(&[0x1B, 0x5B, 0x33, 0x31, 0x6D]), "・[31m");
        assert_eq!(render(&[0xFF, 0x00]), "・・");
    }

    #[test]
    fn test_text_empty() {
        assert_eq!(render(&[]), "");
    }
}
