use std::ops::RangeInclusive;

use crate::DecodeError;

/// Bytes rendered as themselves. Everything else is shown as [`PLACEHOLDER`].
pub const PRINTABLE: RangeInclusive<u8> = 0x20..=0x7D;

/// Glyph substituted for bytes outside [`PRINTABLE`].
pub const PLACEHOLDER: char = '・';

pub fn is_printable(byte: u8) -> bool {
    PRINTABLE.contains(&byte)
}

/// Strict decode: fails on the first byte outside the printable range.
pub fn decode_ascii(bytes: &[u8]) -> Result<String, DecodeError> {
    bytes
        .iter()
        .enumerate()
        .map(|(offset, &byte)| {
            if is_printable(byte) {
                Ok(char::from(byte))
            } else {
                Err(DecodeError::NonPrintable { offset, byte })
            }
        })
        .collect()
}

/// Lossy decode: non-printable bytes become `placeholder`.
pub fn decode_ascii_lossy(bytes: &[u8], placeholder: char) -> String {
    bytes
        .iter()
        .map(|&b| if is_printable(b) { char::from(b) } else { placeholder })
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_round_trip() {
        let all: Vec<u8> = PRINTABLE.collect();
        let text = decode_ascii(&all).unwrap();
        assert_eq!(text.as_bytes(), all.as_slice());
        assert_eq!(decode_ascii(text.as_bytes()).unwrap(), text);
    }

    #[test]
    fn test_range_edges() {
        assert!(!is_printable(0x1F));
        assert!(is_printable(0x20));
        assert!(is_printable(0x7D));
        // '~' and DEL are outside the range
        assert!(!is_printable(0x7E));
        assert!(!is_printable(0x7F));
    }

    #[test]
    fn test_strict_reports_offset() {
        let err = decode_ascii(b"ok\x00").unwrap_err();
        assert_eq!(err, DecodeError::NonPrintable { offset: 2, byte: 0 });
    }

    #[test]
    fn test_lossy_substitutes() {
        assert_eq!(decode_ascii_lossy(&[0x41, 0x0A, 0xFF, 0x42], PLACEHOLDER), "A・・B");
        assert_eq!(decode_ascii_lossy(&[0x00], '.'), ".");
    }
}
