use std::fmt::Write;

use core_types::ByteSession;

use crate::ascii::{decode_ascii_lossy, PLACEHOLDER};
use crate::{DecodeError, Renderer};

/// Bytes per dump line.
pub const BLOCK_SIZE: usize = 16;

/// Width of the timestamp column (`HH:MM:SS.ffffff`).
pub const HEADER_WIDTH: usize = 15;

/// Parse hex text such as `"48656c"` or `"48 65 6c"`.
///
/// Whitespace may separate byte pairs but may not split one.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, DecodeError> {
    let raw = text.as_bytes();
    let mut out = Vec::with_capacity(raw.len() / 2);
    let mut i = 0;

    while let Some(&hi) = raw.get(i) {
        if hi.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        let hi = hex_digit(hi).ok_or(DecodeError::MalformedHex { position: i })?;
        let lo = raw
            .get(i + 1)
            .copied()
            .and_then(hex_digit)
            .ok_or(DecodeError::MalformedHex { position: i + 1 })?;
        out.push((hi << 4) | lo);
        i += 2;
    }

    Ok(out)
}

fn hex_digit(b: u8) -> Option<u8> {
    char::from(b).to_digit(16).and_then(|d| u8::try_from(d).ok())
}

/// `"48 65 6c"`
pub fn format_hex_spaced(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<String>>()
        .join(" ")
}

/// `"48656c"`
pub fn format_hex_compact(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{:02x}", b);
        s
    })
}

/// Number of dump lines a session of `len` bytes produces.
pub fn line_count(len: usize, block_size: usize) -> usize {
    len.div_ceil(block_size.max(1))
}

/// Fixed-width hex + ASCII dump.
///
/// ```text
///     1 | 09:27:50.000120 | 48 65 6c 6c 6f 0d 0a                            | Hello・・
/// ```
///
/// Every session is numbered from line 1.
pub struct HexDumpRenderer {
    block_size: usize,
}

impl HexDumpRenderer {
    pub fn new() -> Self {
        Self::with_block_size(BLOCK_SIZE)
    }

    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            block_size: block_size.max(1),
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

impl Default for HexDumpRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HexDumpRenderer {
    fn render(&self, session: &ByteSession) -> String {
        let hex_width = 3 * self.block_size;
        let mut out = String::new();

        for (i, block) in session.bytes().chunks(self.block_size).enumerate() {
            let header = if i == 0 {
                session.timestamp_label()
            } else {
                String::new()
            };
            let _ = writeln!(
                out,
                "{:>5} | {:<hw$} | {:<bw$}| {}",
                i + 1,
                header,
                format_hex_spaced(block),
                decode_ascii_lossy(block, PLACEHOLDER),
                hw = HEADER_WIDTH,
                bw = hex_width,
            );
        }

        out
    }

    fn id(&self) -> &'static str {
        "hex"
    }

    fn name(&self) -> &'static str {
        "Hex Dump"
    }
}
