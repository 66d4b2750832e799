//! Byte validation and rendering of received sessions.
//!
//! - [`ascii`]: printable-range checks shared by inbound and outbound paths
//! - [`hex`]: hex text parsing/formatting and the fixed-width dump renderer
//! - [`text`]: raw text stream renderer

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

use core_types::{ByteSession, RenderMode};
use thiserror::Error;

pub mod ascii;
pub mod hex;
pub mod text;

pub use ascii::{decode_ascii, decode_ascii_lossy, is_printable, PLACEHOLDER};
pub use hex::{format_hex_compact, format_hex_spaced, parse_hex, HexDumpRenderer};
pub use text::TextRenderer;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Byte 0x{byte:02x} at offset {offset} is outside the printable range")]
    NonPrintable { offset: usize, byte: u8 },

    #[error("Malformed hex text at position {position}")]
    MalformedHex { position: usize },
}

/// Turns a finished session into log text.
pub trait Renderer: Send {
    /// Renderers keep no state between sessions.
    fn render(&self, session: &ByteSession) -> String;

    /// Get the unique name of this renderer (e.g. "hex").
    fn id(&self) -> &'static str;

    /// Get a human-readable name.
    fn name(&self) -> &'static str;
}

pub fn renderer_for(mode: RenderMode) -> Box<dyn Renderer> {
    match mode {
        RenderMode::Hex => Box::new(HexDumpRenderer::new()),
        RenderMode::Text => Box::new(TextRenderer::new()),
    }
}
