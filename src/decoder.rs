//! Payload decoding for uploaded content (data-URI aware, base64).
//!
//! Uploads arrive as `[<header>,]<payload>` strings where the payload is a
//! base64 encoding of arbitrary bytes. Decoding is byte-preserving: each
//! decoded byte maps 1:1 to one char, so binary content survives the round
//! trip without UTF-8 reinterpretation. A failed decode is never fatal; the
//! raw payload text is scanned instead so literal signature strings that
//! survive encoding are still caught.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use crate::error::{Result, SiftError};

/// Outcome of decoding one uploaded payload.
///
/// Created once per file and consumed immediately by the matcher; never
/// retained across scans.
#[derive(Debug, Clone)]
pub struct DecodeOutcome {
    /// Byte-preserving text view of the content to scan.
    pub text: String,
    /// False when base64 decoding failed and `text` is the raw payload.
    pub decoded_successfully: bool,
    /// Reason decoding failed, when it did.
    pub decode_error: Option<String>,
}

impl DecodeOutcome {
    /// Wrap already-decoded bytes (e.g. a file read straight from disk).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            text: bytes_to_text(bytes),
            decoded_successfully: true,
            decode_error: None,
        }
    }
}

/// Strip a data-URI header and decode the remaining payload.
///
/// Everything up to and including the first comma is treated as a
/// MIME/encoding header and discarded without validation. An empty payload
/// after stripping is the one hard failure here (`EmptyContent`).
pub fn decode_payload(content: &str) -> Result<DecodeOutcome> {
    let payload = match content.find(',') {
        Some(idx) => &content[idx + 1..],
        None => content,
    };

    if payload.is_empty() {
        return Err(SiftError::EmptyContent);
    }

    match STANDARD.decode(payload) {
        Ok(bytes) => Ok(DecodeOutcome {
            text: bytes_to_text(&bytes),
            decoded_successfully: true,
            decode_error: None,
        }),
        Err(e) => {
            debug!("base64 decode failed, falling back to raw payload scan: {e}");
            Ok(DecodeOutcome {
                text: payload.to_string(),
                decoded_successfully: false,
                decode_error: Some(e.to_string()),
            })
        }
    }
}

/// Widen each byte to one char (latin-1 style) so invalid UTF-8 sequences
/// cannot corrupt the text view or abort the scan.
fn bytes_to_text(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
