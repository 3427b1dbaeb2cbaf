//! Monitor identification block decoding
//!
//! Only the 128-byte base block is read. Checksum and header failures are
//! reported as diagnostics and never stop decoding: plenty of monitors ship
//! slightly non-conforming blocks that still carry a usable name.

use serde::Serialize;
use tracing::warn;

use crate::constants::edid::*;

/// Soft failures found while decoding an identification block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecodeDiagnostics {
    /// The 128 bytes did not sum to zero modulo 256
    pub checksum_invalid: bool,
    /// Bytes 0..8 were not `00 FF FF FF FF FF FF 00`
    pub header_invalid: bool,
    /// Fewer than 128 bytes were available; nothing was decoded
    pub truncated: bool,
}

impl DecodeDiagnostics {
    pub fn is_clean(&self) -> bool {
        !self.checksum_invalid && !self.header_invalid && !self.truncated
    }
}

/// Decoded monitor identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdentificationRecord {
    pub model_name: Option<String>,
    /// Three-letter PNP vendor ID, e.g. "DEL"
    pub manufacturer: Option<String>,
    pub diagnostics: DecodeDiagnostics,
}

impl IdentificationRecord {
    /// Decode whatever the output property returned
    pub fn from_bytes(raw: &[u8]) -> Self {
        let (model_name, diagnostics) = decode_bytes(raw);
        let manufacturer = block(raw).and_then(manufacturer_id);
        Self {
            model_name,
            manufacturer,
            diagnostics,
        }
    }

    pub fn checksum_valid(&self) -> bool {
        !self.diagnostics.checksum_invalid && !self.diagnostics.truncated
    }

    pub fn header_valid(&self) -> bool {
        !self.diagnostics.header_invalid && !self.diagnostics.truncated
    }

    /// Model name for labels, empty when none was decoded
    pub fn display_name(&self) -> &str {
        self.model_name.as_deref().unwrap_or("")
    }
}

fn block(raw: &[u8]) -> Option<&[u8; BLOCK_LENGTH]> {
    raw.get(..BLOCK_LENGTH)?.try_into().ok()
}

/// Decode an input of any length. Anything past the base block is ignored;
/// a short input yields no name and the `truncated` diagnostic.
pub fn decode_bytes(raw: &[u8]) -> (Option<String>, DecodeDiagnostics) {
    match block(raw) {
        Some(block) => decode(block),
        None => {
            warn!(len = raw.len(), "identification block shorter than {BLOCK_LENGTH} bytes");
            (
                None,
                DecodeDiagnostics {
                    truncated: true,
                    ..Default::default()
                },
            )
        }
    }
}

/// Decode the model name from a base identification block.
///
/// When several descriptors carry the model-name tag the last one wins.
pub fn decode(raw: &[u8; BLOCK_LENGTH]) -> (Option<String>, DecodeDiagnostics) {
    let mut diagnostics = DecodeDiagnostics::default();

    let sum = raw.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    if sum != 0 {
        warn!(sum, "identification block checksum failed");
        diagnostics.checksum_invalid = true;
    }

    if raw[..HEADER.len()] != HEADER {
        warn!("identification block header incorrect, probably not an EDID");
        diagnostics.header_invalid = true;
    }

    let mut model_name = None;
    for index in 0..DESCRIPTOR_COUNT {
        let start = DESCRIPTOR_START + index * DESCRIPTOR_STRIDE;
        let descriptor = &raw[start..start + DESCRIPTOR_STRIDE];

        // Detailed timings start with a non-zero pixel clock
        if descriptor[0] != 0x00 || descriptor[1] != 0x00 {
            continue;
        }

        if descriptor[3] == TAG_MODEL_NAME {
            model_name = Some(descriptor_text(
                &descriptor[TEXT_OFFSET..TEXT_OFFSET + TEXT_LENGTH],
            ));
        }
    }

    (model_name, diagnostics)
}

/// Copy a descriptor's text field up to the line-feed terminator.
/// Bytes outside printable ASCII become U+FFFD.
fn descriptor_text(field: &[u8]) -> String {
    field
        .iter()
        .take_while(|&&b| b != TEXT_TERMINATOR && b != 0x00)
        .map(|&b| {
            if TEXT_PRINTABLE.contains(&b) {
                char::from(b)
            } else {
                char::REPLACEMENT_CHARACTER
            }
        })
        .collect()
}

fn manufacturer_id(raw: &[u8; BLOCK_LENGTH]) -> Option<String> {
    let packed = u16::from_be_bytes([raw[MANUFACTURER_OFFSET], raw[MANUFACTURER_OFFSET + 1]]);
    let letters = [(packed >> 10) & 0x1F, (packed >> 5) & 0x1F, packed & 0x1F];

    letters
        .iter()
        .map(|&code| {
            let c = char::from(code as u8 + b'@');
            c.is_ascii_uppercase().then_some(c)
        })
        .collect()
}
