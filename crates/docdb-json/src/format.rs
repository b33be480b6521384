//! Payload format discriminant.

use serde::{Deserialize, Serialize};

/// First byte of every binary payload.
///
/// Text payloads start with JSON whitespace or a printable ASCII character,
/// so they can never begin with this value.
pub const BINARY_FORMAT_MARKER: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationFormat {
    Text,
    Binary,
}

impl SerializationFormat {
    /// Infers the format of a payload from its first byte.
    pub fn detect(bytes: &[u8]) -> SerializationFormat {
        match bytes.first() {
            Some(&BINARY_FORMAT_MARKER) => SerializationFormat::Binary,
            _ => SerializationFormat::Text,
        }
    }
}
