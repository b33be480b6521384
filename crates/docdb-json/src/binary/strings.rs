//! Compact string encodings: GUID text, hex, date-time and packed alphabets.
//!
//! [`compress`] tries the content-shape encodings in a fixed priority order
//! and only accepts one that is strictly smaller than the raw encoding.
//! [`decode_compressed`] inverts every one of them from the marker alone.

use docdb_buffers::{bits, Reader};

use super::marker::*;
use crate::error::{JsonError, Result};
use crate::guid::{parse_canonical, Guid, GuidCase, GUID_TEXT_LEN};

/// Alphabet of the compressed date-time encoding; a character's code is its
/// index.
pub const DATE_TIME_ALPHABET: &[u8; 16] = b"0123456789-:.TZ ";

const LOWER_HEX: &[u8; 16] = b"0123456789abcdef";
const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Size of the raw (uncompressed) encoding of a `len` byte string.
pub fn raw_encoded_size(len: usize) -> usize {
    if len <= ENCODED_STRING_MAX_LEN {
        1 + len
    } else if len <= u8::MAX as usize {
        2 + len
    } else if len <= u16::MAX as usize {
        3 + len
    } else {
        5 + len
    }
}

/// Returns the full node encoding (marker included) of the first compact
/// form that applies to `text` and beats the raw encoding.
///
/// Order: GUID text, hex, date-time, then, when `packed` is set, the generic
/// packed alphabets.
pub fn compress(text: &str, packed: bool) -> Option<Vec<u8>> {
    if text.is_empty() {
        return None;
    }
    let raw = raw_encoded_size(text.len());
    let candidate = try_guid(text)
        .or_else(|| try_hex(text))
        .or_else(|| try_date_time(text))
        .or_else(|| if packed { try_packed(text) } else { None })?;
    (candidate.len() < raw).then_some(candidate)
}

fn try_guid(text: &str) -> Option<Vec<u8>> {
    let bytes = text.as_bytes();
    let (inner, quoted) = match bytes.len() {
        GUID_TEXT_LEN => (bytes, false),
        n if n == GUID_TEXT_LEN + 2 && bytes[0] == b'"' && bytes[n - 1] == b'"' => {
            (&bytes[1..n - 1], true)
        }
        _ => return None,
    };
    let (guid, case) = parse_canonical(inner)?;
    let marker = match (case?, quoted) {
        (GuidCase::Lower, false) => LOWERCASE_GUID_STRING,
        (GuidCase::Upper, false) => UPPERCASE_GUID_STRING,
        (GuidCase::Lower, true) => DOUBLE_QUOTED_LOWERCASE_GUID_STRING,
        (GuidCase::Upper, true) => DOUBLE_QUOTED_UPPERCASE_GUID_STRING,
    };
    let mut out = Vec::with_capacity(17);
    out.push(marker);
    out.extend_from_slice(guid.as_bytes());
    Some(out)
}

fn try_hex(text: &str) -> Option<Vec<u8>> {
    let bytes = text.as_bytes();
    if bytes.len() > u8::MAX as usize {
        return None;
    }
    let mut has_lower = false;
    let mut has_upper = false;
    let mut codes = Vec::with_capacity(bytes.len());
    for &ch in bytes {
        let code = match ch {
            b'0'..=b'9' => ch - b'0',
            b'a'..=b'f' => {
                has_lower = true;
                ch - b'a' + 10
            }
            b'A'..=b'F' => {
                has_upper = true;
                ch - b'A' + 10
            }
            _ => return None,
        };
        codes.push(code);
    }
    let marker = match (has_lower, has_upper) {
        (true, true) => return None,
        (false, true) => COMPRESSED_UPPERCASE_HEX_STRING,
        _ => COMPRESSED_LOWERCASE_HEX_STRING,
    };
    Some(nibble_node(marker, &codes))
}

fn try_date_time(text: &str) -> Option<Vec<u8>> {
    let bytes = text.as_bytes();
    if bytes.len() > u8::MAX as usize {
        return None;
    }
    let codes = bytes
        .iter()
        .map(|ch| DATE_TIME_ALPHABET.iter().position(|a| a == ch).map(|i| i as u8))
        .collect::<Option<Vec<u8>>>()?;
    Some(nibble_node(COMPRESSED_DATE_TIME_STRING, &codes))
}

fn nibble_node(marker: u8, codes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + bits::packed_len(codes.len(), 4));
    out.push(marker);
    out.push(codes.len() as u8);
    out.extend(bits::pack(codes.iter().copied(), 4));
    out
}

fn try_packed(text: &str) -> Option<Vec<u8>> {
    let bytes = text.as_bytes();
    if !bytes.is_ascii() || bytes.len() > u16::MAX as usize {
        return None;
    }
    let min = *bytes.iter().min()?;
    let max = *bytes.iter().max()?;
    let range = usize::from(max - min) + 1;
    let (marker, width) = match range {
        0..=16 => (PACKED_4BIT_STRING, 4),
        17..=32 => (PACKED_5BIT_STRING, 5),
        33..=64 => (PACKED_6BIT_STRING, 6),
        _ => (PACKED_7BIT_STRING_LENGTH1, 7),
    };
    let len = bytes.len();
    let mut out = Vec::with_capacity(4 + bits::packed_len(len, width));
    if width < 7 && len <= u8::MAX as usize {
        out.push(marker);
        out.push(len as u8);
        out.push(min);
        out.extend(bits::pack(bytes.iter().map(|b| b - min), width));
    } else if len <= u8::MAX as usize {
        out.push(PACKED_7BIT_STRING_LENGTH1);
        out.push(len as u8);
        out.extend(bits::pack(bytes.iter().copied(), 7));
    } else {
        out.push(PACKED_7BIT_STRING_LENGTH2);
        out.extend_from_slice(&(len as u16).to_le_bytes());
        out.extend(bits::pack(bytes.iter().copied(), 7));
    }
    Some(out)
}

/// Total node size of a compressed string whose marker sits at `offset`.
pub fn compressed_node_len(marker: u8, buf: &[u8], offset: usize) -> Result<usize> {
    let mut reader = Reader::at(buf, offset + 1);
    let len = match marker {
        LOWERCASE_GUID_STRING..=DOUBLE_QUOTED_UPPERCASE_GUID_STRING => 17,
        COMPRESSED_LOWERCASE_HEX_STRING..=COMPRESSED_DATE_TIME_STRING => {
            let count = reader.u8()? as usize;
            2 + bits::packed_len(count, 4)
        }
        PACKED_4BIT_STRING..=PACKED_6BIT_STRING => {
            let count = reader.u8()? as usize;
            3 + bits::packed_len(count, packed_width(marker))
        }
        PACKED_7BIT_STRING_LENGTH1 => 2 + bits::packed_len(reader.u8()? as usize, 7),
        PACKED_7BIT_STRING_LENGTH2 => 3 + bits::packed_len(reader.u16()? as usize, 7),
        _ => return Err(JsonError::InvalidMarker { marker, offset }),
    };
    Ok(len)
}

fn packed_width(marker: u8) -> u32 {
    match marker {
        PACKED_4BIT_STRING => 4,
        PACKED_5BIT_STRING => 5,
        _ => 6,
    }
}

/// Decodes a compressed string node whose marker sits at `offset`.
pub fn decode_compressed(marker: u8, buf: &[u8], offset: usize) -> Result<String> {
    let mut reader = Reader::at(buf, offset + 1);
    let truncated = || JsonError::UnexpectedEof { offset };
    match marker {
        LOWERCASE_GUID_STRING..=DOUBLE_QUOTED_UPPERCASE_GUID_STRING => {
            let guid = Guid::from_bytes(reader.array::<16>()?);
            let case = match marker {
                LOWERCASE_GUID_STRING | DOUBLE_QUOTED_LOWERCASE_GUID_STRING => GuidCase::Lower,
                _ => GuidCase::Upper,
            };
            let text = guid.format(case);
            if marker >= DOUBLE_QUOTED_LOWERCASE_GUID_STRING {
                Ok(format!("\"{text}\""))
            } else {
                Ok(text)
            }
        }
        COMPRESSED_LOWERCASE_HEX_STRING..=COMPRESSED_DATE_TIME_STRING => {
            let alphabet = match marker {
                COMPRESSED_LOWERCASE_HEX_STRING => LOWER_HEX,
                COMPRESSED_UPPERCASE_HEX_STRING => UPPER_HEX,
                _ => DATE_TIME_ALPHABET,
            };
            let count = reader.u8()? as usize;
            let data = reader.buf(bits::packed_len(count, 4))?;
            let codes = bits::unpack(data, count, 4).ok_or_else(truncated)?;
            Ok(codes.iter().map(|c| alphabet[*c as usize] as char).collect())
        }
        PACKED_4BIT_STRING..=PACKED_6BIT_STRING => {
            let width = packed_width(marker);
            let count = reader.u8()? as usize;
            let base = reader.u8()?;
            let data = reader.buf(bits::packed_len(count, width))?;
            let codes = bits::unpack(data, count, width).ok_or_else(truncated)?;
            let bytes = codes
                .iter()
                .map(|c| base.checked_add(*c))
                .collect::<Option<Vec<u8>>>()
                .ok_or(JsonError::InvalidUtf8 { offset })?;
            ascii_string(bytes, offset)
        }
        PACKED_7BIT_STRING_LENGTH1 | PACKED_7BIT_STRING_LENGTH2 => {
            let count = if marker == PACKED_7BIT_STRING_LENGTH1 {
                reader.u8()? as usize
            } else {
                reader.u16()? as usize
            };
            let data = reader.buf(bits::packed_len(count, 7))?;
            let codes = bits::unpack(data, count, 7).ok_or_else(truncated)?;
            ascii_string(codes, offset)
        }
        _ => Err(JsonError::InvalidMarker { marker, offset }),
    }
}

fn ascii_string(bytes: Vec<u8>, offset: usize) -> Result<String> {
    if !bytes.is_ascii() {
        return Err(JsonError::InvalidUtf8 { offset });
    }
    String::from_utf8(bytes).map_err(|_| JsonError::InvalidUtf8 { offset })
}
