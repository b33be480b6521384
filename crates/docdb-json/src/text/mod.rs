//! Text grammar shared by the text reader, writer and navigator.
//!
//! The grammar is RFC 8259 plus the `NaN`, `Infinity` and `-Infinity`
//! literals and a set of sigil-prefixed scalars for the extended kinds
//! (`I`, `H`, `L`, `LL`, `UL`, `S`, `D`, `G`, `B`). Sigil scalars, like the
//! bare literals, run until the next delimiter.

mod escape;
mod scalar;

pub(crate) use escape::{decode_string, write_string};
pub(crate) use scalar::parse_scalar;

use crate::error::{JsonError, Result};

pub(crate) const SIGIL_INT8: &str = "I";
pub(crate) const SIGIL_INT16: &str = "H";
pub(crate) const SIGIL_INT32: &str = "L";
pub(crate) const SIGIL_INT64: &str = "LL";
pub(crate) const SIGIL_UINT32: &str = "UL";
pub(crate) const SIGIL_FLOAT32: &str = "S";
pub(crate) const SIGIL_FLOAT64: &str = "D";
pub(crate) const SIGIL_GUID: &str = "G";
pub(crate) const SIGIL_BINARY: &str = "B";

#[inline]
pub(crate) fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

#[inline]
pub(crate) fn is_delimiter(b: u8) -> bool {
    is_whitespace(b) || matches!(b, b',' | b']' | b'}' | b':')
}

pub(crate) fn skip_whitespace(buf: &[u8], mut pos: usize) -> usize {
    while pos < buf.len() && is_whitespace(buf[pos]) {
        pos += 1;
    }
    pos
}

/// End of a bare scalar starting at `pos`: the first delimiter or EOF.
pub(crate) fn scalar_end(buf: &[u8], pos: usize) -> usize {
    buf[pos..]
        .iter()
        .position(|b| is_delimiter(*b))
        .map_or(buf.len(), |n| pos + n)
}

/// Position of the closing quote of a string whose body starts at `start`.
pub(crate) fn find_ending_quote(buf: &[u8], start: usize) -> Result<usize> {
    let mut x = start;
    while x < buf.len() {
        match buf[x] {
            b'"' => return Ok(x),
            b'\\' => x += 2,
            _ => x += 1,
        }
    }
    Err(JsonError::text(start.saturating_sub(1), "unterminated string"))
}

/// End of the value starting at `pos`, which must already be known to be
/// well formed.
pub(crate) fn skip_value(buf: &[u8], pos: usize) -> Result<usize> {
    match buf.get(pos) {
        Some(b'"') => Ok(find_ending_quote(buf, pos + 1)? + 1),
        Some(b'[' | b'{') => {
            let mut depth = 0usize;
            let mut x = pos;
            while x < buf.len() {
                match buf[x] {
                    b'"' => x = find_ending_quote(buf, x + 1)?,
                    b'[' | b'{' => depth += 1,
                    b']' | b'}' => {
                        depth -= 1;
                        if depth == 0 {
                            return Ok(x + 1);
                        }
                    }
                    _ => {}
                }
                x += 1;
            }
            Err(JsonError::UnexpectedEof { offset: buf.len() })
        }
        Some(_) => Ok(scalar_end(buf, pos)),
        None => Err(JsonError::UnexpectedEof { offset: pos }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_ends_at_delimiters() {
        assert_eq!(scalar_end(b"true,", 0), 4);
        assert_eq!(scalar_end(b"12]", 0), 2);
        assert_eq!(scalar_end(b"-Infinity", 0), 9);
    }

    #[test]
    fn ending_quote_skips_escapes() {
        assert_eq!(find_ending_quote(br#""a\"b" "#, 1).unwrap(), 5);
        assert!(find_ending_quote(br#""abc"#, 1).is_err());
    }

    #[test]
    fn skips_nested_values() {
        let text = br#"{"a":[1,"]",{"b":{}}]} 5"#;
        assert_eq!(skip_value(text, 0).unwrap(), text.len() - 2);
        assert_eq!(skip_value(text, text.len() - 1).unwrap(), text.len());
    }
}
