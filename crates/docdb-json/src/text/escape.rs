use std::borrow::Cow;

use docdb_buffers::Writer;

use crate::error::{JsonError, Result};

/// Decodes the body of a string literal (the bytes between the quotes).
/// `offset` is the position of the opening quote, used for errors.
pub(crate) fn decode_string(body: &[u8], offset: usize) -> Result<Cow<'_, str>> {
    // Fast path: no escapes
    if !body.contains(&b'\\') {
        if body.iter().any(|b| *b < 0x20) {
            return Err(JsonError::text(offset, "control character in string"));
        }
        return std::str::from_utf8(body)
            .map(Cow::Borrowed)
            .map_err(|_| JsonError::InvalidUtf8 { offset });
    }
    let mut quoted = Vec::with_capacity(body.len() + 2);
    quoted.push(b'"');
    quoted.extend_from_slice(body);
    quoted.push(b'"');
    serde_json::from_slice::<String>(&quoted)
        .map(Cow::Owned)
        .map_err(|_| JsonError::text(offset, "invalid string escape"))
}

/// Writes `s` as a quoted, escaped string literal.
pub(crate) fn write_string(out: &mut Writer, s: &str) {
    let bytes = s.as_bytes();
    // Fast path: printable ASCII with nothing to escape
    if bytes.iter().all(|b| (32..=126).contains(b) && *b != b'"' && *b != b'\\') {
        out.ensure_capacity(bytes.len() + 2);
        out.u8(b'"');
        out.buf(bytes);
        out.u8(b'"');
        return;
    }
    let json = serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string());
    out.buf(json.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrows_when_unescaped() {
        assert!(matches!(decode_string(b"plain", 0).unwrap(), Cow::Borrowed("plain")));
    }

    #[test]
    fn decodes_escapes() {
        let s = decode_string(r#"a\né\"\\"#.as_bytes(), 0).unwrap();
        assert_eq!(s, "a\n\u{e9}\"\\");
    }

    #[test]
    fn rejects_bad_escapes_and_control_characters() {
        assert!(decode_string(br"\x", 3).is_err());
        assert_eq!(
            decode_string(b"a\nb", 3),
            Err(JsonError::text(3, "control character in string"))
        );
    }

    #[test]
    fn escapes_on_write() {
        let mut out = Writer::new();
        write_string(&mut out, "tab\there \"q\"");
        write_string(&mut out, "ok");
        assert_eq!(out.as_slice(), br#""tab\there \"q\"""ok""#);
    }
}
