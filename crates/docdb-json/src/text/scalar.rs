//! Scalar parsing: string literals, bare literals, numbers and sigils.

use std::borrow::Cow;
use std::str::FromStr;

use base64::Engine;

use super::{decode_string, find_ending_quote, scalar_end};
use crate::error::{JsonError, Result};
use crate::guid::Guid;
use crate::number::Number64;
use crate::token::Token;

/// Parses the non-container value starting at `pos` and returns it with the
/// position just past it.
pub(crate) fn parse_scalar(buf: &[u8], pos: usize) -> Result<(Token<'_>, usize)> {
    if buf.get(pos) == Some(&b'"') {
        let end = find_ending_quote(buf, pos + 1)?;
        let s = decode_string(&buf[pos + 1..end], pos)?;
        return Ok((Token::String(s), end + 1));
    }
    let end = scalar_end(buf, pos);
    if end == pos {
        return Err(if pos >= buf.len() {
            JsonError::UnexpectedEof { offset: pos }
        } else {
            JsonError::text(pos, "expected a value")
        });
    }
    Ok((parse_bare(&buf[pos..end], pos)?, end))
}

fn parse_bare(lit: &[u8], offset: usize) -> Result<Token<'static>> {
    let token = match lit {
        b"null" => Token::Null,
        b"true" => Token::True,
        b"false" => Token::False,
        b"NaN" | b"Infinity" | b"-Infinity" => Token::Number(Number64::Double(special(lit))),
        [b'-' | b'0'..=b'9', ..] => Token::Number(parse_number(lit, offset)?),
        [b'L', b'L', rest @ ..] => Token::Int64(parse_int(rest, offset)?),
        [b'U', b'L', rest @ ..] => Token::UInt32(parse_int(rest, offset)?),
        [b'I', rest @ ..] => Token::Int8(parse_int(rest, offset)?),
        [b'H', rest @ ..] => Token::Int16(parse_int(rest, offset)?),
        [b'L', rest @ ..] => Token::Int32(parse_int(rest, offset)?),
        [b'S', rest @ ..] => Token::Float32(parse_float(rest, offset)?),
        [b'D', rest @ ..] => Token::Float64(parse_float(rest, offset)?),
        [b'G', rest @ ..] => Token::Guid(
            std::str::from_utf8(rest)
                .ok()
                .and_then(Guid::parse)
                .ok_or(JsonError::text(offset, "invalid GUID"))?,
        ),
        [b'B', rest @ ..] => Token::Binary(Cow::Owned(
            base64::engine::general_purpose::STANDARD
                .decode(rest)
                .map_err(|_| JsonError::text(offset, "invalid base64 payload"))?,
        )),
        _ => return Err(JsonError::text(offset, "unexpected literal")),
    };
    Ok(token)
}

fn special(lit: &[u8]) -> f64 {
    match lit {
        b"Infinity" => f64::INFINITY,
        b"-Infinity" => f64::NEG_INFINITY,
        _ => f64::NAN,
    }
}

/// Validates `lit` against the JSON number grammar and reports whether it
/// has a fraction or exponent.
fn number_shape(lit: &[u8]) -> Option<bool> {
    let len = lit.len();
    let mut x = 0;
    if lit.first() == Some(&b'-') {
        x += 1;
    }
    match lit.get(x) {
        Some(b'0') => x += 1,
        Some(b'1'..=b'9') => {
            while x < len && lit[x].is_ascii_digit() {
                x += 1;
            }
        }
        _ => return None,
    }
    let mut is_float = false;
    if x < len && lit[x] == b'.' {
        is_float = true;
        x += 1;
        let digits = x;
        while x < len && lit[x].is_ascii_digit() {
            x += 1;
        }
        if x == digits {
            return None;
        }
    }
    if x < len && (lit[x] == b'e' || lit[x] == b'E') {
        is_float = true;
        x += 1;
        if x < len && (lit[x] == b'+' || lit[x] == b'-') {
            x += 1;
        }
        let digits = x;
        while x < len && lit[x].is_ascii_digit() {
            x += 1;
        }
        if x == digits {
            return None;
        }
    }
    (x == len).then_some(is_float)
}

/// Parses a JSON number literal. Integral literals that fit an `i64` stay
/// exact; everything else becomes a double.
fn parse_number(lit: &[u8], offset: usize) -> Result<Number64> {
    let is_float = number_shape(lit).ok_or(JsonError::text(offset, "invalid number"))?;
    let s = std::str::from_utf8(lit).map_err(|_| JsonError::text(offset, "invalid number"))?;
    if !is_float {
        match s.parse::<i64>() {
            Ok(0) if lit[0] == b'-' => return Ok(Number64::Double(-0.0)),
            Ok(i) => return Ok(Number64::Int(i)),
            Err(_) => {}
        }
    }
    s.parse::<f64>()
        .map(Number64::Double)
        .map_err(|_| JsonError::text(offset, "invalid number"))
}

fn parse_int<T: FromStr>(digits: &[u8], offset: usize) -> Result<T> {
    let (sign, body) = match digits {
        [b'-', body @ ..] => (1, body),
        _ => (0, digits),
    };
    if body.is_empty() || !body.iter().all(u8::is_ascii_digit) {
        return Err(JsonError::text(offset, "invalid integer"));
    }
    std::str::from_utf8(&digits[..sign + body.len()])
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .ok_or(JsonError::text(offset, "integer out of range"))
}

fn parse_float<T: FromStr>(lit: &[u8], offset: usize) -> Result<T> {
    let valid = matches!(lit, b"NaN" | b"Infinity" | b"-Infinity") || number_shape(lit).is_some();
    if !valid {
        return Err(JsonError::text(offset, "invalid number"));
    }
    std::str::from_utf8(lit)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .ok_or(JsonError::text(offset, "invalid number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(text: &str) -> Result<Token<'_>> {
        parse_scalar(text.as_bytes(), 0).map(|(token, _)| token)
    }

    #[test]
    fn literals() {
        assert_eq!(scalar("null").unwrap(), Token::Null);
        assert_eq!(scalar("true").unwrap(), Token::True);
        assert!(scalar("nul").is_err());
        assert!(scalar("truex").is_err());
    }

    #[test]
    fn numbers() {
        assert_eq!(scalar("42").unwrap(), Token::Number(Number64::Int(42)));
        assert_eq!(scalar("-1.5e3").unwrap(), Token::Number(Number64::Double(-1500.0)));
        assert!(matches!(
            scalar("-Infinity").unwrap(),
            Token::Number(Number64::Double(d)) if d == f64::NEG_INFINITY
        ));
        assert!(matches!(scalar("NaN").unwrap(), Token::Number(Number64::Double(d)) if d.is_nan()));
        assert!(matches!(
            scalar("-0").unwrap(),
            Token::Number(n) if n.is_negative_zero()
        ));
        assert_eq!(scalar("0").unwrap(), Token::Number(Number64::Int(0)));
        assert!(scalar("01").is_err());
        assert!(scalar("1.").is_err());
        assert!(scalar("+1").is_err());
        assert!(scalar("1e").is_err());
    }

    #[test]
    fn integers_beyond_i64_become_doubles() {
        assert_eq!(
            scalar("18446744073709551616").unwrap(),
            Token::Number(Number64::Double(18446744073709551616.0))
        );
    }

    #[test]
    fn sigils() {
        assert_eq!(scalar("I-5").unwrap(), Token::Int8(-5));
        assert_eq!(scalar("H300").unwrap(), Token::Int16(300));
        assert_eq!(scalar("L-70000").unwrap(), Token::Int32(-70000));
        assert_eq!(scalar("LL9007199254740993").unwrap(), Token::Int64(9007199254740993));
        assert_eq!(scalar("UL4294967295").unwrap(), Token::UInt32(u32::MAX));
        assert_eq!(scalar("S1.5").unwrap(), Token::Float32(1.5));
        assert_eq!(scalar("D-0.25").unwrap(), Token::Float64(-0.25));
        assert_eq!(scalar("BAQID").unwrap(), Token::Binary(Cow::Owned(vec![1, 2, 3])));
        assert_eq!(
            scalar("GED7E38AA-074E-4A74-BAB0-2A4F41079BAA").unwrap(),
            Token::Guid(Guid::parse("ed7e38aa-074e-4a74-bab0-2a4f41079baa").unwrap())
        );
    }

    #[test]
    fn sigil_range_and_shape_errors() {
        assert!(scalar("I128").is_err());
        assert!(scalar("UL-1").is_err());
        assert!(scalar("I+1").is_err());
        assert!(scalar("L").is_err());
        assert!(scalar("Gnot-a-guid").is_err());
        assert!(scalar("B!!").is_err());
        assert!(scalar("Infinit").is_err());
    }

    #[test]
    fn strings_report_their_end() {
        let (token, end) = parse_scalar(br#""ab" ,"#, 0).unwrap();
        assert_eq!(token, Token::String(Cow::Borrowed("ab")));
        assert_eq!(end, 4);
    }
}
