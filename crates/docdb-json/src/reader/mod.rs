//! Forward-only token readers.
//!
//! [`Reader`] is the canonical answer to "which tokens does this payload
//! contain": the navigators and writers are all checked against it.

mod binary;
mod text;

pub use binary::BinaryReader;
pub use text::TextReader;

use crate::dictionary::StringDictionary;
use crate::error::{JsonError, Result};
use crate::format::SerializationFormat;
use crate::guid::Guid;
use crate::number::Number64;
use crate::token::{Token, TokenType};

/// A reader over either payload format.
#[derive(Debug, Clone)]
pub enum Reader<'a> {
    Text(TextReader<'a>),
    Binary(BinaryReader<'a>),
}

impl<'a> Reader<'a> {
    /// Creates a reader for `buf`, detecting the format from its first byte.
    /// `dict` is needed to resolve user strings in binary payloads.
    pub fn new(buf: &'a [u8], dict: Option<&'a StringDictionary>) -> Result<Self> {
        match SerializationFormat::detect(buf) {
            SerializationFormat::Text => Ok(Self::text(buf)),
            SerializationFormat::Binary => Self::binary(buf, dict),
        }
    }

    pub fn text(buf: &'a [u8]) -> Self {
        Reader::Text(TextReader::new(buf))
    }

    pub fn binary(buf: &'a [u8], dict: Option<&'a StringDictionary>) -> Result<Self> {
        Ok(Reader::Binary(BinaryReader::new(buf, dict)?))
    }

    pub fn format(&self) -> SerializationFormat {
        match self {
            Reader::Text(_) => SerializationFormat::Text,
            Reader::Binary(_) => SerializationFormat::Binary,
        }
    }

    /// Moves to the next token; `false` at the end of the payload.
    pub fn advance(&mut self) -> Result<bool> {
        match self {
            Reader::Text(r) => r.advance(),
            Reader::Binary(r) => r.advance(),
        }
    }

    pub fn current_token(&self) -> Option<&Token<'a>> {
        match self {
            Reader::Text(r) => r.current(),
            Reader::Binary(r) => r.current(),
        }
    }

    pub fn current_token_type(&self) -> Option<TokenType> {
        self.current_token().map(Token::token_type)
    }

    /// Advances and hands over the new token, or `None` at the end.
    pub fn read_token(&mut self) -> Result<Option<Token<'a>>> {
        if !self.advance()? {
            return Ok(None);
        }
        Ok(match self {
            Reader::Text(r) => r.take_current(),
            Reader::Binary(r) => r.take_current(),
        })
    }

    fn mismatch(&self, expected: TokenType) -> JsonError {
        JsonError::UnexpectedToken {
            expected,
            actual: self.current_token_type(),
        }
    }

    pub fn get_number(&self) -> Result<Number64> {
        match self.current_token() {
            Some(Token::Number(n)) => Ok(*n),
            _ => Err(self.mismatch(TokenType::Number)),
        }
    }

    pub fn get_string(&self) -> Result<&str> {
        match self.current_token() {
            Some(Token::String(s)) => Ok(s.as_ref()),
            _ => Err(self.mismatch(TokenType::String)),
        }
    }

    pub fn get_field_name(&self) -> Result<&str> {
        match self.current_token() {
            Some(Token::FieldName(s)) => Ok(s.as_ref()),
            _ => Err(self.mismatch(TokenType::FieldName)),
        }
    }

    pub fn get_bool(&self) -> Result<bool> {
        match self.current_token() {
            Some(Token::True) => Ok(true),
            Some(Token::False) => Ok(false),
            _ => Err(self.mismatch(TokenType::True)),
        }
    }

    pub fn get_int8(&self) -> Result<i8> {
        match self.current_token() {
            Some(Token::Int8(v)) => Ok(*v),
            _ => Err(self.mismatch(TokenType::Int8)),
        }
    }

    pub fn get_int16(&self) -> Result<i16> {
        match self.current_token() {
            Some(Token::Int16(v)) => Ok(*v),
            _ => Err(self.mismatch(TokenType::Int16)),
        }
    }

    pub fn get_int32(&self) -> Result<i32> {
        match self.current_token() {
            Some(Token::Int32(v)) => Ok(*v),
            _ => Err(self.mismatch(TokenType::Int32)),
        }
    }

    pub fn get_int64(&self) -> Result<i64> {
        match self.current_token() {
            Some(Token::Int64(v)) => Ok(*v),
            _ => Err(self.mismatch(TokenType::Int64)),
        }
    }

    pub fn get_uint32(&self) -> Result<u32> {
        match self.current_token() {
            Some(Token::UInt32(v)) => Ok(*v),
            _ => Err(self.mismatch(TokenType::UInt32)),
        }
    }

    pub fn get_float32(&self) -> Result<f32> {
        match self.current_token() {
            Some(Token::Float32(v)) => Ok(*v),
            _ => Err(self.mismatch(TokenType::Float32)),
        }
    }

    pub fn get_float64(&self) -> Result<f64> {
        match self.current_token() {
            Some(Token::Float64(v)) => Ok(*v),
            _ => Err(self.mismatch(TokenType::Float64)),
        }
    }

    pub fn get_guid(&self) -> Result<Guid> {
        match self.current_token() {
            Some(Token::Guid(g)) => Ok(*g),
            _ => Err(self.mismatch(TokenType::Guid)),
        }
    }

    pub fn get_binary(&self) -> Result<&[u8]> {
        match self.current_token() {
            Some(Token::Binary(b)) => Ok(b.as_ref()),
            _ => Err(self.mismatch(TokenType::Binary)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format() {
        assert_eq!(Reader::new(b"[]", None).unwrap().format(), SerializationFormat::Text);
        assert_eq!(
            Reader::new(&[0x80, 0xe0], None).unwrap().format(),
            SerializationFormat::Binary
        );
    }

    #[test]
    fn typed_getters_check_the_current_token() {
        let mut reader = Reader::text(br#"["x", 7]"#);
        assert!(reader.advance().unwrap());
        assert_eq!(
            reader.get_string(),
            Err(JsonError::UnexpectedToken {
                expected: TokenType::String,
                actual: Some(TokenType::BeginArray),
            })
        );
        reader.advance().unwrap();
        assert_eq!(reader.get_string().unwrap(), "x");
        reader.advance().unwrap();
        assert_eq!(reader.get_number().unwrap(), Number64::Int(7));
        assert!(reader.advance().unwrap());
        assert!(!reader.advance().unwrap());
        assert_eq!(reader.current_token_type(), None);
    }

    #[test]
    fn read_token_takes_ownership() {
        let mut reader = Reader::text(b"true");
        assert_eq!(reader.read_token().unwrap(), Some(Token::True));
        assert_eq!(reader.read_token().unwrap(), None);
    }
}
