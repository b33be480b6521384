//! Value kinds and the transient tokens exchanged by readers and writers.

use std::borrow::Cow;

use crate::guid::Guid;
use crate::number::Number64;

/// Kind of a navigator node.
///
/// The first eight kinds are plain JSON; the rest are the extended kinds that
/// keep sized numbers, GUIDs and binary payloads distinct from `Number` and
/// `String` across a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonNodeType {
    Null,
    False,
    True,
    Number,
    String,
    Array,
    Object,
    FieldName,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt32,
    Float32,
    Float64,
    Guid,
    Binary,
}

/// Kind of a reader token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    BeginArray,
    EndArray,
    BeginObject,
    EndObject,
    Null,
    True,
    False,
    Number,
    String,
    FieldName,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt32,
    Float32,
    Float64,
    Guid,
    Binary,
}

/// One token of a JSON stream, borrowing from the source buffer when it can.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    BeginArray,
    EndArray,
    BeginObject,
    EndObject,
    Null,
    True,
    False,
    Number(Number64),
    String(Cow<'a, str>),
    FieldName(Cow<'a, str>),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    Float32(f32),
    Float64(f64),
    Guid(Guid),
    Binary(Cow<'a, [u8]>),
}

impl Token<'_> {
    pub fn token_type(&self) -> TokenType {
        match self {
            Token::BeginArray => TokenType::BeginArray,
            Token::EndArray => TokenType::EndArray,
            Token::BeginObject => TokenType::BeginObject,
            Token::EndObject => TokenType::EndObject,
            Token::Null => TokenType::Null,
            Token::True => TokenType::True,
            Token::False => TokenType::False,
            Token::Number(_) => TokenType::Number,
            Token::String(_) => TokenType::String,
            Token::FieldName(_) => TokenType::FieldName,
            Token::Int8(_) => TokenType::Int8,
            Token::Int16(_) => TokenType::Int16,
            Token::Int32(_) => TokenType::Int32,
            Token::Int64(_) => TokenType::Int64,
            Token::UInt32(_) => TokenType::UInt32,
            Token::Float32(_) => TokenType::Float32,
            Token::Float64(_) => TokenType::Float64,
            Token::Guid(_) => TokenType::Guid,
            Token::Binary(_) => TokenType::Binary,
        }
    }

    /// Detaches the token from the buffer it was read from.
    pub fn into_owned(self) -> Token<'static> {
        match self {
            Token::BeginArray => Token::BeginArray,
            Token::EndArray => Token::EndArray,
            Token::BeginObject => Token::BeginObject,
            Token::EndObject => Token::EndObject,
            Token::Null => Token::Null,
            Token::True => Token::True,
            Token::False => Token::False,
            Token::Number(n) => Token::Number(n),
            Token::String(s) => Token::String(Cow::Owned(s.into_owned())),
            Token::FieldName(s) => Token::FieldName(Cow::Owned(s.into_owned())),
            Token::Int8(v) => Token::Int8(v),
            Token::Int16(v) => Token::Int16(v),
            Token::Int32(v) => Token::Int32(v),
            Token::Int64(v) => Token::Int64(v),
            Token::UInt32(v) => Token::UInt32(v),
            Token::Float32(v) => Token::Float32(v),
            Token::Float64(v) => Token::Float64(v),
            Token::Guid(g) => Token::Guid(g),
            Token::Binary(b) => Token::Binary(Cow::Owned(b.into_owned())),
        }
    }
}
