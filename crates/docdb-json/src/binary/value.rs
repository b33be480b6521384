//! Node-level decoding over a binary payload.
//!
//! [`BinaryPayload`] answers "what is the node at this offset" questions
//! without decoding anything else. The binary reader and the binary
//! navigator both go through it, which keeps their view of a payload
//! identical.

use std::borrow::Cow;

use docdb_buffers::Reader;

use super::marker::*;
use super::strings::{compressed_node_len, decode_compressed};
use super::system_strings::system_string;
use crate::dictionary::StringDictionary;
use crate::error::{JsonError, Result};
use crate::guid::Guid;
use crate::number::Number64;
use crate::token::{JsonNodeType, Token};

#[derive(Debug, Clone, Copy)]
pub(crate) struct BinaryPayload<'a> {
    pub(crate) buf: &'a [u8],
    dict: Option<&'a StringDictionary>,
}

impl<'a> BinaryPayload<'a> {
    pub(crate) fn new(buf: &'a [u8], dict: Option<&'a StringDictionary>) -> Self {
        Self { buf, dict }
    }

    pub(crate) fn marker(&self, offset: usize) -> Result<u8> {
        self.buf
            .get(offset)
            .copied()
            .ok_or(JsonError::UnexpectedEof { offset })
    }

    pub(crate) fn class(&self, offset: usize) -> Result<MarkerClass> {
        let marker = self.marker(offset)?;
        classify(marker).ok_or(JsonError::InvalidMarker { marker, offset })
    }

    pub(crate) fn node_type(&self, offset: usize) -> Result<JsonNodeType> {
        Ok(node_type_of(self.class(offset)?))
    }

    /// Total encoded size of the node at `offset`, checked against the
    /// buffer end.
    ///
    /// Single-child containers carry no length prefix, so a chain of them is
    /// walked iteratively down to the first node that does know its size.
    pub(crate) fn node_len(&self, offset: usize) -> Result<usize> {
        let mut pos = offset;
        loop {
            match self.marker(pos)? {
                SINGLE_ITEM_ARRAY => pos += 1,
                SINGLE_PROPERTY_OBJECT => {
                    let name = pos + 1;
                    let marker = self.marker(name)?;
                    if matches!(marker, SINGLE_ITEM_ARRAY | SINGLE_PROPERTY_OBJECT) {
                        return Err(JsonError::InvalidMarker { marker, offset: name });
                    }
                    pos = name + self.prefixed_len(name)?;
                }
                _ => return Ok(pos + self.prefixed_len(pos)? - offset),
            }
        }
    }

    /// Size of a node whose marker alone (plus any length prefix) determines
    /// it. Single-child containers are rejected here.
    fn prefixed_len(&self, offset: usize) -> Result<usize> {
        let marker = self.marker(offset)?;
        classify(marker).ok_or(JsonError::InvalidMarker { marker, offset })?;
        let mut reader = Reader::at(self.buf, offset + 1);
        let len = match marker {
            LITERAL_INT_MIN..=USER_STRING_1BYTE_MAX => 1,
            USER_STRING_2BYTE_MIN..=USER_STRING_2BYTE_MAX => 2,
            LOWERCASE_GUID_STRING..=PACKED_7BIT_STRING_LENGTH2 => {
                compressed_node_len(marker, self.buf, offset)?
            }
            REFERENCE_STRING_1BYTE_OFFSET => 2,
            REFERENCE_STRING_2BYTE_OFFSET => 3,
            ENCODED_STRING_LENGTH_MIN..=ENCODED_STRING_LENGTH_MAX => {
                1 + usize::from(marker - ENCODED_STRING_LENGTH_MIN)
            }
            NUMBER_UINT8 | INT8 => 2,
            NUMBER_INT16 | INT16 => 3,
            NUMBER_INT32 | INT32 | UINT32 | FLOAT32 => 5,
            NUMBER_INT64 | NUMBER_DOUBLE | INT64 | FLOAT64 => 9,
            NULL | FALSE | TRUE | EMPTY_ARRAY | EMPTY_OBJECT => 1,
            GUID => 17,
            _ => {
                let width =
                    length_width(marker).ok_or(JsonError::InvalidMarker { marker, offset })?;
                let payload = reader.length(width)?;
                (1 + width)
                    .checked_add(payload)
                    .ok_or(JsonError::UnexpectedEof { offset })?
            }
        };
        match offset.checked_add(len) {
            Some(end) if end <= self.buf.len() => Ok(len),
            _ => Err(JsonError::UnexpectedEof { offset }),
        }
    }

    /// `(start, end)` of the child sequence of the container at `offset`.
    pub(crate) fn container_payload(&self, offset: usize) -> Result<(usize, usize)> {
        let marker = self.marker(offset)?;
        let start = match marker {
            EMPTY_ARRAY | EMPTY_OBJECT => return Ok((offset + 1, offset + 1)),
            SINGLE_ITEM_ARRAY | SINGLE_PROPERTY_OBJECT => offset + 1,
            ARRAY_1BYTE_LENGTH..=ARRAY_4BYTE_LENGTH | OBJECT_1BYTE_LENGTH..=OBJECT_4BYTE_LENGTH => {
                let width =
                    length_width(marker).ok_or(JsonError::InvalidMarker { marker, offset })?;
                offset + 1 + width
            }
            _ => {
                return Err(JsonError::UnexpectedNodeType {
                    expected: JsonNodeType::Array,
                    actual: self.node_type(offset)?,
                })
            }
        };
        Ok((start, offset + self.node_len(offset)?))
    }

    fn expect(&self, offset: usize, expected: JsonNodeType) -> Result<Reader<'a>> {
        let actual = self.node_type(offset)?;
        if actual != expected {
            return Err(JsonError::UnexpectedNodeType { expected, actual });
        }
        Ok(Reader::at(self.buf, offset + 1))
    }

    pub(crate) fn number(&self, offset: usize) -> Result<Number64> {
        let mut reader = self.expect(offset, JsonNodeType::Number)?;
        let marker = self.buf[offset];
        Ok(match marker {
            LITERAL_INT_MIN..=LITERAL_INT_MAX => Number64::Int(i64::from(marker - LITERAL_INT_MIN)),
            NUMBER_UINT8 => Number64::Int(i64::from(reader.u8()?)),
            NUMBER_INT16 => Number64::Int(i64::from(reader.i16()?)),
            NUMBER_INT32 => Number64::Int(i64::from(reader.i32()?)),
            NUMBER_INT64 => Number64::Int(reader.i64()?),
            _ => Number64::Double(reader.f64()?),
        })
    }

    /// Decodes the string node at `offset`; `scope` is the payload start of
    /// the enclosing container, the base of reference offsets.
    pub(crate) fn string(&self, offset: usize, scope: usize) -> Result<Cow<'a, str>> {
        let mut reader = self.expect(offset, JsonNodeType::String)?;
        let marker = self.buf[offset];
        match marker {
            SYSTEM_STRING_1BYTE_MIN..=SYSTEM_STRING_1BYTE_MAX => {
                system_string(usize::from(marker - SYSTEM_STRING_1BYTE_MIN))
                    .map(Cow::Borrowed)
                    .ok_or(JsonError::UnresolvedString { offset })
            }
            USER_STRING_1BYTE_MIN..=USER_STRING_1BYTE_MAX => {
                self.user_string(usize::from(marker - USER_STRING_1BYTE_MIN), offset)
            }
            USER_STRING_2BYTE_MIN..=USER_STRING_2BYTE_MAX => {
                let low = usize::from(reader.u8()?);
                let high = usize::from(marker - USER_STRING_2BYTE_MIN);
                self.user_string(USER_STRING_1BYTE_COUNT + high * 256 + low, offset)
            }
            REFERENCE_STRING_1BYTE_OFFSET | REFERENCE_STRING_2BYTE_OFFSET => {
                let relative = if marker == REFERENCE_STRING_1BYTE_OFFSET {
                    usize::from(reader.u8()?)
                } else {
                    usize::from(reader.u16()?)
                };
                let target = scope + relative;
                let target_marker = self.marker(target)?;
                let is_reference = matches!(
                    target_marker,
                    REFERENCE_STRING_1BYTE_OFFSET | REFERENCE_STRING_2BYTE_OFFSET
                );
                if target >= offset || is_reference {
                    return Err(JsonError::UnresolvedString { offset });
                }
                self.string(target, scope)
                    .map_err(|_| JsonError::UnresolvedString { offset })
            }
            ENCODED_STRING_LENGTH_MIN..=ENCODED_STRING_LENGTH_MAX => {
                let len = usize::from(marker - ENCODED_STRING_LENGTH_MIN);
                utf8(reader.buf(len)?, offset)
            }
            STRING_1BYTE_LENGTH..=STRING_4BYTE_LENGTH => {
                let width =
                    length_width(marker).ok_or(JsonError::InvalidMarker { marker, offset })?;
                let len = reader.length(width)?;
                utf8(reader.buf(len)?, offset)
            }
            _ => decode_compressed(marker, self.buf, offset).map(Cow::Owned),
        }
    }

    fn user_string(&self, id: usize, offset: usize) -> Result<Cow<'a, str>> {
        self.dict
            .and_then(|dict| dict.get(id))
            .map(Cow::Borrowed)
            .ok_or(JsonError::UnresolvedString { offset })
    }

    pub(crate) fn int8(&self, offset: usize) -> Result<i8> {
        Ok(self.expect(offset, JsonNodeType::Int8)?.i8()?)
    }

    pub(crate) fn int16(&self, offset: usize) -> Result<i16> {
        Ok(self.expect(offset, JsonNodeType::Int16)?.i16()?)
    }

    pub(crate) fn int32(&self, offset: usize) -> Result<i32> {
        Ok(self.expect(offset, JsonNodeType::Int32)?.i32()?)
    }

    pub(crate) fn int64(&self, offset: usize) -> Result<i64> {
        Ok(self.expect(offset, JsonNodeType::Int64)?.i64()?)
    }

    pub(crate) fn uint32(&self, offset: usize) -> Result<u32> {
        Ok(self.expect(offset, JsonNodeType::UInt32)?.u32()?)
    }

    pub(crate) fn float32(&self, offset: usize) -> Result<f32> {
        Ok(self.expect(offset, JsonNodeType::Float32)?.f32()?)
    }

    pub(crate) fn float64(&self, offset: usize) -> Result<f64> {
        Ok(self.expect(offset, JsonNodeType::Float64)?.f64()?)
    }

    pub(crate) fn guid(&self, offset: usize) -> Result<Guid> {
        Ok(Guid::from_bytes(self.expect(offset, JsonNodeType::Guid)?.array::<16>()?))
    }

    pub(crate) fn binary(&self, offset: usize) -> Result<&'a [u8]> {
        let mut reader = self.expect(offset, JsonNodeType::Binary)?;
        let width = length_width(self.buf[offset]).unwrap_or(4);
        let len = reader.length(width)?;
        Ok(reader.buf(len)?)
    }

    /// Decodes a non-container node into a token.
    pub(crate) fn scalar_token(&self, offset: usize, scope: usize) -> Result<Token<'a>> {
        let token = match self.class(offset)? {
            MarkerClass::Null => Token::Null,
            MarkerClass::False => Token::False,
            MarkerClass::True => Token::True,
            MarkerClass::Number => Token::Number(self.number(offset)?),
            MarkerClass::String => Token::String(self.string(offset, scope)?),
            MarkerClass::Int8 => Token::Int8(self.int8(offset)?),
            MarkerClass::Int16 => Token::Int16(self.int16(offset)?),
            MarkerClass::Int32 => Token::Int32(self.int32(offset)?),
            MarkerClass::Int64 => Token::Int64(self.int64(offset)?),
            MarkerClass::UInt32 => Token::UInt32(self.uint32(offset)?),
            MarkerClass::Float32 => Token::Float32(self.float32(offset)?),
            MarkerClass::Float64 => Token::Float64(self.float64(offset)?),
            MarkerClass::Guid => Token::Guid(self.guid(offset)?),
            MarkerClass::Binary => Token::Binary(Cow::Borrowed(self.binary(offset)?)),
            MarkerClass::Array | MarkerClass::Object => {
                return Err(JsonError::UnexpectedNodeType {
                    expected: JsonNodeType::String,
                    actual: self.node_type(offset)?,
                })
            }
        };
        Ok(token)
    }
}

fn utf8(bytes: &[u8], offset: usize) -> Result<Cow<'_, str>> {
    std::str::from_utf8(bytes)
        .map(Cow::Borrowed)
        .map_err(|_| JsonError::InvalidUtf8 { offset })
}

pub(crate) fn node_type_of(class: MarkerClass) -> JsonNodeType {
    match class {
        MarkerClass::Null => JsonNodeType::Null,
        MarkerClass::False => JsonNodeType::False,
        MarkerClass::True => JsonNodeType::True,
        MarkerClass::Number => JsonNodeType::Number,
        MarkerClass::String => JsonNodeType::String,
        MarkerClass::Array => JsonNodeType::Array,
        MarkerClass::Object => JsonNodeType::Object,
        MarkerClass::Int8 => JsonNodeType::Int8,
        MarkerClass::Int16 => JsonNodeType::Int16,
        MarkerClass::Int32 => JsonNodeType::Int32,
        MarkerClass::Int64 => JsonNodeType::Int64,
        MarkerClass::UInt32 => JsonNodeType::UInt32,
        MarkerClass::Float32 => JsonNodeType::Float32,
        MarkerClass::Float64 => JsonNodeType::Float64,
        MarkerClass::Guid => JsonNodeType::Guid,
        MarkerClass::Binary => JsonNodeType::Binary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_lengths() {
        let buf = [0x80, NUMBER_INT16, 0xfe, 0xff];
        let payload = BinaryPayload::new(&buf, None);
        assert_eq!(payload.node_len(1).unwrap(), 3);
        assert_eq!(payload.number(1).unwrap(), Number64::Int(-2));
    }

    #[test]
    fn single_child_chain_lengths() {
        // [{"a": [7]}]
        let buf = [
            0x80,
            SINGLE_ITEM_ARRAY,
            SINGLE_PROPERTY_OBJECT,
            ENCODED_STRING_LENGTH_MIN + 1,
            b'a',
            SINGLE_ITEM_ARRAY,
            0x07,
        ];
        let payload = BinaryPayload::new(&buf, None);
        assert_eq!(payload.node_len(1).unwrap(), 6);
        assert_eq!(payload.node_len(2).unwrap(), 5);
        assert_eq!(payload.container_payload(2).unwrap(), (3, 7));
    }

    #[test]
    fn long_single_child_chain_is_sized_without_recursion() {
        let mut buf = vec![0x80];
        buf.extend(std::iter::repeat(SINGLE_ITEM_ARRAY).take(200_000));
        buf.push(NULL);
        let payload = BinaryPayload::new(&buf, None);
        assert_eq!(payload.node_len(1).unwrap(), 200_001);
        buf.pop();
        let payload = BinaryPayload::new(&buf, None);
        assert_eq!(
            payload.node_len(1),
            Err(JsonError::UnexpectedEof { offset: 200_001 })
        );
    }

    #[test]
    fn container_as_single_property_name_is_rejected() {
        let buf = [0x80, SINGLE_PROPERTY_OBJECT, SINGLE_ITEM_ARRAY, NULL, NULL];
        let payload = BinaryPayload::new(&buf, None);
        assert_eq!(
            payload.node_len(1),
            Err(JsonError::InvalidMarker { marker: SINGLE_ITEM_ARRAY, offset: 2 })
        );
    }

    #[test]
    fn truncated_length_prefix() {
        let buf = [0x80, STRING_1BYTE_LENGTH, 200, b'a'];
        let payload = BinaryPayload::new(&buf, None);
        assert_eq!(payload.node_len(1), Err(JsonError::UnexpectedEof { offset: 1 }));
    }

    #[test]
    fn invalid_marker() {
        let buf = [0x80, 0xff];
        let payload = BinaryPayload::new(&buf, None);
        assert_eq!(
            payload.node_len(1),
            Err(JsonError::InvalidMarker { marker: 0xff, offset: 1 })
        );
    }

    #[test]
    fn user_string_without_dictionary_is_unresolved() {
        let buf = [0x80, USER_STRING_1BYTE_MIN];
        let payload = BinaryPayload::new(&buf, None);
        assert_eq!(
            payload.string(1, 1),
            Err(JsonError::UnresolvedString { offset: 1 })
        );
    }

    #[test]
    fn forward_reference_is_rejected() {
        // [ref -> +0 ] where offset 0 of the array payload is the reference itself.
        let buf = [0x80, SINGLE_ITEM_ARRAY, REFERENCE_STRING_1BYTE_OFFSET, 0];
        let payload = BinaryPayload::new(&buf, None);
        assert_eq!(
            payload.string(2, 2),
            Err(JsonError::UnresolvedString { offset: 2 })
        );
    }

    #[test]
    fn invalid_utf8() {
        let buf = [0x80, ENCODED_STRING_LENGTH_MIN + 2, 0xc3, 0x28];
        let payload = BinaryPayload::new(&buf, None);
        assert_eq!(payload.string(1, 1), Err(JsonError::InvalidUtf8 { offset: 1 }));
    }
}
