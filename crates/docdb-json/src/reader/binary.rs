//! Forward-only tokenizer over a binary payload.

use crate::binary::marker::{MarkerClass, SINGLE_ITEM_ARRAY, SINGLE_PROPERTY_OBJECT};
use crate::binary::BinaryPayload;
use crate::dictionary::StringDictionary;
use crate::error::{JsonError, Result};
use crate::format::BINARY_FORMAT_MARKER;
use crate::token::Token;

#[derive(Debug, Clone, Copy)]
struct Frame {
    object: bool,
    /// End of the container payload. `None` for the single-child forms,
    /// which carry no length and close once `remaining` nodes are read.
    end: Option<usize>,
    remaining: usize,
    /// Nearest enclosing known payload end; no child may extend past it.
    limit: usize,
    /// Start of the container payload; base of reference offsets.
    scope: usize,
    expect_name: bool,
}

#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    payload: BinaryPayload<'a>,
    pos: usize,
    stack: Vec<Frame>,
    root_read: bool,
    current: Option<Token<'a>>,
}

impl<'a> BinaryReader<'a> {
    pub fn new(buf: &'a [u8], dict: Option<&'a StringDictionary>) -> Result<Self> {
        if buf.first() != Some(&BINARY_FORMAT_MARKER) {
            return Err(JsonError::NotBinary);
        }
        Ok(Self {
            payload: BinaryPayload::new(buf, dict),
            pos: 1,
            stack: Vec::new(),
            root_read: false,
            current: None,
        })
    }

    pub fn current(&self) -> Option<&Token<'a>> {
        self.current.as_ref()
    }

    pub fn take_current(&mut self) -> Option<Token<'a>> {
        self.current.take()
    }

    /// Moves to the next token. Returns `false` once the root value has been
    /// fully consumed and the payload is exhausted.
    pub fn advance(&mut self) -> Result<bool> {
        self.current = None;
        match self.stack.last().copied() {
            Some(frame) => {
                let closed = match frame.end {
                    Some(end) if self.pos > end => {
                        return Err(JsonError::ContainerOverrun { offset: end });
                    }
                    Some(end) => self.pos == end,
                    None => frame.remaining == 0,
                };
                if closed {
                    if frame.object && !frame.expect_name {
                        return Err(JsonError::ContainerOverrun { offset: self.pos });
                    }
                    self.stack.pop();
                    self.current = Some(if frame.object {
                        Token::EndObject
                    } else {
                        Token::EndArray
                    });
                    return Ok(true);
                }
            }
            None if self.root_read => {
                if self.pos == self.payload.buf.len() {
                    return Ok(false);
                }
                return Err(JsonError::TrailingData { offset: self.pos });
            }
            None => self.root_read = true,
        }

        let offset = self.pos;
        let (scope, limit) = self
            .stack
            .last()
            .map_or((offset, self.payload.buf.len()), |f| (f.scope, f.limit));
        let class = self.payload.class(offset)?;
        let as_name = match self.stack.last_mut() {
            Some(frame) => {
                frame.remaining = frame.remaining.saturating_sub(1);
                let expect_name = frame.object && frame.expect_name;
                if frame.object {
                    frame.expect_name = !frame.expect_name;
                }
                expect_name
            }
            None => false,
        };
        if as_name && class != MarkerClass::String {
            return Err(JsonError::InvalidMarker {
                marker: self.payload.buf[offset],
                offset,
            });
        }

        let token = match class {
            MarkerClass::Array | MarkerClass::Object => {
                let object = class == MarkerClass::Object;
                let marker = self.payload.buf[offset];
                let frame = if marker == SINGLE_ITEM_ARRAY || marker == SINGLE_PROPERTY_OBJECT {
                    let start = offset + 1;
                    if start > limit {
                        return Err(JsonError::ContainerOverrun { offset });
                    }
                    Frame {
                        object,
                        end: None,
                        remaining: if object { 2 } else { 1 },
                        limit,
                        scope: start,
                        expect_name: true,
                    }
                } else {
                    let (start, end) = self.payload.container_payload(offset)?;
                    if end > limit {
                        return Err(JsonError::ContainerOverrun { offset });
                    }
                    Frame {
                        object,
                        end: Some(end),
                        remaining: 0,
                        limit: end,
                        scope: start,
                        expect_name: true,
                    }
                };
                self.pos = frame.scope;
                self.stack.push(frame);
                if object {
                    Token::BeginObject
                } else {
                    Token::BeginArray
                }
            }
            _ => {
                let len = self.payload.node_len(offset)?;
                if offset + len > limit {
                    return Err(JsonError::ContainerOverrun { offset });
                }
                let token = if as_name {
                    Token::FieldName(self.payload.string(offset, scope)?)
                } else {
                    self.payload.scalar_token(offset, scope)?
                };
                self.pos = offset + len;
                token
            }
        };
        self.current = Some(token);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::marker::*;
    use crate::number::Number64;
    use std::borrow::Cow;

    fn tokens(buf: &[u8]) -> Result<Vec<Token<'_>>> {
        let mut reader = BinaryReader::new(buf, None)?;
        let mut out = Vec::new();
        while reader.advance()? {
            out.extend(reader.take_current());
        }
        Ok(out)
    }

    #[test]
    fn reads_single_property_object() {
        let buf = [
            0x80,
            SINGLE_PROPERTY_OBJECT,
            ENCODED_STRING_LENGTH_MIN + 1,
            b'a',
            0x02,
        ];
        assert_eq!(
            tokens(&buf).unwrap(),
            vec![
                Token::BeginObject,
                Token::FieldName(Cow::Borrowed("a")),
                Token::Number(Number64::Int(2)),
                Token::EndObject,
            ]
        );
    }

    #[test]
    fn rejects_missing_format_marker() {
        assert!(matches!(BinaryReader::new(b"{}", None), Err(JsonError::NotBinary)));
    }

    #[test]
    fn rejects_trailing_data() {
        assert_eq!(
            tokens(&[0x80, NULL, NULL]),
            Err(JsonError::TrailingData { offset: 2 })
        );
    }

    #[test]
    fn rejects_child_overrunning_container() {
        // Array claims 1 payload byte but holds a 3-byte Int16 node.
        let buf = [0x80, ARRAY_1BYTE_LENGTH, 1, NUMBER_INT16, 0xfe, 0xff];
        assert!(tokens(&buf).is_err());
    }

    #[test]
    fn single_child_frames_close_by_count() {
        // [[{"a": []}]] followed by nothing: the frames know when to close
        // without sizing their payload.
        let buf = [
            0x80,
            SINGLE_ITEM_ARRAY,
            SINGLE_ITEM_ARRAY,
            SINGLE_PROPERTY_OBJECT,
            ENCODED_STRING_LENGTH_MIN + 1,
            b'a',
            EMPTY_ARRAY,
        ];
        assert_eq!(
            tokens(&buf).unwrap(),
            vec![
                Token::BeginArray,
                Token::BeginArray,
                Token::BeginObject,
                Token::FieldName(Cow::Borrowed("a")),
                Token::BeginArray,
                Token::EndArray,
                Token::EndObject,
                Token::EndArray,
                Token::EndArray,
            ]
        );
    }

    #[test]
    fn single_child_inside_sized_container_respects_its_end() {
        // Array payload is 1 byte, but the single-item array inside needs 2.
        let buf = [0x80, ARRAY_1BYTE_LENGTH, 1, SINGLE_ITEM_ARRAY, NULL];
        assert_eq!(tokens(&buf), Err(JsonError::ContainerOverrun { offset: 4 }));
    }

    #[test]
    fn rejects_non_string_field_name() {
        let buf = [0x80, SINGLE_PROPERTY_OBJECT, NULL, NULL];
        assert_eq!(
            tokens(&buf),
            Err(JsonError::InvalidMarker { marker: NULL, offset: 2 })
        );
    }

    #[test]
    fn empty_payload_is_truncated() {
        assert_eq!(tokens(&[0x80]), Err(JsonError::UnexpectedEof { offset: 1 }));
    }
}
