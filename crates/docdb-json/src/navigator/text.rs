use crate::error::{JsonError, Result};
use crate::reader::TextReader;
use crate::text::{parse_scalar, skip_value, skip_whitespace};
use crate::token::{JsonNodeType, Token};

use super::iter::ChildCursor;
use super::NavigatorNode;

/// Navigator over a text payload.
///
/// The payload is validated once on construction; afterwards nodes are
/// located by scanning, since text carries no length prefixes.
#[derive(Debug, Clone)]
pub struct TextNavigator<'a> {
    buf: &'a [u8],
    root: NavigatorNode,
}

impl<'a> TextNavigator<'a> {
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        let mut reader = TextReader::new(buf);
        let mut tokens = 0usize;
        while reader.advance()? {
            tokens += 1;
        }
        tracing::trace!(len = buf.len(), tokens, "validated text payload");
        let start = skip_whitespace(buf, 0);
        let end = skip_value(buf, start)?;
        Ok(Self {
            buf,
            root: NavigatorNode::new(start, end),
        })
    }

    pub(crate) fn root(&self) -> NavigatorNode {
        self.root
    }

    pub(crate) fn node_type(&self, node: NavigatorNode) -> Result<JsonNodeType> {
        let rest = self
            .buf
            .get(node.offset..)
            .ok_or(JsonError::UnexpectedEof { offset: node.offset })?;
        let kind = match rest {
            [b'"', ..] => JsonNodeType::String,
            [b'[', ..] => JsonNodeType::Array,
            [b'{', ..] => JsonNodeType::Object,
            [b'n', ..] => JsonNodeType::Null,
            [b't', ..] => JsonNodeType::True,
            [b'f', ..] => JsonNodeType::False,
            [b'-' | b'0'..=b'9' | b'N', ..] => JsonNodeType::Number,
            [b'I', b'n', ..] => JsonNodeType::Number,
            [b'I', ..] => JsonNodeType::Int8,
            [b'H', ..] => JsonNodeType::Int16,
            [b'L', b'L', ..] => JsonNodeType::Int64,
            [b'L', ..] => JsonNodeType::Int32,
            [b'U', ..] => JsonNodeType::UInt32,
            [b'S', ..] => JsonNodeType::Float32,
            [b'D', ..] => JsonNodeType::Float64,
            [b'G', ..] => JsonNodeType::Guid,
            [b'B', ..] => JsonNodeType::Binary,
            _ => return Err(JsonError::text(node.offset, "unexpected character")),
        };
        Ok(kind)
    }

    pub(crate) fn token(&self, node: NavigatorNode) -> Result<Token<'a>> {
        let (token, _) = parse_scalar(self.buf, node.offset)?;
        Ok(match token {
            Token::String(s) if node.field_name => Token::FieldName(s),
            token => token,
        })
    }

    pub(crate) fn children(&self, node: NavigatorNode) -> Result<ChildCursor> {
        match self.buf.get(node.offset) {
            Some(b'[' | b'{') => Ok(ChildCursor::Text {
                pos: node.offset + 1,
            }),
            _ => Err(JsonError::UnexpectedNodeType {
                expected: JsonNodeType::Array,
                actual: self.node_type(node)?,
            }),
        }
    }

    /// Next child after `pos`. Commas and the colon between a property
    /// name and its value are skipped alike.
    pub(crate) fn next_child(&self, pos: &mut usize) -> Result<Option<NavigatorNode>> {
        let mut x = skip_whitespace(self.buf, *pos);
        match self.buf.get(x) {
            None | Some(b']' | b'}') => return Ok(None),
            Some(b',' | b':') => x = skip_whitespace(self.buf, x + 1),
            _ => {}
        }
        let end = skip_value(self.buf, x)?;
        *pos = end;
        Ok(Some(NavigatorNode::new(x, end)))
    }

    pub(crate) fn node_bytes(&self, node: NavigatorNode) -> Result<&'a [u8]> {
        self.buf
            .get(node.offset..node.bound)
            .ok_or(JsonError::UnexpectedEof { offset: node.offset })
    }
}
