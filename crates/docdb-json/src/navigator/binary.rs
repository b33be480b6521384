use crate::binary::BinaryPayload;
use crate::dictionary::StringDictionary;
use crate::error::{JsonError, Result};
use crate::format::BINARY_FORMAT_MARKER;
use crate::token::{JsonNodeType, Token};

use super::iter::ChildCursor;
use super::NavigatorNode;

/// Navigator over a binary payload.
///
/// Nothing is decoded up front; container length prefixes let every child
/// be skipped without looking inside it.
#[derive(Debug, Clone)]
pub struct BinaryNavigator<'a> {
    payload: BinaryPayload<'a>,
}

impl<'a> BinaryNavigator<'a> {
    pub fn new(buf: &'a [u8], dict: Option<&'a StringDictionary>) -> Result<Self> {
        if buf.first() != Some(&BINARY_FORMAT_MARKER) {
            return Err(JsonError::NotBinary);
        }
        Ok(Self {
            payload: BinaryPayload::new(buf, dict),
        })
    }

    pub(crate) fn root(&self) -> NavigatorNode {
        NavigatorNode::new(1, 1)
    }

    pub(crate) fn node_type(&self, node: NavigatorNode) -> Result<JsonNodeType> {
        self.payload.node_type(node.offset)
    }

    pub(crate) fn token(&self, node: NavigatorNode) -> Result<Token<'a>> {
        if node.field_name {
            return Ok(Token::FieldName(self.payload.string(node.offset, node.bound)?));
        }
        self.payload.scalar_token(node.offset, node.bound)
    }

    pub(crate) fn children(&self, node: NavigatorNode) -> Result<ChildCursor> {
        let (start, end) = self.payload.container_payload(node.offset)?;
        Ok(ChildCursor::Binary {
            pos: start,
            end,
            scope: start,
        })
    }

    pub(crate) fn next_child(
        &self,
        pos: &mut usize,
        end: usize,
        scope: usize,
    ) -> Result<Option<NavigatorNode>> {
        if *pos >= end {
            return Ok(None);
        }
        let offset = *pos;
        let len = self.payload.node_len(offset)?;
        if offset + len > end {
            return Err(JsonError::ContainerOverrun { offset });
        }
        *pos = offset + len;
        Ok(Some(NavigatorNode::new(offset, scope)))
    }

    pub(crate) fn node_bytes(&self, node: NavigatorNode) -> Result<&'a [u8]> {
        let len = self.payload.node_len(node.offset)?;
        Ok(&self.payload.buf[node.offset..node.offset + len])
    }
}
