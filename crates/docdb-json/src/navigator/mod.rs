//! Lazy random access into an encoded payload.
//!
//! A [`Navigator`] hands out [`NavigatorNode`]s: small `Copy` handles into
//! the payload buffer. Nothing is materialized unless asked for, so reading
//! one property of a large document only touches the bytes on the way to it.

mod binary;
mod iter;
mod text;

pub use binary::BinaryNavigator;
pub use iter::{ArrayItems, ObjectProperties};
pub use text::TextNavigator;

use std::borrow::Cow;

use iter::ChildCursor;

use crate::dictionary::StringDictionary;
use crate::error::{JsonError, Result};
use crate::format::SerializationFormat;
use crate::guid::Guid;
use crate::number::Number64;
use crate::token::{JsonNodeType, Token};

/// Handle to one node of a payload.
///
/// Only meaningful together with the navigator that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavigatorNode {
    pub(crate) offset: usize,
    /// Binary: payload start of the enclosing container, the base of
    /// reference strings. Text: end of the value.
    pub(crate) bound: usize,
    pub(crate) field_name: bool,
}

impl NavigatorNode {
    pub(crate) fn new(offset: usize, bound: usize) -> Self {
        Self {
            offset,
            bound,
            field_name: false,
        }
    }

    pub(crate) fn as_field_name(self) -> Self {
        Self {
            field_name: true,
            ..self
        }
    }

    /// Byte offset of the node in the payload.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// A property of an object: its name node and value node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectProperty {
    pub name: NavigatorNode,
    pub value: NavigatorNode,
}

/// A navigator over either payload format.
#[derive(Debug, Clone)]
pub enum Navigator<'a> {
    Text(TextNavigator<'a>),
    Binary(BinaryNavigator<'a>),
}

impl<'a> Navigator<'a> {
    /// Creates a navigator for `buf`, detecting the format from its first
    /// byte. Binary payloads with user strings need the dictionary they were
    /// written with.
    pub fn new(buf: &'a [u8], dict: Option<&'a StringDictionary>) -> Result<Self> {
        match SerializationFormat::detect(buf) {
            SerializationFormat::Text => Self::text(buf),
            SerializationFormat::Binary => Self::binary(buf, dict),
        }
    }

    pub fn text(buf: &'a [u8]) -> Result<Self> {
        Ok(Navigator::Text(TextNavigator::new(buf)?))
    }

    pub fn binary(buf: &'a [u8], dict: Option<&'a StringDictionary>) -> Result<Self> {
        Ok(Navigator::Binary(BinaryNavigator::new(buf, dict)?))
    }

    pub fn format(&self) -> SerializationFormat {
        match self {
            Navigator::Text(_) => SerializationFormat::Text,
            Navigator::Binary(_) => SerializationFormat::Binary,
        }
    }

    pub fn root_node(&self) -> NavigatorNode {
        match self {
            Navigator::Text(nav) => nav.root(),
            Navigator::Binary(nav) => nav.root(),
        }
    }

    pub fn node_type(&self, node: NavigatorNode) -> Result<JsonNodeType> {
        if node.field_name {
            return Ok(JsonNodeType::FieldName);
        }
        match self {
            Navigator::Text(nav) => nav.node_type(node),
            Navigator::Binary(nav) => nav.node_type(node),
        }
    }

    /// The scalar at `node` as a reader token. Containers are rejected.
    pub fn token(&self, node: NavigatorNode) -> Result<Token<'a>> {
        let kind = self.node_type(node)?;
        if matches!(kind, JsonNodeType::Array | JsonNodeType::Object) {
            return Err(JsonError::UnexpectedNodeType {
                expected: JsonNodeType::String,
                actual: kind,
            });
        }
        match self {
            Navigator::Text(nav) => nav.token(node),
            Navigator::Binary(nav) => nav.token(node),
        }
    }

    /// Raw encoded bytes of `node`.
    pub fn node_bytes(&self, node: NavigatorNode) -> Result<&'a [u8]> {
        match self {
            Navigator::Text(nav) => nav.node_bytes(node),
            Navigator::Binary(nav) => nav.node_bytes(node),
        }
    }

    fn expect(&self, node: NavigatorNode, expected: JsonNodeType) -> Result<Token<'a>> {
        let actual = self.node_type(node)?;
        if actual != expected {
            return Err(JsonError::UnexpectedNodeType { expected, actual });
        }
        self.token(node)
    }

    fn mismatch(&self, node: NavigatorNode, expected: JsonNodeType) -> JsonError {
        match self.node_type(node) {
            Ok(actual) => JsonError::UnexpectedNodeType { expected, actual },
            Err(err) => err,
        }
    }

    pub fn get_number(&self, node: NavigatorNode) -> Result<Number64> {
        match self.expect(node, JsonNodeType::Number)? {
            Token::Number(n) => Ok(n),
            _ => Err(self.mismatch(node, JsonNodeType::Number)),
        }
    }

    pub fn get_bool(&self, node: NavigatorNode) -> Result<bool> {
        match self.node_type(node)? {
            JsonNodeType::True => Ok(true),
            JsonNodeType::False => Ok(false),
            actual => Err(JsonError::UnexpectedNodeType {
                expected: JsonNodeType::True,
                actual,
            }),
        }
    }

    /// Text of a string or field-name node.
    pub fn get_string(&self, node: NavigatorNode) -> Result<Cow<'a, str>> {
        match self.node_type(node)? {
            JsonNodeType::String | JsonNodeType::FieldName => {}
            actual => {
                return Err(JsonError::UnexpectedNodeType {
                    expected: JsonNodeType::String,
                    actual,
                })
            }
        }
        match self.token(node)? {
            Token::String(s) | Token::FieldName(s) => Ok(s),
            _ => Err(self.mismatch(node, JsonNodeType::String)),
        }
    }

    pub fn get_int8(&self, node: NavigatorNode) -> Result<i8> {
        match self.expect(node, JsonNodeType::Int8)? {
            Token::Int8(v) => Ok(v),
            _ => Err(self.mismatch(node, JsonNodeType::Int8)),
        }
    }

    pub fn get_int16(&self, node: NavigatorNode) -> Result<i16> {
        match self.expect(node, JsonNodeType::Int16)? {
            Token::Int16(v) => Ok(v),
            _ => Err(self.mismatch(node, JsonNodeType::Int16)),
        }
    }

    pub fn get_int32(&self, node: NavigatorNode) -> Result<i32> {
        match self.expect(node, JsonNodeType::Int32)? {
            Token::Int32(v) => Ok(v),
            _ => Err(self.mismatch(node, JsonNodeType::Int32)),
        }
    }

    pub fn get_int64(&self, node: NavigatorNode) -> Result<i64> {
        match self.expect(node, JsonNodeType::Int64)? {
            Token::Int64(v) => Ok(v),
            _ => Err(self.mismatch(node, JsonNodeType::Int64)),
        }
    }

    pub fn get_uint32(&self, node: NavigatorNode) -> Result<u32> {
        match self.expect(node, JsonNodeType::UInt32)? {
            Token::UInt32(v) => Ok(v),
            _ => Err(self.mismatch(node, JsonNodeType::UInt32)),
        }
    }

    pub fn get_float32(&self, node: NavigatorNode) -> Result<f32> {
        match self.expect(node, JsonNodeType::Float32)? {
            Token::Float32(v) => Ok(v),
            _ => Err(self.mismatch(node, JsonNodeType::Float32)),
        }
    }

    pub fn get_float64(&self, node: NavigatorNode) -> Result<f64> {
        match self.expect(node, JsonNodeType::Float64)? {
            Token::Float64(v) => Ok(v),
            _ => Err(self.mismatch(node, JsonNodeType::Float64)),
        }
    }

    pub fn get_guid(&self, node: NavigatorNode) -> Result<Guid> {
        match self.expect(node, JsonNodeType::Guid)? {
            Token::Guid(g) => Ok(g),
            _ => Err(self.mismatch(node, JsonNodeType::Guid)),
        }
    }

    /// Bytes of a binary node; borrowed from binary payloads, decoded from
    /// base64 for text ones.
    pub fn get_binary(&self, node: NavigatorNode) -> Result<Cow<'a, [u8]>> {
        match self.expect(node, JsonNodeType::Binary)? {
            Token::Binary(b) => Ok(b),
            _ => Err(self.mismatch(node, JsonNodeType::Binary)),
        }
    }

    fn children(&self, node: NavigatorNode, expected: JsonNodeType) -> Result<ChildCursor> {
        let actual = self.node_type(node)?;
        if actual != expected {
            return Err(JsonError::UnexpectedNodeType { expected, actual });
        }
        match self {
            Navigator::Text(nav) => nav.children(node),
            Navigator::Binary(nav) => nav.children(node),
        }
    }

    pub fn array_items(&self, node: NavigatorNode) -> Result<ArrayItems<'_, 'a>> {
        Ok(ArrayItems::new(self, self.children(node, JsonNodeType::Array)?))
    }

    pub fn array_item_count(&self, node: NavigatorNode) -> Result<usize> {
        let mut count = 0;
        for item in self.array_items(node)? {
            item?;
            count += 1;
        }
        Ok(count)
    }

    /// The item at `index`. Earlier items are skipped, not decoded.
    pub fn array_item_at(&self, node: NavigatorNode, index: usize) -> Result<NavigatorNode> {
        let mut count = 0;
        for item in self.array_items(node)? {
            let item = item?;
            if count == index {
                return Ok(item);
            }
            count += 1;
        }
        Err(JsonError::IndexOutOfRange { index, count })
    }

    pub fn object_properties(&self, node: NavigatorNode) -> Result<ObjectProperties<'_, 'a>> {
        Ok(ObjectProperties::new(
            self,
            self.children(node, JsonNodeType::Object)?,
        ))
    }

    pub fn object_property_count(&self, node: NavigatorNode) -> Result<usize> {
        let mut count = 0;
        for property in self.object_properties(node)? {
            property?;
            count += 1;
        }
        Ok(count)
    }

    /// Finds a property by name with a linear scan.
    pub fn try_get_object_property(
        &self,
        node: NavigatorNode,
        name: &str,
    ) -> Result<Option<ObjectProperty>> {
        for property in self.object_properties(node)? {
            let property = property?;
            if self.get_string(property.name)? == name {
                return Ok(Some(property));
            }
        }
        Ok(None)
    }

    pub fn property_name(&self, property: &ObjectProperty) -> Result<Cow<'a, str>> {
        self.get_string(property.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_navigation() {
        let nav = Navigator::text(br#" {"a": [10, "x", {"b": null}], "c": true} "#).unwrap();
        let root = nav.root_node();
        assert_eq!(nav.node_type(root).unwrap(), JsonNodeType::Object);
        assert_eq!(nav.object_property_count(root).unwrap(), 2);

        let a = nav.try_get_object_property(root, "a").unwrap().unwrap();
        assert_eq!(nav.node_type(a.name).unwrap(), JsonNodeType::FieldName);
        assert_eq!(nav.property_name(&a).unwrap(), "a");
        assert_eq!(nav.array_item_count(a.value).unwrap(), 3);

        let second = nav.array_item_at(a.value, 1).unwrap();
        assert_eq!(nav.get_string(second).unwrap(), "x");
        assert_eq!(nav.node_bytes(second).unwrap(), br#""x""#);
        assert_eq!(
            nav.array_item_at(a.value, 3),
            Err(JsonError::IndexOutOfRange { index: 3, count: 3 })
        );

        let c = nav.try_get_object_property(root, "c").unwrap().unwrap();
        assert!(nav.get_bool(c.value).unwrap());
        assert!(nav.try_get_object_property(root, "zz").unwrap().is_none());
    }

    #[test]
    fn text_payload_is_validated_up_front() {
        assert!(Navigator::text(b"[1, 2").is_err());
        assert!(Navigator::text(b"[1] x").is_err());
    }

    #[test]
    fn typed_getters_reject_other_kinds() {
        let nav = Navigator::text(b"[I5]").unwrap();
        let item = nav.array_item_at(nav.root_node(), 0).unwrap();
        assert_eq!(nav.get_int8(item).unwrap(), 5);
        assert_eq!(
            nav.get_number(item),
            Err(JsonError::UnexpectedNodeType {
                expected: JsonNodeType::Number,
                actual: JsonNodeType::Int8,
            })
        );
        assert!(nav.array_items(item).is_err());
    }

    #[test]
    fn binary_navigation() {
        use crate::binary::marker::*;
        // {"k": [1, 2]}
        let buf = [
            0x80,
            SINGLE_PROPERTY_OBJECT,
            ENCODED_STRING_LENGTH_MIN + 1,
            b'k',
            ARRAY_1BYTE_LENGTH,
            2,
            0x01,
            0x02,
        ];
        let nav = Navigator::new(&buf, None).unwrap();
        let root = nav.root_node();
        let k = nav.try_get_object_property(root, "k").unwrap().unwrap();
        assert_eq!(nav.array_item_count(k.value).unwrap(), 2);
        let last = nav.array_item_at(k.value, 1).unwrap();
        assert_eq!(nav.get_number(last).unwrap(), Number64::Int(2));
        assert_eq!(nav.node_bytes(k.value).unwrap(), &buf[4..]);
        assert_eq!(
            nav.array_item_at(k.value, 2),
            Err(JsonError::IndexOutOfRange { index: 2, count: 2 })
        );
    }
}
