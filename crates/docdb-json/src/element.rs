//! Owned element tree and materialization of navigator subtrees.

use std::fmt;

use base64::Engine;

use crate::dictionary::StringDictionary;
use crate::error::Result;
use crate::format::SerializationFormat;
use crate::guid::Guid;
use crate::navigator::{Navigator, NavigatorNode};
use crate::number::Number64;
use crate::token::JsonNodeType;
use crate::writer::{create_writer, TextWriter, WriterOptions, JsonWriter};

/// A fully materialized JSON value.
///
/// Objects keep their properties in encoded order. Equality is structural,
/// with numeric equality for [`Number64`], so a value compares equal no
/// matter which payload format it was materialized from.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonElement {
    Null,
    Bool(bool),
    Number(Number64),
    String(String),
    Array(Vec<JsonElement>),
    Object(Vec<(String, JsonElement)>),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    Float32(f32),
    Float64(f64),
    Guid(Guid),
    Binary(Vec<u8>),
}

impl JsonElement {
    pub fn kind(&self) -> JsonNodeType {
        match self {
            JsonElement::Null => JsonNodeType::Null,
            JsonElement::Bool(true) => JsonNodeType::True,
            JsonElement::Bool(false) => JsonNodeType::False,
            JsonElement::Number(_) => JsonNodeType::Number,
            JsonElement::String(_) => JsonNodeType::String,
            JsonElement::Array(_) => JsonNodeType::Array,
            JsonElement::Object(_) => JsonNodeType::Object,
            JsonElement::Int8(_) => JsonNodeType::Int8,
            JsonElement::Int16(_) => JsonNodeType::Int16,
            JsonElement::Int32(_) => JsonNodeType::Int32,
            JsonElement::Int64(_) => JsonNodeType::Int64,
            JsonElement::UInt32(_) => JsonNodeType::UInt32,
            JsonElement::Float32(_) => JsonNodeType::Float32,
            JsonElement::Float64(_) => JsonNodeType::Float64,
            JsonElement::Guid(_) => JsonNodeType::Guid,
            JsonElement::Binary(_) => JsonNodeType::Binary,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonElement::Null)
    }

    /// Property `name` of an object.
    pub fn get(&self, name: &str) -> Option<&JsonElement> {
        match self {
            JsonElement::Object(properties) => properties
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Item `index` of an array.
    pub fn get_index(&self, index: usize) -> Option<&JsonElement> {
        match self {
            JsonElement::Array(items) => items.get(index),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonElement::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonElement::String(s) => Some(s),
            _ => None,
        }
    }

    /// Any numeric kind, widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            JsonElement::Number(n) => Some(n.as_f64()),
            JsonElement::Int8(v) => Some(f64::from(v)),
            JsonElement::Int16(v) => Some(f64::from(v)),
            JsonElement::Int32(v) => Some(f64::from(v)),
            JsonElement::Int64(v) => Some(v as f64),
            JsonElement::UInt32(v) => Some(f64::from(v)),
            JsonElement::Float32(v) => Some(f64::from(v)),
            JsonElement::Float64(v) => Some(v),
            _ => None,
        }
    }

    /// Any integral numeric kind as an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            JsonElement::Number(n) => n.exact_integer(),
            JsonElement::Int8(v) => Some(i64::from(v)),
            JsonElement::Int16(v) => Some(i64::from(v)),
            JsonElement::Int32(v) => Some(i64::from(v)),
            JsonElement::Int64(v) => Some(v),
            JsonElement::UInt32(v) => Some(i64::from(v)),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonElement]> {
        match self {
            JsonElement::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, JsonElement)]> {
        match self {
            JsonElement::Object(properties) => Some(properties),
            _ => None,
        }
    }

    /// Encodes the element as a complete payload.
    pub fn to_payload(
        &self,
        format: SerializationFormat,
        options: WriterOptions,
        dict: Option<&mut StringDictionary>,
    ) -> Result<Vec<u8>> {
        let mut writer = create_writer(format, options, dict);
        writer.write_element(self)?;
        Ok(writer.get_result()?.to_vec())
    }

    /// Lossy conversion to a plain JSON value: extended numbers become
    /// numbers, GUIDs become strings, binary becomes base64 text and
    /// non-finite doubles become `null`.
    pub fn to_json_value(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            JsonElement::Null => Value::Null,
            JsonElement::Bool(b) => Value::Bool(*b),
            JsonElement::Number(Number64::Int(i)) => Value::from(*i),
            JsonElement::Number(Number64::Double(d)) => float_value(*d),
            JsonElement::String(s) => Value::String(s.clone()),
            JsonElement::Array(items) => items.iter().map(JsonElement::to_json_value).collect(),
            JsonElement::Object(properties) => Value::Object(
                properties
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json_value()))
                    .collect(),
            ),
            JsonElement::Int8(v) => Value::from(*v),
            JsonElement::Int16(v) => Value::from(*v),
            JsonElement::Int32(v) => Value::from(*v),
            JsonElement::Int64(v) => Value::from(*v),
            JsonElement::UInt32(v) => Value::from(*v),
            JsonElement::Float32(v) => float_value(f64::from(*v)),
            JsonElement::Float64(v) => float_value(*v),
            JsonElement::Guid(g) => Value::String(g.to_string()),
            JsonElement::Binary(b) => {
                Value::String(base64::engine::general_purpose::STANDARD.encode(b))
            }
        }
    }
}

fn float_value(d: f64) -> serde_json::Value {
    serde_json::Number::from_f64(d).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

impl From<&serde_json::Value> for JsonElement {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => JsonElement::Null,
            Value::Bool(b) => JsonElement::Bool(*b),
            Value::Number(n) => JsonElement::Number(match n.as_i64() {
                Some(i) => Number64::Int(i),
                None => Number64::Double(n.as_f64().unwrap_or(f64::NAN)),
            }),
            Value::String(s) => JsonElement::String(s.clone()),
            Value::Array(items) => {
                JsonElement::Array(items.iter().map(JsonElement::from).collect())
            }
            Value::Object(map) => JsonElement::Object(
                map.iter()
                    .map(|(name, value)| (name.clone(), JsonElement::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for JsonElement {
    fn from(value: serde_json::Value) -> Self {
        JsonElement::from(&value)
    }
}

impl From<&JsonElement> for serde_json::Value {
    fn from(element: &JsonElement) -> Self {
        element.to_json_value()
    }
}

/// Compact text form, extended kinds written with their sigils.
impl fmt::Display for JsonElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut writer = TextWriter::new();
        writer.write_element(self).map_err(|_| fmt::Error)?;
        let bytes = writer.get_result().map_err(|_| fmt::Error)?;
        f.write_str(std::str::from_utf8(bytes).map_err(|_| fmt::Error)?)
    }
}

impl Navigator<'_> {
    /// Builds an owned tree from the subtree rooted at `node`.
    pub fn materialize(&self, node: NavigatorNode) -> Result<JsonElement> {
        materialize(self, node)
    }
}

/// Builds an owned tree from the subtree rooted at `node`.
pub fn materialize(navigator: &Navigator<'_>, node: NavigatorNode) -> Result<JsonElement> {
    let element = match navigator.node_type(node)? {
        JsonNodeType::Null => JsonElement::Null,
        JsonNodeType::True => JsonElement::Bool(true),
        JsonNodeType::False => JsonElement::Bool(false),
        JsonNodeType::Number => JsonElement::Number(navigator.get_number(node)?),
        JsonNodeType::String | JsonNodeType::FieldName => {
            JsonElement::String(navigator.get_string(node)?.into_owned())
        }
        JsonNodeType::Array => JsonElement::Array(
            navigator
                .array_items(node)?
                .map(|item| materialize(navigator, item?))
                .collect::<Result<_>>()?,
        ),
        JsonNodeType::Object => {
            let mut properties = Vec::new();
            for property in navigator.object_properties(node)? {
                let property = property?;
                let name = navigator.property_name(&property)?.into_owned();
                properties.push((name, materialize(navigator, property.value)?));
            }
            JsonElement::Object(properties)
        }
        JsonNodeType::Int8 => JsonElement::Int8(navigator.get_int8(node)?),
        JsonNodeType::Int16 => JsonElement::Int16(navigator.get_int16(node)?),
        JsonNodeType::Int32 => JsonElement::Int32(navigator.get_int32(node)?),
        JsonNodeType::Int64 => JsonElement::Int64(navigator.get_int64(node)?),
        JsonNodeType::UInt32 => JsonElement::UInt32(navigator.get_uint32(node)?),
        JsonNodeType::Float32 => JsonElement::Float32(navigator.get_float32(node)?),
        JsonNodeType::Float64 => JsonElement::Float64(navigator.get_float64(node)?),
        JsonNodeType::Guid => JsonElement::Guid(navigator.get_guid(node)?),
        JsonNodeType::Binary => JsonElement::Binary(navigator.get_binary(node)?.into_owned()),
    };
    Ok(element)
}
