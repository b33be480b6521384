//! Streaming writers for both payload formats.
//!
//! A writer accepts one root value as a sequence of calls, validates the
//! call sequence as it goes and exposes the finished payload through
//! [`JsonWriter::get_result`].

mod binary;
mod context;
mod text;

pub use binary::BinaryWriter;
pub use text::TextWriter;

use serde::{Deserialize, Serialize};

use crate::dictionary::StringDictionary;
use crate::element::JsonElement;
use crate::error::Result;
use crate::format::SerializationFormat;
use crate::guid::Guid;
use crate::navigator::{Navigator, NavigatorNode};
use crate::number::Number64;
use crate::reader::Reader;
use crate::token::{JsonNodeType, Token};

/// Writer tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// Bytes reserved for the output buffer up front.
    pub initial_capacity: usize,
    /// Try the generic packed 4/5/6/7-bit string encodings (binary only).
    pub packed_strings: bool,
    /// Encode repeated strings within a container as back-references
    /// (binary only).
    pub reference_strings: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            initial_capacity: 256,
            packed_strings: false,
            reference_strings: true,
        }
    }
}

/// One method per value kind plus the structural calls.
///
/// Every call either appends to the payload or fails with a writer protocol
/// error; after the first failure the writer stays faulted.
pub trait JsonWriter {
    fn format(&self) -> SerializationFormat;

    fn write_null(&mut self) -> Result<()>;
    fn write_bool(&mut self, value: bool) -> Result<()>;
    fn write_number(&mut self, value: Number64) -> Result<()>;
    fn write_string(&mut self, value: &str) -> Result<()>;
    fn write_field_name(&mut self, name: &str) -> Result<()>;

    fn write_array_start(&mut self) -> Result<()>;
    fn write_array_end(&mut self) -> Result<()>;
    fn write_object_start(&mut self) -> Result<()>;
    fn write_object_end(&mut self) -> Result<()>;

    fn write_int8(&mut self, value: i8) -> Result<()>;
    fn write_int16(&mut self, value: i16) -> Result<()>;
    fn write_int32(&mut self, value: i32) -> Result<()>;
    fn write_int64(&mut self, value: i64) -> Result<()>;
    fn write_uint32(&mut self, value: u32) -> Result<()>;
    fn write_float32(&mut self, value: f32) -> Result<()>;
    fn write_float64(&mut self, value: f64) -> Result<()>;
    fn write_guid(&mut self, value: Guid) -> Result<()>;
    fn write_binary(&mut self, value: &[u8]) -> Result<()>;

    /// The finished payload. Fails until the root value has been closed.
    fn get_result(&self) -> Result<&[u8]>;

    fn write_token(&mut self, token: &Token<'_>) -> Result<()> {
        match token {
            Token::BeginArray => self.write_array_start(),
            Token::EndArray => self.write_array_end(),
            Token::BeginObject => self.write_object_start(),
            Token::EndObject => self.write_object_end(),
            Token::Null => self.write_null(),
            Token::True => self.write_bool(true),
            Token::False => self.write_bool(false),
            Token::Number(n) => self.write_number(*n),
            Token::String(s) => self.write_string(s),
            Token::FieldName(s) => self.write_field_name(s),
            Token::Int8(v) => self.write_int8(*v),
            Token::Int16(v) => self.write_int16(*v),
            Token::Int32(v) => self.write_int32(*v),
            Token::Int64(v) => self.write_int64(*v),
            Token::UInt32(v) => self.write_uint32(*v),
            Token::Float32(v) => self.write_float32(*v),
            Token::Float64(v) => self.write_float64(*v),
            Token::Guid(g) => self.write_guid(*g),
            Token::Binary(b) => self.write_binary(b),
        }
    }

    /// Drains every remaining token of `reader` into this writer.
    fn write_all(&mut self, reader: &mut Reader<'_>) -> Result<()> {
        while let Some(token) = reader.read_token()? {
            self.write_token(&token)?;
        }
        Ok(())
    }

    /// Writes the subtree rooted at `node`.
    fn write_node(&mut self, navigator: &Navigator<'_>, node: NavigatorNode) -> Result<()> {
        match navigator.node_type(node)? {
            JsonNodeType::Array => {
                self.write_array_start()?;
                for item in navigator.array_items(node)? {
                    self.write_node(navigator, item?)?;
                }
                self.write_array_end()
            }
            JsonNodeType::Object => {
                self.write_object_start()?;
                for property in navigator.object_properties(node)? {
                    let property = property?;
                    self.write_field_name(&navigator.property_name(&property)?)?;
                    self.write_node(navigator, property.value)?;
                }
                self.write_object_end()
            }
            _ => self.write_token(&navigator.token(node)?),
        }
    }

    fn write_element(&mut self, element: &JsonElement) -> Result<()> {
        match element {
            JsonElement::Null => self.write_null(),
            JsonElement::Bool(b) => self.write_bool(*b),
            JsonElement::Number(n) => self.write_number(*n),
            JsonElement::String(s) => self.write_string(s),
            JsonElement::Array(items) => {
                self.write_array_start()?;
                for item in items {
                    self.write_element(item)?;
                }
                self.write_array_end()
            }
            JsonElement::Object(properties) => {
                self.write_object_start()?;
                for (name, value) in properties {
                    self.write_field_name(name)?;
                    self.write_element(value)?;
                }
                self.write_object_end()
            }
            JsonElement::Int8(v) => self.write_int8(*v),
            JsonElement::Int16(v) => self.write_int16(*v),
            JsonElement::Int32(v) => self.write_int32(*v),
            JsonElement::Int64(v) => self.write_int64(*v),
            JsonElement::UInt32(v) => self.write_uint32(*v),
            JsonElement::Float32(v) => self.write_float32(*v),
            JsonElement::Float64(v) => self.write_float64(*v),
            JsonElement::Guid(g) => self.write_guid(*g),
            JsonElement::Binary(b) => self.write_binary(b),
        }
    }
}

/// Creates a writer for `format`. The dictionary is only consulted by binary
/// writers, which also insert newly seen property names into it.
pub fn create_writer<'d>(
    format: SerializationFormat,
    options: WriterOptions,
    dict: Option<&'d mut StringDictionary>,
) -> Box<dyn JsonWriter + 'd> {
    match format {
        SerializationFormat::Text => Box::new(TextWriter::with_options(&options)),
        SerializationFormat::Binary => Box::new(BinaryWriter::with_options(options, dict)),
    }
}
