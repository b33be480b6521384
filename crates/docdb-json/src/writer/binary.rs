use std::collections::HashMap;

use docdb_buffers::Writer;

use super::context::WriterContext;
use super::{JsonWriter, WriterOptions};
use crate::binary::marker::*;
use crate::binary::strings::{compress, raw_encoded_size};
use crate::binary::system_strings::system_string_id;
use crate::dictionary::StringDictionary;
use crate::error::{JsonError, Result};
use crate::format::{SerializationFormat, BINARY_FORMAT_MARKER};
use crate::guid::Guid;
use crate::number::Number64;

/// An open container. Its marker is written together with a one-byte length
/// placeholder; the final marker and length width are fixed on close.
#[derive(Debug)]
struct Container {
    start: usize,
    /// Strings written directly in this container, by offset from the
    /// payload start.
    strings: HashMap<String, usize>,
}

impl Container {
    fn payload_start(&self) -> usize {
        self.start + 2
    }
}

/// Writes the compact binary format.
#[derive(Debug)]
pub struct BinaryWriter<'d> {
    out: Writer,
    ctx: WriterContext,
    options: WriterOptions,
    dict: Option<&'d mut StringDictionary>,
    containers: Vec<Container>,
}

impl Default for BinaryWriter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'d> BinaryWriter<'d> {
    pub fn new() -> Self {
        Self::with_options(WriterOptions::default(), None)
    }

    /// A writer resolving strings against `dict` and registering new property
    /// names in it.
    pub fn with_dictionary(dict: &'d mut StringDictionary) -> Self {
        Self::with_options(WriterOptions::default(), Some(dict))
    }

    pub fn with_options(options: WriterOptions, dict: Option<&'d mut StringDictionary>) -> Self {
        let mut out = Writer::with_capacity(options.initial_capacity);
        out.u8(BINARY_FORMAT_MARKER);
        Self {
            out,
            ctx: WriterContext::new(),
            options,
            dict,
            containers: Vec::new(),
        }
    }

    fn write_length(&mut self, width: usize, len: usize) {
        match width {
            1 => self.out.u8(len as u8),
            2 => self.out.u16(len as u16),
            _ => self.out.u32(len as u32),
        }
    }

    fn write_sized(&mut self, base: u8, bytes: &[u8]) {
        let (marker, width) = sized_marker(base, bytes.len());
        self.out.u8(marker);
        self.write_length(width, bytes.len());
        self.out.buf(bytes);
    }

    fn write_number_node(&mut self, value: Number64) {
        let exact = if value.is_negative_zero() {
            None
        } else {
            value.exact_integer()
        };
        match exact {
            Some(i) if (0..=i64::from(LITERAL_INT_MAX - LITERAL_INT_MIN)).contains(&i) => {
                self.out.u8(LITERAL_INT_MIN + i as u8)
            }
            Some(i) if u8::try_from(i).is_ok() => self.out.u8u8(NUMBER_UINT8, i as u8),
            Some(i) if i16::try_from(i).is_ok() => {
                self.out.u8(NUMBER_INT16);
                self.out.i16(i as i16);
            }
            Some(i) if i32::try_from(i).is_ok() => {
                self.out.u8(NUMBER_INT32);
                self.out.i32(i as i32);
            }
            Some(i) => {
                self.out.u8(NUMBER_INT64);
                self.out.i64(i);
            }
            None => self.out.u8f64(NUMBER_DOUBLE, value.as_f64()),
        }
    }

    fn dictionary_id(&mut self, text: &str, register: bool) -> Option<usize> {
        let dict = self.dict.as_deref_mut()?;
        let id = match dict.index_of(text) {
            Some(id) => id,
            None if register && !text.is_empty() && dict.len() < USER_STRING_MAX_COUNT => {
                let id = dict.insert(text);
                tracing::trace!(id, name = text, "registered user string");
                id
            }
            None => return None,
        };
        (id < USER_STRING_MAX_COUNT).then_some(id)
    }

    /// Emits the smallest encoding available for `text`: system string,
    /// user string, compact form, back-reference, raw bytes.
    fn write_string_node(&mut self, text: &str, field_name: bool) {
        if let Some(id) = system_string_id(text) {
            self.out.u8(SYSTEM_STRING_1BYTE_MIN + id as u8);
            return;
        }
        if let Some(id) = self.dictionary_id(text, field_name) {
            if id < USER_STRING_1BYTE_COUNT {
                self.out.u8(USER_STRING_1BYTE_MIN + id as u8);
            } else {
                let rest = id - USER_STRING_1BYTE_COUNT;
                self.out.u8u8(USER_STRING_2BYTE_MIN + (rest / 256) as u8, (rest % 256) as u8);
            }
            return;
        }

        let compact = compress(text, self.options.packed_strings);
        let size = compact
            .as_ref()
            .map_or_else(|| raw_encoded_size(text.len()), Vec::len);

        if self.options.reference_strings {
            if let Some(&offset) = self.containers.last().and_then(|c| c.strings.get(text)) {
                let reference_size = if offset <= u8::MAX as usize { 2 } else { 3 };
                if reference_size < size {
                    tracing::trace!(offset, len = text.len(), "string written as back-reference");
                    if reference_size == 2 {
                        self.out.u8u8(REFERENCE_STRING_1BYTE_OFFSET, offset as u8);
                    } else {
                        self.out.u8u16(REFERENCE_STRING_2BYTE_OFFSET, offset as u16);
                    }
                    return;
                }
            }
        }

        let node_start = self.out.x();
        match compact {
            Some(node) => {
                tracing::trace!(marker = node[0], len = text.len(), size, "string compacted");
                self.out.buf(&node);
            }
            None if text.len() <= ENCODED_STRING_MAX_LEN => {
                self.out.u8(ENCODED_STRING_LENGTH_MIN + text.len() as u8);
                self.out.utf8(text);
            }
            None => self.write_sized(STRING_1BYTE_LENGTH, text.as_bytes()),
        }

        if self.options.reference_strings && size > 2 {
            if let Some(container) = self.containers.last_mut() {
                let offset = node_start - container.payload_start();
                if offset <= u16::MAX as usize {
                    container.strings.entry(text.to_owned()).or_insert(offset);
                }
            }
        }
    }

    fn open(&mut self, object: bool) -> Result<()> {
        self.ctx.open(object)?;
        let start = self.out.x();
        let marker = if object { OBJECT_1BYTE_LENGTH } else { ARRAY_1BYTE_LENGTH };
        self.out.u8u8(marker, 0);
        self.containers.push(Container {
            start,
            strings: HashMap::new(),
        });
        Ok(())
    }

    /// Fixes up the marker and length prefix of the innermost container.
    fn close(&mut self, object: bool) -> Result<()> {
        let count = self.ctx.close(object)?;
        let Some(container) = self.containers.pop() else {
            return Err(if object {
                JsonError::ObjectNotStarted
            } else {
                JsonError::ArrayNotStarted
            });
        };
        let start = container.start;
        let (empty, single, sized) = if object {
            (EMPTY_OBJECT, SINGLE_PROPERTY_OBJECT, OBJECT_1BYTE_LENGTH)
        } else {
            (EMPTY_ARRAY, SINGLE_ITEM_ARRAY, ARRAY_1BYTE_LENGTH)
        };
        match count {
            0 => {
                self.out.set_u8(start, empty);
                self.out.truncate(start + 1);
            }
            1 => {
                self.out.set_u8(start, single);
                self.out.remove(start + 1, 1);
            }
            _ => {
                let len = self.out.x() - container.payload_start();
                let (marker, width) = sized_marker(sized, len);
                self.out.set_u8(start, marker);
                match width {
                    1 => self.out.set_u8(start + 1, len as u8),
                    2 => {
                        self.out.insert_gap(start + 2, 1);
                        self.out.set_u16(start + 1, len as u16);
                    }
                    _ => {
                        self.out.insert_gap(start + 2, 3);
                        self.out.set_u32(start + 1, len as u32);
                    }
                }
                if width > 1 {
                    tracing::debug!(start, len, width, "promoted container length prefix");
                }
            }
        }
        Ok(())
    }
}

impl JsonWriter for BinaryWriter<'_> {
    fn format(&self) -> SerializationFormat {
        SerializationFormat::Binary
    }

    fn write_null(&mut self) -> Result<()> {
        self.ctx.scalar()?;
        self.out.u8(NULL);
        Ok(())
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.ctx.scalar()?;
        self.out.u8(if value { TRUE } else { FALSE });
        Ok(())
    }

    fn write_number(&mut self, value: Number64) -> Result<()> {
        self.ctx.scalar()?;
        self.write_number_node(value);
        Ok(())
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        self.ctx.scalar()?;
        self.write_string_node(value, false);
        Ok(())
    }

    fn write_field_name(&mut self, name: &str) -> Result<()> {
        self.ctx.field_name(name)?;
        self.write_string_node(name, true);
        Ok(())
    }

    fn write_array_start(&mut self) -> Result<()> {
        self.open(false)
    }

    fn write_array_end(&mut self) -> Result<()> {
        self.close(false)
    }

    fn write_object_start(&mut self) -> Result<()> {
        self.open(true)
    }

    fn write_object_end(&mut self) -> Result<()> {
        self.close(true)
    }

    fn write_int8(&mut self, value: i8) -> Result<()> {
        self.ctx.scalar()?;
        self.out.u8(INT8);
        self.out.i8(value);
        Ok(())
    }

    fn write_int16(&mut self, value: i16) -> Result<()> {
        self.ctx.scalar()?;
        self.out.u8(INT16);
        self.out.i16(value);
        Ok(())
    }

    fn write_int32(&mut self, value: i32) -> Result<()> {
        self.ctx.scalar()?;
        self.out.u8(INT32);
        self.out.i32(value);
        Ok(())
    }

    fn write_int64(&mut self, value: i64) -> Result<()> {
        self.ctx.scalar()?;
        self.out.u8(INT64);
        self.out.i64(value);
        Ok(())
    }

    fn write_uint32(&mut self, value: u32) -> Result<()> {
        self.ctx.scalar()?;
        self.out.u8u32(UINT32, value);
        Ok(())
    }

    fn write_float32(&mut self, value: f32) -> Result<()> {
        self.ctx.scalar()?;
        self.out.u8(FLOAT32);
        self.out.f32(value);
        Ok(())
    }

    fn write_float64(&mut self, value: f64) -> Result<()> {
        self.ctx.scalar()?;
        self.out.u8f64(FLOAT64, value);
        Ok(())
    }

    fn write_guid(&mut self, value: Guid) -> Result<()> {
        self.ctx.scalar()?;
        self.out.u8(GUID);
        self.out.buf(value.as_bytes());
        Ok(())
    }

    fn write_binary(&mut self, value: &[u8]) -> Result<()> {
        self.ctx.scalar()?;
        self.write_sized(BINARY_1BYTE_LENGTH, value);
        Ok(())
    }

    fn get_result(&self) -> Result<&[u8]> {
        self.ctx.finish()?;
        Ok(self.out.as_slice())
    }
}
