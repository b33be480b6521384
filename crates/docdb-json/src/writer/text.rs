use base64::Engine;
use docdb_buffers::Writer;

use super::context::WriterContext;
use super::{JsonWriter, WriterOptions};
use crate::error::Result;
use crate::format::SerializationFormat;
use crate::guid::Guid;
use crate::number::{format_float32, format_float64, Number64};
use crate::text::{
    write_string, SIGIL_BINARY, SIGIL_FLOAT32, SIGIL_FLOAT64, SIGIL_GUID, SIGIL_INT16,
    SIGIL_INT32, SIGIL_INT64, SIGIL_INT8, SIGIL_UINT32,
};

/// Writes compact text JSON (no insignificant whitespace).
#[derive(Debug)]
pub struct TextWriter {
    out: Writer,
    ctx: WriterContext,
}

impl Default for TextWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextWriter {
    pub fn new() -> Self {
        Self::with_options(&WriterOptions::default())
    }

    pub fn with_options(options: &WriterOptions) -> Self {
        Self {
            out: Writer::with_capacity(options.initial_capacity),
            ctx: WriterContext::new(),
        }
    }

    fn scalar(&mut self, text: &str) -> Result<()> {
        if self.ctx.scalar()? {
            self.out.u8(b',');
        }
        self.out.utf8(text);
        Ok(())
    }

    fn sigil(&mut self, sigil: &str, literal: &str) -> Result<()> {
        if self.ctx.scalar()? {
            self.out.u8(b',');
        }
        self.out.utf8(sigil);
        self.out.utf8(literal);
        Ok(())
    }

    fn open(&mut self, object: bool) -> Result<()> {
        if self.ctx.open(object)? {
            self.out.u8(b',');
        }
        self.out.u8(if object { b'{' } else { b'[' });
        Ok(())
    }

    fn close(&mut self, object: bool) -> Result<()> {
        self.ctx.close(object)?;
        self.out.u8(if object { b'}' } else { b']' });
        Ok(())
    }
}

impl JsonWriter for TextWriter {
    fn format(&self) -> SerializationFormat {
        SerializationFormat::Text
    }

    fn write_null(&mut self) -> Result<()> {
        self.scalar("null")
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.scalar(if value { "true" } else { "false" })
    }

    fn write_number(&mut self, value: Number64) -> Result<()> {
        self.scalar(&value.to_string())
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        if self.ctx.scalar()? {
            self.out.u8(b',');
        }
        write_string(&mut self.out, value);
        Ok(())
    }

    fn write_field_name(&mut self, name: &str) -> Result<()> {
        if self.ctx.field_name(name)? {
            self.out.u8(b',');
        }
        write_string(&mut self.out, name);
        self.out.u8(b':');
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
        self.sigil(SIGIL_INT8, &value.to_string())
    }

    fn write_int16(&mut self, value: i16) -> Result<()> {
        self.sigil(SIGIL_INT16, &value.to_string())
    }

    fn write_int32(&mut self, value: i32) -> Result<()> {
        self.sigil(SIGIL_INT32, &value.to_string())
    }

    fn write_int64(&mut self, value: i64) -> Result<()> {
        self.sigil(SIGIL_INT64, &value.to_string())
    }

    fn write_uint32(&mut self, value: u32) -> Result<()> {
        self.sigil(SIGIL_UINT32, &value.to_string())
    }

    fn write_float32(&mut self, value: f32) -> Result<()> {
        self.sigil(SIGIL_FLOAT32, &format_float32(value))
    }

    fn write_float64(&mut self, value: f64) -> Result<()> {
        self.sigil(SIGIL_FLOAT64, &format_float64(value))
    }

    fn write_guid(&mut self, value: Guid) -> Result<()> {
        self.sigil(SIGIL_GUID, &value.to_string())
    }

    fn write_binary(&mut self, value: &[u8]) -> Result<()> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(value);
        self.sigil(SIGIL_BINARY, &encoded)
    }

    fn get_result(&self) -> Result<&[u8]> {
        self.ctx.finish()?;
        Ok(self.out.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JsonError;

    fn text(writer: &TextWriter) -> &str {
        std::str::from_utf8(writer.get_result().unwrap()).unwrap()
    }

    #[test]
    fn glossary_object() {
        let mut w = TextWriter::new();
        w.write_object_start().unwrap();
        w.write_field_name("GlossDiv").unwrap();
        w.write_number(Number64::Int(10)).unwrap();
        w.write_field_name("title").unwrap();
        w.write_string("example glossary").unwrap();
        w.write_object_end().unwrap();
        assert_eq!(text(&w), r#"{"GlossDiv":10,"title":"example glossary"}"#);
    }

    #[test]
    fn extended_kinds_use_sigils() {
        let mut w = TextWriter::new();
        w.write_array_start().unwrap();
        w.write_int8(-3).unwrap();
        w.write_int64(1 << 40).unwrap();
        w.write_uint32(7).unwrap();
        w.write_float32(0.5).unwrap();
        w.write_float64(f64::NEG_INFINITY).unwrap();
        w.write_binary(&[1, 2, 3]).unwrap();
        w.write_number(Number64::Double(f64::NAN)).unwrap();
        w.write_array_end().unwrap();
        assert_eq!(text(&w), "[I-3,LL1099511627776,UL7,S0.5,D-Infinity,BAQID,NaN]");
    }

    #[test]
    fn numbers() {
        let mut w = TextWriter::new();
        w.write_array_start().unwrap();
        w.write_number(Number64::Double(2.0)).unwrap();
        w.write_number(Number64::Double(1337.1337)).unwrap();
        w.write_number(Number64::Int(-2)).unwrap();
        w.write_array_end().unwrap();
        assert_eq!(text(&w), "[2,1337.1337,-2]");
    }

    #[test]
    fn result_requires_a_closed_root() {
        let mut w = TextWriter::new();
        w.write_array_start().unwrap();
        assert_eq!(w.get_result(), Err(JsonError::WriterNotDone));
    }
}
