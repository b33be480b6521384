//! Compact JSON codec for document payloads.
//!
//! Two interchangeable encodings of the same value model:
//!
//! - **Text**: RFC 8259 JSON extended with sigil-prefixed scalars for sized
//!   integers, floats, GUIDs and binary data.
//! - **Binary**: a marker-byte format where small values live in the marker
//!   itself, strings are compacted against a fixed system table, a caller
//!   supplied [`StringDictionary`] and a set of content-shape encodings, and
//!   containers carry their byte length so they can be skipped unread.
//!
//! Payloads are produced by a [`JsonWriter`], consumed token by token with a
//! [`Reader`], or navigated lazily with a [`Navigator`], whose subtrees can
//! be materialized into a [`JsonElement`].
//!
//! ```
//! use docdb_json::{create_writer, Navigator, Number64, SerializationFormat, WriterOptions};
//!
//! let mut writer = create_writer(SerializationFormat::Binary, WriterOptions::default(), None);
//! writer.write_object_start().unwrap();
//! writer.write_field_name("title").unwrap();
//! writer.write_string("example glossary").unwrap();
//! writer.write_field_name("count").unwrap();
//! writer.write_number(Number64::Int(10)).unwrap();
//! writer.write_object_end().unwrap();
//! let payload = writer.get_result().unwrap().to_vec();
//!
//! let nav = Navigator::new(&payload, None).unwrap();
//! let title = nav.try_get_object_property(nav.root_node(), "title").unwrap().unwrap();
//! assert_eq!(nav.get_string(title.value).unwrap(), "example glossary");
//! ```

pub mod binary;
mod dictionary;
mod element;
mod error;
mod format;
mod guid;
pub mod navigator;
mod number;
pub mod reader;
mod text;
mod token;
mod transcode;
pub mod writer;

pub use dictionary::StringDictionary;
pub use element::{materialize, JsonElement};
pub use error::{ErrorCategory, JsonError, Result};
pub use format::{SerializationFormat, BINARY_FORMAT_MARKER};
pub use guid::Guid;
pub use navigator::{Navigator, NavigatorNode, ObjectProperty};
pub use number::Number64;
pub use reader::Reader;
pub use token::{JsonNodeType, Token, TokenType};
pub use transcode::transcode;
pub use writer::{create_writer, BinaryWriter, JsonWriter, TextWriter, WriterOptions};
