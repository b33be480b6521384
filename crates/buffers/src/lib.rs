//! Byte buffer primitives shared by the docdb JSON codec.
//!
//! - [`Writer`]: growable little-endian output buffer with back-patching.
//! - [`Reader`]: bounds-checked little-endian cursor over a borrowed slice.
//! - [`bits`]: fixed-width code packing used by the compact string encodings.

pub mod bits;
mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Errors raised by [`Reader`] when a read runs past the end of its window.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    #[error("unexpected end of buffer at offset {offset}: needed {needed} bytes")]
    EndOfBuffer { offset: usize, needed: usize },
}
