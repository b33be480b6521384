//! Error type for the JSON codec.

use docdb_buffers::BufferError;
use thiserror::Error;

use crate::token::{JsonNodeType, TokenType};

/// Coarse classification of a [`JsonError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The payload is not a valid encoding.
    MalformedInput,
    /// A writer was driven through an invalid call sequence.
    WriterProtocol,
    /// An index was outside the bounds of a container.
    Bounds,
    /// A typed accessor was used on a node or token of another kind.
    TypeMismatch,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonError {
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },
    #[error("invalid type marker 0x{marker:02x} at offset {offset}")]
    InvalidMarker { marker: u8, offset: usize },
    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },
    #[error("invalid JSON text at offset {offset}: {reason}")]
    InvalidText { offset: usize, reason: &'static str },
    #[error("string reference at offset {offset} has no resolvable target")]
    UnresolvedString { offset: usize },
    #[error("container at offset {offset} is inconsistent with its declared length")]
    ContainerOverrun { offset: usize },
    #[error("unexpected data after the root value at offset {offset}")]
    TrailingData { offset: usize },
    #[error("payload does not start with the binary format marker")]
    NotBinary,

    #[error("array not started")]
    ArrayNotStarted,
    #[error("object not started")]
    ObjectNotStarted,
    #[error("property/array/object not started")]
    NoOpenContainer,
    #[error("missing property name before value")]
    MissingProperty,
    #[error("missing value for property")]
    MissingPropertyValue,
    #[error("property name written outside of an object")]
    PropertyOutsideObject,
    #[error("property already added: {0}")]
    PropertyAlreadyAdded(String),
    #[error("writer has not completed a root value")]
    WriterNotDone,
    #[error("writer is faulted by an earlier protocol violation")]
    WriterFaulted,

    #[error("index {index} is out of range for a container of {count} items")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("expected a {expected:?} node, found {actual:?}")]
    UnexpectedNodeType {
        expected: JsonNodeType,
        actual: JsonNodeType,
    },
    #[error("expected a {expected:?} token, found {actual:?}")]
    UnexpectedToken {
        expected: TokenType,
        actual: Option<TokenType>,
    },
}

impl JsonError {
    pub(crate) fn text(offset: usize, reason: &'static str) -> Self {
        JsonError::InvalidText { offset, reason }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            JsonError::UnexpectedEof { .. }
            | JsonError::InvalidMarker { .. }
            | JsonError::InvalidUtf8 { .. }
            | JsonError::InvalidText { .. }
            | JsonError::UnresolvedString { .. }
            | JsonError::ContainerOverrun { .. }
            | JsonError::TrailingData { .. }
            | JsonError::NotBinary => ErrorCategory::MalformedInput,
            JsonError::ArrayNotStarted
            | JsonError::ObjectNotStarted
            | JsonError::NoOpenContainer
            | JsonError::MissingProperty
            | JsonError::MissingPropertyValue
            | JsonError::PropertyOutsideObject
            | JsonError::PropertyAlreadyAdded(_)
            | JsonError::WriterNotDone
            | JsonError::WriterFaulted => ErrorCategory::WriterProtocol,
            JsonError::IndexOutOfRange { .. } => ErrorCategory::Bounds,
            JsonError::UnexpectedNodeType { .. } | JsonError::UnexpectedToken { .. } => {
                ErrorCategory::TypeMismatch
            }
        }
    }
}

impl From<BufferError> for JsonError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer { offset, .. } => JsonError::UnexpectedEof { offset },
        }
    }
}

pub type Result<T, E = JsonError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_errors_map_to_eof() {
        let err: JsonError = BufferError::EndOfBuffer {
            offset: 7,
            needed: 2,
        }
        .into();
        assert_eq!(err, JsonError::UnexpectedEof { offset: 7 });
        assert_eq!(err.category(), ErrorCategory::MalformedInput);
    }

    #[test]
    fn categories() {
        assert_eq!(
            JsonError::PropertyAlreadyAdded("a".into()).category(),
            ErrorCategory::WriterProtocol
        );
        assert_eq!(
            JsonError::IndexOutOfRange { index: 3, count: 3 }.category(),
            ErrorCategory::Bounds
        );
        assert_eq!(
            JsonError::ArrayNotStarted.to_string(),
            "array not started"
        );
    }
}
