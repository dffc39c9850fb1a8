//! Error types for the filter document codec.

use thiserror::Error;

/// Errors that abort a whole import.
///
/// Problems confined to a single entry never surface here: the entry is
/// defaulted and the import continues.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The document is not well-formed XML.
    #[error("malformed filter document at byte {position}: {message}")]
    MalformedDocument { message: String, position: usize },
}

impl CodecError {
    pub(crate) fn malformed(message: impl Into<String>, position: usize) -> Self {
        CodecError::MalformedDocument {
            message: message.into(),
            position,
        }
    }
}

/// Result type for codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;
