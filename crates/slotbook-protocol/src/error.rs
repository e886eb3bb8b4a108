//! Protocol error types.

use thiserror::Error;

use crate::types::RequestKind;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding or decoding wire messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A string field reached the end of the buffer before its `0x00`
    /// terminator.
    #[error("missing string terminator")]
    MissingTerminator,

    /// A string field held invalid UTF-8 before its terminator.
    #[error("invalid UTF-8 in string field: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// The buffer ended before a fixed-size field was complete.
    #[error("truncated buffer: need {expected} bytes, got {received}")]
    Truncated { expected: usize, received: usize },

    /// A tag byte that does not name any known value (message kind or
    /// day ordinal).
    #[error("unrecognized tag byte: {0:#04x}")]
    UnknownTag(u8),

    /// A day name that does not match any weekday.
    #[error("unknown day name: {0:?}")]
    UnknownDay(String),

    /// A message kind with no body defined in this position (e.g. a
    /// `Monitor` tag in a response header).
    #[error("no response body is defined for {0:?} messages")]
    UnexpectedKind(RequestKind),
}
