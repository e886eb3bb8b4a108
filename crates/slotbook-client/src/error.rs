//! Client error types.

use std::fmt;

use slotbook_protocol::ProtocolError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Malformed bytes on the wire; never retried.
    Protocol(ProtocolError),
    /// Underlying transport failure.
    Io(std::io::Error),
    /// No reply within the allotted attempts.
    Timeout { attempts: u32 },
    /// Server address did not parse as host:port.
    InvalidAddress(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Protocol(err) => write!(f, "protocol error: {}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Timeout { attempts } => {
                write!(f, "no reply after {} attempt(s)", attempts)
            }
            Self::InvalidAddress(addr) => {
                write!(f, "invalid server address {:?}, expected host:port", addr)
            }
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Protocol(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ProtocolError> for ClientError {
    fn from(err: ProtocolError) -> Self {
        Self::Protocol(err)
    }
}
