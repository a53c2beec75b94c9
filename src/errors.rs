use std::fmt;

use crate::codec::CodecError;

/// Error kinds surfaced by every facade operation
#[derive(Debug)]
pub enum SerializerError {
    /// The format selector does not match any known codec
    ConfigurationError(String),
    /// The codec rejected the payload or the value
    FormatError(String),
    /// Opening, reading or writing the underlying resource failed
    IoError(std::io::Error),
}

impl SerializerError {
    /// Error returned for a selector that names no codec
    pub fn invalid_format(selector: impl fmt::Display) -> Self {
        SerializerError::ConfigurationError(format!("Invalid formatter option: {selector}"))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, SerializerError::ConfigurationError(_))
    }

    pub fn is_format(&self) -> bool {
        matches!(self, SerializerError::FormatError(_))
    }

    pub fn is_io(&self) -> bool {
        matches!(self, SerializerError::IoError(_))
    }
}

impl fmt::Display for SerializerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializerError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            SerializerError::FormatError(msg) => write!(f, "Format error: {msg}"),
            SerializerError::IoError(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for SerializerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerializerError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SerializerError {
    fn from(err: std::io::Error) -> Self {
        SerializerError::IoError(err)
    }
}

impl From<CodecError> for SerializerError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Io(err) => SerializerError::IoError(err),
            CodecError::Malformed(msg) => SerializerError::FormatError(msg),
        }
    }
}

/// Result type alias for facade operations
pub type SerializerResult<T> = Result<T, SerializerError>;
