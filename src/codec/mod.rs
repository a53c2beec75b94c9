pub mod binary;
pub mod xml;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::io::{self, Read, Write};

use crate::serialization::Format;

pub use binary::BinaryCodec;
pub use xml::XmlCodec;

/// Failure reported by a codec
#[derive(Debug)]
pub enum CodecError {
    /// The sink or source failed
    Io(io::Error),
    /// The payload or value cannot be represented
    Malformed(String),
}

impl CodecError {
    /// Classify a read failure; running out of input means the payload is truncated
    pub fn from_read(err: io::Error, what: &str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            CodecError::Malformed(format!("truncated {what}: {err}"))
        } else {
            CodecError::Io(err)
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Io(err) => write!(f, "codec IO error: {err}"),
            CodecError::Malformed(msg) => write!(f, "malformed payload: {msg}"),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<io::Error> for CodecError {
    fn from(err: io::Error) -> Self {
        CodecError::Io(err)
    }
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Paired encode/decode strategy for one format
pub trait Codec {
    /// Format tag this codec implements
    fn format(&self) -> Format;

    /// Write the encoded representation of `value` into `sink`
    fn encode<T, W>(&self, value: &T, sink: &mut W) -> CodecResult<()>
    where
        T: Serialize + ?Sized,
        W: Write + ?Sized;

    /// Read one value from `source`
    fn decode<T, R>(&self, source: &mut R) -> CodecResult<T>
    where
        T: DeserializeOwned,
        R: Read + ?Sized;
}
