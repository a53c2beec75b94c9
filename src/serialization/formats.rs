use std::fmt;
use std::str::FromStr;

use crate::errors::{SerializerError, SerializerResult};

/// Persisted representation selected for a facade call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Format {
    /// Element-mapped XML text
    Xml = 0,
    /// Versioned binary envelope around bincode
    Binary = 1,
}

impl Format {
    /// All supported formats, in tag order
    pub const ALL: [Format; 2] = [Format::Xml, Format::Binary];

    /// Resolve a raw numeric tag
    pub fn from_tag(tag: i64) -> SerializerResult<Self> {
        match tag {
            0 => Ok(Format::Xml),
            1 => Ok(Format::Binary),
            other => Err(SerializerError::invalid_format(other)),
        }
    }

    /// Raw numeric tag of this format
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Xml => "xml",
            Format::Binary => "binary",
        }
    }

    /// Suggested file extension
    pub fn extension(self) -> &'static str {
        match self {
            Format::Xml => "xml",
            Format::Binary => "bin",
        }
    }
}

impl Default for Format {
    fn default() -> Self {
        Format::Xml
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = SerializerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xml" => Ok(Format::Xml),
            "binary" | "bin" => Ok(Format::Binary),
            _ => Err(SerializerError::invalid_format(format!("{s:?}"))),
        }
    }
}

/// Anything that can select a format for a facade call.
///
/// Resolution happens before the payload is touched, so an unknown selector
/// never produces partial output.
pub trait IntoFormat {
    fn into_format(self) -> SerializerResult<Format>;
}

impl IntoFormat for Format {
    fn into_format(self) -> SerializerResult<Format> {
        Ok(self)
    }
}

impl IntoFormat for u8 {
    fn into_format(self) -> SerializerResult<Format> {
        Format::from_tag(i64::from(self))
    }
}

impl IntoFormat for i32 {
    fn into_format(self) -> SerializerResult<Format> {
        Format::from_tag(i64::from(self))
    }
}

impl IntoFormat for &str {
    fn into_format(self) -> SerializerResult<Format> {
        self.parse()
    }
}
