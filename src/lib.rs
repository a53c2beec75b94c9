//! Generic serializer - a uniform facade over interchangeable codecs
//!
//! This crate converts values of any serde-enabled type to and from XML text
//! or a versioned binary envelope, targeting byte buffers, text, streams and
//! file paths, with one error model regardless of the codec in use.

pub mod codec;
pub mod config;
pub mod errors;
pub mod serialization;
pub mod utils;

// Re-export commonly used types
pub use codec::{BinaryCodec, Codec, CodecError, XmlCodec};
pub use config::SerializerOptions;
pub use errors::{SerializerError, SerializerResult};
pub use serialization::{BinaryOptions, Format, IntoFormat, SerializationFacade, XmlOptions};
