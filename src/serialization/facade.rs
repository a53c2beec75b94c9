use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::marker::PhantomData;
use std::path::Path;

use crate::codec::{BinaryCodec, Codec, XmlCodec};
use crate::config::SerializerOptions;
use crate::errors::SerializerResult;
use crate::serialization::{Format, IntoFormat};
use crate::utils::{bytes_to_text, text_to_bytes};

/// Stateless entry point converting values of `T` to and from their
/// persisted XML or binary representation.
///
/// Every operation resolves its format selector first, then hands the payload
/// to the matching codec. Codec failures surface as
/// [`SerializerError::FormatError`](crate::SerializerError::FormatError),
/// unknown selectors as
/// [`SerializerError::ConfigurationError`](crate::SerializerError::ConfigurationError),
/// and failures of the underlying stream or file as
/// [`SerializerError::IoError`](crate::SerializerError::IoError).
///
/// Caller-supplied streams are never closed. Files opened by the facade are
/// released before the operation returns, on success or failure.
pub struct SerializationFacade<T> {
    options: SerializerOptions,
    binary: BinaryCodec,
    xml: XmlCodec,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerializationFacade<T> {
    /// Create a facade with default options
    pub fn new() -> Self {
        Self::with_options(SerializerOptions::default())
    }

    /// Create a facade with the given options
    pub fn with_options(options: SerializerOptions) -> Self {
        Self {
            binary: BinaryCodec::new(options.binary.clone()),
            xml: XmlCodec::new(options.xml.clone()),
            options,
            _marker: PhantomData,
        }
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    /// Format callers should use when they have no preference
    pub fn default_format(&self) -> Format {
        self.options.default_format
    }
}

impl<T: Serialize> SerializationFacade<T> {
    /// Write `value` into `stream` starting at its current position
    pub fn encode_to_stream<W>(
        &self,
        stream: &mut W,
        value: &T,
        format: impl IntoFormat,
    ) -> SerializerResult<()>
    where
        W: Write + ?Sized,
    {
        let format = format.into_format()?;
        log::debug!("encoding {} to stream as {format}", std::any::type_name::<T>());
        self.encode_with(format, value, stream)
    }

    /// Write `value` to the file at `path`, creating or truncating it
    pub fn encode_to_path<P>(&self, path: P, value: &T, format: impl IntoFormat) -> SerializerResult<()>
    where
        P: AsRef<Path>,
    {
        let format = format.into_format()?;
        let path = path.as_ref();
        log::debug!(
            "encoding {} to {} as {format}",
            std::any::type_name::<T>(),
            path.display()
        );

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        match format {
            Format::Binary => {
                let mut file = file;
                self.binary.encode(value, &mut file)?;
            }
            Format::Xml => {
                let mut writer = BufWriter::new(file);
                self.xml.encode(value, &mut writer)?;
                writer.flush()?;
            }
        }
        Ok(())
    }

    /// Encode `value` into an in-memory buffer
    pub fn encode_to_bytes(&self, value: &T, format: impl IntoFormat) -> SerializerResult<Vec<u8>> {
        let format = format.into_format()?;
        log::debug!("encoding {} to bytes as {format}", std::any::type_name::<T>());
        let mut buf = Vec::new();
        self.encode_with(format, value, &mut buf)?;
        Ok(buf)
    }

    /// Encode `value` as text.
    ///
    /// Binary envelopes are mapped byte-per-char so that
    /// [`decode_from_text`](Self::decode_from_text) restores them exactly.
    pub fn encode_to_text(&self, value: &T, format: impl IntoFormat) -> SerializerResult<String> {
        let format = format.into_format()?;
        log::debug!("encoding {} to text as {format}", std::any::type_name::<T>());
        match format {
            Format::Xml => Ok(self.xml.to_document(value)?),
            Format::Binary => {
                let mut buf = Vec::new();
                self.binary.encode(value, &mut buf)?;
                Ok(bytes_to_text(&buf))
            }
        }
    }

    fn encode_with<W>(&self, format: Format, value: &T, sink: &mut W) -> SerializerResult<()>
    where
        W: Write + ?Sized,
    {
        match format {
            Format::Xml => encode_via(&self.xml, value, sink),
            Format::Binary => encode_via(&self.binary, value, sink),
        }
    }
}

impl<T: DeserializeOwned> SerializationFacade<T> {
    /// Decode a value from text.
    ///
    /// For [`Format::Binary`] the text is first converted to bytes with the
    /// default text encoding, which replaces chars outside Latin-1 with `?`.
    /// Text produced by [`encode_to_text`](Self::encode_to_text) is unaffected.
    pub fn decode_from_text(&self, text: &str, format: impl IntoFormat) -> SerializerResult<T> {
        let format = format.into_format()?;
        log::debug!(
            "decoding {} from {} bytes of text as {format}",
            std::any::type_name::<T>(),
            text.len()
        );

        match format {
            Format::Xml => Ok(self.xml.from_document(text)?),
            Format::Binary => {
                let encoded = text_to_bytes(text);
                if !encoded.is_lossless() {
                    log::warn!(
                        "{} chars outside Latin-1 replaced while converting text to binary payload",
                        encoded.replaced
                    );
                }
                Ok(self.binary.decode(&mut Cursor::new(encoded.bytes))?)
            }
        }
    }

    /// Decode a value from `stream` starting at its current position
    pub fn decode_from_stream<R>(&self, stream: &mut R, format: impl IntoFormat) -> SerializerResult<T>
    where
        R: Read + ?Sized,
    {
        let format = format.into_format()?;
        log::debug!("decoding {} from stream as {format}", std::any::type_name::<T>());
        self.decode_with(format, stream)
    }

    /// Decode a value from an in-memory buffer
    pub fn decode_from_bytes(&self, bytes: &[u8], format: impl IntoFormat) -> SerializerResult<T> {
        let format = format.into_format()?;
        log::debug!(
            "decoding {} from {} bytes as {format}",
            std::any::type_name::<T>(),
            bytes.len()
        );
        self.decode_with(format, &mut Cursor::new(bytes))
    }

    /// Decode a value from the file at `path`
    pub fn decode_from_path<P>(&self, path: P, format: impl IntoFormat) -> SerializerResult<T>
    where
        P: AsRef<Path>,
    {
        let format = format.into_format()?;
        let path = path.as_ref();
        log::debug!(
            "decoding {} from {} as {format}",
            std::any::type_name::<T>(),
            path.display()
        );

        let mut reader = BufReader::new(File::open(path)?);
        self.decode_with(format, &mut reader)
    }

    fn decode_with<R>(&self, format: Format, source: &mut R) -> SerializerResult<T>
    where
        R: Read + ?Sized,
    {
        match format {
            Format::Xml => decode_via(&self.xml, source),
            Format::Binary => decode_via(&self.binary, source),
        }
    }
}

fn encode_via<C, T, W>(codec: &C, value: &T, sink: &mut W) -> SerializerResult<()>
where
    C: Codec,
    T: Serialize,
    W: Write + ?Sized,
{
    log::trace!("{} codec encoding {}", codec.format(), std::any::type_name::<T>());
    codec.encode(value, sink)?;
    Ok(())
}

fn decode_via<C, T, R>(codec: &C, source: &mut R) -> SerializerResult<T>
where
    C: Codec,
    T: DeserializeOwned,
    R: Read + ?Sized,
{
    log::trace!("{} codec decoding {}", codec.format(), std::any::type_name::<T>());
    Ok(codec.decode(source)?)
}

impl<T> Default for SerializationFacade<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SerializationFacade<T> {
    fn clone(&self) -> Self {
        Self::with_options(self.options.clone())
    }
}

impl<T> fmt::Debug for SerializationFacade<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializationFacade")
            .field("target", &std::any::type_name::<T>())
            .field("options", &self.options)
            .finish()
    }
}
