//! Binary codec: a versioned, self-describing envelope around a bincode payload.
//!
//! ```text
//! offset size field
//! 0      4    magic, b"GSER"
//! 4      1    version
//! 5      1    flags (bit 0: payload is gzip-compressed)
//! 6      4    stored payload length, u32 LE
//! 10     4    CRC-32 of the stored payload, u32 LE
//! 14     n    payload
//! ```
//!
//! The decoder reads exactly one envelope, so a stream holding several
//! encoded values can be decoded value by value.

use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

use super::{Codec, CodecError, CodecResult};
use crate::serialization::{BinaryOptions, Format};

pub const MAGIC: [u8; 4] = *b"GSER";
pub const VERSION: u8 = 1;
pub const HEADER_LEN: usize = 14;

const FLAG_COMPRESSED: u8 = 0b0000_0001;
const KNOWN_FLAGS: u8 = FLAG_COMPRESSED;

/// Fixed-size header preceding every binary payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeHeader {
    pub version: u8,
    pub flags: u8,
    pub payload_len: u32,
    pub checksum: u32,
}

impl EnvelopeHeader {
    /// Build the header for a stored payload
    pub fn for_payload(payload: &[u8], compressed: bool) -> CodecResult<Self> {
        let payload_len = u32::try_from(payload.len()).map_err(|_| {
            CodecError::Malformed(format!(
                "payload of {} bytes exceeds the envelope limit",
                payload.len()
            ))
        })?;

        Ok(Self {
            version: VERSION,
            flags: if compressed { FLAG_COMPRESSED } else { 0 },
            payload_len,
            checksum: crc32fast::hash(payload),
        })
    }

    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[..4].copy_from_slice(&MAGIC);
        bytes[4] = self.version;
        bytes[5] = self.flags;
        bytes[6..10].copy_from_slice(&self.payload_len.to_le_bytes());
        bytes[10..14].copy_from_slice(&self.checksum.to_le_bytes());
        bytes
    }

    /// Parse and validate a header
    pub fn parse(bytes: &[u8; HEADER_LEN], max_payload_len: u32) -> CodecResult<Self> {
        if bytes[..4] != MAGIC {
            return Err(CodecError::Malformed(format!(
                "invalid magic {}, expected {}",
                hex::encode(&bytes[..4]),
                hex::encode(MAGIC)
            )));
        }

        let header = Self {
            version: bytes[4],
            flags: bytes[5],
            payload_len: u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]),
            checksum: u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]),
        };

        if header.version != VERSION {
            return Err(CodecError::Malformed(format!(
                "unsupported envelope version {}",
                header.version
            )));
        }
        if header.flags & !KNOWN_FLAGS != 0 {
            return Err(CodecError::Malformed(format!(
                "unknown envelope flags {:#04x}",
                header.flags
            )));
        }
        if header.payload_len > max_payload_len {
            return Err(CodecError::Malformed(format!(
                "payload length {} exceeds limit {}",
                header.payload_len, max_payload_len
            )));
        }

        Ok(header)
    }
}

/// Codec for [`Format::Binary`]
#[derive(Debug, Clone, Default)]
pub struct BinaryCodec {
    options: BinaryOptions,
}

impl BinaryCodec {
    pub fn new(options: BinaryOptions) -> Self {
        Self { options }
    }

    /// Reject encodings this configuration could not decode again
    fn check_limit(&self, len: usize, what: &str) -> CodecResult<()> {
        let limit = self.options.max_payload_len;
        if len as u64 > u64::from(limit) {
            return Err(CodecError::Malformed(format!(
                "{what} of {len} bytes exceeds limit {limit}"
            )));
        }
        Ok(())
    }

    fn compress(&self, raw: &[u8]) -> CodecResult<Vec<u8>> {
        let mut encoder = GzEncoder::new(
            Vec::with_capacity(raw.len() / 2),
            Compression::new(self.options.compression_level),
        );
        encoder.write_all(raw)?;
        Ok(encoder.finish()?)
    }

    fn decompress(&self, payload: &[u8]) -> CodecResult<Vec<u8>> {
        let limit = u64::from(self.options.max_payload_len);
        let mut decompressed = Vec::new();
        GzDecoder::new(payload)
            .take(limit + 1)
            .read_to_end(&mut decompressed)
            .map_err(|e| CodecError::Malformed(format!("corrupt compressed payload: {e}")))?;

        if decompressed.len() as u64 > limit {
            return Err(CodecError::Malformed(format!(
                "decompressed payload exceeds limit {limit}"
            )));
        }
        Ok(decompressed)
    }
}

impl Codec for BinaryCodec {
    fn format(&self) -> Format {
        Format::Binary
    }

    fn encode<T, W>(&self, value: &T, sink: &mut W) -> CodecResult<()>
    where
        T: Serialize + ?Sized,
        W: Write + ?Sized,
    {
        let raw = bincode::serialize(value)
            .map_err(|e| CodecError::Malformed(format!("bincode encode failed: {e}")))?;
        self.check_limit(raw.len(), "encoded value")?;

        let payload = if self.options.compress {
            self.compress(&raw)?
        } else {
            raw
        };
        self.check_limit(payload.len(), "stored payload")?;

        let header = EnvelopeHeader::for_payload(&payload, self.options.compress)?;
        let header_bytes = header.to_bytes();
        log::trace!(
            "binary envelope header {} ({} payload bytes)",
            hex::encode(header_bytes),
            payload.len()
        );

        sink.write_all(&header_bytes)?;
        sink.write_all(&payload)?;
        Ok(())
    }

    fn decode<T, R>(&self, source: &mut R) -> CodecResult<T>
    where
        T: DeserializeOwned,
        R: Read + ?Sized,
    {
        let mut header_bytes = [0u8; HEADER_LEN];
        source
            .read_exact(&mut header_bytes)
            .map_err(|e| CodecError::from_read(e, "envelope header"))?;
        let header = EnvelopeHeader::parse(&header_bytes, self.options.max_payload_len)?;

        // Read through `take` so a lying length cannot force a large allocation up front
        let expected = header.payload_len as usize;
        let mut payload = Vec::new();
        Read::take(&mut *source, u64::from(header.payload_len))
            .read_to_end(&mut payload)
            .map_err(|e| CodecError::from_read(e, "payload"))?;
        if payload.len() < expected {
            return Err(CodecError::Malformed(format!(
                "truncated payload: expected {expected} bytes, got {}",
                payload.len()
            )));
        }

        let actual = crc32fast::hash(&payload);
        if actual != header.checksum {
            return Err(CodecError::Malformed(format!(
                "checksum mismatch: stored {:08x}, computed {actual:08x}",
                header.checksum
            )));
        }

        let raw = if header.is_compressed() {
            self.decompress(&payload)?
        } else {
            payload
        };

        bincode::deserialize(&raw)
            .map_err(|e| CodecError::Malformed(format!("bincode decode failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Sample {
        name: String,
        values: Vec<u64>,
    }

    fn sample() -> Sample {
        Sample {
            name: "sample".to_string(),
            values: (0..64).collect(),
        }
    }

    fn encode(codec: &BinaryCodec, value: &Sample) -> Vec<u8> {
        let mut buf = Vec::new();
        codec.encode(value, &mut buf).unwrap();
        buf
    }

    #[test]
    fn test_header_layout() {
        let bytes = encode(&BinaryCodec::default(), &sample());
        assert_eq!(&bytes[..4], b"GSER");
        assert_eq!(bytes[4], VERSION);
        assert_eq!(bytes[5], 0);

        let len = u32::from_le_bytes(bytes[6..10].try_into().unwrap()) as usize;
        assert_eq!(bytes.len(), HEADER_LEN + len);
        let crc = u32::from_le_bytes(bytes[10..14].try_into().unwrap());
        assert_eq!(crc, crc32fast::hash(&bytes[HEADER_LEN..]));
    }

    #[test]
    fn test_compressed_round_trip() {
        let codec = BinaryCodec::new(BinaryOptions::smallest());
        let bytes = encode(&codec, &sample());
        assert_eq!(bytes[5], FLAG_COMPRESSED);

        // The flag makes the envelope self-describing for any decoder
        let decoded: Sample = BinaryCodec::default()
            .decode(&mut Cursor::new(bytes))
            .unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_decoder_stops_at_envelope_end() {
        let codec = BinaryCodec::default();
        let mut bytes = encode(&codec, &sample());
        let first_len = bytes.len();
        bytes.extend(encode(&codec, &sample()));

        let mut cursor = Cursor::new(bytes);
        let _: Sample = codec.decode(&mut cursor).unwrap();
        assert_eq!(cursor.position() as usize, first_len);
        let second: Sample = codec.decode(&mut cursor).unwrap();
        assert_eq!(second, sample());
    }

    #[test]
    fn test_corruption_is_malformed() {
        let codec = BinaryCodec::default();
        let mut bytes = encode(&codec, &sample());
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;

        let err = codec.decode::<Sample, _>(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(ref msg) if msg.contains("checksum")));
    }

    #[test]
    fn test_truncation_is_malformed() {
        let codec = BinaryCodec::default();
        let bytes = encode(&codec, &sample());

        for cut in [3, HEADER_LEN - 1, HEADER_LEN + 2] {
            let err = codec
                .decode::<Sample, _>(&mut Cursor::new(&bytes[..cut]))
                .unwrap_err();
            assert!(matches!(err, CodecError::Malformed(_)), "cut at {cut}");
        }
    }

    #[test]
    fn test_encode_respects_payload_limit() {
        for options in [
            BinaryOptions::fastest().with_max_payload_len(8),
            BinaryOptions::smallest().with_max_payload_len(64),
        ] {
            let codec = BinaryCodec::new(options);
            let mut buf = Vec::new();
            let err = codec.encode(&sample(), &mut buf).unwrap_err();
            assert!(matches!(err, CodecError::Malformed(ref msg) if msg.contains("exceeds limit")));
            assert!(buf.is_empty());
        }
    }

    #[test]
    fn test_header_validation() {
        let header = EnvelopeHeader::for_payload(b"abc", false).unwrap();

        let mut bytes = header.to_bytes();
        bytes[4] = 2;
        assert!(EnvelopeHeader::parse(&bytes, u32::MAX).is_err());

        let mut bytes = header.to_bytes();
        bytes[5] = 0x80;
        assert!(EnvelopeHeader::parse(&bytes, u32::MAX).is_err());

        let bytes = header.to_bytes();
        assert!(EnvelopeHeader::parse(&bytes, 2).is_err());
        assert_eq!(EnvelopeHeader::parse(&bytes, 3).unwrap(), header);
    }
}
