//! Default text encoding used when binary payloads travel as strings.
//!
//! Each char maps to one byte: `U+0000..=U+00FF` become that byte and every
//! other char becomes `?`. The mapping is lossy outside Latin-1, so text that
//! did not come from [`bytes_to_text`] may not survive the trip.

/// Byte written for chars outside Latin-1
const REPLACEMENT_BYTE: u8 = b'?';

/// Encoded bytes plus the number of chars that had to be replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedText {
    pub bytes: Vec<u8>,
    pub replaced: usize,
}

impl EncodedText {
    pub fn is_lossless(&self) -> bool {
        self.replaced == 0
    }
}

/// Convert text to bytes with the default text encoding
pub fn text_to_bytes(text: &str) -> EncodedText {
    let mut replaced = 0;
    let bytes = text
        .chars()
        .map(|ch| match u8::try_from(u32::from(ch)) {
            Ok(byte) => byte,
            Err(_) => {
                replaced += 1;
                REPLACEMENT_BYTE
            }
        })
        .collect();

    EncodedText { bytes, replaced }
}

/// Inverse of [`text_to_bytes`] for lossless input
pub fn bytes_to_text(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}
