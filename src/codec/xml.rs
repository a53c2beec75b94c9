use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

use super::{Codec, CodecError, CodecResult};
use crate::serialization::{Format, XmlOptions};

/// Codec for [`Format::Xml`], backed by quick-xml's serde support.
///
/// Decoding consumes the source to its end: an XML document has no length
/// prefix, so the codec cannot tell where a value stops without reading on.
#[derive(Debug, Clone, Default)]
pub struct XmlCodec {
    options: XmlOptions,
}

impl XmlCodec {
    pub fn new(options: XmlOptions) -> Self {
        Self { options }
    }

    /// Render `value` as an XML document.
    ///
    /// Strings the decoder would not restore verbatim are rejected.
    pub fn to_document<T>(&self, value: &T) -> CodecResult<String>
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_value(value) {
            Ok(tree) => check_text_fidelity(&tree)?,
            Err(e) => log::trace!("skipping xml text check: {e}"),
        }

        let mut document = String::new();
        let mut serializer =
            quick_xml::se::Serializer::with_root(&mut document, self.options.root_name.as_deref())
                .map_err(|e| CodecError::Malformed(format!("invalid root element name: {e}")))?;
        if let Some(indent) = self.options.indent {
            serializer.indent(' ', indent);
        }

        value
            .serialize(serializer)
            .map_err(|e| CodecError::Malformed(format!("xml encode failed: {e}")))?;
        Ok(document)
    }

    /// Parse a value from an XML document
    pub fn from_document<T>(&self, document: &str) -> CodecResult<T>
    where
        T: DeserializeOwned,
    {
        quick_xml::de::from_str(document)
            .map_err(|e| CodecError::Malformed(format!("xml decode failed: {e}")))
    }
}

fn is_xml_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

/// quick-xml trims whitespace around text content and does not keep `\r`
fn check_text_fidelity(value: &serde_json::Value) -> CodecResult<()> {
    match value {
        serde_json::Value::String(text) => {
            if text.trim_matches(is_xml_whitespace).len() != text.len() || text.contains('\r') {
                return Err(CodecError::Malformed(format!(
                    "text {text:?} cannot be stored as xml: leading or trailing whitespace and carriage returns are not preserved"
                )));
            }
            Ok(())
        }
        serde_json::Value::Array(items) => items.iter().try_for_each(check_text_fidelity),
        serde_json::Value::Object(fields) => fields.values().try_for_each(check_text_fidelity),
        _ => Ok(()),
    }
}

impl Codec for XmlCodec {
    fn format(&self) -> Format {
        Format::Xml
    }

    fn encode<T, W>(&self, value: &T, sink: &mut W) -> CodecResult<()>
    where
        T: Serialize + ?Sized,
        W: Write + ?Sized,
    {
        let document = self.to_document(value)?;
        sink.write_all(document.as_bytes())?;
        Ok(())
    }

    fn decode<T, R>(&self, source: &mut R) -> CodecResult<T>
    where
        T: DeserializeOwned,
        R: Read + ?Sized,
    {
        let mut bytes = Vec::new();
        source
            .read_to_end(&mut bytes)
            .map_err(|e| CodecError::from_read(e, "xml document"))?;

        let document = std::str::from_utf8(&bytes)
            .map_err(|e| CodecError::Malformed(format!("xml document is not valid UTF-8: {e}")))?;
        self.from_document(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Record {
        name: String,
        count: u32,
    }

    fn record() -> Record {
        Record {
            name: "a".to_string(),
            count: 1,
        }
    }

    #[test]
    fn test_root_defaults_to_type_name() {
        let document = XmlCodec::default().to_document(&record()).unwrap();
        assert!(document.starts_with("<Record>"), "{document}");
        assert!(document.contains("<name>a</name>"));
        assert!(document.contains("<count>1</count>"));
    }

    #[test]
    fn test_custom_root_and_indent() {
        let codec = XmlCodec::new(XmlOptions::default().with_root_name("entry").with_indent(2));
        let document = codec.to_document(&record()).unwrap();
        assert!(document.starts_with("<entry>"), "{document}");
        assert!(document.contains('\n'));

        let decoded: Record = codec.from_document(&document).unwrap();
        assert_eq!(decoded, record());
    }

    #[test]
    fn test_invalid_root_name_is_malformed() {
        let codec = XmlCodec::new(XmlOptions::default().with_root_name("not a name"));
        assert!(matches!(
            codec.to_document(&record()),
            Err(CodecError::Malformed(_))
        ));
    }

    #[test]
    fn test_stream_round_trip() {
        let codec = XmlCodec::default();
        let mut buf = Vec::new();
        codec.encode(&record(), &mut buf).unwrap();

        let decoded: Record = codec.decode(&mut Cursor::new(buf)).unwrap();
        assert_eq!(decoded, record());
    }

    #[test]
    fn test_rejects_text_that_would_be_trimmed() {
        let codec = XmlCodec::default();
        for name in [" a", "a\n", "  ", "\ta", "a\r\nb"] {
            let value = Record {
                name: name.to_string(),
                count: 1,
            };
            let mut buf = Vec::new();
            let result = codec.encode(&value, &mut buf);
            assert!(matches!(result, Err(CodecError::Malformed(_))), "{name:?}");
            assert!(buf.is_empty(), "{name:?}");
        }
    }

    #[test]
    fn test_preserves_inner_whitespace_and_markup() {
        let codec = XmlCodec::default();
        for name in ["a b", "x\ny", "<tag> & \"quoted\" 'single'", ""] {
            let value = Record {
                name: name.to_string(),
                count: 7,
            };
            let document = codec.to_document(&value).unwrap();
            let decoded: Record = codec.from_document(&document).unwrap();
            assert_eq!(decoded, value, "{document}");
        }
    }

    #[test]
    fn test_rejects_bad_documents() {
        let codec = XmlCodec::default();
        for input in [
            &b"<Record><name>a</name><count>1"[..],
            b"<Record><name>a</name><count>many</count></Record>",
            b"<Record><name>a</name></Record>",
            b"\xff\xfe<Record/>",
        ] {
            let result = codec.decode::<Record, _>(&mut Cursor::new(input));
            assert!(matches!(result, Err(CodecError::Malformed(_))), "{input:?}");
        }
    }
}
