/// Largest binary payload accepted by default (64MB)
pub const DEFAULT_MAX_PAYLOAD_LEN: u32 = 64 * 1024 * 1024;

/// Configuration options for the binary codec
#[derive(Debug, Clone)]
pub struct BinaryOptions {
    /// Whether to gzip the bincode payload
    pub compress: bool,
    /// Compression level (0-9, where 9 is highest compression)
    pub compression_level: u32,
    /// Payloads declaring a larger length are rejected when decoding
    pub max_payload_len: u32,
}

impl BinaryOptions {
    /// Create new binary options
    pub fn new(compress: bool, compression_level: u32) -> Self {
        Self {
            compress,
            compression_level: compression_level.min(9),
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
        }
    }

    /// Set the decode size limit
    pub fn with_max_payload_len(mut self, max_payload_len: u32) -> Self {
        self.max_payload_len = max_payload_len;
        self
    }

    /// Create options for fastest serialization
    pub fn fastest() -> Self {
        Self::new(false, 0)
    }

    /// Create options for smallest size
    pub fn smallest() -> Self {
        Self::new(true, 9)
    }

    /// Create options for balanced performance/size
    pub fn balanced() -> Self {
        Self::new(true, 6)
    }
}

impl Default for BinaryOptions {
    fn default() -> Self {
        Self::fastest()
    }
}

/// Configuration options for the XML codec
#[derive(Debug, Clone, Default)]
pub struct XmlOptions {
    /// Root element name; derived from the type name when unset
    pub root_name: Option<String>,
    /// Spaces per indentation level; compact output when unset
    pub indent: Option<usize>,
}

impl XmlOptions {
    /// Set the root element name
    pub fn with_root_name(mut self, root_name: impl Into<String>) -> Self {
        self.root_name = Some(root_name.into());
        self
    }

    /// Pretty-print with the given indentation
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level_is_clamped() {
        assert_eq!(BinaryOptions::new(true, 42).compression_level, 9);
        assert_eq!(BinaryOptions::smallest().compression_level, 9);
        assert!(!BinaryOptions::default().compress);
    }

    #[test]
    fn test_xml_builders() {
        let options = XmlOptions::default().with_root_name("record").with_indent(2);
        assert_eq!(options.root_name.as_deref(), Some("record"));
        assert_eq!(options.indent, Some(2));
    }
}
