use crate::serialization::{BinaryOptions, Format, XmlOptions};

/// Main configuration for a serialization facade
#[derive(Debug, Clone)]
pub struct SerializerOptions {
    /// Format callers should use when they have no preference
    pub default_format: Format,
    /// Binary codec configuration
    pub binary: BinaryOptions,
    /// XML codec configuration
    pub xml: XmlOptions,
}

impl SerializerOptions {
    /// Create a new configuration with the given default format
    pub fn new(default_format: Format) -> Self {
        Self {
            default_format,
            binary: BinaryOptions::default(),
            xml: XmlOptions::default(),
        }
    }

    /// Create configuration optimized for speed
    pub fn fastest() -> Self {
        Self::new(Format::Binary).with_binary(BinaryOptions::fastest())
    }

    /// Create configuration optimized for size
    pub fn smallest() -> Self {
        Self::new(Format::Binary).with_binary(BinaryOptions::smallest())
    }

    /// Create configuration balancing readability and size
    pub fn balanced() -> Self {
        Self::new(Format::Xml)
            .with_binary(BinaryOptions::balanced())
            .with_xml(XmlOptions::default().with_indent(2))
    }

    /// Set the default format
    pub fn with_default_format(mut self, format: Format) -> Self {
        self.default_format = format;
        self
    }

    /// Set binary codec configuration
    pub fn with_binary(mut self, binary: BinaryOptions) -> Self {
        self.binary = binary;
        self
    }

    /// Set XML codec configuration
    pub fn with_xml(mut self, xml: XmlOptions) -> Self {
        self.xml = xml;
        self
    }
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self::new(Format::Xml)
    }
}
