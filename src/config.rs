//! Generator configuration
//!
//! The configuration is a small XML document:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Config xmlns="urn:xsdgen:config" version="0.1.0">
//!   <Output pretty="true"/>
//!   <Extensions order="declared"/>
//! </Config>
//! ```
//!
//! Unknown elements are ignored so older binaries can read newer files.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Namespace of the configuration document
pub const CONFIG_NAMESPACE: &str = "urn:xsdgen:config";

/// Order in which the extensions of one class are processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionOrder {
    /// As declared in the schema
    #[default]
    Declared,
    /// Last declared first
    Reverse,
}

impl ExtensionOrder {
    /// Parse from attribute value
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "declared" => Ok(Self::Declared),
            "reverse" => Ok(Self::Reverse),
            _ => Err(Error::Config(format!(
                "Invalid extension order: '{}'. Must be 'declared' or 'reverse'",
                s
            ))),
        }
    }

    /// Attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Declared => "declared",
            Self::Reverse => "reverse",
        }
    }
}

impl fmt::Display for ExtensionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Pretty print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Extension resolution options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionsConfig {
    /// Processing order of a class's extensions
    pub order: ExtensionOrder,
}

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Version of the tool that wrote the file
    pub version: String,
    /// Output options
    pub output: OutputConfig,
    /// Extension resolution options
    pub extensions: ExtensionsConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::create()
    }
}

impl GeneratorConfig {
    /// Default configuration stamped with the current version
    pub fn create() -> Self {
        Self {
            version: crate::VERSION.to_string(),
            output: OutputConfig::default(),
            extensions: ExtensionsConfig::default(),
        }
    }

    /// Read a configuration file
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_xml(&text)
    }

    /// Parse a configuration document
    pub fn from_xml(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml)?;
        let root = doc.root_element();
        if root.tag_name().name() != "Config" {
            return Err(Error::Config(format!(
                "Unexpected root element '{}', expected 'Config'",
                root.tag_name().name()
            )));
        }

        let mut config = Self::create();
        if let Some(version) = root.attribute("version") {
            config.version = version.to_string();
        }

        for node in root.children().filter(|n| n.is_element()) {
            match node.tag_name().name() {
                "Output" => {
                    if let Some(value) = node.attribute("pretty") {
                        config.output.pretty = parse_bool("pretty", value)?;
                    }
                }
                "Extensions" => {
                    if let Some(value) = node.attribute("order") {
                        config.extensions.order = ExtensionOrder::parse(value)?;
                    }
                }
                _ => {}
            }
        }

        Ok(config)
    }

    /// Serialize to an XML document
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        let mut root = BytesStart::new("Config");
        root.push_attribute(("xmlns", CONFIG_NAMESPACE));
        root.push_attribute(("version", self.version.as_str()));

        let mut output = BytesStart::new("Output");
        output.push_attribute(("pretty", if self.output.pretty { "true" } else { "false" }));

        let mut extensions = BytesStart::new("Extensions");
        extensions.push_attribute(("order", self.extensions.order.as_str()));

        let events = [
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
            Event::Start(root),
            Event::Empty(output),
            Event::Empty(extensions),
            Event::End(BytesEnd::new("Config")),
        ];
        for event in events {
            writer
                .write_event(event)
                .map_err(|e| Error::Xml(format!("Failed to write config: {}", e)))?;
        }

        let mut text = String::from_utf8(writer.into_inner())
            .map_err(|e| Error::Xml(format!("Config is not valid UTF-8: {}", e)))?;
        text.push('\n');
        Ok(text)
    }

    /// Write the configuration file
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_xml()?)?;
        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::Config(format!(
            "Invalid boolean for '{}': '{}'",
            name, value
        ))),
    }
}
