//! JSON to XML converter
//!
//! Mirrors a JSON value as an element tree under a `<data>` root:
//! - Array members each become an `<item>` element
//! - Object members become elements named after the key's handle, or
//!   `<key>` when the key cannot be an element name; both carry `handle`
//!   and `value` attributes describing the original key
//! - Scalars become text content, `null` being empty text

use serde_json::{Number, Value as JsonValue};

use super::base::ConverterConfig;
use super::jsonp::parse_payload;
use crate::documents::XmlNode;
use crate::error::Result;
use crate::names::ElementName;

/// Converter from JSON (or JSONP) text to XML text
///
/// Holds only read-only configuration, so one instance can serve any number
/// of concurrent conversions.
#[derive(Debug, Clone, Default)]
pub struct JsonToXml {
    config: ConverterConfig,
}

impl JsonToXml {
    /// Create a converter with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    ///
    /// Fails with [`Error::Config`](crate::Error::Config) when the root or
    /// item tag is not a usable element name.
    pub fn with_config(config: ConverterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert JSON text to XML text
    ///
    /// With `standalone` the result is a full document with an XML
    /// declaration, otherwise just the root element. Nothing is returned
    /// on failure.
    pub fn convert(&self, input: &str, standalone: bool) -> Result<String> {
        let value = parse_payload(input)?;
        let root = self.to_node(&value);

        tracing::debug!(
            elements = root.count_elements(),
            depth = root.depth(),
            standalone,
            "built XML tree"
        );

        root.to_xml(&self.config.writer_options(standalone))
    }

    /// Build the element tree for an already parsed JSON value
    pub fn to_node(&self, value: &JsonValue) -> XmlNode {
        self.process(value, XmlNode::new(self.config.root_tag()))
    }

    /// Append the XML form of `value` to `element` and return it
    fn process(&self, value: &JsonValue, mut element: XmlNode) -> XmlNode {
        match value {
            JsonValue::Array(items) => {
                for item in items {
                    let child = self.process(item, XmlNode::new(self.config.item_tag()));
                    element.add_child(child);
                }
            }
            JsonValue::Object(members) => {
                for (key, member) in members {
                    let name = ElementName::derive(key, self.config.name_mode());
                    let child = self.process(member, name.into_node());
                    element.add_child(child);
                }
            }
            JsonValue::String(s) => element.set_text(s.as_str()),
            JsonValue::Number(n) => element.set_text(number_text(n)),
            JsonValue::Bool(b) => element.set_text(b.to_string()),
            JsonValue::Null => element.set_text(""),
        }
        element
    }
}

/// Shortest text for a number: integers as written, floats without a
/// trailing `.0` (`1.0` is `1`, `2.5e3` is `2500`, `1e20` stays `1e20`)
fn number_text(n: &Number) -> String {
    let text = n.to_string();
    if n.is_f64() {
        if let Some(whole) = text.strip_suffix(".0") {
            return whole.to_string();
        }
    }
    text
}
