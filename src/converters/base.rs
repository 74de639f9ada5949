//! Converter configuration
//!
//! This module provides the read-only settings shared by conversions.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::documents::XmlWriterOptions;
use crate::error::{Error, Result};
use crate::names::{is_valid_ncname, NameMode};

/// Tag of the root element
pub const DEFAULT_ROOT_TAG: &str = "data";

/// Tag of the element wrapping each array member
pub const DEFAULT_ITEM_TAG: &str = "item";

/// Configuration for converters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Which keys may name elements directly
    name_mode: NameMode,
    /// Indentation for XML output, 0 for a single line
    indent: usize,
    /// Tag of the root element
    root_tag: String,
    /// Tag of array member elements
    item_tag: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            name_mode: NameMode::default(),
            indent: 2,
            root_tag: DEFAULT_ROOT_TAG.to_string(),
            item_tag: DEFAULT_ITEM_TAG.to_string(),
        }
    }
}

impl ConverterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON text
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check that the configured tags are usable element names
    pub fn validate(&self) -> Result<()> {
        for (field, tag) in [("root_tag", &self.root_tag), ("item_tag", &self.item_tag)] {
            if !is_valid_ncname(tag) {
                return Err(Error::Config(format!(
                    "{} '{}' is not a valid element name",
                    field, tag
                )));
            }
        }
        Ok(())
    }

    /// Get the name mode
    pub fn name_mode(&self) -> NameMode {
        self.name_mode
    }

    /// Get indentation level
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Get the root tag
    pub fn root_tag(&self) -> &str {
        &self.root_tag
    }

    /// Get the item tag
    pub fn item_tag(&self) -> &str {
        &self.item_tag
    }

    /// Writer options for a standalone document or a fragment
    pub fn writer_options(&self, standalone: bool) -> XmlWriterOptions {
        XmlWriterOptions::default()
            .with_indent(self.indent)
            .with_declaration(standalone)
    }

    /// Set the name mode
    pub fn with_name_mode(mut self, mode: NameMode) -> Self {
        self.name_mode = mode;
        self
    }

    /// Set indentation
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set the root tag
    pub fn with_root_tag(mut self, tag: impl Into<String>) -> Self {
        self.root_tag = tag.into();
        self
    }

    /// Set the item tag
    pub fn with_item_tag(mut self, tag: impl Into<String>) -> Self {
        self.item_tag = tag.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_converter_config_defaults() {
        let config = ConverterConfig::default();
        assert_eq!(config.name_mode(), NameMode::Unicode);
        assert_eq!(config.indent(), 2);
        assert_eq!(config.root_tag(), "data");
        assert_eq!(config.item_tag(), "item");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_converter_config_builder() {
        let config = ConverterConfig::new()
            .with_name_mode(NameMode::Ascii)
            .with_indent(4)
            .with_root_tag("root")
            .with_item_tag("entry");

        assert_eq!(config.name_mode(), NameMode::Ascii);
        assert_eq!(config.indent(), 4);
        assert_eq!(config.root_tag(), "root");
        assert_eq!(config.item_tag(), "entry");
    }

    #[test]
    fn test_writer_options() {
        let options = ConverterConfig::new().with_indent(0).writer_options(false);
        assert_eq!(options.indent_size, 0);
        assert!(!options.declaration);
    }

    #[test]
    fn test_from_json_str_partial() {
        let config = ConverterConfig::from_json_str(r#"{"name_mode": "ascii"}"#).unwrap();
        assert_eq!(config.name_mode(), NameMode::Ascii);
        assert_eq!(config.root_tag(), "data");
    }

    #[test]
    fn test_from_json_str_rejects_bad_config() {
        assert!(matches!(
            ConverterConfig::from_json_str(r#"{"colour": "blue"}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ConverterConfig::from_json_str(r#"{"item_tag": "1st"}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"indent": 0, "root_tag": "feed"}}"#).unwrap();

        let config = ConverterConfig::from_file(file.path()).unwrap();
        assert_eq!(config.indent(), 0);
        assert_eq!(config.root_tag(), "feed");

        assert!(matches!(
            ConverterConfig::from_file("/nonexistent/jsonxml.json"),
            Err(Error::Io(_))
        ));
    }
}
