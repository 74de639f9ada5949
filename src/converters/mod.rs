//! JSON to XML Converters
//!
//! This module turns JSON text, optionally wrapped in a JSONP callback, into
//! a well-formed XML document or fragment rooted at `<data>`.
//!
//! ```
//! let xml = jsonxml::converters::convert_to_xml(r#"cb({"x": 1});"#, false).unwrap();
//! assert!(xml.starts_with("<data>"));
//! ```

mod base;
mod json;
mod jsonp;

pub use base::{ConverterConfig, DEFAULT_ITEM_TAG, DEFAULT_ROOT_TAG};
pub use json::JsonToXml;
pub use jsonp::{extract_payload, parse_payload, MAX_NESTING_DEPTH};

use crate::error::Result;

/// Convert JSON text to XML with the default configuration
///
/// See [`JsonToXml::convert`].
pub fn convert_to_xml(input: &str, standalone: bool) -> Result<String> {
    JsonToXml::new().convert(input, standalone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_to_xml_standalone_flag() {
        let document = convert_to_xml(r#"{"x":1}"#, true).unwrap();
        assert!(document.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));

        let fragment = convert_to_xml(r#"{"x":1}"#, false).unwrap();
        assert!(fragment.starts_with("<data>"));
    }

    #[test]
    fn test_convert_to_xml_matches_configured_default() {
        let input = r#"{"a": [true, null]}"#;
        assert_eq!(
            convert_to_xml(input, true).unwrap(),
            JsonToXml::with_config(ConverterConfig::default())
                .unwrap()
                .convert(input, true)
                .unwrap()
        );
    }
}
