//! # jsonxml
//!
//! Converts JSON text into well-formed XML for XSLT-driven rendering
//! pipelines.
//!
//! ## Features
//!
//! - JSONP callback wrappers and surrounding noise are stripped
//! - Arrays map to `<item>` elements, objects to named elements
//! - Arbitrary object keys map to safe element names; keys that cannot be
//!   names fall back to `<key>` and are kept as attributes
//! - Standalone documents or bare fragments, pretty-printed
//!
//! ## Example
//!
//! ```rust
//! use jsonxml::converters::{ConverterConfig, JsonToXml};
//! use jsonxml::names::NameMode;
//!
//! let converter = JsonToXml::with_config(
//!     ConverterConfig::new().with_name_mode(NameMode::Ascii),
//! )?;
//! let xml = converter.convert(r#"callback({"title": "Hello"});"#, false)?;
//! assert_eq!(xml, "<data>\n  <title handle=\"title\" value=\"title\">Hello</title>\n</data>");
//! # Ok::<(), jsonxml::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod handles;

// Names and trees
pub mod names;
pub mod documents;

// Data conversion
pub mod converters;

// Re-exports for convenience
pub use converters::{convert_to_xml, ConverterConfig, JsonToXml};
pub use error::{Error, MalformedInputError, Result};
pub use names::{derive_element_name, ElementName, NameMode};

/// Version of the jsonxml library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
