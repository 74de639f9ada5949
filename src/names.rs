//! XML name validation and element-name derivation
//!
//! This module validates XML Names, NCNames and QNames according to the
//! XML 1.0 (fifth edition) production rules, and derives a safe element
//! name for an arbitrary JSON object key.

use crate::documents::XmlNode;
use crate::error::{Error, Result};
use crate::handles::{create_handle, sanitize};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Tag used for keys that cannot name an element directly
pub const FALLBACK_TAG: &str = "key";

/// Attribute holding the handle of the original key
pub const HANDLE_ATTRIBUTE: &str = "handle";

/// Attribute holding the sanitized original key
pub const VALUE_ATTRIBUTE: &str = "value";

static UNICODE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{L}[0-9\p{L}._\-]*$").unwrap());

static ASCII_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9._\-]*$").unwrap());

/// Check if a character may start an XML Name
pub fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

/// Check if a character may appear after the first character of an XML Name
pub fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// Check if a string is a valid XML Name
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    !name.contains(':') && is_valid_name(name)
}

/// Check if a string is a valid QName (qualified name)
pub fn is_valid_qname(name: &str) -> bool {
    if let Some((prefix, local)) = name.split_once(':') {
        is_valid_ncname(prefix) && is_valid_ncname(local)
    } else {
        is_valid_ncname(name)
    }
}

/// Validate an XML Name and return an error if invalid
pub fn validate_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::Xml(format!("Invalid XML Name: '{}'", name)))
    }
}

/// Validate a QName and return an error if invalid
pub fn validate_qname(name: &str) -> Result<()> {
    if is_valid_qname(name) {
        Ok(())
    } else {
        Err(Error::Xml(format!("Invalid QName: '{}'", name)))
    }
}

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}

/// Which letters a JSON key may start with to name an element directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameMode {
    /// Any Unicode letter, followed by Unicode letters, digits, `.`, `-`, `_`
    #[default]
    Unicode,
    /// ASCII letters only, followed by ASCII alphanumerics, `.`, `-`, `_`
    Ascii,
}

/// Check whether a JSON key is acceptable as an element name candidate
pub fn is_valid_key(key: &str, mode: NameMode) -> bool {
    match mode {
        NameMode::Unicode => UNICODE_KEY.is_match(key),
        NameMode::Ascii => ASCII_KEY.is_match(key),
    }
}

/// Element name derived from a JSON object key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementName {
    /// Tag of the produced element: the key's handle, or [`FALLBACK_TAG`]
    pub tag: String,
    /// Handle of the original key, whatever its validity
    pub handle: String,
    /// The key exactly as it appeared in the input
    pub original: String,
    /// True when the key could not name the element directly
    pub fallback: bool,
}

impl ElementName {
    /// Derive the element name for `key`
    ///
    /// Total: every input, including the empty string, yields a name whose
    /// tag is a valid XML Name.
    pub fn derive(key: &str, mode: NameMode) -> Self {
        let handle = create_handle(key);

        let fallback = !(is_valid_key(key, mode) && is_valid_ncname(&handle));

        let tag = if fallback {
            tracing::warn!(key, "key is not a usable element name, using fallback tag");
            FALLBACK_TAG.to_string()
        } else {
            handle.clone()
        };

        Self {
            tag,
            handle,
            original: key.to_string(),
            fallback,
        }
    }

    /// Sanitized copy of the original key, as stored in the `value` attribute
    pub fn sanitized_value(&self) -> String {
        sanitize(&self.original)
    }

    /// Build the empty element carrying the `handle` and `value` attributes
    pub fn into_node(self) -> XmlNode {
        let value = self.sanitized_value();
        XmlNode::new(self.tag)
            .with_attribute(HANDLE_ATTRIBUTE, self.handle)
            .with_attribute(VALUE_ATTRIBUTE, value)
    }
}

/// Derive the element name for a JSON object key
pub fn derive_element_name(key: &str, mode: NameMode) -> ElementName {
    ElementName::derive(key, mode)
}
