//! XML node trees
//!
//! This module provides the element tree built by the converters, its
//! indented serializer, and a reader that parses XML text back into a tree.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;

/// Whether `c` matches the XML 1.0 `Char` production
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Replace every character XML cannot carry with U+FFFD
pub fn replace_non_xml_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
            .collect(),
    )
}

/// Escape character data. `\r` becomes a character reference so readers do
/// not fold it into a line feed.
fn escape_text(text: &str) -> String {
    let text = replace_non_xml_chars(text);
    quick_xml::escape::escape(&text).replace('\r', "&#13;")
}

/// Escape an attribute value. Tabs and line breaks become character
/// references, which attribute-value normalization leaves alone.
fn escape_attribute(value: &str) -> String {
    let value = replace_non_xml_chars(value);
    let escaped = quick_xml::escape::escape(&value);
    let mut out = String::with_capacity(escaped.len());
    for c in escaped.chars() {
        match c {
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
    out
}

/// XML element in a node tree
///
/// A node holds either text or child elements, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Element tag name
    pub tag: String,
    /// Element attributes, in insertion order
    pub attributes: IndexMap<String, String>,
    /// Text content (if any)
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Create a new empty element
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Add a child element
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.add_child(child);
        self
    }

    /// Get an attribute value by name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Add a child element, discarding any text content
    pub fn add_child(&mut self, child: XmlNode) {
        self.text = None;
        self.children.push(child);
    }

    /// Set text content, discarding any child elements
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.text = Some(text.into());
    }

    /// Find child elements by tag
    pub fn find_children(&self, tag: &str) -> Vec<&XmlNode> {
        self.children.iter().filter(|e| e.tag == tag).collect()
    }

    /// Number of elements in this subtree, this one included
    pub fn count_elements(&self) -> usize {
        1 + self.children.iter().map(XmlNode::count_elements).sum::<usize>()
    }

    /// Depth of this subtree, 1 for a leaf
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(XmlNode::depth).max().unwrap_or(0)
    }

    /// Serialize this node as XML text
    pub fn to_xml(&self, options: &XmlWriterOptions) -> Result<String> {
        let mut buf = Vec::with_capacity(256);
        let mut writer = if options.indent_size > 0 {
            Writer::new_with_indent(&mut buf, options.indent_char, options.indent_size)
        } else {
            Writer::new(&mut buf)
        };

        if options.declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
                .map_err(|e| Error::Xml(format!("Failed to write declaration: {}", e)))?;
        }

        write_node(&mut writer, self)?;

        if options.declaration {
            buf.push(b'\n');
        }

        String::from_utf8(buf).map_err(|e| Error::Xml(format!("Output is not UTF-8: {}", e)))
    }
}

fn write_node<W: std::io::Write>(writer: &mut Writer<W>, node: &XmlNode) -> Result<()> {
    let mut start = BytesStart::new(node.tag.as_str());
    for (name, value) in &node.attributes {
        let value = escape_attribute(value);
        start.push_attribute((name.as_bytes(), value.as_bytes()));
    }

    let write_err = |e: quick_xml::Error| Error::Xml(format!("Failed to write <{}>: {}", node.tag, e));

    match (&node.text, node.children.is_empty()) {
        (Some(text), _) => {
            writer.write_event(Event::Start(start)).map_err(write_err)?;
            writer
                .write_event(Event::Text(BytesText::from_escaped(escape_text(text))))
                .map_err(write_err)?;
            writer
                .write_event(Event::End(BytesEnd::new(node.tag.as_str())))
                .map_err(write_err)?;
        }
        (None, true) => {
            writer.write_event(Event::Empty(start)).map_err(write_err)?;
        }
        (None, false) => {
            writer.write_event(Event::Start(start)).map_err(write_err)?;
            for child in &node.children {
                write_node(writer, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(node.tag.as_str())))
                .map_err(write_err)?;
        }
    }

    Ok(())
}

/// Options for serializing a node tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlWriterOptions {
    /// Indentation character
    pub indent_char: u8,
    /// Indentation per level, 0 disables pretty-printing
    pub indent_size: usize,
    /// Whether to emit an XML declaration (a standalone document)
    pub declaration: bool,
}

impl Default for XmlWriterOptions {
    fn default() -> Self {
        Self {
            indent_char: b' ',
            indent_size: 2,
            declaration: true,
        }
    }
}

impl XmlWriterOptions {
    /// Set the indentation per level
    pub fn with_indent(mut self, indent_size: usize) -> Self {
        self.indent_size = indent_size;
        self
    }

    /// Set whether to emit an XML declaration
    pub fn with_declaration(mut self, declaration: bool) -> Self {
        self.declaration = declaration;
        self
    }
}

/// XML document read back from text
#[derive(Debug, Default)]
pub struct Document {
    /// Root element of the document
    pub root: Option<XmlNode>,
    /// Whether the text started with an XML declaration
    pub has_declaration: bool,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Parse an XML document from bytes
    ///
    /// Text is kept exactly as written, whitespace included, except in
    /// elements that have child elements. There it is indentation and is
    /// dropped.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);

        let mut doc = Document::new();
        let mut element_stack: Vec<XmlNode> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Decl(_)) => {
                    doc.has_declaration = true;
                }
                Ok(Event::Start(e)) => {
                    let element = Self::parse_element(&e)?;
                    element_stack.push(element);
                }
                Ok(Event::End(_)) => {
                    if let Some(current) = element_stack.pop() {
                        if let Some(parent) = element_stack.last_mut() {
                            parent.add_child(current);
                        } else {
                            doc.root = Some(current);
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    let element = Self::parse_element(&e)?;
                    if let Some(parent) = element_stack.last_mut() {
                        parent.add_child(element);
                    } else {
                        doc.root = Some(element);
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        if current.children.is_empty() {
                            let text = e.unescape().map_err(|e| {
                                Error::Xml(format!("Failed to unescape text: {}", e))
                            })?;
                            current
                                .text
                                .get_or_insert_with(String::new)
                                .push_str(&text);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "Error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {}
            }
            buf.clear();
        }

        if !element_stack.is_empty() {
            return Err(Error::Xml("Unclosed element at end of input".to_string()));
        }

        Ok(doc)
    }

    fn parse_element(start: &BytesStart) -> Result<XmlNode> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| Error::Xml(format!("Invalid element name: {}", e)))?
            .to_string();

        let mut element = XmlNode::new(name);

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::Xml(format!("Failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("Invalid attribute name: {}", e)))?
                .to_string();

            let attr_value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("Failed to unescape attribute value: {}", e)))?
                .into_owned();

            element.attributes.insert(attr_name, attr_value);
        }

        Ok(element)
    }

    /// Get the root element
    pub fn root(&self) -> Option<&XmlNode> {
        self.root.as_ref()
    }
}
