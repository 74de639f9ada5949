//! Handles and output sanitizing
//!
//! A handle is a lower-case, URL- and identifier-safe slug derived from
//! arbitrary text. Handles name the elements produced for JSON object keys
//! and are also recorded on every such element as its `handle` attribute.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use std::collections::HashMap;

use crate::documents::is_xml_char;

/// Default maximum handle length in characters
pub const DEFAULT_MAX_LENGTH: usize = 255;

/// Default delimiter joining the words of a handle
pub const DEFAULT_DELIMITER: char = '-';

// Groups of characters sharing one ASCII replacement
const TRANSLITERATIONS: &[(&str, &str)] = &[
    ("ÀÁÂÃÅĀĂĄ", "A"),
    ("àáâãåāăą", "a"),
    ("Ä", "Ae"),
    ("ä", "ae"),
    ("Æ", "Ae"),
    ("æ", "ae"),
    ("ÇĆĈĊČ", "C"),
    ("çćĉċč", "c"),
    ("ĎĐ", "D"),
    ("ďđ", "d"),
    ("Ð", "Dh"),
    ("ð", "dh"),
    ("ÈÉÊËĒĔĖĘĚ", "E"),
    ("èéêëēĕėęě", "e"),
    ("ĜĞĠĢ", "G"),
    ("ĝğġģ", "g"),
    ("ĤĦ", "H"),
    ("ĥħ", "h"),
    ("ÌÍÎÏĨĪĬĮİ", "I"),
    ("ìíîïĩīĭįı", "i"),
    ("Ĳ", "IJ"),
    ("ĳ", "ij"),
    ("Ĵ", "J"),
    ("ĵ", "j"),
    ("Ķ", "K"),
    ("ķĸ", "k"),
    ("ĹĻĽĿŁ", "L"),
    ("ĺļľŀł", "l"),
    ("ÑŃŅŇŊ", "N"),
    ("ñńņňŉŋ", "n"),
    ("ÒÓÔÕØŌŎŐ", "O"),
    ("òóôõøōŏő", "o"),
    ("Ö", "Oe"),
    ("ö", "oe"),
    ("Œ", "OE"),
    ("œ", "oe"),
    ("ŔŖŘ", "R"),
    ("ŕŗř", "r"),
    ("ŚŜŞŠȘ", "S"),
    ("śŝşšș", "s"),
    ("ß", "ss"),
    ("ſ", "s"),
    ("ŢŤŦȚ", "T"),
    ("ţťŧț", "t"),
    ("Þ", "Th"),
    ("þ", "th"),
    ("ÙÚÛŨŪŬŮŰŲ", "U"),
    ("ùúûũūŭůűų", "u"),
    ("Ü", "Ue"),
    ("ü", "ue"),
    ("Ŵ", "W"),
    ("ŵ", "w"),
    ("ÝŶŸ", "Y"),
    ("ýÿŷ", "y"),
    ("ŹŻŽ", "Z"),
    ("źżž", "z"),
    ("ƒ", "f"),
];

static TRANSLITERATION_TABLE: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    TRANSLITERATIONS
        .iter()
        .flat_map(|(chars, replacement)| chars.chars().map(move |c| (c, *replacement)))
        .collect()
});

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^\s<>][^>]*(?:>|$)").unwrap());

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[.'"]+"#).unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// Runs of characters allowed in a handle
static LEGAL_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^<>?@:!-/\[-`;‘’…]+").unwrap());

/// Options controlling handle creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleOptions {
    /// Maximum length in characters before delimiting, 0 for unlimited
    pub max_length: usize,
    /// Character joining the words of the handle
    pub delimiter: char,
}

impl Default for HandleOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl HandleOptions {
    /// Set the maximum length
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set the delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Create a handle with the default options
pub fn create_handle(text: &str) -> String {
    create_handle_with(text, HandleOptions::default())
}

/// Create a handle from arbitrary text
///
/// Never fails. The result may be empty when `text` holds nothing but
/// punctuation or markup.
pub fn create_handle_with(text: &str, options: HandleOptions) -> String {
    let text = strip_control_chars(&transliterate(text));
    let text = TAG.replace_all(&text, "");
    let text = PUNCTUATION.replace_all(&text, "");
    let text = limit_words(&text, options.max_length);

    let mut delim_buf = [0u8; 4];
    let delim: &str = options.delimiter.encode_utf8(&mut delim_buf);

    let text = WHITESPACE.replace_all(&text, NoExpand(delim));
    let joined = LEGAL_RUN
        .find_iter(&text)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(delim);

    joined
        .trim_matches(options.delimiter)
        .to_lowercase()
}

/// Replace accented Latin letters and ligatures with ASCII spellings
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match TRANSLITERATION_TABLE.get(&c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    out
}

/// Drop control characters and anything else XML cannot carry
///
/// Whitespace controls (tab, line breaks) are kept so they still delimit
/// words.
fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|&c| is_xml_char(c) && (c.is_whitespace() || !c.is_control()))
        .collect()
}

/// Cut `text` to at most `max_length` characters, preferring a word boundary
fn limit_words(text: &str, max_length: usize) -> String {
    let text = text.trim();
    if max_length == 0 || text.chars().count() <= max_length {
        return text.to_string();
    }

    let cut = text
        .char_indices()
        .nth(max_length)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let (head, tail) = text.split_at(cut);

    let at_boundary = tail.chars().next().map_or(true, char::is_whitespace);
    if !at_boundary {
        if let Some(pos) = head.rfind(char::is_whitespace) {
            return head[..pos].trim_end().to_string();
        }
    }
    head.trim_end().to_string()
}

/// Escape text for safe inclusion in XML or HTML output
///
/// `&`, `<`, `>`, `"` and `'` become entity references. Nothing is dropped
/// or truncated.
pub fn sanitize(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}
