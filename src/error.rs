//! Error types for jsonxml
//!
//! The conversion core has a single failure mode, malformed input. The other
//! variants cover serialization, configuration loading and I/O around it.

use std::fmt;
use thiserror::Error;

/// Result type alias using the jsonxml Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for jsonxml operations
#[derive(Error, Debug)]
pub enum Error {
    /// The input holds no extractable JSON value, or the value does not parse
    #[error("malformed input: {0}")]
    MalformedInput(#[from] MalformedInputError),

    /// XML writing or reading error
    #[error("XML error: {0}")]
    Xml(String),

    /// Invalid converter configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the malformed-input details if this is a malformed-input error
    pub fn as_malformed_input(&self) -> Option<&MalformedInputError> {
        match self {
            Error::MalformedInput(err) => Some(err),
            _ => None,
        }
    }
}

/// Message used for every malformed-input failure
pub const MALFORMED_JSON_MESSAGE: &str = "JSON not formatted correctly";

/// Input text could not be turned into a JSON value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedInputError {
    /// Error message
    pub message: String,
    /// Parser diagnostic, absent when no JSON-looking payload was found
    pub diagnostic: Option<Diagnostic>,
}

impl MalformedInputError {
    /// Create a new malformed-input error without a parser diagnostic
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            diagnostic: None,
        }
    }

    /// Attach the parser diagnostic
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostic = Some(diagnostic);
        self
    }
}

impl From<serde_json::Error> for MalformedInputError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(MALFORMED_JSON_MESSAGE).with_diagnostic(Diagnostic::from(&err))
    }
}

impl fmt::Display for MalformedInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref diagnostic) = self.diagnostic {
            write!(f, "\n\nReason: {}", diagnostic)?;
        }

        Ok(())
    }
}

impl std::error::Error for MalformedInputError {}

/// Category of a JSON parser failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    /// Not syntactically valid JSON
    Syntax,
    /// Syntactically valid but semantically rejected (e.g. nesting too deep)
    Data,
    /// Input ended in the middle of a value
    Eof,
    /// Failure reading the input
    Io,
}

impl DiagnosticCategory {
    /// Stable short code for the category
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticCategory::Syntax => "syntax",
            DiagnosticCategory::Data => "data",
            DiagnosticCategory::Eof => "eof",
            DiagnosticCategory::Io => "io",
        }
    }
}

impl From<serde_json::error::Category> for DiagnosticCategory {
    fn from(category: serde_json::error::Category) -> Self {
        use serde_json::error::Category;
        match category {
            Category::Syntax => DiagnosticCategory::Syntax,
            Category::Data => DiagnosticCategory::Data,
            Category::Eof => DiagnosticCategory::Eof,
            Category::Io => DiagnosticCategory::Io,
        }
    }
}

/// What the JSON parser reported, positions relative to the extracted payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Failure category
    pub category: DiagnosticCategory,
    /// One-based line of the failure
    pub line: usize,
    /// One-based column of the failure
    pub column: usize,
    /// Parser message
    pub message: String,
}

impl From<&serde_json::Error> for Diagnostic {
    fn from(err: &serde_json::Error) -> Self {
        Self {
            category: err.classify().into(),
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category.code(), self.message)
    }
}
