//! JSON payload extraction
//!
//! Input text may wrap its JSON in a JSONP callback (`callback({...});`) or
//! carry other leading and trailing noise. The payload is the span from the
//! first `{` or `[` through the last `}` or `]`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{
    Diagnostic, DiagnosticCategory, MalformedInputError, Result, MALFORMED_JSON_MESSAGE,
};

/// Deepest nesting of arrays and objects a payload may have
pub const MAX_NESTING_DEPTH: usize = 512;

static PAYLOAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)[\{\[].*[\}\]]").unwrap());

/// Locate the JSON payload inside `input`
pub fn extract_payload(input: &str) -> Result<&str> {
    let found = PAYLOAD
        .find(input)
        .ok_or_else(|| MalformedInputError::new(MALFORMED_JSON_MESSAGE))?;

    tracing::debug!(
        start = found.start(),
        end = found.end(),
        input_len = input.len(),
        "extracted JSON payload"
    );

    Ok(found.as_str())
}

/// Extract and parse the JSON payload of `input`
///
/// Any top-level value that parses is accepted, including falsy ones such
/// as `[]`, `{}` or `[false]`. Payloads nested deeper than
/// [`MAX_NESTING_DEPTH`] and numbers outside the `f64` range are malformed.
pub fn parse_payload(input: &str) -> Result<JsonValue> {
    let payload = extract_payload(input)?;
    check_nesting(payload)?;

    let mut de = serde_json::Deserializer::from_str(payload);
    de.disable_recursion_limit();
    let value = JsonValue::deserialize(serde_stacker::Deserializer::new(&mut de))
        .map_err(MalformedInputError::from)?;
    de.end().map_err(MalformedInputError::from)?;
    Ok(value)
}

/// Reject payloads whose brackets nest deeper than [`MAX_NESTING_DEPTH`]
///
/// Brackets inside strings do not count. The scan does not otherwise
/// validate the payload; that is left to the parser.
fn check_nesting(payload: &str) -> Result<()> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let (mut line, mut column) = (1, 0);

    for c in payload.chars() {
        if c == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }

        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '[' | '{' => {
                depth += 1;
                if depth > MAX_NESTING_DEPTH {
                    tracing::debug!(line, column, "payload nesting too deep");
                    return Err(MalformedInputError::new(MALFORMED_JSON_MESSAGE)
                        .with_diagnostic(Diagnostic {
                            category: DiagnosticCategory::Data,
                            line,
                            column,
                            message: format!(
                                "nesting exceeds {} levels at line {} column {}",
                                MAX_NESTING_DEPTH, line, column
                            ),
                        })
                        .into());
                }
            }
            ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}
