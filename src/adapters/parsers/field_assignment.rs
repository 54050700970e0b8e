use serde_json::Value;

use crate::core::errors::{GearlogError, Result};
use crate::core::models::record::Record;

/// Parses `field=value` assignments given on the command line.
///
/// Supports:
/// - `field=value` entries, split at the first `=`
/// - Quoted values (`field="two words"` and `field='two words'`)
/// - Empty values (`field=`), stored as the empty string
///
/// Values are always stored as strings; the differ compares values as
/// strings anyway.
pub struct FieldAssignmentParser;

impl FieldAssignmentParser {
    /// Parse a single assignment into a field name and value.
    pub fn parse_one(spec: &str) -> Result<(String, Value)> {
        let trimmed = spec.trim();

        let Some(eq_pos) = trimmed.find('=') else {
            return Err(GearlogError::InvalidFieldSpec {
                spec: spec.to_string(),
            });
        };

        let field = trimmed[..eq_pos].trim().to_string();
        if field.is_empty() {
            return Err(GearlogError::InvalidFieldSpec {
                spec: spec.to_string(),
            });
        }

        let value = strip_quotes(trimmed[eq_pos + 1..].trim());
        Ok((field, Value::String(value)))
    }

    /// Parse every assignment into one record. Later assignments to the
    /// same field win.
    pub fn parse_all(specs: &[String]) -> Result<Record> {
        specs.iter().map(|s| Self::parse_one(s)).collect()
    }
}

/// Remove matching surrounding quotes (single or double) from a value.
fn strip_quotes(s: &str) -> String {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return s[1..s.len() - 1].to_string();
        }
    }
    s.to_string()
}
