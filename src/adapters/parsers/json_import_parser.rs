use std::path::Path;

use serde_json::Value;

use crate::core::errors::{GearlogError, Result};
use crate::core::models::import_row::ImportRow;
use crate::core::models::record::{IDENTITY_FIELD, Record, stringify};
use crate::core::traits::import_parser::ImportParser;

/// Reads imports from a JSON array of flat objects:
///
/// ```json
/// [
///   { "id": "e1", "name": "Tent A", "color": "green" },
///   { "id": "E2", "name": "Tent B", "color": "" }
/// ]
/// ```
///
/// Exported spreadsheets carry formatting noise, so every cell becomes a
/// trimmed string and blank cells are dropped rather than treated as
/// "clear this field".
pub struct JsonImportParser;

impl ImportParser for JsonImportParser {
    fn parse(&self, content: &str, source: &Path) -> Result<Vec<ImportRow>> {
        let fail = |detail: String| GearlogError::ImportError {
            file: source.to_path_buf(),
            detail,
        };

        let value: Value =
            serde_json::from_str(content).map_err(|e| fail(format!("invalid JSON: {e}")))?;
        let Value::Array(items) = value else {
            return Err(fail("top-level value is not an array".into()));
        };

        let mut rows = Vec::new();
        for (idx, item) in items.into_iter().enumerate() {
            let Value::Object(object) = item else {
                return Err(fail(format!("row {} is not an object", idx + 1)));
            };

            let id = object
                .get(IDENTITY_FIELD)
                .map(stringify)
                .unwrap_or_default()
                .trim()
                .to_uppercase();
            if id.is_empty() {
                tracing::debug!(row = idx + 1, "skipping import row without id");
                continue;
            }

            let fields: Record = object
                .iter()
                .filter(|(k, _)| k.as_str() != IDENTITY_FIELD)
                .filter_map(|(k, v)| {
                    let cell = stringify(v).trim().to_string();
                    (!cell.is_empty()).then(|| (k.clone(), Value::String(cell)))
                })
                .collect();

            rows.push(ImportRow { id, fields });
        }

        Ok(rows)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(content: &str) -> Result<Vec<ImportRow>> {
        JsonImportParser.parse(content, Path::new("gear.json"))
    }

    #[test]
    fn parses_rows_and_normalizes_ids() {
        let rows = parse(r#"[{"id": " e1 ", "name": "Tent A", "qty": 2}]"#).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "E1");
        assert_eq!(rows[0].fields.get("name"), Some(&json!("Tent A")));
        assert_eq!(rows[0].fields.get("qty"), Some(&json!("2")));
        assert!(!rows[0].fields.contains_key("id"));
    }

    #[test]
    fn blank_cells_are_dropped() {
        let rows = parse(r#"[{"id": "E1", "color": "  ", "notes": null, "name": " A "}]"#).unwrap();

        assert_eq!(rows[0].fields.len(), 1);
        assert_eq!(rows[0].fields.get("name"), Some(&json!("A")));
    }

    #[test]
    fn rows_without_id_are_skipped() {
        let rows = parse(r#"[{"name": "orphan"}, {"id": "", "name": "x"}, {"id": "E2"}]"#).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "E2");
    }

    #[test]
    fn non_array_is_rejected() {
        let err = parse(r#"{"id": "E1"}"#).unwrap_err();
        assert!(matches!(err, GearlogError::ImportError { .. }));
    }

    #[test]
    fn non_object_row_is_rejected() {
        let err = parse(r#"[{"id": "E1"}, 42]"#).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(parse("[{").is_err());
    }
}
