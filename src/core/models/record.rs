use std::collections::BTreeMap;

use serde_json::Value;

/// A flat field → value record, as stored for one entity.
///
/// The entity identifier is the key under which the record is stored,
/// never a field inside it.
pub type Record = BTreeMap<String, Value>;

/// A captured copy of a record at one point in time.
pub type Snapshot = Record;

/// Name of the identity field that must never appear in a snapshot.
pub const IDENTITY_FIELD: &str = "id";

/// Render a value the way the differ compares it.
///
/// Strings are taken verbatim, `null` becomes the empty string, and
/// every other value uses its JSON rendering, so `5` and `"5"` compare
/// equal.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Return a copy of `record` without the identity field and without any
/// of the given derived fields.
pub fn strip_fields(record: &Record, derived: &[String]) -> Snapshot {
    record
        .iter()
        .filter(|(k, _)| k.as_str() != IDENTITY_FIELD && !derived.iter().any(|d| d == *k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stringify_coerces_scalars() {
        assert_eq!(stringify(&json!("Tent A")), "Tent A");
        assert_eq!(stringify(&json!(5)), "5");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&Value::Null), "");
    }

    #[test]
    fn strip_removes_identity_and_derived() {
        let mut record = Record::new();
        record.insert("id".into(), json!("E1"));
        record.insert("name".into(), json!("Tent A"));
        record.insert("photo_urls".into(), json!(["https://x/1.jpg"]));

        let stripped = strip_fields(&record, &["photo_urls".to_string()]);

        assert_eq!(stripped.len(), 1);
        assert_eq!(stripped.get("name"), Some(&json!("Tent A")));
    }
}
