//! Email records and stored item types
//!
//! An [`EmailRecord`] is an arbitrary JSON object. Its `text_content` field is
//! embedded; every other field becomes string metadata on the stored item.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Field holding the plain-text body used for embedding
pub const TEXT_FIELD: &str = "text_content";

/// Stringified metadata attached to each stored item
pub type Metadata = BTreeMap<String, String>;

/// One email as handed to the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailRecord(Map<String, Value>);

impl EmailRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body text
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_field(TEXT_FIELD, text.into())
    }

    /// Set any field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Body text, if present and non-empty
    ///
    /// Non-string values in the text field count as absent.
    pub fn text(&self) -> Option<&str> {
        match self.0.get(TEXT_FIELD) {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// All fields except the body, coerced to text
    ///
    /// Lossy: strings are kept verbatim, everything else becomes its compact
    /// JSON rendering (`1`, `true`, `null`, `["a","b"]`).
    pub fn metadata(&self) -> Metadata {
        self.0
            .iter()
            .filter(|(key, _)| key.as_str() != TEXT_FIELD)
            .map(|(key, value)| (key.clone(), stringify(value)))
            .collect()
    }
}

impl From<Map<String, Value>> for EmailRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Fresh random item identifier
pub fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}

/// An item as persisted inside a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredItem {
    pub id: String,
    pub embedding: Vec<f32>,
    pub document: String,
    pub metadata: Metadata,
}

/// One nearest-neighbour result returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Original email text
    pub document: String,
    /// Stringified metadata
    pub metadata: Metadata,
    /// Cosine distance to the query (lower is closer)
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_present() {
        let record = EmailRecord::new().with_text("hello world");
        assert_eq!(record.text(), Some("hello world"));
    }

    #[test]
    fn test_text_missing_or_empty() {
        assert_eq!(EmailRecord::new().text(), None);
        assert_eq!(EmailRecord::new().with_text("").text(), None);
        assert_eq!(
            EmailRecord::new().with_field(TEXT_FIELD, 42).text(),
            None
        );
    }

    #[test]
    fn test_metadata_excludes_text_and_stringifies() {
        let record: EmailRecord = serde_json::from_value(json!({
            "text_content": "body",
            "subject": "Quarterly report",
            "size": 1024,
            "read": false,
            "cc": null,
            "labels": ["work", "finance"],
        }))
        .unwrap();

        let metadata = record.metadata();
        assert!(!metadata.contains_key(TEXT_FIELD));
        assert_eq!(metadata["subject"], "Quarterly report");
        assert_eq!(metadata["size"], "1024");
        assert_eq!(metadata["read"], "false");
        assert_eq!(metadata["cc"], "null");
        assert_eq!(metadata["labels"], r#"["work","finance"]"#);
    }

    #[test]
    fn test_item_ids_unique() {
        let a = new_item_id();
        let b = new_item_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }
}
