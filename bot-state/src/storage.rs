//! Key-value document storage used by [`crate::BotState`].
//!
//! Documents are JSON objects. Every write stamps a fresh `eTag`; a write that carries an
//! `eTag` other than `*` must match the stored one.

use crate::error::StorageError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Field holding the optimistic-concurrency tag inside each document.
pub const ETAG_KEY: &str = "eTag";

/// Backend for state documents.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns the documents found for `keys`; missing keys are simply absent from the map.
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, Value>, StorageError>;
    /// Upserts every document in `changes`. Returns the eTag stamped on each written key.
    async fn write(
        &self,
        changes: HashMap<String, Value>,
    ) -> Result<HashMap<String, String>, StorageError>;
    /// Removes the documents for `keys`; unknown keys are ignored.
    async fn delete(&self, keys: &[String]) -> Result<(), StorageError>;
}

/// Fails with [`StorageError::ETagConflict`] when `incoming` carries a concrete eTag that
/// differs from `stored_etag`. A missing stored document never conflicts.
pub(crate) fn check_etag(
    key: &str,
    incoming: &Value,
    stored_etag: Option<&str>,
) -> Result<(), StorageError> {
    let incoming_etag = incoming.get(ETAG_KEY).and_then(Value::as_str);
    match (incoming_etag, stored_etag) {
        (Some(tag), Some(stored)) if tag != "*" && tag != stored => {
            Err(StorageError::ETagConflict {
                key: key.to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Returns a copy of `document` stamped with a new eTag, plus that eTag.
pub(crate) fn stamp_etag(key: &str, document: Value) -> Result<(Value, String), StorageError> {
    let Value::Object(mut map) = document else {
        return Err(StorageError::Serialization(format!(
            "document for key {} is not a JSON object",
            key
        )));
    };
    let etag = Uuid::new_v4().to_string();
    map.insert(ETAG_KEY.to_string(), Value::String(etag.clone()));
    Ok((Value::Object(map), etag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_etag_rules() {
        assert!(check_etag("k", &json!({}), Some("1")).is_ok());
        assert!(check_etag("k", &json!({ "eTag": "*" }), Some("1")).is_ok());
        assert!(check_etag("k", &json!({ "eTag": "1" }), Some("1")).is_ok());
        assert!(check_etag("k", &json!({ "eTag": "1" }), None).is_ok());
        assert!(matches!(
            check_etag("k", &json!({ "eTag": "0" }), Some("1")),
            Err(StorageError::ETagConflict { .. })
        ));
    }

    #[test]
    fn test_stamp_etag_rejects_non_objects() {
        assert!(stamp_etag("k", json!([1, 2])).is_err());

        let (doc, etag) = stamp_etag("k", json!({ "a": 1 })).unwrap();
        assert_eq!(doc[ETAG_KEY], Value::String(etag));
        assert_eq!(doc["a"], json!(1));
    }
}
