//! JSON encoding of a [`Collection`].
//!
//! On-disk format:
//! ```text
//! {
//!   "<Kind>.<id>": {"id": .., "created_at": .., "updated_at": .., <fields>.., "__class__": "<Kind>"},
//!   ...
//! }
//! ```
//! Entries are written in insertion order.

use hbnb_types::{Record, TypeError};
use serde::{Serialize, Serializer};

use crate::error::{ReloadFailure, StoreError, StoreResult};
use crate::traits::Collection;

struct Entries<'a>(&'a Collection);

impl Serialize for Entries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(key, record)| (key.to_string(), record)))
    }
}

/// Encode the whole collection as one JSON object.
pub fn encode(collection: &Collection) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(&Entries(collection)).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decode a JSON document into a collection.
///
/// Every entry is attempted. If any entry fails, the result is
/// [`StoreError::Reload`] listing all failures and no collection is returned.
pub fn decode(bytes: &[u8]) -> StoreResult<Collection> {
    let document: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))?;
    let serde_json::Value::Object(entries) = document else {
        return Err(StoreError::Serialization(
            "top-level value is not a JSON object".into(),
        ));
    };

    let mut collection = Collection::with_capacity(entries.len());
    let mut failures = Vec::new();
    for (key, value) in &entries {
        match decode_entry(key, value) {
            Ok(record) => {
                collection.insert(record.key(), record);
            }
            Err(err) => {
                tracing::error!(key = %key, reason = %err, "malformed store entry");
                failures.push(ReloadFailure {
                    key: key.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    if failures.is_empty() {
        Ok(collection)
    } else {
        Err(StoreError::Reload { failures })
    }
}

fn decode_entry(key: &str, value: &serde_json::Value) -> Result<Record, TypeError> {
    let flat = value
        .as_object()
        .ok_or_else(|| TypeError::MalformedRecord("entry is not a JSON object".into()))?;
    let record = Record::from_flat(flat)?;
    let expected = record.key().to_string();
    if expected != key {
        return Err(TypeError::MalformedRecord(format!(
            "key does not match record {expected}"
        )));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hbnb_types::{Kind, Value};
    use serde_json::json;

    fn collection_of(records: Vec<Record>) -> Collection {
        records.into_iter().map(|r| (r.key(), r)).collect()
    }

    #[test]
    fn encode_uses_composite_keys_and_class_tag() {
        let record = Record::new(Kind::User);
        let key = record.key().to_string();
        let bytes = encode(&collection_of(vec![record])).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json[&key]["__class__"], "User");
        assert_eq!(json[&key]["email"], "");
        assert!(json[&key]["created_at"].is_string());
    }

    #[test]
    fn encode_decode_preserves_records_and_order() {
        let mut place = Record::new(Kind::Place);
        place.set("longitude", Value::Float(-122.4)).unwrap();
        place.set("max_guest", Value::Int(4)).unwrap();
        let records = vec![Record::new(Kind::Review), place, Record::new(Kind::BaseModel)];
        let collection = collection_of(records);

        let decoded = decode(&encode(&collection).unwrap()).unwrap();
        assert_eq!(decoded, collection);
        assert!(decoded.keys().eq(collection.keys()));
    }

    #[test]
    fn decode_empty_object() {
        assert!(decode(b"{}").unwrap().is_empty());
    }

    #[test]
    fn decode_rejects_non_object_document() {
        assert!(matches!(decode(b"[]"), Err(StoreError::Serialization(_))));
        assert!(matches!(decode(b"{not json"), Err(StoreError::Serialization(_))));
    }

    #[test]
    fn decode_reports_every_bad_entry() {
        let good = Record::new(Kind::User);
        let good_key = good.key().to_string();
        let document = json!({
            good_key: serde_json::to_value(&good).unwrap(),
            "Ghost.1": {
                "__class__": "Ghost",
                "id": "1",
                "created_at": "2020-01-01T00:00:00.000000",
                "updated_at": "2020-01-01T00:00:00.000000",
            },
            "User.2": {"__class__": "User", "id": "2"},
            "User.3": 17,
        });

        let err = decode(document.to_string().as_bytes()).unwrap_err();
        let StoreError::Reload { failures } = err else {
            panic!("expected reload error");
        };
        let keys: Vec<_> = failures.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["Ghost.1", "User.2", "User.3"]);
    }

    #[test]
    fn decode_rejects_mismatched_key() {
        let record = Record::new(Kind::City);
        let document = json!({ "State.other": serde_json::to_value(&record).unwrap() });

        let err = decode(document.to_string().as_bytes()).unwrap_err();
        let StoreError::Reload { failures } = err else {
            panic!("expected reload error");
        };
        assert_eq!(failures.len(), 1);
        assert!(failures[0].reason.contains("key does not match"));
    }
}
