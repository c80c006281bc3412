//! Document representation at the gateway boundary.
//!
//! Clients speak JSON; backends store BSON. This module converts between the two and
//! owns the list of fields that belong to the storage layer rather than the client.

use bson::{Bson, Document, de::deserialize_from_bson, ser::serialize_to_bson};
use serde_json::Value;

use crate::error::DocumentStoreResult;

/// Field holding the server-assigned per-collection sequence number.
pub const UID_FIELD: &str = "uid";

/// Field a backend uses for its own opaque identity.
pub const STORAGE_ID_FIELD: &str = "_id";

/// Field an object-mapping layer may use to record a value's original type.
pub const TYPE_HINT_FIELD: &str = "_class";

/// Fields that never appear in a response.
pub const INTERNAL_FIELDS: [&str; 2] = [STORAGE_ID_FIELD, TYPE_HINT_FIELD];

/// Converts a client JSON value into its stored BSON form.
///
/// # Errors
///
/// Returns a serialization error for values BSON cannot represent, such as integers
/// above `i64::MAX`.
pub fn json_to_bson(value: &Value) -> DocumentStoreResult<Bson> {
    Ok(serialize_to_bson(value)?)
}

/// Converts a stored value back to JSON, removing storage-internal fields from it first.
///
/// Only the top level is cleaned. Nested objects are client data and are returned as
/// stored.
pub fn into_client_json(value: Bson) -> DocumentStoreResult<Value> {
    let value = match value {
        Bson::Document(document) => Bson::Document(strip_internal_fields(document)),
        other => other,
    };

    Ok(deserialize_from_bson(value)?)
}

/// Removes every [`INTERNAL_FIELDS`] entry from a document.
pub fn strip_internal_fields(mut document: Document) -> Document {
    for field in INTERNAL_FIELDS {
        document.remove(field);
    }
    document
}

/// Reads the uid of a stored document, if it carries one.
pub fn stored_uid(value: &Bson) -> Option<i64> {
    match value.as_document()?.get(UID_FIELD)? {
        Bson::Int64(uid) => Some(*uid),
        Bson::Int32(uid) => Some(i64::from(*uid)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn client_json_drops_identity_and_type_hint() {
        let stored = Bson::Document(doc! {
            "_id": ObjectId::new(),
            "_class": "com.example.Widget",
            "name": "a",
            "uid": 1_i64,
        });

        let value = into_client_json(stored).unwrap();

        assert_eq!(value, json!({ "name": "a", "uid": 1 }));
    }

    #[test]
    fn nested_objects_keep_their_fields() {
        let stored = Bson::Document(doc! {
            "_id": ObjectId::new(),
            "inner": { "_class": "kept", "x": 1_i64 },
        });

        let value = into_client_json(stored).unwrap();

        assert_eq!(value, json!({ "inner": { "_class": "kept", "x": 1 } }));
    }

    #[test]
    fn non_document_values_pass_through() {
        let list = json!([1, "two", { "three": 3 }]);

        let stored = json_to_bson(&list).unwrap();
        assert!(matches!(stored, Bson::Array(_)));
        assert_eq!(into_client_json(stored).unwrap(), list);

        let scalar = json_to_bson(&json!(42)).unwrap();
        assert_eq!(into_client_json(scalar).unwrap(), json!(42));
    }

    #[test]
    fn unrepresentable_integers_fail_conversion() {
        assert!(json_to_bson(&json!(u64::MAX)).is_err());
    }

    #[test]
    fn stored_uid_reads_integer_fields_only() {
        assert_eq!(stored_uid(&Bson::Document(doc! { "uid": 3_i64 })), Some(3));
        assert_eq!(stored_uid(&Bson::Document(doc! { "uid": 3_i32 })), Some(3));
        assert_eq!(stored_uid(&Bson::Document(doc! { "uid": "3" })), None);
        assert_eq!(stored_uid(&Bson::Int64(3)), None);
    }
}
