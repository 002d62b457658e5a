//! # Mutation Results
//!
//! Result objects returned by store mutations. Field names follow the
//! document-driver convention the HTTP surface echoes to callers verbatim.

use serde::{Deserialize, Serialize};

/// Result of inserting a single document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    /// Generated document id
    pub inserted_id: String,
}

/// Result of an update or upsert
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    /// Documents matching the filter
    pub matched_count: u64,
    /// Documents actually rewritten
    pub modified_count: u64,
    pub upserted_count: u64,
    /// Id of the document created by an upsert, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upserted_id: Option<String>,
}

impl UpdateResult {
    /// An update that matched and rewrote one existing document
    pub fn modified() -> Self {
        Self {
            acknowledged: true,
            matched_count: 1,
            modified_count: 1,
            upserted_count: 0,
            upserted_id: None,
        }
    }

    /// An update that matched but left the document byte-identical
    pub fn unchanged() -> Self {
        Self {
            acknowledged: true,
            matched_count: 1,
            modified_count: 0,
            upserted_count: 0,
            upserted_id: None,
        }
    }

    /// An update whose filter matched nothing
    pub fn unmatched() -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 0,
            upserted_id: None,
        }
    }

    /// An upsert that inserted a fresh document
    pub fn upserted(id: String) -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(id),
        }
    }
}

/// Result of deleting by id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_wire_shape() {
        let result = UpdateResult::upserted("abc".into());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["matchedCount"], 0);
        assert_eq!(json["upsertedCount"], 1);
        assert_eq!(json["upsertedId"], "abc");

        let delete = DeleteResult {
            acknowledged: true,
            deleted_count: 0,
        };
        let json = serde_json::to_value(&delete).unwrap();
        assert_eq!(json["deletedCount"], 0);
    }

    #[test]
    fn test_unmatched_update_omits_upserted_id() {
        let json = serde_json::to_value(UpdateResult::unmatched()).unwrap();
        assert!(json.get("upsertedId").is_none());
    }
}
