//! Values returned by facade operations, and the last-outcome mirror

use bson::{Bson, Document as BsonDocument};

/// Render an inserted `_id` the way callers usually want it: hex for
/// ObjectIds, the raw text for strings, BSON display otherwise.
pub fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Result of `insert`
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOutcome {
    pub inserted_count: u64,
    /// `_id`s in input order
    pub inserted_ids: Vec<Bson>,
}

impl InsertOutcome {
    /// Ids comma-joined, `None` when nothing was inserted
    pub fn joined_ids(&self) -> Option<String> {
        if self.inserted_count == 0 {
            return None;
        }
        Some(
            self.inserted_ids
                .iter()
                .map(id_to_string)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

/// Result of `fetch` and `aggregate`
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub documents: Vec<BsonDocument>,
    /// Size of the whole collection, not of `documents`
    pub total_count: u64,
}

/// Result of `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Result of `delete`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}

/// Outcome fields of the most recent operations.
///
/// Each field is overwritten by the next call that produces it and keeps its
/// value otherwise. `message` is cleared when any operation starts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LastOutcome {
    pub message: Option<String>,
    pub insert_id: Option<String>,
    pub insert_count: Option<u64>,
    pub matched_count: Option<u64>,
    pub modified_count: Option<u64>,
    pub total_count: Option<u64>,
    pub deleted_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    #[test]
    fn test_id_to_string_object_id() {
        let oid = ObjectId::new();
        assert_eq!(id_to_string(&Bson::ObjectId(oid)), oid.to_hex());
    }

    #[test]
    fn test_id_to_string_other_types() {
        assert_eq!(id_to_string(&Bson::String("sku-1".into())), "sku-1");
        assert_eq!(id_to_string(&Bson::Int32(7)), "7");
    }

    #[test]
    fn test_joined_ids_batch() {
        let outcome = InsertOutcome {
            inserted_count: 3,
            inserted_ids: vec![Bson::Int32(1), Bson::String("b".into()), Bson::Int64(3)],
        };
        assert_eq!(outcome.joined_ids().as_deref(), Some("1,b,3"));
    }

    #[test]
    fn test_joined_ids_empty() {
        let outcome = InsertOutcome {
            inserted_count: 0,
            inserted_ids: Vec::new(),
        };
        assert!(outcome.joined_ids().is_none());
    }
}
