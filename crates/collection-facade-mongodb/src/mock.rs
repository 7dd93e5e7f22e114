//! `MockDriver`: a test double for `CollectionDriver`.
//!
//! Records every call it receives and answers with programmer-specified
//! results, so facade behaviour can be checked without a running server.

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document as BsonDocument};
use collection_facade_common::{FacadeError, Result};
use mongodb::options::{FindOneOptions, FindOptions};
use std::sync::{Arc, Mutex};

use crate::driver::{CollectionDriver, UpdateCounts};
use crate::outcome::id_to_string;

/// A call received by the mock, with its arguments
#[derive(Debug, Clone)]
pub enum MockCall {
    InsertOne(BsonDocument),
    InsertMany(Vec<BsonDocument>),
    Find {
        filter: BsonDocument,
        options: Option<FindOptions>,
    },
    FindOne {
        filter: BsonDocument,
        options: Option<FindOneOptions>,
    },
    Aggregate(Vec<BsonDocument>),
    UpdateMany {
        filter: BsonDocument,
        update: BsonDocument,
    },
    DeleteMany(BsonDocument),
    Drop,
    CreateIndex(BsonDocument),
    CountAll,
}

/// Scripted collection.
///
/// Inserted documents get a fresh ObjectId unless they carry an `_id`.
pub struct MockDriver {
    /// Collection name reported to the facade.
    pub name: String,
    /// Documents returned by `find`, `find_one` (first) and `aggregate`.
    pub documents: Vec<BsonDocument>,
    /// Value returned by `count_all`.
    pub total_count: u64,
    /// Counts returned by `update_many`.
    pub update_counts: UpdateCounts,
    /// Count returned by `delete_many`.
    pub deleted_count: u64,
    /// When set, every operation fails with this driver message.
    pub failure: Option<String>,
    /// All calls seen by this driver (in call order).
    pub calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockDriver {
    /// An empty collection that accepts every operation
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Vec::new(),
            total_count: 0,
            update_counts: UpdateCounts {
                matched_count: 0,
                modified_count: 0,
            },
            deleted_count: 0,
            failure: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Serve `documents` from reads, reporting `total_count` as the collection size
    pub fn with_documents(mut self, documents: Vec<BsonDocument>, total_count: u64) -> Self {
        self.documents = documents;
        self.total_count = total_count;
        self
    }

    pub fn with_update_counts(mut self, matched_count: u64, modified_count: u64) -> Self {
        self.update_counts = UpdateCounts {
            matched_count,
            modified_count,
        };
        self
    }

    pub fn with_deleted_count(mut self, deleted_count: u64) -> Self {
        self.deleted_count = deleted_count;
        self
    }

    /// Fail every operation with `message`
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Snapshot of the calls received so far
    pub fn recorded(calls: &Arc<Mutex<Vec<MockCall>>>) -> Vec<MockCall> {
        calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, call: MockCall) -> Result<()> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        match &self.failure {
            Some(msg) => Err(FacadeError::Operation(msg.clone())),
            None => Ok(()),
        }
    }

    fn id_of(document: &BsonDocument) -> Bson {
        document
            .get("_id")
            .cloned()
            .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()))
    }
}

#[async_trait]
impl CollectionDriver for MockDriver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_one(&self, document: BsonDocument) -> Result<Bson> {
        let id = Self::id_of(&document);
        self.record(MockCall::InsertOne(document))?;
        Ok(id)
    }

    async fn insert_many(&self, documents: Vec<BsonDocument>) -> Result<Vec<Bson>> {
        let ids = documents.iter().map(Self::id_of).collect();
        self.record(MockCall::InsertMany(documents))?;
        Ok(ids)
    }

    async fn find(
        &self,
        filter: BsonDocument,
        options: Option<FindOptions>,
    ) -> Result<Vec<BsonDocument>> {
        self.record(MockCall::Find { filter, options })?;
        Ok(self.documents.clone())
    }

    async fn find_one(
        &self,
        filter: BsonDocument,
        options: Option<FindOneOptions>,
    ) -> Result<Option<BsonDocument>> {
        self.record(MockCall::FindOne { filter, options })?;
        Ok(self.documents.first().cloned())
    }

    async fn aggregate(&self, pipeline: Vec<BsonDocument>) -> Result<Vec<BsonDocument>> {
        self.record(MockCall::Aggregate(pipeline))?;
        Ok(self.documents.clone())
    }

    async fn update_many(&self, filter: BsonDocument, update: BsonDocument) -> Result<UpdateCounts> {
        self.record(MockCall::UpdateMany { filter, update })?;
        Ok(self.update_counts)
    }

    async fn delete_many(&self, filter: BsonDocument) -> Result<u64> {
        self.record(MockCall::DeleteMany(filter))?;
        Ok(self.deleted_count)
    }

    async fn drop(&self) -> Result<()> {
        self.record(MockCall::Drop)
    }

    async fn create_index(&self, keys: BsonDocument) -> Result<String> {
        let index_name = keys
            .iter()
            .map(|(field, kind)| format!("{}_{}", field, id_to_string(kind)))
            .collect::<Vec<_>>()
            .join("_");
        self.record(MockCall::CreateIndex(keys))?;
        Ok(index_name)
    }

    async fn count_all(&self) -> Result<u64> {
        self.record(MockCall::CountAll)?;
        Ok(self.total_count)
    }
}
