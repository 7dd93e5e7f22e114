//! The collection operations the facade forwards to
//!
//! [`CollectionDriver`] is implemented for `mongodb::Collection<Document>`;
//! [`crate::mock::MockDriver`] implements it for tests.

use async_trait::async_trait;
use bson::{doc, Bson, Document as BsonDocument};
use collection_facade_common::Result;
use futures::TryStreamExt;
use mongodb::{
    options::{FindOneOptions, FindOptions},
    Collection, IndexModel,
};

/// Counts reported by a multi-document update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateCounts {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Collection-level operations used by the facade
#[async_trait]
pub trait CollectionDriver: Send + Sync {
    /// Name of the underlying collection
    fn name(&self) -> &str;

    /// Insert one document, returning its `_id`
    async fn insert_one(&self, document: BsonDocument) -> Result<Bson>;

    /// Insert a batch, returning the `_id`s in input order
    async fn insert_many(&self, documents: Vec<BsonDocument>) -> Result<Vec<Bson>>;

    async fn find(
        &self,
        filter: BsonDocument,
        options: Option<FindOptions>,
    ) -> Result<Vec<BsonDocument>>;

    async fn find_one(
        &self,
        filter: BsonDocument,
        options: Option<FindOneOptions>,
    ) -> Result<Option<BsonDocument>>;

    async fn aggregate(&self, pipeline: Vec<BsonDocument>) -> Result<Vec<BsonDocument>>;

    /// Apply `update` (a full update document, e.g. `{"$set": ...}`) to every match
    async fn update_many(&self, filter: BsonDocument, update: BsonDocument) -> Result<UpdateCounts>;

    /// Delete every match, returning the deleted count
    async fn delete_many(&self, filter: BsonDocument) -> Result<u64>;

    async fn drop(&self) -> Result<()>;

    /// Create an index from `keys`, returning the index name
    async fn create_index(&self, keys: BsonDocument) -> Result<String>;

    /// Number of documents in the whole collection
    async fn count_all(&self) -> Result<u64>;
}

#[async_trait]
impl CollectionDriver for Collection<BsonDocument> {
    fn name(&self) -> &str {
        Collection::name(self)
    }

    async fn insert_one(&self, document: BsonDocument) -> Result<Bson> {
        let result = Collection::insert_one(self, document).await?;
        Ok(result.inserted_id)
    }

    async fn insert_many(&self, documents: Vec<BsonDocument>) -> Result<Vec<Bson>> {
        let result = Collection::insert_many(self, documents).await?;

        // inserted_ids is keyed by input position
        let mut ids: Vec<(usize, Bson)> = result.inserted_ids.into_iter().collect();
        ids.sort_by_key(|(index, _)| *index);
        Ok(ids.into_iter().map(|(_, id)| id).collect())
    }

    async fn find(
        &self,
        filter: BsonDocument,
        options: Option<FindOptions>,
    ) -> Result<Vec<BsonDocument>> {
        let cursor = Collection::find(self, filter).with_options(options).await?;
        let docs: Vec<BsonDocument> = cursor.try_collect().await?;
        Ok(docs)
    }

    async fn find_one(
        &self,
        filter: BsonDocument,
        options: Option<FindOneOptions>,
    ) -> Result<Option<BsonDocument>> {
        let found = Collection::find_one(self, filter).with_options(options).await?;
        Ok(found)
    }

    async fn aggregate(&self, pipeline: Vec<BsonDocument>) -> Result<Vec<BsonDocument>> {
        let cursor = Collection::aggregate(self, pipeline).await?;
        let docs: Vec<BsonDocument> = cursor.try_collect().await?;
        Ok(docs)
    }

    async fn update_many(&self, filter: BsonDocument, update: BsonDocument) -> Result<UpdateCounts> {
        let result = Collection::update_many(self, filter, update).await?;
        Ok(UpdateCounts {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn delete_many(&self, filter: BsonDocument) -> Result<u64> {
        let result = Collection::delete_many(self, filter).await?;
        Ok(result.deleted_count)
    }

    async fn drop(&self) -> Result<()> {
        Collection::drop(self).await?;
        Ok(())
    }

    async fn create_index(&self, keys: BsonDocument) -> Result<String> {
        let model = IndexModel::builder().keys(keys).build();
        let result = Collection::create_index(self, model).await?;
        Ok(result.index_name)
    }

    async fn count_all(&self) -> Result<u64> {
        let count = Collection::count_documents(self, doc! {}).await?;
        Ok(count)
    }
}
