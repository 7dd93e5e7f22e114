//! The collection facade
//!
//! A [`CollectionFacade`] owns one connection and one bound collection and
//! exposes simplified insert / fetch / update / delete / aggregate calls.
//! Every call returns a typed outcome and also mirrors its counts into
//! [`LastOutcome`]; failures are returned as [`FacadeError`] and their message
//! is kept in `last().message`.
//!
//! # Example
//!
//! ```ignore
//! use bson::doc;
//! use collection_facade_mongodb::{CollectionFacade, FetchOptions};
//!
//! let mut facade = CollectionFacade::default();
//! facade.connect(Some("shop")).await?;
//! facade.set_collection("orders")?;
//!
//! facade.insert([doc! { "a": 1 }, doc! { "a": 2 }]).await?;
//! let page = facade.fetch(doc! { "a": 1 }, FetchOptions::new().limit(10)).await?;
//! println!("{} of {}", page.documents.len(), page.total_count);
//! ```

use bson::{doc, Bson, Document as BsonDocument};
use collection_facade_common::{FacadeError, Result};
use mongodb::{Collection, Database};
use serde::Serialize;
use std::fmt::Debug;
use std::io::Write;
use tracing::{debug, warn};

use crate::connection::{Connection, FacadeConfig};
use crate::driver::CollectionDriver;
use crate::dump::{dump, write_dump};
use crate::options::FetchOptions;
use crate::outcome::{DeleteOutcome, FetchOutcome, InsertOutcome, LastOutcome, UpdateOutcome};
use crate::validation::{ValidatedCollectionName, ValidatedFieldName};

/// Store the error's message in the outcome fields and hand the error back
fn record(last: &mut LastOutcome, err: FacadeError) -> FacadeError {
    if err.is_no_effect() {
        debug!(reason = %err, "operation had no effect");
    } else {
        warn!(error = %err, "MongoDB operation failed");
    }
    last.message = Some(err.message());
    err
}

/// Dump `value` under `label` when logging is enabled, to `sink` or stdout
fn emit<T: Serialize + Debug + ?Sized>(
    enabled: bool,
    sink: &mut Option<Box<dyn Write + Send>>,
    label: &str,
    value: &T,
) {
    if !enabled {
        return;
    }
    match sink {
        Some(out) => {
            debug!(label, "dumping operation arguments");
            let _ = write_dump(out, label, value);
        }
        None => dump(label, value),
    }
}

/// Simplified CRUD surface over one MongoDB collection at a time
pub struct CollectionFacade {
    config: FacadeConfig,
    debug: bool,
    sink: Option<Box<dyn Write + Send>>,
    connection: Option<Connection>,
    collection: Option<Box<dyn CollectionDriver>>,
    last: LastOutcome,
}

impl Default for CollectionFacade {
    fn default() -> Self {
        Self::new(FacadeConfig::default())
    }
}

impl CollectionFacade {
    pub fn new(config: FacadeConfig) -> Self {
        Self {
            config,
            debug: false,
            sink: None,
            connection: None,
            collection: None,
            last: LastOutcome::default(),
        }
    }

    /// Toggle dumping of operation arguments (to stdout unless redirected
    /// with [`log_to`](Self::log_to))
    pub fn log(&mut self, enabled: bool) {
        self.debug = enabled;
    }

    /// Send argument dumps to `sink` instead of stdout. Does not enable
    /// logging by itself.
    pub fn log_to<W: Write + Send + 'static>(&mut self, sink: W) {
        self.sink = Some(Box::new(sink));
    }

    pub fn is_logging(&self) -> bool {
        self.debug
    }

    /// Outcome fields of the most recent operations
    pub fn last(&self) -> &LastOutcome {
        &self.last
    }

    /// The connected database, if any
    pub fn database(&self) -> Option<&Database> {
        self.connection.as_ref().map(Connection::database)
    }

    /// Name of the bound collection, if any
    pub fn collection_name(&self) -> Option<&str> {
        self.collection.as_deref().map(|c| c.name())
    }

    /// Open a client and select `db_name` (or the configured default database).
    ///
    /// Connection errors are returned as-is and not recorded in the outcome
    /// fields. Reconnecting drops the previously bound collection.
    pub async fn connect(&mut self, db_name: Option<&str>) -> Result<Database> {
        let connection = Connection::open(&self.config, db_name).await?;
        let database = connection.database().clone();
        self.connection = Some(connection);
        self.collection = None;
        Ok(database)
    }

    /// Bind the facade to `name` in the connected database
    pub fn set_collection(&mut self, name: &str) -> Result<Collection<BsonDocument>> {
        let connection = self.connection.as_ref().ok_or(FacadeError::NotConnected)?;
        let name = ValidatedCollectionName::new(name)?;

        let collection: Collection<BsonDocument> = connection.database().collection(name.as_str());
        debug!(
            database = connection.database_name(),
            collection = name.as_str(),
            "collection bound"
        );
        self.collection = Some(Box::new(collection.clone()));
        Ok(collection)
    }

    /// Bind the facade to any [`CollectionDriver`], replacing the current binding
    pub fn bind_driver<D: CollectionDriver + 'static>(&mut self, driver: D) {
        debug!(collection = driver.name(), "collection driver bound");
        self.collection = Some(Box::new(driver));
    }

    /// Round-trip to the server on the connected database
    pub async fn ping(&self) -> Result<bool> {
        let connection = self.connection.as_ref().ok_or(FacadeError::NotConnected)?;
        connection.ping().await
    }

    /// Create a single-field index. `index_type` (`1`, `-1`, `"text"`, ...) is
    /// passed through unchecked; returns the index name.
    pub async fn create_index(&mut self, field: &str, index_type: impl Into<Bson>) -> Result<String> {
        self.last.message = None;
        let mut keys = BsonDocument::new();
        keys.insert(field, index_type.into());
        emit(self.debug, &mut self.sink, "MongoDB CreateIndex Args", &keys);

        let Some(collection) = self.collection.as_deref() else {
            return Err(record(&mut self.last, FacadeError::NotBound));
        };
        if let Err(e) = ValidatedFieldName::new(field) {
            return Err(record(&mut self.last, e));
        }

        match collection.create_index(keys).await {
            Ok(index_name) => {
                debug!(collection = collection.name(), index = %index_name, "index created");
                Ok(index_name)
            }
            Err(e) => Err(record(&mut self.last, e)),
        }
    }

    /// Insert one or more documents.
    ///
    /// One document goes through a single insert, more through a batch insert.
    /// `last().insert_id` receives the id, or the batch ids comma-joined.
    pub async fn insert<I>(&mut self, documents: I) -> Result<InsertOutcome>
    where
        I: IntoIterator<Item = BsonDocument>,
    {
        self.last.message = None;
        let mut documents: Vec<BsonDocument> = documents.into_iter().collect();
        emit(self.debug, &mut self.sink, "MongoDB Insert Args", &documents);

        let Some(collection) = self.collection.as_deref() else {
            return Err(record(&mut self.last, FacadeError::NotBound));
        };

        let inserted = match documents.len() {
            0 => Err(FacadeError::Validation(
                "insert requires at least one document".to_string(),
            )),
            1 => collection
                .insert_one(documents.remove(0))
                .await
                .map(|id| vec![id]),
            _ => collection.insert_many(documents).await,
        };

        match inserted {
            Ok(inserted_ids) => {
                let outcome = InsertOutcome {
                    inserted_count: inserted_ids.len() as u64,
                    inserted_ids,
                };
                self.last.insert_count = Some(outcome.inserted_count);
                self.last.insert_id = outcome.joined_ids();
                debug!(
                    collection = collection.name(),
                    inserted = outcome.inserted_count,
                    "documents inserted"
                );
                Ok(outcome)
            }
            Err(e) => Err(record(&mut self.last, e)),
        }
    }

    /// All documents matching `filter`.
    ///
    /// `total_count` (returned and recorded) is the size of the whole
    /// collection, not the number of matches.
    pub async fn fetch(&mut self, filter: BsonDocument, options: FetchOptions) -> Result<FetchOutcome> {
        self.last.message = None;
        emit(
            self.debug,
            &mut self.sink,
            "MongoDB Fetch Args",
            &doc! { "filter": filter.clone(), "options": options.to_document() },
        );

        let Some(collection) = self.collection.as_deref() else {
            return Err(record(&mut self.last, FacadeError::NotBound));
        };

        let fetched = async {
            let documents = collection.find(filter, options.to_find_options()).await?;
            let total_count = collection.count_all().await?;
            Ok::<_, FacadeError>(FetchOutcome {
                documents,
                total_count,
            })
        }
        .await;

        match fetched {
            Ok(outcome) => {
                self.last.total_count = Some(outcome.total_count);
                debug!(
                    collection = collection.name(),
                    returned = outcome.documents.len(),
                    total = outcome.total_count,
                    "fetch complete"
                );
                Ok(outcome)
            }
            Err(e) => Err(record(&mut self.last, e)),
        }
    }

    /// First document matching `filter`. `limit` has no effect here, and
    /// `total_count` is left untouched.
    pub async fn fetch_one(
        &mut self,
        filter: BsonDocument,
        options: FetchOptions,
    ) -> Result<Option<BsonDocument>> {
        self.last.message = None;
        emit(
            self.debug,
            &mut self.sink,
            "MongoDB FetchOne Args",
            &doc! { "filter": filter.clone(), "options": options.to_document() },
        );

        let Some(collection) = self.collection.as_deref() else {
            return Err(record(&mut self.last, FacadeError::NotBound));
        };

        match collection.find_one(filter, options.to_find_one_options()).await {
            Ok(found) => Ok(found),
            Err(e) => Err(record(&mut self.last, e)),
        }
    }

    /// Run an aggregation pipeline; also records the whole-collection count
    pub async fn aggregate(&mut self, pipeline: Vec<BsonDocument>) -> Result<FetchOutcome> {
        self.last.message = None;
        emit(self.debug, &mut self.sink, "MongoDB Aggregate Args", &pipeline);

        let Some(collection) = self.collection.as_deref() else {
            return Err(record(&mut self.last, FacadeError::NotBound));
        };

        let aggregated = async {
            let documents = collection.aggregate(pipeline).await?;
            let total_count = collection.count_all().await?;
            Ok::<_, FacadeError>(FetchOutcome {
                documents,
                total_count,
            })
        }
        .await;

        match aggregated {
            Ok(outcome) => {
                self.last.total_count = Some(outcome.total_count);
                debug!(
                    collection = collection.name(),
                    returned = outcome.documents.len(),
                    "aggregate complete"
                );
                Ok(outcome)
            }
            Err(e) => Err(record(&mut self.last, e)),
        }
    }

    /// `$set` `fields` on every document matching `filter`.
    ///
    /// A zero modified count is reported as [`FacadeError::NoEffect`] even when
    /// documents matched; the matched count travels with the error and is
    /// recorded in `last()`.
    pub async fn update(&mut self, filter: BsonDocument, fields: BsonDocument) -> Result<UpdateOutcome> {
        self.last.message = None;
        emit(
            self.debug,
            &mut self.sink,
            "MongoDB Update",
            &doc! { "cond": filter.clone(), "args": fields.clone() },
        );

        let Some(collection) = self.collection.as_deref() else {
            return Err(record(&mut self.last, FacadeError::NotBound));
        };

        let counts = match collection.update_many(filter, doc! { "$set": fields }).await {
            Ok(counts) => counts,
            Err(e) => return Err(record(&mut self.last, e)),
        };

        self.last.matched_count = Some(counts.matched_count);
        self.last.modified_count = Some(counts.modified_count);
        debug!(
            collection = collection.name(),
            matched = counts.matched_count,
            modified = counts.modified_count,
            "update complete"
        );

        if counts.modified_count == 0 {
            return Err(record(
                &mut self.last,
                FacadeError::no_data_modified(counts.matched_count),
            ));
        }

        Ok(UpdateOutcome {
            matched_count: counts.matched_count,
            modified_count: counts.modified_count,
        })
    }

    /// Delete every document matching `filter`; zero deletions is
    /// [`FacadeError::NoEffect`]
    pub async fn delete(&mut self, filter: BsonDocument) -> Result<DeleteOutcome> {
        self.last.message = None;
        emit(self.debug, &mut self.sink, "MongoDB Delete Args", &filter);

        let Some(collection) = self.collection.as_deref() else {
            return Err(record(&mut self.last, FacadeError::NotBound));
        };

        let deleted_count = match collection.delete_many(filter).await {
            Ok(count) => count,
            Err(e) => return Err(record(&mut self.last, e)),
        };

        self.last.deleted_count = Some(deleted_count);
        debug!(collection = collection.name(), deleted = deleted_count, "delete complete");

        if deleted_count == 0 {
            return Err(record(&mut self.last, FacadeError::no_data_deleted()));
        }

        Ok(DeleteOutcome { deleted_count })
    }

    /// Drop the bound collection. The binding stays in place; the next insert
    /// recreates the collection.
    pub async fn drop(&mut self) -> Result<bool> {
        self.last.message = None;

        let Some(collection) = self.collection.as_deref() else {
            return Err(record(&mut self.last, FacadeError::NotBound));
        };
        emit(self.debug, &mut self.sink, "MongoDB Drop Args", collection.name());

        match collection.drop().await {
            Ok(()) => {
                debug!(collection = collection.name(), "collection dropped");
                Ok(true)
            }
            Err(e) => Err(record(&mut self.last, e)),
        }
    }
}
