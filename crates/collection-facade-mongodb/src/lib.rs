//! MongoDB collection facade
//!
//! This crate wraps the `mongodb` driver behind a small CRUD surface bound to
//! one collection at a time.
//!
//! # Features
//! - Single and batch insert with id bookkeeping
//! - Fetch / fetch-one with an optional projection, limit, skip and sort
//! - Aggregation pipelines
//! - Multi-document `$set` update and delete with zero-effect reporting
//! - Typed outcomes plus a last-outcome mirror
//! - Optional argument dumping for debugging

pub mod connection;
pub mod driver;
pub mod dump;
pub mod facade;
pub mod mock;
pub mod options;
pub mod outcome;
pub mod validation;

pub use collection_facade_common::{ErrorKind, FacadeError, Result};
pub use connection::{Connection, FacadeConfig, PoolConfig};
pub use driver::{CollectionDriver, UpdateCounts};
pub use dump::dump;
pub use facade::CollectionFacade;
pub use options::FetchOptions;
pub use outcome::{DeleteOutcome, FetchOutcome, InsertOutcome, LastOutcome, UpdateOutcome};
pub use validation::{ValidatedCollectionName, ValidatedFieldName};
