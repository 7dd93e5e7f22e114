//! Error types for collection-facade

use thiserror::Error;

/// Result type alias for facade operations
pub type Result<T> = std::result::Result<T, FacadeError>;

/// Message recorded when an update matched nothing or changed nothing
pub const NO_DATA_MODIFIED_UPDATE: &str = "MongoDB Client : No Data Modified";

/// Message recorded when a delete removed nothing
pub const NO_DATA_MODIFIED_DELETE: &str = "No Data Modified";

/// Coarse classification of a [`FacadeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client construction or `ping` failed
    Connection,
    /// The driver rejected or failed a collection operation
    Operation,
    /// The operation ran but affected no documents
    NoEffect,
    /// The facade was used out of order or with invalid input
    Usage,
}

/// Unified error type for all facade operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FacadeError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Database not connected: call connect() first")]
    NotConnected,

    #[error("No collection bound: call set_collection() first")]
    NotBound,

    #[error("Operation error: {0}")]
    Operation(String),

    /// Zero matched/modified/deleted documents. Not a driver failure.
    #[error("{message}")]
    NoEffect { message: String, matched_count: u64 },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl FacadeError {
    /// Zero-effect update error
    pub fn no_data_modified(matched_count: u64) -> Self {
        FacadeError::NoEffect {
            message: NO_DATA_MODIFIED_UPDATE.to_string(),
            matched_count,
        }
    }

    /// Zero-effect delete error
    pub fn no_data_deleted() -> Self {
        FacadeError::NoEffect {
            message: NO_DATA_MODIFIED_DELETE.to_string(),
            matched_count: 0,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FacadeError::Connection(_) => ErrorKind::Connection,
            FacadeError::Operation(_) => ErrorKind::Operation,
            FacadeError::NoEffect { .. } => ErrorKind::NoEffect,
            FacadeError::NotConnected | FacadeError::NotBound | FacadeError::Validation(_) => {
                ErrorKind::Usage
            }
        }
    }

    /// Returns true if the operation succeeded but touched no documents
    pub fn is_no_effect(&self) -> bool {
        self.kind() == ErrorKind::NoEffect
    }

    /// The bare message stored in the facade's outcome fields.
    ///
    /// Driver and zero-effect errors keep the raw driver text so callers see
    /// the same message the server produced.
    pub fn message(&self) -> String {
        match self {
            FacadeError::Operation(msg) | FacadeError::Connection(msg) => msg.clone(),
            FacadeError::NoEffect { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// Driver errors only arise inside collection operations; connect and ping
// build `Connection` errors themselves.
#[cfg(feature = "mongodb-errors")]
impl From<mongodb::error::Error> for FacadeError {
    fn from(err: mongodb::error::Error) -> Self {
        FacadeError::Operation(err.to_string())
    }
}
