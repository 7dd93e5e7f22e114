//! Common utilities for collection-facade
//!
//! This crate holds the error type shared by the facade crates.

pub mod error;

pub use error::{ErrorKind, FacadeError, Result};
