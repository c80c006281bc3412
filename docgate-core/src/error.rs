//! Error types and result types for gateway and store operations.
//!
//! Use [`DocumentStoreResult<T>`] as the return type for fallible operations. Nothing in
//! this crate recovers from an error locally; every variant surfaces to the caller.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store
/// through the gateway.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// The client payload is not valid JSON.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    /// Conversion between JSON and the store's BSON representation failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during store initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// The store cannot hold the given value (for example a bare scalar in a store that
    /// only accepts documents).
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl DocumentStoreError {
    /// Wraps a payload parse failure.
    pub fn malformed(err: SerdeJsonError) -> Self {
        DocumentStoreError::MalformedPayload(err.to_string())
    }
}

impl From<BsonError> for DocumentStoreError {
    fn from(err: BsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}
