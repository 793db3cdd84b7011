//! Error types and result types for document store operations.
//!
//! Use [`DocumentStoreResult<T>`] as the return type for fallible operations.
//! Operations that simply find nothing (an empty `find`, an `update_one` with no
//! matching document, an unrecognised aggregation pipeline) are not errors.

use std::convert::Infallible;

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a collection.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// Serialization/deserialization error when converting between document formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during store initialization or seeding.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// A document was inserted without an `_id` field.
    /// The argument is the collection name.
    #[error("Document inserted into collection {0} has no _id field")]
    MissingId(String),
    /// The document has an invalid structure (for example a non-string `_id`).
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// A raw query could not be parsed into clauses.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    /// A raw update could not be parsed into operations.
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),
    /// An update operator targeted a field holding a value of the wrong kind.
    #[error("Field {field} holds {found}, expected {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    /// Password hashing or verification failed.
    #[error("Credential error: {0}")]
    Credential(String),
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

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

impl From<Infallible> for DocumentStoreError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
