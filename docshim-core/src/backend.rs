//! Collection backend abstraction.
//!
//! [`CollectionBackend`] is the async interface an application layer programs against.
//! It mirrors the synchronous collection operations (`find`, `find_one`, `insert_one`,
//! `update_one`, `count_documents`, `aggregate`, `init_if_empty`) so that a concurrent
//! host can put a collection behind a lock and share it between tasks.
//!
//! # Examples
//!
//! ```ignore
//! use docshim::backend::CollectionBackend;
//! use docshim::query::Query;
//! use bson::doc;
//!
//! let inserted = backend.insert_one(doc! { "_id": "Chess Club", "participants": [] }).await?;
//! let found = backend.find_one(Query::by_id(inserted.inserted_id)).await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::Document;
use std::fmt::Debug;

use crate::{error::DocumentStoreResult, query::Query, update::Update};

/// Outcome of `insert_one`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOneResult {
    /// Identifier under which the document was stored.
    pub inserted_id: String,
}

/// Outcome of `update_one`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    /// `1` if a document matched the query and was updated, `0` otherwise.
    pub modified_count: u64,
}

impl UpdateResult {
    pub const NONE: UpdateResult = UpdateResult { modified_count: 0 };
    pub const ONE: UpdateResult = UpdateResult { modified_count: 1 };
}

/// Abstract async interface to a single collection of documents.
///
/// Documents returned by reads carry their identifier as a synthetic `_id` field.
/// A query that matches nothing is not an error: reads return an empty vector or
/// `None`, and `update_one` reports zero modified documents.
#[async_trait]
pub trait CollectionBackend: Send + Sync + Debug {
    /// Returns the name of the collection.
    fn name(&self) -> &str;

    /// Returns every document matching `query`, in insertion order.
    async fn find(&self, query: Query) -> DocumentStoreResult<Vec<Document>>;

    /// Returns the first document matching `query`.
    async fn find_one(&self, query: Query) -> DocumentStoreResult<Option<Document>>;

    /// Stores `document` under its `_id`, replacing any document with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::MissingId`](crate::error::DocumentStoreError::MissingId)
    /// if the document has no `_id`.
    async fn insert_one(&self, document: Document) -> DocumentStoreResult<InsertOneResult>;

    /// Applies `update` to the first document matching `query`.
    async fn update_one(&self, query: Query, update: Update) -> DocumentStoreResult<UpdateResult>;

    /// Counts the documents matching `query`.
    async fn count_documents(&self, query: Query) -> DocumentStoreResult<u64>;

    /// Evaluates a recognised aggregation pipeline; unrecognised pipelines yield no records.
    async fn aggregate(&self, pipeline: Vec<Document>) -> DocumentStoreResult<Vec<Document>>;

    /// Inserts every record of `seed` if the collection is empty, returning how many were inserted.
    async fn init_if_empty(&self, seed: Vec<Document>) -> DocumentStoreResult<usize>;
}

#[async_trait]
impl<B> CollectionBackend for &B
where
    B: CollectionBackend,
{
    fn name(&self) -> &str {
        (*self).name()
    }

    async fn find(&self, query: Query) -> DocumentStoreResult<Vec<Document>> {
        (*self).find(query).await
    }

    async fn find_one(&self, query: Query) -> DocumentStoreResult<Option<Document>> {
        (*self).find_one(query).await
    }

    async fn insert_one(&self, document: Document) -> DocumentStoreResult<InsertOneResult> {
        (*self).insert_one(document).await
    }

    async fn update_one(&self, query: Query, update: Update) -> DocumentStoreResult<UpdateResult> {
        (*self)
            .update_one(query, update)
            .await
    }

    async fn count_documents(&self, query: Query) -> DocumentStoreResult<u64> {
        (*self).count_documents(query).await
    }

    async fn aggregate(&self, pipeline: Vec<Document>) -> DocumentStoreResult<Vec<Document>> {
        (*self).aggregate(pipeline).await
    }

    async fn init_if_empty(&self, seed: Vec<Document>) -> DocumentStoreResult<usize> {
        (*self).init_if_empty(seed).await
    }
}

/// Factory trait for creating backend instances.
#[async_trait]
pub trait CollectionBackendBuilder {
    type Backend: CollectionBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
