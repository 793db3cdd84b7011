//! Typed collection access.
//!
//! [`TypedCollection`] wraps any [`CollectionBackend`] and converts between raw records
//! and a concrete [`Document`] type.
//!
//! # Example
//!
//! ```ignore
//! use docshim::collection::TypedCollection;
//! use docshim::query::Query;
//!
//! let activities = TypedCollection::<_, Activity>::new(&backend);
//! let chess = activities.get("Chess Club").await?;
//! ```

use std::marker::PhantomData;

use crate::{
    backend::{CollectionBackend, InsertOneResult, UpdateResult},
    document::{Document, DocumentExt, ID_FIELD},
    error::DocumentStoreResult,
    query::Query,
    update::Update,
};

#[derive(Debug)]
pub struct TypedCollection<B: CollectionBackend, D: Document> {
    backend: B,
    _marker: PhantomData<D>,
}

impl<B: CollectionBackend, D: Document> TypedCollection<B, D> {
    pub fn new(backend: B) -> Self {
        Self { backend, _marker: PhantomData }
    }

    /// Returns the name of the underlying collection.
    pub fn name(&self) -> &str {
        self.backend.name()
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Inserts a document, replacing any document with the same id.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if serialization or insertion fails.
    pub async fn insert(&self, document: &D) -> DocumentStoreResult<InsertOneResult> {
        self.backend
            .insert_one(document.into_record()?)
            .await
    }

    /// Inserts `documents` only if the collection is empty.
    pub async fn init_if_empty(&self, documents: &[D]) -> DocumentStoreResult<usize> {
        self.backend
            .init_if_empty(
                documents
                    .iter()
                    .map(DocumentExt::into_record)
                    .collect::<DocumentStoreResult<Vec<_>>>()?,
            )
            .await
    }

    /// Retrieves the document with the given id.
    pub async fn get(&self, id: &str) -> DocumentStoreResult<Option<D>> {
        self.find_one(Query::by_id(id)).await
    }

    /// Queries documents and deserializes them.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if a matching
    /// record cannot be deserialized into `D`.
    pub async fn find(&self, query: Query) -> DocumentStoreResult<Vec<D>> {
        self.backend
            .find(query)
            .await?
            .into_iter()
            .map(|record| D::from_bson(record.into()))
            .collect()
    }

    /// Returns the first matching document.
    pub async fn find_one(&self, query: Query) -> DocumentStoreResult<Option<D>> {
        self.backend
            .find_one(query)
            .await?
            .map(|record| D::from_bson(record.into()))
            .transpose()
    }

    /// Applies `update` to the document with the given id.
    pub async fn update(&self, id: &str, update: Update) -> DocumentStoreResult<UpdateResult> {
        self.backend
            .update_one(Query::by_id(id), update)
            .await
    }

    /// Counts the documents matching `query`.
    pub async fn count(&self, query: Query) -> DocumentStoreResult<u64> {
        self.backend.count_documents(query).await
    }

    /// Returns the ids of all documents in the collection, in insertion order.
    pub async fn ids(&self) -> DocumentStoreResult<Vec<String>> {
        Ok(self
            .backend
            .find(Query::all())
            .await?
            .into_iter()
            .filter_map(|record| record.get_str(ID_FIELD).ok().map(str::to_string))
            .collect())
    }
}
