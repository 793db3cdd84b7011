//! Lock-guarded collection handle for concurrent hosts.

use std::sync::Arc;
use async_trait::async_trait;
use bson::Document;
use mea::rwlock::RwLock;

use docshim_core::{
    backend::{CollectionBackend, CollectionBackendBuilder, InsertOneResult, UpdateResult},
    error::DocumentStoreResult,
    query::Query,
    update::Update,
};

use crate::store::{InMemoryCollection, InMemoryCollectionBuilder};


/// Cloneable, thread-safe handle to an [`InMemoryCollection`].
///
/// Clones share the same underlying collection. Reads take the read lock and
/// mutations take the write lock, so operations on one collection are serialized.
///
/// # Example
///
/// ```ignore
/// use docshim_memory::SharedCollection;
/// use docshim::{backend::CollectionBackend, query::Query};
/// use bson::doc;
///
/// let activities = SharedCollection::new("activities");
/// activities.insert_one(doc! { "_id": "Chess Club", "participants": [] }).await?;
/// assert_eq!(activities.count_documents(Query::all()).await?, 1);
/// ```
#[derive(Clone, Debug)]
pub struct SharedCollection {
    name: Arc<str>,
    inner: Arc<RwLock<InMemoryCollection>>,
}

impl SharedCollection {
    /// Creates a handle to a new empty collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_collection(InMemoryCollection::new(name))
    }

    /// Creates a builder for a shared collection.
    pub fn builder(name: impl Into<String>) -> SharedCollectionBuilder {
        SharedCollectionBuilder::new(name)
    }

    /// Wraps an existing collection.
    pub fn from_collection(collection: InMemoryCollection) -> Self {
        Self {
            name: Arc::from(collection.name()),
            inner: Arc::new(RwLock::new(collection)),
        }
    }

    /// Returns a point-in-time copy of the underlying collection.
    pub async fn snapshot(&self) -> InMemoryCollection {
        self.inner
            .read()
            .await
            .clone()
    }
}

#[async_trait]
impl CollectionBackend for SharedCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find(&self, query: Query) -> DocumentStoreResult<Vec<Document>> {
        Ok(self.inner.read().await.find(&query))
    }

    async fn find_one(&self, query: Query) -> DocumentStoreResult<Option<Document>> {
        Ok(self.inner.read().await.find_one(&query))
    }

    async fn insert_one(&self, document: Document) -> DocumentStoreResult<InsertOneResult> {
        self.inner
            .write()
            .await
            .insert_one(document)
    }

    async fn update_one(&self, query: Query, update: Update) -> DocumentStoreResult<UpdateResult> {
        self.inner
            .write()
            .await
            .update_one(&query, &update)
    }

    async fn count_documents(&self, query: Query) -> DocumentStoreResult<u64> {
        Ok(self.inner.read().await.count_documents(&query))
    }

    async fn aggregate(&self, pipeline: Vec<Document>) -> DocumentStoreResult<Vec<Document>> {
        Ok(self.inner.read().await.aggregate(&pipeline))
    }

    async fn init_if_empty(&self, seed: Vec<Document>) -> DocumentStoreResult<usize> {
        self.inner
            .write()
            .await
            .init_if_empty(seed)
    }
}

/// Builder for [`SharedCollection`] instances.
///
/// ```ignore
/// use docshim_memory::SharedCollection;
/// use docshim::backend::CollectionBackendBuilder;
///
/// let teachers = SharedCollection::builder("teachers").capacity(8).build().await?;
/// ```
#[derive(Debug, Clone)]
pub struct SharedCollectionBuilder {
    collection: InMemoryCollectionBuilder,
}

impl SharedCollectionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { collection: InMemoryCollection::builder(name) }
    }

    /// Pre-allocates room for `capacity` documents.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.collection = self.collection.capacity(capacity);
        self
    }
}

#[async_trait]
impl CollectionBackendBuilder for SharedCollectionBuilder {
    type Backend = SharedCollection;

    /// Builds a shared handle around a new collection. Always succeeds.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(SharedCollection::from_collection(self.collection.build()))
    }
}
