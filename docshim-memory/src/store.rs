//! In-memory collection implementation.
//!
//! [`InMemoryCollection`] owns an insertion-ordered map from document id to the
//! document's remaining fields. Every operation is a synchronous scan; there is no
//! indexing and no internal locking. Use [`SharedCollection`](crate::SharedCollection)
//! to share a collection between tasks.

use bson::{Bson, Document};
use indexmap::IndexMap;
use log::{debug, warn};

use docshim_core::{
    backend::{InsertOneResult, UpdateResult},
    document::{ID_FIELD, kind_of, merge_id, resolve_path, split_id},
    error::{DocumentStoreError, DocumentStoreResult},
    pipeline::Aggregation,
    query::Query,
    update::{Update, UpdateOp},
};

use crate::evaluator::{Comparable, DocumentEvaluator, values_equal};

type DocumentMap = IndexMap<String, Document>;


/// Synchronous in-memory collection of documents keyed by id.
///
/// Ids are unique by construction. Inserting an existing id replaces the stored
/// fields but keeps the document's original position in iteration order.
///
/// # Example
///
/// ```ignore
/// use docshim_memory::InMemoryCollection;
/// use docshim::{query::Query, update::Update};
/// use bson::doc;
///
/// let mut activities = InMemoryCollection::new("activities");
/// activities.insert_one(doc! { "_id": "Chess Club", "participants": ["a@x.edu"] })?;
///
/// let update = Update::builder().push("participants", "b@x.edu").build();
/// activities.update_one(&Query::by_id("Chess Club"), &update)?;
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryCollection {
    name: String,
    documents: DocumentMap,
}

impl InMemoryCollection {
    /// Creates a new empty collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: DocumentMap::new(),
        }
    }

    /// Creates a builder for constructing a collection with custom options.
    pub fn builder(name: impl Into<String>) -> InMemoryCollectionBuilder {
        InMemoryCollectionBuilder::new(name)
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the collection holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn matching<'a>(&'a self, query: &'a Query) -> impl Iterator<Item = (&'a String, &'a Document)> + 'a {
        self.documents
            .iter()
            .filter(move |(id, fields)| DocumentEvaluator::new(id, fields).matches(query))
    }

    /// Returns every document matching `query`, in insertion order, with `_id` merged in.
    pub fn find(&self, query: &Query) -> Vec<Document> {
        self.matching(query)
            .map(|(id, fields)| merge_id(id, fields))
            .collect()
    }

    /// Returns the first document matching `query`.
    pub fn find_one(&self, query: &Query) -> Option<Document> {
        self.find(query)
            .into_iter()
            .next()
    }

    /// Stores `document` under its `_id`, replacing any existing document with that id.
    ///
    /// # Errors
    ///
    /// * [`DocumentStoreError::MissingId`] if the document has no `_id`.
    /// * [`DocumentStoreError::InvalidDocument`] if `_id` is not a string.
    pub fn insert_one(&mut self, document: Document) -> DocumentStoreResult<InsertOneResult> {
        let (id, fields) = split_id(document, &self.name)?;

        if self.documents.insert(id.clone(), fields).is_some() {
            debug!("replaced document {id} in collection {}", self.name);
        }

        Ok(InsertOneResult { inserted_id: id })
    }

    /// Applies `update` to the first document matching `query`.
    ///
    /// Operations run in order against the same document, so later operations see
    /// the effect of earlier ones. If any operation fails the stored document is
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::TypeMismatch`] if an operator targets a field
    /// that exists but does not hold an array.
    pub fn update_one(&mut self, query: &Query, update: &Update) -> DocumentStoreResult<UpdateResult> {
        let id = match self.matching(query).next() {
            Some((id, _)) => id.clone(),
            None => return Ok(UpdateResult::NONE),
        };

        let Some(stored) = self.documents.get_mut(&id) else {
            return Ok(UpdateResult::NONE);
        };

        let mut working = stored.clone();

        for op in &update.ops {
            if let Err(err) = apply_op(&mut working, op) {
                warn!("rejected {} on document {id} in collection {}: {err}", op.operator(), self.name);
                return Err(err);
            }
        }

        *stored = working;

        Ok(UpdateResult::ONE)
    }

    /// Counts the documents matching `query`.
    pub fn count_documents(&self, query: &Query) -> u64 {
        self.matching(query).count() as u64
    }

    /// Evaluates an aggregation pipeline.
    ///
    /// Only the shapes known to [`Aggregation::recognize`] are evaluated; any other
    /// pipeline yields an empty result.
    pub fn aggregate(&self, pipeline: &[Document]) -> Vec<Document> {
        match Aggregation::recognize(pipeline) {
            Some(aggregation) => self.evaluate(&aggregation),
            None => {
                warn!(
                    "unrecognised {}-stage pipeline on collection {}, returning no records",
                    pipeline.len(),
                    self.name,
                );
                Vec::new()
            }
        }
    }

    /// Evaluates an already recognised aggregation.
    pub fn evaluate(&self, aggregation: &Aggregation) -> Vec<Document> {
        match aggregation {
            Aggregation::DistinctNestedArrayValues { path } => {
                let mut values = self
                    .documents
                    .values()
                    .filter_map(|fields| resolve_path(fields, path))
                    .flat_map(|value| match value {
                        Bson::Array(items) => items.iter().collect::<Vec<_>>(),
                        Bson::Null => Vec::new(),
                        single => vec![single],
                    })
                    .map(|value| (Comparable::from(value), value))
                    .collect::<Vec<_>>();

                values.sort_by(|(a, _), (b, _)| a.total_cmp(b));
                values.dedup_by(|(a, _), (b, _)| a.total_cmp(b).is_eq());

                values
                    .into_iter()
                    .map(|(_, value)| {
                        let mut record = Document::new();
                        record.insert(ID_FIELD, value.clone());
                        record
                    })
                    .collect()
            }
        }
    }

    /// Inserts every record of `seed` if, and only if, the collection is empty.
    ///
    /// Returns the number of inserted records; `0` when the collection already
    /// held documents.
    ///
    /// # Errors
    ///
    /// Fails without inserting anything if a seed record has no valid `_id`.
    pub fn init_if_empty(&mut self, seed: impl IntoIterator<Item = Document>) -> DocumentStoreResult<usize> {
        if self.count_documents(&Query::all()) != 0 {
            debug!("collection {} already populated, skipping seed", self.name);
            return Ok(0);
        }

        let records = seed
            .into_iter()
            .map(|record| split_id(record, &self.name))
            .collect::<DocumentStoreResult<Vec<_>>>()?;
        let inserted = records.len();

        self.documents.extend(records);

        debug!("seeded collection {} with {inserted} documents", self.name);

        Ok(inserted)
    }
}

fn apply_op(fields: &mut Document, op: &UpdateOp) -> DocumentStoreResult<()> {
    match op {
        UpdateOp::Push { field, value } => match fields.get_mut(field) {
            Some(Bson::Array(items)) => {
                items.push(value.clone());
                Ok(())
            }
            Some(other) => Err(not_an_array(field, other)),
            None => {
                fields.insert(field.clone(), Bson::Array(vec![value.clone()]));
                Ok(())
            }
        },
        UpdateOp::Pull { field, value } => match fields.get_mut(field) {
            Some(Bson::Array(items)) => {
                if let Some(position) = items.iter().position(|item| values_equal(item, value)) {
                    items.remove(position);
                }
                Ok(())
            }
            Some(other) => Err(not_an_array(field, other)),
            None => Ok(()),
        },
    }
}

fn not_an_array(field: &str, found: &Bson) -> DocumentStoreError {
    DocumentStoreError::TypeMismatch {
        field: field.to_string(),
        expected: "array",
        found: kind_of(found),
    }
}


/// Builder for constructing [`InMemoryCollection`] instances.
///
/// ```ignore
/// use docshim_memory::InMemoryCollection;
///
/// let teachers = InMemoryCollection::builder("teachers")
///     .capacity(8)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryCollectionBuilder {
    name: String,
    capacity: usize,
}

impl InMemoryCollectionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), capacity: 0 }
    }

    /// Pre-allocates room for `capacity` documents.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds a synchronous collection.
    pub fn build(self) -> InMemoryCollection {
        InMemoryCollection {
            name: self.name,
            documents: DocumentMap::with_capacity(self.capacity),
        }
    }
}
