//! Core traits and helpers for document representation and serialization.
//!
//! Raw documents are plain [`bson::Document`] mappings. A stored document keeps its
//! identifier outside of its fields; [`split_id`] and [`merge_id`] convert between the
//! stored form and the form handed back to callers, where `_id` is a synthetic field.
//!
//! Typed documents implement [`Document`] and get BSON/JSON conversions through
//! [`DocumentExt`].

use bson::{Bson, Document as RawDocument, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};
use serde_json::{Value, from_value, to_value};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Name of the identifying field of every document.
pub const ID_FIELD: &str = "_id";

/// Separator between segments of a dotted field path such as `schedule_details.days`.
pub const PATH_SEPARATOR: char = '.';

/// Core trait for typed documents.
///
/// Every document has a unique textual identifier and names the collection it belongs to.
///
/// # Example
///
/// ```ignore
/// use docshim::document::Document;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Club {
///     #[serde(rename = "_id")]
///     pub name: String,
///     pub members: Vec<String>,
/// }
///
/// impl Document for Club {
///     fn id(&self) -> &str {
///         &self.name
///     }
///
///     fn collection_name() -> &'static str {
///         "clubs"
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns this document's unique identifier.
    fn id(&self) -> &str;

    /// Returns the name of the collection this document belongs to.
    fn collection_name() -> &'static str;
}

/// Extension trait providing serialization/deserialization utilities for documents.
///
/// Automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a BSON value.
    fn to_bson(&self) -> DocumentStoreResult<Bson>;

    /// Creates a document from a BSON value.
    fn from_bson(bson: Bson) -> DocumentStoreResult<Self>;

    /// Converts this document to a JSON value.
    fn to_json(&self) -> DocumentStoreResult<Value>;

    /// Creates a document from a JSON value.
    fn from_json(value: Value) -> DocumentStoreResult<Self>;

    /// Converts this document into a raw record ready for `insert_one`,
    /// with `_id` set from [`Document::id`].
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the document does not
    /// serialize to a mapping.
    fn into_record(&self) -> DocumentStoreResult<RawDocument>;
}

impl<D: Document> DocumentExt for D {
    fn to_bson(&self) -> DocumentStoreResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }

    fn to_json(&self) -> DocumentStoreResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> DocumentStoreResult<Self> {
        Ok(from_value(value)?)
    }

    fn into_record(&self) -> DocumentStoreResult<RawDocument> {
        match self.to_bson()? {
            Bson::Document(mut record) => {
                record.insert(ID_FIELD, self.id());
                Ok(record)
            }
            other => Err(DocumentStoreError::InvalidDocument(format!(
                "{} document serialized to {}, expected a mapping",
                Self::collection_name(),
                kind_of(&other),
            ))),
        }
    }
}

/// Removes the `_id` field from a record and returns it alongside the remaining fields.
///
/// # Errors
///
/// * [`DocumentStoreError::MissingId`] if the record has no `_id`.
/// * [`DocumentStoreError::InvalidDocument`] if `_id` is not a string.
pub fn split_id(mut record: RawDocument, collection: &str) -> DocumentStoreResult<(String, RawDocument)> {
    match record.remove(ID_FIELD) {
        Some(Bson::String(id)) => Ok((id, record)),
        Some(other) => Err(DocumentStoreError::InvalidDocument(format!(
            "_id must be a string, got {}",
            kind_of(&other),
        ))),
        None => Err(DocumentStoreError::MissingId(collection.to_string())),
    }
}

/// Builds the caller-facing form of a stored document: `_id` first, then the fields.
pub fn merge_id(id: &str, fields: &RawDocument) -> RawDocument {
    let mut merged = RawDocument::new();
    merged.insert(ID_FIELD, id);

    for (key, value) in fields {
        merged.insert(key.clone(), value.clone());
    }

    merged
}

/// Resolves a dotted path by descending through nested mappings.
///
/// Returns `None` if a segment is missing or an intermediate value is not a mapping.
pub fn resolve_path<'a, S: AsRef<str>>(fields: &'a RawDocument, path: &[S]) -> Option<&'a Bson> {
    let (first, rest) = path.split_first()?;
    let mut current = fields.get(first.as_ref())?;

    for segment in rest {
        current = current.as_document()?.get(segment.as_ref())?;
    }

    Some(current)
}

/// Human readable name of a value's kind, used in error messages.
pub fn kind_of(value: &Bson) -> &'static str {
    match value {
        Bson::Null | Bson::Undefined => "null",
        Bson::Boolean(_) => "boolean",
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => "number",
        Bson::String(_) | Bson::Symbol(_) => "string",
        Bson::Array(_) => "array",
        Bson::Document(_) => "document",
        _ => "other",
    }
}
