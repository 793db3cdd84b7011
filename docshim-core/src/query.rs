//! Query construction and parsing.
//!
//! A query is an ordered list of [`Clause`]s that must all hold for a document to match.
//! An empty query matches every document.
//!
//! Raw queries are mappings from a query key to a query value and are parsed once,
//! via [`Query::try_from`], into clauses:
//!
//! - `_id` becomes [`Clause::IdEquals`]
//! - a dotted key whose value is `{ "$in": [...] }` becomes [`Clause::PathAnyOf`]
//! - any other dotted key becomes [`Clause::PathExists`]
//! - everything else becomes [`Clause::Exact`]
//!
//! ```ignore
//! use docshim::query::Query;
//! use bson::doc;
//!
//! let raw = Query::try_from(doc! { "schedule_details.days": { "$in": ["Monday"] } })?;
//!
//! let built = Query::builder()
//!     .any_of("schedule_details.days", vec!["Monday"])
//!     .build();
//! ```

use bson::{Bson, Document};

use crate::{
    document::{ID_FIELD, PATH_SEPARATOR, kind_of},
    error::{DocumentStoreError, DocumentStoreResult},
};

/// Marker key requesting set membership in a dotted-path query value.
pub const IN_MARKER: &str = "$in";

/// A single condition of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Matches only the document whose identifier equals the value.
    IdEquals(Bson),
    /// The top-level field must exist and equal the value.
    Exact {
        field: String,
        value: Bson,
    },
    /// The dotted path must resolve through nested mappings.
    PathExists {
        path: Vec<String>,
    },
    /// The dotted path must resolve to a sequence containing at least one candidate.
    PathAnyOf {
        path: Vec<String>,
        candidates: Vec<Bson>,
    },
}

/// A parsed query: all clauses must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub clauses: Vec<Clause>,
}

impl Query {
    /// Creates a query matching every document.
    pub fn all() -> Self {
        Query::default()
    }

    /// Creates a query matching the document with the given identifier.
    pub fn by_id(id: impl Into<String>) -> Self {
        Query { clauses: vec![Clause::IdEquals(Bson::String(id.into()))] }
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }

    /// Parses an optional raw query; `None` matches every document.
    pub fn parse(raw: Option<Document>) -> DocumentStoreResult<Self> {
        match raw {
            Some(raw) => Query::try_from(raw),
            None => Ok(Query::all()),
        }
    }

    /// Returns true if the query has no clauses.
    pub fn matches_all(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl TryFrom<Document> for Query {
    type Error = DocumentStoreError;

    fn try_from(raw: Document) -> Result<Self, Self::Error> {
        raw.into_iter()
            .map(|(key, value)| parse_clause(key, value))
            .collect::<DocumentStoreResult<Vec<_>>>()
            .map(|clauses| Query { clauses })
    }
}

impl From<Clause> for Query {
    fn from(clause: Clause) -> Self {
        Query { clauses: vec![clause] }
    }
}

fn parse_clause(key: String, value: Bson) -> DocumentStoreResult<Clause> {
    if key == ID_FIELD {
        return Ok(Clause::IdEquals(value));
    }

    if !key.contains(PATH_SEPARATOR) {
        return Ok(Clause::Exact { field: key, value });
    }

    let path = split_path(&key);

    let marker = match value {
        Bson::Document(mut operators) => operators.remove(IN_MARKER),
        _ => None,
    };

    match marker {
        Some(Bson::Array(candidates)) => Ok(Clause::PathAnyOf { path, candidates }),
        Some(other) => Err(DocumentStoreError::InvalidQuery(format!(
            "{IN_MARKER} on {key} must hold an array, got {}",
            kind_of(&other),
        ))),
        None => Ok(Clause::PathExists { path }),
    }
}

fn split_path(key: &str) -> Vec<String> {
    key.split(PATH_SEPARATOR)
        .map(str::to_string)
        .collect()
}

/// Fluent builder for [`Query`].
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder { query: Query::default() }
    }

    /// Requires the document identifier to equal `id`.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.query.clauses.push(Clause::IdEquals(Bson::String(id.into())));
        self
    }

    /// Requires the top-level `field` to equal `value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.query.clauses.push(Clause::Exact { field: field.into(), value: value.into() });
        self
    }

    /// Requires the dotted `path` to resolve.
    pub fn exists(mut self, path: &str) -> Self {
        self.query.clauses.push(Clause::PathExists { path: split_path(path) });
        self
    }

    /// Requires the sequence at the dotted `path` to contain any of `candidates`.
    pub fn any_of<V: Into<Bson>>(mut self, path: &str, candidates: impl IntoIterator<Item = V>) -> Self {
        self.query.clauses.push(Clause::PathAnyOf {
            path: split_path(path),
            candidates: candidates
                .into_iter()
                .map(Into::into)
                .collect(),
        });
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

/// Visitor over query clauses, implemented by query evaluators.
pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_id(&mut self, value: &Bson) -> Result<Self::Output, Self::Error>;
    fn visit_exact(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error>;
    fn visit_path_exists(&mut self, path: &[String]) -> Result<Self::Output, Self::Error>;
    fn visit_path_any_of(
        &mut self,
        path: &[String],
        candidates: &[Bson],
    ) -> Result<Self::Output, Self::Error>;

    fn visit_clause(&mut self, clause: &Clause) -> Result<Self::Output, Self::Error> {
        match clause {
            Clause::IdEquals(value) => self.visit_id(value),
            Clause::Exact { field, value } => self.visit_exact(field, value),
            Clause::PathExists { path } => self.visit_path_exists(path),
            Clause::PathAnyOf { path, candidates } => self.visit_path_any_of(path, candidates),
        }
    }
}
