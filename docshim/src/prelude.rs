//! Convenient re-exports of commonly used types from docshim.
//!
//! ```ignore
//! use docshim::prelude::*;
//! ```

pub use docshim_core::{
    backend::{CollectionBackend, CollectionBackendBuilder, InsertOneResult, UpdateResult},
    collection::TypedCollection,
    document::{Document, DocumentExt, ID_FIELD},
    error::{DocumentStoreError, DocumentStoreResult},
    pipeline::Aggregation,
    query::{Clause, Query, QueryBuilder, QueryVisitor},
    update::{Update, UpdateBuilder, UpdateOp},
};
pub use docshim_memory::{InMemoryCollection, SharedCollection};

pub use crate::{
    credentials::{hash_password, verify_password},
    database::{Database, DatabaseConfig},
    seed::{Activity, Role, TeacherAccount},
};
