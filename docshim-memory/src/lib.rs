//! In-memory collection backend for docshim.
//!
//! This crate evaluates the query, update and aggregation mini-language described by
//! `docshim-core` against documents held in memory.
//!
//! - [`InMemoryCollection`] - the synchronous collection: `find`, `find_one`, `insert_one`,
//!   `update_one`, `count_documents`, `aggregate` and `init_if_empty`
//! - [`SharedCollection`] - a cloneable handle guarding a collection with an async
//!   read-write lock, implementing [`CollectionBackend`](docshim_core::backend::CollectionBackend)
//!
//! Nothing is persisted; a collection lives as long as the process.
//!
//! # Quick Start
//!
//! ```ignore
//! use docshim_memory::InMemoryCollection;
//! use docshim::{query::Query, update::Update};
//! use bson::doc;
//!
//! let mut activities = InMemoryCollection::new("activities");
//! activities.init_if_empty(vec![
//!     doc! { "_id": "Chess Club", "schedule_details": { "days": ["Monday", "Friday"] } },
//!     doc! { "_id": "Math Club", "schedule_details": { "days": ["Tuesday"] } },
//! ])?;
//!
//! let mondays = activities.find(
//!     &Query::builder().any_of("schedule_details.days", vec!["Monday"]).build(),
//! );
//! assert_eq!(mondays.len(), 1);
//! ```

#[allow(unused_extern_crates)]
extern crate self as docshim_memory;

pub mod evaluator;
pub mod shared;
pub mod store;

pub use shared::{SharedCollection, SharedCollectionBuilder};
pub use store::{InMemoryCollection, InMemoryCollectionBuilder};
