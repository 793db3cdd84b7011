//! An in-process document store that mimics a subset of a document database's
//! query, update and aggregation interface.
//!
//! This crate is the entry point. It re-exports the core types and the in-memory
//! backend, and adds what an application needs around them:
//!
//! - [`credentials`] - Argon2 password hashing for stored accounts
//! - [`seed`] - Typed documents and the static seed data
//! - [`Database`] - The composition root owning the activities and teacher collections
//!
//! # Quick Start
//!
//! ```ignore
//! use docshim::prelude::*;
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> DocumentStoreResult<()> {
//!     // Builds both collections and seeds them
//!     let db = Database::builder().build().await?;
//!
//!     // Activities meeting on Monday
//!     let mondays = db
//!         .activities()
//!         .find(Query::try_from(doc! { "schedule_details.days": { "$in": ["Monday"] } })?)
//!         .await?;
//!
//!     // Sign a student up
//!     db.activities()
//!         .update_one(
//!             Query::by_id("Chess Club"),
//!             Update::try_from(doc! { "$push": { "participants": "new@mergington.edu" } })?,
//!         )
//!         .await?;
//!
//!     // Every weekday any activity meets on
//!     let days = db
//!         .activities()
//!         .aggregate(vec![
//!             doc! { "$unwind": "$schedule_details.days" },
//!             doc! { "$group": { "_id": "$schedule_details.days" } },
//!             doc! { "$sort": { "_id": 1 } },
//!         ])
//!         .await?;
//!
//!     println!("{} activities on Monday, days: {:?}", mondays.len(), days);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Concurrency
//!
//! [`memory::InMemoryCollection`] does no locking of its own. [`Database`] hands out
//! [`memory::SharedCollection`] handles, which serialize access to each collection.

pub mod credentials;
pub mod database;
pub mod prelude;
pub mod seed;

pub use docshim_core::{backend, collection, document, error, pipeline, query, update};
pub use database::{Database, DatabaseBuilder, DatabaseConfig, SeedReport};

// Re-export BSON types for convenience
pub use bson;

/// In-memory collection implementations.
pub mod memory {
    pub use docshim_memory::{InMemoryCollection, InMemoryCollectionBuilder, SharedCollection, SharedCollectionBuilder};
}
