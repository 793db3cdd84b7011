//! The composition root owning the application's collections.
//!
//! A [`Database`] owns two independent collections, activities and teacher accounts,
//! and seeds each one from the static seed data when it is empty.
//!
//! # Example
//!
//! ```ignore
//! use docshim::prelude::*;
//!
//! let db = Database::builder().build().await?;
//! let chess = db.typed_activities().get("Chess Club").await?;
//! ```

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    backend::{CollectionBackend, CollectionBackendBuilder},
    collection::TypedCollection,
    document::Document,
    error::{DocumentStoreError, DocumentStoreResult},
    memory::SharedCollection,
    query::Query,
    seed::{self, Activity, TeacherAccount},
};

/// Database configuration, loadable from JSON.
///
/// Missing keys take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Name of the activities collection.
    pub activities_collection: String,
    /// Name of the teacher accounts collection.
    pub teachers_collection: String,
    /// Whether `build` seeds empty collections.
    pub seed: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            activities_collection: Activity::collection_name().to_string(),
            teachers_collection: TeacherAccount::collection_name().to_string(),
            seed: true,
        }
    }
}

impl DatabaseConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Initialization`] if the JSON is invalid.
    pub fn from_json(json: &str) -> DocumentStoreResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| DocumentStoreError::Initialization(format!("invalid database config: {e}")))
    }
}

/// Number of documents inserted into each collection by [`Database::init`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub activities: usize,
    pub teachers: usize,
}

/// Owns the activities and teacher accounts collections.
#[derive(Debug, Clone)]
pub struct Database {
    config: DatabaseConfig,
    activities: SharedCollection,
    teachers: SharedCollection,
}

impl Database {
    /// Creates a builder for a database.
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::default()
    }

    /// Returns the configuration this database was built with.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Returns the activities collection.
    pub fn activities(&self) -> &SharedCollection {
        &self.activities
    }

    /// Returns the teacher accounts collection.
    pub fn teachers(&self) -> &SharedCollection {
        &self.teachers
    }

    /// Returns the activities collection with typed access.
    pub fn typed_activities(&self) -> TypedCollection<&SharedCollection, Activity> {
        TypedCollection::new(&self.activities)
    }

    /// Returns the teacher accounts collection with typed access.
    pub fn typed_teachers(&self) -> TypedCollection<&SharedCollection, TeacherAccount> {
        TypedCollection::new(&self.teachers)
    }

    /// Seeds each empty collection from the static seed data.
    ///
    /// Collections that already hold documents are left untouched, so calling this
    /// more than once is harmless. Teacher passwords are only hashed when the teacher
    /// collection actually needs seeding.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed data is malformed or password hashing fails.
    pub async fn init(&self) -> DocumentStoreResult<SeedReport> {
        let mut report = SeedReport::default();

        if self.activities.count_documents(Query::all()).await? == 0 {
            report.activities = self
                .typed_activities()
                .init_if_empty(&seed::activities()?)
                .await?;
        }

        if self.teachers.count_documents(Query::all()).await? == 0 {
            report.teachers = self
                .typed_teachers()
                .init_if_empty(&seed::teacher_accounts()?)
                .await?;
        }

        info!(
            "database initialised: {} activities and {} teacher accounts seeded",
            report.activities, report.teachers,
        );

        Ok(report)
    }
}

/// Builder for [`Database`].
#[derive(Debug, Clone, Default)]
pub struct DatabaseBuilder {
    config: DatabaseConfig,
}

impl DatabaseBuilder {
    /// Replaces the whole configuration.
    pub fn config(mut self, config: DatabaseConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets whether `build` seeds empty collections.
    pub fn seed(mut self, seed: bool) -> Self {
        self.config.seed = seed;
        self
    }

    /// Creates the collections and, if configured, seeds them.
    ///
    /// # Errors
    ///
    /// Returns an error if both collections are given the same name, or if seeding fails.
    pub async fn build(self) -> DocumentStoreResult<Database> {
        if self.config.activities_collection == self.config.teachers_collection {
            return Err(DocumentStoreError::Initialization(format!(
                "activities and teachers must use distinct collections, both named {}",
                self.config.activities_collection,
            )));
        }

        let database = Database {
            activities: SharedCollection::builder(self.config.activities_collection.as_str())
                .build()
                .await?,
            teachers: SharedCollection::builder(self.config.teachers_collection.as_str())
                .build()
                .await?,
            config: self.config,
        };

        if database.config.seed {
            database.init().await?;
        } else {
            debug!("seeding disabled, database starts empty");
        }

        Ok(database)
    }
}
