//! Typed documents and the static seed data used to populate an empty database.
//!
//! The seed data ships as JSON next to the crate and is embedded at compile time.
//! Teacher seeds carry plaintext passwords; they are hashed by [`teacher_accounts`]
//! before anything reaches a collection.

use serde::{Deserialize, Serialize};

use crate::{
    credentials::hash_password,
    document::Document,
    error::{DocumentStoreError, DocumentStoreResult},
};

const ACTIVITIES_JSON: &str = include_str!("../seed/activities.json");
const TEACHERS_JSON: &str = include_str!("../seed/teachers.json");

/// When an activity meets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDetails {
    /// Weekday names, e.g. `["Monday", "Friday"]`.
    pub days: Vec<String>,
    /// Start time as `HH:MM`.
    pub start_time: String,
    /// End time as `HH:MM`.
    pub end_time: String,
}

/// An extracurricular activity, identified by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "_id")]
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub schedule_details: ScheduleDetails,
    pub max_participants: i32,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Document for Activity {
    fn id(&self) -> &str {
        &self.name
    }

    fn collection_name() -> &'static str {
        "activities"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Admin,
}

/// A staff account, identified by its username. `password` holds an Argon2 hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherAccount {
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub role: Role,
}

impl Document for TeacherAccount {
    fn id(&self) -> &str {
        &self.username
    }

    fn collection_name() -> &'static str {
        "teachers"
    }
}

/// A teacher account as written in the seed file, with a plaintext password.
#[derive(Debug, Clone, Deserialize)]
struct TeacherSeed {
    username: String,
    display_name: String,
    password: String,
    role: Role,
}

/// Returns the seed activities.
///
/// # Errors
///
/// Returns [`DocumentStoreError::Initialization`] if the embedded seed file is malformed.
pub fn activities() -> DocumentStoreResult<Vec<Activity>> {
    serde_json::from_str(ACTIVITIES_JSON)
        .map_err(|e| DocumentStoreError::Initialization(format!("invalid activities seed: {e}")))
}

/// Returns the seed teacher accounts with their passwords hashed.
///
/// # Errors
///
/// Returns [`DocumentStoreError::Initialization`] if the embedded seed file is malformed,
/// or [`DocumentStoreError::Credential`] if hashing fails.
pub fn teacher_accounts() -> DocumentStoreResult<Vec<TeacherAccount>> {
    let seeds: Vec<TeacherSeed> = serde_json::from_str(TEACHERS_JSON)
        .map_err(|e| DocumentStoreError::Initialization(format!("invalid teachers seed: {e}")))?;

    seeds
        .into_iter()
        .map(|seed| {
            Ok(TeacherAccount {
                password: hash_password(&seed.password)?,
                username: seed.username,
                display_name: seed.display_name,
                role: seed.role,
            })
        })
        .collect()
}
