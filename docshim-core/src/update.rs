//! Update operator parsing.
//!
//! Raw updates map an operator name to a mapping of `field -> value`:
//!
//! ```ignore
//! use docshim::update::Update;
//! use bson::doc;
//!
//! let update = Update::try_from(doc! { "$push": { "participants": "b@mergington.edu" } })?;
//!
//! let built = Update::builder()
//!     .pull("participants", "a@mergington.edu")
//!     .build();
//! ```
//!
//! Operations keep the order in which they appear: operator order first, then
//! field order within each operator.

use bson::{Bson, Document};

use crate::{
    document::kind_of,
    error::{DocumentStoreError, DocumentStoreResult},
};

/// Operator appending a value to an array field.
pub const PUSH: &str = "$push";
/// Operator removing the first equal value from an array field.
pub const PULL: &str = "$pull";

/// A single field-level mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOp {
    /// Appends `value` to the array in `field`, creating the array if absent.
    Push {
        field: String,
        value: Bson,
    },
    /// Removes the first element equal to `value` from the array in `field`.
    Pull {
        field: String,
        value: Bson,
    },
}

impl UpdateOp {
    /// Returns the field this operation targets.
    pub fn field(&self) -> &str {
        match self {
            UpdateOp::Push { field, .. } | UpdateOp::Pull { field, .. } => field,
        }
    }

    /// Returns the operator name of this operation.
    pub fn operator(&self) -> &'static str {
        match self {
            UpdateOp::Push { .. } => PUSH,
            UpdateOp::Pull { .. } => PULL,
        }
    }
}

/// An ordered sequence of update operations applied to a single document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    pub ops: Vec<UpdateOp>,
}

impl Update {
    /// Creates a new update builder for fluent construction.
    pub fn builder() -> UpdateBuilder {
        UpdateBuilder::default()
    }

    /// Returns true if the update contains no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl TryFrom<Document> for Update {
    type Error = DocumentStoreError;

    fn try_from(raw: Document) -> Result<Self, Self::Error> {
        let mut ops = Vec::new();

        for (operator, argument) in raw {
            if operator != PUSH && operator != PULL {
                return Err(DocumentStoreError::InvalidUpdate(format!(
                    "unsupported operator {operator}"
                )));
            }

            let fields = match argument {
                Bson::Document(fields) => fields,
                other => {
                    return Err(DocumentStoreError::InvalidUpdate(format!(
                        "{operator} expects a mapping of fields, got {}",
                        kind_of(&other),
                    )));
                }
            };

            ops.extend(fields.into_iter().map(|(field, value)| {
                if operator == PUSH {
                    UpdateOp::Push { field, value }
                } else {
                    UpdateOp::Pull { field, value }
                }
            }));
        }

        Ok(Update { ops })
    }
}

/// Fluent builder for [`Update`].
#[derive(Debug, Clone, Default)]
pub struct UpdateBuilder {
    update: Update,
}

impl UpdateBuilder {
    /// Appends `value` to the array in `field`.
    pub fn push(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.update.ops.push(UpdateOp::Push { field: field.into(), value: value.into() });
        self
    }

    /// Removes the first occurrence of `value` from the array in `field`.
    pub fn pull(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.update.ops.push(UpdateOp::Pull { field: field.into(), value: value.into() });
        self
    }

    /// Builds and returns the final update.
    pub fn build(self) -> Update {
        self.update
    }
}
