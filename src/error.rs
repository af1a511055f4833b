use itertools::Itertools;
use std::fmt;
use thiserror::Error;

use crate::logic::validate::{FieldViolation, ValidationErrors, ViolationKind};
use crate::model::{EntityKind, Id};
use crate::store::StoreError;

pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// One side of a relation mutation that could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingRecord {
    pub entity: EntityKind,
    pub id: Id,
}

impl fmt::Display for MissingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.entity, self.id)
    }
}

/// Failures raised by the model and association layers. The controller
/// passes them through untouched; the HTTP adapter decides the status code.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("{entity} not found: {key}")]
    NotFound { entity: EntityKind, key: String },

    #[error("Cannot associate records, missing {}", .missing.iter().join(" and "))]
    Association { missing: Vec<MissingRecord> },

    /// The row moved past the version the caller loaded
    #[error("{entity} {id} was modified concurrently: expected version {expected}, found {found}")]
    Conflict {
        entity: EntityKind,
        id: Id,
        expected: i32,
        found: i32,
    },

    #[error(transparent)]
    Store(StoreError),
}

impl ModelError {
    pub fn not_found(entity: EntityKind, key: impl ToString) -> Self {
        ModelError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ModelError::NotFound { .. })
    }
}

impl From<StoreError> for ModelError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { entity, field } => ModelError::Validation(
                ValidationErrors::single(entity, FieldViolation::new(field, ViolationKind::Unique)),
            ),
            other => ModelError::Store(other),
        }
    }
}
