use crate::model::EntityKind;
use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A write collided with a unique index
    #[error("{entity}.{field} must be unique")]
    UniqueViolation {
        entity: EntityKind,
        field: &'static str,
    },
    /// Connection, query or decoding failure in the backend
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }
}
