//! Resource controllers. Each request resolves to exactly one terminal
//! outcome: the persisted entity or a `ModelError` passed through as-is.

pub mod articles;
pub mod pokemon;
pub mod trainers;
pub mod users;

pub use articles::*;
pub use pokemon::*;
pub use trainers::*;
pub use users::*;

pub const CREATED_MESSAGE: &str = "Created successfully";
pub const UPDATED_MESSAGE: &str = "Updated successfully";

/// A successful write together with the acknowledgement message.
#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledged<T> {
    pub message: &'static str,
    pub entity: T,
}

impl<T> Acknowledged<T> {
    pub fn created(entity: T) -> Self {
        Self {
            message: CREATED_MESSAGE,
            entity,
        }
    }

    pub fn updated(entity: T) -> Self {
        Self {
            message: UPDATED_MESSAGE,
            entity,
        }
    }
}
