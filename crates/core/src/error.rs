use crate::types::DbId;
use crate::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// The record exists but already carries a tombstone.
    #[error("{entity} with id {id} is already deleted")]
    AlreadyDeleted { entity: &'static str, id: DbId },

    /// Request body or query string could not be decoded (bad JSON, wrong types).
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// An enum-valued field carried a string outside the closed set.
    #[error("Invalid {field} value: '{value}'")]
    InvalidEnumValue { field: &'static str, value: String },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The storage backend could not be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
