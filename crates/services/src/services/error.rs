//! Error type shared by the entity services.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("{entity} with name {name} not found")]
    NameNotFound { entity: &'static str, name: String },
    #[error("conflict: {0}")]
    Conflict(String),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Turn unique-constraint violations into `Conflict`, pass everything else through
    pub fn from_write(err: sqlx::Error, what: &str) -> Self {
        let is_unique = err
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());
        if is_unique {
            Self::Conflict(format!("{what} already exists"))
        } else {
            Self::Database(err)
        }
    }
}

/// Ids are positive; anything else is rejected before touching storage.
pub fn ensure_valid_id(id: i64) -> Result<(), ServiceError> {
    if id < 1 {
        return Err(ServiceError::InvalidArgument(format!(
            "id must be positive, got {id}"
        )));
    }
    Ok(())
}

pub fn ensure_not_blank(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidArgument(format!("{field} must not be blank")));
    }
    Ok(())
}
