use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed input or a violated business rule.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// Storage-level integrity violation (unique or foreign key), carrying the driver message.
    #[error("constraint violation: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn user_not_found(id: i64) -> Self { Self::NotFound(format!("User not found with id: {id}")) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Conflict(_) => 1002,
            ServiceError::Db(_) => 1200,
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(msg))
            | Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(msg)) => ServiceError::Conflict(msg),
            _ => ServiceError::Db(e.to_string()),
        }
    }
}
