use crate::types::{Cents, DbId};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Artist not found: @{0}")]
    HandleNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Tip amount must be between 1 and {max} (got {0})", max = crate::request::MAX_TIP_AMOUNT)]
    InvalidAmount(Cents),

    #[error("Session {0} is not accepting requests")]
    SessionClosed(DbId),

    #[error("Session {0} is not active")]
    NotActive(DbId),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}
