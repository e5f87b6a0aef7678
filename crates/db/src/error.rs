/// Errors surfaced by an [`EntityStore`](crate::store::EntityStore).
///
/// Conditional outcomes (session not active, item already completed) are
/// not errors at this layer; they come back as `Option` or
/// [`Completion`](crate::models::queue_item::Completion) values.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness rule was violated (duplicate handle, second active
    /// session for one artist).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

impl StoreError {
    /// Map unique violations to [`StoreError::Conflict`] with `message`;
    /// everything else stays a database error.
    pub(crate) fn from_unique(err: sqlx::Error, message: impl FnOnce(&str) -> String) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return Self::Conflict(message(constraint));
            }
        }
        Self::Database(err)
    }
}
