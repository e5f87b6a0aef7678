//! Performance session model.

use serde::Serialize;
use sqlx::FromRow;
use tunely_core::types::{Cents, DbId, Timestamp};

/// A session row from the `sessions` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Session {
    pub id: DbId,
    pub artist_id: DbId,
    pub active: bool,
    pub start_time: Timestamp,
    /// `None` while the session is active.
    pub end_time: Option<Timestamp>,
    /// Sum of every tip ever admitted. Zero until the session ends.
    pub total_earnings: Cents,
}

/// Result of starting a session: the new one, plus the one it replaced.
#[derive(Debug, Clone)]
pub struct SessionHandover {
    pub started: Session,
    /// The artist's previously active session, ended and finalized.
    pub closed: Option<Session>,
}
