//! Song request (queue item) model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use tunely_core::priority::Prioritized;
use tunely_core::request::SongRequest;
use tunely_core::types::{Cents, DbId, Timestamp};

use crate::models::session::Session;

/// A request row from the `queue_items` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct QueueItem {
    pub id: DbId,
    pub session_id: DbId,
    pub song_title: String,
    pub tip_amount: Cents,
    pub requester_name: Option<String>,
    pub completed: bool,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Prioritized for QueueItem {
    fn tip_amount(&self) -> Cents {
        self.tip_amount
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn sequence(&self) -> DbId {
        self.id
    }
}

/// DTO for admitting a request. Built from an already normalized
/// [`SongRequest`]; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewQueueItem {
    pub song_title: String,
    pub tip_amount: Cents,
    pub requester_name: Option<String>,
}

impl From<SongRequest> for NewQueueItem {
    fn from(req: SongRequest) -> Self {
        Self {
            song_title: req.song_title,
            tip_amount: req.tip_amount,
            requester_name: req.requester_name,
        }
    }
}

/// A session together with its non-completed items in serving order, read
/// from one consistent point in time.
#[derive(Debug, Clone)]
pub struct LiveQueue {
    pub session: Session,
    pub items: Vec<QueueItem>,
}

/// Outcome of a completion attempt.
#[derive(Debug, Clone)]
pub enum Completion {
    /// The item was live and is now completed.
    Completed(QueueItem),
    /// No item with that id.
    Missing,
    /// The item was already completed.
    AlreadyCompleted,
    /// The item's session is no longer active.
    SessionClosed(DbId),
}
