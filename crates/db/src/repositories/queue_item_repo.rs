//! Repository for the `queue_items` table.
//!
//! Items are never deleted or reassigned; completion is a one-way flag.

use sqlx::PgExecutor;
use tunely_core::types::DbId;

use crate::models::queue_item::{NewQueueItem, QueueItem};

/// Column list for `queue_items` queries.
const COLUMNS: &str = "id, session_id, song_title, tip_amount, requester_name, \
                       completed, completed_at, created_at";

/// Serving order. Must agree with `tunely_core::priority::tip_priority`.
const PRIORITY_ORDER: &str = "tip_amount DESC, created_at ASC, id ASC";

/// Provides admission, completion and snapshot queries for song requests.
pub struct QueueItemRepo;

impl QueueItemRepo {
    /// Insert a request into a session. The caller is responsible for
    /// having checked (and share-locked) that the session is active.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        session_id: DbId,
        input: &NewQueueItem,
    ) -> Result<QueueItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO queue_items (session_id, song_title, tip_amount, requester_name) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueueItem>(&query)
            .bind(session_id)
            .bind(&input.song_title)
            .bind(input.tip_amount)
            .bind(&input.requester_name)
            .fetch_one(executor)
            .await
    }

    /// Find a request by id.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<QueueItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM queue_items WHERE id = $1");
        sqlx::query_as::<_, QueueItem>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a request by id and row-lock it for a completion attempt.
    pub async fn find_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<QueueItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM queue_items WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, QueueItem>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Mark a live request completed.
    ///
    /// Returns `None` if it was already completed, so a request can only be
    /// completed once even without a surrounding lock.
    pub async fn mark_completed<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<QueueItem>, sqlx::Error> {
        let query = format!(
            "UPDATE queue_items \
             SET completed = true, completed_at = NOW() \
             WHERE id = $1 AND NOT completed \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QueueItem>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// All non-completed requests of a session in serving order.
    pub async fn list_live<'e>(
        executor: impl PgExecutor<'e>,
        session_id: DbId,
    ) -> Result<Vec<QueueItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM queue_items \
             WHERE session_id = $1 AND NOT completed \
             ORDER BY {PRIORITY_ORDER}"
        );
        sqlx::query_as::<_, QueueItem>(&query)
            .bind(session_id)
            .fetch_all(executor)
            .await
    }
}
