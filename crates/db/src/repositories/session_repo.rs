//! Repository for the `sessions` table.
//!
//! The locking helpers (`acquire_artist_lock`, `lock_active_for_artist`,
//! `lock_if_active`) only make sense inside a transaction; `PgStore` calls
//! them on the transaction's connection.

use sqlx::PgExecutor;
use tunely_core::types::DbId;

use crate::models::session::Session;

/// Column list for `sessions` queries.
const COLUMNS: &str = "id, artist_id, active, start_time, end_time, total_earnings";

/// Provides lifecycle queries for performance sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Find a session by id, active or not.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find the artist's active session, if any.
    pub async fn find_active_for_artist<'e>(
        executor: impl PgExecutor<'e>,
        artist_id: DbId,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE artist_id = $1 AND active");
        sqlx::query_as::<_, Session>(&query)
            .bind(artist_id)
            .fetch_optional(executor)
            .await
    }

    /// List an artist's sessions, newest first.
    pub async fn list_for_artist<'e>(
        executor: impl PgExecutor<'e>,
        artist_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions \
             WHERE artist_id = $1 \
             ORDER BY start_time DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(artist_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// Take the transaction-scoped advisory lock that serializes session
    /// start/end for one artist. Released on commit or rollback.
    pub async fn acquire_artist_lock<'e>(
        executor: impl PgExecutor<'e>,
        artist_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(artist_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Row-lock the artist's active session, returning its id.
    ///
    /// `FOR UPDATE` waits for in-flight admissions (which hold `FOR SHARE`)
    /// to commit, so a following [`finalize`](Self::finalize) statement sees
    /// every admitted item.
    pub async fn lock_active_for_artist<'e>(
        executor: impl PgExecutor<'e>,
        artist_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM sessions WHERE artist_id = $1 AND active FOR UPDATE",
        )
        .bind(artist_id)
        .fetch_optional(executor)
        .await
    }

    /// Row-lock a session if it is still active, returning its artist id.
    pub async fn lock_if_active<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT artist_id FROM sessions WHERE id = $1 AND active FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Share-lock a session if it is active. Held by admissions so an
    /// in-progress end waits for them.
    pub async fn share_if_active<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let found = sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM sessions WHERE id = $1 AND active FOR SHARE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(found.is_some())
    }

    /// End an active session: stamp `end_time` and store the sum of every
    /// tip ever admitted to it, completed or not. The sum is taken as
    /// NUMERIC and saturates at the BIGINT maximum.
    ///
    /// Returns `None` if the session was not active.
    pub async fn finalize<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "UPDATE sessions \
             SET active = false, \
                 end_time = NOW(), \
                 total_earnings = ( \
                     SELECT LEAST(COALESCE(SUM(tip_amount), 0), 9223372036854775807)::BIGINT \
                     FROM queue_items WHERE session_id = $1 \
                 ) \
             WHERE id = $1 AND active \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Insert a new active session with zero earnings.
    pub async fn create_active<'e>(
        executor: impl PgExecutor<'e>,
        artist_id: DbId,
    ) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (artist_id, active, total_earnings) \
             VALUES ($1, true, 0) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(artist_id)
            .fetch_one(executor)
            .await
    }
}
