//! [`EntityStore`] backed by PostgreSQL.
//!
//! Locking protocol:
//!
//! - start/end take `pg_advisory_xact_lock(artist_id)`, then `FOR UPDATE` the
//!   session row before finalizing it;
//! - admission takes `FOR SHARE` on the session row for the length of the
//!   insert, so an end waits for in-flight admissions and its earnings sum
//!   (a later statement, hence a fresh READ COMMITTED snapshot) includes them;
//! - snapshots read in a `REPEATABLE READ, READ ONLY` transaction, which never
//!   blocks and sees one committed state for both the session and its items.

use async_trait::async_trait;
use tunely_core::types::DbId;

use super::EntityStore;
use crate::error::StoreError;
use crate::models::artist::{Artist, CreateArtist};
use crate::models::queue_item::{Completion, LiveQueue, NewQueueItem, QueueItem};
use crate::models::session::{Session, SessionHandover};
use crate::repositories::{ArtistRepo, QueueItemRepo, SessionRepo};
use crate::DbPool;

/// Postgres-backed entity store. Cheap to clone.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn create_artist(&self, input: &CreateArtist) -> Result<Artist, StoreError> {
        ArtistRepo::create(&self.pool, input)
            .await
            .map_err(|e| {
                StoreError::from_unique(e, |constraint| {
                    if constraint == "uq_artists_handle" {
                        format!("handle '{}' is already taken", input.handle)
                    } else {
                        format!("artist {} already has a profile", input.id)
                    }
                })
            })
    }

    async fn find_artist(&self, id: DbId) -> Result<Option<Artist>, StoreError> {
        Ok(ArtistRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_artist_by_handle(&self, handle: &str) -> Result<Option<Artist>, StoreError> {
        Ok(ArtistRepo::find_by_handle(&self.pool, handle).await?)
    }

    async fn find_session(&self, id: DbId) -> Result<Option<Session>, StoreError> {
        Ok(SessionRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_active_session(&self, artist_id: DbId) -> Result<Option<Session>, StoreError> {
        Ok(SessionRepo::find_active_for_artist(&self.pool, artist_id).await?)
    }

    async fn list_sessions(
        &self,
        artist_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Session>, StoreError> {
        Ok(SessionRepo::list_for_artist(&self.pool, artist_id, limit, offset).await?)
    }

    async fn start_session(&self, artist_id: DbId) -> Result<SessionHandover, StoreError> {
        let mut tx = self.pool.begin().await?;
        SessionRepo::acquire_artist_lock(&mut *tx, artist_id).await?;

        let closed = match SessionRepo::lock_active_for_artist(&mut *tx, artist_id).await? {
            Some(previous_id) => {
                tracing::debug!(artist_id, previous_id, "Finalizing replaced session");
                SessionRepo::finalize(&mut *tx, previous_id).await?
            }
            None => None,
        };

        let started = SessionRepo::create_active(&mut *tx, artist_id)
            .await
            .map_err(|e| {
                StoreError::from_unique(e, |_| {
                    format!("artist {artist_id} already has an active session")
                })
            })?;

        tx.commit().await?;
        Ok(SessionHandover { started, closed })
    }

    async fn end_session(&self, session_id: DbId) -> Result<Option<Session>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let Some(artist_id) = SessionRepo::find_by_id(&mut *tx, session_id)
            .await?
            .filter(|s| s.active)
            .map(|s| s.artist_id)
        else {
            return Ok(None);
        };

        SessionRepo::acquire_artist_lock(&mut *tx, artist_id).await?;
        // Re-check under the lock: a concurrent start may have ended it.
        if SessionRepo::lock_if_active(&mut *tx, session_id).await?.is_none() {
            tracing::debug!(session_id, "Session ended concurrently");
            return Ok(None);
        }

        let ended = SessionRepo::finalize(&mut *tx, session_id).await?;
        tx.commit().await?;
        Ok(ended)
    }

    async fn insert_item(
        &self,
        session_id: DbId,
        input: &NewQueueItem,
    ) -> Result<Option<QueueItem>, StoreError> {
        let mut tx = self.pool.begin().await?;

        if !SessionRepo::share_if_active(&mut *tx, session_id).await? {
            return Ok(None);
        }

        let item = QueueItemRepo::insert(&mut *tx, session_id, input).await?;
        tx.commit().await?;
        Ok(Some(item))
    }

    async fn find_item(&self, id: DbId) -> Result<Option<QueueItem>, StoreError> {
        Ok(QueueItemRepo::find_by_id(&self.pool, id).await?)
    }

    async fn complete_item(&self, id: DbId) -> Result<Completion, StoreError> {
        let mut tx = self.pool.begin().await?;

        let Some(item) = QueueItemRepo::find_for_update(&mut *tx, id).await? else {
            return Ok(Completion::Missing);
        };
        if item.completed {
            return Ok(Completion::AlreadyCompleted);
        }
        if !SessionRepo::share_if_active(&mut *tx, item.session_id).await? {
            return Ok(Completion::SessionClosed(item.session_id));
        }

        let outcome = match QueueItemRepo::mark_completed(&mut *tx, id).await? {
            Some(done) => Completion::Completed(done),
            None => Completion::AlreadyCompleted,
        };
        tx.commit().await?;
        Ok(outcome)
    }

    async fn live_queue(&self, session_id: DbId) -> Result<Option<LiveQueue>, StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let Some(session) = SessionRepo::find_by_id(&mut *tx, session_id).await? else {
            return Ok(None);
        };
        let items = QueueItemRepo::list_live(&mut *tx, session_id).await?;

        tx.commit().await?;
        Ok(Some(LiveQueue { session, items }))
    }
}
