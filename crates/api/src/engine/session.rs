//! Session lifecycle: one active session per artist.

use std::sync::Arc;

use tunely_core::error::CoreError;
use tunely_core::types::DbId;
use tunely_db::models::session::{Session, SessionHandover};
use tunely_db::EntityStore;
use tunely_events::{EventBus, EventKind, QueueEvent};

use crate::error::AppResult;

/// Starts, ends and looks up performance sessions.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn EntityStore>,
    events: Arc<EventBus>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn EntityStore>, events: Arc<EventBus>) -> Self {
        Self { store, events }
    }

    /// Start a new session for `artist_id`, ending and finalizing the one it
    /// replaces. Overlapping starts for one artist are serialized by the
    /// store, so exactly one session is active afterwards.
    pub async fn start(&self, artist_id: DbId) -> AppResult<SessionHandover> {
        if self.store.find_artist(artist_id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: "Artist",
                id: artist_id,
            }
            .into());
        }

        let handover = self.store.start_session(artist_id).await?;

        if let Some(closed) = &handover.closed {
            tracing::info!(
                artist_id,
                session_id = closed.id,
                total_earnings = closed.total_earnings,
                "Previous session ended by restart",
            );
            self.publish_ended(closed, artist_id);
        }
        tracing::info!(artist_id, session_id = handover.started.id, "Session started");
        self.events.publish(
            QueueEvent::new(EventKind::SessionStarted, handover.started.id).with_actor(artist_id),
        );

        Ok(handover)
    }

    /// End an active session on behalf of `actor`.
    ///
    /// Fails with [`CoreError::NotActive`] if the session does not exist or
    /// has already ended, and [`CoreError::Forbidden`] if `actor` does not
    /// own it.
    pub async fn end(&self, session_id: DbId, actor: DbId) -> AppResult<Session> {
        let session = self
            .store
            .find_session(session_id)
            .await?
            .ok_or(CoreError::NotActive(session_id))?;
        if session.artist_id != actor {
            return Err(CoreError::Forbidden(format!(
                "session {session_id} belongs to another artist"
            ))
            .into());
        }

        let ended = self
            .store
            .end_session(session_id)
            .await?
            .ok_or(CoreError::NotActive(session_id))?;

        tracing::info!(
            artist_id = actor,
            session_id,
            total_earnings = ended.total_earnings,
            "Session ended",
        );
        self.publish_ended(&ended, actor);
        Ok(ended)
    }

    /// The artist's active session, if any.
    pub async fn active_for(&self, artist_id: DbId) -> AppResult<Option<Session>> {
        Ok(self.store.find_active_session(artist_id).await?)
    }

    /// The artist's sessions, newest first.
    pub async fn history(&self, artist_id: DbId, limit: i64, offset: i64) -> AppResult<Vec<Session>> {
        Ok(self.store.list_sessions(artist_id, limit, offset).await?)
    }

    fn publish_ended(&self, session: &Session, actor: DbId) {
        self.events.publish(
            QueueEvent::new(EventKind::SessionEnded, session.id)
                .with_actor(actor)
                .with_payload(serde_json::json!({
                    "total_earnings": session.total_earnings,
                })),
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
