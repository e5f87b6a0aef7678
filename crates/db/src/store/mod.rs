//! The typed store interface the session and queue engines depend on.
//!
//! Every method is one atomic step against the store. Multi-row transitions
//! (ending the previous session while starting a new one, checking a session
//! is open while admitting into it) happen inside the implementation so the
//! engine never sees a half-applied state.

use async_trait::async_trait;
use tunely_core::types::DbId;

use crate::error::StoreError;
use crate::models::artist::{Artist, CreateArtist};
use crate::models::queue_item::{Completion, LiveQueue, NewQueueItem, QueueItem};
use crate::models::session::{Session, SessionHandover};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Durable record of artists, sessions and queue items.
///
/// Implementations guarantee read-your-writes for a single caller. Start and
/// end of sessions are serialized per artist.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Verify the backing store is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Insert an artist. [`StoreError::Conflict`] if the id or handle exists.
    async fn create_artist(&self, input: &CreateArtist) -> Result<Artist, StoreError>;

    async fn find_artist(&self, id: DbId) -> Result<Option<Artist>, StoreError>;

    async fn find_artist_by_handle(&self, handle: &str) -> Result<Option<Artist>, StoreError>;

    async fn find_session(&self, id: DbId) -> Result<Option<Session>, StoreError>;

    async fn find_active_session(&self, artist_id: DbId) -> Result<Option<Session>, StoreError>;

    /// An artist's sessions, newest first.
    async fn list_sessions(
        &self,
        artist_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Session>, StoreError>;

    /// End the artist's active session (if any) with finalized earnings and
    /// open a fresh one, as a single step.
    async fn start_session(&self, artist_id: DbId) -> Result<SessionHandover, StoreError>;

    /// End a session with finalized earnings. `None` if it was not active.
    async fn end_session(&self, session_id: DbId) -> Result<Option<Session>, StoreError>;

    /// Admit an item into an active session. `None` if the session is
    /// missing or no longer active; nothing is written in that case.
    async fn insert_item(
        &self,
        session_id: DbId,
        input: &NewQueueItem,
    ) -> Result<Option<QueueItem>, StoreError>;

    async fn find_item(&self, id: DbId) -> Result<Option<QueueItem>, StoreError>;

    /// Complete a live item of an active session.
    async fn complete_item(&self, id: DbId) -> Result<Completion, StoreError>;

    /// The session and its live items in serving order, read consistently.
    /// `None` if the session does not exist.
    async fn live_queue(&self, session_id: DbId) -> Result<Option<LiveQueue>, StoreError>;
}
