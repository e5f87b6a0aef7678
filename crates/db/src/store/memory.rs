//! In-process [`EntityStore`] for local development and tests.
//!
//! All state sits behind one `RwLock`: writers are fully serialized (which
//! covers the per-artist start/end requirement), readers share the lock and
//! always observe a state between two complete writes.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tunely_core::priority::sort_by_priority;
use tunely_core::types::{Cents, DbId, Timestamp};

use super::EntityStore;
use crate::error::StoreError;
use crate::models::artist::{Artist, CreateArtist};
use crate::models::queue_item::{Completion, LiveQueue, NewQueueItem, QueueItem};
use crate::models::session::{Session, SessionHandover};

#[derive(Default)]
struct State {
    artists: HashMap<DbId, Artist>,
    sessions: BTreeMap<DbId, Session>,
    items: BTreeMap<DbId, QueueItem>,
    next_session_id: DbId,
    next_item_id: DbId,
    /// Last `created_at` handed out; item timestamps never go backwards.
    last_item_at: Option<Timestamp>,
}

impl State {
    fn earnings(&self, session_id: DbId) -> Cents {
        self.items
            .values()
            .filter(|i| i.session_id == session_id)
            .fold(0, |total: Cents, i| total.saturating_add(i.tip_amount))
    }

    /// End an active session in place. Returns the finalized row.
    fn finalize(&mut self, session_id: DbId) -> Option<Session> {
        let total = self.earnings(session_id);
        let session = self.sessions.get_mut(&session_id).filter(|s| s.active)?;
        session.active = false;
        session.end_time = Some(Utc::now());
        session.total_earnings = total;
        Some(session.clone())
    }

    fn active_for(&self, artist_id: DbId) -> Option<&Session> {
        self.sessions
            .values()
            .find(|s| s.artist_id == artist_id && s.active)
    }

    fn is_active(&self, session_id: DbId) -> bool {
        self.sessions.get(&session_id).is_some_and(|s| s.active)
    }

    fn next_item_timestamp(&mut self) -> Timestamp {
        let now = Utc::now();
        let at = match self.last_item_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_item_at = Some(at);
        at
    }
}

/// Entity store held entirely in memory. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_artist(&self, input: &CreateArtist) -> Result<Artist, StoreError> {
        let mut state = self.state.write().await;

        if state.artists.contains_key(&input.id) {
            return Err(StoreError::Conflict(format!(
                "artist {} already has a profile",
                input.id
            )));
        }
        if state.artists.values().any(|a| a.handle == input.handle) {
            return Err(StoreError::Conflict(format!(
                "handle '{}' is already taken",
                input.handle
            )));
        }

        let now = Utc::now();
        let artist = Artist {
            id: input.id,
            handle: input.handle.clone(),
            display_name: input.display_name.clone(),
            subscribed: false,
            created_at: now,
            updated_at: now,
        };
        state.artists.insert(artist.id, artist.clone());
        Ok(artist)
    }

    async fn find_artist(&self, id: DbId) -> Result<Option<Artist>, StoreError> {
        Ok(self.state.read().await.artists.get(&id).cloned())
    }

    async fn find_artist_by_handle(&self, handle: &str) -> Result<Option<Artist>, StoreError> {
        let state = self.state.read().await;
        Ok(state.artists.values().find(|a| a.handle == handle).cloned())
    }

    async fn find_session(&self, id: DbId) -> Result<Option<Session>, StoreError> {
        Ok(self.state.read().await.sessions.get(&id).cloned())
    }

    async fn find_active_session(&self, artist_id: DbId) -> Result<Option<Session>, StoreError> {
        Ok(self.state.read().await.active_for(artist_id).cloned())
    }

    async fn list_sessions(
        &self,
        artist_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Session>, StoreError> {
        let state = self.state.read().await;
        // Ids grow with start time, so reverse id order is newest first.
        Ok(state
            .sessions
            .values()
            .rev()
            .filter(|s| s.artist_id == artist_id)
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn start_session(&self, artist_id: DbId) -> Result<SessionHandover, StoreError> {
        let mut state = self.state.write().await;

        let previous = state.active_for(artist_id).map(|s| s.id);
        let closed = previous.and_then(|id| state.finalize(id));

        state.next_session_id += 1;
        let started = Session {
            id: state.next_session_id,
            artist_id,
            active: true,
            start_time: Utc::now(),
            end_time: None,
            total_earnings: 0,
        };
        state.sessions.insert(started.id, started.clone());

        Ok(SessionHandover { started, closed })
    }

    async fn end_session(&self, session_id: DbId) -> Result<Option<Session>, StoreError> {
        Ok(self.state.write().await.finalize(session_id))
    }

    async fn insert_item(
        &self,
        session_id: DbId,
        input: &NewQueueItem,
    ) -> Result<Option<QueueItem>, StoreError> {
        let mut state = self.state.write().await;
        if !state.is_active(session_id) {
            return Ok(None);
        }

        state.next_item_id += 1;
        let item = QueueItem {
            id: state.next_item_id,
            session_id,
            song_title: input.song_title.clone(),
            tip_amount: input.tip_amount,
            requester_name: input.requester_name.clone(),
            completed: false,
            completed_at: None,
            created_at: state.next_item_timestamp(),
        };
        state.items.insert(item.id, item.clone());
        Ok(Some(item))
    }

    async fn find_item(&self, id: DbId) -> Result<Option<QueueItem>, StoreError> {
        Ok(self.state.read().await.items.get(&id).cloned())
    }

    async fn complete_item(&self, id: DbId) -> Result<Completion, StoreError> {
        let mut state = self.state.write().await;

        let Some(item) = state.items.get(&id) else {
            return Ok(Completion::Missing);
        };
        if item.completed {
            return Ok(Completion::AlreadyCompleted);
        }
        let session_id = item.session_id;
        if !state.is_active(session_id) {
            return Ok(Completion::SessionClosed(session_id));
        }

        let Some(item) = state.items.get_mut(&id) else {
            return Ok(Completion::Missing);
        };
        item.completed = true;
        item.completed_at = Some(Utc::now());
        Ok(Completion::Completed(item.clone()))
    }

    async fn live_queue(&self, session_id: DbId) -> Result<Option<LiveQueue>, StoreError> {
        let state = self.state.read().await;
        let Some(session) = state.sessions.get(&session_id).cloned() else {
            return Ok(None);
        };

        let mut items: Vec<QueueItem> = state
            .items
            .values()
            .filter(|i| i.session_id == session_id && !i.completed)
            .cloned()
            .collect();
        sort_by_priority(&mut items);

        Ok(Some(LiveQueue { session, items }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn artist(id: DbId, handle: &str) -> CreateArtist {
        CreateArtist {
            id,
            handle: handle.to_string(),
            display_name: handle.to_uppercase(),
        }
    }

    fn item(title: &str, tip: Cents) -> NewQueueItem {
        NewQueueItem {
            song_title: title.to_string(),
            tip_amount: tip,
            requester_name: None,
        }
    }

    #[tokio::test]
    async fn duplicate_handle_and_id_conflict() {
        let store = MemoryStore::new();
        store.create_artist(&artist(1, "nova")).await.unwrap();

        assert_matches!(
            store.create_artist(&artist(2, "nova")).await,
            Err(StoreError::Conflict(msg)) if msg.contains("nova")
        );
        assert_matches!(
            store.create_artist(&artist(1, "other")).await,
            Err(StoreError::Conflict(_))
        );
    }

    #[tokio::test]
    async fn start_replaces_active_session() {
        let store = MemoryStore::new();
        let first = store.start_session(7).await.unwrap();
        assert!(first.closed.is_none());
        store
            .insert_item(first.started.id, &item("a", 300))
            .await
            .unwrap();

        let second = store.start_session(7).await.unwrap();
        let closed = second.closed.expect("previous session should be closed");
        assert_eq!(closed.id, first.started.id);
        assert!(!closed.active);
        assert!(closed.end_time.is_some());
        assert_eq!(closed.total_earnings, 300);

        let active = store.find_active_session(7).await.unwrap().unwrap();
        assert_eq!(active.id, second.started.id);
    }

    #[tokio::test]
    async fn insert_into_ended_session_writes_nothing() {
        let store = MemoryStore::new();
        let session = store.start_session(1).await.unwrap().started;
        store.end_session(session.id).await.unwrap();

        assert!(store
            .insert_item(session.id, &item("late", 500))
            .await
            .unwrap()
            .is_none());
        assert!(store.insert_item(999, &item("nowhere", 500)).await.unwrap().is_none());
        assert!(store.find_item(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn timestamps_are_non_decreasing() {
        let store = MemoryStore::new();
        let session = store.start_session(1).await.unwrap().started;
        let mut last = None;
        for i in 0..50 {
            let it = store
                .insert_item(session.id, &item("s", 100 + i))
                .await
                .unwrap()
                .unwrap();
            if let Some(prev) = last {
                assert!(it.created_at >= prev);
            }
            last = Some(it.created_at);
        }
    }

    #[tokio::test]
    async fn completion_outcomes() {
        let store = MemoryStore::new();
        let session = store.start_session(1).await.unwrap().started;
        let it = store
            .insert_item(session.id, &item("a", 100))
            .await
            .unwrap()
            .unwrap();

        assert_matches!(store.complete_item(it.id).await.unwrap(), Completion::Completed(done) if done.completed);
        assert_matches!(store.complete_item(it.id).await.unwrap(), Completion::AlreadyCompleted);
        assert_matches!(store.complete_item(42).await.unwrap(), Completion::Missing);

        let other = store
            .insert_item(session.id, &item("b", 100))
            .await
            .unwrap()
            .unwrap();
        store.end_session(session.id).await.unwrap();
        assert_matches!(
            store.complete_item(other.id).await.unwrap(),
            Completion::SessionClosed(id) if id == session.id
        );
    }

    #[tokio::test]
    async fn oversized_tips_cannot_block_ending_or_restarting() {
        let store = MemoryStore::new();
        let session = store.start_session(1).await.unwrap().started;
        let huge = i64::MAX / 2 + 1;
        for title in ["a", "b"] {
            store
                .insert_item(session.id, &item(title, huge))
                .await
                .unwrap()
                .unwrap();
        }

        let handover = store.start_session(1).await.unwrap();
        let closed = handover.closed.expect("previous session should be closed");
        assert_eq!(closed.total_earnings, i64::MAX);

        let ended = store.end_session(handover.started.id).await.unwrap().unwrap();
        assert_eq!(ended.total_earnings, 0);
        assert!(store.find_active_session(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn history_is_newest_first_and_paged() {
        let store = MemoryStore::new();
        for _ in 0..3 {
            store.start_session(5).await.unwrap();
        }
        store.start_session(6).await.unwrap();

        let page = store.list_sessions(5, 2, 0).await.unwrap();
        assert_eq!(page.len(), 2);
        assert!(page[0].id > page[1].id);
        assert!(page[0].active);

        let rest = store.list_sessions(5, 2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert!(!rest[0].active);
    }
}
