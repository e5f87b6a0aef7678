//! Request admission, the live queue and completion.

use std::sync::Arc;

use serde::Serialize;
use tunely_core::error::CoreError;
use tunely_core::priority::{apply_limit, snapshot_limit, total_tips};
use tunely_core::request::SongRequest;
use tunely_core::types::{Cents, DbId};
use tunely_db::models::queue_item::{Completion, NewQueueItem, QueueItem};
use tunely_db::EntityStore;
use tunely_events::{EventBus, EventKind, QueueEvent};

use crate::error::AppResult;

/// The non-completed items of an active session in serving order.
///
/// `total_value` and `queued_count` cover the whole live queue even when
/// `items` has been truncated.
#[derive(Debug, Clone, Serialize)]
pub struct QueueSnapshot {
    pub session_id: DbId,
    pub items: Vec<QueueItem>,
    pub total_value: Cents,
    pub queued_count: usize,
}

/// Admits requests into sessions and serves them in tip-priority order.
#[derive(Clone)]
pub struct QueueEngine {
    store: Arc<dyn EntityStore>,
    events: Arc<EventBus>,
}

impl QueueEngine {
    pub fn new(store: Arc<dyn EntityStore>, events: Arc<EventBus>) -> Self {
        Self { store, events }
    }

    /// Admit a paid request into an active session.
    ///
    /// A closed or unknown session is reported as
    /// [`CoreError::SessionClosed`] before the payload is looked at. The
    /// store assigns the creation timestamp.
    pub async fn admit(&self, session_id: DbId, request: SongRequest) -> AppResult<QueueItem> {
        let open = self
            .store
            .find_session(session_id)
            .await?
            .is_some_and(|s| s.active);
        if !open {
            return Err(CoreError::SessionClosed(session_id).into());
        }

        let request = request.normalize()?;

        // The session may have ended since the check above.
        let item = self
            .store
            .insert_item(session_id, &NewQueueItem::from(request))
            .await?
            .ok_or(CoreError::SessionClosed(session_id))?;

        tracing::info!(
            session_id,
            item_id = item.id,
            tip_amount = item.tip_amount,
            "Request admitted",
        );
        self.events.publish(
            QueueEvent::new(EventKind::RequestAdmitted, session_id)
                .with_item(item.id)
                .with_payload(serde_json::json!({ "tip_amount": item.tip_amount })),
        );
        Ok(item)
    }

    /// Read the live queue of an active session, optionally truncated to
    /// the first `limit` items. A limit below one is a validation error.
    pub async fn snapshot(&self, session_id: DbId, limit: Option<i64>) -> AppResult<QueueSnapshot> {
        let limit = snapshot_limit(limit)?;
        let live = self
            .store
            .live_queue(session_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Session",
                id: session_id,
            })?;
        if !live.session.active {
            return Err(CoreError::SessionClosed(session_id).into());
        }

        let total_value = total_tips(&live.items);
        let queued_count = live.items.len();
        let mut items = live.items;
        apply_limit(&mut items, limit);

        Ok(QueueSnapshot {
            session_id,
            items,
            total_value,
            queued_count,
        })
    }

    /// Sum of tips still waiting in the session's queue.
    pub async fn total_value(&self, session_id: DbId) -> AppResult<Cents> {
        Ok(self.snapshot(session_id, None).await?.total_value)
    }

    /// Mark an item as performed on behalf of `actor`.
    ///
    /// Missing and already completed items are both [`CoreError::NotFound`];
    /// completion never happens twice.
    pub async fn complete(&self, item_id: DbId, actor: DbId) -> AppResult<QueueItem> {
        let not_found = || CoreError::NotFound {
            entity: "QueueItem",
            id: item_id,
        };

        let item = self.store.find_item(item_id).await?.ok_or_else(not_found)?;
        let owner = self
            .store
            .find_session(item.session_id)
            .await?
            .map(|s| s.artist_id);
        if owner != Some(actor) {
            return Err(CoreError::Forbidden(format!(
                "queue item {item_id} belongs to another artist's session"
            ))
            .into());
        }

        let done = match self.store.complete_item(item_id).await? {
            Completion::Completed(done) => done,
            Completion::Missing | Completion::AlreadyCompleted => return Err(not_found().into()),
            Completion::SessionClosed(session_id) => {
                return Err(CoreError::SessionClosed(session_id).into())
            }
        };

        tracing::info!(
            artist_id = actor,
            session_id = done.session_id,
            item_id,
            "Request completed",
        );
        self.events.publish(
            QueueEvent::new(EventKind::ItemCompleted, done.session_id)
                .with_item(item_id)
                .with_actor(actor),
        );
        Ok(done)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
