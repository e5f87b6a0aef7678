//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! Events are published only after the corresponding store write has
//! committed, so a subscriber never hears about state a poll could not see.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tunely_core::types::DbId;

// ---------------------------------------------------------------------------
// QueueEvent
// ---------------------------------------------------------------------------

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "session.started")]
    SessionStarted,
    #[serde(rename = "session.ended")]
    SessionEnded,
    #[serde(rename = "request.admitted")]
    RequestAdmitted,
    #[serde(rename = "item.completed")]
    ItemCompleted,
}

impl EventKind {
    /// Dot-separated event name, e.g. `"session.started"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SessionStarted => "session.started",
            Self::SessionEnded => "session.ended",
            Self::RequestAdmitted => "request.admitted",
            Self::ItemCompleted => "item.completed",
        }
    }
}

/// A session or queue change.
///
/// Constructed via [`QueueEvent::new`] and enriched with
/// [`with_item`](QueueEvent::with_item), [`with_actor`](QueueEvent::with_actor)
/// and [`with_payload`](QueueEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEvent {
    pub kind: EventKind,

    /// The session the event belongs to.
    pub session_id: DbId,

    /// The queue item involved, for request and completion events.
    pub item_id: Option<DbId>,

    /// The artist that triggered the event. `None` for audience actions.
    pub actor_artist_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl QueueEvent {
    pub fn new(kind: EventKind, session_id: DbId) -> Self {
        Self {
            kind,
            session_id,
            item_id: None,
            actor_artist_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_item(mut self, item_id: DbId) -> Self {
        self.item_id = Some(item_id);
        self
    }

    pub fn with_actor(mut self, artist_id: DbId) -> Self {
        self.actor_artist_id = Some(artist_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use tunely_events::bus::{EventBus, EventKind, QueueEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(QueueEvent::new(EventKind::SessionStarted, 1));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<QueueEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: QueueEvent) {
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
