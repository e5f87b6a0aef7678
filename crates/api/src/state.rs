use std::sync::Arc;

use tunely_db::EntityStore;
use tunely_events::EventBus;

use crate::config::ServerConfig;
use crate::engine::{QueueEngine, SessionManager};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Durable record of artists, sessions and queue items.
    pub store: Arc<dyn EntityStore>,
    /// Server configuration (JWT settings, public base URL).
    pub config: Arc<ServerConfig>,
    pub sessions: SessionManager,
    pub queue: QueueEngine,
}

impl AppState {
    /// Wire both engines to the same store and event bus. Subscribers hold
    /// their own receivers, so the bus itself is not kept in the state.
    pub fn new(
        store: Arc<dyn EntityStore>,
        config: Arc<ServerConfig>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let sessions = SessionManager::new(Arc::clone(&store), Arc::clone(&event_bus));
        let queue = QueueEngine::new(Arc::clone(&store), event_bus);
        Self {
            store,
            config,
            sessions,
            queue,
        }
    }
}
