//! Event logging service.
//!
//! [`EventLogger`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! records every received [`QueueEvent`] as a structured `tracing` event. It
//! runs as a long-lived background task and shuts down when the bus sender
//! is dropped.

use tokio::sync::broadcast;

use crate::bus::QueueEvent;

/// Background service that logs queue events.
pub struct EventLogger;

impl EventLogger {
    /// Run the logging loop until the channel closes.
    ///
    /// Returns the number of events logged.
    pub async fn run(mut receiver: broadcast::Receiver<QueueEvent>) -> u64 {
        let mut logged = 0u64;
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    Self::record(&event);
                    logged += 1;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event logger lagged, some events were not logged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!(logged, "Event bus closed, event logger shutting down");
                    return logged;
                }
            }
        }
    }

    fn record(event: &QueueEvent) {
        tracing::info!(
            target: "tunely_events",
            event = event.kind.as_str(),
            session_id = event.session_id,
            item_id = ?event.item_id,
            actor_artist_id = ?event.actor_artist_id,
            payload = %event.payload,
            "Queue event",
        );
    }
}
