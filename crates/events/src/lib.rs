//! Tunely event bus.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`QueueEvent`] -- the session/queue domain event envelope.
//! - [`EventLogger`] -- background subscriber that records every event
//!   through `tracing`.

pub mod bus;
pub mod logger;

pub use bus::{EventBus, EventKind, QueueEvent};
pub use logger::EventLogger;
