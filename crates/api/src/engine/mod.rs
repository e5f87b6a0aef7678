//! Session and queue rules on top of the entity store.
//!
//! Handlers call these instead of the store directly. Each operation
//! validates its input, performs one atomic store step, logs it and, once
//! the write has committed, publishes the matching [`QueueEvent`].
//!
//! [`QueueEvent`]: tunely_events::QueueEvent

pub mod queue;
pub mod session;

pub use queue::{QueueEngine, QueueSnapshot};
pub use session::SessionManager;
