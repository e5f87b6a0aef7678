//! Polling viewer for Tunely sessions.
//!
//! - [`client::ApiClient`] -- typed access to the public HTTP endpoints.
//! - [`source::SessionSource`] -- a [`SnapshotSource`](tunely_core::viewer::SnapshotSource)
//!   over one session's queue.
//! - [`render`] -- plain-text rendering of a snapshot for each viewer role.

pub mod client;
pub mod error;
pub mod render;
pub mod source;
