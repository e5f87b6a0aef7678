//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped with `clamp_limit` / `clamp_offset` before they reach
/// the store.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Snapshot truncation (`?limit=`). Absent means the whole queue; zero or
/// negative is rejected by the queue engine.
#[derive(Debug, Default, Deserialize)]
pub struct SnapshotParams {
    pub limit: Option<i64>,
}
