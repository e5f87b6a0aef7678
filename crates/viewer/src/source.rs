//! Poll source over one session's queue.

use tunely_core::types::DbId;
use tunely_core::viewer::{SnapshotSource, ViewState, ViewerRole};

use crate::client::{ApiClient, QueueSnapshotView};
use crate::error::ViewerError;

/// Fetches the snapshot a given role is allowed to see.
///
/// Each fetch is a fresh read; nothing is carried over between polls.
pub struct SessionSource {
    client: ApiClient,
    session_id: DbId,
    role: ViewerRole,
}

impl SessionSource {
    pub fn new(client: ApiClient, session_id: DbId, role: ViewerRole) -> Self {
        Self {
            client,
            session_id,
            role,
        }
    }

    pub fn session_id(&self) -> DbId {
        self.session_id
    }
}

impl SnapshotSource for SessionSource {
    type View = QueueSnapshotView;
    type Error = ViewerError;

    async fn fetch(&self) -> Result<ViewState<QueueSnapshotView>, ViewerError> {
        self.client
            .snapshot(self.session_id, self.role.snapshot_limit())
            .await
    }
}
