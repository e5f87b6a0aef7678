//! The performer dashboard: everything the artist's own view polls for in
//! one response.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tunely_core::error::CoreError;
use tunely_db::models::artist::Artist;
use tunely_db::models::session::Session;

use crate::engine::QueueSnapshot;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthArtist;
use crate::response::DataResponse;
use crate::state::AppState;

/// Audience-facing links for an artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareUrls {
    /// Page where the audience submits requests.
    pub request_url: String,
    /// Public display of the top of the queue.
    pub display_url: String,
}

/// Build the share links for `handle` under `base_url`.
pub fn share_urls(base_url: &str, handle: &str) -> ShareUrls {
    let base = base_url.trim_end_matches('/');
    ShareUrls {
        request_url: format!("{base}/{handle}"),
        display_url: format!("{base}/{handle}/live"),
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub artist: Artist,
    pub session: Option<Session>,
    /// Full live queue; `None` when no session is active.
    pub queue: Option<QueueSnapshot>,
    pub share: ShareUrls,
}

/// GET /api/v1/me/dashboard
pub async fn get(
    State(state): State<AppState>,
    auth: AuthArtist,
) -> AppResult<Json<DataResponse<DashboardResponse>>> {
    let artist = state
        .store
        .find_artist(auth.artist_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Artist",
            id: auth.artist_id,
        })?;

    let mut session = state.sessions.active_for(artist.id).await?;
    let queue = match session.as_ref().map(|s| s.id) {
        Some(session_id) => match state.queue.snapshot(session_id, None).await {
            Ok(snapshot) => Some(snapshot),
            // Ended between the two reads.
            Err(AppError::Core(CoreError::SessionClosed(_))) => {
                session = None;
                None
            }
            Err(e) => return Err(e),
        },
        None => None,
    };

    let share = share_urls(&state.config.public_base_url, &artist.handle);
    Ok(Json(DataResponse {
        data: DashboardResponse {
            artist,
            session,
            queue,
            share,
        },
    }))
}
