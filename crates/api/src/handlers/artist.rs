//! Handlers for the `/artists` resource.
//!
//! Profiles are created by the authenticated artist and looked up publicly
//! by handle, which is how the audience finds a performer.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tunely_core::error::CoreError;
use tunely_core::request::ArtistProfile;
use tunely_db::models::artist::{Artist, CreateArtist};
use tunely_db::models::session::Session;

use crate::error::AppResult;
use crate::middleware::auth::AuthArtist;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/artists
///
/// Create the caller's profile. The id comes from the token, never the body.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthArtist,
    payload: Result<Json<ArtistProfile>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Artist>>)> {
    let Json(input) = payload?;
    let profile = input.normalize()?;
    let artist = state
        .store
        .create_artist(&CreateArtist::new(auth.artist_id, profile))
        .await?;

    tracing::info!(artist_id = artist.id, handle = %artist.handle, "Artist profile created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: artist })))
}

/// GET /api/v1/artists/{handle}
pub async fn get_by_handle(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> AppResult<Json<DataResponse<Artist>>> {
    let artist = find_by_handle(&state, &handle).await?;
    Ok(Json(DataResponse { data: artist }))
}

/// GET /api/v1/artists/{handle}/session
///
/// The artist's active session, or `null` when they are not performing.
pub async fn get_active_session(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> AppResult<Json<DataResponse<Option<Session>>>> {
    let artist = find_by_handle(&state, &handle).await?;
    let session = state.sessions.active_for(artist.id).await?;
    Ok(Json(DataResponse { data: session }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_by_handle(state: &AppState, handle: &str) -> AppResult<Artist> {
    let handle = handle.trim().to_lowercase();
    let artist = state
        .store
        .find_artist_by_handle(&handle)
        .await?
        .ok_or(CoreError::HandleNotFound(handle))?;
    Ok(artist)
}
