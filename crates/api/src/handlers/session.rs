//! Handlers for starting, ending and listing the caller's sessions.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tunely_core::paging::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use tunely_core::types::DbId;
use tunely_db::models::session::Session;

use crate::error::AppResult;
use crate::middleware::auth::AuthArtist;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for POST /sessions.
#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session: Session,
    /// The session this start replaced, finalized.
    pub closed_session: Option<Session>,
}

/// POST /api/v1/sessions
pub async fn start(
    State(state): State<AppState>,
    auth: AuthArtist,
) -> AppResult<(StatusCode, Json<DataResponse<StartSessionResponse>>)> {
    let handover = state.sessions.start(auth.artist_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: StartSessionResponse {
                session: handover.started,
                closed_session: handover.closed,
            },
        }),
    ))
}

/// POST /api/v1/sessions/{id}/end
pub async fn end(
    State(state): State<AppState>,
    auth: AuthArtist,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Session>>> {
    let session = state.sessions.end(id, auth.artist_id).await?;
    Ok(Json(DataResponse { data: session }))
}

/// GET /api/v1/me/session
pub async fn my_session(
    State(state): State<AppState>,
    auth: AuthArtist,
) -> AppResult<Json<DataResponse<Option<Session>>>> {
    let session = state.sessions.active_for(auth.artist_id).await?;
    Ok(Json(DataResponse { data: session }))
}

/// GET /api/v1/me/sessions
///
/// Newest first. Ended sessions carry their finalized earnings.
pub async fn my_sessions(
    State(state): State<AppState>,
    auth: AuthArtist,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> AppResult<Json<DataResponse<Vec<Session>>>> {
    let Query(params) = params?;
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let sessions = state.sessions.history(auth.artist_id, limit, offset).await?;
    Ok(Json(DataResponse { data: sessions }))
}
