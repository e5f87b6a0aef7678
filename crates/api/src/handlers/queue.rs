//! Handlers for a session's queue: the public snapshot and request
//! submission, and the performer's completion action.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tunely_core::request::SongRequest;
use tunely_core::types::DbId;
use tunely_db::models::queue_item::QueueItem;

use crate::engine::QueueSnapshot;
use crate::error::AppResult;
use crate::middleware::auth::AuthArtist;
use crate::query::SnapshotParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/sessions/{id}/queue
pub async fn get_queue(
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
    params: Result<Query<SnapshotParams>, QueryRejection>,
) -> AppResult<Json<DataResponse<QueueSnapshot>>> {
    let Query(params) = params?;
    let snapshot = state.queue.snapshot(session_id, params.limit).await?;
    Ok(Json(DataResponse { data: snapshot }))
}

/// POST /api/v1/sessions/{id}/requests
pub async fn submit_request(
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
    payload: Result<Json<SongRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<QueueItem>>)> {
    let Json(input) = payload?;
    let item = state.queue.admit(session_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// POST /api/v1/queue-items/{id}/complete
pub async fn complete_item(
    State(state): State<AppState>,
    auth: AuthArtist,
    Path(item_id): Path<DbId>,
) -> AppResult<Json<DataResponse<QueueItem>>> {
    let item = state.queue.complete(item_id, auth.artist_id).await?;
    Ok(Json(DataResponse { data: item }))
}
