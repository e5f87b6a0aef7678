use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{queue, session};
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// POST   /                 -> start
/// POST   /{id}/end         -> end
/// GET    /{id}/queue       -> get_queue
/// POST   /{id}/requests    -> submit_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(session::start))
        .route("/{id}/end", post(session::end))
        .route("/{id}/queue", get(queue::get_queue))
        .route("/{id}/requests", post(queue::submit_request))
}
