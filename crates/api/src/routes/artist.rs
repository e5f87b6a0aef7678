use axum::routing::{get, post};
use axum::Router;

use crate::handlers::artist;
use crate::state::AppState;

/// Routes mounted at `/artists`.
///
/// ```text
/// POST   /                    -> create
/// GET    /{handle}            -> get_by_handle
/// GET    /{handle}/session    -> get_active_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(artist::create))
        .route("/{handle}", get(artist::get_by_handle))
        .route("/{handle}/session", get(artist::get_active_session))
}
