use axum::routing::get;
use axum::Router;

use crate::handlers::{dashboard, session};
use crate::state::AppState;

/// Routes mounted at `/me`, all scoped to the authenticated artist.
///
/// ```text
/// GET    /session      -> my_session
/// GET    /sessions     -> my_sessions
/// GET    /dashboard    -> dashboard::get
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", get(session::my_session))
        .route("/sessions", get(session::my_sessions))
        .route("/dashboard", get(dashboard::get))
}
