pub mod artist;
pub mod health;
pub mod me;
pub mod queue_item;
pub mod session;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /artists                          create profile (auth)
/// /artists/{handle}                 public profile
/// /artists/{handle}/session         active session or null
///
/// /sessions                         start (auth)
/// /sessions/{id}/end                end (auth, owner)
/// /sessions/{id}/queue              live snapshot (?limit=)
/// /sessions/{id}/requests           submit a paid request
///
/// /queue-items/{id}/complete        mark performed (auth, owner)
///
/// /me/session                       caller's active session
/// /me/sessions                      caller's session history
/// /me/dashboard                     performer dashboard
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/artists", artist::router())
        .nest("/sessions", session::router())
        .nest("/queue-items", queue_item::router())
        .nest("/me", me::router())
}
