use axum::routing::post;
use axum::Router;

use crate::handlers::queue;
use crate::state::AppState;

/// Routes mounted at `/queue-items`.
///
/// ```text
/// POST   /{id}/complete    -> complete_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/complete", post(queue::complete_item))
}
