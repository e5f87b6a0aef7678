//! HTTP client for the public Tunely endpoints.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tunely_core::types::{Cents, DbId};
use tunely_core::viewer::ViewState;

use crate::error::{ViewerError, ViewerResult};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Per-request timeout. Shorter than the fastest poll period so a stuck
/// request never overlaps the next tick by much.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistView {
    pub id: DbId,
    pub handle: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionView {
    pub id: DbId,
    pub active: bool,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_earnings: Cents,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueItemView {
    pub id: DbId,
    pub song_title: String,
    pub tip_amount: Cents,
    pub requester_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueSnapshotView {
    pub session_id: DbId,
    pub items: Vec<QueueItemView>,
    pub total_value: Cents,
    pub queued_count: usize,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

/// Whether an API error from the snapshot endpoint means the session is
/// over (ended, or gone) rather than a failed poll. Only the API's own error
/// envelope counts, so a 404 from a wrong base URL or a proxy is an error.
pub fn is_closed(status: u16, code: &str) -> bool {
    matches!((status, code), (409, "SESSION_CLOSED") | (404, "NOT_FOUND"))
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Typed client for the unauthenticated part of the API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ViewerResult<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Use a preconfigured `reqwest::Client`.
    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /api/v1/artists/{handle}
    pub async fn artist(&self, handle: &str) -> ViewerResult<ArtistView> {
        let response = self.get(&format!("/api/v1/artists/{handle}"), &[]).await?;
        decode(response).await
    }

    /// GET /api/v1/artists/{handle}/session
    pub async fn active_session(&self, handle: &str) -> ViewerResult<Option<SessionView>> {
        let response = self
            .get(&format!("/api/v1/artists/{handle}/session"), &[])
            .await?;
        decode(response).await
    }

    /// GET /api/v1/sessions/{id}/queue
    ///
    /// A session that has ended or does not exist comes back as
    /// [`ViewState::Closed`].
    pub async fn snapshot(
        &self,
        session_id: DbId,
        limit: Option<i64>,
    ) -> ViewerResult<ViewState<QueueSnapshotView>> {
        let query: Vec<(&str, String)> = limit
            .map(|l| vec![("limit", l.to_string())])
            .unwrap_or_default();
        let response = self
            .get(&format!("/api/v1/sessions/{session_id}/queue"), &query)
            .await?;

        match decode(response).await {
            Ok(snapshot) => Ok(ViewState::Live(snapshot)),
            Err(ViewerError::Api { status, code, .. }) if is_closed(status, &code) => {
                tracing::debug!(session_id, status, %code, "Session is closed");
                Ok(ViewState::Closed)
            }
            Err(err) => Err(err),
        }
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> ViewerResult<Response> {
        let url = format!("{}{path}", self.base_url);
        Ok(self.http.get(url).query(query).send().await?)
    }
}

/// Unwrap a `{ "data": T }` envelope, or turn an error envelope into
/// [`ViewerError::Api`].
async fn decode<T: DeserializeOwned>(response: Response) -> ViewerResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<Envelope<T>>().await?.data);
    }

    let (code, message) = match response.json::<ErrorBody>().await {
        Ok(body) => (body.code, body.error),
        Err(_) => ("UNKNOWN".to_string(), status.to_string()),
    };
    Err(ViewerError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ended_and_missing_sessions_are_closed() {
        assert!(is_closed(409, "SESSION_CLOSED"));
        assert!(is_closed(404, "NOT_FOUND"));
    }

    #[test]
    fn other_failures_are_not_closed() {
        assert!(!is_closed(404, "UNKNOWN"));
        assert!(!is_closed(409, "CONFLICT"));
        assert!(!is_closed(400, "VALIDATION_ERROR"));
        assert!(!is_closed(500, "INTERNAL_ERROR"));
        assert!(!is_closed(408, "UNKNOWN"));
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = ApiClient::with_client(Client::new(), "http://example.test/");
        assert_eq!(client.base_url(), "http://example.test");
    }
}
