//! Viewer roles and the stateless polling loop.
//!
//! Viewers (performer dashboard, public display, requester page) never hold
//! server-side state. Each poll re-derives the ordered snapshot from the
//! store; a viewer that observes the session closed stops polling for good.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::MissedTickBehavior;

/// Poll period for the performer dashboard and requester page.
pub const COARSE_POLL_PERIOD: Duration = Duration::from_secs(5);

/// Poll period for the audience-facing display, which should feel live.
pub const DISPLAY_POLL_PERIOD: Duration = Duration::from_secs(3);

/// Entries shown on the public display.
pub const DISPLAY_SNAPSHOT_LIMIT: i64 = 5;

/// Entries shown on the requester page ("coming up next").
pub const REQUESTER_SNAPSHOT_LIMIT: i64 = 3;

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Who is looking at the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerRole {
    Performer,
    Display,
    Requester,
}

impl ViewerRole {
    pub fn poll_period(self) -> Duration {
        match self {
            Self::Performer | Self::Requester => COARSE_POLL_PERIOD,
            Self::Display => DISPLAY_POLL_PERIOD,
        }
    }

    /// How many queue entries this role renders. The performer sees all.
    pub fn snapshot_limit(self) -> Option<i64> {
        match self {
            Self::Performer => None,
            Self::Display => Some(DISPLAY_SNAPSHOT_LIMIT),
            Self::Requester => Some(REQUESTER_SNAPSHOT_LIMIT),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Performer => "performer",
            Self::Display => "display",
            Self::Requester => "requester",
        }
    }
}

impl fmt::Display for ViewerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewerRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "performer" => Ok(Self::Performer),
            "display" => Ok(Self::Display),
            "requester" => Ok(Self::Requester),
            other => Err(format!(
                "unknown viewer role '{other}' (expected performer, display or requester)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Poll loop
// ---------------------------------------------------------------------------

/// Result of a single poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    /// The session is open; here is its current snapshot.
    Live(T),
    /// The session ended or never existed. Terminal.
    Closed,
}

/// Something a viewer can poll for the current snapshot.
pub trait SnapshotSource: Send + Sync {
    type View: Send;
    type Error: fmt::Display + Send;

    /// Fetch the current view. Must not rely on any state from earlier polls.
    fn fetch(&self) -> impl Future<Output = Result<ViewState<Self::View>, Self::Error>> + Send;
}

/// Delivered to the render callback on every non-terminal poll.
#[derive(Debug)]
pub enum PollEvent<V, E> {
    Update(V),
    /// A failed poll. Polling continues on the next tick.
    Failed(E),
}

/// Why the loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollExit {
    /// The session closed after `polls` polls (including the final one).
    Closed { polls: u64 },
}

/// Fixed-period poller.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    period: Duration,
}

impl Poller {
    pub fn for_role(role: ViewerRole) -> Self {
        Self::with_period(role.poll_period())
    }

    pub fn with_period(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Poll `source` until it reports [`ViewState::Closed`].
    ///
    /// The first poll happens immediately. Slow polls delay the next tick
    /// rather than bursting to catch up. Dropping the future stops polling.
    pub async fn run<S, F>(&self, source: &S, mut on_event: F) -> PollExit
    where
        S: SnapshotSource,
        F: FnMut(PollEvent<S::View, S::Error>),
    {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut polls = 0u64;

        loop {
            ticker.tick().await;
            polls += 1;
            match source.fetch().await {
                Ok(ViewState::Live(view)) => on_event(PollEvent::Update(view)),
                Ok(ViewState::Closed) => return PollExit::Closed { polls },
                Err(err) => on_event(PollEvent::Failed(err)),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
