//! Validation and normalization of incoming payloads.
//!
//! Both payload types are deserialized straight from request bodies, then
//! passed through `normalize` which trims text, drops blank optional fields
//! and enforces the length and format constraints.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;
use crate::types::Cents;

/// Maximum song title length in characters.
pub const MAX_TITLE_LEN: u64 = 200;

/// Maximum requester name length in characters.
pub const MAX_REQUESTER_NAME_LEN: u64 = 100;

/// Largest single tip accepted, in minor units ($10,000.00).
///
/// Keeps session totals far away from `i64` overflow; mirrored by the
/// `ck_queue_items_tip_range` constraint on `queue_items`.
pub const MAX_TIP_AMOUNT: Cents = 1_000_000;

/// Handles are lowercase alphanumerics with inner `-` / `_`, so they can be
/// used verbatim as a URL path segment.
static HANDLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9](?:[a-z0-9_-]*[a-z0-9])?$").expect("handle pattern is valid")
});

// ---------------------------------------------------------------------------
// Song requests
// ---------------------------------------------------------------------------

/// A paid song request as submitted by an audience member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct SongRequest {
    #[validate(length(
        min = 1,
        max = MAX_TITLE_LEN,
        message = "song title must not be empty or longer than the title limit"
    ))]
    pub song_title: String,
    /// Tip in minor currency units.
    pub tip_amount: Cents,
    #[validate(length(
        max = MAX_REQUESTER_NAME_LEN,
        message = "requester name is longer than the name limit"
    ))]
    #[serde(default)]
    pub requester_name: Option<String>,
}

impl SongRequest {
    /// Trim and validate the request.
    ///
    /// The amount is checked first so a tip outside `1..=MAX_TIP_AMOUNT`
    /// always reports [`CoreError::InvalidAmount`], whatever else is wrong
    /// with the payload.
    pub fn normalize(self) -> Result<Self, CoreError> {
        if !(1..=MAX_TIP_AMOUNT).contains(&self.tip_amount) {
            return Err(CoreError::InvalidAmount(self.tip_amount));
        }

        let normalized = Self {
            song_title: self.song_title.trim().to_string(),
            tip_amount: self.tip_amount,
            requester_name: self
                .requester_name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        };

        normalized
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        Ok(normalized)
    }
}

// ---------------------------------------------------------------------------
// Artist profiles
// ---------------------------------------------------------------------------

/// Signup payload for an artist profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct ArtistProfile {
    #[validate(length(min = 3, max = 30, message = "handle must be 3-30 characters"))]
    pub handle: String,
    #[validate(length(min = 1, max = 100, message = "display name must be 1-100 characters"))]
    pub display_name: String,
}

impl ArtistProfile {
    /// Lowercase the handle, trim both fields and validate them.
    pub fn normalize(self) -> Result<Self, CoreError> {
        let normalized = Self {
            handle: self.handle.trim().to_lowercase(),
            display_name: self.display_name.trim().to_string(),
        };

        normalized
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        if !is_valid_handle(&normalized.handle) {
            return Err(CoreError::Validation(format!(
                "handle '{}' may only contain a-z, 0-9, '-' and '_', \
                 and must start and end with a letter or digit",
                normalized.handle
            )));
        }
        Ok(normalized)
    }
}

/// Whether `handle` is safe to use as a URL path segment.
pub fn is_valid_handle(handle: &str) -> bool {
    HANDLE_PATTERN.is_match(handle)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
