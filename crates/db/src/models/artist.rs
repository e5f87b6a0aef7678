//! Artist entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use tunely_core::request::ArtistProfile;
use tunely_core::types::{DbId, Timestamp};

/// An artist row from the `artists` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Artist {
    /// The identity provider's subject id.
    pub id: DbId,
    pub handle: String,
    pub display_name: String,
    pub subscribed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an artist profile at signup.
#[derive(Debug, Clone)]
pub struct CreateArtist {
    pub id: DbId,
    pub handle: String,
    pub display_name: String,
}

impl CreateArtist {
    /// Bind a validated profile to the authenticated identity.
    pub fn new(id: DbId, profile: ArtistProfile) -> Self {
        Self {
            id,
            handle: profile.handle,
            display_name: profile.display_name,
        }
    }
}
