//! Repository for the `artists` table.

use sqlx::PgExecutor;
use tunely_core::types::DbId;

use crate::models::artist::{Artist, CreateArtist};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, handle, display_name, subscribed, created_at, updated_at";

/// Provides lookups and signup inserts for artists.
pub struct ArtistRepo;

impl ArtistRepo {
    /// Insert a new artist profile, returning the created row.
    ///
    /// Fails with a unique violation if the id or handle is already taken.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateArtist,
    ) -> Result<Artist, sqlx::Error> {
        let query = format!(
            "INSERT INTO artists (id, handle, display_name) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artist>(&query)
            .bind(input.id)
            .bind(&input.handle)
            .bind(&input.display_name)
            .fetch_one(executor)
            .await
    }

    /// Find an artist by identity id.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artists WHERE id = $1");
        sqlx::query_as::<_, Artist>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find an artist by public handle. Handles are stored lowercase.
    pub async fn find_by_handle<'e>(
        executor: impl PgExecutor<'e>,
        handle: &str,
    ) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artists WHERE handle = $1");
        sqlx::query_as::<_, Artist>(&query)
            .bind(handle)
            .fetch_optional(executor)
            .await
    }
}
