//! Artist identity tokens.
//!
//! Artists sign in with an external identity provider, which hands them an
//! HS256 token whose subject is their artist id. This module only checks
//! those tokens; [`issue_token`] is the provider's half of the contract and
//! is used by tests and local tooling.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tunely_core::types::DbId;

/// Payload of an artist token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// The artist id. Profiles are keyed by it, so it is never read from a
    /// request body.
    pub sub: DbId,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Claims for `artist_id`, valid for `ttl_mins` from now.
    pub fn for_artist(artist_id: DbId, ttl_mins: i64) -> Self {
        let iat = Utc::now().timestamp();
        Self {
            sub: artist_id,
            exp: iat + ttl_mins * 60,
            iat,
        }
    }
}

/// Shared secret and lifetime of artist tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub token_ttl_mins: i64,
}

const DEFAULT_TOKEN_TTL_MINS: i64 = 15;

impl JwtConfig {
    /// Read `JWT_SECRET` (required) and `JWT_TTL_MINS` (default 15).
    ///
    /// # Panics
    ///
    /// At startup, when the secret is missing or empty or the lifetime is
    /// not a number.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let token_ttl_mins = std::env::var("JWT_TTL_MINS")
            .map(|v| v.parse().expect("JWT_TTL_MINS must be a whole number of minutes"))
            .unwrap_or(DEFAULT_TOKEN_TTL_MINS);

        Self {
            secret,
            token_ttl_mins,
        }
    }
}

/// Sign a token naming `artist_id`.
pub fn issue_token(artist_id: DbId, config: &JwtConfig) -> jsonwebtoken::errors::Result<String> {
    let claims = Claims::for_artist(artist_id, config.token_ttl_mins);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature and expiry, and return the claims.
pub fn verify_token(token: &str, config: &JwtConfig) -> jsonwebtoken::errors::Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
