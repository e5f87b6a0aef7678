//! Request extractors.
//!
//! - [`auth::AuthArtist`] -- the authenticated artist from a JWT Bearer token.

pub mod auth;
