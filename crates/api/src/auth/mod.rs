//! Identity primitives.
//!
//! The identity provider issues HS256 access tokens whose `sub` claim is the
//! artist id. The API only verifies them; see [`jwt`].

pub mod jwt;
