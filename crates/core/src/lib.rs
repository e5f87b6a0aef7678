//! Tunely domain core.
//!
//! Pure domain logic with zero internal dependencies so it can be shared by
//! the repository layer, the HTTP API and the polling viewer:
//!
//! - [`error`] -- the domain error taxonomy.
//! - [`types`] -- id, timestamp and money aliases.
//! - [`priority`] -- the tip-priority ordering of live requests.
//! - [`paging`] -- list pagination clamps.
//! - [`request`] -- song request and artist profile validation.
//! - [`viewer`] -- viewer roles and the stateless polling loop.

pub mod error;
pub mod paging;
pub mod priority;
pub mod request;
pub mod types;
pub mod viewer;
