//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods that
//! accept any Postgres executor (`&PgPool` or a transaction's connection) as
//! the first argument. Multi-statement operations live in
//! [`PgStore`](crate::store::PgStore), which owns the transactions.

pub mod artist_repo;
pub mod queue_item_repo;
pub mod session_repo;

pub use artist_repo::ArtistRepo;
pub use queue_item_repo::QueueItemRepo;
pub use session_repo::SessionRepo;
