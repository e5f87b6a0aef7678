pub mod artist;
pub mod dashboard;
pub mod queue;
pub mod session;
