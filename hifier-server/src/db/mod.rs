//! Database access layer
//!
//! SQLite catalog store: schema initialization and track queries.

pub mod init;
pub mod tracks;

pub use init::{create_pool, init_schema};
