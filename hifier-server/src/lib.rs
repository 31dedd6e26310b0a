//! # Hifier Server Library
//!
//! Music streaming service backend: track catalog (SQLite), playback
//! session controller, search normalization, and HTTP/SSE control
//! interface consumed by the browser player.

pub mod api;
pub mod db;
pub mod player;
pub mod search;

pub use hifier_common::{Error, Result};
