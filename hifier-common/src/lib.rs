//! # Hifier Common Library
//!
//! Shared code for the Hifier music service:
//! - Track model and derived display fields
//! - Player event types (PlayerEvent enum)
//! - Error types
//! - Configuration loading

pub mod config;
pub mod error;
pub mod events;
pub mod model;

pub use error::{Error, Result};
pub use model::Track;
