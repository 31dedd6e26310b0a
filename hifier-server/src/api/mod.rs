//! HTTP API module
//!
//! REST endpoints for catalog, search, and player control, plus the SSE
//! event stream consumed by the browser player.

pub mod handlers;
pub mod server;
pub mod sse;

pub use server::{create_router, AppContext};
