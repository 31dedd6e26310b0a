//! HTTP router setup
//!
//! Axum router with catalog, search, player transport, and SSE routes.

use crate::player::{SharedPlayer, TransportSignal};
use crate::search::{Debouncer, SearchService};
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub db_pool: Pool<Sqlite>,
    pub player: Arc<SharedPlayer>,
    pub search: Arc<SearchService>,
    pub debouncer: Arc<Debouncer>,
    pub transport_tx: mpsc::Sender<TransportSignal>,
    /// Client for proxying media downloads from the blob store
    pub media_client: reqwest::Client,
}

/// Build the application router
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(super::handlers::health))
        // Catalog
        .route("/tracks", get(super::handlers::list_tracks))
        .route("/tracks", post(super::handlers::create_track))
        .route("/tracks/:track_id", get(super::handlers::get_track))
        .route(
            "/tracks/:track_id/download",
            get(super::handlers::download_track),
        )
        .route("/artists/:name/tracks", get(super::handlers::artist_tracks))
        // Search
        .route("/search", get(super::handlers::search))
        // Player transport
        .route("/player/play", post(super::handlers::player_play))
        .route("/player/toggle", post(super::handlers::player_toggle))
        .route("/player/next", post(super::handlers::player_next))
        .route("/player/previous", post(super::handlers::player_previous))
        .route("/player/shuffle", post(super::handlers::player_shuffle))
        .route("/player/repeat", post(super::handlers::player_repeat))
        .route("/player/volume", post(super::handlers::player_volume))
        .route("/player/mute", post(super::handlers::player_mute))
        .route("/player/state", get(super::handlers::player_state))
        // Audio element feedback
        .route("/player/ended", post(super::handlers::player_ended))
        .route("/player/position", post(super::handlers::player_position))
        // SSE event stream
        .route("/events", get(super::sse::event_stream))
        // Attach application context
        .with_state(ctx)
        // Enable CORS for the browser client
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
