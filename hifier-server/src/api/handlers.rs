//! HTTP request handlers
//!
//! REST endpoints for the catalog, search, and player transport.

use crate::api::server::AppContext;
use crate::db::tracks;
use crate::player::{PlayerSnapshot, TransportSignal};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use hifier_common::{Error, Track};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: String,
}

/// Track plus the client-facing derived fields
#[derive(Debug, Serialize)]
pub struct TrackInfo {
    #[serde(flatten)]
    track: Track,
    artist: String,
    quality: Option<String>,
}

impl TrackInfo {
    fn from_track(track: Track) -> Self {
        let artist = track.artist_display();
        let quality = track.quality();
        Self {
            track,
            artist,
            quality,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TracksResponse {
    tracks: Vec<TrackInfo>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTrackRequest {
    title: String,
    artists: Vec<String>,
    album: String,
    cover_url: String,
    music_url: String,
    user_id: String,
    user_name: String,
    metadata: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    effective_query: String,
    intent: Option<crate::search::SearchIntent>,
    fallback: bool,
    tracks: Vec<TrackInfo>,
}

#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    track_id: Uuid,
    /// Playlist adopted verbatim as the new queue
    playlist: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct VolumeRequest {
    volume: f64,
}

#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    position_s: f64,
    duration_s: f64,
}

type HandlerError = (StatusCode, Json<StatusResponse>);

/// Map a service error to the API's (StatusCode, Json<StatusResponse>) shape
fn error_response(e: Error) -> HandlerError {
    let status = match &e {
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Request failed: {}", e);
    }
    (
        status,
        Json(StatusResponse {
            status: format!("error: {}", e),
        }),
    )
}

// ============================================================================
// Health Endpoint
// ============================================================================

/// GET /health - Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "hifier-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Catalog Endpoints
// ============================================================================

/// GET /tracks - Full library, newest upload first
pub async fn list_tracks(
    State(ctx): State<AppContext>,
) -> Result<Json<TracksResponse>, HandlerError> {
    let tracks = tracks::list_tracks(&ctx.db_pool)
        .await
        .map_err(error_response)?;
    Ok(Json(TracksResponse {
        tracks: tracks.into_iter().map(TrackInfo::from_track).collect(),
    }))
}

/// POST /tracks - Insert a track record (the data half of an upload; the
/// media bytes live in the blob store and arrive here as a URL)
pub async fn create_track(
    State(ctx): State<AppContext>,
    Json(req): Json<CreateTrackRequest>,
) -> Result<(StatusCode, Json<TrackInfo>), HandlerError> {
    if req.title.trim().is_empty() {
        return Err(error_response(Error::InvalidInput(
            "Title must not be empty".to_string(),
        )));
    }
    if req.artists.iter().all(|a| a.trim().is_empty()) {
        return Err(error_response(Error::InvalidInput(
            "Track must have at least one artist".to_string(),
        )));
    }

    let track = Track {
        id: Uuid::new_v4(),
        title: req.title,
        artists: req
            .artists
            .into_iter()
            .filter(|a| !a.trim().is_empty())
            .collect(),
        album: req.album,
        cover_url: req.cover_url,
        music_url: req.music_url,
        user_id: req.user_id,
        user_name: req.user_name,
        created_at: Utc::now(),
        metadata: req.metadata,
    };

    tracks::insert_track(&ctx.db_pool, &track)
        .await
        .map_err(error_response)?;

    info!("Track uploaded: {} ({})", track.title, track.id);
    Ok((StatusCode::CREATED, Json(TrackInfo::from_track(track))))
}

/// GET /tracks/:track_id
pub async fn get_track(
    State(ctx): State<AppContext>,
    Path(track_id): Path<Uuid>,
) -> Result<Json<TrackInfo>, HandlerError> {
    let track = tracks::get_track(&ctx.db_pool, track_id)
        .await
        .map_err(error_response)?;
    Ok(Json(TrackInfo::from_track(track)))
}

/// GET /artists/:name/tracks - Tracks whose artist list contains the name
pub async fn artist_tracks(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
) -> Result<Json<TracksResponse>, HandlerError> {
    let tracks = tracks::list_tracks_by_artist(&ctx.db_pool, &name)
        .await
        .map_err(error_response)?;
    Ok(Json(TracksResponse {
        tracks: tracks.into_iter().map(TrackInfo::from_track).collect(),
    }))
}

/// GET /tracks/:track_id/download - Proxy the media bytes for download
///
/// The blob store's URLs are fetched server-side so the browser gets a
/// same-origin response with a proper attachment filename. A failed or
/// refused upstream fetch is logged and answered 502; the player itself
/// is unaffected.
pub async fn download_track(
    State(ctx): State<AppContext>,
    Path(track_id): Path<Uuid>,
) -> Result<axum::response::Response, HandlerError> {
    use axum::response::IntoResponse;

    let track = tracks::get_track(&ctx.db_pool, track_id)
        .await
        .map_err(error_response)?;

    let upstream = ctx
        .media_client
        .get(&track.music_url)
        .send()
        .await
        .map_err(|e| {
            error!("Media fetch failed for {}: {}", track.id, e);
            error_response(Error::Internal("Media fetch failed".to_string()))
        })?;

    if !upstream.status().is_success() {
        error!(
            "Media fetch for {} returned status {}",
            track.id,
            upstream.status()
        );
        return Err((
            StatusCode::BAD_GATEWAY,
            Json(StatusResponse {
                status: "error: upstream media fetch failed".to_string(),
            }),
        ));
    }

    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let bytes = upstream.bytes().await.map_err(|e| {
        error!("Media read failed for {}: {}", track.id, e);
        error_response(Error::Internal("Media read failed".to_string()))
    })?;

    let extension = track
        .quality()
        .map(|q| q.to_lowercase())
        .unwrap_or_else(|| "bin".to_string());
    let filename = format!("{} - {}.{}", track.title, track.artist_display(), extension);

    Ok((
        StatusCode::OK,
        [
            (axum::http::header::CONTENT_TYPE, content_type),
            (
                axum::http::header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename.replace('"', "")),
            ),
        ],
        bytes,
    )
        .into_response())
}

// ============================================================================
// Search Endpoint
// ============================================================================

/// GET /search?q=... - Normalized search with raw-query fallback
///
/// The debounce window makes rapid successive queries supersede each
/// other; a superseded request answers a bodyless 204 and its result is
/// discarded.
pub async fn search(
    State(ctx): State<AppContext>,
    Query(params): Query<SearchParams>,
) -> Result<axum::response::Response, HandlerError> {
    use axum::response::IntoResponse;

    let raw_query = params.q.unwrap_or_default();

    let Some(raw_query) = ctx.debouncer.settle(raw_query).await else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    // Catalog snapshot read after the quiescence window, so the filter
    // sees any upload that landed while the query was settling
    let snapshot = tracks::list_tracks(&ctx.db_pool)
        .await
        .map_err(error_response)?;

    let outcome = ctx.search.search(&snapshot, &raw_query).await;
    Ok(Json(SearchResponse {
        effective_query: outcome.effective_query,
        intent: outcome.intent,
        fallback: outcome.fallback,
        tracks: outcome
            .results
            .into_iter()
            .map(TrackInfo::from_track)
            .collect(),
    })
    .into_response())
}

// ============================================================================
// Player Endpoints
// ============================================================================

/// POST /player/play - Load a track and adopt a playlist as the queue
pub async fn player_play(
    State(ctx): State<AppContext>,
    Json(req): Json<PlayRequest>,
) -> Result<Json<PlayerSnapshot>, HandlerError> {
    let track = tracks::get_track(&ctx.db_pool, req.track_id)
        .await
        .map_err(error_response)?;
    let playlist = tracks::get_tracks_ordered(&ctx.db_pool, &req.playlist)
        .await
        .map_err(error_response)?;

    ctx.player.play_track(track, playlist).await;
    Ok(Json(ctx.player.snapshot().await))
}

/// POST /player/toggle
pub async fn player_toggle(State(ctx): State<AppContext>) -> Json<PlayerSnapshot> {
    ctx.player.toggle_play().await;
    Json(ctx.player.snapshot().await)
}

/// POST /player/next
pub async fn player_next(State(ctx): State<AppContext>) -> Json<PlayerSnapshot> {
    ctx.player.next().await;
    Json(ctx.player.snapshot().await)
}

/// POST /player/previous
pub async fn player_previous(State(ctx): State<AppContext>) -> Json<PlayerSnapshot> {
    ctx.player.previous().await;
    Json(ctx.player.snapshot().await)
}

/// POST /player/shuffle
pub async fn player_shuffle(State(ctx): State<AppContext>) -> Json<PlayerSnapshot> {
    ctx.player.toggle_shuffle().await;
    Json(ctx.player.snapshot().await)
}

/// POST /player/repeat
pub async fn player_repeat(State(ctx): State<AppContext>) -> Json<PlayerSnapshot> {
    ctx.player.toggle_repeat().await;
    Json(ctx.player.snapshot().await)
}

/// POST /player/volume
pub async fn player_volume(
    State(ctx): State<AppContext>,
    Json(req): Json<VolumeRequest>,
) -> Result<Json<PlayerSnapshot>, HandlerError> {
    if !req.volume.is_finite() {
        return Err(error_response(Error::InvalidInput(
            "Volume must be a finite number".to_string(),
        )));
    }
    ctx.player.set_volume(req.volume).await;
    Ok(Json(ctx.player.snapshot().await))
}

/// POST /player/mute
pub async fn player_mute(State(ctx): State<AppContext>) -> Json<PlayerSnapshot> {
    ctx.player.toggle_mute().await;
    Json(ctx.player.snapshot().await)
}

/// GET /player/state
pub async fn player_state(State(ctx): State<AppContext>) -> Json<PlayerSnapshot> {
    Json(ctx.player.snapshot().await)
}

// ============================================================================
// Audio Element Feedback
// ============================================================================

/// POST /player/ended - The audio element finished the current media
pub async fn player_ended(
    State(ctx): State<AppContext>,
) -> Result<Json<StatusResponse>, HandlerError> {
    ctx.transport_tx
        .send(TransportSignal::Ended)
        .await
        .map_err(|_| error_response(Error::Internal("Transport bridge unavailable".to_string())))?;
    Ok(Json(StatusResponse {
        status: "ok".to_string(),
    }))
}

/// POST /player/position - Periodic position report from the audio element
///
/// Reports are lossy; a full channel just drops the sample.
pub async fn player_position(
    State(ctx): State<AppContext>,
    Json(req): Json<PositionRequest>,
) -> Json<StatusResponse> {
    let _ = ctx.transport_tx.try_send(TransportSignal::Position {
        position_s: req.position_s,
        duration_s: req.duration_s,
    });
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}
