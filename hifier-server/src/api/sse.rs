//! Server-Sent Events (SSE) broadcaster
//!
//! Streams player events to the browser. The audio element reacts to
//! TrackStarted/PlaybackStateChanged/VolumeChanged/RestartTrack; the UI
//! consumes the rest. A PlayerState event with the full snapshot is sent
//! first so a reconnecting client can resync.

use crate::api::server::AppContext;
use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::{Stream, StreamExt};
use hifier_common::events::PlayerEvent;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

/// GET /events - SSE event stream
pub async fn event_stream(
    State(ctx): State<AppContext>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("New SSE client connected");

    // Subscribe before snapshotting so no event between the two is lost
    let rx = ctx.player.subscribe_events();
    let snapshot = ctx.player.snapshot().await;

    let initial = futures::stream::once(async move {
        let data = serde_json::to_string(&snapshot).unwrap_or_else(|_| "{}".to_string());
        Ok(Event::default().event("PlayerState").data(data))
    });

    let events = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => {
                    let event_type = event_type_str(&event);
                    debug!("Broadcasting SSE event: {}", event_type);
                    Some(Ok(Event::default().event(event_type).data(json)))
                }
                Err(e) => {
                    warn!("Failed to serialize event: {}", e);
                    None
                }
            },
            Err(e) => {
                // BroadcastStream error (lagged or closed)
                warn!("SSE stream error: {:?}", e);
                None
            }
        }
    });

    Sse::new(initial.chain(events)).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Extract event type string from PlayerEvent
fn event_type_str(event: &PlayerEvent) -> &'static str {
    match event {
        PlayerEvent::TrackStarted { .. } => "TrackStarted",
        PlayerEvent::PlaybackStateChanged { .. } => "PlaybackStateChanged",
        PlayerEvent::PlaybackStopped { .. } => "PlaybackStopped",
        PlayerEvent::QueueChanged { .. } => "QueueChanged",
        PlayerEvent::ShuffleChanged { .. } => "ShuffleChanged",
        PlayerEvent::RepeatChanged { .. } => "RepeatChanged",
        PlayerEvent::VolumeChanged { .. } => "VolumeChanged",
        PlayerEvent::RestartTrack { .. } => "RestartTrack",
        PlayerEvent::PlaybackPosition { .. } => "PlaybackPosition",
    }
}
