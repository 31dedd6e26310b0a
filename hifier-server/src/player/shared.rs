//! Shared playback session
//!
//! Wraps the session state machine for concurrent access from HTTP
//! handlers and the transport bridge. Every operation runs under the
//! write lock, so transitions stay atomic with respect to the executor,
//! and the resulting events are broadcast to all SSE listeners.
//!
//! Constructed once at startup and passed by `Arc` to consumers.

use crate::player::session::PlayerSession;
use hifier_common::events::{PlayerEvent, QueueTrackInfo, RepeatMode};
use hifier_common::Track;
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

/// Point-in-time view of the session for API responses
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    pub current_track: Option<Track>,
    pub playing: bool,
    pub queue: Vec<QueueTrackInfo>,
    pub shuffling: bool,
    pub repeat_mode: RepeatMode,
    pub volume: f64,
    pub muted: bool,
    pub gain: f64,
}

/// Shared session handle: state machine behind a lock plus the event
/// broadcaster consumed by the SSE layer.
pub struct SharedPlayer {
    session: RwLock<PlayerSession>,
    event_tx: broadcast::Sender<PlayerEvent>,
}

impl SharedPlayer {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            session: RwLock::new(PlayerSession::new()),
            event_tx,
        }
    }

    /// Subscribe to the player event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }

    pub async fn play_track(&self, track: Track, playlist: Vec<Track>) {
        let events = self.session.write().await.play_track(track, playlist);
        self.broadcast_all(events);
    }

    pub async fn toggle_play(&self) {
        let events = self.session.write().await.toggle_play();
        self.broadcast_all(events);
    }

    pub async fn next(&self) {
        let events = self.session.write().await.next();
        self.broadcast_all(events);
    }

    pub async fn previous(&self) {
        let events = self.session.write().await.previous();
        self.broadcast_all(events);
    }

    pub async fn toggle_shuffle(&self) {
        let events = self
            .session
            .write()
            .await
            .toggle_shuffle(&mut rand::thread_rng());
        self.broadcast_all(events);
    }

    pub async fn toggle_repeat(&self) {
        let events = self.session.write().await.toggle_repeat();
        self.broadcast_all(events);
    }

    pub async fn set_volume(&self, volume: f64) {
        let events = self.session.write().await.set_volume(volume);
        self.broadcast_all(events);
    }

    pub async fn toggle_mute(&self) {
        let events = self.session.write().await.toggle_mute();
        self.broadcast_all(events);
    }

    /// Transport "ended" signal: restart under repeat-one, advance otherwise
    pub async fn handle_track_ended(&self) {
        let events = self.session.write().await.handle_track_ended();
        self.broadcast_all(events);
    }

    /// Echo a transport position report to listeners. Ignored when the
    /// session has nothing loaded (a late report from an unloaded track).
    pub async fn report_position(&self, position_s: f64, duration_s: f64) {
        let track_id = match self.session.read().await.current_track() {
            Some(track) => track.id,
            None => return,
        };
        self.broadcast(PlayerEvent::PlaybackPosition {
            track_id,
            position_s,
            duration_s,
            timestamp: chrono::Utc::now(),
        });
    }

    pub async fn snapshot(&self) -> PlayerSnapshot {
        let session = self.session.read().await;
        PlayerSnapshot {
            current_track: session.current_track().cloned(),
            playing: session.is_playing(),
            queue: session.queue_info(),
            shuffling: session.is_shuffling(),
            repeat_mode: session.repeat_mode(),
            volume: session.volume(),
            muted: session.is_muted(),
            gain: session.effective_gain(),
        }
    }

    pub async fn current_track_id(&self) -> Option<Uuid> {
        self.session.read().await.current_track().map(|t| t.id)
    }

    fn broadcast(&self, event: PlayerEvent) {
        // Ignore send errors (no receivers is OK)
        let _ = self.event_tx.send(event);
    }

    fn broadcast_all(&self, events: Vec<PlayerEvent>) {
        for event in events {
            self.broadcast(event);
        }
    }
}

impl Default for SharedPlayer {
    fn default() -> Self {
        Self::new()
    }
}
