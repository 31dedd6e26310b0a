//! Event types for the Hifier player event system
//!
//! Events are broadcast by the playback session and streamed to the
//! browser over SSE; the audio element reacts to them (load/play/pause,
//! gain changes, repeat-one restarts).

use crate::model::Track;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Repeat mode for queue traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop at queue end
    Off,
    /// Wrap to queue start
    All,
    /// Restart the current track indefinitely
    One,
}

impl RepeatMode {
    /// Advance in the fixed cycle off -> all -> one -> off
    pub fn next(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

impl Default for RepeatMode {
    fn default() -> Self {
        RepeatMode::Off
    }
}

/// Hifier player event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerEvent {
    /// A track was loaded and playback started
    TrackStarted {
        track: Track,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Transport play/pause state changed
    PlaybackStateChanged {
        playing: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback reached the end of a non-repeating queue
    PlaybackStopped {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Queue contents or order changed
    QueueChanged {
        queue: Vec<QueueTrackInfo>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Shuffle toggled
    ShuffleChanged {
        shuffling: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Repeat mode cycled
    RepeatChanged {
        mode: RepeatMode,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Volume or mute state changed; `gain` is the effective output level
    VolumeChanged {
        volume: f64,
        muted: bool,
        gain: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Directive to the audio element: seek to zero and keep playing
    /// (repeat-one carve-out, no queue traversal involved)
    RestartTrack {
        track_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback position report echoed from the transport
    PlaybackPosition {
        track_id: Uuid,
        position_s: f64,
        duration_s: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Compact queue entry for QueueChanged events and API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueTrackInfo {
    pub track_id: Uuid,
    pub title: String,
    pub artist: String,
}

impl QueueTrackInfo {
    pub fn from_track(track: &Track) -> Self {
        Self {
            track_id: track.id,
            title: track.title.clone(),
            artist: track.artist_display(),
        }
    }
}
