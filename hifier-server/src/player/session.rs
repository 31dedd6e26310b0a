//! Playback session state machine
//!
//! Owns the current track, transport state, queue order, shuffle/repeat
//! modes, and volume/mute. Transitions are synchronous; the audio element
//! is a collaborator that reacts to the emitted events (load/play/pause,
//! gain changes, repeat-one restarts).

use chrono::{DateTime, Utc};
use hifier_common::events::{PlayerEvent, QueueTrackInfo, RepeatMode};
use hifier_common::Track;
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

/// Single playback session, one per application instance.
///
/// Never persisted; constructed empty at startup and mutated only through
/// the operations below. `queue` is the active playback order and
/// `original_queue` the pre-shuffle order, kept so disabling shuffle
/// restores the exact browsing order.
#[derive(Debug)]
pub struct PlayerSession {
    current_track: Option<Track>,
    playing: bool,
    queue: Vec<Track>,
    original_queue: Vec<Track>,
    shuffling: bool,
    repeat: RepeatMode,
    volume: f64,
    muted: bool,
}

impl PlayerSession {
    /// Create an empty session: nothing loaded, full volume, all modes off.
    pub fn new() -> Self {
        Self {
            current_track: None,
            playing: false,
            queue: Vec::new(),
            original_queue: Vec::new(),
            shuffling: false,
            repeat: RepeatMode::Off,
            volume: 1.0,
            muted: false,
        }
    }

    /// Load `track` and adopt `playlist` (verbatim order) as both the
    /// active and the original queue, then start playing.
    ///
    /// The track is not required to be a member of `playlist`; a missing
    /// membership degrades to the position -1 rule in `next`/`previous`.
    pub fn play_track(&mut self, track: Track, playlist: Vec<Track>) -> Vec<PlayerEvent> {
        self.current_track = Some(track.clone());
        self.queue = playlist.clone();
        self.original_queue = playlist;
        self.playing = true;

        vec![
            PlayerEvent::QueueChanged {
                queue: self.queue_info(),
                timestamp: now(),
            },
            PlayerEvent::TrackStarted {
                track,
                timestamp: now(),
            },
        ]
    }

    /// Flip play/pause. No-op when nothing is loaded.
    pub fn toggle_play(&mut self) -> Vec<PlayerEvent> {
        if self.current_track.is_none() {
            return Vec::new();
        }
        self.playing = !self.playing;
        vec![PlayerEvent::PlaybackStateChanged {
            playing: self.playing,
            timestamp: now(),
        }]
    }

    /// Advance to the next queue position.
    ///
    /// With repeat-one while playing, the same track is restarted from
    /// position zero instead of traversing the queue. Otherwise the current
    /// track is located by id; a lookup miss counts as position -1, so the
    /// queue advances to index 0. Past the last position: repeat-all wraps
    /// to the start, repeat-off stops playback and leaves the current track
    /// loaded (the terminal state of a finished queue).
    pub fn next(&mut self) -> Vec<PlayerEvent> {
        let Some(current) = &self.current_track else {
            return Vec::new();
        };

        if self.repeat == RepeatMode::One && self.playing {
            return vec![PlayerEvent::RestartTrack {
                track_id: current.id,
                timestamp: now(),
            }];
        }

        if self.queue.is_empty() {
            return Vec::new();
        }

        let current_index = self.position_of(current.id);
        let next_index = match current_index {
            Some(i) => i + 1,
            None => 0, // position -1 rule: advance lands on the first entry
        };

        let next_index = if next_index >= self.queue.len() {
            if self.repeat == RepeatMode::All {
                0
            } else {
                self.playing = false;
                return vec![PlayerEvent::PlaybackStopped { timestamp: now() }];
            }
        } else {
            next_index
        };

        self.start_at(next_index)
    }

    /// Step back one queue position.
    ///
    /// From position 0 (or a lookup miss) this wraps to the last element
    /// unconditionally; previous always cycles regardless of repeat mode.
    /// Always resumes playback.
    pub fn previous(&mut self) -> Vec<PlayerEvent> {
        let Some(current) = &self.current_track else {
            return Vec::new();
        };
        if self.queue.is_empty() {
            return Vec::new();
        }

        let prev_index = match self.position_of(current.id) {
            Some(0) | None => self.queue.len() - 1,
            Some(i) => i - 1,
        };

        self.start_at(prev_index)
    }

    /// Toggle shuffle.
    ///
    /// Enabling computes a random permutation of the original queue and
    /// swaps the current track to position 0, so entering shuffle never
    /// replays or skips what is already playing. Disabling restores the
    /// original order verbatim.
    pub fn toggle_shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<PlayerEvent> {
        self.shuffling = !self.shuffling;

        if self.shuffling {
            let mut shuffled = self.original_queue.clone();
            shuffled.shuffle(rng);
            if let Some(current) = &self.current_track {
                if let Some(pos) = shuffled.iter().position(|t| t.id == current.id) {
                    shuffled.swap(0, pos);
                }
            }
            self.queue = shuffled;
        } else {
            self.queue = self.original_queue.clone();
        }

        vec![
            PlayerEvent::ShuffleChanged {
                shuffling: self.shuffling,
                timestamp: now(),
            },
            PlayerEvent::QueueChanged {
                queue: self.queue_info(),
                timestamp: now(),
            },
        ]
    }

    /// Cycle repeat mode: off -> all -> one -> off.
    pub fn toggle_repeat(&mut self) -> Vec<PlayerEvent> {
        self.repeat = self.repeat.next();
        vec![PlayerEvent::RepeatChanged {
            mode: self.repeat,
            timestamp: now(),
        }]
    }

    /// Store a volume level in [0,1] (clamped). Raising the volume above
    /// zero implicitly unmutes; the stored level survives muting.
    pub fn set_volume(&mut self, volume: f64) -> Vec<PlayerEvent> {
        self.volume = volume.clamp(0.0, 1.0);
        if self.volume > 0.0 {
            self.muted = false;
        }
        vec![self.volume_event()]
    }

    /// Flip mute without touching the stored volume level.
    pub fn toggle_mute(&mut self) -> Vec<PlayerEvent> {
        self.muted = !self.muted;
        vec![self.volume_event()]
    }

    /// Transport reported that the current track finished.
    ///
    /// Repeat-one restarts the same track from zero; any other mode
    /// advances through `next`.
    pub fn handle_track_ended(&mut self) -> Vec<PlayerEvent> {
        let Some(current_id) = self.current_track.as_ref().map(|t| t.id) else {
            return Vec::new();
        };

        if self.repeat == RepeatMode::One {
            return vec![PlayerEvent::RestartTrack {
                track_id: current_id,
                timestamp: now(),
            }];
        }

        self.next()
    }

    /// Effective output gain: 0 when muted, otherwise the stored volume.
    pub fn effective_gain(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    pub fn original_queue(&self) -> &[Track] {
        &self.original_queue
    }

    pub fn is_shuffling(&self) -> bool {
        self.shuffling
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Compact queue listing for events and API responses
    pub fn queue_info(&self) -> Vec<QueueTrackInfo> {
        self.queue.iter().map(QueueTrackInfo::from_track).collect()
    }

    fn position_of(&self, track_id: Uuid) -> Option<usize> {
        self.queue.iter().position(|t| t.id == track_id)
    }

    fn start_at(&mut self, index: usize) -> Vec<PlayerEvent> {
        let track = self.queue[index].clone();
        self.current_track = Some(track.clone());
        self.playing = true;
        vec![PlayerEvent::TrackStarted {
            track,
            timestamp: now(),
        }]
    }

    fn volume_event(&self) -> PlayerEvent {
        PlayerEvent::VolumeChanged {
            volume: self.volume,
            muted: self.muted,
            gain: self.effective_gain(),
            timestamp: now(),
        }
    }
}

impl Default for PlayerSession {
    fn default() -> Self {
        Self::new()
    }
}

fn now() -> DateTime<Utc> {
    Utc::now()
}
