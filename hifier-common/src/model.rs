//! Track model shared across the catalog, search, and player layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single uploaded track in the shared library.
///
/// Invariants:
/// - `artists` is non-empty (enforced at catalog insert)
/// - `music_url` is a resolvable locator for the playable media
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    /// Catalog identifier (externally assigned)
    pub id: Uuid,

    /// Track title
    pub title: String,

    /// Ordered list of artist names (non-empty)
    pub artists: Vec<String>,

    /// Album name
    pub album: String,

    /// Cover image reference
    pub cover_url: String,

    /// Playable media reference (URL)
    pub music_url: String,

    /// Owning user identifier
    pub user_id: String,

    /// Owning user display name
    pub user_name: String,

    /// Upload timestamp
    pub created_at: DateTime<Utc>,

    /// Optional free-text metadata
    pub metadata: Option<String>,
}

impl Track {
    /// Joined artist display string ("A, B, C")
    pub fn artist_display(&self) -> String {
        self.artists.join(", ")
    }

    /// Quality label derived from the media URL's file extension
    /// (e.g. "FLAC", "WAV", "MP3"), or None if the URL has no extension.
    ///
    /// Query strings are stripped first; storage URLs commonly carry
    /// access tokens after the extension.
    pub fn quality(&self) -> Option<String> {
        let path = self.music_url.split('?').next().unwrap_or("");
        let ext = path.rsplit('.').next()?;
        if ext.is_empty() || ext == path || ext.contains('/') {
            return None;
        }
        Some(ext.to_uppercase())
    }
}
