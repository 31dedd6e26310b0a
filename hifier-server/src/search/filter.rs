//! Client-side catalog filtering
//!
//! A track matches when the lower-cased needle is a substring of the
//! lower-cased title, any artist name, or the album (independent fields,
//! OR semantics).

use hifier_common::Track;

/// Case-insensitive contains match over title, artists, and album.
pub fn track_matches(track: &Track, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return true;
    }

    track.title.to_lowercase().contains(&needle)
        || track
            .artists
            .iter()
            .any(|artist| artist.to_lowercase().contains(&needle))
        || track.album.to_lowercase().contains(&needle)
}

/// Filter a catalog snapshot, preserving its order.
pub fn filter_tracks<'a>(tracks: &'a [Track], needle: &str) -> Vec<&'a Track> {
    tracks.iter().filter(|t| track_matches(t, needle)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn track(title: &str, artists: &[&str], album: &str) -> Track {
        Track {
            id: Uuid::new_v4(),
            title: title.to_string(),
            artists: artists.iter().map(|s| s.to_string()).collect(),
            album: album.to_string(),
            cover_url: "https://covers.example/c.png".to_string(),
            music_url: "https://media.example/t.mp3".to_string(),
            user_id: "u1".to_string(),
            user_name: "Uploader".to_string(),
            created_at: Utc::now(),
            metadata: None,
        }
    }

    #[test]
    fn matches_title_case_insensitive() {
        let t = track("Good Luck, Babe!", &["Chappell Roan"], "The Rise and Fall");
        assert!(track_matches(&t, "good luck"));
        assert!(track_matches(&t, "GOOD LUCK"));
    }

    #[test]
    fn matches_any_artist() {
        let t = track("Song", &["First Act", "Second Act"], "Album");
        assert!(track_matches(&t, "second"));
        assert!(!track_matches(&t, "third"));
    }

    #[test]
    fn matches_album() {
        let t = track("Song", &["Artist"], "Midnight Collection");
        assert!(track_matches(&t, "midnight"));
    }

    #[test]
    fn empty_needle_matches_everything() {
        let t = track("Song", &["Artist"], "Album");
        assert!(track_matches(&t, ""));
    }

    #[test]
    fn filter_preserves_order() {
        let tracks = vec![
            track("Alpha Song", &["X"], "A"),
            track("Beta", &["X"], "A"),
            track("Alpha Reprise", &["X"], "A"),
        ];
        let hits = filter_tracks(&tracks, "alpha");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Alpha Song");
        assert_eq!(hits[1].title, "Alpha Reprise");
    }
}
