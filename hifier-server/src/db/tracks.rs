//! Track catalog queries

use hifier_common::{Error, Result, Track};
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

/// Raw catalog row; artists held as JSON text
#[derive(Debug, sqlx::FromRow)]
struct TrackRow {
    id: String,
    title: String,
    artists: String,
    album: String,
    cover_url: String,
    music_url: String,
    user_id: String,
    user_name: String,
    created_at: chrono::DateTime<chrono::Utc>,
    metadata: Option<String>,
}

impl TrackRow {
    fn into_track(self) -> Result<Track> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| Error::Internal(format!("Invalid track UUID in catalog: {}", e)))?;
        let artists: Vec<String> = serde_json::from_str(&self.artists)
            .map_err(|e| Error::Internal(format!("Invalid artists column for {}: {}", id, e)))?;

        Ok(Track {
            id,
            title: self.title,
            artists,
            album: self.album,
            cover_url: self.cover_url,
            music_url: self.music_url,
            user_id: self.user_id,
            user_name: self.user_name,
            created_at: self.created_at,
            metadata: self.metadata,
        })
    }
}

const SELECT_COLUMNS: &str = "id, title, artists, album, cover_url, music_url, \
     user_id, user_name, created_at, metadata";

/// Insert a track record.
///
/// Enforces the non-empty artists invariant; everything else was already
/// validated at the API boundary.
pub async fn insert_track(pool: &Pool<Sqlite>, track: &Track) -> Result<()> {
    if track.artists.is_empty() {
        return Err(Error::InvalidInput(
            "Track must have at least one artist".to_string(),
        ));
    }

    let artists_json = serde_json::to_string(&track.artists)
        .map_err(|e| Error::Internal(format!("Failed to encode artists: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO tracks
            (id, title, artists, album, cover_url, music_url,
             user_id, user_name, created_at, metadata)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(track.id.to_string())
    .bind(&track.title)
    .bind(artists_json)
    .bind(&track.album)
    .bind(&track.cover_url)
    .bind(&track.music_url)
    .bind(&track.user_id)
    .bind(&track.user_name)
    .bind(track.created_at)
    .bind(&track.metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// List all tracks, newest upload first.
pub async fn list_tracks(pool: &Pool<Sqlite>) -> Result<Vec<Track>> {
    let rows: Vec<TrackRow> = sqlx::query_as(&format!(
        "SELECT {} FROM tracks ORDER BY created_at DESC",
        SELECT_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(TrackRow::into_track).collect()
}

/// List tracks whose artist list contains `artist` exactly, newest first.
pub async fn list_tracks_by_artist(pool: &Pool<Sqlite>, artist: &str) -> Result<Vec<Track>> {
    let rows: Vec<TrackRow> = sqlx::query_as(&format!(
        r#"
        SELECT {} FROM tracks
        WHERE EXISTS (
            SELECT 1 FROM json_each(tracks.artists)
            WHERE json_each.value = ?
        )
        ORDER BY created_at DESC
        "#,
        SELECT_COLUMNS
    ))
    .bind(artist)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(TrackRow::into_track).collect()
}

/// Fetch a single track by id.
pub async fn get_track(pool: &Pool<Sqlite>, id: Uuid) -> Result<Track> {
    let row: Option<TrackRow> = sqlx::query_as(&format!(
        "SELECT {} FROM tracks WHERE id = ?",
        SELECT_COLUMNS
    ))
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => row.into_track(),
        None => Err(Error::NotFound(format!("Track {}", id))),
    }
}

/// Fetch tracks for a playlist, preserving the requested order.
///
/// Unknown ids are skipped rather than erroring: a playlist assembled from
/// a stale client view may reference tracks deleted since.
pub async fn get_tracks_ordered(pool: &Pool<Sqlite>, ids: &[Uuid]) -> Result<Vec<Track>> {
    let mut tracks = Vec::with_capacity(ids.len());
    for id in ids {
        match get_track(pool, *id).await {
            Ok(track) => tracks.push(track),
            Err(Error::NotFound(_)) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(tracks)
}
