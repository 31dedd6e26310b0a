//! Playback session behavior tests
//!
//! Exercises queue traversal, shuffle/repeat semantics, and volume/mute
//! interactions through the shared session handle.

use chrono::Utc;
use hifier_common::events::{PlayerEvent, RepeatMode};
use hifier_common::Track;
use hifier_server::player::{PlayerSession, SharedPlayer};
use uuid::Uuid;

fn track(name: &str) -> Track {
    Track {
        id: Uuid::new_v4(),
        title: name.to_string(),
        artists: vec![format!("{} Artist", name)],
        album: "Album".to_string(),
        cover_url: "https://covers.example/c.png".to_string(),
        music_url: format!("https://media.example/{}.mp3", name),
        user_id: "u1".to_string(),
        user_name: "Uploader".to_string(),
        created_at: Utc::now(),
        metadata: None,
    }
}

fn playlist(n: usize) -> Vec<Track> {
    (0..n).map(|i| track(&format!("t{}", i))).collect()
}

#[test]
fn repeat_all_cycle_returns_to_origin_for_any_queue_length() {
    for len in 1..=6 {
        for start in 0..len {
            let mut session = PlayerSession::new();
            let tracks = playlist(len);
            session.play_track(tracks[start].clone(), tracks.clone());
            session.toggle_repeat(); // off -> all

            for _ in 0..len {
                session.next();
            }

            assert_eq!(
                session.current_track().unwrap().id,
                tracks[start].id,
                "len={} start={}",
                len,
                start
            );
        }
    }
}

#[test]
fn repeat_off_stops_at_last_position() {
    let mut session = PlayerSession::new();
    let tracks = playlist(4);
    session.play_track(tracks[3].clone(), tracks.clone());

    session.next();

    assert!(!session.is_playing());
    assert_eq!(session.current_track().unwrap().id, tracks[3].id);
}

#[test]
fn previous_from_first_position_wraps_in_every_repeat_mode() {
    for mode_steps in 0..3 {
        let mut session = PlayerSession::new();
        let tracks = playlist(3);
        session.play_track(tracks[0].clone(), tracks.clone());
        for _ in 0..mode_steps {
            session.toggle_repeat();
        }

        session.previous();
        assert_eq!(session.current_track().unwrap().id, tracks[2].id);
    }
}

#[test]
fn shuffle_enable_disable_is_identity_on_queue_order() {
    let mut session = PlayerSession::new();
    let tracks = playlist(12);
    session.play_track(tracks[7].clone(), tracks.clone());
    let mut rng = rand::thread_rng();

    session.toggle_shuffle(&mut rng);
    session.toggle_shuffle(&mut rng);

    let restored: Vec<Uuid> = session.queue().iter().map(|t| t.id).collect();
    let original: Vec<Uuid> = tracks.iter().map(|t| t.id).collect();
    assert_eq!(restored, original);
}

#[test]
fn scenario_abc_with_repeat_all() {
    let mut session = PlayerSession::new();
    let a = track("A");
    let b = track("B");
    let c = track("C");
    let queue = vec![a.clone(), b.clone(), c.clone()];

    session.play_track(b.clone(), queue);
    session.toggle_repeat(); // all

    session.next();
    assert_eq!(session.current_track().unwrap().id, c.id);

    session.next();
    assert_eq!(session.current_track().unwrap().id, a.id);
}

#[test]
fn volume_and_mute_interaction() {
    let mut session = PlayerSession::new();

    session.toggle_mute();
    session.set_volume(0.5);
    assert!(!session.is_muted());

    session.toggle_mute();
    session.set_volume(0.7);
    assert!(!session.is_muted());

    session.toggle_mute();
    assert_eq!(session.effective_gain(), 0.0);
    assert_eq!(session.volume(), 0.7);
}

#[test]
fn repeat_cycles_through_all_modes() {
    let mut session = PlayerSession::new();
    assert_eq!(session.repeat_mode(), RepeatMode::Off);
    session.toggle_repeat();
    assert_eq!(session.repeat_mode(), RepeatMode::All);
    session.toggle_repeat();
    assert_eq!(session.repeat_mode(), RepeatMode::One);
    session.toggle_repeat();
    assert_eq!(session.repeat_mode(), RepeatMode::Off);
}

#[tokio::test]
async fn shared_player_emits_stop_event_at_queue_end() {
    let player = SharedPlayer::new();
    let tracks = playlist(1);
    player
        .play_track(tracks[0].clone(), tracks.clone())
        .await;
    let mut rx = player.subscribe_events();

    player.next().await;

    let event = rx.recv().await.unwrap();
    assert!(matches!(event, PlayerEvent::PlaybackStopped { .. }));
    let snapshot = player.snapshot().await;
    assert!(!snapshot.playing);
    assert_eq!(snapshot.current_track.unwrap().id, tracks[0].id);
}

#[tokio::test]
async fn shared_player_shuffle_keeps_current_at_front() {
    let player = SharedPlayer::new();
    let tracks = playlist(10);
    player
        .play_track(tracks[4].clone(), tracks.clone())
        .await;

    player.toggle_shuffle().await;

    let snapshot = player.snapshot().await;
    assert!(snapshot.shuffling);
    assert_eq!(snapshot.queue[0].track_id, tracks[4].id);
    assert_eq!(snapshot.queue.len(), tracks.len());
}
