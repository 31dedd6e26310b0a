//! Transport signal bridge
//!
//! The audio element runs in the browser; its lifecycle callbacks arrive
//! over HTTP and are funneled through an mpsc channel into a single
//! consumer task here. The task drives the shared session, which answers
//! with events on the broadcast channel (SSE back to the element).
//!
//! Signals for a session with no current track are no-ops.

use crate::player::SharedPlayer;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Signals emitted by the audio-rendering collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum TransportSignal {
    /// Playback of the current media reached its end
    Ended,
    /// Periodic position report
    Position { position_s: f64, duration_s: f64 },
}

/// Channel capacity for transport signals; position reports arrive about
/// once a second, so a small buffer is plenty.
pub const TRANSPORT_CHANNEL_CAPACITY: usize = 32;

/// Create the transport signal channel
pub fn transport_channel() -> (mpsc::Sender<TransportSignal>, mpsc::Receiver<TransportSignal>) {
    mpsc::channel(TRANSPORT_CHANNEL_CAPACITY)
}

/// Spawn the bridge task consuming transport signals until the channel
/// closes (all senders dropped).
pub fn spawn_transport_bridge(
    player: Arc<SharedPlayer>,
    mut rx: mpsc::Receiver<TransportSignal>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(signal) = rx.recv().await {
            match signal {
                TransportSignal::Ended => {
                    debug!("Transport reported track end");
                    player.handle_track_ended().await;
                }
                TransportSignal::Position {
                    position_s,
                    duration_s,
                } => {
                    player.report_position(position_s, duration_s).await;
                }
            }
        }
        debug!("Transport signal channel closed, bridge task exiting");
    })
}
