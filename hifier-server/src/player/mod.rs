//! Playback session controller
//!
//! The session state machine (`session`), its shared async wrapper
//! (`shared`), and the bridge consuming audio-element signals
//! (`transport`).

pub mod session;
pub mod shared;
pub mod transport;

pub use session::PlayerSession;
pub use shared::{PlayerSnapshot, SharedPlayer};
pub use transport::{spawn_transport_bridge, transport_channel, TransportSignal};
