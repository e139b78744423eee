//! Media playback
//!
//! A backend-agnostic player state machine plus a null backend that needs no
//! decoder.

pub mod null;
pub mod player;

pub use null::NullBackend;
pub use player::{MediaBackend, MediaPlayer, MediaState, StreamInfo, VideoFrame};
