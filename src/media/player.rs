//! Media playback state machine
//!
//! `MediaPlayer` owns the playback state and delegates decoding to a
//! [`MediaBackend`]. State changes follow a small fixed table:
//!
//! ```text
//! set_stream: ANY -> Uninitialized -> Stopped
//! start:      Stopped, Paused -> Playing
//! pause:      Playing -> Paused
//! stop:       Playing, Paused -> Stopped
//! destroy:    ANY -> Uninitialized
//! ```
//!
//! Any other request leaves the state untouched.

use crate::core::errors::MediaError;
use std::fmt;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaState {
    Uninitialized,
    Stopped,
    Playing,
    Paused,
}

impl fmt::Display for MediaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaState::Uninitialized => "uninitialized",
            MediaState::Stopped => "stopped",
            MediaState::Playing => "playing",
            MediaState::Paused => "paused",
        };
        f.write_str(name)
    }
}

/// Stream attributes reported by the backend once a stream is open
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Bits per second
    pub bitrate: u64,
    /// Zero when unknown
    pub total_frames: u64,
    pub duration_ms: u64,
    pub video_codec: String,
    pub audio_codec: String,
}

/// A decoded video frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoFrame {
    pub index: u64,
    pub position_ms: u64,
    pub width: u32,
    pub height: u32,
}

/// Decoder side of a media player
///
/// Positions are raw milliseconds and may fall outside the stream; the player
/// clamps them.
pub trait MediaBackend {
    /// Open `url`, replacing any previous stream
    fn open(&mut self, url: &Url) -> Result<StreamInfo, MediaError>;

    fn start(&mut self) -> bool;

    fn pause(&mut self) -> bool;

    fn stop(&mut self) -> bool;

    /// Release decoder resources
    fn destroy(&mut self) {}

    fn position(&mut self) -> i64;

    /// Move to `position_ms` and return the position actually reached
    fn seek(&mut self, position_ms: i64) -> i64;

    /// Returns false when the backend cannot change speed
    fn set_play_speed(&mut self, _rate: f32) -> bool {
        false
    }

    /// `0.0` when speed control is unsupported
    fn play_speed(&self) -> f32 {
        0.0
    }

    fn decode_frame(&mut self, position_ms: u64) -> Option<VideoFrame>;
}

pub struct MediaPlayer<B: MediaBackend> {
    backend: B,
    state: MediaState,
    url: Option<Url>,
    info: StreamInfo,
    last_frame: Option<VideoFrame>,
}

impl<B: MediaBackend> MediaPlayer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: MediaState::Uninitialized,
            url: None,
            info: StreamInfo::default(),
            last_frame: None,
        }
    }

    /// Open a new stream, tearing down the current one first
    pub fn set_stream(&mut self, url: Url) -> Result<MediaState, MediaError> {
        self.destroy();
        let info = self.backend.open(&url)?;
        debug!(
            "Opened {} ({}x{} @ {} fps, {} ms, video '{}', audio '{}')",
            url,
            info.width,
            info.height,
            info.fps,
            info.duration_ms,
            info.video_codec,
            info.audio_codec
        );
        self.info = info;
        self.url = Some(url);
        self.set_state(MediaState::Stopped);
        Ok(self.state)
    }

    /// Parse `url` and open it
    pub fn set_stream_str(&mut self, url: &str) -> Result<MediaState, MediaError> {
        let url = Url::parse(url)?;
        self.set_stream(url)
    }

    pub fn start(&mut self) -> MediaState {
        if matches!(self.state, MediaState::Stopped | MediaState::Paused) && self.backend.start() {
            self.set_state(MediaState::Playing);
        }
        self.state
    }

    pub fn pause(&mut self) -> MediaState {
        if self.state == MediaState::Playing && self.backend.pause() {
            self.set_state(MediaState::Paused);
        }
        self.state
    }

    pub fn stop(&mut self) -> MediaState {
        if matches!(self.state, MediaState::Playing | MediaState::Paused) && self.backend.stop() {
            self.set_state(MediaState::Stopped);
        }
        self.state
    }

    pub fn destroy(&mut self) {
        if self.state != MediaState::Uninitialized || self.url.is_some() {
            self.backend.destroy();
        }
        self.url = None;
        self.info = StreamInfo::default();
        self.last_frame = None;
        self.set_state(MediaState::Uninitialized);
    }

    /// Move to `position_ms`, clamped to the stream
    pub fn seek(&mut self, position_ms: i64) -> u64 {
        if self.state == MediaState::Uninitialized {
            return 0;
        }
        let reached = self.backend.seek(position_ms);
        self.validate_position(reached)
    }

    /// Current position, clamped to the stream
    ///
    /// Playback that runs past either end of the stream pauses the player.
    pub fn current_position(&mut self) -> u64 {
        if self.state == MediaState::Uninitialized {
            return 0;
        }
        let raw = self.backend.position();
        self.validate_position(raw)
    }

    pub fn set_play_speed(&mut self, rate: f32) -> bool {
        let changed = self.backend.set_play_speed(rate);
        if !changed {
            warn!("Play speed {} not supported by the media backend", rate);
        }
        changed
    }

    pub fn play_speed(&self) -> f32 {
        self.backend.play_speed()
    }

    /// Decode the frame at the current position
    pub fn next_frame(&mut self) -> Option<VideoFrame> {
        if self.state == MediaState::Uninitialized {
            return None;
        }
        let position = self.current_position();
        if let Some(frame) = self.backend.decode_frame(position) {
            self.last_frame = Some(frame);
        }
        self.last_frame
    }

    pub fn last_frame(&self) -> Option<VideoFrame> {
        self.last_frame
    }

    pub fn state(&self) -> MediaState {
        self.state
    }

    pub fn is_valid(&self) -> bool {
        self.state != MediaState::Uninitialized
    }

    pub fn stream_info(&self) -> &StreamInfo {
        &self.info
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn validate_position(&mut self, raw: i64) -> u64 {
        let duration = self.info.duration_ms;
        let out_of_range = raw < 0 || raw as u64 > duration;
        let position = raw.clamp(0, i64::try_from(duration).unwrap_or(i64::MAX)) as u64;
        if out_of_range && self.state == MediaState::Playing {
            debug!("Position {} ms outside of stream, pausing", raw);
            self.pause();
        }
        position
    }

    fn set_state(&mut self, state: MediaState) {
        if self.state != state {
            debug!("Media player {} -> {}", self.state, state);
            self.state = state;
        }
    }
}

impl<B: MediaBackend> fmt::Debug for MediaPlayer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaPlayer")
            .field("state", &self.state)
            .field("url", &self.url.as_ref().map(Url::as_str))
            .field("info", &self.info)
            .finish()
    }
}

impl<B: MediaBackend> Drop for MediaPlayer<B> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend with a settable clock and a switch to refuse streams
    #[derive(Default)]
    struct ScriptedBackend {
        position: i64,
        refuse: bool,
        destroyed: usize,
        duration_ms: Option<u64>,
    }

    impl MediaBackend for ScriptedBackend {
        fn open(&mut self, url: &Url) -> Result<StreamInfo, MediaError> {
            if self.refuse {
                return Err(MediaError::InvalidStream(url.to_string()));
            }
            Ok(StreamInfo {
                width: 160,
                height: 90,
                fps: 25,
                duration_ms: self.duration_ms.unwrap_or(1_000),
                ..StreamInfo::default()
            })
        }

        fn start(&mut self) -> bool {
            true
        }

        fn pause(&mut self) -> bool {
            true
        }

        fn stop(&mut self) -> bool {
            self.position = 0;
            true
        }

        fn destroy(&mut self) {
            self.destroyed += 1;
        }

        fn position(&mut self) -> i64 {
            self.position
        }

        fn seek(&mut self, position_ms: i64) -> i64 {
            self.position = position_ms;
            position_ms
        }

        fn decode_frame(&mut self, position_ms: u64) -> Option<VideoFrame> {
            Some(VideoFrame {
                index: position_ms * 25 / 1_000,
                position_ms,
                width: 160,
                height: 90,
            })
        }
    }

    fn opened() -> MediaPlayer<ScriptedBackend> {
        let mut player = MediaPlayer::new(ScriptedBackend::default());
        player.set_stream_str("file:///tmp/clip.mp4").unwrap();
        player
    }

    #[test]
    fn test_state_transitions() {
        let mut player = MediaPlayer::new(ScriptedBackend::default());
        assert_eq!(player.state(), MediaState::Uninitialized);
        // Nothing to play yet
        assert_eq!(player.start(), MediaState::Uninitialized);

        player.set_stream_str("file:///tmp/clip.mp4").unwrap();
        assert_eq!(player.state(), MediaState::Stopped);
        assert_eq!(player.pause(), MediaState::Stopped);
        assert_eq!(player.start(), MediaState::Playing);
        assert_eq!(player.start(), MediaState::Playing);
        assert_eq!(player.pause(), MediaState::Paused);
        assert_eq!(player.start(), MediaState::Playing);
        assert_eq!(player.stop(), MediaState::Stopped);
        assert_eq!(player.stop(), MediaState::Stopped);

        player.destroy();
        assert_eq!(player.state(), MediaState::Uninitialized);
        assert!(player.url().is_none());
    }

    #[test]
    fn test_set_stream_replaces_previous() {
        let mut player = opened();
        player.start();
        player.set_stream_str("file:///tmp/other.mp4").unwrap();
        assert_eq!(player.state(), MediaState::Stopped);
        assert_eq!(player.backend().destroyed, 1);
        assert_eq!(player.url().map(Url::path), Some("/tmp/other.mp4"));
    }

    #[test]
    fn test_refused_stream_stays_uninitialized() {
        let mut player = MediaPlayer::new(ScriptedBackend {
            refuse: true,
            ..ScriptedBackend::default()
        });
        let err = player.set_stream_str("file:///tmp/broken.mp4").unwrap_err();
        assert!(matches!(err, MediaError::InvalidStream(_)));
        assert_eq!(player.state(), MediaState::Uninitialized);

        let err = player.set_stream_str("not a url").unwrap_err();
        assert!(matches!(err, MediaError::InvalidUrl(_)));
    }

    #[test]
    fn test_seek_clamps_and_pauses_playback() {
        let mut player = opened();
        assert_eq!(player.seek(400), 400);
        assert_eq!(player.seek(-50), 0);
        // Not playing, so clamping alone does not change state
        assert_eq!(player.state(), MediaState::Stopped);

        player.start();
        assert_eq!(player.seek(5_000), 1_000);
        assert_eq!(player.state(), MediaState::Paused);
    }

    #[test]
    fn test_seek_with_unbounded_duration() {
        let mut player = MediaPlayer::new(ScriptedBackend {
            duration_ms: Some(u64::MAX),
            ..ScriptedBackend::default()
        });
        player.set_stream_str("file:///tmp/live.ts").unwrap();
        player.start();
        assert_eq!(player.seek(i64::MAX), i64::MAX as u64);
        assert_eq!(player.seek(-1), 0);
        assert_eq!(player.state(), MediaState::Paused);
    }

    #[test]
    fn test_running_past_the_end_pauses() {
        let mut player = opened();
        player.start();
        player.backend.position = 1_200;
        assert_eq!(player.current_position(), 1_000);
        assert_eq!(player.state(), MediaState::Paused);
    }

    #[test]
    fn test_frames() {
        let mut player = MediaPlayer::new(ScriptedBackend::default());
        assert!(player.next_frame().is_none());

        player.set_stream_str("file:///tmp/clip.mp4").unwrap();
        player.seek(400);
        let frame = player.next_frame().unwrap();
        assert_eq!(frame.index, 10);
        assert_eq!(player.last_frame(), Some(frame));
    }

    #[test]
    fn test_play_speed_unsupported_by_default() {
        let mut player = opened();
        assert!(!player.set_play_speed(2.0));
        assert_eq!(player.play_speed(), 0.0);
    }
}
