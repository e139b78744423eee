//! A backend without a decoder
//!
//! Simulates a fixed-length 640x480 stream whose position follows the wall
//! clock while playing. Useful for exercising players without media files.

use super::player::{MediaBackend, StreamInfo, VideoFrame};
use crate::core::errors::MediaError;
use std::time::{Duration, Instant};
use url::Url;

pub const NULL_WIDTH: u32 = 640;
pub const NULL_HEIGHT: u32 = 480;
pub const NULL_FPS: u32 = 30;
/// Ten minutes
pub const NULL_DURATION: Duration = Duration::from_secs(10 * 60);

#[derive(Debug)]
pub struct NullBackend {
    duration: Duration,
    /// Position when the clock was last (re)started
    base_ms: i64,
    started: Option<Instant>,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::with_duration(NULL_DURATION)
    }

    /// Simulate a stream of the given length
    pub fn with_duration(duration: Duration) -> Self {
        Self {
            duration,
            base_ms: 0,
            started: None,
        }
    }

    fn elapsed_ms(&self) -> i64 {
        self.started
            .map_or(0, |started| started.elapsed().as_millis() as i64)
    }
}

impl Default for NullBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaBackend for NullBackend {
    fn open(&mut self, _url: &Url) -> Result<StreamInfo, MediaError> {
        self.base_ms = 0;
        self.started = None;
        Ok(StreamInfo {
            width: NULL_WIDTH,
            height: NULL_HEIGHT,
            fps: NULL_FPS,
            bitrate: 0,
            total_frames: 0,
            duration_ms: self.duration.as_millis() as u64,
            video_codec: "null-dummy".to_string(),
            audio_codec: "none".to_string(),
        })
    }

    fn start(&mut self) -> bool {
        self.started = Some(Instant::now());
        true
    }

    fn pause(&mut self) -> bool {
        self.base_ms += self.elapsed_ms();
        self.started = None;
        true
    }

    fn stop(&mut self) -> bool {
        self.base_ms = 0;
        self.started = None;
        true
    }

    fn destroy(&mut self) {
        self.stop();
    }

    fn position(&mut self) -> i64 {
        self.base_ms + self.elapsed_ms()
    }

    fn seek(&mut self, position_ms: i64) -> i64 {
        self.base_ms = position_ms;
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
        position_ms
    }

    fn decode_frame(&mut self, position_ms: u64) -> Option<VideoFrame> {
        Some(VideoFrame {
            index: position_ms * u64::from(NULL_FPS) / 1_000,
            position_ms,
            width: NULL_WIDTH,
            height: NULL_HEIGHT,
        })
    }
}
