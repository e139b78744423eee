//! Frame rate accounting for the animation loop

use std::time::{Duration, Instant};
use tracing::info;

/// Counts frames and reports the frame rate every `update_frames` frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    update_frames: u32,
    frames_since_update: u32,
    total_frames: u64,
    started_at: Instant,
    last_update_at: Instant,
    last_fps: f32,
    total_fps: f32,
}

/// Point-in-time copy of the counter values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsSnapshot {
    pub total_frames: u64,
    pub total_duration: Duration,
    pub last_fps: f32,
    pub total_fps: f32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(0)
    }
}

impl FpsCounter {
    /// `update_frames == 0` disables periodic reporting
    pub fn new(update_frames: u32) -> Self {
        let now = Instant::now();
        Self {
            update_frames,
            frames_since_update: 0,
            total_frames: 0,
            started_at: now,
            last_update_at: now,
            last_fps: 0.0,
            total_fps: 0.0,
        }
    }

    pub fn set_update_frames(&mut self, frames: u32) {
        self.update_frames = frames;
        self.frames_since_update = 0;
        self.last_update_at = Instant::now();
    }

    pub fn update_frames(&self) -> u32 {
        self.update_frames
    }

    /// Restart all measurements, keeping the update interval
    pub fn reset(&mut self) {
        *self = Self::new(self.update_frames);
    }

    /// Record one completed frame (one redraw pass over all drawables)
    pub fn tick(&mut self) {
        self.total_frames += 1;
        if self.update_frames == 0 {
            return;
        }
        self.frames_since_update += 1;
        if self.frames_since_update < self.update_frames {
            return;
        }

        let now = Instant::now();
        let interval = now.duration_since(self.last_update_at).as_secs_f32();
        let total = now.duration_since(self.started_at).as_secs_f32();
        if interval > 0.0 {
            self.last_fps = self.frames_since_update as f32 / interval;
        }
        if total > 0.0 {
            self.total_fps = self.total_frames as f32 / total;
        }
        info!(
            "{:.1}s: {} f / {:.0} ms, {:.1} fps; total: {} f, {:.1} fps",
            total,
            self.frames_since_update,
            interval * 1000.0,
            self.last_fps,
            self.total_frames,
            self.total_fps
        );
        self.frames_since_update = 0;
        self.last_update_at = now;
    }

    pub fn snapshot(&self) -> FpsSnapshot {
        FpsSnapshot {
            total_frames: self.total_frames,
            total_duration: self.started_at.elapsed(),
            last_fps: self.last_fps,
            total_fps: self.total_fps,
        }
    }
}
