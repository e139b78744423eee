//! A drawable that only counts

use crate::animation::Drawable;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Records redraws and exclusive-context changes without drawing anything
#[derive(Debug, Default)]
pub struct FrameCounter {
    name: String,
    frames: AtomicU64,
    exclusive: AtomicBool,
    exclusive_changes: AtomicU64,
}

impl FrameCounter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    pub fn has_exclusive_context(&self) -> bool {
        self.exclusive.load(Ordering::Acquire)
    }

    /// Number of `set_exclusive_context` calls that changed the flag
    pub fn exclusive_changes(&self) -> u64 {
        self.exclusive_changes.load(Ordering::Acquire)
    }
}

impl Drawable for FrameCounter {
    fn display(&self) {
        self.frames.fetch_add(1, Ordering::AcqRel);
    }

    fn set_exclusive_context(&self, enabled: bool) {
        if self.exclusive.swap(enabled, Ordering::AcqRel) != enabled {
            self.exclusive_changes.fetch_add(1, Ordering::AcqRel);
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
