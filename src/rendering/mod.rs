//! Rendering
//!
//! Drawables for the animator:
//! - Glyph fill tessellation with lyon
//! - A frame counter for headless runs and tests

pub mod frame_counter;
pub mod outline_fill;

// Re-export commonly used items
pub use frame_counter::FrameCounter;
pub use outline_fill::OutlineFill;
