//! glyphloop
//!
//! TrueType glyph contours to path commands, text layout over those paths, and
//! an animator that drives redraws from a background thread.
pub mod animation;
pub mod core;
pub mod data;
pub mod font_source;
pub mod geometry;
pub mod logging;
pub mod media;
pub mod rendering;
