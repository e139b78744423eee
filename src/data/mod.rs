//! UFO interchange
//!
//! Conversion between the norad UFO model and our TrueType-style glyph data.

pub mod conversions;
pub mod ufo;

pub use ufo::{is_ufo_directory, load_ufo_from_path, save_ufo_to_path};
