//! Font source data structures
//!
//! Glyph point data, font metrics and the glyph set that ties them to a
//! character map.

pub mod glyph;
pub mod glyph_set;
pub mod metrics;

pub use glyph::{Glyph, GlyphPoint};
pub use glyph_set::{GlyphSet, NOTDEF};
pub use metrics::FontMetrics;
