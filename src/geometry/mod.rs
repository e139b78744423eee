//! Outline geometry
//!
//! TrueType contour points to path commands, and everything built on those
//! commands: vertex outlines, rasterizer paths and laid-out text.

pub mod convert;
pub mod outline;
pub mod outline_shape;
pub mod path;
pub mod text;

// Re-export commonly used items
pub use convert::{to_bezpath, to_bezpath_transformed, to_lyon_path};
pub use outline::{build_path, build_path_from_points, mid_value};
pub use outline_shape::{Outline, OutlineShape, Vertex};
pub use path::{to_svg_path_data, PathCommand, PathPoint};
pub use text::{layout_outline_shapes, layout_text, place_glyphs, PlacedGlyph};
