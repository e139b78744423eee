//! Export path commands to rasterizer path types

use super::path::{PathCommand, PathPoint};
use kurbo::{Affine, BezPath, Point};
use lyon::math::point as lyon_point;
use lyon::path::Path as LyonPath;

/// Convert to a kurbo path in font units
pub fn to_bezpath(commands: &[PathCommand]) -> BezPath {
    to_bezpath_transformed(commands, Affine::IDENTITY)
}

/// Convert to a kurbo path with `transform` applied to every point
pub fn to_bezpath_transformed(commands: &[PathCommand], transform: Affine) -> BezPath {
    let map = |p: PathPoint| transform * Point::from(p);
    let mut path = BezPath::new();
    for command in commands {
        match *command {
            PathCommand::MoveTo { to } => path.move_to(map(to)),
            PathCommand::LineTo { to } => path.line_to(map(to)),
            PathCommand::QuadTo { ctrl, to } => path.quad_to(map(ctrl), map(to)),
            PathCommand::Close => path.close_path(),
        }
    }
    path
}

/// Convert to a lyon path for tessellation
///
/// lyon requires every sub-path to be explicitly ended, so an open sub-path
/// is ended (unclosed) when the next one begins or the commands run out.
pub fn to_lyon_path(commands: &[PathCommand]) -> LyonPath {
    let to_lyon = |p: PathPoint| lyon_point(p.x as f32, p.y as f32);
    let mut builder = LyonPath::builder();
    let mut open = false;

    for command in commands {
        match *command {
            PathCommand::MoveTo { to } => {
                if open {
                    builder.end(false);
                }
                builder.begin(to_lyon(to));
                open = true;
            }
            PathCommand::LineTo { to } => {
                if !open {
                    builder.begin(to_lyon(to));
                    open = true;
                } else {
                    builder.line_to(to_lyon(to));
                }
            }
            PathCommand::QuadTo { ctrl, to } => {
                if !open {
                    builder.begin(to_lyon(ctrl));
                    open = true;
                }
                builder.quadratic_bezier_to(to_lyon(ctrl), to_lyon(to));
            }
            PathCommand::Close => {
                if open {
                    builder.end(true);
                    open = false;
                }
            }
        }
    }
    if open {
        builder.end(false);
    }
    builder.build()
}
