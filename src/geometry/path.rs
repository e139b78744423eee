//! Path construction commands
//!
//! The output of the outline builder: integer font-unit commands that any
//! rasterizer can replay.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in font units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct PathPoint {
    pub x: i32,
    pub y: i32,
}

impl PathPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for PathPoint {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<PathPoint> for [i32; 2] {
    fn from(p: PathPoint) -> Self {
        [p.x, p.y]
    }
}

impl From<PathPoint> for kurbo::Point {
    fn from(p: PathPoint) -> Self {
        kurbo::Point::new(p.x as f64, p.y as f64)
    }
}

/// One path-construction step
///
/// Serialized as `{"cmd": "move" | "line" | "quad" | "close", ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum PathCommand {
    /// Start a new contour
    #[serde(rename = "move")]
    MoveTo { to: PathPoint },
    #[serde(rename = "line")]
    LineTo { to: PathPoint },
    /// Quadratic curve from the current point
    #[serde(rename = "quad")]
    QuadTo { ctrl: PathPoint, to: PathPoint },
    /// Close the current contour back to its start
    #[serde(rename = "close")]
    Close,
}

impl PathCommand {
    pub fn move_to(x: i32, y: i32) -> Self {
        PathCommand::MoveTo {
            to: PathPoint::new(x, y),
        }
    }

    pub fn line_to(x: i32, y: i32) -> Self {
        PathCommand::LineTo {
            to: PathPoint::new(x, y),
        }
    }

    pub fn quad_to(cx: i32, cy: i32, x: i32, y: i32) -> Self {
        PathCommand::QuadTo {
            ctrl: PathPoint::new(cx, cy),
            to: PathPoint::new(x, y),
        }
    }

    /// End point of the segment, `None` for `Close`
    pub fn end_point(&self) -> Option<PathPoint> {
        match *self {
            PathCommand::MoveTo { to }
            | PathCommand::LineTo { to }
            | PathCommand::QuadTo { to, .. } => Some(to),
            PathCommand::Close => None,
        }
    }
}

/// SVG path-data notation
impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCommand::MoveTo { to } => write!(f, "M{} {}", to.x, to.y),
            PathCommand::LineTo { to } => write!(f, "L{} {}", to.x, to.y),
            PathCommand::QuadTo { ctrl, to } => {
                write!(f, "Q{} {} {} {}", ctrl.x, ctrl.y, to.x, to.y)
            }
            PathCommand::Close => write!(f, "Z"),
        }
    }
}

/// Join commands into an SVG `d` attribute value
pub fn to_svg_path_data(commands: &[PathCommand]) -> String {
    commands
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_notation() {
        let commands = [
            PathCommand::move_to(0, 0),
            PathCommand::quad_to(50, 100, 100, 0),
            PathCommand::line_to(50, -20),
            PathCommand::Close,
        ];
        assert_eq!(
            to_svg_path_data(&commands),
            "M0 0 Q50 100 100 0 L50 -20 Z"
        );
    }

    #[test]
    fn test_json_tags() {
        let json = serde_json::to_string(&PathCommand::quad_to(1, 2, 3, 4)).unwrap();
        assert_eq!(json, r#"{"cmd":"quad","ctrl":[1,2],"to":[3,4]}"#);
        let close: PathCommand = serde_json::from_str(r#"{"cmd":"close"}"#).unwrap();
        assert_eq!(close, PathCommand::Close);
    }

    #[test]
    fn test_unknown_segment_tag_is_an_error() {
        let result = serde_json::from_str::<PathCommand>(r#"{"cmd":"cubic","to":[0,0]}"#);
        assert!(result.is_err());
    }
}
