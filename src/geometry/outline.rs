//! Glyph outline to path conversion
//!
//! Walks each TrueType contour cyclically and emits move/line/quad/close
//! commands. Two consecutive off-curve points imply an on-curve point halfway
//! between them, which is synthesized with integer arithmetic.

use super::path::{PathCommand, PathPoint};
use crate::core::errors::OutlineError;
use crate::font_source::glyph::check_terminated;
use crate::font_source::{Glyph, GlyphPoint};

/// Implied on-curve coordinate between `a` and `b`, truncated toward `a`
pub fn mid_value(a: i32, b: i32) -> i32 {
    let (a, b) = (i64::from(a), i64::from(b));
    // Lies between a and b, so it fits back into i32
    (a + (b - a) / 2) as i32
}

fn midpoint(a: PathPoint, b: PathPoint) -> PathPoint {
    PathPoint::new(mid_value(a.x, b.x), mid_value(a.y, b.y))
}

fn position(point: &GlyphPoint) -> PathPoint {
    PathPoint::new(point.x, point.y)
}

/// Build the path of a glyph
pub fn build_path(glyph: &Glyph) -> Vec<PathCommand> {
    let mut commands = Vec::with_capacity(glyph.point_count() + glyph.contour_count());
    for contour in glyph.contours() {
        add_contour_to_path(&mut commands, contour);
    }
    commands
}

/// Build a path from raw `glyf`-style points.
///
/// Every contour must end on a point with `end_of_contour` set.
pub fn build_path_from_points(points: &[GlyphPoint]) -> Result<Vec<PathCommand>, OutlineError> {
    check_terminated(points)?;
    let mut commands = Vec::with_capacity(points.len());
    for contour in points.split_inclusive(|p| p.end_of_contour) {
        add_contour_to_path(&mut commands, contour);
    }
    Ok(commands)
}

/// Append one closed contour. Contours of fewer than two points are skipped.
fn add_contour_to_path(commands: &mut Vec<PathCommand>, contour: &[GlyphPoint]) {
    let count = contour.len();
    if count < 2 {
        return;
    }
    let at = |offset: usize| &contour[offset % count];

    // The pen starts on an on-curve point: the first one, else the last one,
    // else the point implied between last and first. It never moves to an
    // off-curve point.
    let (start, first_offset) = if contour[0].on_curve {
        (position(&contour[0]), 1)
    } else if contour[count - 1].on_curve {
        (position(&contour[count - 1]), 0)
    } else {
        (midpoint(position(&contour[count - 1]), position(&contour[0])), 0)
    };
    commands.push(PathCommand::MoveTo { to: start });

    let last_offset = first_offset + count - 1;
    let mut pending: Option<PathPoint> = None;
    for offset in first_offset..=last_offset {
        let point = at(offset);
        let to = position(point);
        if point.on_curve {
            match pending.take() {
                Some(ctrl) => commands.push(PathCommand::QuadTo { ctrl, to }),
                // The straight segment back to the start is drawn by Close
                None if offset == last_offset => {}
                None => commands.push(PathCommand::LineTo { to }),
            }
        } else {
            if let Some(ctrl) = pending {
                commands.push(PathCommand::QuadTo {
                    ctrl,
                    to: midpoint(ctrl, to),
                });
            }
            pending = Some(to);
        }
    }
    if let Some(ctrl) = pending {
        commands.push(PathCommand::QuadTo { ctrl, to: start });
    }
    commands.push(PathCommand::Close);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::path::to_svg_path_data;

    fn glyph(contours: Vec<Vec<GlyphPoint>>) -> Glyph {
        Glyph::from_contours("test", 0.0, contours)
    }

    #[test]
    fn test_mid_value_truncates_toward_first() {
        assert_eq!(mid_value(0, 5), 2);
        assert_eq!(mid_value(5, 0), 3);
        assert_eq!(mid_value(-1, -4), -2);
        assert_eq!(mid_value(10, 10), 10);
    }

    #[test]
    fn test_mid_value_at_coordinate_extremes() {
        assert_eq!(mid_value(i32::MIN, i32::MAX), -1);
        assert_eq!(mid_value(i32::MAX, i32::MIN), 0);

        let commands = build_path(&glyph(vec![vec![
            GlyphPoint::on(i32::MIN, 0),
            GlyphPoint::off(i32::MAX, 0),
            GlyphPoint::off(i32::MIN, 0),
        ]]));
        assert_eq!(commands.len(), 4);
        assert_eq!(
            commands[1],
            PathCommand::QuadTo {
                ctrl: PathPoint::new(i32::MAX, 0),
                to: PathPoint::new(0, 0),
            }
        );
    }

    #[test]
    fn test_all_on_curve_contour() {
        let square = glyph(vec![vec![
            GlyphPoint::on(0, 0),
            GlyphPoint::on(100, 0),
            GlyphPoint::on(100, 100),
            GlyphPoint::on(0, 100),
        ]]);
        assert_eq!(
            build_path(&square),
            vec![
                PathCommand::move_to(0, 0),
                PathCommand::line_to(100, 0),
                PathCommand::line_to(100, 100),
                PathCommand::line_to(0, 100),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn test_on_off_on_gives_one_quad() {
        let arch = glyph(vec![vec![
            GlyphPoint::on(0, 0),
            GlyphPoint::off(50, 100),
            GlyphPoint::on(100, 0),
        ]]);
        let commands = build_path(&arch);
        assert_eq!(
            commands,
            vec![
                PathCommand::move_to(0, 0),
                PathCommand::quad_to(50, 100, 100, 0),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn test_consecutive_off_curve_synthesizes_midpoint() {
        let contour = glyph(vec![vec![
            GlyphPoint::on(0, 0),
            GlyphPoint::off(0, 101),
            GlyphPoint::off(101, 101),
            GlyphPoint::on(101, 0),
        ]]);
        assert_eq!(
            build_path(&contour),
            vec![
                PathCommand::move_to(0, 0),
                PathCommand::quad_to(0, 101, 50, 101),
                PathCommand::quad_to(101, 101, 101, 0),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn test_wraps_to_first_point() {
        // The last point is off-curve, so the closing segment is a curve into the start
        let contour = glyph(vec![vec![
            GlyphPoint::on(0, 0),
            GlyphPoint::on(100, 0),
            GlyphPoint::off(50, -60),
        ]]);
        assert_eq!(
            to_svg_path_data(&build_path(&contour)),
            "M0 0 L100 0 Q50 -60 0 0 Z"
        );

        let trailing_offs = glyph(vec![vec![
            GlyphPoint::on(0, 0),
            GlyphPoint::off(10, 20),
            GlyphPoint::off(31, 20),
        ]]);
        assert_eq!(
            to_svg_path_data(&build_path(&trailing_offs)),
            "M0 0 Q10 20 20 20 Q31 20 0 0 Z"
        );
    }

    #[test]
    fn test_off_curve_start() {
        let from_last = glyph(vec![vec![
            GlyphPoint::off(50, 100),
            GlyphPoint::on(100, 0),
            GlyphPoint::on(0, 0),
        ]]);
        assert_eq!(
            to_svg_path_data(&build_path(&from_last)),
            "M0 0 Q50 100 100 0 Z"
        );

        let all_off = glyph(vec![vec![
            GlyphPoint::off(0, 100),
            GlyphPoint::off(100, 100),
            GlyphPoint::off(100, 0),
            GlyphPoint::off(0, 0),
        ]]);
        assert_eq!(
            to_svg_path_data(&build_path(&all_off)),
            "M0 50 Q0 100 50 100 Q100 100 100 50 Q100 0 50 0 Q0 0 0 50 Z"
        );
    }

    #[test]
    fn test_multiple_contours_each_closed() {
        let two = glyph(vec![
            vec![GlyphPoint::on(0, 0), GlyphPoint::on(10, 0), GlyphPoint::on(10, 10)],
            vec![GlyphPoint::on(20, 0), GlyphPoint::off(25, 10), GlyphPoint::on(30, 0)],
        ]);
        let commands = build_path(&two);
        let moves = commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo { .. }))
            .count();
        let closes = commands.iter().filter(|c| **c == PathCommand::Close).count();
        assert_eq!(moves, 2);
        assert_eq!(closes, 2);
        assert_eq!(commands[4], PathCommand::move_to(20, 0));
    }

    #[test]
    fn test_degenerate_contours_are_skipped() {
        let single = glyph(vec![vec![GlyphPoint::on(5, 5)]]);
        assert!(build_path(&single).is_empty());
        assert!(build_path(&glyph(Vec::new())).is_empty());
    }

    #[test]
    fn test_raw_points() {
        let points = vec![
            GlyphPoint::on(0, 0),
            GlyphPoint::on(10, 0),
            GlyphPoint::on(10, 10).ending(),
        ];
        let commands = build_path_from_points(&points).unwrap();
        assert_eq!(commands.len(), 4);

        let unterminated = vec![GlyphPoint::on(0, 0), GlyphPoint::on(10, 0)];
        assert_eq!(
            build_path_from_points(&unterminated),
            Err(OutlineError::UnterminatedContour { start: 0, len: 2 })
        );
    }
}
