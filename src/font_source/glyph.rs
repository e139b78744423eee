//! TrueType-style glyph point data
//!
//! A glyph is a flat list of points. Each contour ends on a point carrying the
//! end-of-contour marker, the way the `glyf` table stores them.

use crate::core::errors::OutlineError;
use serde::{Deserialize, Serialize};

/// A quadratic outline control point in font units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphPoint {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "on")]
    pub on_curve: bool,
    /// Set on the last point of each contour
    #[serde(skip)]
    pub end_of_contour: bool,
}

impl GlyphPoint {
    pub fn new(x: i32, y: i32, on_curve: bool) -> Self {
        Self {
            x,
            y,
            on_curve,
            end_of_contour: false,
        }
    }

    /// On-curve point
    pub fn on(x: i32, y: i32) -> Self {
        Self::new(x, y, true)
    }

    /// Off-curve control point
    pub fn off(x: i32, y: i32) -> Self {
        Self::new(x, y, false)
    }

    /// Mark this point as the last one of its contour
    pub fn ending(mut self) -> Self {
        self.end_of_contour = true;
        self
    }
}

/// A glyph outline with its advance and character mapping
///
/// Invariant: `points` is empty or its last point ends a contour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GlyphRecord", into = "GlyphRecord")]
pub struct Glyph {
    name: String,
    advance_width: f64,
    codepoints: Vec<char>,
    points: Vec<GlyphPoint>,
}

impl Glyph {
    /// Build a glyph from separate contours, setting the end markers.
    /// Empty contours are dropped.
    pub fn from_contours<I>(name: impl Into<String>, advance_width: f64, contours: I) -> Self
    where
        I: IntoIterator<Item = Vec<GlyphPoint>>,
    {
        let mut points = Vec::new();
        for contour in contours {
            let len = contour.len();
            points.extend(contour.into_iter().enumerate().map(|(i, mut p)| {
                p.end_of_contour = i + 1 == len;
                p
            }));
        }
        Self {
            name: name.into(),
            advance_width,
            codepoints: Vec::new(),
            points,
        }
    }

    /// Build a glyph from raw points that already carry end-of-contour markers
    pub fn from_points(
        name: impl Into<String>,
        advance_width: f64,
        points: Vec<GlyphPoint>,
    ) -> Result<Self, OutlineError> {
        check_terminated(&points)?;
        Ok(Self {
            name: name.into(),
            advance_width,
            codepoints: Vec::new(),
            points,
        })
    }

    /// Glyph without outline, e.g. a space
    pub fn empty(name: impl Into<String>, advance_width: f64) -> Self {
        Self::from_contours(name, advance_width, Vec::new())
    }

    pub fn with_codepoints(mut self, codepoints: impl IntoIterator<Item = char>) -> Self {
        self.codepoints = codepoints.into_iter().collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn advance_width(&self) -> f64 {
        self.advance_width
    }

    pub fn codepoints(&self) -> &[char] {
        &self.codepoints
    }

    pub fn points(&self) -> &[GlyphPoint] {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Contours in order, each slice ending on its end-of-contour point
    pub fn contours(&self) -> impl Iterator<Item = &[GlyphPoint]> {
        self.points.split_inclusive(|p| p.end_of_contour)
    }

    pub fn contour_count(&self) -> usize {
        self.points.iter().filter(|p| p.end_of_contour).count()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Reject point lists whose trailing points are not closed by an end marker
pub(crate) fn check_terminated(points: &[GlyphPoint]) -> Result<(), OutlineError> {
    let start = points
        .iter()
        .rposition(|p| p.end_of_contour)
        .map_or(0, |i| i + 1);
    if start < points.len() {
        return Err(OutlineError::UnterminatedContour {
            start,
            len: points.len() - start,
        });
    }
    Ok(())
}

/// Serialized form: contours as nested lists
#[derive(Serialize, Deserialize)]
struct GlyphRecord {
    name: String,
    #[serde(default)]
    advance_width: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    codepoints: Vec<char>,
    #[serde(default)]
    contours: Vec<Vec<GlyphPoint>>,
}

impl From<GlyphRecord> for Glyph {
    fn from(record: GlyphRecord) -> Self {
        Glyph::from_contours(record.name, record.advance_width, record.contours)
            .with_codepoints(record.codepoints)
    }
}

impl From<Glyph> for GlyphRecord {
    fn from(glyph: Glyph) -> Self {
        let contours = glyph.contours().map(|c| c.to_vec()).collect();
        GlyphRecord {
            name: glyph.name,
            advance_width: glyph.advance_width,
            codepoints: glyph.codepoints,
            contours,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<GlyphPoint> {
        vec![GlyphPoint::on(0, 0), GlyphPoint::on(100, 0), GlyphPoint::on(50, 80)]
    }

    #[test]
    fn test_from_contours_sets_end_markers() {
        let glyph = Glyph::from_contours("A", 500.0, vec![triangle(), Vec::new(), triangle()]);
        assert_eq!(glyph.point_count(), 6);
        assert_eq!(glyph.contour_count(), 2);
        let ends: Vec<bool> = glyph.points().iter().map(|p| p.end_of_contour).collect();
        assert_eq!(ends, vec![false, false, true, false, false, true]);
        assert!(glyph.contours().all(|c| c.len() == 3));
    }

    #[test]
    fn test_from_points_rejects_unterminated() {
        let mut points = triangle();
        points[2].end_of_contour = true;
        points.push(GlyphPoint::on(10, 10));
        let err = Glyph::from_points("bad", 0.0, points).unwrap_err();
        assert_eq!(err, OutlineError::UnterminatedContour { start: 3, len: 1 });
    }

    #[test]
    fn test_empty_glyph_has_no_contours() {
        let glyph = Glyph::empty("space", 250.0).with_codepoints([' ']);
        assert!(glyph.is_empty());
        assert_eq!(glyph.contours().count(), 0);
        assert_eq!(glyph.codepoints(), &[' ']);
    }

    #[test]
    fn test_json_keeps_contour_boundaries() {
        let glyph = Glyph::from_contours("o", 520.0, vec![triangle(), triangle()])
            .with_codepoints(['o']);
        let json = serde_json::to_string(&glyph).unwrap();
        assert!(json.contains("\"on\":true"));
        let parsed: Glyph = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, glyph);
    }
}
