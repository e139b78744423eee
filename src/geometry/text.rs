//! Text layout into glyph paths
//!
//! A single-line-per-`'\n'` layout without shaping: every character maps
//! directly to a glyph through the glyph set's character map. Layout happens in
//! a y-up space, so each new line moves the pen down.

use super::convert::to_bezpath_transformed;
use super::outline::build_path;
use super::outline_shape::OutlineShape;
use crate::font_source::{Glyph, GlyphSet};
use kurbo::{Affine, BezPath, Point};
use tracing::warn;

/// A glyph positioned on the pen line
#[derive(Debug, Clone, Copy)]
pub struct PlacedGlyph<'a> {
    pub ch: char,
    pub glyph: &'a Glyph,
    /// Maps font units into the caller's space
    pub transform: Affine,
}

/// Place every renderable character of `text`
///
/// Newlines and spaces only move the pen. Characters without a glyph use
/// `.notdef` when the set has one and are skipped otherwise.
pub fn place_glyphs<'a>(
    source: &'a GlyphSet,
    text: &str,
    pixel_size: f64,
    transform: Affine,
) -> Vec<PlacedGlyph<'a>> {
    let metrics = source.metrics();
    let scale = metrics.scale(pixel_size);
    let mut pen = Point::ZERO;
    let mut placed = Vec::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '\n' => {
                pen.x = 0.0;
                pen.y -= metrics.line_advance(pixel_size);
            }
            ' ' => pen.x += source.space_advance(pixel_size),
            _ => {
                let Some(glyph) = source.glyph_for_char(ch).or_else(|| source.notdef()) else {
                    warn!("No glyph for {:?} (U+{:04X}), skipping", ch, ch as u32);
                    continue;
                };
                let placement = Affine::translate(pen.to_vec2()) * Affine::scale(scale);
                placed.push(PlacedGlyph {
                    ch,
                    glyph,
                    transform: transform * placement,
                });
                pen.x += source.advance_width(glyph, pixel_size);
            }
        }
    }
    placed
}

/// Lay out `text` as one path per rendered glyph
pub fn layout_text(
    source: &GlyphSet,
    text: &str,
    pixel_size: f64,
    transform: Affine,
) -> Vec<BezPath> {
    place_glyphs(source, text, pixel_size, transform)
        .into_iter()
        .map(|placed| to_bezpath_transformed(&build_path(placed.glyph), placed.transform))
        .collect()
}

/// Lay out `text` as one outline shape per rendered glyph
pub fn layout_outline_shapes(
    source: &GlyphSet,
    text: &str,
    pixel_size: f64,
    transform: Affine,
) -> Vec<OutlineShape> {
    place_glyphs(source, text, pixel_size, transform)
        .into_iter()
        .map(|placed| OutlineShape::from_commands(&build_path(placed.glyph), placed.transform))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font_source::{FontMetrics, GlyphPoint};
    use kurbo::Shape;

    fn block(name: &str, ch: char, advance: f64) -> Glyph {
        Glyph::from_contours(
            name,
            advance,
            vec![vec![
                GlyphPoint::on(0, 0),
                GlyphPoint::on(500, 0),
                GlyphPoint::on(500, 700),
                GlyphPoint::on(0, 700),
            ]],
        )
        .with_codepoints([ch])
    }

    fn source() -> GlyphSet {
        let mut set = GlyphSet::new(FontMetrics {
            units_per_em: 1000.0,
            ascender: 800.0,
            descender: -200.0,
            line_gap: 100.0,
        });
        set.insert(block("A", 'A', 600.0));
        set.insert(block("B", 'B', 400.0));
        set.insert(Glyph::empty("space", 250.0).with_codepoints([' ']));
        set
    }

    fn origins(placed: &[PlacedGlyph]) -> Vec<(f64, f64)> {
        placed
            .iter()
            .map(|p| {
                let origin = p.transform * Point::ZERO;
                (origin.x, origin.y)
            })
            .collect()
    }

    #[test]
    fn test_pen_advances_by_glyph_width() {
        let set = source();
        let placed = place_glyphs(&set, "AB", 500.0, Affine::IDENTITY);
        assert_eq!(origins(&placed), vec![(0.0, 0.0), (300.0, 0.0)]);
    }

    #[test]
    fn test_space_and_newline_move_the_pen() {
        let set = source();
        let placed = place_glyphs(&set, "A B\nA", 500.0, Affine::IDENTITY);
        // space is 250 units, a line is 100 + 200 + 800 units, all at half scale
        assert_eq!(
            origins(&placed),
            vec![(0.0, 0.0), (425.0, 0.0), (0.0, -550.0)]
        );
    }

    #[test]
    fn test_space_without_glyph_is_half_an_em() {
        let mut set = GlyphSet::new(FontMetrics::default());
        set.insert(block("A", 'A', 1000.0));
        let placed = place_glyphs(&set, "A A", 250.0, Affine::IDENTITY);
        assert_eq!(origins(&placed), vec![(0.0, 0.0), (375.0, 0.0)]);
    }

    #[test]
    fn test_missing_glyph_fallback() {
        let mut set = source();
        assert_eq!(place_glyphs(&set, "AzB", 500.0, Affine::IDENTITY).len(), 2);

        set.insert(block(".notdef", '\u{FFFD}', 500.0));
        let placed = place_glyphs(&set, "AzB", 500.0, Affine::IDENTITY);
        assert_eq!(placed.len(), 3);
        assert_eq!(placed[1].glyph.name(), ".notdef");
        assert_eq!(placed[1].ch, 'z');
    }

    #[test]
    fn test_layout_paths_are_scaled_and_placed() {
        let set = source();
        let paths = layout_text(&set, "AB", 500.0, Affine::translate((100.0, 0.0)));
        assert_eq!(paths.len(), 2);
        let second = paths[1].bounding_box();
        assert_eq!((second.x0, second.x1), (400.0, 650.0));
        assert_eq!((second.y0, second.y1), (0.0, 350.0));

        let shapes = layout_outline_shapes(&set, "A\nB", 500.0, Affine::IDENTITY);
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[1].outlines()[0].vertices()[0].y, -550.0);
    }
}
