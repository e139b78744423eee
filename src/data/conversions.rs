//! UFO format conversion utilities
//!
//! Conversion between norad's UFO glyphs and our TrueType-style point lists.
//! UFO `offcurve` points become off-curve points and every other point type is
//! on-curve. Coordinates are rounded to integer font units.

use crate::core::errors::SourceError;
use crate::font_source::{FontMetrics, Glyph, GlyphPoint, GlyphSet};
use norad::{Font, PointType};

impl Glyph {
    /// Convert from a norad glyph; cubic outlines are rejected
    pub fn from_norad_glyph(norad_glyph: &norad::Glyph) -> Result<Self, SourceError> {
        let name = norad_glyph.name().to_string();
        let mut contours = Vec::with_capacity(norad_glyph.contours.len());

        for contour in &norad_glyph.contours {
            let points = &contour.points;
            let count = points.len();
            let mut converted = Vec::with_capacity(count);
            for (idx, point) in points.iter().enumerate() {
                // A curve point preceded by off-curve handles closes a cubic segment
                let previous = &points[(idx + count - 1) % count];
                if point.typ == PointType::Curve && previous.typ == PointType::OffCurve {
                    return Err(SourceError::CubicOutline { glyph: name });
                }
                converted.push(GlyphPoint::new(
                    point.x.round() as i32,
                    point.y.round() as i32,
                    point.typ != PointType::OffCurve,
                ));
            }
            contours.push(converted);
        }

        Ok(Glyph::from_contours(name, norad_glyph.width, contours)
            .with_codepoints(norad_glyph.codepoints.iter()))
    }

    /// Convert back to a norad glyph with `qcurve`/`line` point types
    pub fn to_norad_glyph(&self) -> norad::Glyph {
        let mut glyph = norad::Glyph::new(self.name());
        glyph.width = self.advance_width();
        for &codepoint in self.codepoints() {
            glyph.codepoints.insert(codepoint);
        }

        glyph.contours = self
            .contours()
            .map(|points| {
                let count = points.len();
                let converted = points
                    .iter()
                    .enumerate()
                    .map(|(idx, point)| {
                        let previous = &points[(idx + count - 1) % count];
                        let typ = if !point.on_curve {
                            PointType::OffCurve
                        } else if !previous.on_curve {
                            PointType::QCurve
                        } else {
                            PointType::Line
                        };
                        norad::ContourPoint::new(
                            point.x as f64,
                            point.y as f64,
                            typ,
                            false, // smooth
                            None,  // name
                            None,  // identifier
                        )
                    })
                    .collect();
                norad::Contour::new(converted, None)
            })
            .collect();

        glyph
    }
}

impl FontMetrics {
    /// Read vertical metrics from UFO fontinfo, falling back to defaults
    pub fn from_norad_font_info(info: &norad::FontInfo) -> Self {
        let defaults = FontMetrics::default();
        let units_per_em = info
            .units_per_em
            .map(|v| *v)
            .unwrap_or(defaults.units_per_em);
        Self {
            units_per_em,
            ascender: info.ascender.unwrap_or(units_per_em * 0.8),
            descender: info.descender.unwrap_or(-units_per_em * 0.2),
            line_gap: info.open_type_hhea_line_gap.map_or(0.0, f64::from),
        }
    }

    pub fn apply_to_norad_font_info(&self, info: &mut norad::FontInfo) {
        info.units_per_em = norad::fontinfo::NonNegativeIntegerOrFloat::new(self.units_per_em);
        info.ascender = Some(self.ascender);
        info.descender = Some(self.descender);
        info.open_type_hhea_line_gap = Some(self.line_gap.round() as i32);
    }
}

impl GlyphSet {
    /// Extract glyphs from the default layer of a norad font
    pub fn from_norad_font(font: &Font) -> Result<Self, SourceError> {
        let metrics = FontMetrics::from_norad_font_info(&font.font_info);
        let mut set = GlyphSet::new(metrics);
        if let Some(family) = &font.font_info.family_name {
            set = set.with_family_name(family.clone());
        }
        for glyph in font.default_layer().iter() {
            set.insert(Glyph::from_norad_glyph(glyph)?);
        }
        Ok(set)
    }

    /// Convert to a complete norad font
    pub fn to_norad_font(&self) -> Font {
        let mut font = Font::new();
        font.font_info.family_name = self.family_name().map(str::to_string);
        self.metrics().apply_to_norad_font_info(&mut font.font_info);

        let layer = font.default_layer_mut();
        for glyph in self.glyphs() {
            layer.insert_glyph(glyph.to_norad_glyph());
        }
        font
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ufo;

    fn quad_glyph() -> Glyph {
        Glyph::from_contours(
            "o",
            500.0,
            vec![vec![
                GlyphPoint::on(250, 0),
                GlyphPoint::off(450, 0),
                GlyphPoint::off(450, 500),
                GlyphPoint::on(250, 500),
                GlyphPoint::off(50, 500),
                GlyphPoint::off(50, 0),
            ]],
        )
        .with_codepoints(['o'])
    }

    #[test]
    fn test_norad_glyph_round_trip() {
        let glyph = quad_glyph();
        let norad_glyph = glyph.to_norad_glyph();
        let types: Vec<PointType> = norad_glyph.contours[0]
            .points
            .iter()
            .map(|p| p.typ.clone())
            .collect();
        assert_eq!(
            types,
            vec![
                PointType::QCurve,
                PointType::OffCurve,
                PointType::OffCurve,
                PointType::QCurve,
                PointType::OffCurve,
                PointType::OffCurve,
            ]
        );
        assert_eq!(Glyph::from_norad_glyph(&norad_glyph).unwrap(), glyph);
    }

    #[test]
    fn test_cubic_contour_rejected() {
        let mut glyph = norad::Glyph::new("c");
        let point = |x: f64, y: f64, typ: PointType| {
            norad::ContourPoint::new(x, y, typ, false, None, None)
        };
        glyph.contours.push(norad::Contour::new(
            vec![
                point(0.0, 0.0, PointType::Line),
                point(10.0, 50.0, PointType::OffCurve),
                point(40.0, 50.0, PointType::OffCurve),
                point(50.0, 0.0, PointType::Curve),
            ],
            None,
        ));
        let err = Glyph::from_norad_glyph(&glyph).unwrap_err();
        assert!(matches!(err, SourceError::CubicOutline { glyph } if glyph == "c"));
    }

    #[test]
    fn test_curve_without_handles_is_a_line() {
        let mut glyph = norad::Glyph::new("l");
        glyph.contours.push(norad::Contour::new(
            vec![
                norad::ContourPoint::new(0.0, 0.0, PointType::Curve, false, None, None),
                norad::ContourPoint::new(10.4, 0.0, PointType::Line, false, None, None),
                norad::ContourPoint::new(10.0, 9.6, PointType::Line, false, None, None),
            ],
            None,
        ));
        let converted = Glyph::from_norad_glyph(&glyph).unwrap();
        assert!(converted.points().iter().all(|p| p.on_curve));
        assert_eq!(converted.points()[1].x, 10);
        assert_eq!(converted.points()[2].y, 10);
    }

    #[test]
    fn test_font_info_metrics() {
        let metrics = FontMetrics {
            units_per_em: 2048.0,
            ascender: 1638.0,
            descender: -410.0,
            line_gap: 67.0,
        };
        let mut info = norad::FontInfo::default();
        metrics.apply_to_norad_font_info(&mut info);
        assert_eq!(info.units_per_em.map(|v| *v), Some(2048.0));
        assert_eq!(FontMetrics::from_norad_font_info(&info), metrics);

        // Missing units per em falls back to the default em
        let defaults = FontMetrics::from_norad_font_info(&norad::FontInfo::default());
        assert_eq!(defaults.units_per_em, FontMetrics::default().units_per_em);
    }

    #[test]
    fn test_ufo_save_and_load() {
        let mut set = GlyphSet::new(FontMetrics {
            units_per_em: 2048.0,
            ascender: 1600.0,
            descender: -448.0,
            line_gap: 0.0,
        })
        .with_family_name("Fixture");
        set.insert(quad_glyph());
        set.insert(Glyph::empty("space", 512.0).with_codepoints([' ']));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Fixture.ufo");
        ufo::save_ufo_to_path(&set.to_norad_font(), &path).unwrap();

        let loaded = GlyphSet::load(&path).unwrap();
        assert_eq!(loaded.family_name(), Some("Fixture"));
        assert_eq!(loaded.metrics().units_per_em, 2048.0);
        assert_eq!(loaded.metrics().descender, -448.0);
        assert_eq!(loaded.glyph_for_char('o'), Some(&quad_glyph()));
        assert_eq!(loaded.space_advance(2048.0), 512.0);
    }
}
