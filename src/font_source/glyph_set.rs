//! In-memory font source
//!
//! A [`GlyphSet`] holds metrics, glyphs by name and a character map. It loads
//! from UFO directories or from the JSON form produced by [`GlyphSet::to_json`].

use super::{FontMetrics, Glyph};
use crate::core::errors::SourceError;
use crate::data::ufo;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Name of the fallback glyph for unmapped characters
pub const NOTDEF: &str = ".notdef";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GlyphSetRecord", into = "GlyphSetRecord")]
pub struct GlyphSet {
    family_name: Option<String>,
    metrics: FontMetrics,
    glyphs: BTreeMap<String, Glyph>,
    cmap: HashMap<char, String>,
}

impl GlyphSet {
    pub fn new(metrics: FontMetrics) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    pub fn with_family_name(mut self, name: impl Into<String>) -> Self {
        self.family_name = Some(name.into());
        self
    }

    /// Load from a `.ufo` directory or a `.json` glyph set file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let set = if path.is_dir() {
            let font = ufo::load_ufo_from_path(path)?;
            Self::from_norad_font(&font)?
        } else if is_json {
            Self::from_json(&fs::read_to_string(path)?)?
        } else {
            return Err(SourceError::UnsupportedSource(path.to_path_buf()));
        };

        debug!("Loaded {} glyphs from {:?}", set.len(), path);
        Ok(set)
    }

    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SourceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add or replace a glyph; its codepoints take over the character map
    pub fn insert(&mut self, glyph: Glyph) {
        for &ch in glyph.codepoints() {
            self.cmap.insert(ch, glyph.name().to_string());
        }
        self.glyphs.insert(glyph.name().to_string(), glyph);
    }

    pub fn family_name(&self) -> Option<&str> {
        self.family_name.as_deref()
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn glyph(&self, name: &str) -> Option<&Glyph> {
        self.glyphs.get(name)
    }

    /// Glyph mapped to `ch`, without fallback
    pub fn glyph_for_char(&self, ch: char) -> Option<&Glyph> {
        self.cmap.get(&ch).and_then(|name| self.glyphs.get(name))
    }

    /// Look up by glyph name, then by character when `query` is a single one
    pub fn find(&self, query: &str) -> Option<&Glyph> {
        self.glyph(query).or_else(|| {
            let mut chars = query.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => self.glyph_for_char(ch),
                _ => None,
            }
        })
    }

    pub fn notdef(&self) -> Option<&Glyph> {
        self.glyphs.get(NOTDEF)
    }

    pub fn glyphs(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.values()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Advance of a glyph in pixels
    pub fn advance_width(&self, glyph: &Glyph, pixel_size: f64) -> f64 {
        glyph.advance_width() * self.metrics.scale(pixel_size)
    }

    /// Advance of the space character in pixels, half an em without a space glyph
    pub fn space_advance(&self, pixel_size: f64) -> f64 {
        match self.glyph_for_char(' ') {
            Some(space) => self.advance_width(space, pixel_size),
            None => pixel_size / 2.0,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct GlyphSetRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    family_name: Option<String>,
    #[serde(default)]
    metrics: FontMetrics,
    #[serde(default)]
    glyphs: Vec<Glyph>,
}

impl From<GlyphSetRecord> for GlyphSet {
    fn from(record: GlyphSetRecord) -> Self {
        let mut set = GlyphSet::new(record.metrics);
        set.family_name = record.family_name;
        for glyph in record.glyphs {
            set.insert(glyph);
        }
        set
    }
}

impl From<GlyphSet> for GlyphSetRecord {
    fn from(set: GlyphSet) -> Self {
        GlyphSetRecord {
            family_name: set.family_name,
            metrics: set.metrics,
            glyphs: set.glyphs.into_values().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font_source::GlyphPoint;

    fn sample_set() -> GlyphSet {
        let mut set = GlyphSet::new(FontMetrics::default()).with_family_name("Sample");
        set.insert(Glyph::empty("space", 250.0).with_codepoints([' ']));
        set.insert(
            Glyph::from_contours(
                "I",
                300.0,
                vec![vec![
                    GlyphPoint::on(100, 0),
                    GlyphPoint::on(200, 0),
                    GlyphPoint::on(200, 700),
                    GlyphPoint::on(100, 700),
                ]],
            )
            .with_codepoints(['I']),
        );
        set
    }

    #[test]
    fn test_lookup_by_char_and_name() {
        let set = sample_set();
        assert_eq!(set.len(), 2);
        assert_eq!(set.glyph_for_char('I').map(Glyph::name), Some("I"));
        assert!(set.glyph_for_char('x').is_none());
        assert!(set.glyph("space").is_some());
        assert!(set.notdef().is_none());
    }

    #[test]
    fn test_find_by_name_or_char() {
        let set = sample_set();
        assert_eq!(set.find("space").map(Glyph::name), Some("space"));
        assert_eq!(set.find(" ").map(Glyph::name), Some("space"));
        assert!(set.find("J").is_none());
        assert!(set.find("II").is_none());
    }

    #[test]
    fn test_space_advance() {
        let set = sample_set();
        assert_eq!(set.space_advance(1000.0), 250.0);
        let empty = GlyphSet::new(FontMetrics::default());
        assert_eq!(empty.space_advance(20.0), 10.0);
    }

    #[test]
    fn test_json_round_trip_rebuilds_cmap() {
        let set = sample_set();
        let json = set.to_json().unwrap();
        let parsed = GlyphSet::from_json(&json).unwrap();
        assert_eq!(parsed.family_name(), Some("Sample"));
        assert_eq!(parsed.glyph_for_char('I'), set.glyph_for_char('I'));
        assert_eq!(parsed.metrics(), set.metrics());
    }

    #[test]
    fn test_load_json_file_and_reject_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.json");
        fs::write(&path, sample_set().to_json().unwrap()).unwrap();
        let loaded = GlyphSet::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);

        let bogus = dir.path().join("font.otf");
        fs::write(&bogus, b"not a font").unwrap();
        assert!(matches!(
            GlyphSet::load(&bogus),
            Err(SourceError::UnsupportedSource(_))
        ));
    }
}
