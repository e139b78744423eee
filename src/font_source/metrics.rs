//! Font metrics and measurement data
//!
//! Vertical metrics in font units plus pixel-size scaled accessors.
//! The descender follows the UFO convention and is negative below the baseline.

use serde::{Deserialize, Serialize};

/// Font-wide vertical metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    pub units_per_em: f64,
    pub ascender: f64,
    pub descender: f64,
    #[serde(default)]
    pub line_gap: f64,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            units_per_em: 1000.0,
            ascender: 800.0,
            descender: -200.0,
            line_gap: 0.0,
        }
    }
}

impl FontMetrics {
    /// Factor from font units to pixels
    pub fn scale(&self, pixel_size: f64) -> f64 {
        if self.units_per_em <= 0.0 {
            return 0.0;
        }
        pixel_size / self.units_per_em
    }

    pub fn ascent(&self, pixel_size: f64) -> f64 {
        self.ascender * self.scale(pixel_size)
    }

    pub fn descent(&self, pixel_size: f64) -> f64 {
        self.descender * self.scale(pixel_size)
    }

    pub fn line_gap(&self, pixel_size: f64) -> f64 {
        self.line_gap * self.scale(pixel_size)
    }

    /// Baseline-to-baseline distance
    pub fn line_advance(&self, pixel_size: f64) -> f64 {
        self.line_gap(pixel_size) - self.descent(pixel_size) + self.ascent(pixel_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_metrics() {
        let metrics = FontMetrics {
            units_per_em: 2048.0,
            ascender: 1638.0,
            descender: -410.0,
            line_gap: 67.0,
        };
        let scale = metrics.scale(16.0);
        assert_eq!(scale, 16.0 / 2048.0);
        assert_eq!(metrics.ascent(16.0), 1638.0 * scale);
        assert_eq!(
            metrics.line_advance(16.0),
            (67.0 + 410.0 + 1638.0) * scale
        );
    }

    #[test]
    fn test_degenerate_units_per_em() {
        let metrics = FontMetrics {
            units_per_em: 0.0,
            ..FontMetrics::default()
        };
        assert_eq!(metrics.scale(12.0), 0.0);
        assert_eq!(metrics.line_advance(12.0), 0.0);
    }
}
