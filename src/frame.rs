//! Canonical drawing frame and the horizontal coordinate mapper.
//!
//! All geometry is authored in a fixed logical rectangle (x in [0,1],
//! y in [-0.2, 0.5]) before any aspect-driven rescale. Border widths are
//! authored in x units and scaled into y by the frame's aspect so border
//! bands look even.

use crate::config::Ratio;

/// Process-wide read-only frame constants. A single immutable value is passed
/// into each builder rather than kept as mutable globals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub border_width_x: f64,
    pub inn_border_width_x: f64,
    /// Factor compressing the left mountain's height relative to the right.
    pub shrink: f64,
}

impl Frame {
    pub const CANONICAL: Frame = Frame {
        x_min: 0.0,
        x_max: 1.0,
        y_min: -0.2,
        y_max: 0.5,
        border_width_x: 0.05,
        inn_border_width_x: 0.008,
        shrink: 0.85,
    };

    pub fn x_len(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn y_len(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn x_mid(&self) -> f64 {
        self.x_min + self.x_len() / 2.0
    }

    pub fn y_mid(&self) -> f64 {
        self.y_min + self.y_len() / 2.0
    }

    pub fn border_width_y(&self) -> f64 {
        (self.y_len() / self.x_len()) * self.border_width_x
    }

    pub fn inn_border_width_y(&self) -> f64 {
        (self.y_len() / self.x_len()) * self.inn_border_width_x
    }

    /// Border thicknesses derived per aspect ratio. Horizontal widths carry
    /// the ratio's scale factor; vertical widths are unscaled.
    pub fn border_metrics(&self, ratio: Ratio) -> BorderMetrics {
        let scale_x = ratio.border_scale_x();
        let width_x = (self.border_width_x - self.inn_border_width_x) / 2.0;
        let width_y = (self.border_width_y() - self.inn_border_width_y()) / 2.0;
        BorderMetrics {
            width_y,
            inn_border_width_y: self.inn_border_width_y(),
            border_width_y: self.border_width_y(),
            swidth_x: width_x * scale_x,
            sinn_border_width_x: self.inn_border_width_x * scale_x,
            sborder_width_x: self.border_width_x * scale_x,
        }
    }
}

/// Ratio-scaled border thicknesses used by the outline builder and the
/// canvas-extent computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderMetrics {
    pub width_y: f64,
    pub inn_border_width_y: f64,
    pub border_width_y: f64,
    pub swidth_x: f64,
    pub sinn_border_width_x: f64,
    pub sborder_width_x: f64,
}

/// Uniform horizontal scale about the frame's center. Identity at factor 1;
/// the 3:1 banner compresses mountain/point geometry with factor 0.75 and the
/// footer clip with 0.85 so the silhouette is not stretched across the band.
pub fn scalex(x: f64, factor: f64) -> f64 {
    (x - 0.5) * factor + 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_constants_match_frame_aspect() {
        let f = Frame::CANONICAL;
        assert_eq!(f.x_len(), 1.0);
        assert!((f.y_len() - 0.7).abs() < 1e-12);
        assert!((f.border_width_y() - 0.035).abs() < 1e-12);
        assert!((f.inn_border_width_y() - 0.0056).abs() < 1e-12);
        assert!((f.x_mid() - 0.5).abs() < 1e-12);
        assert!((f.y_mid() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn scalex_fixes_center() {
        for f in [0.1, 0.75, 0.85, 1.0, 2.0] {
            assert_eq!(scalex(0.5, f), 0.5);
        }
    }

    #[test]
    fn scalex_is_monotonic() {
        let f = 0.75;
        let xs = [0.0, 0.1, 0.25, 0.5, 0.7, 0.99, 1.0];
        for w in xs.windows(2) {
            assert!(scalex(w[0], f) < scalex(w[1], f));
        }
    }

    #[test]
    fn scalex_identity_at_factor_one() {
        for x in [0.0, 0.3, 0.5, 0.8, 1.0] {
            assert!((scalex(x, 1.0) - x).abs() < 1e-15);
        }
    }

    #[test]
    fn border_metrics_scale_horizontally_only() {
        let f = Frame::CANONICAL;
        let banner = f.border_metrics(Ratio::R3x1);
        let square = f.border_metrics(Ratio::R1x1);
        assert!((banner.sborder_width_x - f.border_width_x / 3.0).abs() < 1e-12);
        assert!((square.sborder_width_x - f.border_width_x).abs() < 1e-12);
        assert_eq!(banner.border_width_y, square.border_width_y);
        assert_eq!(banner.width_y, square.width_y);
    }
}
