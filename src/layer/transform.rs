//! Placement of a glyph on the canvas.
//!
//! Glyphs are drawn in a 24×24 local box anchored at its top-left corner. A
//! layer places the *center* of that box at `(x, y)` by applying, outermost
//! first:
//!
//! ```text
//! translate(x y) rotate(rotate) scale(scale) translate(-12 -12)
//! ```
//!
//! Rotation and scale therefore pivot around the glyph center, not the
//! canvas origin.

use resvg::tiny_skia::{Point, Transform};

use crate::config::GLYPH_BOX;

/// Formats a number the way it appears in SVG attributes: integers without a
/// fractional part and no negative zero.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// The transform of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerTransform {
    pub x: f64,
    pub y: f64,
    /// Degrees, clockwise in SVG's y-down space.
    pub rotate: f64,
    pub scale: f64,
}

impl LayerTransform {
    pub fn new(x: f64, y: f64, rotate: f64, scale: f64) -> Self {
        Self {
            x,
            y,
            rotate,
            scale,
        }
    }

    /// The SVG `transform` attribute value.
    pub fn to_svg(&self) -> String {
        let half = format_number(-GLYPH_BOX / 2.0);
        format!(
            "translate({} {}) rotate({}) scale({}) translate({half} {half})",
            format_number(self.x),
            format_number(self.y),
            format_number(self.rotate),
            format_number(self.scale),
        )
    }

    /// The same transform as a matrix mapping glyph-local to canvas space.
    pub fn to_matrix(&self) -> Transform {
        let half = (GLYPH_BOX / 2.0) as f32;
        Transform::from_translate(self.x as f32, self.y as f32)
            .pre_concat(Transform::from_rotate(self.rotate as f32))
            .pre_concat(Transform::from_scale(self.scale as f32, self.scale as f32))
            .pre_concat(Transform::from_translate(-half, -half))
    }

    /// Maps a canvas point into glyph-local space.
    ///
    /// Returns `None` when the transform is degenerate (zero scale).
    pub fn to_local(&self, canvas: (f64, f64)) -> Option<(f64, f64)> {
        let inverse = self.to_matrix().invert()?;
        let mut points = [Point::from_xy(canvas.0 as f32, canvas.1 as f32)];
        inverse.map_points(&mut points);
        Some((points[0].x as f64, points[0].y as f64))
    }

    /// Returns true if the canvas point lies inside the transformed glyph box
    /// grown by `margin` local units on every side.
    pub fn contains(&self, canvas: (f64, f64), margin: f64) -> bool {
        match self.to_local(canvas) {
            Some((lx, ly)) => {
                let range = -margin..=GLYPH_BOX + margin;
                range.contains(&lx) && range.contains(&ly)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_canvas(t: &LayerTransform, local: (f64, f64)) -> (f64, f64) {
        let mut points = [Point::from_xy(local.0 as f32, local.1 as f32)];
        t.to_matrix().map_points(&mut points);
        (points[0].x as f64, points[0].y as f64)
    }

    fn approx(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-3 && (a.1 - b.1).abs() < 1e-3
    }

    #[test]
    fn svg_attribute_order() {
        let t = LayerTransform::new(256.0, 128.5, 45.0, 4.0);
        assert_eq!(
            t.to_svg(),
            "translate(256 128.5) rotate(45) scale(4) translate(-12 -12)"
        );
    }

    #[test]
    fn negative_zero_is_printed_as_zero() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn glyph_center_lands_on_position() {
        let t = LayerTransform::new(100.0, 200.0, 33.0, 7.0);
        assert!(approx(to_canvas(&t, (12.0, 12.0)), (100.0, 200.0)));
    }

    #[test]
    fn scale_pivots_around_center() {
        let t = LayerTransform::new(256.0, 256.0, 0.0, 10.0);
        assert!(approx(to_canvas(&t, (0.0, 0.0)), (136.0, 136.0)));
        assert!(approx(to_canvas(&t, (24.0, 24.0)), (376.0, 376.0)));
    }

    #[test]
    fn rotation_pivots_around_center() {
        // 90° clockwise: local top-left ends up top-right of the center
        let t = LayerTransform::new(50.0, 50.0, 90.0, 1.0);
        assert!(approx(to_canvas(&t, (0.0, 0.0)), (62.0, 38.0)));
    }

    #[test]
    fn contains_respects_box_and_margin() {
        let t = LayerTransform::new(100.0, 100.0, 0.0, 2.0);
        assert!(t.contains((100.0, 100.0), 0.0));
        assert!(t.contains((77.0, 77.0), 0.0));
        assert!(!t.contains((74.0, 100.0), 0.0));
        assert!(t.contains((74.0, 100.0), 2.0));
    }

    #[test]
    fn degenerate_scale_contains_nothing() {
        let t = LayerTransform::new(100.0, 100.0, 0.0, 0.0);
        assert!(t.to_local((100.0, 100.0)).is_none());
        assert!(!t.contains((100.0, 100.0), 2.0));
    }
}
