//! Canvas to PDF coordinate conversion.
//!
//! The preview is always resampled to the full canvas regardless of the
//! page's aspect ratio, so the two axes scale independently. Canvas y grows
//! downward from the top edge; PDF y grows upward from the bottom edge.

use crate::models::{CanvasSize, Rectangle};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoordinateMapper {
    canvas: CanvasSize,
}

impl CoordinateMapper {
    pub const fn new(canvas: CanvasSize) -> Self {
        Self { canvas }
    }

    pub const fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Maps a canvas rectangle onto a page of `native_width` x
    /// `native_height` points.
    ///
    /// The result is clamped to the page, so drags past the canvas edge are
    /// safe. Clamping can collapse the rectangle to zero area; that is
    /// returned as is.
    pub fn to_native_units(&self, rect: &Rectangle, native_width: f64, native_height: f64) -> Rectangle {
        let canvas_width = f64::from(self.canvas.width);
        let canvas_height = f64::from(self.canvas.height);
        let scale_x = native_width / canvas_width;
        let scale_y = native_height / canvas_height;

        let x1 = rect.x1() * scale_x;
        let x2 = rect.x2() * scale_x;
        let y1 = (canvas_height - rect.y2()) * scale_y;
        let y2 = (canvas_height - rect.y1()) * scale_y;

        Rectangle::new(
            clamp(x1, native_width),
            clamp(y1, native_height),
            clamp(x2, native_width),
            clamp(y2, native_height),
        )
    }
}

fn clamp(value: f64, max: f64) -> f64 {
    value.min(max).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rect(actual: Rectangle, expected: [f64; 4]) {
        for (a, e) in actual.as_array().iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_full_canvas_maps_to_full_page() {
        let mapper = CoordinateMapper::default();
        let native = mapper.to_native_units(&Rectangle::new(0.0, 0.0, 800.0, 600.0), 612.0, 792.0);
        assert_rect(native, [0.0, 0.0, 612.0, 792.0]);
    }

    #[test]
    fn test_y_axis_is_flipped() {
        let mapper = CoordinateMapper::default();
        let native = mapper.to_native_units(&Rectangle::new(100.0, 100.0, 200.0, 200.0), 800.0, 600.0);
        assert_rect(native, [100.0, 400.0, 200.0, 500.0]);
    }

    #[test]
    fn test_axes_scale_independently() {
        let mapper = CoordinateMapper::default();
        // 612/800 horizontally, 792/600 vertically
        let native = mapper.to_native_units(&Rectangle::new(400.0, 0.0, 800.0, 300.0), 612.0, 792.0);
        assert_rect(native, [306.0, 396.0, 612.0, 792.0]);
    }

    #[test]
    fn test_out_of_canvas_drag_is_clamped() {
        let mapper = CoordinateMapper::default();
        let samples = [
            Rectangle::new(-50.0, -20.0, 900.0, 700.0),
            Rectangle::new(-300.0, -300.0, -10.0, -10.0),
            Rectangle::new(810.0, 610.0, 2000.0, 1500.0),
            Rectangle::new(10.0, 590.0, 790.0, 650.0),
        ];
        let pages = [(612.0, 792.0), (595.0, 842.0), (100.0, 50.0)];

        for rect in &samples {
            for &(w, h) in &pages {
                let native = mapper.to_native_units(rect, w, h);
                let [x1, y1, x2, y2] = native.as_array();
                for x in [x1, x2] {
                    assert!((0.0..=w).contains(&x), "{x} outside [0, {w}]");
                }
                for y in [y1, y2] {
                    assert!((0.0..=h).contains(&y), "{y} outside [0, {h}]");
                }
            }
        }
    }

    #[test]
    fn test_clamp_may_collapse_to_zero_area() {
        let mapper = CoordinateMapper::default();
        let native = mapper.to_native_units(&Rectangle::new(-300.0, 10.0, -10.0, 20.0), 612.0, 792.0);
        assert!(native.is_degenerate());
        assert_eq!(native.x1(), 0.0);
        assert_eq!(native.x2(), 0.0);
    }

    #[test]
    fn test_custom_canvas() {
        let mapper = CoordinateMapper::new(CanvasSize { width: 100, height: 100 });
        let native = mapper.to_native_units(&Rectangle::new(0.0, 0.0, 50.0, 50.0), 200.0, 200.0);
        assert_rect(native, [0.0, 100.0, 100.0, 200.0]);
    }
}
