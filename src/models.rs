use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Preview canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 800;
/// Preview canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 600;

pub const DEFAULT_CACHE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }
}

/// A pointer position reported by the shell, in canvas pixels.
///
/// Values outside the canvas are allowed; a drag that leaves the preview
/// reports coordinates past its edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, always stored with `x1 <= x2` and `y1 <= y2`.
///
/// The coordinate space is implied by the owner: selections hold canvas
/// pixels (y down), mapped crops hold PDF points (y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl Rectangle {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Rectangle spanned by two drag corners in any order.
    pub fn from_corners(start: CanvasPoint, end: CanvasPoint) -> Self {
        Self::new(start.x, start.y, end.x, end.y)
    }

    pub const fn x1(&self) -> f64 {
        self.x1
    }

    pub const fn y1(&self) -> f64 {
        self.y1
    }

    pub const fn x2(&self) -> f64 {
        self.x2
    }

    pub const fn y2(&self) -> f64 {
        self.y2
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Zero width or zero height. Still a valid crop, just a useless one.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub const fn as_array(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

/// Where a page's effective rectangle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    PerPage,
    Global,
}

/// A rendered page preview, RGBA8, shared cheaply between the cache and
/// the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<Vec<u8>>,
}

impl PageImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels: Arc::new(pixels),
        }
    }

    pub const fn size(&self) -> CanvasSize {
        CanvasSize {
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub cache_size: usize,
    pub last_directory: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
            last_directory: None,
            log_filter: "info".to_string(),
        }
    }
}

impl AppSettings {
    /// Cache capacity with the lower bound of one entry applied.
    pub fn effective_cache_size(&self) -> usize {
        self.cache_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_normalizes_reversed_drag() {
        let rect = Rectangle::from_corners(CanvasPoint::new(300.0, 300.0), CanvasPoint::new(100.0, 100.0));
        assert_eq!(rect.as_array(), [100.0, 100.0, 300.0, 300.0]);
    }

    #[test]
    fn test_rectangle_normalizes_mixed_axes() {
        let rect = Rectangle::new(50.0, 10.0, 20.0, 90.0);
        assert!(rect.x1() <= rect.x2());
        assert!(rect.y1() <= rect.y2());
        assert_eq!(rect.as_array(), [20.0, 10.0, 50.0, 90.0]);
    }

    #[test]
    fn test_click_without_drag_is_degenerate() {
        let p = CanvasPoint::new(42.0, 17.0);
        let rect = Rectangle::from_corners(p, p);
        assert!(rect.is_degenerate());
        assert_eq!(rect.width(), 0.0);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.cache_size, 10);
        assert_eq!(settings.log_filter, "info");

        let zero = AppSettings {
            cache_size: 0,
            ..AppSettings::default()
        };
        assert_eq!(zero.effective_cache_size(), 1);
    }
}
