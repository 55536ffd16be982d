use image::RgbaImage;
use image::imageops::{self, FilterType};
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

use crate::error::{CropError, Result};
use crate::models::{CanvasSize, PageImage};

/// Produces a fixed-size preview raster of one page.
pub trait PageRenderer {
    fn render_page(&self, path: &Path, page: usize, canvas: CanvasSize) -> Result<PageImage>;
}

/// Pdfium-backed renderer.
///
/// The document is reopened for every render; only the page being shown is
/// ever rasterized.
pub struct PdfEngine {
    pdfium: Pdfium,
}

impl PdfEngine {
    pub fn init_pdfium() -> Result<Pdfium> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name()))
            .map_err(|e| CropError::Renderer(format!("Failed to bind to Pdfium library: {e}")))?;

        Ok(Pdfium::new(bindings))
    }

    pub fn new() -> Result<Self> {
        Ok(Self {
            pdfium: Self::init_pdfium()?,
        })
    }
}

impl PageRenderer for PdfEngine {
    fn render_page(&self, path: &Path, page: usize, canvas: CanvasSize) -> Result<PageImage> {
        let unavailable = |e: &dyn std::fmt::Display| CropError::page_unavailable(page, e.to_string());

        let doc = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| unavailable(&e))?;
        let index = u16::try_from(page).map_err(|e| unavailable(&e))?;
        let pdf_page = doc.pages().get(index).map_err(|e| unavailable(&e))?;

        // One pixel per point, i.e. 72 dpi, before resampling to the canvas.
        let width = pdf_page.width().value.round().max(1.0) as i32;
        let height = pdf_page.height().value.round().max(1.0) as i32;
        let config = PdfRenderConfig::new()
            .set_target_width(width)
            .set_maximum_height(height);

        let bitmap = pdf_page
            .render_with_config(&config)
            .map_err(|e| unavailable(&e))?;
        let w = bitmap.width() as u32;
        let h = bitmap.height() as u32;
        let rgba = bitmap.as_rgba_bytes().to_vec();

        debug!(page, w, h, "rendered page");
        resample(page, w, h, rgba, canvas)
    }
}

/// Stretches a raw RGBA raster to exactly `canvas`, ignoring aspect ratio.
pub fn resample(page: usize, width: u32, height: u32, rgba: Vec<u8>, canvas: CanvasSize) -> Result<PageImage> {
    if width == 0 || height == 0 || rgba.is_empty() {
        return Err(CropError::page_unavailable(page, "renderer returned an empty bitmap"));
    }
    let source = RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        CropError::page_unavailable(page, format!("bitmap does not match {width}x{height}"))
    })?;

    let resized = if (width, height) == (canvas.width, canvas.height) {
        source
    } else {
        imageops::resize(&source, canvas.width, canvas.height, FilterType::Lanczos3)
    };
    Ok(PageImage::new(canvas.width, canvas.height, resized.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_stretches_to_canvas() {
        let rgba = vec![200u8; 612 * 792 * 4];
        let image = resample(0, 612, 792, rgba, CanvasSize::default()).unwrap();
        assert_eq!((image.width, image.height), (800, 600));
        assert_eq!(image.pixels.len(), 800 * 600 * 4);
    }

    #[test]
    fn test_resample_keeps_exact_size() {
        let canvas = CanvasSize { width: 2, height: 1 };
        let rgba = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let image = resample(0, 2, 1, rgba.clone(), canvas).unwrap();
        assert_eq!(*image.pixels, rgba);
    }

    #[test]
    fn test_empty_bitmap_is_unavailable() {
        let err = resample(3, 0, 0, Vec::new(), CanvasSize::default()).unwrap_err();
        assert!(matches!(err, CropError::PageUnavailable { page: 3, .. }));
    }

    #[test]
    fn test_short_buffer_is_unavailable() {
        let err = resample(1, 10, 10, vec![0; 12], CanvasSize::default()).unwrap_err();
        assert!(matches!(err, CropError::PageUnavailable { page: 1, .. }));
    }
}
