use std::collections::HashMap;

use crate::models::{Rectangle, SelectionSource};

/// Crop rectangles chosen for the loaded document, in canvas space.
///
/// A per-page rectangle always wins over the global one, whichever was set
/// last.
#[derive(Debug, Default, Clone)]
pub struct CropSelectionStore {
    global: Option<Rectangle>,
    per_page: HashMap<usize, Rectangle>,
}

impl CropSelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_global_rect(&mut self, rect: Rectangle) {
        self.global = Some(rect);
    }

    pub fn set_per_page_rect(&mut self, page: usize, rect: Rectangle) {
        self.per_page.insert(page, rect);
    }

    pub const fn global_rect(&self) -> Option<Rectangle> {
        self.global
    }

    pub fn per_page_rect(&self, page: usize) -> Option<Rectangle> {
        self.per_page.get(&page).copied()
    }

    pub fn effective_rect(&self, page: usize) -> Option<Rectangle> {
        self.resolve(page).map(|(rect, _)| rect)
    }

    /// Effective rectangle together with where it came from.
    pub fn resolve(&self, page: usize) -> Option<(Rectangle, SelectionSource)> {
        if let Some(rect) = self.per_page_rect(page) {
            return Some((rect, SelectionSource::PerPage));
        }
        self.global.map(|rect| (rect, SelectionSource::Global))
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_none() && self.per_page.is_empty()
    }

    pub fn per_page_count(&self) -> usize {
        self.per_page.len()
    }

    pub fn clear(&mut self) {
        self.global = None;
        self.per_page.clear();
    }
}
