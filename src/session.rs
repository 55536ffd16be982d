//! The cropping session: one loaded document, its preview cache and the
//! rectangles the user drew on it.
//!
//! ```text
//! Empty --load--> Loaded --display(0)--> Displaying(p) --export--> Exporting --> Displaying(p)
//! ```
//!
//! Everything runs on the caller's thread. A render on a cache miss blocks
//! until the renderer returns.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::cache::PageImageCache;
use crate::commands::{CommandOutcome, CropCommand};
use crate::document::{self, CropDocument};
use crate::error::{CropError, Result};
use crate::mapper::CoordinateMapper;
use crate::models::{CanvasPoint, DEFAULT_CACHE_SIZE, PageImage, Rectangle, SelectionSource};
use crate::pdf_engine::PageRenderer;
use crate::selection::CropSelectionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Loaded,
    Displaying(usize),
    /// Writing the output; returns to `Displaying(page)` afterwards.
    Exporting { page: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub path: PathBuf,
    pub page_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub output: PathBuf,
    pub pages: usize,
    pub cropped: usize,
    pub kept: usize,
}

pub struct PdfCropSession<R: PageRenderer> {
    renderer: R,
    document: Option<LoadedDocument>,
    cache: PageImageCache,
    selections: CropSelectionStore,
    mapper: CoordinateMapper,
    state: SessionState,
}

impl<R: PageRenderer> PdfCropSession<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_cache_capacity(renderer, DEFAULT_CACHE_SIZE)
    }

    pub fn with_cache_capacity(renderer: R, capacity: usize) -> Self {
        Self {
            renderer,
            document: None,
            cache: PageImageCache::new(capacity),
            selections: CropSelectionStore::new(),
            mapper: CoordinateMapper::default(),
            state: SessionState::Empty,
        }
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub const fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    pub fn document_path(&self) -> Option<&Path> {
        self.document.as_ref().map(|d| d.path.as_path())
    }

    pub fn page_count(&self) -> usize {
        self.document.as_ref().map_or(0, |d| d.page_count)
    }

    pub const fn current_page(&self) -> Option<usize> {
        match self.state {
            SessionState::Displaying(page) | SessionState::Exporting { page } => Some(page),
            SessionState::Empty | SessionState::Loaded => None,
        }
    }

    pub const fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub const fn cache(&self) -> &PageImageCache {
        &self.cache
    }

    pub const fn selections(&self) -> &CropSelectionStore {
        &self.selections
    }

    pub fn selection_for(&self, page: usize) -> Option<(Rectangle, SelectionSource)> {
        self.selections.resolve(page)
    }

    pub fn has_any_selection(&self) -> bool {
        !self.selections.is_empty()
    }

    /// Discards the current document and opens `path`. Only the page count
    /// is read; nothing is rendered. On failure the session is left empty.
    pub fn load_document(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        self.cache.clear();
        self.selections.clear();
        self.document = None;
        self.state = SessionState::Empty;

        let page_count = match document::page_count(path) {
            Ok(0) => Err(CropError::load(path, "document has no pages")),
            other => other,
        }
        .inspect_err(|e| warn!(path = %path.display(), error = %e, "failed to load PDF"))?;

        info!(path = %path.display(), page_count, "loaded PDF");
        self.document = Some(LoadedDocument {
            path: path.to_path_buf(),
            page_count,
        });
        self.state = SessionState::Loaded;
        Ok(page_count)
    }

    /// Makes `page` the current page and returns its preview.
    ///
    /// The page becomes current even when rendering fails, so navigation
    /// keeps working past a broken page.
    pub fn display_page(&mut self, page: usize) -> Result<PageImage> {
        let total = self.require_document()?.page_count;
        if page >= total {
            return Err(CropError::PageOutOfRange { page, total });
        }
        self.state = SessionState::Displaying(page);
        self.page_image(page)
    }

    /// Preview for `page`, from the cache or freshly rendered.
    pub fn page_image(&mut self, page: usize) -> Result<PageImage> {
        let doc = self.document.as_ref().ok_or(CropError::NoDocument)?;
        if page >= doc.page_count {
            return Err(CropError::PageOutOfRange {
                page,
                total: doc.page_count,
            });
        }

        let renderer = &self.renderer;
        let canvas = self.mapper.canvas();
        let path = doc.path.as_path();
        self.cache
            .get_or_render(page, |p| renderer.render_page(path, p, canvas))
            .inspect_err(|e| warn!(page = page + 1, error = %e, "page preview unavailable"))
    }

    /// Moves by `delta` pages, clamped to the document. Returns the new
    /// current page; at either end this is a no-op.
    pub fn navigate(&mut self, delta: isize) -> Result<usize> {
        let total = self.require_document()?.page_count;
        let current = self.current_page().unwrap_or(0);
        let last = total.saturating_sub(1);
        let target = current.saturating_add_signed(delta).min(last);
        self.state = SessionState::Displaying(target);
        Ok(target)
    }

    /// Records a finished drag as the current page's rectangle.
    pub fn capture_selection(&mut self, start: CanvasPoint, end: CanvasPoint) -> Result<Rectangle> {
        let page = self.require_current_page()?;
        let rect = Rectangle::from_corners(start, end);
        self.selections.set_per_page_rect(page, rect);
        debug!(page = page + 1, rect = ?rect.as_array(), "captured selection");
        Ok(rect)
    }

    /// Copies the current page's own rectangle into the global slot.
    pub fn apply_to_all(&mut self) -> Result<Rectangle> {
        let page = self.require_current_page()?;
        let rect = self
            .selections
            .per_page_rect(page)
            .ok_or(CropError::NoSelectionOnPage(page))
            .inspect_err(|e| warn!(error = %e, "apply to all rejected"))?;
        self.selections.set_global_rect(rect);
        info!(page = page + 1, "current page's crop area applied to all pages");
        Ok(rect)
    }

    /// Writes a copy of the document with every selected page's media box
    /// narrowed to its effective rectangle. Pages with no rectangle are
    /// copied as they are.
    ///
    /// Fails before touching `output` if nothing is selected anywhere. The
    /// output is written through a temporary file and renamed into place;
    /// that is best-effort, not a transaction.
    pub fn export(&mut self, output: impl AsRef<Path>) -> Result<ExportSummary> {
        let output = output.as_ref();
        let input = self.require_document()?.path.clone();
        if self.selections.is_empty() {
            warn!("export rejected: no crop areas selected");
            return Err(CropError::NoSelectionAnywhere);
        }

        let resume = self.state;
        self.state = SessionState::Exporting {
            page: self.current_page().unwrap_or(0),
        };
        let result = self.write_cropped(&input, output);
        self.state = resume;

        match &result {
            Ok(summary) => info!(
                output = %output.display(),
                cropped = summary.cropped,
                kept = summary.kept,
                "PDF successfully cropped"
            ),
            Err(e) => warn!(output = %output.display(), error = %e, "export failed"),
        }
        result
    }

    fn write_cropped(&self, input: &Path, output: &Path) -> Result<ExportSummary> {
        let mut doc = CropDocument::open(input)?;
        let page_ids = doc.page_ids().to_vec();
        let mut cropped = 0;

        for (index, page_id) in page_ids.iter().copied().enumerate() {
            let Some(rect) = self.selections.effective_rect(index) else {
                continue;
            };

            let media_box = doc.media_box(page_id)?;
            let native = self
                .mapper
                .to_native_units(&rect, media_box.width(), media_box.height());
            debug!(
                page = index + 1,
                canvas = ?rect.as_array(),
                pdf = ?native.as_array(),
                width = media_box.width(),
                height = media_box.height(),
                "mapped crop rectangle"
            );
            doc.set_media_box(page_id, &native)?;
            cropped += 1;
        }

        doc.save(output)?;
        Ok(ExportSummary {
            output: output.to_path_buf(),
            pages: page_ids.len(),
            cropped,
            kept: page_ids.len() - cropped,
        })
    }

    /// Applies one shell gesture.
    pub fn dispatch(&mut self, command: CropCommand) -> Result<CommandOutcome> {
        match command {
            CropCommand::Navigate(delta) => self.navigate(delta).map(CommandOutcome::PageChanged),
            CropCommand::CaptureSelection { start, end } => {
                let rect = self.capture_selection(start, end)?;
                let page = self.require_current_page()?;
                Ok(CommandOutcome::SelectionCaptured { page, rect })
            }
            CropCommand::ApplyToAll => self.apply_to_all().map(CommandOutcome::AppliedToAll),
            CropCommand::Export(path) => self.export(path).map(CommandOutcome::Exported),
        }
    }

    fn require_document(&self) -> Result<&LoadedDocument> {
        self.document.as_ref().ok_or(CropError::NoDocument)
    }

    fn require_current_page(&self) -> Result<usize> {
        self.require_document()?;
        self.current_page().ok_or(CropError::NoDocument)
    }
}
