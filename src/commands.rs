use std::path::PathBuf;

use crate::models::{CanvasPoint, Rectangle};
use crate::session::ExportSummary;

/// One user gesture, applied to the session synchronously.
#[derive(Debug, Clone, PartialEq)]
pub enum CropCommand {
    /// Move by `delta` pages, stopping at either end of the document.
    Navigate(isize),
    /// A finished drag on the preview, in canvas pixels.
    CaptureSelection { start: CanvasPoint, end: CanvasPoint },
    /// Promote the current page's rectangle to every page.
    ApplyToAll,
    Export(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    PageChanged(usize),
    SelectionCaptured { page: usize, rect: Rectangle },
    AppliedToAll(Rectangle),
    Exported(ExportSummary),
}
