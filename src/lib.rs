//! Core of the PDF cropper: preview cache, canvas-to-PDF coordinate
//! mapping, crop selections and the session that ties them to a document.
//!
//! The windowing shell lives in the binary; everything here is synchronous
//! and toolkit independent.

pub mod cache;
pub mod commands;
pub mod document;
pub mod error;
pub mod mapper;
pub mod models;
pub mod pdf_engine;
pub mod selection;
pub mod session;
pub mod storage;

pub use cache::PageImageCache;
pub use commands::{CommandOutcome, CropCommand};
pub use error::{CropError, Result};
pub use mapper::CoordinateMapper;
pub use models::{AppSettings, CanvasPoint, CanvasSize, PageImage, Rectangle, SelectionSource};
pub use pdf_engine::{PageRenderer, PdfEngine};
pub use selection::CropSelectionStore;
pub use session::{ExportSummary, PdfCropSession, SessionState};
