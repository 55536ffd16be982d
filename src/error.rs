//! Error handling for the cropping session

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Every failure the session can surface to the shell.
#[derive(Error, Debug)]
pub enum CropError {
    #[error("Error loading PDF {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },
    #[error("Encrypted PDFs are not supported: {}", .0.display())]
    Encrypted(PathBuf),
    #[error("No PDF loaded")]
    NoDocument,
    #[error("Page {} is out of range (document has {total} pages)", .page + 1)]
    PageOutOfRange { page: usize, total: usize },
    #[error("Error loading page {}: {reason}", .page + 1)]
    PageUnavailable { page: usize, reason: String },
    #[error("No crop area selected for page {}", .0 + 1)]
    NoSelectionOnPage(usize),
    #[error("No crop areas selected for any page or globally")]
    NoSelectionAnywhere,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("Renderer error: {0}")]
    Renderer(String),
}

impl CropError {
    pub fn load<S: Into<String>>(path: impl Into<PathBuf>, reason: S) -> Self {
        CropError::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn page_unavailable<S: Into<String>>(page: usize, reason: S) -> Self {
        CropError::PageUnavailable {
            page,
            reason: reason.into(),
        }
    }

    pub fn pdf<S: Into<String>>(msg: S) -> Self {
        CropError::Pdf(msg.into())
    }

    /// Errors that reject an action before any state changed.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            CropError::NoDocument
                | CropError::NoSelectionOnPage(_)
                | CropError::NoSelectionAnywhere
                | CropError::PageOutOfRange { .. }
        )
    }
}

impl From<lopdf::Error> for CropError {
    fn from(e: lopdf::Error) -> Self {
        CropError::Pdf(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_use_one_based_pages() {
        assert_eq!(
            CropError::NoSelectionOnPage(0).to_string(),
            "No crop area selected for page 1"
        );
        assert_eq!(
            CropError::page_unavailable(4, "blank bitmap").to_string(),
            "Error loading page 5: blank bitmap"
        );
    }

    #[test]
    fn test_load_error_names_the_file() {
        let e = CropError::load("/tmp/missing.pdf", "not found");
        assert_eq!(e.to_string(), "Error loading PDF /tmp/missing.pdf: not found");
        assert!(!e.is_precondition());
    }

    #[test]
    fn test_precondition_classification() {
        assert!(CropError::NoSelectionAnywhere.is_precondition());
        assert!(CropError::NoDocument.is_precondition());
        assert!(!CropError::pdf("bad xref").is_precondition());
    }

    #[test]
    fn test_io_conversion() {
        let e: CropError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(e, CropError::Io(_)));
    }
}
