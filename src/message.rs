use pdfcropper::CanvasPoint;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Message {
    OpenDocument,
    DocumentPicked(Option<PathBuf>),
    PrevPage,
    NextPage,
    SelectionFinished(CanvasPoint, CanvasPoint),
    ApplyToAll,
    CropPdf,
    ExportPathPicked(Option<PathBuf>),
    ClearStatus,
}
