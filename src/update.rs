use crate::app::{CropperApp, PagePreview};
use crate::message::Message;
use iced::Task;
use pdfcropper::{
    AppSettings, CommandOutcome, CropCommand, CropError, PageRenderer, PdfCropSession, storage,
};
use std::path::{Path, PathBuf};

pub fn handle_message(app: &mut CropperApp, message: Message) -> Task<Message> {
    match message {
        Message::OpenDocument => {
            let start_dir = app.settings.last_directory.clone();
            Task::perform(
                async move {
                    let mut dialog = rfd::AsyncFileDialog::new().add_filter("PDF files", &["pdf"]);
                    if let Some(dir) = start_dir {
                        dialog = dialog.set_directory(dir);
                    }
                    dialog.pick_file().await.map(|f| f.path().to_path_buf())
                },
                Message::DocumentPicked,
            )
        }
        Message::DocumentPicked(None) => Task::none(),
        Message::DocumentPicked(Some(path)) => {
            open_document(app, path);
            Task::none()
        }
        Message::PrevPage => {
            navigate(app, -1);
            Task::none()
        }
        Message::NextPage => {
            navigate(app, 1);
            Task::none()
        }
        Message::SelectionFinished(start, end) => {
            dispatch(app, CropCommand::CaptureSelection { start, end });
            Task::none()
        }
        Message::ApplyToAll => {
            if let Some(CommandOutcome::AppliedToAll(_)) = dispatch(app, CropCommand::ApplyToAll) {
                app.status_message = Some("Current page's crop area applied to all pages".to_string());
            }
            Task::none()
        }
        Message::CropPdf => {
            let Some(session) = app.session.as_ref() else {
                return Task::none();
            };
            if !session.has_any_selection() {
                app.report(&CropError::NoSelectionAnywhere);
                return Task::none();
            }

            let start_dir = app.settings.last_directory.clone();
            let file_name = suggested_output_name(session.document_path());
            Task::perform(
                async move {
                    let mut dialog = rfd::AsyncFileDialog::new()
                        .add_filter("PDF files", &["pdf"])
                        .set_title("Save Cropped PDF As")
                        .set_file_name(file_name);
                    if let Some(dir) = start_dir {
                        dialog = dialog.set_directory(dir);
                    }
                    dialog.save_file().await.map(|f| f.path().to_path_buf())
                },
                Message::ExportPathPicked,
            )
        }
        Message::ExportPathPicked(None) => {
            app.status_message = Some("No output file selected".to_string());
            Task::none()
        }
        Message::ExportPathPicked(Some(path)) => {
            storage::remember_directory(&mut app.settings, &path);
            if let Some(CommandOutcome::Exported(summary)) = dispatch(app, CropCommand::Export(path)) {
                app.status_message = Some(format!(
                    "PDF successfully cropped and saved as {} ({} of {} pages cropped)",
                    summary.output.display(),
                    summary.cropped,
                    summary.pages
                ));
            }
            Task::none()
        }
        Message::ClearStatus => {
            app.status_message = None;
            Task::none()
        }
    }
}

fn open_document(app: &mut CropperApp, path: PathBuf) {
    let Some(session) = app.session.as_mut() else {
        return;
    };
    app.status_message = None;

    match load_and_remember(session, &mut app.settings, &path) {
        Ok(_) => {
            app.document_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string());
            app.refresh_preview(0);
        }
        Err(e) => {
            app.document_name = None;
            app.preview = PagePreview::None;
            app.report(&e);
        }
    }
}

/// Loads `path` and, only once it opened, remembers its folder for the
/// next file dialog.
fn load_and_remember<R: PageRenderer>(
    session: &mut PdfCropSession<R>,
    settings: &mut AppSettings,
    path: &Path,
) -> pdfcropper::Result<usize> {
    let pages = session.load_document(path)?;
    storage::remember_directory(settings, path);
    Ok(pages)
}

fn navigate(app: &mut CropperApp, delta: isize) {
    if let Some(CommandOutcome::PageChanged(page)) = dispatch(app, CropCommand::Navigate(delta)) {
        app.refresh_preview(page);
    }
}

/// Runs `command` and reports a failure in the status line.
fn dispatch(app: &mut CropperApp, command: CropCommand) -> Option<CommandOutcome> {
    let session = app.session.as_mut()?;
    match session.dispatch(command) {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            app.report(&e);
            None
        }
    }
}

fn suggested_output_name(input: Option<&Path>) -> String {
    input
        .and_then(|p| p.file_stem())
        .map_or_else(
            || "cropped.pdf".to_string(),
            |stem| format!("{}_cropped.pdf", stem.to_string_lossy()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfcropper::{CanvasSize, PageImage};

    struct NoRender;

    impl PageRenderer for NoRender {
        fn render_page(&self, _: &Path, page: usize, _: CanvasSize) -> pdfcropper::Result<PageImage> {
            Err(CropError::page_unavailable(page, "not rendered in tests"))
        }
    }

    #[test]
    fn test_failed_load_keeps_last_directory() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.pdf");
        std::fs::write(&bad, b"not a pdf").unwrap();

        let mut session = PdfCropSession::new(NoRender);
        let mut settings = AppSettings {
            last_directory: Some(PathBuf::from("/previous")),
            ..AppSettings::default()
        };

        assert!(load_and_remember(&mut session, &mut settings, &bad).is_err());
        assert_eq!(settings.last_directory, Some(PathBuf::from("/previous")));
    }

    #[test]
    fn test_suggested_output_name() {
        assert_eq!(suggested_output_name(Some(Path::new("/docs/report.pdf"))), "report_cropped.pdf");
        assert_eq!(suggested_output_name(None), "cropped.pdf");
    }
}
