use crate::message::Message;
use crate::ui;
use crate::update::handle_message;
use iced::widget::image as iced_image;
use iced::{Element, Task};
use pdfcropper::{AppSettings, CropError, PdfCropSession, PdfEngine, storage};
use tracing::{error, info};

/// What the preview area shows for the current page.
pub enum PagePreview {
    None,
    Image(iced_image::Handle),
    Unavailable(String),
}

pub struct CropperApp {
    pub settings: AppSettings,
    pub session: Option<PdfCropSession<PdfEngine>>,
    pub preview: PagePreview,
    pub status_message: Option<String>,
    pub document_name: Option<String>,
}

impl Default for CropperApp {
    fn default() -> Self {
        let settings = storage::load_settings();
        let mut status_message = None;
        let session = match PdfEngine::new() {
            Ok(engine) => Some(PdfCropSession::with_cache_capacity(
                engine,
                settings.effective_cache_size(),
            )),
            Err(e) => {
                error!(error = %e, "renderer unavailable");
                status_message = Some(e.to_string());
                None
            }
        };

        Self {
            settings,
            session,
            preview: PagePreview::None,
            status_message,
            document_name: None,
        }
    }
}

impl CropperApp {
    pub fn is_loaded(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.document().is_some())
    }

    /// Shows `page` in the preview area, or the reason it cannot be shown.
    pub fn refresh_preview(&mut self, page: usize) {
        let Some(session) = self.session.as_mut() else {
            self.preview = PagePreview::None;
            return;
        };

        self.preview = match session.display_page(page) {
            Ok(image) => PagePreview::Image(iced_image::Handle::from_rgba(
                image.width,
                image.height,
                Vec::clone(&image.pixels),
            )),
            Err(e) => PagePreview::Unavailable(e.to_string()),
        };
    }

    /// Shows `e` in the status line. Missing-selection style errors are the
    /// user's to fix and only logged at info.
    pub fn report(&mut self, e: &CropError) {
        if e.is_precondition() {
            info!(error = %e, "action not possible yet");
        } else {
            error!(error = %e, "operation failed");
        }
        self.status_message = Some(e.to_string());
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        handle_message(self, message)
    }

    pub fn view(&self) -> Element<'_, Message> {
        ui::view(self)
    }
}
