use crate::app::CropperApp;
use crate::message::Message;
use crate::ui_document::document_view;
use crate::ui_welcome::welcome_view;
use iced::Element;

pub fn view(app: &CropperApp) -> Element<'_, Message> {
    if app.is_loaded() {
        document_view(app)
    } else {
        welcome_view(app)
    }
}
