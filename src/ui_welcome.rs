use crate::app::CropperApp;
use crate::message::Message;
use iced::widget::{Space, button, column, text};
use iced::{Alignment, Element, Length};

pub fn welcome_view(app: &CropperApp) -> Element<'_, Message> {
    let status = app
        .status_message
        .as_deref()
        .unwrap_or("No PDF loaded");

    column![
        text("PDF Cropper").size(32),
        Space::new().height(Length::Fixed(20.0)),
        button("Select PDF File")
            .on_press_maybe(app.session.as_ref().map(|_| Message::OpenDocument))
            .padding(10),
        Space::new().height(Length::Fixed(20.0)),
        text(status.to_string()).size(14),
    ]
    .align_x(Alignment::Center)
    .width(Length::Fill)
    .height(Length::Fill)
    .padding(40)
    .into()
}
