use crate::app::{CropperApp, PagePreview};
use crate::message::Message;
use crate::ui_selection::SelectionOverlay;
use iced::widget::{Space, Stack, button, canvas, column, container, row, text};
use iced::{ContentFit, Element, Length};
use pdfcropper::models::{CANVAS_HEIGHT, CANVAS_WIDTH};

fn render_toolbar(app: &CropperApp) -> Element<'_, Message> {
    let loaded = app.is_loaded();
    let enabled = |m: Message| loaded.then_some(m);

    row![
        button("Select PDF File").on_press(Message::OpenDocument),
        Space::new().width(Length::Fixed(10.0)),
        button("Previous").on_press_maybe(enabled(Message::PrevPage)),
        button("Next").on_press_maybe(enabled(Message::NextPage)),
        button("Apply to All Pages").on_press_maybe(enabled(Message::ApplyToAll)),
        Space::new().width(Length::Fill),
        button("Crop PDF").on_press_maybe(enabled(Message::CropPdf)),
    ]
    .spacing(5)
    .padding(10)
    .align_y(iced::Alignment::Center)
    .into()
}

fn render_page(app: &CropperApp) -> Element<'_, Message> {
    let width = Length::Fixed(CANVAS_WIDTH as f32);
    let height = Length::Fixed(CANVAS_HEIGHT as f32);

    match &app.preview {
        PagePreview::Image(handle) => {
            let stored = app.session.as_ref().and_then(|s| {
                s.current_page().and_then(|page| s.selection_for(page))
            });
            let img = iced::widget::Image::new(handle.clone())
                .width(width)
                .height(height)
                .content_fit(ContentFit::Fill);
            let overlay = canvas(SelectionOverlay { stored }).width(width).height(height);

            Stack::new().push(img).push(overlay).into()
        }
        PagePreview::Unavailable(reason) => container(text(reason.clone()))
            .width(width)
            .height(height)
            .center_x(width)
            .center_y(height)
            .into(),
        PagePreview::None => Space::new().width(width).height(height).into(),
    }
}

fn render_page_label(app: &CropperApp) -> Element<'_, Message> {
    let label = app.session.as_ref().map_or_else(String::new, |s| {
        format!(
            "Page {}/{}",
            s.current_page().map_or(0, |p| p + 1),
            s.page_count()
        )
    });

    let status = if let Some(ref msg) = app.status_message {
        row![
            text(msg.clone()).size(12),
            button("×").on_press(Message::ClearStatus).padding(2),
        ]
        .spacing(5)
    } else {
        row![]
    };

    row![
        text(label),
        Space::new().width(Length::Fixed(20.0)),
        text(app.document_name.clone().unwrap_or_default()).size(12),
        Space::new().width(Length::Fill),
        status,
    ]
    .padding(10)
    .align_y(iced::Alignment::Center)
    .into()
}

pub fn document_view(app: &CropperApp) -> Element<'_, Message> {
    column![
        container(render_page(app)).padding(10),
        render_toolbar(app),
        render_page_label(app),
    ]
    .into()
}
