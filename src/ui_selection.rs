use crate::message::Message;
use iced::mouse;
use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke};
use iced::{Color, Point, Renderer, Size, Theme};
use pdfcropper::{CanvasPoint, Rectangle, SelectionSource};

const PER_PAGE_COLOR: Color = Color::from_rgb(1.0, 0.0, 0.0);
const GLOBAL_COLOR: Color = Color::from_rgb(0.0, 0.0, 1.0);

/// Transparent layer over the page preview that draws the stored
/// rectangle and turns a left-button drag into a selection.
pub struct SelectionOverlay {
    pub stored: Option<(Rectangle, SelectionSource)>,
}

#[derive(Default)]
pub struct DragState {
    start: Option<Point>,
    current: Option<Point>,
}

impl canvas::Program<Message> for SelectionOverlay {
    type State = DragState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &canvas::Event,
        bounds: iced::Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        // Relative to the canvas but not clipped to it: a drag may end
        // outside the preview.
        let position = cursor
            .position()
            .map(|p| Point::new(p.x - bounds.x, p.y - bounds.y));

        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let start = cursor.position_in(bounds)?;
                state.start = Some(start);
                state.current = Some(start);
                Some(canvas::Action::request_redraw().and_capture())
            }
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                state.start?;
                state.current = position;
                Some(canvas::Action::request_redraw())
            }
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                let start = state.start.take()?;
                let end = position.or(state.current.take()).unwrap_or(start);
                state.current = None;
                Some(
                    canvas::Action::publish(Message::SelectionFinished(
                        to_canvas_point(start),
                        to_canvas_point(end),
                    ))
                    .and_capture(),
                )
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: iced::Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        if let (Some(start), Some(current)) = (state.start, state.current) {
            let rect = Rectangle::from_corners(to_canvas_point(start), to_canvas_point(current));
            outline(&mut frame, &rect, PER_PAGE_COLOR);
        } else if let Some((rect, source)) = &self.stored {
            let color = match source {
                SelectionSource::PerPage => PER_PAGE_COLOR,
                SelectionSource::Global => GLOBAL_COLOR,
            };
            outline(&mut frame, rect, color);
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: iced::Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

fn outline(frame: &mut Frame, rect: &Rectangle, color: Color) {
    let path = Path::rectangle(
        Point::new(rect.x1() as f32, rect.y1() as f32),
        Size::new(rect.width() as f32, rect.height() as f32),
    );
    frame.stroke(&path, Stroke::default().with_color(color).with_width(2.0));
}

fn to_canvas_point(p: Point) -> CanvasPoint {
    CanvasPoint::new(f64::from(p.x), f64::from(p.y))
}
