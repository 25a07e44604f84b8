use iced::{keyboard, mouse};
use iced::widget::{canvas, container, image, stack};
use iced::{Color, ContentFit, Element, Length, Point, Rectangle, Size};

use crate::core::models::{CaptureBuffer, CaptureRect};
use crate::global_constants::{SNIPPING_BACKGROUND_DIM_RGBA, SNIPPING_DIM_RGBA};

/// Full-screen overlay the user drags a capture rectangle on.
pub struct SnippingArea {
    area: CaptureRect,
    background: Option<CaptureBuffer>,
    frame_color: Color,
    widget_size: Size,
    selection_start: Option<Point>,
    selection_current: Option<Point>,
    is_selecting: bool,
}

#[derive(Debug, Clone)]
pub enum SnippingAreaMessage {
    MousePressed(Point, Size),
    MouseMoved(Point),
    MouseReleased,
    CancelRequested,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SnippingAreaEvent {
    AreaSelected(CaptureRect),
    Cancel,
}

impl SnippingArea {
    pub fn build(area: CaptureRect, background: Option<CaptureBuffer>, frame_color: Color) -> Self {
        log::debug!(
            "[SNIPPING_AREA] building overlay over {}, background={}",
            area,
            background.is_some()
        );
        Self {
            area,
            background,
            frame_color,
            widget_size: Size::new(area.width as f32, area.height as f32),
            selection_start: None,
            selection_current: None,
            is_selecting: false,
        }
    }

    pub fn update(&mut self, message: SnippingAreaMessage) -> Option<SnippingAreaEvent> {
        match message {
            SnippingAreaMessage::MousePressed(point, widget_size) => {
                self.widget_size = widget_size;
                self.selection_start = Some(point);
                self.selection_current = Some(point);
                self.is_selecting = true;
                None
            }
            SnippingAreaMessage::MouseMoved(point) => {
                if self.is_selecting {
                    self.selection_current = Some(point);
                }
                None
            }
            SnippingAreaMessage::MouseReleased => {
                if !self.is_selecting {
                    return None;
                }
                self.is_selecting = false;

                match self.selected_desktop_rect() {
                    Some(rect) if !rect.is_null() => {
                        log::info!("[SNIPPING_AREA] area selected: {}", rect);
                        Some(SnippingAreaEvent::AreaSelected(rect))
                    }
                    _ => {
                        log::debug!("[SNIPPING_AREA] empty selection ignored");
                        self.selection_start = None;
                        self.selection_current = None;
                        None
                    }
                }
            }
            SnippingAreaMessage::CancelRequested => {
                log::info!("[SNIPPING_AREA] selection canceled");
                self.selection_start = None;
                self.selection_current = None;
                self.is_selecting = false;
                Some(SnippingAreaEvent::Cancel)
            }
        }
    }

    fn selection_rectangle(&self) -> Option<(Point, Size)> {
        match (self.selection_start, self.selection_current) {
            (Some(start), Some(current)) => {
                let x = start.x.min(current.x);
                let y = start.y.min(current.y);
                let width = (start.x - current.x).abs();
                let height = (start.y - current.y).abs();
                Some((Point::new(x, y), Size::new(width, height)))
            }
            _ => None,
        }
    }

    /// Selection mapped from widget space into desktop coordinates.
    pub fn selected_desktop_rect(&self) -> Option<CaptureRect> {
        let (top_left, size) = self.selection_rectangle()?;

        let scale_x = if self.widget_size.width > 0.0 {
            self.area.width as f32 / self.widget_size.width
        } else {
            1.0
        };
        let scale_y = if self.widget_size.height > 0.0 {
            self.area.height as f32 / self.widget_size.height
        } else {
            1.0
        };

        let left = (top_left.x * scale_x).round() as i32;
        let top = (top_left.y * scale_y).round() as i32;
        let right = ((top_left.x + size.width) * scale_x).round() as i32;
        let bottom = ((top_left.y + size.height) * scale_y).round() as i32;

        Some(
            CaptureRect::from_corners((left, top), (right, bottom))
                .translated(self.area.x, self.area.y),
        )
    }

    pub fn render_ui(&self) -> Element<'_, SnippingAreaMessage> {
        let overlay_canvas = canvas(self).width(Length::Fill).height(Length::Fill);

        let content: Element<'_, SnippingAreaMessage> = match &self.background {
            Some(background) => stack(vec![
                image(background.image_handle.clone())
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .content_fit(ContentFit::Fill)
                    .into(),
                overlay_canvas.into(),
            ])
            .into(),
            None => overlay_canvas.into(),
        };

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn dim_color(&self) -> Color {
        let (r, g, b, a) = if self.background.is_some() {
            SNIPPING_BACKGROUND_DIM_RGBA
        } else {
            SNIPPING_DIM_RGBA
        };
        Color::from_rgba(r, g, b, a)
    }
}

impl SnippingArea {
    fn message_for_mouse(
        &self,
        mouse_event: &mouse::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<SnippingAreaMessage> {
        match mouse_event {
            mouse::Event::ButtonPressed(mouse::Button::Left) => cursor
                .position_in(bounds)
                .map(|position| SnippingAreaMessage::MousePressed(position, bounds.size())),
            mouse::Event::ButtonPressed(mouse::Button::Right) => {
                Some(SnippingAreaMessage::CancelRequested)
            }
            mouse::Event::CursorMoved { .. } if self.is_selecting => cursor
                .position_in(bounds)
                .map(SnippingAreaMessage::MouseMoved),
            mouse::Event::ButtonReleased(mouse::Button::Left) => {
                Some(SnippingAreaMessage::MouseReleased)
            }
            _ => None,
        }
    }

    fn message_for_key(key: &keyboard::Key) -> Option<SnippingAreaMessage> {
        match key {
            keyboard::Key::Named(keyboard::key::Named::Escape) => {
                Some(SnippingAreaMessage::CancelRequested)
            }
            _ => None,
        }
    }
}

impl canvas::Program<SnippingAreaMessage> for SnippingArea {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<SnippingAreaMessage>> {
        let message = match event {
            iced::Event::Mouse(mouse_event) => self.message_for_mouse(mouse_event, bounds, cursor),
            iced::Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => {
                Self::message_for_key(key)
            }
            _ => None,
        };
        message.map(canvas::Action::publish)
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry<iced::Renderer>> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let dim_color = self.dim_color();

        let Some((top_left, size)) = self.selection_rectangle() else {
            frame.fill_rectangle(Point::ORIGIN, bounds.size(), dim_color);
            return vec![frame.into_geometry()];
        };

        frame.fill_rectangle(
            Point::ORIGIN,
            Size::new(bounds.width, top_left.y),
            dim_color,
        );
        frame.fill_rectangle(
            Point::new(0.0, top_left.y + size.height),
            Size::new(bounds.width, bounds.height - (top_left.y + size.height)),
            dim_color,
        );
        frame.fill_rectangle(
            Point::new(0.0, top_left.y),
            Size::new(top_left.x, size.height),
            dim_color,
        );
        frame.fill_rectangle(
            Point::new(top_left.x + size.width, top_left.y),
            Size::new(bounds.width - (top_left.x + size.width), size.height),
            dim_color,
        );

        frame.stroke(
            &canvas::Path::rectangle(top_left, size),
            canvas::Stroke::default()
                .with_color(self.frame_color)
                .with_width(2.0),
        );

        if let Some(rect) = self.selected_desktop_rect() {
            let label_y = if top_left.y > 24.0 {
                top_left.y - 20.0
            } else {
                top_left.y + size.height + 4.0
            };
            frame.fill_text(canvas::Text {
                content: format!("{} x {}", rect.width, rect.height),
                position: Point::new(top_left.x, label_y),
                color: self.frame_color,
                size: 14.0.into(),
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        _bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        mouse::Interaction::Crosshair
    }
}
