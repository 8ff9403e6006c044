use crate::radar::color;
use crate::Message;
use gcscore::render::OverlayLabel;
use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry},
    Pixels, Point, Rectangle, Renderer, Theme,
};

const LABEL_SIZE: f32 = 14.0;

/// Detection captions drawn over the stretched camera image.
pub struct LabelLayer<'a> {
    pub labels: &'a [OverlayLabel],
    pub frame_width: u32,
    pub frame_height: u32,
}

impl canvas::Program<Message> for LabelLayer<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        if self.frame_width == 0 || self.frame_height == 0 {
            return vec![frame.into_geometry()];
        }

        // image is stretched to fill, so captions scale per axis
        let sx = bounds.width / self.frame_width as f32;
        let sy = bounds.height / self.frame_height as f32;
        for label in self.labels {
            frame.fill_text(canvas::Text {
                content: label.text.clone(),
                position: Point::new(
                    label.position.x * sx,
                    (label.position.y * sy - LABEL_SIZE).max(0.0),
                ),
                color: color(label.color),
                size: Pixels(LABEL_SIZE),
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}
