use crate::Message;
use gcscore::render::radar::{
    BACKGROUND, BLIP_COLOR, CAPTION_COLOR, GRID_COLOR, OWN_SHIP_COLOR, RING_COLOR,
};
use gcscore::render::{Heading, RadarView, Rgba};
use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, LineDash, Path, Stroke},
    Color, Pixels, Point, Rectangle, Renderer, Theme,
};

const CAPTION_SIZE: f32 = 11.0;

pub fn color(rgba: Rgba) -> Color {
    Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a as f32 / 255.0)
}

/// Paints the radar scene for the current heading.
pub struct RadarCanvas<'a> {
    pub view: &'a RadarView,
    pub heading: Heading,
}

impl canvas::Program<Message> for RadarCanvas<'_> {
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
        let scene = self.view.scene(self.heading, bounds.width, bounds.height);
        if scene.is_empty() {
            return vec![frame.into_geometry()];
        }

        frame.fill_rectangle(Point::ORIGIN, bounds.size(), color(BACKGROUND));

        let grid = Path::new(|builder| {
            for segment in &scene.grid {
                builder.move_to(Point::new(segment.from.x, segment.from.y));
                builder.line_to(Point::new(segment.to.x, segment.to.y));
            }
        });
        frame.stroke(
            &grid,
            Stroke {
                line_dash: LineDash {
                    segments: &[2.0, 4.0],
                    offset: 0,
                },
                ..Stroke::default()
            }
            .with_color(color(GRID_COLOR))
            .with_width(1.0),
        );

        for ring in &scene.rings {
            let ring_path = Path::circle(Point::new(ring.center.x, ring.center.y), ring.radius);
            frame.stroke(
                &ring_path,
                Stroke::default()
                    .with_color(color(RING_COLOR))
                    .with_width(1.0),
            );
        }

        for blip in &scene.blips {
            let marker = Path::circle(Point::new(blip.center.x, blip.center.y), blip.radius);
            frame.fill(&marker, color(BLIP_COLOR));
        }

        if let Some([nose, left, right]) = scene.own_ship {
            let glyph = Path::new(|builder| {
                builder.move_to(Point::new(nose.x, nose.y));
                builder.line_to(Point::new(left.x, left.y));
                builder.line_to(Point::new(right.x, right.y));
                builder.close();
            });
            frame.fill(&glyph, color(OWN_SHIP_COLOR));
        }

        if let Some(caption) = &scene.caption {
            frame.fill_text(canvas::Text {
                content: caption.text.clone(),
                position: Point::new(caption.position.x, caption.position.y - CAPTION_SIZE - 2.0),
                color: color(CAPTION_COLOR),
                size: Pixels(CAPTION_SIZE),
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}
