use crate::config::RadarConfig;
use crate::math::{GeometryHelper, Point2};
use crate::render::Rgba;
use rand::{rngs::StdRng, Rng, SeedableRng};

const GRID_SPACING: f32 = 40.0;
const RING_RADII: [f32; 2] = [40.0, 80.0];
const BLIP_RADIUS: f32 = 5.0;
const CAPTION_INSET: f32 = 5.0;
/// Nose, left wing, right wing; unrotated the nose points up.
const OWN_SHIP_GLYPH: [Point2; 3] = [
    Point2::new(0.0, -10.0),
    Point2::new(-8.0, 8.0),
    Point2::new(8.0, 8.0),
];

pub const BACKGROUND: Rgba = Rgba::rgb(10, 15, 25);
pub const GRID_COLOR: Rgba = Rgba::rgba(0, 255, 255, 50);
pub const RING_COLOR: Rgba = Rgba::rgba(0, 255, 0, 150);
pub const BLIP_COLOR: Rgba = Rgba::rgb(255, 50, 50);
pub const OWN_SHIP_COLOR: Rgba = Rgba::rgb(0, 255, 255);
pub const CAPTION_COLOR: Rgba = Rgba::rgb(200, 200, 200);

/// Own-ship yaw in degrees, always within `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Heading(f32);

impl Heading {
    pub fn new(degrees: f32) -> Self {
        Self(GeometryHelper::wrap_degrees(degrees))
    }

    pub fn degrees(&self) -> f32 {
        self.0
    }

    pub fn advance(self, step: f32) -> Self {
        Self::new(self.0 + step)
    }
}

/// Blip offset from own-ship in display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadarTarget {
    pub offset_x: i32,
    pub offset_y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point2,
    pub to: Point2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point2,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub position: Point2,
    pub text: String,
}

/// Everything needed to paint one radar frame, in widget pixel coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RadarScene {
    pub width: f32,
    pub height: f32,
    pub grid: Vec<Segment>,
    pub rings: Vec<Circle>,
    pub blips: Vec<Circle>,
    pub own_ship: Option<[Point2; 3]>,
    pub heading: Heading,
    pub caption: Option<Caption>,
}

impl RadarScene {
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Tactical top-down display holding the fixed decoy blips.
#[derive(Debug, Clone)]
pub struct RadarView {
    targets: Vec<RadarTarget>,
    caption: String,
}

impl RadarView {
    pub fn new(targets: Vec<RadarTarget>, caption: impl Into<String>) -> Self {
        Self {
            targets,
            caption: caption.into(),
        }
    }

    /// Builds the view with decorative blips scattered inside the configured span.
    pub fn with_decoys<R: Rng>(config: &RadarConfig, rng: &mut R) -> Self {
        let span_x = config.decoy_span_x.saturating_abs();
        let span_y = config.decoy_span_y.saturating_abs();
        let targets = (0..config.decoy_targets)
            .map(|_| RadarTarget {
                offset_x: rng.gen_range(-span_x..=span_x),
                offset_y: rng.gen_range(-span_y..=span_y),
            })
            .collect();
        Self::new(targets, config.caption.clone())
    }

    pub fn from_config(config: &RadarConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_decoys(config, &mut rng)
    }

    pub fn targets(&self) -> &[RadarTarget] {
        &self.targets
    }

    /// Composes the scene for a widget of `width` x `height` pixels.
    pub fn scene(&self, heading: Heading, width: f32, height: f32) -> RadarScene {
        if width <= 0.0 || height <= 0.0 {
            return RadarScene {
                heading,
                ..Default::default()
            };
        }

        let center = Point2::new((width / 2.0).floor(), (height / 2.0).floor());

        let mut grid = Vec::new();
        let mut x = 0.0;
        while x < width {
            grid.push(Segment {
                from: Point2::new(x, 0.0),
                to: Point2::new(x, height),
            });
            x += GRID_SPACING;
        }
        let mut y = 0.0;
        while y < height {
            grid.push(Segment {
                from: Point2::new(0.0, y),
                to: Point2::new(width, y),
            });
            y += GRID_SPACING;
        }

        let rings = RING_RADII
            .iter()
            .map(|&radius| Circle { center, radius })
            .collect();

        let blips = self
            .targets
            .iter()
            .map(|target| Circle {
                center: Point2::new(
                    center.x + target.offset_x as f32,
                    center.y + target.offset_y as f32,
                ),
                radius: BLIP_RADIUS,
            })
            .collect();

        let own_ship = OWN_SHIP_GLYPH.map(|vertex| {
            let rotated = GeometryHelper::rotate(vertex, heading.degrees());
            Point2::new(center.x + rotated.x, center.y + rotated.y)
        });

        RadarScene {
            width,
            height,
            grid,
            rings,
            blips,
            own_ship: Some(own_ship),
            heading,
            caption: Some(Caption {
                position: Point2::new(CAPTION_INSET, height - CAPTION_INSET),
                text: self.caption.clone(),
            }),
        }
    }
}
