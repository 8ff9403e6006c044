pub mod gauge;
pub mod overlay;
pub mod radar;

pub use gauge::{Gauge, GaugeReading};
pub use overlay::{AnnotatedFrame, ClassPalette, DetectionClass, OverlayLabel, OverlayRenderer};
pub use radar::{Heading, RadarScene, RadarTarget, RadarView};

use serde::{Deserialize, Serialize};

/// 8-bit RGBA colour, independent of any GUI toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}
