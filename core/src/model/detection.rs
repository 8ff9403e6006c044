use serde::{Deserialize, Serialize};

/// Axis-aligned box in frame pixel coordinates, corners `(x1, y1)`-`(x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }
}

/// One labelled, confidence-scored box produced by the detection engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub class_name: String,
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: BoundingBox, class_name: impl Into<String>, confidence: f32) -> Self {
        Self {
            bbox,
            class_name: class_name.into(),
            confidence,
        }
    }

    /// Overlay caption, e.g. `person %87`.
    pub fn caption(&self) -> String {
        let percent = (self.confidence.clamp(0.0, 1.0) * 100.0) as u32;
        format!("{} %{}", self.class_name, percent)
    }
}
