//! Object detection engines run once per fast tick.

pub mod coco;
#[cfg(feature = "camera")]
pub mod onnx;
pub mod yolo;

#[cfg(feature = "camera")]
pub use onnx::YoloEngine;

use crate::model::Detection;
use crate::prelude::{Frame, GcsResult};

/// Anything that turns a frame into a finite list of detections.
pub trait DetectionEngine {
    fn detect(&mut self, frame: &Frame) -> GcsResult<Vec<Detection>>;
}

/// Engine that never reports anything.
#[derive(Debug, Default)]
pub struct NullEngine;

impl DetectionEngine for NullEngine {
    fn detect(&mut self, _frame: &Frame) -> GcsResult<Vec<Detection>> {
        Ok(Vec::new())
    }
}

/// Replays a fixed script, one entry per call, looping at the end.
#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    script: Vec<Vec<Detection>>,
    cursor: usize,
}

impl ScriptedEngine {
    pub fn new(script: Vec<Vec<Detection>>) -> Self {
        Self { script, cursor: 0 }
    }

    /// Two drifting boxes, one person and one traffic light, sized for a
    /// `width` x `height` feed.
    pub fn demo(width: u32, height: u32) -> Self {
        use crate::model::BoundingBox;

        let w = width as f32;
        let h = height as f32;
        let script = (0..60)
            .map(|step| {
                let drift = (step as f32 / 60.0) * w * 0.3;
                vec![
                    Detection::new(
                        BoundingBox::new(
                            w * 0.1 + drift,
                            h * 0.4,
                            w * 0.25 + drift,
                            h * 0.85,
                        ),
                        "person",
                        0.82,
                    ),
                    Detection::new(
                        BoundingBox::new(w * 0.7, h * 0.1, w * 0.78, h * 0.35),
                        "traffic light",
                        if step % 20 < 10 { 0.55 } else { 0.35 },
                    ),
                ]
            })
            .collect();
        Self::new(script)
    }
}

impl DetectionEngine for ScriptedEngine {
    fn detect(&mut self, _frame: &Frame) -> GcsResult<Vec<Detection>> {
        if self.script.is_empty() {
            return Ok(Vec::new());
        }
        let detections = self.script[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.script.len();
        Ok(detections)
    }
}
