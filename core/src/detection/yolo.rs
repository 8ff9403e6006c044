use crate::detection::coco::class_name;
use crate::math::GeometryHelper;
use crate::model::{BoundingBox, Detection};
use crate::prelude::{GcsError, GcsResult};

/// Candidates below this score are dropped before suppression; display
/// filtering happens later at the overlay threshold.
pub const CANDIDATE_FLOOR: f32 = 0.25;

/// Shape and scaling of one YOLOv8 output tensor.
#[derive(Debug, Clone, Copy)]
pub struct YoloLayout {
    /// `4 + class count` rows.
    pub rows: usize,
    /// Anchor columns, 8400 for a 640 input.
    pub anchors: usize,
    pub input_size: u32,
    pub frame_width: u32,
    pub frame_height: u32,
}

/// Decodes a `[rows, anchors]` row-major YOLOv8 head into frame-space
/// detections, keeping the best class per anchor.
pub fn decode(output: &[f32], layout: &YoloLayout, floor: f32) -> GcsResult<Vec<Detection>> {
    if layout.rows <= 4 {
        return Err(GcsError::Detection(format!(
            "output has {} rows, expected more than 4",
            layout.rows
        )));
    }
    if output.len() < layout.rows * layout.anchors {
        return Err(GcsError::Detection(format!(
            "output has {} values, expected {}",
            output.len(),
            layout.rows * layout.anchors
        )));
    }

    let input = layout.input_size.max(1) as f32;
    let sx = layout.frame_width as f32 / input;
    let sy = layout.frame_height as f32 / input;
    let at = |row: usize, anchor: usize| output[row * layout.anchors + anchor];

    let mut detections = Vec::new();
    for anchor in 0..layout.anchors {
        let (best_class, best_score) = (4..layout.rows)
            .map(|row| (row - 4, at(row, anchor)))
            .fold((0, f32::NEG_INFINITY), |best, candidate| {
                if candidate.1 > best.1 {
                    candidate
                } else {
                    best
                }
            });
        if best_score < floor {
            continue;
        }

        let (cx, cy, w, h) = (
            at(0, anchor),
            at(1, anchor),
            at(2, anchor),
            at(3, anchor),
        );
        let bbox = BoundingBox::new(
            ((cx - w / 2.0) * sx).max(0.0),
            ((cy - h / 2.0) * sy).max(0.0),
            ((cx + w / 2.0) * sx).min(layout.frame_width as f32),
            ((cy + h / 2.0) * sy).min(layout.frame_height as f32),
        );
        detections.push(Detection::new(bbox, class_name(best_class), best_score));
    }
    Ok(detections)
}

/// Greedy per-class non-maximum suppression, highest confidence first.
pub fn suppress(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    let mut kept: Vec<Detection> = Vec::with_capacity(detections.len());
    for candidate in detections {
        let overlaps = kept.iter().any(|existing| {
            existing.class_name == candidate.class_name
                && GeometryHelper::iou(&existing.bbox, &candidate.bbox) > iou_threshold
        });
        if !overlaps {
            kept.push(candidate);
        }
    }
    kept
}
