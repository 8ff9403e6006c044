use crate::model::BoundingBox;

/// Screen-space point, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

pub struct GeometryHelper;

impl GeometryHelper {
    /// Rotates `point` about the origin by `degrees`, clockwise on screen.
    pub fn rotate(point: Point2, degrees: f32) -> Point2 {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Point2::new(point.x * cos - point.y * sin, point.x * sin + point.y * cos)
    }

    /// Wraps an angle into `[0, 360)`.
    pub fn wrap_degrees(degrees: f32) -> f32 {
        let wrapped = degrees.rem_euclid(360.0);
        if wrapped >= 360.0 {
            0.0
        } else {
            wrapped
        }
    }

    pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
        let ix1 = a.x1.max(b.x1);
        let iy1 = a.y1.max(b.y1);
        let ix2 = a.x2.min(b.x2);
        let iy2 = a.y2.min(b.y2);
        let intersection = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = a.area() + b.area() - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}
