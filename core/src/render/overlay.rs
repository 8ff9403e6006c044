use crate::diagnostics::LogManager;
use crate::math::Point2;
use crate::model::{BoundingBox, Detection};
use crate::prelude::{ChannelOrder, Frame, GcsError, GcsResult};
use crate::render::Rgba;
use image::{DynamicImage, ImageBuffer, Rgb, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

const BOX_THICKNESS: i32 = 2;
const LABEL_LIFT: f32 = 10.0;

/// Detector classes that get a dedicated overlay colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionClass {
    Person,
    TrafficLight,
    Other,
}

impl DetectionClass {
    pub fn from_name(name: &str) -> Self {
        match name {
            "person" => DetectionClass::Person,
            "traffic light" => DetectionClass::TrafficLight,
            _ => DetectionClass::Other,
        }
    }
}

/// Class-to-colour table, in display (RGB) order.
///
/// Defaults: person is blue, traffic light is yellow, everything else green.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassPalette {
    pub person: Rgba,
    pub traffic_light: Rgba,
    pub fallback: Rgba,
}

impl Default for ClassPalette {
    fn default() -> Self {
        Self {
            person: Rgba::rgb(0, 0, 255),
            traffic_light: Rgba::rgb(255, 255, 0),
            fallback: Rgba::rgb(0, 255, 0),
        }
    }
}

impl ClassPalette {
    pub fn color(&self, class: DetectionClass) -> Rgba {
        match class {
            DetectionClass::Person => self.person,
            DetectionClass::TrafficLight => self.traffic_light,
            DetectionClass::Other => self.fallback,
        }
    }

    pub fn color_for(&self, class_name: &str) -> Rgba {
        self.color(DetectionClass::from_name(class_name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnBox {
    pub bbox: BoundingBox,
    pub color: Rgba,
}

/// Caption anchored above a box, in frame pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLabel {
    pub position: Point2,
    pub text: String,
    pub color: Rgba,
}

/// Display-ready frame: RGBA pixels with boxes burned in, plus the captions.
#[derive(Debug, Clone)]
pub struct AnnotatedFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub boxes: Vec<DrawnBox>,
    pub labels: Vec<OverlayLabel>,
}

pub struct OverlayRenderer {
    threshold: f32,
    palette: ClassPalette,
    logger: LogManager,
}

impl OverlayRenderer {
    pub fn new(threshold: f32) -> Self {
        Self::with_palette(threshold, ClassPalette::default())
    }

    pub fn with_palette(threshold: f32, palette: ClassPalette) -> Self {
        Self {
            threshold,
            palette,
            logger: LogManager::new("overlay"),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Draws every detection above the threshold onto a copy of `frame` and
    /// converts the result to RGBA for the display surface.
    pub fn render(&self, frame: &Frame, detections: &[Detection]) -> GcsResult<AnnotatedFrame> {
        let mut canvas: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_raw(frame.width, frame.height, frame.data.clone()).ok_or_else(
                || GcsError::InvalidFrame(format!("{}x{} buffer", frame.width, frame.height)),
            )?;

        let mut boxes = Vec::new();
        let mut labels = Vec::new();
        for detection in detections
            .iter()
            .filter(|detection| detection.confidence > self.threshold)
        {
            let color = self.palette.color_for(&detection.class_name);
            let ink = match frame.order {
                ChannelOrder::Bgr => Rgb([color.b, color.g, color.r]),
                ChannelOrder::Rgb => Rgb([color.r, color.g, color.b]),
            };
            stroke_box(&mut canvas, &detection.bbox, ink);

            boxes.push(DrawnBox {
                bbox: detection.bbox,
                color,
            });
            labels.push(OverlayLabel {
                position: Point2::new(detection.bbox.x1, (detection.bbox.y1 - LABEL_LIFT).max(0.0)),
                text: detection.caption(),
                color,
            });
        }

        if frame.order == ChannelOrder::Bgr {
            for pixel in canvas.pixels_mut() {
                pixel.0.swap(0, 2);
            }
        }
        let rgba: RgbaImage = DynamicImage::ImageRgb8(canvas).into_rgba8();

        if detections.len() != boxes.len() {
            self.logger.trace(&format!(
                "{} of {} detections below threshold {:.2}",
                detections.len() - boxes.len(),
                detections.len(),
                self.threshold
            ));
        }

        Ok(AnnotatedFrame {
            width: frame.width,
            height: frame.height,
            rgba: rgba.into_raw(),
            boxes,
            labels,
        })
    }
}

fn stroke_box(canvas: &mut ImageBuffer<Rgb<u8>, Vec<u8>>, bbox: &BoundingBox, ink: Rgb<u8>) {
    let Some((x, y, width, height)) = clip_to_frame(bbox, canvas.width(), canvas.height()) else {
        return;
    };
    for inset in 0..BOX_THICKNESS {
        let w = width.saturating_sub(2 * inset).max(1) as u32;
        let h = height.saturating_sub(2 * inset).max(1) as u32;
        draw_hollow_rect_mut(
            canvas,
            Rect::at(x.saturating_add(inset), y.saturating_add(inset)).of_size(w, h),
            ink,
        );
    }
}

/// Pixel rectangle `(x, y, width, height)` of `bbox` clipped to the frame, or
/// `None` when nothing of it is visible.
fn clip_to_frame(bbox: &BoundingBox, width: u32, height: u32) -> Option<(i32, i32, i32, i32)> {
    let coords = [bbox.x1, bbox.y1, bbox.x2, bbox.y2];
    if width == 0 || height == 0 || coords.iter().any(|c| !c.is_finite()) {
        return None;
    }
    let (max_x, max_y) = ((width - 1) as f32, (height - 1) as f32);
    if bbox.x2 < 0.0 || bbox.y2 < 0.0 || bbox.x1 > max_x || bbox.y1 > max_y {
        return None;
    }
    let x1 = bbox.x1.clamp(0.0, max_x).round() as i32;
    let y1 = bbox.y1.clamp(0.0, max_y).round() as i32;
    let x2 = bbox.x2.clamp(0.0, max_x).round() as i32;
    let y2 = bbox.y2.clamp(0.0, max_y).round() as i32;
    Some((x1, y1, (x2 - x1).max(1), (y2 - y1).max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_bgr(width: u32, height: u32) -> Frame {
        Frame::new(
            width,
            height,
            ChannelOrder::Bgr,
            vec![0; (width * height * 3) as usize],
        )
        .unwrap()
    }

    fn pixel(frame: &AnnotatedFrame, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * frame.width + x) * 4) as usize;
        [
            frame.rgba[idx],
            frame.rgba[idx + 1],
            frame.rgba[idx + 2],
            frame.rgba[idx + 3],
        ]
    }

    #[test]
    fn palette_is_deterministic() {
        let palette = ClassPalette::default();
        assert_eq!(palette.color_for("person"), Rgba::rgb(0, 0, 255));
        assert_eq!(palette.color_for("traffic light"), Rgba::rgb(255, 255, 0));
        assert_eq!(palette.color_for("truck"), Rgba::rgb(0, 255, 0));
        assert_eq!(palette.color_for("Person"), palette.fallback);
    }

    #[test]
    fn detections_at_or_below_threshold_are_not_drawn() {
        let renderer = OverlayRenderer::new(0.4);
        let detections = vec![
            Detection::new(BoundingBox::new(2.0, 2.0, 10.0, 10.0), "person", 0.4),
            Detection::new(BoundingBox::new(2.0, 2.0, 10.0, 10.0), "car", 0.1),
        ];
        let annotated = renderer.render(&black_bgr(16, 16), &detections).unwrap();
        assert!(annotated.boxes.is_empty());
        assert!(annotated.labels.is_empty());
        assert!(annotated.rgba.chunks(4).all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn each_confident_detection_gets_one_box_and_one_label() {
        let renderer = OverlayRenderer::new(0.4);
        let detections = vec![
            Detection::new(BoundingBox::new(1.0, 12.0, 8.0, 20.0), "person", 0.9),
            Detection::new(BoundingBox::new(10.0, 14.0, 20.0, 22.0), "traffic light", 0.41),
            Detection::new(BoundingBox::new(0.0, 0.0, 4.0, 4.0), "dog", 0.2),
        ];
        let annotated = renderer.render(&black_bgr(24, 24), &detections).unwrap();
        assert_eq!(annotated.boxes.len(), 2);
        assert_eq!(annotated.labels.len(), 2);
        assert_eq!(annotated.labels[0].text, "person %90");
        assert_eq!(annotated.labels[0].position, Point2::new(1.0, 2.0));
        assert_eq!(annotated.labels[1].position, Point2::new(10.0, 4.0));
    }

    #[test]
    fn bgr_input_is_displayed_in_rgb_order() {
        let renderer = OverlayRenderer::new(0.4);
        let detections = vec![Detection::new(
            BoundingBox::new(2.0, 2.0, 12.0, 12.0),
            "person",
            0.8,
        )];
        let annotated = renderer.render(&black_bgr(16, 16), &detections).unwrap();
        assert_eq!(pixel(&annotated, 2, 2), [0, 0, 255, 255]);
        assert_eq!(pixel(&annotated, 7, 7), [0, 0, 0, 255]);
    }

    #[test]
    fn far_out_boxes_are_clipped_to_the_frame() {
        let renderer = OverlayRenderer::new(0.4);
        let detections = vec![
            Detection::new(BoundingBox::new(5.0, 5.0, 1e10, 6.0), "car", 0.9),
            Detection::new(BoundingBox::new(-1e12, -1e12, 1e12, 1e12), "truck", 0.9),
            Detection::new(BoundingBox::new(40.0, 40.0, 90.0, 90.0), "bus", 0.9),
            Detection::new(BoundingBox::new(f32::NAN, 0.0, 3.0, 3.0), "boat", 0.9),
        ];
        let annotated = renderer.render(&black_bgr(8, 8), &detections).unwrap();
        assert_eq!(annotated.boxes.len(), 4);
        assert_eq!(pixel(&annotated, 6, 5), [0, 255, 0, 255]);
        assert_eq!(pixel(&annotated, 0, 0), [0, 255, 0, 255]);
    }

    #[test]
    fn source_detections_are_left_untouched() {
        let renderer = OverlayRenderer::new(0.4);
        let detections = vec![Detection::new(
            BoundingBox::new(0.0, 0.0, 3.0, 3.0),
            "car",
            0.7,
        )];
        let before = detections.clone();
        renderer.render(&black_bgr(8, 8), &detections).unwrap();
        assert_eq!(detections, before);
    }
}
