use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Top-level ground station configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GcsConfig {
    pub link: LinkConfig,
    pub video: VideoConfig,
    pub detection: DetectionConfig,
    pub telemetry: TelemetryConfig,
    pub gauges: GaugeConfig,
    pub radar: RadarConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub enabled: bool,
    /// MAVLink connection string, e.g. `udpin:127.0.0.1:14550`.
    pub endpoint: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "udpin:127.0.0.1:14550".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VideoSourceKind {
    Camera,
    Pattern,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub source: VideoSourceKind,
    pub device: i32,
    pub interval_ms: u64,
    pub pattern_width: u32,
    pub pattern_height: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            source: VideoSourceKind::Camera,
            device: 0,
            interval_ms: 30,
            pattern_width: 640,
            pattern_height: 480,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Yolo,
    Scripted,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub engine: EngineKind,
    pub model_path: String,
    /// Detections at or below this confidence are never drawn.
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub input_size: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Yolo,
            model_path: "yolov8n.onnx".into(),
            confidence_threshold: 0.4,
            iou_threshold: 0.45,
            input_size: 640,
        }
    }
}

/// Half-open `[min, max)` range sampled for demo telemetry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DemoRange {
    pub min: f32,
    pub max: f32,
}

impl DemoRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn as_range(&self) -> Range<f32> {
        self.min..self.max
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value < self.max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub interval_ms: u64,
    pub yaw_step_deg: f32,
    pub demo_altitude: DemoRange,
    pub demo_speed: DemoRange,
    pub demo_battery: DemoRange,
    pub seed: Option<u64>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            yaw_step_deg: 2.0,
            demo_altitude: DemoRange::new(50.0, 60.0),
            demo_speed: DemoRange::new(15.0, 20.0),
            demo_battery: DemoRange::new(80.0, 85.0),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    pub altitude_max: f32,
    pub speed_max: f32,
    pub battery_max: f32,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            altitude_max: 150.0,
            speed_max: 30.0,
            battery_max: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// Number of decorative blips; zero disables them.
    pub decoy_targets: usize,
    pub decoy_span_x: i32,
    pub decoy_span_y: i32,
    pub caption: String,
    pub seed: Option<u64>,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            decoy_targets: 3,
            decoy_span_x: 100,
            decoy_span_y: 50,
            caption: "GPS: 40.2015 N / 32.6868 E".into(),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_timings() {
        let cfg = GcsConfig::default();
        assert_eq!(cfg.video.interval_ms, 30);
        assert_eq!(cfg.telemetry.interval_ms, 100);
        assert_eq!(cfg.detection.confidence_threshold, 0.4);
        assert_eq!(cfg.radar.decoy_targets, 3);
    }

    #[test]
    fn demo_range_is_half_open() {
        let range = DemoRange::new(50.0, 60.0);
        assert!(range.contains(50.0));
        assert!(!range.contains(60.0));
    }
}
