use crate::config::{EngineKind, GcsConfig, VideoSourceKind};
use crate::detection::{DetectionEngine, NullEngine, ScriptedEngine};
use crate::diagnostics::{LogManager, LoopMetrics};
use crate::render::{AnnotatedFrame, OverlayRenderer};
use crate::video::{ClosedSource, PatternSource, VideoSource};

/// What the camera panel shows after one fast tick.
#[derive(Debug, Clone)]
pub struct VideoViewState {
    pub frame: AnnotatedFrame,
    pub detections_seen: usize,
}

/// Fast loop: frame -> detection -> overlay, once per tick.
pub struct VideoLoop {
    source: Box<dyn VideoSource>,
    engine: Box<dyn DetectionEngine>,
    renderer: OverlayRenderer,
    metrics: LoopMetrics,
    was_open: Option<bool>,
    released: bool,
    logger: LogManager,
}

impl VideoLoop {
    pub fn new(
        source: Box<dyn VideoSource>,
        engine: Box<dyn DetectionEngine>,
        renderer: OverlayRenderer,
    ) -> Self {
        Self {
            source,
            engine,
            renderer,
            metrics: LoopMetrics::new(),
            was_open: None,
            released: false,
            logger: LogManager::new("video"),
        }
    }

    pub fn from_config(config: &GcsConfig) -> Self {
        let logger = LogManager::new("video");
        let source: Box<dyn VideoSource> = match config.video.source {
            VideoSourceKind::Camera => open_camera(config.video.device, &logger),
            VideoSourceKind::Pattern => Box::new(PatternSource::new(
                config.video.pattern_width,
                config.video.pattern_height,
            )),
            VideoSourceKind::None => Box::new(ClosedSource),
        };
        let engine: Box<dyn DetectionEngine> = match config.detection.engine {
            EngineKind::Yolo => load_yolo(config, &logger),
            EngineKind::Scripted => Box::new(ScriptedEngine::demo(
                config.video.pattern_width,
                config.video.pattern_height,
            )),
            EngineKind::None => Box::new(NullEngine),
        };
        Self::new(
            source,
            engine,
            OverlayRenderer::new(config.detection.confidence_threshold),
        )
    }

    /// Runs one fast tick. `None` means the tick was skipped and the panel
    /// keeps whatever it showed before.
    pub fn tick(&mut self) -> Option<VideoViewState> {
        let open = !self.released && self.source.is_open();
        if self.was_open != Some(open) {
            self.logger.record(if open {
                "video source open"
            } else {
                "video source not open; holding placeholder"
            });
            self.was_open = Some(open);
        }
        if !open {
            self.metrics.record_skip();
            return None;
        }

        let Some(frame) = self.source.read_frame() else {
            self.logger.trace("frame read failed; tick skipped");
            self.metrics.record_skip();
            return None;
        };

        let detections = match self.engine.detect(&frame) {
            Ok(detections) => detections,
            Err(err) => {
                self.logger.warn(&err.to_string());
                self.metrics.record_detection_error();
                Vec::new()
            }
        };

        match self.renderer.render(&frame, &detections) {
            Ok(annotated) => {
                self.metrics.record_frame();
                Some(VideoViewState {
                    frame: annotated,
                    detections_seen: detections.len(),
                })
            }
            Err(err) => {
                self.logger.warn(&err.to_string());
                self.metrics.record_skip();
                None
            }
        }
    }

    /// Releases the video source exactly once.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.source.release();
        self.logger.record("video source released");
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn metrics(&self) -> LoopMetrics {
        self.metrics
    }
}

impl Drop for VideoLoop {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(feature = "camera")]
fn open_camera(device: i32, logger: &LogManager) -> Box<dyn VideoSource> {
    match crate::video::CameraSource::open(device) {
        Ok(camera) => Box::new(camera),
        Err(err) => {
            logger.warn(&err.to_string());
            Box::new(ClosedSource)
        }
    }
}

#[cfg(not(feature = "camera"))]
fn open_camera(device: i32, logger: &LogManager) -> Box<dyn VideoSource> {
    logger.warn(&format!(
        "camera {} requested but built without the `camera` feature",
        device
    ));
    Box::new(ClosedSource)
}

#[cfg(feature = "camera")]
fn load_yolo(config: &GcsConfig, logger: &LogManager) -> Box<dyn DetectionEngine> {
    match crate::detection::YoloEngine::load(&config.detection) {
        Ok(engine) => Box::new(engine),
        Err(err) => {
            logger.warn(&format!("{}; detection disabled", err));
            Box::new(NullEngine)
        }
    }
}

#[cfg(not(feature = "camera"))]
fn load_yolo(config: &GcsConfig, logger: &LogManager) -> Box<dyn DetectionEngine> {
    logger.warn(&format!(
        "model {} requested but built without the `camera` feature; detection disabled",
        config.detection.model_path
    ));
    Box::new(NullEngine)
}
