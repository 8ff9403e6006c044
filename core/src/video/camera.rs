use crate::diagnostics::LogManager;
use crate::prelude::{ChannelOrder, Frame, GcsError, GcsResult};
use crate::video::VideoSource;
use opencv::{core::Mat, prelude::*, videoio};

/// OpenCV capture device. Frames are delivered in BGR order.
pub struct CameraSource {
    capture: videoio::VideoCapture,
    released: bool,
    logger: LogManager,
}

impl CameraSource {
    pub fn open(device: i32) -> GcsResult<Self> {
        let capture = videoio::VideoCapture::new(device, videoio::CAP_ANY)
            .map_err(|err| GcsError::SourceUnavailable(err.to_string()))?;
        let logger = LogManager::new("video");
        match capture.is_opened() {
            Ok(true) => logger.record(&format!("camera {} opened", device)),
            _ => logger.warn(&format!("camera {} did not open", device)),
        }
        Ok(Self {
            capture,
            released: false,
            logger,
        })
    }

    fn grab(&mut self) -> opencv::Result<Option<Frame>> {
        let mut mat = Mat::default();
        if !self.capture.read(&mut mat)? || mat.empty() {
            return Ok(None);
        }
        let mat = if mat.is_continuous() {
            mat
        } else {
            mat.try_clone()?
        };
        let width = mat.cols() as u32;
        let height = mat.rows() as u32;
        let data = mat.data_bytes()?.to_vec();
        Ok(Frame::new(width, height, ChannelOrder::Bgr, data).ok())
    }
}

impl VideoSource for CameraSource {
    fn is_open(&self) -> bool {
        !self.released && self.capture.is_opened().unwrap_or(false)
    }

    fn read_frame(&mut self) -> Option<Frame> {
        if self.released {
            return None;
        }
        match self.grab() {
            Ok(frame) => frame,
            Err(err) => {
                self.logger.trace(&format!("frame read failed: {}", err));
                None
            }
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(err) = self.capture.release() {
            self.logger.warn(&format!("camera release failed: {}", err));
        } else {
            self.logger.record("camera released");
        }
    }
}
