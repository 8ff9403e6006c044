/// Pixel layout of a raw three-channel frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    /// Blue-green-red, as delivered by most capture backends.
    Bgr,
    Rgb,
}

/// Raw interleaved 8-bit frame produced by a video source.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub order: ChannelOrder,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, order: ChannelOrder, data: Vec<u8>) -> GcsResult<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(GcsError::InvalidFrame(format!(
                "{}x{} frame needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            order,
            data,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Failure taxonomy shared by the collaborators and refresh loops.
///
/// None of these are fatal: every caller degrades to the last known good
/// display state.
#[derive(thiserror::Error, Debug)]
pub enum GcsError {
    #[error("video source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("vehicle link connection failed: {0}")]
    ConnectionFailure(String),
    #[error("detection engine failure: {0}")]
    Detection(String),
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}

pub type GcsResult<T> = Result<T, GcsError>;
