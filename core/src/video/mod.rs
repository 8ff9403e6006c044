//! Frame sources consumed by the fast refresh loop.

#[cfg(feature = "camera")]
pub mod camera;
pub mod pattern;

#[cfg(feature = "camera")]
pub use camera::CameraSource;
pub use pattern::PatternSource;

use crate::prelude::Frame;

/// A capture device or synthetic feed polled once per fast tick.
pub trait VideoSource {
    fn is_open(&self) -> bool;
    /// Next frame, or `None` when the read fails or the source is exhausted.
    fn read_frame(&mut self) -> Option<Frame>;
    /// Releases the underlying handle. Safe to call more than once.
    fn release(&mut self);
}

/// Source that never opens; the console keeps its placeholder.
#[derive(Debug, Default)]
pub struct ClosedSource;

impl VideoSource for ClosedSource {
    fn is_open(&self) -> bool {
        false
    }

    fn read_frame(&mut self) -> Option<Frame> {
        None
    }

    fn release(&mut self) {}
}
