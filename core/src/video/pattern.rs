use crate::prelude::{ChannelOrder, Frame};
use crate::video::VideoSource;

const BAR_COLORS_BGR: [[u8; 3]; 6] = [
    [200, 200, 200],
    [0, 200, 200],
    [200, 200, 0],
    [0, 200, 0],
    [200, 0, 200],
    [0, 0, 200],
];

/// Synthetic BGR test card with a sweeping bright column, for running
/// without a camera.
#[derive(Debug)]
pub struct PatternSource {
    width: u32,
    height: u32,
    tick: u32,
    open: bool,
}

impl PatternSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tick: 0,
            open: width > 0 && height > 0,
        }
    }

    fn compose(&self) -> Vec<u8> {
        let width = self.width as usize;
        let height = self.height as usize;
        let bar_width = (width / BAR_COLORS_BGR.len()).max(1);
        let sweep = (self.tick as usize * 4) % width.max(1);

        let mut data = Vec::with_capacity(width * height * 3);
        for _row in 0..height {
            for col in 0..width {
                if col.abs_diff(sweep) < 3 {
                    data.extend_from_slice(&[255, 255, 255]);
                } else {
                    let bar = (col / bar_width).min(BAR_COLORS_BGR.len() - 1);
                    data.extend_from_slice(&BAR_COLORS_BGR[bar]);
                }
            }
        }
        data
    }
}

impl VideoSource for PatternSource {
    fn is_open(&self) -> bool {
        self.open
    }

    fn read_frame(&mut self) -> Option<Frame> {
        if !self.open {
            return None;
        }
        let data = self.compose();
        self.tick = self.tick.wrapping_add(1);
        Frame::new(self.width, self.height, ChannelOrder::Bgr, data).ok()
    }

    fn release(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_frames_have_full_size() {
        let mut source = PatternSource::new(32, 8);
        let frame = source.read_frame().unwrap();
        assert_eq!(frame.data.len(), 32 * 8 * 3);
        assert_eq!(frame.order, ChannelOrder::Bgr);
    }

    #[test]
    fn released_pattern_stops_yielding() {
        let mut source = PatternSource::new(16, 16);
        source.release();
        assert!(!source.is_open());
        assert!(source.read_frame().is_none());
    }

    #[test]
    fn zero_size_pattern_never_opens() {
        assert!(!PatternSource::new(0, 10).is_open());
    }
}
