use crate::model::SampleOrigin;

/// Per-loop counters surfaced on the console status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopMetrics {
    pub video_ticks: u64,
    pub frames_rendered: u64,
    pub frames_skipped: u64,
    pub detection_errors: u64,
    pub data_ticks: u64,
    pub live_samples: u64,
    pub stale_samples: u64,
    pub demo_samples: u64,
}

impl LoopMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self) {
        self.video_ticks += 1;
        self.frames_rendered += 1;
    }

    pub fn record_skip(&mut self) {
        self.video_ticks += 1;
        self.frames_skipped += 1;
    }

    pub fn record_detection_error(&mut self) {
        self.detection_errors += 1;
    }

    pub fn record_sample(&mut self, origin: SampleOrigin) {
        self.data_ticks += 1;
        match origin {
            SampleOrigin::Live => self.live_samples += 1,
            SampleOrigin::Stale => self.stale_samples += 1,
            SampleOrigin::Demo => self.demo_samples += 1,
        }
    }

    /// Merges counters from the two loops, which each own a copy.
    pub fn merged(&self, other: &LoopMetrics) -> LoopMetrics {
        LoopMetrics {
            video_ticks: self.video_ticks + other.video_ticks,
            frames_rendered: self.frames_rendered + other.frames_rendered,
            frames_skipped: self.frames_skipped + other.frames_skipped,
            detection_errors: self.detection_errors + other.detection_errors,
            data_ticks: self.data_ticks + other.data_ticks,
            live_samples: self.live_samples + other.live_samples,
            stale_samples: self.stale_samples + other.stale_samples,
            demo_samples: self.demo_samples + other.demo_samples,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "frames {} / skipped {} / det errors {} | telemetry live {} stale {} demo {}",
            self.frames_rendered,
            self.frames_skipped,
            self.detection_errors,
            self.live_samples,
            self.stale_samples,
            self.demo_samples
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_sums_both_loops() {
        let mut video = LoopMetrics::new();
        video.record_frame();
        video.record_skip();
        let mut data = LoopMetrics::new();
        data.record_sample(SampleOrigin::Demo);

        let total = video.merged(&data);
        assert_eq!(total.video_ticks, 2);
        assert_eq!(total.frames_skipped, 1);
        assert_eq!(total.demo_samples, 1);
    }
}
