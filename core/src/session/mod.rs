//! The two independent refresh loops. Each tick is a function from the loop's
//! own inputs to an immutable view-state value; nothing is shared between
//! them.

pub mod data_loop;
pub mod video_loop;

pub use data_loop::{DataLoop, DataViewState};
pub use video_loop::{VideoLoop, VideoViewState};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DemoRange, GcsConfig};
    use crate::detection::{NullEngine, ScriptedEngine};
    use crate::link::{LinkMessage, VehicleLink};
    use crate::model::{BoundingBox, Detection, FlightMode, SampleOrigin};
    use crate::prelude::{ChannelOrder, Frame, GcsError};
    use crate::render::OverlayRenderer;
    use crate::telemetry::source::tests::QueueLink;
    use crate::video::{ClosedSource, PatternSource, VideoSource};
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    struct CountingSource {
        releases: Rc<Cell<usize>>,
    }

    impl VideoSource for CountingSource {
        fn is_open(&self) -> bool {
            true
        }

        fn read_frame(&mut self) -> Option<Frame> {
            Frame::new(4, 4, ChannelOrder::Bgr, vec![0; 48]).ok()
        }

        fn release(&mut self) {
            self.releases.set(self.releases.get() + 1);
        }
    }

    /// Open device that delivers a frame only on the listed reads.
    struct FlakySource {
        reads: usize,
        delivers: Vec<bool>,
    }

    impl VideoSource for FlakySource {
        fn is_open(&self) -> bool {
            true
        }

        fn read_frame(&mut self) -> Option<Frame> {
            let ok = self.delivers.get(self.reads).copied().unwrap_or(false);
            self.reads += 1;
            if ok {
                Frame::new(4, 4, ChannelOrder::Bgr, vec![0; 48]).ok()
            } else {
                None
            }
        }

        fn release(&mut self) {}
    }

    struct FailingEngine;

    impl crate::detection::DetectionEngine for FailingEngine {
        fn detect(&mut self, _frame: &Frame) -> crate::prelude::GcsResult<Vec<Detection>> {
            Err(GcsError::Detection("model crashed".into()))
        }
    }

    fn seeded_config() -> GcsConfig {
        let mut config = GcsConfig::default();
        config.telemetry.seed = Some(9);
        config
    }

    #[test]
    fn video_never_opening_keeps_placeholder() {
        let mut fast = VideoLoop::new(
            Box::new(ClosedSource),
            Box::new(NullEngine),
            OverlayRenderer::new(0.4),
        );
        for _ in 0..100 {
            assert!(fast.tick().is_none());
        }
        assert_eq!(fast.metrics().frames_skipped, 100);
        assert_eq!(fast.metrics().frames_rendered, 0);
    }

    #[test]
    fn failed_read_on_open_source_skips_tick() {
        let mut fast = VideoLoop::new(
            Box::new(FlakySource {
                reads: 0,
                delivers: vec![true, false, false, true],
            }),
            Box::new(NullEngine),
            OverlayRenderer::new(0.4),
        );
        assert!(fast.tick().is_some());
        assert!(fast.tick().is_none());
        assert!(fast.tick().is_none());
        assert_eq!(fast.metrics().frames_skipped, 2);
        assert!(fast.tick().is_some());
        assert_eq!(fast.metrics().frames_rendered, 2);
    }

    #[test]
    fn pattern_feed_renders_scripted_overlays() {
        let mut fast = VideoLoop::new(
            Box::new(PatternSource::new(64, 48)),
            Box::new(ScriptedEngine::new(vec![vec![
                Detection::new(BoundingBox::new(4.0, 20.0, 20.0, 40.0), "person", 0.9),
                Detection::new(BoundingBox::new(30.0, 20.0, 40.0, 40.0), "kite", 0.3),
            ]])),
            OverlayRenderer::new(0.4),
        );
        let view = fast.tick().unwrap();
        assert_eq!(view.detections_seen, 2);
        assert_eq!(view.frame.boxes.len(), 1);
        assert_eq!(view.frame.rgba.len(), 64 * 48 * 4);
    }

    #[test]
    fn detection_failure_still_shows_frame() {
        let mut fast = VideoLoop::new(
            Box::new(PatternSource::new(8, 8)),
            Box::new(FailingEngine),
            OverlayRenderer::new(0.4),
        );
        let view = fast.tick().unwrap();
        assert!(view.frame.boxes.is_empty());
        assert_eq!(fast.metrics().detection_errors, 1);
    }

    #[test]
    fn video_source_released_exactly_once() {
        let releases = Rc::new(Cell::new(0));
        {
            let mut fast = VideoLoop::new(
                Box::new(CountingSource {
                    releases: releases.clone(),
                }),
                Box::new(NullEngine),
                OverlayRenderer::new(0.4),
            );
            assert!(fast.tick().is_some());
            fast.release();
            fast.release();
            assert!(fast.tick().is_none());
        }
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn failed_connection_keeps_demo_state_every_tick() {
        let config = seeded_config();
        let mut slow = DataLoop::connect(
            || Err(GcsError::ConnectionFailure("no vehicle".into())),
            &config,
        );
        assert!(!slow.is_connected());
        let altitude = DemoRange::new(50.0, 60.0);
        let speed = DemoRange::new(15.0, 20.0);
        let battery = DemoRange::new(80.0, 85.0);
        for _ in 0..200 {
            let view = slow.tick();
            assert_eq!(view.mode_label, FlightMode::AutoSearch.label());
            assert_eq!(view.origin, SampleOrigin::Demo);
            assert!(altitude.contains(view.altitude.value));
            assert!(speed.contains(view.speed.value));
            assert!(battery.contains(view.battery.value));
            for (range, reading) in [
                (altitude, &view.altitude),
                (speed, &view.speed),
                (battery, &view.battery),
            ] {
                let shown: f32 = reading.text().parse().unwrap();
                assert!(range.contains(shown), "{} shows {}", reading.title, shown);
            }
        }
    }

    #[test]
    fn yaw_advances_two_degrees_and_wraps() {
        let mut slow = DataLoop::connect(
            || Err(GcsError::ConnectionFailure("no vehicle".into())),
            &seeded_config(),
        );
        let mut previous = slow.initial().heading.degrees();
        for _ in 0..400 {
            let heading = slow.tick().heading.degrees();
            assert!(heading < 360.0);
            assert_eq!(heading, (previous + 2.0) % 360.0);
            previous = heading;
        }
    }

    #[test]
    fn live_values_outside_gauge_range_are_clamped() {
        let queue = VecDeque::from(vec![
            LinkMessage::Hud {
                altitude_m: 480.0,
                groundspeed_mps: -3.0,
                heading_deg: 10.0,
            },
            LinkMessage::Battery {
                remaining_percent: Some(100.0),
            },
        ]);
        let closes = Rc::new(Cell::new(0));
        let link = QueueLink {
            queue,
            closes: closes.clone(),
        };
        let mut slow = DataLoop::connect(
            move || Ok(Box::new(link) as Box<dyn VehicleLink>),
            &seeded_config(),
        );
        let view = slow.tick();
        assert_eq!(view.origin, SampleOrigin::Live);
        assert_eq!(view.altitude.value, 150.0);
        assert_eq!(view.speed.value, 0.0);
        assert_eq!(view.battery.value, 100.0);
        assert_eq!(view.mode_label, "STANDBY");

        let stale = slow.tick();
        assert_eq!(stale.origin, SampleOrigin::Stale);
        assert_eq!(stale.sample, view.sample);

        slow.close();
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn disabled_link_skips_connection_attempt() {
        let mut config = seeded_config();
        config.link.enabled = false;
        let attempted = Cell::new(false);
        let slow = DataLoop::connect(
            || {
                attempted.set(true);
                Err(GcsError::ConnectionFailure("unused".into()))
            },
            &config,
        );
        assert!(!attempted.get());
        assert!(!slow.is_connected());
    }
}
