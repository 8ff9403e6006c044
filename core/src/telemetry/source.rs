use crate::config::{DemoRange, TelemetryConfig};
use crate::diagnostics::LogManager;
use crate::link::{LinkMessage, VehicleLink};
use crate::model::{FlightMode, SampleOrigin, TelemetrySample};
use crate::prelude::GcsResult;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Current-sample provider for the slow loop: live link when connected,
/// synthesized demo values otherwise.
pub struct TelemetrySource {
    link: Option<Box<dyn VehicleLink>>,
    current: TelemetrySample,
    origin: SampleOrigin,
    altitude: DemoRange,
    speed: DemoRange,
    battery: DemoRange,
    rng: StdRng,
    logger: LogManager,
}

impl TelemetrySource {
    pub fn demo(config: &TelemetryConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            link: None,
            current: TelemetrySample::default(),
            origin: SampleOrigin::Demo,
            altitude: config.demo_altitude,
            speed: config.demo_speed,
            battery: config.demo_battery,
            rng,
            logger: LogManager::new("telemetry"),
        }
    }

    pub fn live(link: Box<dyn VehicleLink>, config: &TelemetryConfig) -> Self {
        Self {
            link: Some(link),
            origin: SampleOrigin::Stale,
            ..Self::demo(config)
        }
    }

    /// Makes the single startup connection attempt; any failure falls back to
    /// demo telemetry for the rest of the session.
    pub fn establish<F>(connector: F, config: &TelemetryConfig) -> Self
    where
        F: FnOnce() -> GcsResult<Box<dyn VehicleLink>>,
    {
        match connector() {
            Ok(link) => Self::live(link, config),
            Err(err) => {
                let source = Self::demo(config);
                source
                    .logger
                    .warn(&format!("{}; using demo telemetry", err));
                source
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    pub fn current(&self) -> TelemetrySample {
        self.current
    }

    pub fn last_origin(&self) -> SampleOrigin {
        self.origin
    }

    pub fn poll(&mut self) -> TelemetrySample {
        let Some(link) = self.link.as_mut() else {
            self.current = TelemetrySample {
                altitude_m: sample(&mut self.rng, self.altitude),
                speed_mps: sample(&mut self.rng, self.speed),
                battery_percent: sample(&mut self.rng, self.battery),
                heading_deg: None,
                mode: FlightMode::AutoSearch,
            };
            self.origin = SampleOrigin::Demo;
            return self.current;
        };

        let mut updated = false;
        while let Some(message) = link.try_recv() {
            updated = true;
            match message {
                LinkMessage::Hud {
                    altitude_m,
                    groundspeed_mps,
                    heading_deg,
                } => {
                    self.current.altitude_m = altitude_m;
                    self.current.speed_mps = groundspeed_mps;
                    self.current.heading_deg = Some(heading_deg);
                }
                LinkMessage::Battery { remaining_percent } => {
                    if let Some(percent) = remaining_percent {
                        self.current.battery_percent = percent;
                    }
                }
                LinkMessage::Heartbeat { armed } => {
                    self.current.mode = if armed {
                        FlightMode::Armed
                    } else {
                        FlightMode::Standby
                    };
                }
            }
        }
        self.origin = if updated {
            SampleOrigin::Live
        } else {
            SampleOrigin::Stale
        };
        self.current
    }

    /// Closes the vehicle link, if any.
    pub fn close(&mut self) {
        if let Some(link) = self.link.as_mut() {
            link.close();
            self.logger.record("vehicle link released");
        }
    }
}

fn sample(rng: &mut StdRng, range: DemoRange) -> f32 {
    if range.min < range.max {
        rng.gen_range(range.as_range())
    } else {
        range.min
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::prelude::GcsError;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// In-memory link fed from a queue; tracks `close` calls.
    pub(crate) struct QueueLink {
        pub queue: VecDeque<LinkMessage>,
        pub closes: Rc<Cell<usize>>,
    }

    impl VehicleLink for QueueLink {
        fn try_recv(&mut self) -> Option<LinkMessage> {
            self.queue.pop_front()
        }

        fn close(&mut self) {
            self.closes.set(self.closes.get() + 1);
        }
    }

    fn seeded() -> TelemetryConfig {
        TelemetryConfig {
            seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn demo_samples_stay_in_documented_ranges() {
        let mut source = TelemetrySource::demo(&seeded());
        for _ in 0..500 {
            let sample = source.poll();
            assert!((50.0..60.0).contains(&sample.altitude_m));
            assert!((15.0..20.0).contains(&sample.speed_mps));
            assert!((80.0..85.0).contains(&sample.battery_percent));
            assert_eq!(sample.mode, FlightMode::AutoSearch);
            assert_eq!(source.last_origin(), SampleOrigin::Demo);
        }
    }

    #[test]
    fn idle_link_returns_previous_sample_unchanged() {
        let mut queue = VecDeque::new();
        queue.push_back(LinkMessage::Hud {
            altitude_m: 88.0,
            groundspeed_mps: 21.5,
            heading_deg: 90.0,
        });
        let link = QueueLink {
            queue,
            closes: Rc::new(Cell::new(0)),
        };
        let mut source = TelemetrySource::live(Box::new(link), &seeded());

        let first = source.poll();
        assert_eq!(source.last_origin(), SampleOrigin::Live);
        assert_eq!(first.altitude_m, 88.0);

        let second = source.poll();
        assert_eq!(second, first);
        assert_eq!(source.last_origin(), SampleOrigin::Stale);
        assert_eq!(source.poll(), first);
    }

    #[test]
    fn battery_and_mode_come_from_link() {
        let queue = VecDeque::from(vec![
            LinkMessage::Battery {
                remaining_percent: Some(64.0),
            },
            LinkMessage::Heartbeat { armed: true },
            LinkMessage::Battery {
                remaining_percent: None,
            },
        ]);
        let link = QueueLink {
            queue,
            closes: Rc::new(Cell::new(0)),
        };
        let mut source = TelemetrySource::live(Box::new(link), &seeded());
        let sample = source.poll();
        assert_eq!(sample.battery_percent, 64.0);
        assert_eq!(sample.mode, FlightMode::Armed);
    }

    #[test]
    fn failed_connection_falls_back_to_demo() {
        let mut source = TelemetrySource::establish(
            || Err(GcsError::ConnectionFailure("refused".into())),
            &seeded(),
        );
        assert!(!source.is_connected());
        assert_eq!(source.poll().mode, FlightMode::AutoSearch);
    }

    #[test]
    fn close_reaches_the_link() {
        let closes = Rc::new(Cell::new(0));
        let link = QueueLink {
            queue: VecDeque::new(),
            closes: closes.clone(),
        };
        let mut source = TelemetrySource::live(Box::new(link), &seeded());
        source.close();
        assert_eq!(closes.get(), 1);
    }
}
