use crate::config::GcsConfig;
use crate::diagnostics::LoopMetrics;
use crate::link::VehicleLink;
use crate::model::{SampleOrigin, TelemetrySample};
use crate::prelude::GcsResult;
use crate::render::{Gauge, GaugeReading, Heading};
use crate::telemetry::TelemetrySource;

/// What the radar, gauges and mode label show after one slow tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DataViewState {
    pub heading: Heading,
    pub sample: TelemetrySample,
    pub origin: SampleOrigin,
    pub altitude: GaugeReading,
    pub speed: GaugeReading,
    pub battery: GaugeReading,
    pub mode_label: &'static str,
}

/// Slow loop: advance yaw, poll telemetry, clamp gauges.
pub struct DataLoop {
    heading: Heading,
    yaw_step: f32,
    telemetry: TelemetrySource,
    altitude: Gauge,
    speed: Gauge,
    battery: Gauge,
    metrics: LoopMetrics,
}

impl DataLoop {
    pub fn new(telemetry: TelemetrySource, config: &GcsConfig) -> Self {
        Self {
            heading: Heading::default(),
            yaw_step: config.telemetry.yaw_step_deg,
            telemetry,
            altitude: Gauge::new("ALTITUDE (m)", config.gauges.altitude_max),
            speed: Gauge::new("SPEED (m/s)", config.gauges.speed_max),
            battery: Gauge::new("BATTERY (%)", config.gauges.battery_max),
            metrics: LoopMetrics::new(),
        }
    }

    /// Builds the loop after the one startup connection attempt.
    pub fn connect<F>(connector: F, config: &GcsConfig) -> Self
    where
        F: FnOnce() -> GcsResult<Box<dyn VehicleLink>>,
    {
        let telemetry = if config.link.enabled {
            TelemetrySource::establish(connector, &config.telemetry)
        } else {
            TelemetrySource::demo(&config.telemetry)
        };
        Self::new(telemetry, config)
    }

    /// View state before the first tick.
    pub fn initial(&self) -> DataViewState {
        self.view(self.telemetry.current(), self.telemetry.last_origin())
    }

    pub fn tick(&mut self) -> DataViewState {
        self.heading = self.heading.advance(self.yaw_step);
        let sample = self.telemetry.poll();
        let origin = self.telemetry.last_origin();
        self.metrics.record_sample(origin);
        self.view(sample, origin)
    }

    fn view(&self, sample: TelemetrySample, origin: SampleOrigin) -> DataViewState {
        DataViewState {
            heading: self.heading,
            sample,
            origin,
            altitude: self.altitude.reading(sample.altitude_m),
            speed: self.speed.reading(sample.speed_mps),
            battery: self.battery.reading(sample.battery_percent),
            mode_label: sample.mode.label(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.telemetry.is_connected()
    }

    pub fn close(&mut self) {
        self.telemetry.close();
    }

    pub fn metrics(&self) -> LoopMetrics {
        self.metrics
    }
}
