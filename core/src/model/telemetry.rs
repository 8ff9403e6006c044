use serde::{Deserialize, Serialize};

/// Flight mode shown on the mode label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum FlightMode {
    #[default]
    Standby,
    AutoSearch,
    Armed,
}

impl FlightMode {
    pub fn label(&self) -> &'static str {
        match self {
            FlightMode::Standby => "STANDBY",
            FlightMode::AutoSearch => "AUTO SEARCH",
            FlightMode::Armed => "ARMED",
        }
    }
}

/// Most recently known flight state. Overwritten every slow tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TelemetrySample {
    pub altitude_m: f32,
    pub speed_mps: f32,
    pub battery_percent: f32,
    pub heading_deg: Option<f32>,
    pub mode: FlightMode,
}

/// Where the current sample came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOrigin {
    Live,
    Stale,
    Demo,
}
