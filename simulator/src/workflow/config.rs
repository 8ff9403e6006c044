use crate::generator::profile::FlightProfile;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Fastest transmission step the runner will schedule.
const MIN_STEP_S: f32 = 0.001;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// MAVLink connection string the vehicle transmits on.
    pub endpoint: String,
    pub rate_hz: f32,
    pub profile: FlightProfile,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            endpoint: "udpout:127.0.0.1:14550".into(),
            rate_hz: 10.0,
            profile: FlightProfile::default(),
        }
    }
}

impl SimulatorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading simulator config {}", path_ref.display()))?;
        let config: SimulatorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing simulator config {}", path_ref.display()))?;
        Ok(config.normalized())
    }

    /// Makes the profile's limits usable by the generator.
    pub fn normalized(mut self) -> Self {
        self.profile = self.profile.normalized();
        self
    }

    pub fn from_args(endpoint: String, rate_hz: f32, seed: u64) -> Self {
        Self {
            endpoint,
            rate_hz,
            profile: FlightProfile {
                seed,
                ..Default::default()
            },
        }
    }

    /// Seconds between transmissions; non-positive or non-finite rates fall
    /// back to 1 Hz, and the step never drops below a millisecond.
    pub fn step_seconds(&self) -> f32 {
        if self.rate_hz.is_finite() && self.rate_hz > 0.0 {
            (1.0 / self.rate_hz).max(MIN_STEP_S)
        } else {
            1.0
        }
    }
}
