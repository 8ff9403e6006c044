use crate::generator::messages::vehicle_messages;
use crate::generator::profile::{FlightGenerator, VehicleState};
use crate::workflow::config::SimulatorConfig;
use anyhow::Context;
use log::{info, warn};
use mavlink::common::MavMessage;
use mavlink::{MavConnection, MavHeader};
use std::io::Write;
use std::time::Duration;
use tokio::time;

const SYSTEM_ID: u8 = 1;
const COMPONENT_ID: u8 = 1;

#[derive(Clone)]
pub struct Runner {
    config: SimulatorConfig,
}

impl Runner {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Steps the flight `steps` times and writes each snapshot as a JSON line.
    pub fn offline<W: Write>(&self, steps: usize, out: &mut W) -> anyhow::Result<Vec<VehicleState>> {
        let dt = self.config.step_seconds();
        let mut generator = FlightGenerator::new(self.config.profile.clone());
        let mut states = Vec::with_capacity(steps);
        for _ in 0..steps {
            let state = generator.step(dt);
            let line = serde_json::to_string(&state).context("serializing vehicle state")?;
            writeln!(out, "{}", line).context("writing offline report")?;
            states.push(state);
        }
        Ok(states)
    }

    /// Transmits the flight at the configured rate until Ctrl+C.
    pub async fn serve(&self) -> anyhow::Result<()> {
        let connection = mavlink::connect::<MavMessage>(&self.config.endpoint)
            .with_context(|| format!("opening {}", self.config.endpoint))?;
        info!("transmitting on {}", self.config.endpoint);

        let dt = self.config.step_seconds();
        let mut generator = FlightGenerator::new(self.config.profile.clone());
        let mut ticker = time::interval(Duration::from_secs_f32(dt));
        let mut sequence: u8 = 0;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let state = generator.step(dt);
                    for message in vehicle_messages(&state) {
                        let header = MavHeader {
                            system_id: SYSTEM_ID,
                            component_id: COMPONENT_ID,
                            sequence,
                        };
                        sequence = sequence.wrapping_add(1);
                        if let Err(err) = connection.send(&header, &message) {
                            warn!("send failed: {}", err);
                        }
                    }
                    if state.time_s.fract() < dt {
                        info!(
                            "t={:.0}s alt {:.1} m, speed {:.1} m/s, battery {:.0}%",
                            state.time_s, state.altitude_m, state.groundspeed_mps, state.battery_percent
                        );
                    }
                }
                signal = tokio::signal::ctrl_c() => {
                    signal.context("awaiting Ctrl+C to exit")?;
                    info!("stopping transmission");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_run_emits_one_line_per_step() {
        let runner = Runner::new(SimulatorConfig::default());
        let mut out = Vec::new();
        let states = runner.offline(25, &mut out).unwrap();
        assert_eq!(states.len(), 25);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 25);
        assert!(text.lines().next().unwrap().contains("\"altitude_m\""));
    }
}
