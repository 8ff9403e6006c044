use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Parameters of the synthetic take-off and orbit flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightProfile {
    pub cruise_altitude_m: f32,
    pub climb_rate_mps: f32,
    pub cruise_speed_mps: f32,
    pub acceleration_mps2: f32,
    pub turn_rate_dps: f32,
    pub battery_start_percent: f32,
    pub battery_drain_per_s: f32,
    pub arm_after_s: f32,
    pub noise: f32,
    pub seed: u64,
}

impl Default for FlightProfile {
    fn default() -> Self {
        Self {
            cruise_altitude_m: 55.0,
            climb_rate_mps: 3.0,
            cruise_speed_mps: 17.0,
            acceleration_mps2: 2.0,
            turn_rate_dps: 6.0,
            battery_start_percent: 95.0,
            battery_drain_per_s: 0.05,
            arm_after_s: 2.0,
            noise: 0.3,
            seed: 0,
        }
    }
}

impl FlightProfile {
    /// Rates and limits are magnitudes; non-finite entries fall back to the
    /// defaults.
    pub fn normalized(mut self) -> Self {
        let defaults = FlightProfile::default();
        let magnitude = |value: f32, fallback: f32| {
            if value.is_finite() {
                value.abs()
            } else {
                fallback
            }
        };
        self.climb_rate_mps = magnitude(self.climb_rate_mps, defaults.climb_rate_mps);
        self.acceleration_mps2 = magnitude(self.acceleration_mps2, defaults.acceleration_mps2);
        self.battery_drain_per_s = magnitude(self.battery_drain_per_s, defaults.battery_drain_per_s);
        self.noise = magnitude(self.noise, defaults.noise);
        if !self.cruise_altitude_m.is_finite() {
            self.cruise_altitude_m = defaults.cruise_altitude_m;
        }
        if !self.cruise_speed_mps.is_finite() {
            self.cruise_speed_mps = defaults.cruise_speed_mps;
        }
        if !self.turn_rate_dps.is_finite() {
            self.turn_rate_dps = defaults.turn_rate_dps;
        }
        self
    }
}

/// Snapshot of the simulated vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VehicleState {
    pub time_s: f32,
    pub armed: bool,
    pub altitude_m: f32,
    pub groundspeed_mps: f32,
    pub climb_mps: f32,
    pub heading_deg: f32,
    pub battery_percent: f32,
}

pub struct FlightGenerator {
    profile: FlightProfile,
    state: VehicleState,
    rng: StdRng,
}

impl FlightGenerator {
    pub fn new(profile: FlightProfile) -> Self {
        let profile = profile.normalized();
        let rng = StdRng::seed_from_u64(profile.seed);
        let state = VehicleState {
            time_s: 0.0,
            armed: false,
            altitude_m: 0.0,
            groundspeed_mps: 0.0,
            climb_mps: 0.0,
            heading_deg: 0.0,
            battery_percent: profile.battery_start_percent.clamp(0.0, 100.0),
        };
        Self {
            profile,
            state,
            rng,
        }
    }

    pub fn state(&self) -> VehicleState {
        self.state
    }

    /// Advances the flight by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> VehicleState {
        let profile = &self.profile;
        let mut next = self.state;
        next.time_s += dt;
        next.armed = next.time_s >= profile.arm_after_s;
        next.battery_percent = (next.battery_percent - profile.battery_drain_per_s * dt).max(0.0);

        if next.armed {
            let remaining = profile.cruise_altitude_m - next.altitude_m;
            let climb = remaining.clamp(-profile.climb_rate_mps * dt, profile.climb_rate_mps * dt);
            next.altitude_m += climb;
            next.climb_mps = if dt > 0.0 { climb / dt } else { 0.0 };

            if next.altitude_m >= profile.cruise_altitude_m * 0.5 {
                let delta = profile.cruise_speed_mps - next.groundspeed_mps;
                let limit = profile.acceleration_mps2 * dt;
                next.groundspeed_mps += delta.clamp(-limit, limit);
                next.heading_deg = (next.heading_deg + profile.turn_rate_dps * dt).rem_euclid(360.0);
            }
        }
        self.state = next;

        let mut reported = next;
        if profile.noise > 0.0 && next.armed {
            reported.altitude_m += self.rng.gen_range(-profile.noise..profile.noise);
            reported.groundspeed_mps =
                (reported.groundspeed_mps + self.rng.gen_range(-profile.noise..profile.noise)).max(0.0);
        }
        reported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> FlightProfile {
        FlightProfile {
            noise: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn negative_limits_are_treated_as_magnitudes() {
        let mut generator = FlightGenerator::new(FlightProfile {
            climb_rate_mps: -3.0,
            acceleration_mps2: -2.0,
            noise: f32::INFINITY,
            arm_after_s: 0.0,
            ..Default::default()
        });
        let state = generator.step(1.0);
        assert!(state.armed);
        assert!(state.altitude_m.is_finite());
        assert!(generator.state().altitude_m <= 3.0);
    }

    #[test]
    fn vehicle_stays_grounded_until_armed() {
        let mut generator = FlightGenerator::new(quiet());
        let state = generator.step(1.0);
        assert!(!state.armed);
        assert_eq!(state.altitude_m, 0.0);
    }

    #[test]
    fn vehicle_reaches_cruise_altitude_and_speed() {
        let mut generator = FlightGenerator::new(quiet());
        let mut state = generator.state();
        for _ in 0..600 {
            state = generator.step(0.1);
        }
        assert!(state.armed);
        assert!((state.altitude_m - 55.0).abs() < 1e-3);
        assert!((state.groundspeed_mps - 17.0).abs() < 1e-3);
        assert!(state.heading_deg < 360.0);
    }

    #[test]
    fn battery_never_goes_negative() {
        let mut generator = FlightGenerator::new(FlightProfile {
            battery_start_percent: 1.0,
            battery_drain_per_s: 10.0,
            ..quiet()
        });
        assert_eq!(generator.step(5.0).battery_percent, 0.0);
    }
}
