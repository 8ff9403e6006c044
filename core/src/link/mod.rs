//! Vehicle telemetry link consumed by the slow refresh loop.

pub mod mav;

pub use mav::MavlinkLink;

/// Flight-state message translated out of the wire protocol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkMessage {
    Hud {
        altitude_m: f32,
        groundspeed_mps: f32,
        heading_deg: f32,
    },
    /// `None` when the vehicle reports its remaining charge as unknown.
    Battery { remaining_percent: Option<f32> },
    Heartbeat { armed: bool },
}

/// Live connection to one vehicle.
pub trait VehicleLink {
    /// Next pending message, without blocking.
    fn try_recv(&mut self) -> Option<LinkMessage>;
    /// Stops receiving. Safe to call more than once.
    fn close(&mut self);
}
