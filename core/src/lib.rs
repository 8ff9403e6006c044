//! Core of the Rust VTOL ground station: the two refresh loops, radar and
//! video-overlay rendering, and the vehicle telemetry source.
//!
//! Detection, capture and the vehicle link are external collaborators hidden
//! behind traits so each tick can be exercised without hardware.

pub mod config;
pub mod detection;
pub mod diagnostics;
pub mod link;
pub mod math;
pub mod model;
pub mod prelude;
pub mod render;
pub mod session;
pub mod telemetry;
pub mod video;

pub use prelude::{ChannelOrder, Frame, GcsError, GcsResult};
pub use session::{DataLoop, DataViewState, VideoLoop, VideoViewState};
