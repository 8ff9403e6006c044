pub mod detection;
pub mod telemetry;

pub use detection::{BoundingBox, Detection};
pub use telemetry::{FlightMode, SampleOrigin, TelemetrySample};
