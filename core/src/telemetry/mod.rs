pub mod source;

pub use source::TelemetrySource;
