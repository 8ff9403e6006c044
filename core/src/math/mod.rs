pub mod geometry;

pub use geometry::{GeometryHelper, Point2};
