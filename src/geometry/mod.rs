//! Geometric primitives: points and axis-aligned regions.

mod point;
mod region;

pub use point::Point;
pub use region::Region;
