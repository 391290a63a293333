#![doc = include_str!("../README.md")]

mod error;
pub mod geometry;
pub mod rtree;
mod r#type;

pub use error::{RTreeError, Result};
pub use r#type::CoordNum;

#[cfg(test)]
pub(crate) mod test;
