use geo_traits::CoordTrait;

use crate::error::{RTreeError, Result};
use crate::r#type::CoordNum;

/// A location in `D`-dimensional space.
#[derive(Debug, Clone, PartialEq)]
pub struct Point<N: CoordNum> {
    coords: Vec<N>,
}

impl<N: CoordNum> Point<N> {
    /// Create a point from its coordinates. The dimension is the number of coordinates.
    pub fn new(coords: impl Into<Vec<N>>) -> Self {
        Self {
            coords: coords.into(),
        }
    }

    /// Create a two-dimensional point from any [`CoordTrait`] implementation.
    pub fn from_coord(coord: &impl CoordTrait<T = N>) -> Self {
        Self::new(vec![coord.x(), coord.y()])
    }

    pub fn dimension(&self) -> usize {
        self.coords.len()
    }

    /// The coordinate along axis `index`.
    pub fn coord(&self, index: usize) -> Result<N> {
        self.coords
            .get(index)
            .copied()
            .ok_or(RTreeError::OutOfRange {
                index,
                dimension: self.dimension(),
            })
    }

    pub fn coords(&self) -> &[N] {
        &self.coords
    }
}

impl<N: CoordNum> From<Vec<N>> for Point<N> {
    fn from(coords: Vec<N>) -> Self {
        Self::new(coords)
    }
}
