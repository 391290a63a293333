use geo_traits::{CoordTrait, RectTrait};

use crate::error::{RTreeError, Result};
use crate::geometry::Point;
use crate::r#type::CoordNum;

/// An axis-aligned bounding box in `D` dimensions.
///
/// A region of dimension 0 is the empty region. It is the identity of [`Region::union`], which
/// lets a node start without a shape and grow from its first entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Region<N: CoordNum> {
    low: Vec<N>,
    high: Vec<N>,
}

impl<N: CoordNum> Region<N> {
    /// Create a region from its lower and upper corners.
    ///
    /// Both corners must have the same number of coordinates. `low[i] <= high[i]` is not
    /// enforced here; see [`Region::is_valid`].
    pub fn new(low: impl Into<Vec<N>>, high: impl Into<Vec<N>>) -> Result<Self> {
        let low = low.into();
        let high = high.into();
        if low.len() != high.len() {
            return Err(RTreeError::InvalidArgument(format!(
                "Corners must have the same dimension, got {} and {}.",
                low.len(),
                high.len()
            )));
        }
        Ok(Self { low, high })
    }

    /// The empty region, with dimension 0.
    pub fn empty() -> Self {
        Self {
            low: vec![],
            high: vec![],
        }
    }

    /// Create a region spanning two corner points.
    pub fn from_points(low: &Point<N>, high: &Point<N>) -> Result<Self> {
        if low.dimension() != high.dimension() {
            return Err(RTreeError::InvalidArgument(
                "Points must have the same dimension".to_string(),
            ));
        }
        Ok(Self {
            low: low.coords().to_vec(),
            high: high.coords().to_vec(),
        })
    }

    /// The zero-volume region located at `point`.
    pub fn from_point(point: &Point<N>) -> Self {
        Self {
            low: point.coords().to_vec(),
            high: point.coords().to_vec(),
        }
    }

    /// Create a two-dimensional region from any [`RectTrait`] implementation.
    pub fn from_rect(rect: &impl RectTrait<T = N>) -> Self {
        let min = rect.min();
        let max = rect.max();
        Self {
            low: vec![min.x(), min.y()],
            high: vec![max.x(), max.y()],
        }
    }

    pub fn dimension(&self) -> usize {
        self.low.len()
    }

    /// Returns `true` for the dimension-0 region.
    pub fn is_empty(&self) -> bool {
        self.low.is_empty()
    }

    /// Returns `true` if `low[i] <= high[i]` on every axis.
    pub fn is_valid(&self) -> bool {
        self.low.iter().zip(&self.high).all(|(lo, hi)| lo <= hi)
    }

    /// The lower bound along axis `index`.
    pub fn low(&self, index: usize) -> Result<N> {
        self.low.get(index).copied().ok_or(RTreeError::OutOfRange {
            index,
            dimension: self.dimension(),
        })
    }

    /// The upper bound along axis `index`.
    pub fn high(&self, index: usize) -> Result<N> {
        self.high.get(index).copied().ok_or(RTreeError::OutOfRange {
            index,
            dimension: self.dimension(),
        })
    }

    pub fn lows(&self) -> &[N] {
        &self.low
    }

    pub fn highs(&self) -> &[N] {
        &self.high
    }

    /// Returns `true` if the two regions share at least one point. Touching boundaries count.
    ///
    /// Regions of different dimensions never intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        if self.dimension() != other.dimension() {
            return false;
        }
        (0..self.dimension()).all(|i| self.low[i] <= other.high[i] && self.high[i] >= other.low[i])
    }

    /// Returns `true` if `other` lies entirely within this region.
    pub fn contains(&self, other: &Self) -> bool {
        if self.dimension() != other.dimension() {
            return false;
        }
        (0..self.dimension()).all(|i| self.low[i] <= other.low[i] && self.high[i] >= other.high[i])
    }

    /// Returns `true` if `point` lies within this region or on its boundary.
    pub fn contains_point(&self, point: &Point<N>) -> bool {
        if self.dimension() != point.dimension() {
            return false;
        }
        point
            .coords()
            .iter()
            .enumerate()
            .all(|(i, &c)| c >= self.low[i] && c <= self.high[i])
    }

    /// Product of the side lengths. The empty region has zero area.
    pub fn area(&self) -> N {
        if self.is_empty() {
            return N::zero();
        }
        self.sides().fold(N::one(), |area, side| area * side)
    }

    /// Sum of all edge lengths: each side length is counted twice, for opposite edges.
    pub fn margin(&self) -> N {
        self.sides().fold(N::zero(), |margin, side| margin + side) * N::two()
    }

    /// Euclidean distance from this region to `point`. Axes where the point already falls
    /// between the bounds contribute nothing.
    pub fn min_distance_to_point(&self, point: &Point<N>) -> Result<N> {
        if self.dimension() != point.dimension() {
            return Err(RTreeError::dimension_mismatch(
                self.dimension(),
                point.dimension(),
            ));
        }
        let sum = point
            .coords()
            .iter()
            .enumerate()
            .fold(N::zero(), |sum, (i, &c)| {
                let d = axis_dist(c, self.low[i], self.high[i]);
                sum + d * d
            });
        Ok(sum.sqrt())
    }

    /// Euclidean distance between the closest points of two regions.
    pub fn min_distance(&self, other: &Self) -> Result<N> {
        if self.dimension() != other.dimension() {
            return Err(RTreeError::dimension_mismatch(
                self.dimension(),
                other.dimension(),
            ));
        }
        let mut sum = N::zero();
        for i in 0..self.dimension() {
            let d = if self.high[i] < other.low[i] {
                other.low[i] - self.high[i]
            } else if self.low[i] > other.high[i] {
                self.low[i] - other.high[i]
            } else {
                N::zero()
            };
            sum = sum + d * d;
        }
        Ok(sum.sqrt())
    }

    /// Grow this region in place to also cover `other`.
    ///
    /// Combining with the empty region is a no-op, and combining into the empty region takes
    /// on `other`'s shape.
    pub fn combine(&mut self, other: &Self) -> Result<()> {
        if !self.is_empty() && !other.is_empty() && self.dimension() != other.dimension() {
            return Err(RTreeError::dimension_mismatch(
                self.dimension(),
                other.dimension(),
            ));
        }
        self.expand(other);
        Ok(())
    }

    /// Grow this region in place to also cover `point`.
    pub fn combine_point(&mut self, point: &Point<N>) -> Result<()> {
        if self.is_empty() {
            *self = Self::from_point(point);
            return Ok(());
        }
        if self.dimension() != point.dimension() {
            return Err(RTreeError::dimension_mismatch(
                self.dimension(),
                point.dimension(),
            ));
        }
        for (i, &c) in point.coords().iter().enumerate() {
            self.low[i] = self.low[i].min(c);
            self.high[i] = self.high[i].max(c);
        }
        Ok(())
    }

    /// The smallest region covering both `self` and `other`.
    pub fn union(&self, other: &Self) -> Result<Self> {
        let mut out = self.clone();
        out.combine(other)?;
        Ok(out)
    }

    /// The center of the region on every axis.
    pub fn center(&self) -> Vec<N> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(&lo, &hi)| (lo + hi) / N::two())
            .collect()
    }

    /// Volume shared by the two regions: the product of the positive overlap extents, or zero
    /// if they are disjoint or only touch along some axis.
    pub fn overlap_area(&self, other: &Self) -> N {
        if self.is_empty() || !self.intersects(other) {
            return N::zero();
        }
        let mut overlap = N::one();
        for i in 0..self.dimension() {
            let lo = self.low[i].max(other.low[i]);
            let hi = self.high[i].min(other.high[i]);
            if lo >= hi {
                return N::zero();
            }
            overlap = overlap * (hi - lo);
        }
        overlap
    }

    /// How much this region's area would grow if it were extended to cover `other`.
    pub fn enlargement(&self, other: &Self) -> N {
        let mut combined = self.clone();
        combined.expand(other);
        combined.area() - self.area()
    }

    /// Infallible union used inside the tree, where every region shares the tree's dimension.
    pub(crate) fn expand(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            self.clone_from(other);
            return;
        }
        for i in 0..self.dimension().min(other.dimension()) {
            self.low[i] = self.low[i].min(other.low[i]);
            self.high[i] = self.high[i].max(other.high[i]);
        }
    }

    /// The union of every region yielded by `regions`, or the empty region.
    pub(crate) fn union_all<'a>(regions: impl IntoIterator<Item = &'a Self>) -> Self
    where
        N: 'a,
    {
        let mut out = Self::empty();
        for region in regions {
            out.expand(region);
        }
        out
    }

    fn sides(&self) -> impl Iterator<Item = N> + '_ {
        self.low.iter().zip(&self.high).map(|(&lo, &hi)| hi - lo)
    }
}

/// 1D distance from a value to a range.
#[inline]
fn axis_dist<N: CoordNum>(k: N, min: N, max: N) -> N {
    if k < min {
        min - k
    } else if k <= max {
        N::zero()
    } else {
        k - max
    }
}
