use std::marker::PhantomData;

use crate::error::{RTreeError, Result};
use crate::r#type::CoordNum;
use crate::rtree::index::RTree;
use crate::rtree::metrics::{MetricsSink, NoopMetrics};
use crate::rtree::split::SplitStrategy;

/// The default node capacity used by [`RTreeBuilder::new`]
pub const DEFAULT_NODE_CAPACITY: usize = 16;

/// The default fraction of an overflowing leaf that is evicted for forced reinsertion.
pub const DEFAULT_REINSERT_FRACTION: f64 = 0.3;

/// Smallest node capacity at which every overflowing node can be split.
pub const MIN_NODE_CAPACITY: usize = 3;

/// A builder to configure an empty [`RTree`].
///
/// ```
/// use dynamic_rtree::rtree::split::RStarSplit;
/// use dynamic_rtree::rtree::RTreeBuilder;
///
/// let tree = RTreeBuilder::<f64>::new(3)
///     .node_capacity(32)
///     .reinsert_fraction(0.25)
///     .build(RStarSplit)
///     .unwrap();
/// assert_eq!(tree.node_capacity(), 32);
/// ```
#[derive(Debug)]
pub struct RTreeBuilder<N: CoordNum> {
    dimension: usize,
    node_capacity: usize,
    reinsert_fraction: f64,
    metrics: Box<dyn MetricsSink>,
    phantom: PhantomData<N>,
}

impl<N: CoordNum> RTreeBuilder<N> {
    /// Create a new builder for trees of the given dimension, with the default node capacity.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            node_capacity: DEFAULT_NODE_CAPACITY,
            reinsert_fraction: DEFAULT_REINSERT_FRACTION,
            metrics: Box::new(NoopMetrics),
            phantom: PhantomData,
        }
    }

    /// Maximum number of entries per node. Must be at least [`MIN_NODE_CAPACITY`].
    pub fn node_capacity(mut self, node_capacity: usize) -> Self {
        self.node_capacity = node_capacity;
        self
    }

    /// Fraction of entries evicted the first time a leaf overflows, for strategies with forced
    /// reinsertion. Must lie strictly between 0 and 1.
    pub fn reinsert_fraction(mut self, reinsert_fraction: f64) -> Self {
        self.reinsert_fraction = reinsert_fraction;
        self
    }

    /// Sink receiving timings of insertions, splits and queries.
    pub fn metrics(mut self, metrics: Box<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Validate the configuration and create an empty tree using `strategy`.
    pub fn build<S: SplitStrategy<N>>(self, strategy: S) -> Result<RTree<N, S>> {
        if self.dimension == 0 {
            return Err(RTreeError::InvalidArgument(
                "Dimension must be at least 1.".to_string(),
            ));
        }
        if self.node_capacity < MIN_NODE_CAPACITY {
            return Err(RTreeError::InvalidArgument(format!(
                "Node capacity must be at least {}, got {}.",
                MIN_NODE_CAPACITY, self.node_capacity
            )));
        }
        if !(self.reinsert_fraction > 0. && self.reinsert_fraction < 1.) {
            return Err(RTreeError::InvalidArgument(format!(
                "Reinsert fraction must be between 0 and 1, got {}.",
                self.reinsert_fraction
            )));
        }

        log::debug!(
            "Creating {}-dimensional tree with node capacity {} and {} split",
            self.dimension,
            self.node_capacity,
            strategy.name()
        );
        Ok(RTree::from_parts(
            self.dimension,
            self.node_capacity,
            self.reinsert_fraction,
            strategy,
            self.metrics,
        ))
    }
}
