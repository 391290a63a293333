//! Timing hooks called by the tree.
//!
//! The tree reports every insertion, split and query to a [`MetricsSink`]. What the sink does
//! with the numbers is up to the caller; the default [`NoopMetrics`] drops them.

use std::fmt::Debug;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// Receiver for performance measurements taken by an [`RTree`][crate::rtree::RTree].
///
/// Methods take `&self` so that queries, which only borrow the tree, can still report. Sinks
/// that aggregate need interior mutability (`Cell`, `RefCell`, atomics).
///
/// Every method defaults to doing nothing.
pub trait MetricsSink: Debug {
    /// Time spent in one call to `insert`, including any splits and forced reinsertion.
    fn record_insertion_time(&self, _duration: Duration) {}

    /// Time spent splitting a single node.
    fn record_split_time(&self, _duration: Duration) {}

    /// Time spent in one point query. `positive` is `true` when anything was found.
    fn record_point_query_time(&self, _positive: bool, _duration: Duration) {}

    /// Time spent in one range (intersection) query. `positive` is `true` when anything was
    /// found.
    fn record_range_query_time(&self, _positive: bool, _duration: Duration) {}

    /// Shape of the tree once loading is done: its height and the fill ratio
    /// (`records / capacity`) of every leaf.
    fn record_post_construction_metrics(&self, _height: usize, _leaf_fill_ratios: &[f64]) {}
}

/// A [`MetricsSink`] that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {}

/// Shared sinks, so the caller can keep a handle and read results while the tree reports.
macro_rules! impl_shared_sink {
    ($pointer:ident) => {
        impl<T: MetricsSink + ?Sized> MetricsSink for $pointer<T> {
            fn record_insertion_time(&self, duration: Duration) {
                (**self).record_insertion_time(duration)
            }

            fn record_split_time(&self, duration: Duration) {
                (**self).record_split_time(duration)
            }

            fn record_point_query_time(&self, positive: bool, duration: Duration) {
                (**self).record_point_query_time(positive, duration)
            }

            fn record_range_query_time(&self, positive: bool, duration: Duration) {
                (**self).record_range_query_time(positive, duration)
            }

            fn record_post_construction_metrics(&self, height: usize, leaf_fill_ratios: &[f64]) {
                (**self).record_post_construction_metrics(height, leaf_fill_ratios)
            }
        }
    };
}

impl_shared_sink!(Rc);
impl_shared_sink!(Arc);
