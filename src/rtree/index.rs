use std::mem::replace;
use std::time::Instant;

use crate::error::{RTreeError, Result};
use crate::geometry::{Point, Region};
use crate::r#type::CoordNum;
use crate::rtree::builder::RTreeBuilder;
use crate::rtree::metrics::MetricsSink;
use crate::rtree::node::{InsertContext, InternalNode, LeafNode, Node};
use crate::rtree::record::{Record, RecordId};
use crate::rtree::split::SplitStrategy;

/// A dynamic RTree over axis-aligned regions of a fixed dimension.
///
/// Records can be inserted and removed at any time. Nodes hold at most `node_capacity`
/// entries; an insertion that overflows a node splits it with the tree's [`SplitStrategy`],
/// growing the tree by one level whenever the root splits.
///
/// ```
/// use dynamic_rtree::geometry::{Point, Region};
/// use dynamic_rtree::rtree::split::LinearSplit;
/// use dynamic_rtree::rtree::RTree;
///
/// let mut tree = RTree::new(2, 4, LinearSplit).unwrap();
/// for i in 0..5 {
///     let x = i as f64;
///     tree.insert(Region::new([x, 0.], [x + 1., 1.]).unwrap(), i + 1).unwrap();
/// }
/// assert_eq!(tree.height(), 2);
///
/// let hits = tree.point_query(&Point::new([2.5, 0.5]));
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].id(), 3);
/// ```
#[derive(Debug)]
pub struct RTree<N: CoordNum, S: SplitStrategy<N>> {
    root: Node<N>,
    dimension: usize,
    node_capacity: usize,
    reinsert_fraction: f64,
    strategy: S,
    metrics: Box<dyn MetricsSink>,
    len: usize,
}

impl<N: CoordNum, S: SplitStrategy<N>> RTree<N, S> {
    /// Create an empty tree with the default reinsertion fraction and no metrics.
    ///
    /// Fails if `dimension` is 0 or `node_capacity` is below 3.
    pub fn new(dimension: usize, node_capacity: usize, strategy: S) -> Result<Self> {
        RTreeBuilder::new(dimension)
            .node_capacity(node_capacity)
            .build(strategy)
    }

    /// Only called by the builder, after validation.
    pub(crate) fn from_parts(
        dimension: usize,
        node_capacity: usize,
        reinsert_fraction: f64,
        strategy: S,
        metrics: Box<dyn MetricsSink>,
    ) -> Self {
        Self {
            root: Node::Leaf(LeafNode::new()),
            dimension,
            node_capacity,
            reinsert_fraction,
            strategy,
            metrics,
            len: 0,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn node_capacity(&self) -> usize {
        self.node_capacity
    }

    /// Fraction of an overflowing leaf evicted for forced reinsertion, when the strategy uses it.
    pub fn reinsert_fraction(&self) -> f64 {
        self.reinsert_fraction
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Number of levels. A tree whose root is a leaf has height 1.
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// Number of records in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The root node, for read-only traversal.
    pub fn root(&self) -> &Node<N> {
        &self.root
    }

    /// Index `region` under `id`.
    ///
    /// Identifiers are not checked for uniqueness. Fails without modifying the tree if the
    /// region's dimension differs from the tree's.
    pub fn insert(&mut self, region: Region<N>, id: RecordId) -> Result<()> {
        if region.dimension() != self.dimension {
            return Err(RTreeError::dimension_mismatch(
                self.dimension,
                region.dimension(),
            ));
        }

        let start = Instant::now();
        self.insert_record(Record::new(id, region));
        self.len += 1;
        self.metrics.record_insertion_time(start.elapsed());
        log::trace!("Inserted record {}", id);
        Ok(())
    }

    fn insert_record(&mut self, record: Record<N>) {
        let pending = {
            let mut ctx = InsertContext::new(
                &self.strategy,
                self.node_capacity,
                self.reinsert_fraction,
                self.metrics.as_ref(),
            );

            self.root.insert(record, &mut ctx);
            if self.root.is_overflowing(self.node_capacity) {
                if let Some(sibling) = self.root.split(&ctx) {
                    let old_root = replace(&mut self.root, Node::Leaf(LeafNode::new()));
                    self.root =
                        Node::Internal(InternalNode::from_children(vec![old_root, sibling]));
                    log::debug!("Root split, tree height is now {}", self.root.height());
                }
            }
            ctx.pending
        };

        // Records evicted for forced reinsertion go back in from the top, one independent
        // insertion each. Leaves only evict once, so this terminates.
        for record in pending {
            self.insert_record(record);
        }
    }

    /// Remove the first record found with `id` whose leaf is reachable through `region`.
    ///
    /// Only nodes whose bounding region intersects `region` are searched, so `region` should
    /// be the region the record was inserted with. Returns `false` if nothing was removed.
    /// Underfull nodes left behind are not rebalanced.
    pub fn remove(&mut self, region: &Region<N>, id: RecordId) -> bool {
        let removed = self.root.remove(id, region);
        if removed {
            self.len -= 1;
            if self.root.is_empty() && !self.root.is_leaf() {
                self.root = Node::Leaf(LeafNode::new());
                log::debug!("Tree emptied, root reset to a leaf");
            }
        }
        log::trace!("Remove record {}: {}", id, removed);
        removed
    }

    /// All records whose region intersects `query`, touching boundaries included.
    pub fn intersection_query(&self, query: &Region<N>) -> Vec<&Record<N>> {
        let start = Instant::now();
        let result = self.search(query);
        self.metrics
            .record_range_query_time(!result.is_empty(), start.elapsed());
        result
    }

    /// All records whose region lies entirely within `query`.
    pub fn containment_query(&self, query: &Region<N>) -> Vec<&Record<N>> {
        let mut result = self.search(query);
        result.retain(|record| query.contains(record.region()));
        result
    }

    /// All records whose region contains `point`.
    pub fn point_query(&self, point: &Point<N>) -> Vec<&Record<N>> {
        let start = Instant::now();
        let mut result = self.search(&Region::from_point(point));
        result.retain(|record| record.region().contains_point(point));
        self.metrics
            .record_point_query_time(!result.is_empty(), start.elapsed());
        result
    }

    fn search(&self, query: &Region<N>) -> Vec<&Record<N>> {
        let mut result = vec![];
        if self.root.mbr().intersects(query) {
            self.root.search(query, &mut result);
        }
        result
    }

    /// Fill ratio `records / node_capacity` of every leaf, in depth-first order.
    pub fn leaf_fill_ratios(&self) -> Vec<f64> {
        let mut ratios = vec![];
        self.root.collect_leaf_fill(self.node_capacity, &mut ratios);
        ratios
    }

    /// Report the current height and leaf fill ratios to the metrics sink. Call this once
    /// loading is done.
    pub fn record_construction_metrics(&self) {
        self.metrics
            .record_post_construction_metrics(self.height(), &self.leaf_fill_ratios());
    }
}
