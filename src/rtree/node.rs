//! The node hierarchy of a dynamic RTree.
//!
//! A [`Node`] is either a [`LeafNode`] holding records or an [`InternalNode`] holding child
//! nodes. Every node caches its minimum bounding region, which is recomputed after each change
//! to its contents so that it always equals the union of what the node holds.

use std::cmp::Ordering;
use std::mem::take;
use std::time::Instant;

use crate::geometry::Region;
use crate::r#type::CoordNum;
use crate::rtree::metrics::MetricsSink;
use crate::rtree::record::{Record, RecordId};
use crate::rtree::split::util::distribute;
use crate::rtree::split::SplitStrategy;

/// State shared by every node touched during a single insertion.
///
/// Leaves that evict records for forced reinsertion push them onto `pending`; the tree
/// reinserts them from the root once the current insertion has finished.
pub(crate) struct InsertContext<'a, N: CoordNum> {
    pub(crate) strategy: &'a dyn SplitStrategy<N>,
    pub(crate) capacity: usize,
    pub(crate) reinsert_fraction: f64,
    pub(crate) metrics: &'a dyn MetricsSink,
    pub(crate) pending: Vec<Record<N>>,
}

impl<'a, N: CoordNum> InsertContext<'a, N> {
    pub(crate) fn new(
        strategy: &'a dyn SplitStrategy<N>,
        capacity: usize,
        reinsert_fraction: f64,
        metrics: &'a dyn MetricsSink,
    ) -> Self {
        Self {
            strategy,
            capacity,
            reinsert_fraction,
            metrics,
            pending: vec![],
        }
    }
}

/// A node in the RTree.
#[derive(Debug, Clone)]
pub enum Node<N: CoordNum> {
    Leaf(LeafNode<N>),
    Internal(InternalNode<N>),
}

impl<N: CoordNum> Node<N> {
    /// The minimum bounding region of everything below this node. Empty for an empty node.
    pub fn mbr(&self) -> &Region<N> {
        match self {
            Node::Leaf(leaf) => &leaf.mbr,
            Node::Internal(internal) => &internal.mbr,
        }
    }

    /// Returns `true` if this is a leaf node holding records.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Number of direct entries: records for a leaf, children for an internal node.
    pub fn len(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.records.len(),
            Node::Internal(internal) => internal.children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Height of the subtree rooted here. A leaf has height 1.
    pub fn height(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Internal(internal) => internal.height(),
        }
    }

    /// Total number of records stored below this node.
    pub fn record_count(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.records.len(),
            Node::Internal(internal) => internal.children.iter().map(Node::record_count).sum(),
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafNode<N>> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Internal(_) => None,
        }
    }

    pub fn as_internal(&self) -> Option<&InternalNode<N>> {
        match self {
            Node::Leaf(_) => None,
            Node::Internal(internal) => Some(internal),
        }
    }

    pub(crate) fn insert(&mut self, record: Record<N>, ctx: &mut InsertContext<'_, N>) {
        match self {
            Node::Leaf(leaf) => leaf.insert(record, ctx),
            Node::Internal(internal) => internal.insert(record, ctx),
        }
    }

    pub(crate) fn remove(&mut self, id: RecordId, region: &Region<N>) -> bool {
        match self {
            Node::Leaf(leaf) => leaf.remove(id),
            Node::Internal(internal) => internal.remove(id, region),
        }
    }

    /// Append every record below this node whose region intersects `query` to `out`.
    pub(crate) fn search<'a>(&'a self, query: &Region<N>, out: &mut Vec<&'a Record<N>>) {
        match self {
            Node::Leaf(leaf) => leaf.search(query, out),
            Node::Internal(internal) => internal.search(query, out),
        }
    }

    /// Overflow is strict: a node holding exactly `capacity` entries is full, not overflowing.
    pub(crate) fn is_overflowing(&self, capacity: usize) -> bool {
        self.len() > capacity
    }

    /// Split this node in two, returning the new sibling. Nodes with two entries or fewer are
    /// left untouched and produce no sibling.
    pub(crate) fn split(&mut self, ctx: &InsertContext<'_, N>) -> Option<Node<N>> {
        match self {
            Node::Leaf(leaf) => leaf.split(ctx).map(Node::Leaf),
            Node::Internal(internal) => internal.split(ctx).map(Node::Internal),
        }
    }

    /// Push `records / capacity` for every leaf below this node.
    pub(crate) fn collect_leaf_fill(&self, capacity: usize, out: &mut Vec<f64>) {
        match self {
            Node::Leaf(leaf) => out.push(leaf.records.len() as f64 / capacity as f64),
            Node::Internal(internal) => internal
                .children
                .iter()
                .for_each(|child| child.collect_leaf_fill(capacity, out)),
        }
    }
}

/// A bottom-level node owning a set of records.
#[derive(Debug, Clone)]
pub struct LeafNode<N: CoordNum> {
    records: Vec<Record<N>>,
    mbr: Region<N>,
    /// Cleared the first time this leaf evicts records for forced reinsertion.
    overflow_pending: bool,
}

impl<N: CoordNum> LeafNode<N> {
    pub(crate) fn new() -> Self {
        Self::from_records(vec![])
    }

    fn from_records(records: Vec<Record<N>>) -> Self {
        let mut leaf = Self {
            records,
            mbr: Region::empty(),
            overflow_pending: true,
        };
        leaf.recalculate_mbr();
        leaf
    }

    /// The records in this leaf, in storage order.
    pub fn records(&self) -> &[Record<N>] {
        &self.records
    }

    pub fn mbr(&self) -> &Region<N> {
        &self.mbr
    }

    /// Whether this leaf may still evict records for forced reinsertion. Only strategies with
    /// forced reinsertion ever clear it.
    pub fn overflow_pending(&self) -> bool {
        self.overflow_pending
    }

    fn insert(&mut self, record: Record<N>, ctx: &mut InsertContext<'_, N>) {
        self.mbr.expand(record.region());
        self.records.push(record);

        if self.records.len() > ctx.capacity
            && ctx.strategy.forced_reinsertion()
            && self.overflow_pending
        {
            self.overflow_pending = false;
            let evicted = self.evict_outermost(ctx.reinsert_fraction);
            log::debug!("Evicted {} records for reinsertion", evicted.len());
            ctx.pending.extend(evicted);
        }
    }

    fn remove(&mut self, id: RecordId) -> bool {
        match self.records.iter().position(|record| record.id() == id) {
            Some(position) => {
                self.records.remove(position);
                self.recalculate_mbr();
                true
            }
            None => false,
        }
    }

    fn search<'a>(&'a self, query: &Region<N>, out: &mut Vec<&'a Record<N>>) {
        out.extend(
            self.records
                .iter()
                .filter(|record| record.region().intersects(query)),
        );
    }

    fn split(&mut self, ctx: &InsertContext<'_, N>) -> Option<Self> {
        if self.records.len() <= 2 {
            return None;
        }
        let start = Instant::now();

        let (first, second) = ctx
            .strategy
            .split_records(take(&mut self.records), ctx.capacity);
        self.records = first;
        self.recalculate_mbr();
        let sibling = Self::from_records(second);

        ctx.metrics.record_split_time(start.elapsed());
        log::debug!(
            "Split leaf with {} strategy into {} and {} records",
            ctx.strategy.name(),
            self.records.len(),
            sibling.records.len()
        );
        Some(sibling)
    }

    /// Remove the `max(1, ⌊len · fraction⌋)` records whose centers lie farthest from the center
    /// of this leaf, farthest first. Ties keep storage order.
    fn evict_outermost(&mut self, fraction: f64) -> Vec<Record<N>> {
        let count = ((self.records.len() as f64 * fraction).floor() as usize).max(1);
        let center = self.mbr.center();

        let mut by_distance: Vec<(usize, N)> = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| (i, squared_distance(&record.region().center(), &center)))
            .collect();
        by_distance.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let evict: Vec<usize> = by_distance.iter().take(count).map(|&(i, _)| i).collect();
        let mut evicted_mask = vec![false; self.records.len()];
        evict.iter().for_each(|&i| evicted_mask[i] = true);
        let keep: Vec<usize> = (0..self.records.len())
            .filter(|&i| !evicted_mask[i])
            .collect();

        let (kept, evicted) = distribute(take(&mut self.records), &keep, &evict);
        self.records = kept;
        self.recalculate_mbr();
        evicted
    }

    fn recalculate_mbr(&mut self) {
        self.mbr = Region::union_all(self.records.iter().map(Record::region));
    }
}

/// An upper-level node owning a set of child nodes.
#[derive(Debug, Clone)]
pub struct InternalNode<N: CoordNum> {
    children: Vec<Node<N>>,
    mbr: Region<N>,
}

impl<N: CoordNum> InternalNode<N> {
    pub(crate) fn from_children(children: Vec<Node<N>>) -> Self {
        let mut node = Self {
            children,
            mbr: Region::empty(),
        };
        node.recalculate_mbr();
        node
    }

    /// The child nodes, in storage order.
    pub fn children(&self) -> &[Node<N>] {
        &self.children
    }

    pub fn mbr(&self) -> &Region<N> {
        &self.mbr
    }

    /// One more than the tallest child. An internal node without children reports 1.
    pub fn height(&self) -> usize {
        self.children.iter().map(Node::height).max().unwrap_or(0) + 1
    }

    /// Index of the child whose bounding region grows the least when extended to cover
    /// `region`. Ties go to the child with the smaller area, then to the earlier child.
    pub(crate) fn choose_subtree(&self, region: &Region<N>) -> Option<usize> {
        let mut best: Option<(usize, N, N)> = None;
        for (i, child) in self.children.iter().enumerate() {
            let enlargement = child.mbr().enlargement(region);
            let area = child.mbr().area();
            let better = match best {
                None => true,
                Some((_, min_enlargement, best_area)) => {
                    enlargement < min_enlargement
                        || (enlargement == min_enlargement && area < best_area)
                }
            };
            if better {
                best = Some((i, enlargement, area));
            }
        }
        best.map(|(i, _, _)| i)
    }

    fn insert(&mut self, record: Record<N>, ctx: &mut InsertContext<'_, N>) {
        match self.choose_subtree(record.region()) {
            Some(index) => {
                let child = &mut self.children[index];
                child.insert(record, ctx);
                if child.is_overflowing(ctx.capacity) {
                    if let Some(sibling) = child.split(ctx) {
                        self.children.push(sibling);
                    }
                }
            }
            None => {
                let mut leaf = LeafNode::new();
                leaf.insert(record, ctx);
                self.children.push(Node::Leaf(leaf));
            }
        }
        self.recalculate_mbr();
    }

    fn remove(&mut self, id: RecordId, region: &Region<N>) -> bool {
        let found = self
            .children
            .iter_mut()
            .any(|child| child.mbr().intersects(region) && child.remove(id, region));

        if found {
            self.children.retain(|child| !child.is_empty());
            self.recalculate_mbr();
        }
        found
    }

    fn search<'a>(&'a self, query: &Region<N>, out: &mut Vec<&'a Record<N>>) {
        for child in &self.children {
            if child.mbr().intersects(query) {
                child.search(query, out);
            }
        }
    }

    fn split(&mut self, ctx: &InsertContext<'_, N>) -> Option<Self> {
        if self.children.len() <= 2 {
            return None;
        }
        let start = Instant::now();

        let (first, second) = ctx
            .strategy
            .split_children(take(&mut self.children), ctx.capacity);
        self.children = first;
        self.recalculate_mbr();
        let sibling = Self::from_children(second);

        ctx.metrics.record_split_time(start.elapsed());
        log::debug!(
            "Split internal node with {} strategy into {} and {} children",
            ctx.strategy.name(),
            self.children.len(),
            sibling.children.len()
        );
        Some(sibling)
    }

    fn recalculate_mbr(&mut self) {
        self.mbr = Region::union_all(self.children.iter().map(Node::mbr));
    }
}

fn squared_distance<N: CoordNum>(a: &[N], b: &[N]) -> N {
    a.iter()
        .zip(b)
        .fold(N::zero(), |sum, (&x, &y)| sum + (x - y) * (x - y))
}
