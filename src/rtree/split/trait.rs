use crate::r#type::CoordNum;
use crate::rtree::node::Node;
use crate::rtree::record::Record;

/// An algorithm for dividing the contents of an overflowing node between the node and a new
/// sibling.
///
/// [`LinearSplit`], [`QuadraticSplit`] and [`RStarSplit`] all implement this trait, and
/// [`SplitAlgorithm`] selects one of them at runtime.
///
/// Implementations must be deterministic, must place every input item in exactly one of the
/// two groups, and are only called with more than two items.
///
/// [`LinearSplit`]: crate::rtree::split::LinearSplit
/// [`QuadraticSplit`]: crate::rtree::split::QuadraticSplit
/// [`RStarSplit`]: crate::rtree::split::RStarSplit
/// [`SplitAlgorithm`]: crate::rtree::split::SplitAlgorithm
pub trait SplitStrategy<N: CoordNum> {
    /// Partition the records of an overflowing leaf. The first group stays in the leaf, the
    /// second moves to the new sibling.
    fn split_records(
        &self,
        records: Vec<Record<N>>,
        capacity: usize,
    ) -> (Vec<Record<N>>, Vec<Record<N>>);

    /// Partition the children of an overflowing internal node.
    fn split_children(&self, children: Vec<Node<N>>, capacity: usize)
        -> (Vec<Node<N>>, Vec<Node<N>>);

    /// Whether a leaf should first try evicting its outermost records for reinsertion before
    /// splitting for the first time.
    fn forced_reinsertion(&self) -> bool {
        false
    }

    /// Short, stable name of the algorithm.
    fn name(&self) -> &'static str;
}
