use crate::r#type::CoordNum;
use crate::rtree::node::Node;
use crate::rtree::record::Record;
use crate::rtree::split::util::{distribute, min_fill};
use crate::rtree::split::SplitStrategy;

/// Splits a node into halves by insertion order.
///
/// There is no geometric reasoning at all, which makes this the cheapest strategy (`O(N)`)
/// and the one producing the loosest nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearSplit;

impl<N: CoordNum> SplitStrategy<N> for LinearSplit {
    fn split_records(
        &self,
        records: Vec<Record<N>>,
        capacity: usize,
    ) -> (Vec<Record<N>>, Vec<Record<N>>) {
        let (first, second) = linear_partition(records.len(), capacity);
        distribute(records, &first, &second)
    }

    fn split_children(
        &self,
        children: Vec<Node<N>>,
        capacity: usize,
    ) -> (Vec<Node<N>>, Vec<Node<N>>) {
        let (first, second) = linear_partition(children.len(), capacity);
        distribute(children, &first, &second)
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}

/// Cut `0..n` at its midpoint, then shift items across the cut until both sides hold at least
/// `capacity / 2`, as long as the donor side keeps more than that minimum.
pub(crate) fn linear_partition(n: usize, capacity: usize) -> (Vec<usize>, Vec<usize>) {
    let min_entries = min_fill(capacity);
    let mut midpoint = n / 2;

    if midpoint < min_entries {
        while midpoint < min_entries && n - midpoint > min_entries {
            midpoint += 1;
        }
    } else if n - midpoint < min_entries {
        while n - midpoint < min_entries && midpoint > min_entries {
            midpoint -= 1;
        }
    }

    ((0..midpoint).collect(), (midpoint..n).collect())
}
