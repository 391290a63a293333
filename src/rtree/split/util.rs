use crate::geometry::Region;
use crate::r#type::CoordNum;
use crate::rtree::node::Node;
use crate::rtree::record::Record;

/// Anything a split strategy can partition: it only needs a bounding region.
pub(crate) trait Bounded<N: CoordNum> {
    fn bounds(&self) -> &Region<N>;
}

impl<N: CoordNum> Bounded<N> for Record<N> {
    fn bounds(&self) -> &Region<N> {
        self.region()
    }
}

impl<N: CoordNum> Bounded<N> for Node<N> {
    fn bounds(&self) -> &Region<N> {
        self.mbr()
    }
}

/// Minimum number of entries each group should receive after a split.
#[inline]
pub(crate) fn min_fill(capacity: usize) -> usize {
    capacity / 2
}

/// Borrow the bounding region of every item.
pub(crate) fn regions_of<N: CoordNum, T: Bounded<N>>(items: &[T]) -> Vec<&Region<N>> {
    items.iter().map(Bounded::bounds).collect()
}

/// Move `items` into two groups following the positional indices in `first` and `second`.
///
/// Each index must appear in exactly one of the two lists. Group order follows the order of
/// the index lists.
pub(crate) fn distribute<T>(items: Vec<T>, first: &[usize], second: &[usize]) -> (Vec<T>, Vec<T>) {
    debug_assert_eq!(first.len() + second.len(), items.len());

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let group1 = first.iter().filter_map(|&i| slots[i].take()).collect();
    let group2 = second.iter().filter_map(|&i| slots[i].take()).collect();
    (group1, group2)
}

/// Union of the regions at `indices`.
pub(crate) fn union_of<N: CoordNum>(regions: &[&Region<N>], indices: &[usize]) -> Region<N> {
    Region::union_all(indices.iter().map(|&i| regions[i]))
}
