use std::cmp::Ordering;

use crate::geometry::Region;
use crate::r#type::CoordNum;
use crate::rtree::node::Node;
use crate::rtree::record::Record;
use crate::rtree::split::quadratic::quadratic_partition;
use crate::rtree::split::util::{distribute, regions_of, union_of};
use crate::rtree::split::SplitStrategy;

/// Fraction of the entries that bounds the smallest group in an axis split.
const SPLIT_DISTRIBUTION_FACTOR: f64 = 0.4;

/// An R*-style split.
///
/// Leaf records are split with the quadratic algorithm. Internal children are split along the
/// axis whose candidate distributions have the smallest total margin, at the distribution with
/// the least overlap between the two groups.
///
/// Trees using this strategy also get forced reinsertion: the first time a leaf overflows it
/// evicts its outermost records for reinsertion from the root instead of splitting.
#[derive(Debug, Clone, Copy, Default)]
pub struct RStarSplit;

impl<N: CoordNum> SplitStrategy<N> for RStarSplit {
    fn split_records(
        &self,
        records: Vec<Record<N>>,
        capacity: usize,
    ) -> (Vec<Record<N>>, Vec<Record<N>>) {
        let (first, second) = quadratic_partition(&regions_of(&records), capacity);
        distribute(records, &first, &second)
    }

    fn split_children(
        &self,
        children: Vec<Node<N>>,
        _capacity: usize,
    ) -> (Vec<Node<N>>, Vec<Node<N>>) {
        let (first, second) = axis_partition(&regions_of(&children));
        distribute(children, &first, &second)
    }

    fn forced_reinsertion(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "rstar"
    }
}

/// Which bound the items are sorted by along the split axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortBound {
    Low,
    High,
}

/// Partition `regions` into two groups of positional indices along the best axis.
pub(crate) fn axis_partition<N: CoordNum>(regions: &[&Region<N>]) -> (Vec<usize>, Vec<usize>) {
    let n = regions.len();
    if n <= 2 {
        return ((0..n.min(1)).collect(), (n.min(1)..n).collect());
    }

    let candidates = first_group_sizes(n);
    let dimension = regions[0].dimension();

    // Choose the axis by minimum total margin over all candidate distributions.
    let mut minimum_margin = N::infinity();
    let mut split_axis = 0;
    let mut bound = SortBound::Low;

    for axis in 0..dimension {
        let by_low = sorted_indices(regions, axis, SortBound::Low);
        let by_high = sorted_indices(regions, axis, SortBound::High);

        let margin_low = margin_sum(regions, &by_low, &candidates);
        let margin_high = margin_sum(regions, &by_high, &candidates);
        let margin = margin_low.min(margin_high);
        if margin < minimum_margin {
            minimum_margin = margin;
            split_axis = axis;
            bound = if margin_low < margin_high {
                SortBound::Low
            } else {
                SortBound::High
            };
        }
    }

    // Along that axis, choose the distribution with the least overlap, then the least area.
    let sorted = sorted_indices(regions, split_axis, bound);
    let mut best: Option<(usize, N, N)> = None;
    for &size in &candidates {
        let first = union_of(regions, &sorted[..size]);
        let second = union_of(regions, &sorted[size..]);
        let overlap = first.overlap_area(&second);
        let area = first.area() + second.area();

        let better = match best {
            None => true,
            Some((_, min_overlap, min_area)) => {
                overlap < min_overlap || (overlap == min_overlap && area < min_area)
            }
        };
        if better {
            best = Some((size, overlap, area));
        }
    }

    let size = best.map_or(n / 2, |(size, _, _)| size);
    (sorted[..size].to_vec(), sorted[size..].to_vec())
}

/// Candidate sizes of the first group.
///
/// With `spf = ⌊n · 0.4⌋` there are `n - 2·spf + 2` candidates `spf - 1 + k` for `k` in
/// `1..=n - 2·spf + 2`. Sizes that would leave either group empty are dropped.
fn first_group_sizes(n: usize) -> Vec<usize> {
    let spf = (n as f64 * SPLIT_DISTRIBUTION_FACTOR).floor() as usize;
    let distributions = (n + 2).saturating_sub(2 * spf);
    (1..=distributions)
        .map(|k| spf + k - 1)
        .filter(|&size| size >= 1 && size < n)
        .collect()
}

/// Indices of `regions`, stably sorted by their `bound` along `axis`.
fn sorted_indices<N: CoordNum>(regions: &[&Region<N>], axis: usize, bound: SortBound) -> Vec<usize> {
    let key = |i: usize| match bound {
        SortBound::Low => regions[i].lows()[axis],
        SortBound::High => regions[i].highs()[axis],
    };
    let mut indices: Vec<usize> = (0..regions.len()).collect();
    indices.sort_by(|&a, &b| key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal));
    indices
}

/// Sum of the margins of both groups over every candidate distribution of `sorted`.
fn margin_sum<N: CoordNum>(regions: &[&Region<N>], sorted: &[usize], candidates: &[usize]) -> N {
    candidates.iter().fold(N::zero(), |sum, &size| {
        let first = union_of(regions, &sorted[..size]);
        let second = union_of(regions, &sorted[size..]);
        sum + first.margin() + second.margin()
    })
}
