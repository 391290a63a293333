use crate::geometry::Region;
use crate::r#type::CoordNum;
use crate::rtree::node::Node;
use crate::rtree::record::Record;
use crate::rtree::split::util::{distribute, min_fill, regions_of};
use crate::rtree::split::SplitStrategy;

/// Guttman's quadratic split.
///
/// The two items that would waste the most area if grouped together become the seeds of the
/// two groups. The remaining items are then handed out one at a time, always picking the item
/// with the strongest preference for one group over the other. `O(N²)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadraticSplit;

impl<N: CoordNum> SplitStrategy<N> for QuadraticSplit {
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
        capacity: usize,
    ) -> (Vec<Node<N>>, Vec<Node<N>>) {
        let (first, second) = quadratic_partition(&regions_of(&children), capacity);
        distribute(children, &first, &second)
    }

    fn name(&self) -> &'static str {
        "quadratic"
    }
}

/// Find the pair of regions whose union wastes the most area:
/// `area(a ∪ b) - area(a) - area(b)`. Ties keep the first pair found.
pub(crate) fn pick_seeds<N: CoordNum>(regions: &[&Region<N>]) -> (usize, usize) {
    let mut seeds = (0, 1);
    let mut max_waste = N::neg_infinity();

    for i in 0..regions.len() {
        for j in (i + 1)..regions.len() {
            let waste = regions[i].enlargement(regions[j]) - regions[j].area();
            if waste > max_waste {
                max_waste = waste;
                seeds = (i, j);
            }
        }
    }

    seeds
}

/// Quadratic partition of `regions` into two groups of positional indices.
pub(crate) fn quadratic_partition<N: CoordNum>(
    regions: &[&Region<N>],
    capacity: usize,
) -> (Vec<usize>, Vec<usize>) {
    if regions.len() < 2 {
        return ((0..regions.len()).collect(), vec![]);
    }

    let (seed1, seed2) = pick_seeds(regions);
    let mut group1 = vec![seed1];
    let mut group2 = vec![seed2];
    let mut mbr1 = regions[seed1].clone();
    let mut mbr2 = regions[seed2].clone();

    let mut remaining: Vec<usize> = (0..regions.len())
        .filter(|&i| i != seed1 && i != seed2)
        .collect();
    let min_entries = min_fill(capacity);

    while !remaining.is_empty() {
        // A group that can only reach the minimum by taking everything left gets all of it.
        if group1.len() + remaining.len() <= min_entries {
            group1.append(&mut remaining);
            break;
        }
        if group2.len() + remaining.len() <= min_entries {
            group2.append(&mut remaining);
            break;
        }

        let (position, to_first) = pick_next(regions, &remaining, &mbr1, &mbr2);
        let selected = remaining.remove(position);
        if to_first {
            mbr1.expand(regions[selected]);
            group1.push(selected);
        } else {
            mbr2.expand(regions[selected]);
            group2.push(selected);
        }
    }

    (group1, group2)
}

/// Select the unassigned item whose area growth differs the most between the two groups.
///
/// Returns its position in `remaining` and whether it belongs in the first group. An item goes
/// to the first group only if that group grows strictly less.
fn pick_next<N: CoordNum>(
    regions: &[&Region<N>],
    remaining: &[usize],
    mbr1: &Region<N>,
    mbr2: &Region<N>,
) -> (usize, bool) {
    let mut max_diff = N::neg_infinity();
    let mut selected = (0, false);

    for (position, &index) in remaining.iter().enumerate() {
        let growth1 = mbr1.enlargement(regions[index]);
        let growth2 = mbr2.enlargement(regions[index]);
        let diff = (growth1 - growth2).abs();
        if diff > max_diff {
            max_diff = diff;
            selected = (position, growth1 < growth2);
        }
    }

    selected
}
