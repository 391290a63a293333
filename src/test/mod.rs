//! Shared fixtures and whole-tree property tests.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::{Point, Region};
use crate::r#type::CoordNum;
use crate::rtree::split::util::min_fill;
use crate::rtree::{
    LinearSplit, MetricsSink, Node, QuadraticSplit, RStarSplit, RTree, RTreeBuilder, Record,
    RecordId, SplitAlgorithm, SplitStrategy,
};

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `n` random boxes inside `[0, extent)^dimension` with sides up to `max_side`.
pub(crate) fn random_regions(
    rng: &mut StdRng,
    n: usize,
    dimension: usize,
    extent: f64,
    max_side: f64,
) -> Vec<Region<f64>> {
    (0..n)
        .map(|_| {
            let low: Vec<f64> = (0..dimension).map(|_| rng.gen_range(0.0..extent)).collect();
            let high: Vec<f64> = low
                .iter()
                .map(|&lo| lo + rng.gen_range(0.0..max_side))
                .collect();
            Region::new(low, high).unwrap()
        })
        .collect()
}

/// Build a tree holding `regions`, with ids equal to their positions.
pub(crate) fn build_tree<S: SplitStrategy<f64>>(
    regions: &[Region<f64>],
    capacity: usize,
    strategy: S,
) -> RTree<f64, S> {
    let dimension = regions.first().map_or(2, Region::dimension);
    let mut tree = RTree::new(dimension, capacity, strategy).unwrap();
    for (id, region) in regions.iter().enumerate() {
        tree.insert(region.clone(), id as RecordId).unwrap();
    }
    tree
}

pub(crate) fn ids_of<N: CoordNum>(records: &[&Record<N>]) -> Vec<RecordId> {
    let mut ids: Vec<_> = records.iter().map(|record| record.id()).collect();
    ids.sort();
    ids
}

/// Ids of every entry whose region satisfies `keep`, sorted.
pub(crate) fn brute_force(
    entries: &[(RecordId, Region<f64>)],
    keep: impl Fn(&Region<f64>) -> bool,
) -> Vec<RecordId> {
    let mut ids: Vec<_> = entries
        .iter()
        .filter(|(_, region)| keep(region))
        .map(|(id, _)| *id)
        .collect();
    ids.sort();
    ids
}

/// Panics unless every node's bounding region is the exact union of its contents, no node
/// exceeds the capacity, all leaves sit at the same depth and the record count matches.
pub(crate) fn check_invariants<N: CoordNum, S: SplitStrategy<N>>(tree: &RTree<N, S>) {
    let mut leaf_depths = vec![];
    check_node(tree.root(), tree.node_capacity(), 1, &mut leaf_depths);

    assert!(
        leaf_depths.windows(2).all(|pair| pair[0] == pair[1]),
        "leaves at different depths: {:?}",
        leaf_depths
    );
    assert_eq!(leaf_depths[0], tree.height());
    assert_eq!(tree.root().record_count(), tree.len());
}

fn check_node<N: CoordNum>(
    node: &Node<N>,
    capacity: usize,
    depth: usize,
    leaf_depths: &mut Vec<usize>,
) {
    assert!(node.len() <= capacity, "node with {} entries", node.len());
    match node {
        Node::Leaf(leaf) => {
            let expected = Region::union_all(leaf.records().iter().map(Record::region));
            assert_eq!(leaf.mbr(), &expected);
            leaf_depths.push(depth);
        }
        Node::Internal(internal) => {
            assert!(!internal.children().is_empty(), "empty internal node");
            let expected = Region::union_all(internal.children().iter().map(Node::mbr));
            assert_eq!(internal.mbr(), &expected);
            for child in internal.children() {
                check_node(child, capacity, depth + 1, leaf_depths);
            }
        }
    }
}

/// Counts every call it receives.
#[derive(Debug, Default)]
pub(crate) struct RecordingMetrics {
    pub(crate) insertions: Cell<usize>,
    pub(crate) splits: Cell<usize>,
    pub(crate) point_queries: RefCell<Vec<bool>>,
    pub(crate) range_queries: RefCell<Vec<bool>>,
    pub(crate) construction: RefCell<Option<(usize, Vec<f64>)>>,
}

impl MetricsSink for RecordingMetrics {
    fn record_insertion_time(&self, _duration: Duration) {
        self.insertions.set(self.insertions.get() + 1);
    }

    fn record_split_time(&self, _duration: Duration) {
        self.splits.set(self.splits.get() + 1);
    }

    fn record_point_query_time(&self, positive: bool, _duration: Duration) {
        self.point_queries.borrow_mut().push(positive);
    }

    fn record_range_query_time(&self, positive: bool, _duration: Duration) {
        self.range_queries.borrow_mut().push(positive);
    }

    fn record_post_construction_metrics(&self, height: usize, leaf_fill_ratios: &[f64]) {
        *self.construction.borrow_mut() = Some((height, leaf_fill_ratios.to_vec()));
    }
}

#[test]
fn every_inserted_record_is_found() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(1);
    for dimension in [2, 3] {
        let regions = random_regions(&mut rng, 300, dimension, 100., 5.);
        for algorithm in SplitAlgorithm::ALL {
            let tree = build_tree(&regions, 6, algorithm);
            assert_eq!(tree.len(), regions.len());
            for (id, region) in regions.iter().enumerate() {
                let found = tree.intersection_query(region);
                assert!(
                    found.iter().any(|record| record.id() == id as RecordId),
                    "{} lost record {} in {} dimensions",
                    algorithm,
                    id,
                    dimension
                );
            }
        }
    }
}

#[test]
fn structure_stays_valid_through_inserts_and_removes() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(2);
    let regions = random_regions(&mut rng, 400, 2, 1000., 20.);

    for algorithm in SplitAlgorithm::ALL {
        for capacity in [3, 4, 9, 16] {
            let mut tree = RTree::new(2, capacity, algorithm).unwrap();
            for (id, region) in regions.iter().enumerate() {
                tree.insert(region.clone(), id as RecordId).unwrap();
                if id % 50 == 0 {
                    check_invariants(&tree);
                }
            }
            check_invariants(&tree);

            for (id, region) in regions.iter().enumerate().step_by(2) {
                assert!(tree.remove(region, id as RecordId), "{} {}", algorithm, capacity);
            }
            check_invariants(&tree);
            assert_eq!(tree.len(), regions.len() / 2);
        }
    }
}

#[test]
fn queries_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(3);
    let regions = random_regions(&mut rng, 500, 2, 100., 8.);
    let entries: Vec<_> = regions
        .iter()
        .enumerate()
        .map(|(id, region)| (id as RecordId, region.clone()))
        .collect();
    let queries = random_regions(&mut rng, 40, 2, 100., 30.);

    for algorithm in SplitAlgorithm::ALL {
        let tree = build_tree(&regions, 8, algorithm);
        for query in &queries {
            let intersecting = ids_of(&tree.intersection_query(query));
            assert_eq!(intersecting, brute_force(&entries, |r| r.intersects(query)));

            let contained = ids_of(&tree.containment_query(query));
            assert_eq!(contained, brute_force(&entries, |r| query.contains(r)));
            assert!(contained.iter().all(|id| intersecting.contains(id)));

            let point = Point::new(query.lows());
            let at_point = ids_of(&tree.point_query(&point));
            assert_eq!(at_point, brute_force(&entries, |r| r.contains_point(&point)));
        }
    }
}

#[test]
fn intersection_matches_rstar() {
    use rstar::primitives::{GeomWithData, Rectangle};
    use rstar::AABB;

    let mut rng = StdRng::seed_from_u64(4);
    let regions = random_regions(&mut rng, 1000, 2, 500., 10.);
    let oracle = rstar::RTree::bulk_load(
        regions
            .iter()
            .enumerate()
            .map(|(id, region)| {
                let low = [region.lows()[0], region.lows()[1]];
                let high = [region.highs()[0], region.highs()[1]];
                GeomWithData::new(Rectangle::from_corners(low, high), id as RecordId)
            })
            .collect(),
    );

    for algorithm in SplitAlgorithm::ALL {
        let tree = build_tree(&regions, 16, algorithm);
        for query in random_regions(&mut rng, 50, 2, 500., 60.) {
            let envelope = AABB::from_corners(
                [query.lows()[0], query.lows()[1]],
                [query.highs()[0], query.highs()[1]],
            );
            let mut expected: Vec<RecordId> = oracle
                .locate_in_envelope_intersecting(&envelope)
                .map(|item| item.data)
                .collect();
            expected.sort();
            assert_eq!(ids_of(&tree.intersection_query(&query)), expected, "{}", algorithm);
        }
    }
}

#[test]
fn removing_missing_records_changes_nothing() {
    let mut rng = StdRng::seed_from_u64(5);
    let regions = random_regions(&mut rng, 100, 2, 100., 5.);
    let mut tree = build_tree(&regions, 5, QuadraticSplit);

    assert!(!tree.remove(&regions[0], 1000));
    assert!(!tree.remove(&Region::new([-50., -50.], [-40., -40.]).unwrap(), 0));
    assert_eq!(tree.len(), 100);
    check_invariants(&tree);

    assert!(tree.remove(&regions[7], 7));
    assert!(!ids_of(&tree.intersection_query(&regions[7])).contains(&7));
}

#[test]
fn deletions_do_not_rebalance() {
    // Underfull nodes are left in place: the tree keeps its height until it is emptied.
    let mut rng = StdRng::seed_from_u64(6);
    let regions = random_regions(&mut rng, 200, 2, 100., 2.);
    let mut tree = build_tree(&regions, 4, LinearSplit);
    let height = tree.height();
    assert!(height >= 3);

    for (id, region) in regions.iter().enumerate().skip(3) {
        assert!(tree.remove(region, id as RecordId));
    }
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.height(), height);
    check_invariants(&tree);
}

#[test]
fn linear_and_quadratic_splits_meet_minimum_fill() {
    let mut rng = StdRng::seed_from_u64(7);
    for capacity in 3..24 {
        let records: Vec<_> = random_regions(&mut rng, capacity + 1, 2, 50., 10.)
            .into_iter()
            .enumerate()
            .map(|(id, region)| Record::new(id as RecordId, region))
            .collect();

        let strategies: [&dyn SplitStrategy<f64>; 2] = [&LinearSplit, &QuadraticSplit];
        for strategy in strategies {
            let (first, second) = strategy.split_records(records.clone(), capacity);
            assert!(first.len() >= min_fill(capacity), "{} {}", strategy.name(), capacity);
            assert!(second.len() >= min_fill(capacity), "{} {}", strategy.name(), capacity);

            let mut ids: Vec<_> = first.iter().chain(&second).map(Record::id).collect();
            ids.sort();
            assert_eq!(ids, (0..=capacity as RecordId).collect::<Vec<_>>());
        }
    }
}

#[test]
fn identical_input_builds_identical_trees() {
    let mut rng = StdRng::seed_from_u64(8);
    let regions = random_regions(&mut rng, 300, 3, 100., 10.);
    for algorithm in SplitAlgorithm::ALL {
        let first = build_tree(&regions, 7, algorithm);
        let second = build_tree(&regions, 7, algorithm);
        assert_eq!(format!("{:?}", first.root()), format!("{:?}", second.root()));
    }
}

#[test]
fn rstar_tree_keeps_records_through_reinsertion() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(9);
    let regions = random_regions(&mut rng, 500, 2, 100., 3.);
    let tree = build_tree(&regions, 8, RStarSplit);

    check_invariants(&tree);
    let everything = Region::new([-1., -1.], [200., 200.]).unwrap();
    assert_eq!(
        ids_of(&tree.intersection_query(&everything)),
        (0..500).collect::<Vec<_>>()
    );
}

#[test]
fn metrics_sink_sees_every_operation() {
    let metrics = Rc::new(RecordingMetrics::default());
    let mut tree = RTreeBuilder::new(2)
        .node_capacity(4)
        .metrics(Box::new(Rc::clone(&metrics)))
        .build(QuadraticSplit)
        .unwrap();

    for i in 0..20 {
        let x = i as f64 * 2.;
        tree.insert(Region::new([x, 0.], [x + 1., 1.]).unwrap(), i).unwrap();
    }
    assert_eq!(metrics.insertions.get(), 20);
    assert!(metrics.splits.get() > 0);

    tree.intersection_query(&Region::new([0., 0.], [3., 3.]).unwrap());
    tree.intersection_query(&Region::new([0., 50.], [3., 53.]).unwrap());
    assert_eq!(*metrics.range_queries.borrow(), vec![true, false]);

    tree.point_query(&Point::new([0.5, 0.5]));
    tree.point_query(&Point::new([1.5, 0.5]));
    assert_eq!(*metrics.point_queries.borrow(), vec![true, false]);

    // A rejected insert is not timed.
    assert!(tree.insert(Region::empty(), 99).is_err());
    assert_eq!(metrics.insertions.get(), 20);

    tree.record_construction_metrics();
    let construction = metrics.construction.borrow();
    let (height, ratios) = construction.as_ref().unwrap();
    assert_eq!(*height, tree.height());
    assert_eq!(ratios, &tree.leaf_fill_ratios());
    let stored: f64 = ratios.iter().map(|ratio| ratio * 4.).sum();
    assert_eq!(stored.round() as usize, 20);
}

#[test]
fn single_precision_tree() {
    let mut tree = RTree::<f32, _>::new(2, 4, SplitAlgorithm::RStar).unwrap();
    for i in 0..30 {
        let x = i as f32;
        let region = Region::new([x, x], [x + 0.5, x + 0.5]).unwrap();
        tree.insert(region, i).unwrap();
    }
    check_invariants(&tree);
    let hits = tree.point_query(&Point::new([10.25f32, 10.25]));
    assert_eq!(ids_of(&hits), vec![10]);
}

#[test]
fn distinct_ids_may_share_a_region() {
    let mut tree = RTree::new(2, 3, LinearSplit).unwrap();
    let region = Region::<f64>::new([1., 1.], [2., 2.]).unwrap();
    for id in 0..10 {
        tree.insert(region.clone(), id).unwrap();
    }
    check_invariants(&tree);
    assert_eq!(ids_of(&tree.intersection_query(&region)).len(), 10);

    let remaining: HashSet<_> = (0..10).filter(|id| id % 3 != 0).collect();
    for id in (0..10).filter(|id| id % 3 == 0) {
        assert!(tree.remove(&region, id));
    }
    let found: HashSet<_> = tree
        .intersection_query(&region)
        .into_iter()
        .map(Record::id)
        .collect();
    assert_eq!(found, remaining);
}
