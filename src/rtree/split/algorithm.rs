use std::fmt;
use std::str::FromStr;

use crate::error::RTreeError;
use crate::r#type::CoordNum;
use crate::rtree::node::Node;
use crate::rtree::record::Record;
use crate::rtree::split::{LinearSplit, QuadraticSplit, RStarSplit, SplitStrategy};

/// An enum over the built-in split strategies, for choosing one at runtime.
///
/// ```
/// use dynamic_rtree::rtree::split::SplitAlgorithm;
/// use dynamic_rtree::rtree::RTree;
///
/// let algorithm: SplitAlgorithm = "quadratic".parse().unwrap();
/// let tree = RTree::<f64, _>::new(2, 16, algorithm).unwrap();
/// assert_eq!(tree.height(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SplitAlgorithm {
    Linear,
    #[default]
    Quadratic,
    RStar,
}

impl SplitAlgorithm {
    /// All built-in algorithms.
    pub const ALL: [SplitAlgorithm; 3] = [
        SplitAlgorithm::Linear,
        SplitAlgorithm::Quadratic,
        SplitAlgorithm::RStar,
    ];
}

impl<N: CoordNum> SplitStrategy<N> for SplitAlgorithm {
    fn split_records(
        &self,
        records: Vec<Record<N>>,
        capacity: usize,
    ) -> (Vec<Record<N>>, Vec<Record<N>>) {
        match self {
            SplitAlgorithm::Linear => LinearSplit.split_records(records, capacity),
            SplitAlgorithm::Quadratic => QuadraticSplit.split_records(records, capacity),
            SplitAlgorithm::RStar => RStarSplit.split_records(records, capacity),
        }
    }

    fn split_children(
        &self,
        children: Vec<Node<N>>,
        capacity: usize,
    ) -> (Vec<Node<N>>, Vec<Node<N>>) {
        match self {
            SplitAlgorithm::Linear => LinearSplit.split_children(children, capacity),
            SplitAlgorithm::Quadratic => QuadraticSplit.split_children(children, capacity),
            SplitAlgorithm::RStar => RStarSplit.split_children(children, capacity),
        }
    }

    fn forced_reinsertion(&self) -> bool {
        matches!(self, SplitAlgorithm::RStar)
    }

    fn name(&self) -> &'static str {
        match self {
            SplitAlgorithm::Linear => "linear",
            SplitAlgorithm::Quadratic => "quadratic",
            SplitAlgorithm::RStar => "rstar",
        }
    }
}

impl fmt::Display for SplitAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(SplitStrategy::<f64>::name(self))
    }
}

impl FromStr for SplitAlgorithm {
    type Err = RTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(SplitAlgorithm::Linear),
            "quadratic" => Ok(SplitAlgorithm::Quadratic),
            "rstar" | "r*" => Ok(SplitAlgorithm::RStar),
            other => Err(RTreeError::InvalidArgument(format!(
                "Unknown split algorithm {:?}.",
                other
            ))),
        }
    }
}
