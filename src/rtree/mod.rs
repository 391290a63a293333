//! A dynamic RTree supporting insertion and removal after construction.

pub mod builder;
pub mod index;
pub mod metrics;
pub mod node;
pub mod record;
pub mod split;

pub use builder::RTreeBuilder;
pub use index::RTree;
pub use metrics::{MetricsSink, NoopMetrics};
pub use node::{InternalNode, LeafNode, Node};
pub use record::{Record, RecordId};
pub use split::{LinearSplit, QuadraticSplit, RStarSplit, SplitAlgorithm, SplitStrategy};
