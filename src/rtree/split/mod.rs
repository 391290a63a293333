//! Node splitting strategies for dynamic RTrees.

mod algorithm;
mod linear;
mod quadratic;
mod r_star;
mod r#trait;
pub(crate) mod util;

pub use algorithm::SplitAlgorithm;
pub use linear::LinearSplit;
pub use quadratic::QuadraticSplit;
pub use r_star::RStarSplit;
pub use r#trait::SplitStrategy;
