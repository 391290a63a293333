use std::fmt::Debug;

use num_traits::Float;

/// A trait for types that can be used as region coordinates.
///
/// This trait is sealed and cannot be implemented for external types. Areas, margins and
/// distances are all computed in the coordinate type itself, so only floating point types are
/// accepted.
pub trait CoordNum: private::Sealed + Float + Debug + Send + Sync {
    /// Two, used for margins and box centers.
    fn two() -> Self {
        Self::one() + Self::one()
    }
}

impl CoordNum for f32 {}

impl CoordNum for f64 {}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
