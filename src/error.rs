use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RTreeError {
    /// Operands disagree on dimensionality, or a configuration value is unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A bound or coordinate accessor was called with an index past the dimension.
    #[error("Index {index} out of range for dimension {dimension}")]
    OutOfRange { index: usize, dimension: usize },
}

impl RTreeError {
    pub(crate) fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        RTreeError::InvalidArgument(format!(
            "Dimensions do not match: expected {}, got {}.",
            expected, actual
        ))
    }
}

pub type Result<T> = std::result::Result<T, RTreeError>;
