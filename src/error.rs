use thiserror::Error;

/// Errors returned by clustering algorithms in this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("non-finite coordinate at point {point}, dimension {dim}")]
    NonFiniteValue {
        /// Index of the offending point.
        point: usize,
        /// Index of the offending coordinate.
        dim: usize,
    },

    /// The distance function produced NaN or an infinite value.
    #[error("distance function returned a non-finite value: {value}")]
    NonFiniteDistance {
        /// The value returned by the metric.
        value: f64,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
