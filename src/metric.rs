//! Distance functions.
//!
//! Every algorithm in [`crate::cluster`] is parameterized by a [`Metric`]: a
//! dissimilarity between two points of equal dimensionality. The built-in
//! metrics cover the common cases; any closure `Fn(&[f64], &[f64]) -> f64`
//! is a metric too.
//!
//! ```rust
//! use clustra::metric::{Euclidean, Metric};
//!
//! assert_eq!(Euclidean.distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
//!
//! let chebyshev = |a: &[f64], b: &[f64]| {
//!     a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
//! };
//! assert_eq!(chebyshev.distance(&[0.0, 0.0], &[3.0, 4.0]), 4.0);
//! ```
//!
//! Algorithms assume `distance(a, a) == 0` and symmetry. A metric that
//! returns NaN or infinity makes the calling algorithm fail with
//! [`Error::NonFiniteDistance`](crate::Error::NonFiniteDistance).

/// A dissimilarity between two points.
pub trait Metric {
    /// Distance between `a` and `b`. Both slices have the same length.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}

impl<F> Metric for F
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        self(a, b)
    }
}

/// Euclidean (L2) distance. The default metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl Metric for Euclidean {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        SquaredEuclidean.distance(a, b).sqrt()
    }
}

/// Squared Euclidean distance.
///
/// Not a true metric (no triangle inequality), but it is what k-means
/// actually minimizes and it skips the square root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SquaredEuclidean;

impl Metric for SquaredEuclidean {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| {
                let d = x - y;
                d * d
            })
            .sum()
    }
}

/// Manhattan (L1) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Manhattan;

impl Metric for Manhattan {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_metrics() {
        let a = [1.0, 1.0];
        let b = [4.0, 5.0];

        assert_eq!(Euclidean.distance(&a, &b), 5.0);
        assert_eq!(SquaredEuclidean.distance(&a, &b), 25.0);
        assert_eq!(Manhattan.distance(&a, &b), 7.0);
    }

    #[test]
    fn test_self_distance_is_zero() {
        let p = [0.3, -2.0, 7.5];
        assert_eq!(Euclidean.distance(&p, &p), 0.0);
        assert_eq!(Manhattan.distance(&p, &p), 0.0);
    }

    #[test]
    fn test_closure_is_metric() {
        fn apply<M: Metric>(m: &M) -> f64 {
            m.distance(&[0.0], &[2.0])
        }

        let doubled = |a: &[f64], b: &[f64]| 2.0 * Manhattan.distance(a, b);
        assert_eq!(apply(&doubled), 4.0);
    }
}
