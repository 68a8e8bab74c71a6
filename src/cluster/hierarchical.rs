//! Hierarchical (agglomerative) clustering.
//!
//! Bottom-up clustering: start with every point as its own cluster and
//! repeatedly merge the closest pair until k clusters remain.
//!
//! # Linkage Methods
//!
//! The key choice: how do we define "distance between clusters"? The caller
//! decides; there is no default.
//!
//! | Linkage | Formula | Effect |
//! |---------|---------|--------|
//! | Single | min(d(a,b)) for a∈A, b∈B | Chaining; elongated clusters |
//! | Complete | max(d(a,b)) | Compact, spherical clusters |
//! | Average | mean(d(a,b)) | Balanced compromise |
//!
//! # Merge Order
//!
//! Each step scans the upper triangle of the cluster distance matrix in
//! row-major order and merges the first minimal pair `(i, j)`, `i < j`.
//! Cluster `j` is absorbed into cluster `i`: its members are appended to
//! `i`'s, `j` is removed, and later clusters shift down by one. Only the
//! merged cluster's row and column are recomputed.
//!
//! Self-distances on the diagonal are never candidates.
//!
//! # Complexity
//!
//! O(n²) memory for the point distance matrix. Each merge costs an O(m²)
//! scan over the m remaining clusters plus a linkage update that touches
//! every point pair across the merged cluster and the others.

use super::traits::Clustering;
use super::util::{self, DistanceMatrix, Point};
use crate::error::Result;
use crate::metric::{Euclidean, Metric};

/// Linkage method for hierarchical clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Linkage {
    /// Single linkage: minimum distance between clusters.
    Single,
    /// Complete linkage: maximum distance between clusters.
    Complete,
    /// Average linkage: mean distance between clusters.
    Average,
}

impl Linkage {
    /// Distance between clusters `a` and `b` from the point distance matrix.
    fn between(self, points: &DistanceMatrix, a: &[usize], b: &[usize]) -> f64 {
        let pairs = a.iter().flat_map(|&i| b.iter().map(move |&j| points.get(i, j)));
        match self {
            Linkage::Single => pairs.fold(f64::INFINITY, f64::min),
            Linkage::Complete => pairs.fold(f64::NEG_INFINITY, f64::max),
            Linkage::Average => pairs.sum::<f64>() / (a.len() * b.len()) as f64,
        }
    }
}

/// One merge step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Merge {
    /// Position of the surviving cluster at the time of the merge.
    pub kept: usize,
    /// Position of the absorbed cluster at the time of the merge.
    pub absorbed: usize,
    /// Linkage distance between the two clusters.
    pub distance: f64,
    /// Size of the merged cluster.
    pub size: usize,
}

/// Result of a hierarchical clustering run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HierarchicalFit {
    /// Point indices per cluster. Members appear in merge order.
    pub clusters: Vec<Vec<usize>>,
    /// Merge history, in order.
    pub merges: Vec<Merge>,
}

impl HierarchicalFit {
    /// Number of clusters.
    pub fn n_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Cluster index for every input point.
    pub fn labels(&self) -> Vec<usize> {
        let n = self.clusters.iter().map(Vec::len).sum();
        let mut labels = vec![0; n];
        for (c, members) in self.clusters.iter().enumerate() {
            for &i in members {
                labels[i] = c;
            }
        }
        labels
    }

    /// The points of each cluster.
    pub fn members(&self, data: &[Point]) -> Vec<Vec<Point>> {
        util::collect_members(data, &self.clusters)
    }
}

/// Hierarchical (agglomerative) clustering.
#[derive(Debug, Clone)]
pub struct Hierarchical<M = Euclidean> {
    /// Number of clusters to produce.
    n_clusters: usize,
    /// Linkage method.
    linkage: Linkage,
    metric: M,
}

impl Hierarchical {
    /// Create a new hierarchical clusterer using Euclidean point distances.
    pub fn new(n_clusters: usize, linkage: Linkage) -> Self {
        Self {
            n_clusters,
            linkage,
            metric: Euclidean,
        }
    }
}

impl<M> Hierarchical<M> {
    /// Set linkage method.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Use a different point distance function.
    pub fn with_metric<N: Metric>(self, metric: N) -> Hierarchical<N> {
        Hierarchical {
            n_clusters: self.n_clusters,
            linkage: self.linkage,
            metric,
        }
    }
}

impl<M: Metric> Hierarchical<M> {
    /// Merge clusters until `n_clusters` remain.
    pub fn fit(&self, data: &[Point]) -> Result<HierarchicalFit> {
        util::validate_dataset(data)?;
        let n = data.len();
        util::check_cluster_count(self.n_clusters, n)?;

        let points = DistanceMatrix::pairwise(data, &self.metric)?;
        let mut clusters: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
        let mut dist: Vec<Vec<f64>> = (0..points.n_rows())
            .map(|i| points.row(i).to_vec())
            .collect();
        let mut merges = Vec::with_capacity(n - self.n_clusters);

        while clusters.len() > self.n_clusters {
            let (kept, absorbed, distance) = closest_pair(&dist);

            let moved = clusters.remove(absorbed);
            clusters[kept].extend(moved);
            dist.remove(absorbed);
            for row in &mut dist {
                row.remove(absorbed);
            }

            for j in 0..clusters.len() {
                let d = if j == kept {
                    0.0
                } else {
                    self.linkage.between(&points, &clusters[kept], &clusters[j])
                };
                dist[kept][j] = d;
                dist[j][kept] = d;
            }

            let size = clusters[kept].len();
            tracing::debug!(
                kept,
                absorbed,
                distance,
                size,
                remaining = clusters.len(),
                "merged clusters"
            );
            merges.push(Merge {
                kept,
                absorbed,
                distance,
                size,
            });
        }

        Ok(HierarchicalFit { clusters, merges })
    }
}

impl<M: Metric> Clustering for Hierarchical<M> {
    fn fit_predict(&self, data: &[Point]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels())
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}

/// First minimal off-diagonal entry `(i, j, d)` with `i < j`, row-major.
///
/// Requires at least two clusters.
fn closest_pair(dist: &[Vec<f64>]) -> (usize, usize, f64) {
    let mut best = (0, 1, f64::INFINITY);
    for (i, row) in dist.iter().enumerate() {
        for (j, &d) in row.iter().enumerate().skip(i + 1) {
            if d < best.2 {
                best = (i, j, d);
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn line(xs: &[f64]) -> Vec<Point> {
        xs.iter().map(|&x| vec![x]).collect()
    }

    #[test]
    fn test_hierarchical_basic() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
        ];

        let labels = Hierarchical::new(2, Linkage::Average).fit_predict(&data).unwrap();

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_single_vs_complete_linkage() {
        let data = line(&[0.0, 2.0, 4.0, 6.5, 7.0]);

        let single = Hierarchical::new(2, Linkage::Single).fit(&data).unwrap();
        assert_eq!(single.clusters, vec![vec![0, 1, 2], vec![3, 4]]);

        let complete = Hierarchical::new(2, Linkage::Complete).fit(&data).unwrap();
        assert_eq!(complete.clusters, vec![vec![0, 1], vec![2, 3, 4]]);
    }

    #[test]
    fn test_merge_history() {
        let data = line(&[0.0, 2.0, 4.0, 6.5, 7.0]);
        let fit = Hierarchical::new(2, Linkage::Single).fit(&data).unwrap();

        assert_eq!(
            fit.merges,
            vec![
                Merge {
                    kept: 3,
                    absorbed: 4,
                    distance: 0.5,
                    size: 2,
                },
                Merge {
                    kept: 0,
                    absorbed: 1,
                    distance: 2.0,
                    size: 2,
                },
                Merge {
                    kept: 0,
                    absorbed: 1,
                    distance: 2.0,
                    size: 3,
                },
            ]
        );
    }

    #[test]
    fn test_ties_merge_first_pair() {
        let data = line(&[0.0, 1.0, 2.0]);
        let fit = Hierarchical::new(2, Linkage::Single).fit(&data).unwrap();
        assert_eq!(fit.clusters, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn test_k_one_single_cluster() {
        let data = line(&[5.0, -1.0, 3.0, 3.5, 12.0, 0.0]);
        let fit = Hierarchical::new(1, Linkage::Average).fit(&data).unwrap();

        assert_eq!(fit.n_clusters(), 1);
        let mut members = fit.clusters[0].clone();
        members.sort_unstable();
        assert_eq!(members, (0..data.len()).collect::<Vec<_>>());
        assert_eq!(fit.merges.len(), data.len() - 1);
        assert_eq!(fit.labels(), vec![0; data.len()]);
    }

    #[test]
    fn test_k_equals_n_no_merges() {
        let data = line(&[3.0, 1.0, 2.0]);
        let fit = Hierarchical::new(3, Linkage::Complete).fit(&data).unwrap();

        assert!(fit.merges.is_empty());
        assert_eq!(fit.clusters, vec![vec![0], vec![1], vec![2]]);
        assert_eq!(
            fit.members(&data),
            vec![vec![vec![3.0]], vec![vec![1.0]], vec![vec![2.0]]]
        );
    }

    #[test]
    fn test_duplicate_points_merge_first() {
        // Zero off-diagonal distances are real candidates.
        let data = line(&[0.0, 5.0, 5.0]);
        let fit = Hierarchical::new(2, Linkage::Single).fit(&data).unwrap();
        assert_eq!(fit.clusters, vec![vec![0], vec![1, 2]]);
        assert_eq!(fit.merges[0].distance, 0.0);
    }

    #[test]
    fn test_hierarchical_errors() {
        let empty: Vec<Point> = vec![];
        assert_eq!(Hierarchical::new(1, Linkage::Single).fit(&empty), Err(Error::EmptyInput));

        let data = line(&[0.0, 1.0]);
        assert!(Hierarchical::new(0, Linkage::Single).fit(&data).is_err());
        assert!(Hierarchical::new(3, Linkage::Single).fit(&data).is_err());
    }

    #[test]
    fn test_hierarchical_nan_metric_error() {
        let data = line(&[0.0, 1.0, 2.0]);
        let result = Hierarchical::new(2, Linkage::Single)
            .with_metric(|_: &[f64], _: &[f64]| f64::NAN)
            .fit(&data);
        assert!(matches!(result, Err(Error::NonFiniteDistance { .. })));
    }
}
