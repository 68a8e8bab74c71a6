//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN is a density-based clustering algorithm that groups points based on
//! neighborhood density. Unlike k-means, it:
//!
//! - Discovers clusters of arbitrary shape
//! - Automatically determines the number of clusters
//! - Identifies noise points (outliers)
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: Maximum distance between two points to be neighbors.
//! - **MinPts**: Minimum neighborhood size for a point to be "core". The
//!   neighborhood includes the point itself.
//! - **Core point**: Has at least MinPts points within ε.
//!
//! ## Algorithm Steps
//!
//! 1. Precompute all pairwise distances.
//! 2. For each unvisited point P:
//!    - Mark P visited and find its ε-neighborhood
//!    - If the neighborhood is smaller than MinPts, P is noise
//!    - Else start a new cluster with P and expand from its neighbors
//! 3. Expansion walks a growing queue of neighbors. Each unvisited neighbor Q
//!    is marked visited; if Q is core it joins the cluster and its own
//!    neighbors are queued, otherwise Q is noise.
//!
//! Every point ends in exactly one cluster or in noise, and a label is never
//! revised once given.
//!
//! ## Border Points
//!
//! Classic DBSCAN attaches non-core points that lie within ε of a core point
//! ("border points") to that core point's cluster. This implementation does
//! not: clusters contain only core points, and border points are reported as
//! noise. Lower `min_pts` or raise `epsilon` if border points matter.
//!
//! ## Complexity
//!
//! - **Time**: O(n²) distance evaluations.
//! - **Space**: O(n²) for the distance matrix.
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use super::traits::Clustering;
use super::util::{self, DistanceMatrix, Point};
use crate::error::{Error, Result};
use crate::metric::{Euclidean, Metric};

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct Dbscan<M = Euclidean> {
    /// Epsilon: maximum distance for neighborhood.
    epsilon: f64,
    /// Minimum points for core point classification.
    min_pts: usize,
    metric: M,
}

/// Result of a DBSCAN run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DbscanFit {
    /// Density-connected clusters, in discovery order. Each starts with the
    /// core point that opened it.
    pub clusters: Vec<Vec<usize>>,
    /// Noise points, in dataset order.
    pub noise: Vec<usize>,
}

impl DbscanFit {
    /// Number of clusters, excluding noise.
    pub fn n_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Cluster index for every point; noise points get `n_clusters()`, i.e.
    /// they form a final "noise cluster".
    pub fn labels(&self) -> Vec<usize> {
        let noise_cluster = self.clusters.len();
        self.labels_with_noise()
            .into_iter()
            .map(|l| l.unwrap_or(noise_cluster))
            .collect()
    }

    /// Cluster index for every point, `None` for noise.
    pub fn labels_with_noise(&self) -> Vec<Option<usize>> {
        let n = self.clusters.iter().map(Vec::len).sum::<usize>() + self.noise.len();
        let mut labels = vec![None; n];
        for (c, members) in self.clusters.iter().enumerate() {
            for &i in members {
                labels[i] = Some(c);
            }
        }
        labels
    }

    /// All clusters followed by the (possibly empty) noise cluster.
    pub fn partition(&self) -> Vec<Vec<usize>> {
        let mut out = self.clusters.clone();
        out.push(self.noise.clone());
        out
    }

    /// The points of each cluster of [`partition`](Self::partition).
    pub fn members(&self, data: &[Point]) -> Vec<Vec<Point>> {
        util::collect_members(data, &self.partition())
    }
}

impl Dbscan {
    /// Create a new DBSCAN clusterer using Euclidean distance.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Maximum distance between two points to be neighbors.
    /// * `min_pts` - Minimum neighborhood size (including the point itself)
    ///   for a core point.
    ///
    /// # Typical Values
    ///
    /// - `epsilon`: Often determined by k-distance plot (k = min_pts - 1).
    /// - `min_pts`: 2 * dimension is a common heuristic.
    pub fn new(epsilon: f64, min_pts: usize) -> Self {
        Self {
            epsilon,
            min_pts,
            metric: Euclidean,
        }
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(0.5, 5)
    }
}

impl<M> Dbscan<M> {
    /// Set epsilon (neighborhood radius).
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set minimum points for core classification.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Use a different distance function.
    pub fn with_metric<N: Metric>(self, metric: N) -> Dbscan<N> {
        Dbscan {
            epsilon: self.epsilon,
            min_pts: self.min_pts,
            metric,
        }
    }

    /// Indices within epsilon of `point_idx`, including itself.
    fn region_query(&self, dm: &DistanceMatrix, point_idx: usize) -> Vec<usize> {
        dm.row(point_idx)
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d <= self.epsilon)
            .map(|(idx, _)| idx)
            .collect()
    }
}

impl<M: Metric> Dbscan<M> {
    /// Cluster `data`.
    pub fn fit(&self, data: &[Point]) -> Result<DbscanFit> {
        util::validate_dataset(data)?;
        let n = data.len();

        // NaN fails this check too.
        if !(self.epsilon >= 0.0 && self.epsilon.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be finite and non-negative",
            });
        }

        if self.min_pts == 0 {
            return Err(Error::InvalidParameter {
                name: "min_pts",
                message: "must be at least 1",
            });
        }

        let dm = DistanceMatrix::pairwise(data, &self.metric)?;
        let mut visited = vec![false; n];
        let mut is_noise = vec![false; n];
        let mut clusters: Vec<Vec<usize>> = Vec::new();

        for point_idx in 0..n {
            if visited[point_idx] {
                continue;
            }
            visited[point_idx] = true;

            let mut queue = self.region_query(&dm, point_idx);
            if queue.len() < self.min_pts {
                is_noise[point_idx] = true;
                continue;
            }

            // Start new cluster and expand through the queue (no recursion).
            let mut cluster = vec![point_idx];
            let mut cursor = 0;
            while cursor < queue.len() {
                let neighbor_idx = queue[cursor];
                cursor += 1;

                if visited[neighbor_idx] {
                    continue;
                }
                visited[neighbor_idx] = true;

                let neighbor_neighbors = self.region_query(&dm, neighbor_idx);
                if neighbor_neighbors.len() < self.min_pts {
                    is_noise[neighbor_idx] = true;
                    continue;
                }

                cluster.push(neighbor_idx);
                queue.extend(neighbor_neighbors.into_iter().filter(|&nn| !visited[nn]));
            }

            tracing::debug!(
                cluster = clusters.len(),
                seed = point_idx,
                size = cluster.len(),
                "dbscan cluster formed"
            );
            clusters.push(cluster);
        }

        let noise: Vec<usize> = (0..n).filter(|&i| is_noise[i]).collect();
        tracing::debug!(clusters = clusters.len(), noise = noise.len(), "dbscan finished");

        Ok(DbscanFit { clusters, noise })
    }
}

impl<M: Metric> Clustering for Dbscan<M> {
    /// Noise points are placed in a final "noise cluster" so callers can
    /// treat labels as a partition without `Option`.
    fn fit_predict(&self, data: &[Point]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels())
    }

    /// DBSCAN discovers clusters dynamically, so this returns 0.
    ///
    /// To get the actual number of clusters, examine the result of `fit`.
    fn n_clusters(&self) -> usize {
        0 // Unknown until fit
    }
}

/// Extended DBSCAN interface with noise detection.
pub trait DbscanExt {
    /// Fit and predict, returning labels where noise is marked as `None`.
    fn fit_predict_with_noise(&self, data: &[Point]) -> Result<Vec<Option<usize>>>;
}

impl<M: Metric> DbscanExt for Dbscan<M> {
    fn fit_predict_with_noise(&self, data: &[Point]) -> Result<Vec<Option<usize>>> {
        Ok(self.fit(data)?.labels_with_noise())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Manhattan;

    #[test]
    fn test_dbscan_two_clusters() {
        // Two well-separated clusters
        let data = vec![
            // Cluster 1: around (0, 0)
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
            vec![0.05, 0.05],
            // Cluster 2: around (5, 5)
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
            vec![5.1, 5.1],
            vec![5.05, 5.05],
        ];

        let dbscan = Dbscan::new(0.3, 3);
        let labels = dbscan.fit_predict(&data).unwrap();

        assert_eq!(labels.len(), 10);

        // First 5 should be in same cluster
        let cluster1 = labels[0];
        for label in &labels[1..5] {
            assert_eq!(*label, cluster1);
        }

        // Last 5 should be in same cluster
        let cluster2 = labels[5];
        for label in &labels[6..10] {
            assert_eq!(*label, cluster2);
        }

        assert_ne!(cluster1, cluster2);
        assert!(dbscan.fit(&data).unwrap().noise.is_empty());
    }

    #[test]
    fn test_dbscan_with_noise() {
        // Two clusters plus an outlier
        let data = vec![
            // Cluster 1
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
            // Outlier
            vec![100.0, 100.0],
            // Cluster 2
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
            vec![5.1, 5.1],
        ];

        let dbscan = Dbscan::new(0.3, 3);
        let labels = dbscan.fit_predict_with_noise(&data).unwrap();

        assert_eq!(labels.len(), 9);
        assert!(labels[4].is_none());
        for (i, label) in labels.iter().enumerate() {
            if i != 4 {
                assert!(label.is_some());
            }
        }

        // Noise forms the trailing cluster in the plain labels.
        let plain = dbscan.fit_predict(&data).unwrap();
        assert_eq!(plain[4], 2);
    }

    #[test]
    fn test_dbscan_all_noise() {
        // Points too far apart
        let data = vec![
            vec![0.0, 0.0],
            vec![10.0, 0.0],
            vec![0.0, 10.0],
            vec![10.0, 10.0],
        ];

        let dbscan = Dbscan::new(0.5, 3);
        let labels = dbscan.fit_predict_with_noise(&data).unwrap();

        for label in labels {
            assert!(label.is_none());
        }
    }

    #[test]
    fn test_dbscan_zero_epsilon_all_noise() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
        let fit = Dbscan::new(0.0, 2).fit(&data).unwrap();

        assert!(fit.clusters.is_empty());
        assert_eq!(fit.noise, vec![0, 1, 2]);
        assert_eq!(fit.partition(), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_dbscan_large_epsilon_one_cluster() {
        let data = vec![vec![0.0, 0.0], vec![3.0, 4.0], vec![-7.0, 2.0], vec![9.0, 9.0]];
        let fit = Dbscan::new(1000.0, 1).fit(&data).unwrap();

        assert_eq!(fit.clusters, vec![vec![0, 1, 2, 3]]);
        assert!(fit.noise.is_empty());
        assert_eq!(fit.partition(), vec![vec![0, 1, 2, 3], vec![]]);
    }

    #[test]
    fn test_dbscan_all_one_cluster() {
        // All points close together
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![0.1, 0.1],
        ];

        let dbscan = Dbscan::new(0.5, 2);
        let labels = dbscan.fit_predict(&data).unwrap();

        let cluster = labels[0];
        for label in labels {
            assert_eq!(label, cluster);
        }
    }

    #[test]
    fn test_dbscan_border_points_are_noise() {
        // Only the middle point has three points within reach.
        let data = vec![vec![0.0], vec![1.0], vec![2.0], vec![10.0]];
        let fit = Dbscan::new(1.0, 3).fit(&data).unwrap();

        assert_eq!(fit.clusters, vec![vec![1]]);
        assert_eq!(fit.noise, vec![0, 2, 3]);
    }

    #[test]
    fn test_dbscan_neighbors_tracked_by_dataset_index() {
        // The outlier comes first, so neighbor-list positions and dataset
        // indices disagree for the cluster that follows.
        let data = vec![vec![50.0], vec![0.0], vec![0.3], vec![0.6]];
        let fit = Dbscan::new(0.5, 2).fit(&data).unwrap();

        assert_eq!(fit.clusters, vec![vec![1, 2, 3]]);
        assert_eq!(fit.noise, vec![0]);
        assert_eq!(fit.labels(), vec![1, 0, 0, 0]);
    }

    #[test]
    fn test_dbscan_members_partition() {
        let data = vec![vec![0.0], vec![0.2], vec![9.0]];
        let fit = Dbscan::new(0.5, 2).fit(&data).unwrap();

        assert_eq!(
            fit.members(&data),
            vec![vec![vec![0.0], vec![0.2]], vec![vec![9.0]]]
        );
    }

    #[test]
    fn test_dbscan_custom_metric() {
        // Diagonal neighbors are 1.4 apart in L2 but 2.0 in L1.
        let data = vec![vec![0.0, 0.0], vec![0.7, 0.7], vec![1.4, 1.4]];
        let l2 = Dbscan::new(1.0, 2).fit(&data).unwrap();
        let l1 = Dbscan::new(1.0, 2).with_metric(Manhattan).fit(&data).unwrap();

        assert_eq!(l2.n_clusters(), 1);
        assert_eq!(l1.n_clusters(), 0);
    }

    #[test]
    fn test_dbscan_empty() {
        let data: Vec<Point> = vec![];
        let dbscan = Dbscan::new(0.5, 3);
        assert_eq!(dbscan.fit(&data), Err(Error::EmptyInput));
    }

    #[test]
    fn test_dbscan_invalid_params() {
        let data = vec![vec![0.0, 0.0]];

        let dbscan = Dbscan::new(-1.0, 3);
        assert!(dbscan.fit_predict(&data).is_err());

        let dbscan = Dbscan::new(f64::NAN, 3);
        assert!(dbscan.fit_predict(&data).is_err());

        let dbscan = Dbscan::new(0.5, 0);
        assert!(dbscan.fit_predict(&data).is_err());
    }

    #[test]
    fn test_dbscan_chain() {
        // Chain of points - DBSCAN should connect them
        let data: Vec<Point> = (0..10).map(|i| vec![i as f64 * 0.3, 0.0]).collect();

        let dbscan = Dbscan::new(0.5, 2);
        let labels = dbscan.fit_predict(&data).unwrap();

        let cluster = labels[0];
        for label in labels {
            assert_eq!(label, cluster);
        }
    }

    #[test]
    fn test_dbscan_nan_metric_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        let result = Dbscan::new(0.5, 2)
            .with_metric(|_: &[f64], _: &[f64]| f64::NAN)
            .fit(&data);
        assert!(matches!(result, Err(Error::NonFiniteDistance { .. })));
    }
}
