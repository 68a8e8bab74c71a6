//! K-means clustering.
//!
//! Partitions data into k clusters, each represented by the coordinate-wise
//! mean of its members.
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize k centroids (see [`Init`], or supply them directly)
//! 2. **Assign**: each point → nearest centroid
//! 3. **Update**: each centroid → mean of assigned points
//! 4. Repeat until the assignment is stable and no cluster is empty, or the
//!    iteration budget runs out
//!
//! The metric is pluggable. Means minimize squared Euclidean distance, so
//! with other metrics the update step is a heuristic, not an exact
//! minimization.
//!
//! # Empty Clusters
//!
//! A centroid that attracts no points keeps its position. An empty cluster
//! keeps the loop running, so a permanently starved centroid (e.g. a
//! duplicate seed under [`Init::Random`]) spends the whole budget and the
//! result reports `converged == false` with an empty cluster in it.

use super::lloyd;
use super::seeding::Init;
use super::traits::Clustering;
use super::util::{self, Point};
use crate::error::{Error, Result};
use crate::metric::{Euclidean, Metric};
use rand::prelude::*;

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans<M = Euclidean> {
    /// Number of clusters.
    k: usize,
    /// Maximum iterations.
    max_iter: usize,
    /// Random seed.
    seed: Option<u64>,
    /// Seeding strategy when no centroids are supplied.
    init: Init,
    /// Caller-supplied initial centroids.
    centroids: Option<Vec<Point>>,
    metric: M,
}

/// Result of a k-means run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KmeansFit {
    /// Final centroids, one per cluster.
    pub centroids: Vec<Point>,
    /// Cluster index for every input point.
    pub labels: Vec<usize>,
    /// Number of assign/update iterations performed.
    pub iterations: usize,
    /// Whether the assignment stabilized with no empty cluster.
    pub converged: bool,
    /// Sum of distances from each point to the centroid it was assigned to.
    pub inertia: f64,
}

impl KmeansFit {
    /// Number of clusters (including empty ones).
    pub fn n_clusters(&self) -> usize {
        self.centroids.len()
    }

    /// Point indices per cluster, in dataset order.
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        util::group_by_label(&self.labels, self.centroids.len())
    }

    /// The points of each cluster.
    ///
    /// `data` must be the dataset this result was fitted on.
    pub fn members(&self, data: &[Point]) -> Vec<Vec<Point>> {
        util::collect_members(data, &self.clusters())
    }
}

impl Kmeans {
    /// Create a new K-means clusterer using Euclidean distance.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            seed: None,
            init: Init::Random,
            centroids: None,
            metric: Euclidean,
        }
    }
}

impl<M> Kmeans<M> {
    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the seeding strategy.
    pub fn with_init(mut self, init: Init) -> Self {
        self.init = init;
        self
    }

    /// Start from these centroids instead of seeding.
    ///
    /// Makes the run fully deterministic.
    pub fn with_centroids(mut self, centroids: Vec<Point>) -> Self {
        self.centroids = Some(centroids);
        self
    }

    /// Use a different distance function.
    pub fn with_metric<N: Metric>(self, metric: N) -> Kmeans<N> {
        Kmeans {
            k: self.k,
            max_iter: self.max_iter,
            seed: self.seed,
            init: self.init,
            centroids: self.centroids,
            metric,
        }
    }
}

impl<M: Metric> Kmeans<M> {
    /// Fit the model.
    ///
    /// Uses a generator seeded from [`with_seed`](Self::with_seed) if set,
    /// otherwise the thread-local generator.
    pub fn fit(&self, data: &[Point]) -> Result<KmeansFit> {
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.fit_with_rng(data, &mut rng)
    }

    /// Fit the model, drawing seeds from a caller-owned generator.
    pub fn fit_with_rng<R>(&self, data: &[Point], rng: &mut R) -> Result<KmeansFit>
    where
        R: Rng + ?Sized,
    {
        let d = util::validate_dataset(data)?;
        let n = data.len();
        util::check_cluster_count(self.k, n)?;

        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }

        let initial = match &self.centroids {
            Some(given) => {
                validate_centroids(given, self.k, d)?;
                given.clone()
            }
            None => self
                .init
                .select(data, self.k, &self.metric, rng)?
                .into_iter()
                .map(|i| data[i].clone())
                .collect(),
        };

        let out = lloyd::run(data, &self.metric, initial, self.max_iter, |_, members| {
            Ok(mean(data, members, d))
        })?;

        let inertia: f64 = out.assigned_distances.iter().sum();
        tracing::debug!(
            k = self.k,
            iterations = out.iterations,
            converged = out.converged,
            inertia,
            "k-means finished"
        );

        Ok(KmeansFit {
            centroids: out.centroids,
            labels: out.labels,
            iterations: out.iterations,
            converged: out.converged,
            inertia,
        })
    }
}

impl<M: Metric> Clustering for Kmeans<M> {
    fn fit_predict(&self, data: &[Point]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

fn validate_centroids(centroids: &[Point], k: usize, d: usize) -> Result<()> {
    if centroids.len() != k {
        return Err(Error::InvalidParameter {
            name: "centroids",
            message: "must contain exactly k points",
        });
    }
    for c in centroids {
        if c.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: c.len(),
            });
        }
        if c.iter().any(|x| !x.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "centroids",
                message: "coordinates must be finite",
            });
        }
    }
    Ok(())
}

/// Coordinate-wise mean of a non-empty member list.
fn mean(data: &[Point], members: &[usize], d: usize) -> Point {
    let mut sum = vec![0.0; d];
    for &i in members {
        for (acc, x) in sum.iter_mut().zip(data[i].iter()) {
            *acc += x;
        }
    }
    let count = members.len() as f64;
    sum.into_iter().map(|s| s / count).collect()
}
