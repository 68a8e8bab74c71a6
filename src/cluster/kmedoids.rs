//! K-medoids clustering.
//!
//! Like k-means, but every cluster is represented by one of its own members
//! (the *medoid*) instead of a synthesized mean. This makes the method usable
//! with any dissimilarity, not just ones where averaging points makes sense,
//! and more robust to outliers.
//!
//! # Algorithm (alternating / Voronoi iteration)
//!
//! 1. Pick k initial medoids from the dataset (see [`Init`], or supply indices)
//! 2. **Assign**: each point → nearest medoid
//! 3. **Update**: in each cluster, the member with the smallest total distance
//!    to all other members becomes the new medoid
//! 4. Repeat until stable, or the iteration budget runs out
//!
//! The update scans all member pairs, so one iteration costs O(Σ |C|²)
//! distance evaluations on top of the O(n·k) assignment.
//!
//! This is the simple alternating scheme, not PAM: it never swaps a medoid
//! with a point outside its current cluster, so it converges faster but can
//! stop at a worse local optimum.

use super::lloyd;
use super::seeding::Init;
use super::traits::Clustering;
use super::util::{self, checked_distance, Point};
use crate::error::{Error, Result};
use crate::metric::{Euclidean, Metric};
use rand::prelude::*;

/// K-medoids clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmedoids<M = Euclidean> {
    k: usize,
    max_iter: usize,
    seed: Option<u64>,
    init: Init,
    /// Caller-supplied initial medoids (dataset indices).
    medoids: Option<Vec<usize>>,
    metric: M,
}

/// Result of a k-medoids run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KmedoidsFit {
    /// Dataset index of each cluster's medoid.
    pub medoids: Vec<usize>,
    /// The medoid points, `centroids[c] == data[medoids[c]]`.
    pub centroids: Vec<Point>,
    /// Cluster index for every input point.
    pub labels: Vec<usize>,
    /// Number of assign/update iterations performed.
    pub iterations: usize,
    /// Whether the assignment stabilized with no empty cluster.
    pub converged: bool,
    /// Sum of distances from each point to its medoid.
    pub cost: f64,
}

impl KmedoidsFit {
    /// Number of clusters (including empty ones).
    pub fn n_clusters(&self) -> usize {
        self.medoids.len()
    }

    /// Point indices per cluster, in dataset order.
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        util::group_by_label(&self.labels, self.medoids.len())
    }

    /// The points of each cluster.
    pub fn members(&self, data: &[Point]) -> Vec<Vec<Point>> {
        util::collect_members(data, &self.clusters())
    }
}

impl Kmedoids {
    /// Create a new k-medoids clusterer using Euclidean distance.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            seed: None,
            init: Init::Random,
            medoids: None,
            metric: Euclidean,
        }
    }
}

impl<M> Kmedoids<M> {
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

    /// Start from these medoids (dataset indices) instead of seeding.
    pub fn with_medoids(mut self, medoids: Vec<usize>) -> Self {
        self.medoids = Some(medoids);
        self
    }

    /// Use a different distance function.
    pub fn with_metric<N: Metric>(self, metric: N) -> Kmedoids<N> {
        Kmedoids {
            k: self.k,
            max_iter: self.max_iter,
            seed: self.seed,
            init: self.init,
            medoids: self.medoids,
            metric,
        }
    }
}

impl<M: Metric> Kmedoids<M> {
    /// Fit the model.
    pub fn fit(&self, data: &[Point]) -> Result<KmedoidsFit> {
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.fit_with_rng(data, &mut rng)
    }

    /// Fit the model, drawing seeds from a caller-owned generator.
    pub fn fit_with_rng<R>(&self, data: &[Point], rng: &mut R) -> Result<KmedoidsFit>
    where
        R: Rng + ?Sized,
    {
        util::validate_dataset(data)?;
        let n = data.len();
        util::check_cluster_count(self.k, n)?;

        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }

        let mut medoids = match &self.medoids {
            Some(given) => {
                if given.len() != self.k {
                    return Err(Error::InvalidParameter {
                        name: "medoids",
                        message: "must contain exactly k indices",
                    });
                }
                if given.iter().any(|&i| i >= n) {
                    return Err(Error::InvalidParameter {
                        name: "medoids",
                        message: "index out of range",
                    });
                }
                given.clone()
            }
            None => self.init.select(data, self.k, &self.metric, rng)?,
        };

        let initial: Vec<Point> = medoids.iter().map(|&i| data[i].clone()).collect();
        let metric = &self.metric;

        let out = lloyd::run(data, metric, initial, self.max_iter, |c, members| {
            let best = medoid_of(data, members, metric)?;
            medoids[c] = best;
            Ok(data[best].clone())
        })?;

        let cost: f64 = out.assigned_distances.iter().sum();
        tracing::debug!(
            k = self.k,
            iterations = out.iterations,
            converged = out.converged,
            cost,
            ?medoids,
            "k-medoids finished"
        );

        Ok(KmedoidsFit {
            medoids,
            centroids: out.centroids,
            labels: out.labels,
            iterations: out.iterations,
            converged: out.converged,
            cost,
        })
    }
}

impl<M: Metric> Clustering for Kmedoids<M> {
    fn fit_predict(&self, data: &[Point]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// Member with the smallest total distance to all members; ties go to the
/// earliest member.
fn medoid_of<M: Metric>(data: &[Point], members: &[usize], metric: &M) -> Result<usize> {
    let mut best = members[0];
    let mut best_sum = f64::INFINITY;
    for &candidate in members {
        let mut sum = 0.0;
        for &other in members {
            sum += checked_distance(metric, &data[candidate], &data[other])?;
        }
        if sum < best_sum {
            best_sum = sum;
            best = candidate;
        }
    }
    Ok(best)
}
