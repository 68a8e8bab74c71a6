//! Clustering algorithms for grouping similar points.
//!
//! Every algorithm takes a dataset `&[Point]` (points of equal dimensionality)
//! and a [`Metric`](crate::metric::Metric), Euclidean unless configured
//! otherwise. Results are plain index lists, so they can be mapped back onto
//! the caller's data with `members(data)`.
//!
//! ## Algorithms
//!
//! ### K-means
//!
//! The classic algorithm: assign each point to the nearest centroid, then
//! update centroids to the mean of their points. Repeat.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**:
//! - Clusters are roughly spherical
//! - Clusters have similar sizes
//! - You know k in advance
//!
//! ### K-medoids
//!
//! Same loop, but each cluster is represented by the member with the smallest
//! total distance to the rest. Works with any dissimilarity and resists
//! outliers, at O(|C|²) cost per cluster per iteration.
//!
//! ### Seeding
//!
//! Both k-means and k-medoids start from [`Init`]: uniform random draws,
//! greedy "++" seeding, or canonical D²-weighted k-means++. Seeds come from a
//! generator owned by the caller (`with_seed` or `fit_with_rng`), never from
//! global state.
//!
//! ### Hierarchical (Agglomerative) Clustering
//!
//! Bottom-up: start with each point as its own cluster and repeatedly merge
//! the two closest clusters until k remain. The [`Linkage`] decides what
//! "closest" means for multi-point clusters.
//!
//! ### DBSCAN
//!
//! Density-based clustering that can discover non-convex clusters and identify
//! outliers (noise points). DBSCAN does not require specifying the number of
//! clusters in advance.
//!
//! ## Usage
//!
//! ```rust
//! use clustra::cluster::{Clustering, Dbscan, Hierarchical, Kmeans, Kmedoids, Linkage};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! // K-means from fixed starting centroids
//! let fit = Kmeans::new(2)
//!     .with_centroids(vec![vec![0.0, 0.0], vec![10.0, 10.0]])
//!     .fit(&data)
//!     .unwrap();
//! assert_eq!(fit.labels, vec![0, 0, 1, 1]);
//!
//! // K-medoids: centroids are actual data points
//! let fit = Kmedoids::new(2).with_medoids(vec![0, 3]).fit(&data).unwrap();
//! assert_eq!(fit.labels, vec![0, 0, 1, 1]);
//!
//! // Hierarchical with an explicit linkage
//! let labels = Hierarchical::new(2, Linkage::Single).fit_predict(&data).unwrap();
//! assert_eq!(labels, vec![0, 0, 1, 1]);
//!
//! // Density-based clustering with DBSCAN
//! let fit = Dbscan::new(0.5, 2).fit(&data).unwrap();
//! assert_eq!(fit.clusters, vec![vec![0, 1], vec![2, 3]]);
//! assert!(fit.noise.is_empty());
//! ```

mod dbscan;
mod hierarchical;
mod kmeans;
mod kmedoids;
mod lloyd;
mod seeding;
mod traits;
mod util;

pub use dbscan::{Dbscan, DbscanExt, DbscanFit};
pub use hierarchical::{Hierarchical, HierarchicalFit, Linkage, Merge};
pub use kmeans::{Kmeans, KmeansFit};
pub use kmedoids::{Kmedoids, KmedoidsFit};
pub use seeding::Init;
pub use traits::Clustering;
pub use util::Point;
