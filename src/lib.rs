//! Classical clustering algorithms.
//!
//! `clustra` is a small library of clustering algorithms for dense real-valued
//! points, each parameterized by a caller-chosen distance function.
//!
//! The primary public API is under [`cluster`], which provides:
//! - k-means (random, "++" or D² seeding, or caller-supplied centroids)
//! - k-medoids (same seeding options; centroids are dataset members)
//! - agglomerative hierarchical clustering (single / complete / average linkage)
//! - DBSCAN (density clustering with a trailing noise cluster)
//!
//! Distance functions live in [`metric`].

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod metric;

pub use cluster::{
    Clustering, Dbscan, DbscanExt, DbscanFit, Hierarchical, HierarchicalFit, Init, Kmeans,
    KmeansFit, Kmedoids, KmedoidsFit, Linkage, Merge, Point,
};
pub use error::{Error, Result};
pub use metric::{Euclidean, Manhattan, Metric, SquaredEuclidean};
