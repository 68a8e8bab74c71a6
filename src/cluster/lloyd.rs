//! The assign / relocate loop shared by k-means and k-medoids.
//!
//! Each iteration:
//!
//! 1. Build the n x k distance matrix from points to the current centroids.
//! 2. Assign every point to its nearest centroid (ties: lowest centroid index).
//! 3. Ask the caller's relocation rule for a new centroid per non-empty
//!    cluster. Empty clusters keep their previous centroid.
//!
//! The loop stops once an iteration leaves the assignment unchanged with no
//! empty cluster, or when `max_iter` iterations have run. A starved centroid
//! therefore keeps the loop going until the budget is spent, and the result
//! may then contain empty clusters.
//!
//! When the budget runs out, the points are assigned once more to the final
//! centroids, so the returned labels always match the returned centroids.

use super::util::{argmin, group_by_label, DistanceMatrix, Point};
use crate::error::Result;
use crate::metric::Metric;

/// State after the loop finishes.
#[derive(Debug, Clone)]
pub(crate) struct Relocation {
    pub(crate) centroids: Vec<Point>,
    pub(crate) labels: Vec<usize>,
    /// Distance from each point to its assigned centroid (last assignment).
    pub(crate) assigned_distances: Vec<f64>,
    pub(crate) iterations: usize,
    pub(crate) converged: bool,
}

/// Run the loop from `centroids`.
///
/// `relocate(cluster, members)` returns the new centroid for a non-empty
/// cluster; `members` are dataset indices in ascending order.
pub(crate) fn run<M, F>(
    data: &[Point],
    metric: &M,
    mut centroids: Vec<Point>,
    max_iter: usize,
    mut relocate: F,
) -> Result<Relocation>
where
    M: Metric,
    F: FnMut(usize, &[usize]) -> Result<Point>,
{
    let n = data.len();
    let k = centroids.len();
    let mut labels = vec![usize::MAX; n];
    let mut assigned_distances = vec![0.0; n];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iter {
        let changed = assign(data, &centroids, metric, &mut labels, &mut assigned_distances)?;

        let clusters = group_by_label(&labels, k);
        let empty = clusters.iter().filter(|c| c.is_empty()).count();
        for (c, members) in clusters.iter().enumerate() {
            if !members.is_empty() {
                centroids[c] = relocate(c, members)?;
            }
        }

        iterations += 1;
        tracing::debug!(iteration = iterations, changed, empty, "relocation step");

        if !changed && empty == 0 {
            converged = true;
            break;
        }
    }

    if !converged {
        tracing::debug!(max_iter, "iteration budget exhausted before convergence");
        assign(data, &centroids, metric, &mut labels, &mut assigned_distances)?;
    }

    Ok(Relocation {
        centroids,
        labels,
        assigned_distances,
        iterations,
        converged,
    })
}

/// Assign every point to its nearest centroid, recording the distance.
///
/// Returns whether any label changed.
fn assign<M: Metric>(
    data: &[Point],
    centroids: &[Point],
    metric: &M,
    labels: &mut [usize],
    assigned_distances: &mut [f64],
) -> Result<bool> {
    let dm = DistanceMatrix::between(data, centroids, metric)?;

    let mut changed = false;
    for i in 0..data.len() {
        // k >= 1, so every row has a minimum.
        let best = argmin(dm.row(i)).unwrap_or(0);
        if labels[i] != best {
            labels[i] = best;
            changed = true;
        }
        assigned_distances[i] = dm.get(i, best);
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Euclidean;

    fn mean_rule(data: &[Point]) -> impl FnMut(usize, &[usize]) -> Result<Point> + '_ {
        move |_, members| {
            let d = data[0].len();
            let mut c = vec![0.0; d];
            for &i in members {
                for (acc, x) in c.iter_mut().zip(&data[i]) {
                    *acc += x;
                }
            }
            Ok(c.into_iter().map(|s| s / members.len() as f64).collect())
        }
    }

    #[test]
    fn test_converges_on_separated_groups() {
        let data = vec![vec![0.0], vec![1.0], vec![9.0], vec![11.0]];
        let start = vec![vec![0.0], vec![1.0]];
        let out = run(&data, &Euclidean, start, 50, mean_rule(&data)).unwrap();

        assert!(out.converged);
        assert_eq!(out.iterations, 3);
        assert_eq!(out.labels, vec![0, 0, 1, 1]);
        assert_eq!(out.centroids, vec![vec![0.5], vec![10.0]]);
    }

    #[test]
    fn test_starved_centroid_spends_budget() {
        // Two identical centroids: the second never wins a tie.
        let data = vec![vec![0.0], vec![1.0], vec![2.0]];
        let start = vec![vec![1.0], vec![1.0]];
        let out = run(&data, &Euclidean, start, 7, mean_rule(&data)).unwrap();

        assert!(!out.converged);
        assert_eq!(out.iterations, 7);
        assert!(out.labels.iter().all(|&l| l == 0));
        assert_eq!(out.centroids[1], vec![1.0]);
    }

    #[test]
    fn test_exhausted_budget_reassigns_to_final_centroids() {
        let data = vec![vec![0.0], vec![1.0], vec![9.0], vec![11.0]];
        let start = vec![vec![0.0], vec![1.0]];
        let out = run(&data, &Euclidean, start, 1, mean_rule(&data)).unwrap();

        assert!(!out.converged);
        assert_eq!(out.iterations, 1);
        assert_eq!(out.centroids, vec![vec![0.0], vec![7.0]]);
        assert_eq!(out.labels, vec![0, 0, 1, 1]);
        assert_eq!(out.assigned_distances, vec![0.0, 1.0, 2.0, 4.0]);
    }
}
