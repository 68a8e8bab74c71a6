//! Initial centroid selection for k-means and k-medoids.
//!
//! All strategies return **dataset indices**; k-means copies the points,
//! k-medoids keeps the indices as its medoids.
//!
//! # Strategies
//!
//! - [`Init::Random`]: k indices drawn uniformly *with replacement*. The same
//!   point may be drawn twice, which leaves one of the two centroids starved.
//! - [`Init::PlusPlus`]: greedy "++" seeding. The first index is uniform; each
//!   following one is the unselected point whose *sum* of distances to the
//!   already-chosen centroids is **smallest**.
//! - [`Init::DSquared`]: canonical k-means++ (Arthur & Vassilvitskii, 2007).
//!   Each following index is sampled with probability proportional to D(x)²,
//!   the squared distance to the nearest chosen centroid.
//!
//! ## Note on `PlusPlus`
//!
//! `PlusPlus` is not k-means++. Minimizing the distance sum picks points
//! *close* to the existing seeds, so seeds tend to bunch together instead of
//! spreading out. It always yields k distinct indices and is deterministic
//! after the first draw. Use `DSquared` for the textbook behavior.

use super::util::{checked_distance, Point};
use crate::error::Result;
use crate::metric::Metric;
use rand::prelude::*;

/// Seeding strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Init {
    /// Uniform sampling with replacement.
    #[default]
    Random,
    /// Greedy minimum distance-sum seeding.
    PlusPlus,
    /// D²-weighted sampling (canonical k-means++).
    DSquared,
}

impl Init {
    /// Pick `k` seed indices from `data`.
    ///
    /// Callers validate `data` and `1 <= k <= data.len()` beforehand.
    pub(crate) fn select<M, R>(
        self,
        data: &[Point],
        k: usize,
        metric: &M,
        rng: &mut R,
    ) -> Result<Vec<usize>>
    where
        M: Metric,
        R: Rng + ?Sized,
    {
        let seeds = match self {
            Init::Random => random_indices(data.len(), k, rng),
            Init::PlusPlus => min_distance_sum(data, k, metric, rng)?,
            Init::DSquared => d_squared(data, k, metric, rng)?,
        };
        tracing::debug!(strategy = ?self, ?seeds, "selected initial centroids");
        Ok(seeds)
    }
}

fn random_indices<R: Rng + ?Sized>(n: usize, k: usize, rng: &mut R) -> Vec<usize> {
    (0..k).map(|_| rng.random_range(0..n)).collect()
}

fn min_distance_sum<M, R>(data: &[Point], k: usize, metric: &M, rng: &mut R) -> Result<Vec<usize>>
where
    M: Metric,
    R: Rng + ?Sized,
{
    let n = data.len();
    let mut seeds = Vec::with_capacity(k);
    let mut selected = vec![false; n];
    // Running sum of distances from each point to every chosen seed.
    let mut sums = vec![0.0f64; n];

    let first = rng.random_range(0..n);
    seeds.push(first);
    selected[first] = true;

    while seeds.len() < k {
        let newest = &data[seeds[seeds.len() - 1]];
        for (j, point) in data.iter().enumerate() {
            sums[j] += checked_distance(metric, point, newest)?;
        }

        let mut best: Option<(usize, f64)> = None;
        for (j, &s) in sums.iter().enumerate() {
            if selected[j] {
                continue;
            }
            match best {
                Some((_, b)) if s >= b => {}
                _ => best = Some((j, s)),
            }
        }

        // k <= n, so an unselected point always remains.
        let Some((next, _)) = best else { break };
        seeds.push(next);
        selected[next] = true;
    }

    Ok(seeds)
}

fn d_squared<M, R>(data: &[Point], k: usize, metric: &M, rng: &mut R) -> Result<Vec<usize>>
where
    M: Metric,
    R: Rng + ?Sized,
{
    let n = data.len();
    let mut seeds = Vec::with_capacity(k);
    let mut nearest = vec![f64::INFINITY; n];

    seeds.push(rng.random_range(0..n));

    while seeds.len() < k {
        let newest = &data[seeds[seeds.len() - 1]];
        for (j, point) in data.iter().enumerate() {
            let d = checked_distance(metric, point, newest)?;
            nearest[j] = nearest[j].min(d * d);
        }

        let total: f64 = nearest.iter().sum();
        if total == 0.0 {
            // Every point coincides with a seed.
            seeds.push(rng.random_range(0..n));
            continue;
        }

        let threshold = rng.random::<f64>() * total;
        let mut cumsum = 0.0;
        let mut selected = n - 1;
        for (j, &d) in nearest.iter().enumerate() {
            cumsum += d;
            if d > 0.0 && cumsum >= threshold {
                selected = j;
                break;
            }
        }
        seeds.push(selected);
    }

    Ok(seeds)
}
