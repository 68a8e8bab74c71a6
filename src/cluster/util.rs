use crate::error::{Error, Result};
use crate::metric::Metric;

/// A point in a dataset.
pub type Point = Vec<f64>;

/// Validate a dataset and return its dimensionality.
///
/// Rejects empty input, zero-length points, ragged points, and non-finite
/// coordinates.
pub(crate) fn validate_dataset(data: &[Point]) -> Result<usize> {
    let first = data.first().ok_or(Error::EmptyInput)?;
    let d = first.len();
    if d == 0 {
        return Err(Error::InvalidParameter {
            name: "dimension",
            message: "must be at least 1",
        });
    }

    for (i, point) in data.iter().enumerate() {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
        if let Some(dim) = point.iter().position(|x| !x.is_finite()) {
            return Err(Error::NonFiniteValue { point: i, dim });
        }
    }

    Ok(d)
}

/// `k` must be in `1..=n`.
pub(crate) fn check_cluster_count(k: usize, n: usize) -> Result<()> {
    if k == 0 || k > n {
        return Err(Error::InvalidClusterCount {
            requested: k,
            n_items: n,
        });
    }
    Ok(())
}

/// Evaluate the metric and reject NaN / infinite results.
#[inline]
pub(crate) fn checked_distance<M: Metric>(metric: &M, a: &[f64], b: &[f64]) -> Result<f64> {
    let value = metric.distance(a, b);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NonFiniteDistance { value })
    }
}

/// Index of the smallest value; ties resolve to the lowest index.
///
/// Returns `None` for an empty slice.
#[inline]
pub(crate) fn argmin(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v >= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Dense, row-major table of precomputed distances.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DistanceMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// `rows.len() x cols.len()` matrix of `metric(rows[i], cols[j])`.
    pub(crate) fn between<M: Metric>(rows: &[Point], cols: &[Point], metric: &M) -> Result<Self> {
        let mut values = Vec::with_capacity(rows.len() * cols.len());
        for a in rows {
            for b in cols {
                values.push(checked_distance(metric, a, b)?);
            }
        }
        Ok(Self {
            rows: rows.len(),
            cols: cols.len(),
            values,
        })
    }

    /// Square matrix of all pairwise distances within `data`.
    pub(crate) fn pairwise<M: Metric>(data: &[Point], metric: &M) -> Result<Self> {
        Self::between(data, data, metric)
    }

    #[inline]
    pub(crate) fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.rows && j < self.cols);
        self.values[i * self.cols + j]
    }

    #[inline]
    pub(crate) fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.cols..(i + 1) * self.cols]
    }

    pub(crate) fn n_rows(&self) -> usize {
        self.rows
    }
}

/// Group point indices by label: `groups[c]` lists the points labeled `c`,
/// in dataset order.
pub(crate) fn group_by_label(labels: &[usize], n_groups: usize) -> Vec<Vec<usize>> {
    let mut groups = vec![Vec::new(); n_groups];
    for (i, &l) in labels.iter().enumerate() {
        groups[l].push(i);
    }
    groups
}

/// Resolve index lists into the points they refer to.
pub(crate) fn collect_members(data: &[Point], groups: &[Vec<usize>]) -> Vec<Vec<Point>> {
    groups
        .iter()
        .map(|g| g.iter().map(|&i| data[i].clone()).collect())
        .collect()
}
