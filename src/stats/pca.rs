//! Two-component principal component analysis.
//!
//! The engine standardizes each column, builds the covariance matrix of the
//! standardized data and extracts the two leading eigenvectors by power
//! iteration with deflation. It is sized for the dozen-variable matrices the
//! grade story projects, not as general linear algebra.

use serde::Serialize;

use crate::data::model::{StudentRecord, Variable};

/// Multiply-and-renormalize rounds per eigenvector. Fixed so results are
/// reproducible run to run.
pub const POWER_ITERATIONS: usize = 100;

// ---------------------------------------------------------------------------
// Matrix-level engine
// ---------------------------------------------------------------------------

/// Output of [`pca_matrix`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Components {
    /// Per input row, its coordinates on the first and second axis.
    pub scores: Vec<[f64; 2]>,
    /// The two unit eigenvectors, one weight per input column.
    pub axes: [Vec<f64>; 2],
    pub eigenvalues: [f64; 2],
}

/// Run PCA on `rows`, an n×p matrix with one observation per row.
///
/// Fewer than two rows, or zero columns, yield empty [`Components`].
pub fn pca_matrix(rows: &[Vec<f64>]) -> Components {
    let n = rows.len();
    let p = rows.first().map_or(0, Vec::len);
    if n < 2 || p == 0 {
        return Components::default();
    }
    debug_assert!(rows.iter().all(|r| r.len() == p), "ragged matrix");

    let standardized = standardize(rows, p);
    let cov = covariance(&standardized, p);

    let first = power_iteration(&cov);
    let lambda1 = rayleigh(&cov, &first);
    let deflated = deflate(&cov, &first, lambda1);
    let second = power_iteration(&deflated);
    let lambda2 = rayleigh(&deflated, &second);

    let scores = standardized
        .iter()
        .map(|row| [dot(row, &first), dot(row, &second)])
        .collect();

    Components {
        scores,
        axes: [first, second],
        eigenvalues: [lambda1, lambda2],
    }
}

/// Center each column and divide by its population standard deviation
/// (1 when the column is constant).
fn standardize(rows: &[Vec<f64>], p: usize) -> Vec<Vec<f64>> {
    let n = rows.len() as f64;
    let means: Vec<f64> = (0..p)
        .map(|j| rows.iter().map(|r| r[j]).sum::<f64>() / n)
        .collect();
    let stds: Vec<f64> = (0..p)
        .map(|j| {
            let variance = rows.iter().map(|r| (r[j] - means[j]).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();
            if std == 0.0 || std.is_nan() {
                1.0
            } else {
                std
            }
        })
        .collect();

    rows.iter()
        .map(|r| (0..p).map(|j| (r[j] - means[j]) / stds[j]).collect())
        .collect()
}

/// p×p covariance with the `n - 1` divisor.
fn covariance(data: &[Vec<f64>], p: usize) -> Vec<Vec<f64>> {
    let divisor = (data.len() - 1) as f64;
    let mut cov = vec![vec![0.0; p]; p];
    for (i, cov_row) in cov.iter_mut().enumerate() {
        for (j, cell) in cov_row.iter_mut().enumerate() {
            let sum: f64 = data.iter().map(|r| r[i] * r[j]).sum();
            *cell = sum / divisor;
        }
    }
    cov
}

/// Dominant eigenvector, starting from the uniform unit vector.
///
/// No convergence check: always [`POWER_ITERATIONS`] rounds. A zero product
/// keeps the previous vector.
fn power_iteration(matrix: &[Vec<f64>]) -> Vec<f64> {
    let p = matrix.len();
    let mut vector = vec![1.0 / (p as f64).sqrt(); p];

    for _ in 0..POWER_ITERATIONS {
        let product = mul_vec(matrix, &vector);
        let norm = dot(&product, &product).sqrt();
        if norm == 0.0 || !norm.is_finite() {
            break;
        }
        vector = product.into_iter().map(|v| v / norm).collect();
    }
    vector
}

/// `vᵗ M v`.
fn rayleigh(matrix: &[Vec<f64>], v: &[f64]) -> f64 {
    dot(&mul_vec(matrix, v), v)
}

/// `M − λ v vᵗ`.
fn deflate(matrix: &[Vec<f64>], v: &[f64], lambda: f64) -> Vec<Vec<f64>> {
    matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(j, m)| m - lambda * v[i] * v[j])
                .collect()
        })
        .collect()
}

fn mul_vec(matrix: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    matrix.iter().map(|row| dot(row, v)).collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

// ---------------------------------------------------------------------------
// Record-level API
// ---------------------------------------------------------------------------

/// One of the two extracted axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Component {
    First,
    Second,
}

/// A student placed on the two-axis plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub id: u32,
    pub g3: u8,
    pub pc1: f64,
    pub pc2: f64,
}

/// How much one input variable weighs on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Loading {
    pub variable: Variable,
    pub pc1: f64,
    pub pc2: f64,
}

impl Loading {
    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::First => self.pc1,
            Component::Second => self.pc2,
        }
    }

    /// Absolute loading on `component`.
    pub fn contribution(&self, component: Component) -> f64 {
        self.get(component).abs()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PcaResult {
    pub points: Vec<ProjectedPoint>,
    pub loadings: Vec<Loading>,
    pub eigenvalues: [f64; 2],
}

impl PcaResult {
    /// The `n` loadings with the largest contribution to `component`,
    /// largest first.
    pub fn top_contributors(&self, component: Component, n: usize) -> Vec<Loading> {
        let mut sorted = self.loadings.clone();
        sorted.sort_by(|a, b| {
            b.contribution(component)
                .total_cmp(&a.contribution(component))
        });
        sorted.truncate(n);
        sorted
    }
}

/// Project `records` onto the two leading principal axes of `variables`.
///
/// Callers decide what counts as too few records; below two the result is
/// empty.
pub fn pca(records: &[StudentRecord], variables: &[Variable]) -> PcaResult {
    let rows: Vec<Vec<f64>> = records
        .iter()
        .map(|r| variables.iter().map(|v| v.value(r)).collect())
        .collect();

    let components = pca_matrix(&rows);
    if components.scores.is_empty() {
        return PcaResult::default();
    }
    log::debug!(
        "PCA over {} records × {} variables: eigenvalues {:.4}, {:.4}",
        records.len(),
        variables.len(),
        components.eigenvalues[0],
        components.eigenvalues[1]
    );

    let points = records
        .iter()
        .zip(&components.scores)
        .map(|(r, &[pc1, pc2])| ProjectedPoint {
            id: r.id,
            g3: r.g3,
            pc1,
            pc2,
        })
        .collect();

    let [first, second] = &components.axes;
    let loadings = variables
        .iter()
        .zip(first.iter().zip(second))
        .map(|(&variable, (&pc1, &pc2))| Loading { variable, pc1, pc2 })
        .collect();

    PcaResult {
        points,
        loadings,
        eigenvalues: components.eigenvalues,
    }
}
