//! K-means clustering engine.
//!
//! Lloyd's algorithm with seeded random initialization: centroids start as k
//! distinct rows of the data, then assignment and update steps alternate
//! until the largest centroid displacement falls below the tolerance or the
//! iteration cap is reached.

use log::{debug, trace};
use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::error::{Error, Result};
use crate::geometry::squared_distance;
use crate::matrix::ObservationMatrix;

/// Configuration options for k-means clustering.
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters to find.
    pub k: usize,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Convergence tolerance. If no centroid moves further than this between
    /// iterations, the algorithm stops early.
    pub tolerance: f64,
    /// Seed for centroid initialization. Two runs with the same seed on the
    /// same data produce identical results.
    pub seed: u64,
}

impl KMeansConfig {
    /// Create a new config with default values for max_iterations (300),
    /// tolerance (1e-4) and seed (0).
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: 300,
            tolerance: 1e-4,
            seed: 0,
        }
    }

    /// Customize the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Customize the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Customize the initialization seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Outcome of a single k-means run. Immutable once returned.
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Cluster index in `[0, k)` for every observation.
    pub assignments: Vec<usize>,
    /// Final centroids, one row per cluster.
    pub centroids: Array2<f64>,
    /// Sum of squared distances from each point to its assigned centroid.
    pub inertia: f64,
    /// Number of iterations actually executed.
    pub iterations: usize,
    /// Whether the tolerance criterion (rather than the iteration cap)
    /// terminated the loop.
    pub converged: bool,
}

/// Runs k-means clustering on the provided observations.
///
/// # Arguments
///
/// - `points`: validated observation matrix, one row per sample.
/// - `config`: number of clusters, iteration cap, tolerance and seed.
///
/// # Errors
///
/// `Error::InvalidArgument` if `k` is zero or exceeds the number of samples,
/// if `max_iterations` is zero, or if `tolerance` is not a positive finite
/// number. Validation happens before any iteration; no partial state is
/// produced.
///
/// # Examples
///
/// ```
/// use clusterkit::{kmeans, KMeansConfig, ObservationMatrix};
///
/// let points = ObservationMatrix::from_rows(&[
///     vec![1.0, 2.0],
///     vec![1.5, 1.8],
///     vec![5.0, 8.0],
///     vec![8.0, 8.0],
/// ]).unwrap();
///
/// let config = KMeansConfig::new(2).with_seed(42);
/// let result = kmeans(&points, &config).unwrap();
///
/// assert_eq!(result.assignments.len(), 4);
/// assert_eq!(result.centroids.nrows(), 2);
/// assert!(result.inertia >= 0.0);
/// ```
pub fn kmeans(points: &ObservationMatrix, config: &KMeansConfig) -> Result<KMeansResult> {
    validate_config(points.n_samples(), config)?;
    Ok(run_lloyd(points.view(), config))
}

pub(crate) fn validate_config(n_samples: usize, config: &KMeansConfig) -> Result<()> {
    if config.k == 0 {
        return Err(Error::invalid_argument("k", "must be at least 1"));
    }
    if config.k > n_samples {
        return Err(Error::invalid_argument(
            "k",
            format!(
                "requested {} clusters but only {} samples are available",
                config.k, n_samples
            ),
        ));
    }
    if config.max_iterations == 0 {
        return Err(Error::invalid_argument(
            "max_iterations",
            "must be at least 1",
        ));
    }
    if !config.tolerance.is_finite() || config.tolerance <= 0.0 {
        return Err(Error::invalid_argument(
            "tolerance",
            "must be a positive finite number",
        ));
    }
    Ok(())
}

fn run_lloyd(points: ArrayView2<'_, f64>, config: &KMeansConfig) -> KMeansResult {
    let mut rng = ChaCha20Rng::seed_from_u64(config.seed);
    let mut centroids = init_centroids(points, config.k, &mut rng);

    let tolerance_sq = config.tolerance * config.tolerance;
    let mut assignments = Vec::new();
    let mut iterations = 0;
    let mut converged = false;

    for iter in 0..config.max_iterations {
        assignments = assign_clusters(points, centroids.view());
        let shift_sq = update_centroids(points, &assignments, &mut centroids);
        iterations = iter + 1;
        trace!(
            "k-means iteration {}: max centroid shift {:.3e}",
            iterations,
            shift_sq.sqrt()
        );
        if shift_sq < tolerance_sq {
            converged = true;
            break;
        }
    }

    let inertia = compute_inertia(points, centroids.view(), &assignments);
    debug!(
        "k-means finished: k={}, {} iterations, converged={}, inertia={:.6}",
        config.k, iterations, converged, inertia
    );

    KMeansResult {
        assignments,
        centroids,
        inertia,
        iterations,
        converged,
    }
}

/// Select k distinct rows of `points` uniformly at random as the starting
/// centroids.
///
/// # Panics
///
/// If `k` exceeds the number of rows. The engine validates this before
/// calling; direct callers are responsible for the same check.
pub fn init_centroids<R: Rng + ?Sized>(
    points: ArrayView2<'_, f64>,
    k: usize,
    rng: &mut R,
) -> Array2<f64> {
    let chosen = rand::seq::index::sample(rng, points.nrows(), k);
    let mut centroids = Array2::zeros((k, points.ncols()));
    for (cluster, row) in chosen.into_iter().enumerate() {
        centroids.row_mut(cluster).assign(&points.row(row));
    }
    centroids
}

/// Assign every point to its nearest centroid by squared Euclidean distance.
/// Exact ties go to the lower centroid index.
///
/// # Panics
///
/// If `centroids` has no rows.
pub fn assign_clusters(points: ArrayView2<'_, f64>, centroids: ArrayView2<'_, f64>) -> Vec<usize> {
    points
        .rows()
        .into_iter()
        .map(|point| nearest_centroid(point, centroids))
        .collect()
}

fn nearest_centroid(point: ArrayView1<'_, f64>, centroids: ArrayView2<'_, f64>) -> usize {
    let mut best = 0;
    let mut best_dist = squared_distance(point, centroids.row(0));
    for (index, centroid) in centroids.rows().into_iter().enumerate().skip(1) {
        let dist = squared_distance(point, centroid);
        if dist < best_dist {
            best = index;
            best_dist = dist;
        }
    }
    best
}

/// Recompute each centroid as the mean of its assigned points and return the
/// largest squared displacement any centroid made.
///
/// A cluster with no assigned points keeps its previous centroid. That is
/// deliberate: the centroid stays frozen until a later iteration (or a
/// perturbed re-run) assigns points to it again.
pub fn update_centroids(
    points: ArrayView2<'_, f64>,
    assignments: &[usize],
    centroids: &mut Array2<f64>,
) -> f64 {
    let k = centroids.nrows();
    let dim = centroids.ncols();

    let mut sums = Array2::<f64>::zeros((k, dim));
    let mut counts = vec![0_usize; k];
    for (point, &cluster) in points.rows().into_iter().zip(assignments) {
        counts[cluster] += 1;
        for (d, &value) in point.iter().enumerate() {
            sums[[cluster, d]] += value;
        }
    }

    let mut max_shift_sq = 0.0;
    for cluster in 0..k {
        if counts[cluster] == 0 {
            continue;
        }
        let mean = sums.row(cluster).mapv(|sum| sum / counts[cluster] as f64);
        let shift_sq = squared_distance(centroids.row(cluster), mean.view());
        if shift_sq > max_shift_sq {
            max_shift_sq = shift_sq;
        }
        centroids.row_mut(cluster).assign(&mean);
    }
    max_shift_sq
}

/// Sum of squared distances from each point to its assigned centroid.
pub fn compute_inertia(
    points: ArrayView2<'_, f64>,
    centroids: ArrayView2<'_, f64>,
    assignments: &[usize],
) -> f64 {
    points
        .rows()
        .into_iter()
        .zip(assignments)
        .map(|(point, &cluster)| squared_distance(point, centroids.row(cluster)))
        .sum()
}
