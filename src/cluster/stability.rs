//! Cluster stability under perturbation.
//!
//! The diagnostic re-runs k-means on noisy copies of the data and measures
//! how consistently pairs of points land in the same cluster. A base run on
//! the clean input fixes the canonical cluster identity for the session;
//! every run's labels pass through the centroid-order alignment before the
//! pairwise co-occurrence counts are accumulated. The final score is the
//! mean off-diagonal co-occurrence frequency: near 1 the structure survives
//! the perturbation, near 0 the labels are effectively noise.

use log::debug;
use ndarray::Array2;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;

use crate::cluster::alignment::align_labels;
use crate::cluster::kmeans::{kmeans, KMeansConfig};
use crate::error::{Error, Result};
use crate::matrix::ObservationMatrix;

/// Configuration for the stability diagnostic.
#[derive(Debug, Clone)]
pub struct StabilityConfig {
    /// Total number of clustering runs, including the unperturbed base run.
    pub n_runs: usize,
    /// Standard deviation of the additive Gaussian noise. Zero re-runs the
    /// clean input every time.
    pub noise_scale: f64,
    /// Seed for the perturbation streams. Run `i` draws its noise from a
    /// dedicated stream seeded with `seed + i`, so results do not depend on
    /// execution order or concurrency degree.
    pub seed: u64,
}

impl StabilityConfig {
    /// Create a new config with default values for n_runs (20), noise_scale
    /// (0.05) and seed (0).
    pub fn new() -> Self {
        Self {
            n_runs: 20,
            noise_scale: 0.05,
            seed: 0,
        }
    }

    /// Customize the number of runs.
    pub fn with_n_runs(mut self, n_runs: usize) -> Self {
        self.n_runs = n_runs;
        self
    }

    /// Customize the noise standard deviation.
    pub fn with_noise_scale(mut self, noise_scale: f64) -> Self {
        self.noise_scale = noise_scale;
        self
    }

    /// Customize the perturbation seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Score how robust a k-way clustering of `points` is to small Gaussian
/// perturbations of the input.
///
/// Every run reuses `engine.seed` for centroid initialization (so runs are
/// comparable), while each perturbation draws from its own stream derived
/// from `config.seed`. Runs execute in parallel; the co-occurrence counts
/// are folded sequentially from the per-run label vectors afterwards, so the
/// result is identical at any thread count.
///
/// Empty clusters in any run are tolerated: the engine freezes the unused
/// centroid and the alignment simply ranks it with the rest.
///
/// # Errors
///
/// `Error::InvalidArgument` if `n_runs` is zero, `noise_scale` is negative
/// or non-finite, fewer than two samples are supplied (the off-diagonal mean
/// is undefined for a single point), or the engine validation for `k`
/// fails.
///
/// # Examples
///
/// ```
/// use clusterkit::{cluster_stability_score, KMeansConfig, ObservationMatrix, StabilityConfig};
///
/// let points = ObservationMatrix::from_rows(&[
///     vec![0.0, 0.0],
///     vec![0.1, 0.0],
///     vec![10.0, 0.0],
///     vec![10.1, 0.0],
/// ]).unwrap();
///
/// let engine = KMeansConfig::new(2).with_seed(42);
/// let config = StabilityConfig::new().with_n_runs(5).with_noise_scale(0.01);
/// let score = cluster_stability_score(&points, 2, &engine, &config).unwrap();
/// assert!((0.0..=1.0).contains(&score));
/// ```
pub fn cluster_stability_score(
    points: &ObservationMatrix,
    k: usize,
    engine: &KMeansConfig,
    config: &StabilityConfig,
) -> Result<f64> {
    let n = points.n_samples();
    if config.n_runs == 0 {
        return Err(Error::invalid_argument("n_runs", "must be at least 1"));
    }
    if !config.noise_scale.is_finite() || config.noise_scale < 0.0 {
        return Err(Error::invalid_argument(
            "noise_scale",
            "must be finite and non-negative",
        ));
    }
    if n < 2 {
        return Err(Error::invalid_argument(
            "points",
            "stability requires at least 2 samples",
        ));
    }

    let run_config = KMeansConfig { k, ..engine.clone() };
    crate::cluster::kmeans::validate_config(n, &run_config)?;

    let noise = if config.noise_scale > 0.0 {
        Some(
            Normal::new(0.0, config.noise_scale).map_err(|_| {
                Error::invalid_argument("noise_scale", "must be finite and non-negative")
            })?,
        )
    } else {
        None
    };

    // Run 0 is the unperturbed base; the rest cluster noisy copies. Each run
    // returns its aligned label vector.
    let aligned_runs: Vec<Vec<usize>> = (0..config.n_runs)
        .into_par_iter()
        .map(|run| {
            let result = if run == 0 {
                kmeans(points, &run_config)?
            } else {
                let noisy = perturb(points, noise, config.seed.wrapping_add(run as u64));
                kmeans(&noisy, &run_config)?
            };
            debug!(
                "stability run {}/{}: {} iterations, inertia {:.6}",
                run + 1,
                config.n_runs,
                result.iterations,
                result.inertia
            );
            align_labels(result.centroids.view(), &result.assignments)
        })
        .collect::<Result<_>>()?;

    let co_occurrence = accumulate_co_occurrence(&aligned_runs, n);
    let frequencies = co_occurrence.mapv(|count| count / config.n_runs as f64);

    let total = frequencies.sum();
    let trace = frequencies.diag().sum();
    Ok((total - trace) / (n * (n - 1)) as f64)
}

/// Add Gaussian noise to every coordinate, drawn from a stream owned by this
/// run. `noise` is `None` when the scale is zero.
fn perturb(
    points: &ObservationMatrix,
    noise: Option<Normal<f64>>,
    seed: u64,
) -> ObservationMatrix {
    let mut data = points.as_array().clone();
    if let Some(distribution) = noise {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        for value in data.iter_mut() {
            *value += distribution.sample(&mut rng);
        }
    }
    ObservationMatrix::from_array_unchecked(data)
}

/// Count, for every ordered pair of points, how many runs put them in the
/// same cluster. Sequential on purpose: the fold is the single place where
/// per-run results meet shared state.
fn accumulate_co_occurrence(runs: &[Vec<usize>], n: usize) -> Array2<f64> {
    let mut counts = Array2::<f64>::zeros((n, n));
    for labels in runs {
        for i in 0..n {
            for j in 0..n {
                if labels[i] == labels[j] {
                    counts[[i, j]] += 1.0;
                }
            }
        }
    }
    counts
}
