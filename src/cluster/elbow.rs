//! Elbow sweep: inertia as a function of the cluster count.

use rayon::prelude::*;

use crate::cluster::kmeans::{kmeans, KMeansConfig};
use crate::error::{Error, Result};
use crate::matrix::ObservationMatrix;

/// Run k-means once for every k in `[k_min, k_max]` and collect the
/// resulting inertias.
///
/// Each k is an independent run seeded with `config.seed` (the `k` field of
/// `config` is ignored). The runs execute in parallel; the returned pairs are
/// ordered by k. No smoothing or elbow-point detection is applied, the raw
/// curve is for the caller to interpret.
///
/// # Errors
///
/// `Error::InvalidArgument` if `k_min` is zero, `k_min > k_max`, or `k_max`
/// exceeds the number of samples, plus the usual engine validation.
///
/// # Examples
///
/// ```
/// use clusterkit::{elbow_curve, KMeansConfig, ObservationMatrix};
///
/// let points = ObservationMatrix::from_rows(&[
///     vec![0.0, 0.0],
///     vec![1.0, 0.0],
///     vec![10.0, 0.0],
///     vec![11.0, 0.0],
/// ]).unwrap();
///
/// let curve = elbow_curve(&points, 1, 4, &KMeansConfig::new(1).with_seed(7)).unwrap();
/// assert_eq!(curve.len(), 4);
/// assert_eq!(curve[0].0, 1);
/// assert_eq!(curve[3].1, 0.0);
/// ```
pub fn elbow_curve(
    points: &ObservationMatrix,
    k_min: usize,
    k_max: usize,
    config: &KMeansConfig,
) -> Result<Vec<(usize, f64)>> {
    if k_min == 0 {
        return Err(Error::invalid_argument("k_min", "must be at least 1"));
    }
    if k_min > k_max {
        return Err(Error::invalid_argument(
            "k_min",
            format!("must not exceed k_max ({k_max})"),
        ));
    }
    if k_max > points.n_samples() {
        return Err(Error::invalid_argument(
            "k_max",
            format!(
                "requested up to {} clusters but only {} samples are available",
                k_max,
                points.n_samples()
            ),
        ));
    }

    let ks: Vec<usize> = (k_min..=k_max).collect();
    ks.into_par_iter()
        .map(|k| {
            let run = KMeansConfig { k, ..config.clone() };
            let result = kmeans(points, &run)?;
            Ok((k, result.inertia))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn line_points() -> ObservationMatrix {
        ObservationMatrix::from_rows(&[
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![10.0, 0.0],
            vec![11.0, 0.0],
            vec![20.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_sweep_covers_the_whole_range_and_is_monotone() {
        let points = line_points();
        for seed in 0..6 {
            let curve =
                elbow_curve(&points, 1, 5, &KMeansConfig::new(1).with_seed(seed)).unwrap();
            assert_eq!(curve.len(), 5);
            let ks: Vec<usize> = curve.iter().map(|&(k, _)| k).collect();
            assert_eq!(ks, vec![1, 2, 3, 4, 5]);

            // More clusters can only reduce (or match) total inertia.
            for window in curve.windows(2) {
                assert!(
                    window[1].1 <= window[0].1 + 1e-9,
                    "inertia rose from k={} ({}) to k={} ({})",
                    window[0].0,
                    window[0].1,
                    window[1].0,
                    window[1].1
                );
            }

            // The endpoints are seed-independent: a single cluster sits at
            // the grand mean, and five clusters cover every point exactly.
            assert_abs_diff_eq!(curve[0].1, 269.2, epsilon = 1e-9);
            assert_eq!(curve[4].1, 0.0);
        }
    }

    #[test]
    fn test_sweep_is_deterministic() {
        let points = line_points();
        let config = KMeansConfig::new(1).with_seed(42);
        let a = elbow_curve(&points, 1, 5, &config).unwrap();
        let b = elbow_curve(&points, 1, 5, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let points = line_points();
        let config = KMeansConfig::new(1);

        let err = elbow_curve(&points, 0, 3, &config).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { name: "k_min", .. }));

        let err = elbow_curve(&points, 4, 2, &config).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { name: "k_min", .. }));

        let err = elbow_curve(&points, 1, 6, &config).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { name: "k_max", .. }));
    }
}
