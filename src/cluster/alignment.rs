//! Label alignment across independent k-means runs.
//!
//! Two runs over related inputs can partition the data identically while
//! numbering the clusters differently (label switching). Before labels from
//! different runs are compared, they are mapped through a canonical ordering
//! of the centroids: cluster identity becomes "rank of the centroid in
//! lexicographic coordinate order" instead of "whatever index the run
//! happened to produce".
//!
//! Sorting centroids by coordinates is an approximation. Two runs whose
//! corresponding centroids are nearly identical on the leading coordinates
//! can still end up ranked differently. The policy is kept anyway because it
//! is deterministic, cheap, and independent of any reference run.

use std::cmp::Ordering;

use ndarray::{ArrayView1, ArrayView2};

use crate::error::{Error, Result};

/// Indices of the centroids sorted lexicographically by their coordinates
/// (first feature, then second, and so on). Identical centroids keep their
/// original relative order.
pub fn canonical_order(centroids: ArrayView2<'_, f64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..centroids.nrows()).collect();
    order.sort_by(|&a, &b| lexicographic_cmp(centroids.row(a), centroids.row(b)));
    order
}

fn lexicographic_cmp(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.total_cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Relabel `labels` so that cluster identity follows the canonical centroid
/// order: label 0 becomes the cluster whose centroid sorts first, and so on.
///
/// Aligning already-aligned labels (against the correspondingly reordered
/// centroids) is a no-op.
///
/// # Errors
///
/// `Error::InvalidArgument` if any label is out of range for the number of
/// centroids.
///
/// # Examples
///
/// ```
/// use clusterkit::cluster::alignment::align_labels;
/// use ndarray::array;
///
/// // Cluster 1 has the lexicographically smaller centroid, so it becomes
/// // label 0 after alignment.
/// let centroids = array![[5.0, 0.0], [0.0, 0.0]];
/// let aligned = align_labels(centroids.view(), &[0, 1, 0]).unwrap();
/// assert_eq!(aligned, vec![1, 0, 1]);
/// ```
pub fn align_labels(centroids: ArrayView2<'_, f64>, labels: &[usize]) -> Result<Vec<usize>> {
    let k = centroids.nrows();
    let order = canonical_order(centroids);

    let mut rank = vec![0_usize; k];
    for (new, &original) in order.iter().enumerate() {
        rank[original] = new;
    }

    labels
        .iter()
        .map(|&label| {
            if label >= k {
                Err(Error::invalid_argument(
                    "labels",
                    format!("label {label} is out of range for {k} clusters"),
                ))
            } else {
                Ok(rank[label])
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2, Axis};

    #[test]
    fn test_align_known_permutation() {
        let centroids = array![[5.0, 0.0], [0.0, 0.0]];
        let aligned = align_labels(centroids.view(), &[0, 1, 0, 1]).unwrap();
        assert_eq!(aligned, vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_later_features_break_first_feature_ties() {
        let centroids = array![[1.0, 5.0], [1.0, 2.0], [0.0, 9.0]];
        assert_eq!(canonical_order(centroids.view()), vec![2, 1, 0]);
    }

    #[test]
    fn test_align_is_idempotent() {
        let centroids = array![[3.0, 1.0], [-2.0, 0.5], [0.0, 0.0]];
        let labels = vec![0, 2, 1, 1, 0, 2];

        let order = canonical_order(centroids.view());
        let aligned = align_labels(centroids.view(), &labels).unwrap();

        // Reorder the centroids into canonical order and align again.
        let sorted = centroids.select(Axis(0), &order);
        let realigned = align_labels(sorted.view(), &aligned).unwrap();
        assert_eq!(realigned, aligned);
    }

    #[test]
    fn test_identical_centroids_keep_their_order() {
        let centroids = array![[1.0, 1.0], [1.0, 1.0]];
        assert_eq!(canonical_order(centroids.view()), vec![0, 1]);
        let aligned = align_labels(centroids.view(), &[0, 1, 0]).unwrap();
        assert_eq!(aligned, vec![0, 1, 0]);
    }

    #[test]
    fn test_out_of_range_label_rejected() {
        let centroids: Array2<f64> = array![[0.0], [1.0]];
        let err = align_labels(centroids.view(), &[0, 5]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument { name: "labels", .. }
        ));
    }

    #[test]
    fn test_alignment_preserves_co_membership() {
        // Relabeling never changes which points share a label.
        let centroids = array![[9.0, 0.0], [1.0, 0.0], [4.0, 0.0]];
        let labels = vec![0, 0, 2, 1, 1, 2];
        let aligned = align_labels(centroids.view(), &labels).unwrap();
        for i in 0..labels.len() {
            for j in 0..labels.len() {
                assert_eq!(
                    labels[i] == labels[j],
                    aligned[i] == aligned[j],
                    "pair ({i}, {j}) changed co-membership"
                );
            }
        }
    }
}
