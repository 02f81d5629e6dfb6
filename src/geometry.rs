//! Distance primitives shared by the clustering algorithms.

use ndarray::ArrayView1;
use num_traits::Float;

/// Squared Euclidean distance between two points of the same dimension.
/// The square root is never needed for nearest-centroid comparisons.
pub fn squared_distance<T: Float>(a: ArrayView1<'_, T>, b: ArrayView1<'_, T>) -> T {
    a.iter().zip(b.iter()).fold(T::zero(), |acc, (&x, &y)| {
        let d = x - y;
        acc + d * d
    })
}
