//! Clustering algorithms and diagnostics.
//!
//! - [`kmeans`]: the k-means engine itself.
//! - [`elbow`]: inertia sweeps across a range of cluster counts.
//! - [`alignment`]: canonical cluster labels across independent runs.
//! - [`stability`]: robustness of a clustering under input perturbation.

pub mod alignment;
pub mod elbow;
pub mod kmeans;
pub mod stability;

// Re-export public types and functions
pub use alignment::{align_labels, canonical_order};
pub use elbow::elbow_curve;
pub use kmeans::{
    assign_clusters, compute_inertia, init_centroids, kmeans, update_centroids, KMeansConfig,
    KMeansResult,
};
pub use stability::{cluster_stability_score, StabilityConfig};
