//! From-scratch k-means clustering with stability diagnostics.
//!
//! The crate provides four pieces that compose into a clustering analysis:
//! a seeded k-means engine, an elbow sweep over cluster counts, label
//! alignment across independent runs, and a perturbation-based stability
//! score. Input arrives as a validated [`ObservationMatrix`]; reading,
//! standardizing and presenting data are the caller's concern.
//!
//! Everything is deterministic given its seeds: no global random state is
//! consulted anywhere, so concurrent sessions cannot interfere with each
//! other's results.

pub mod cluster;
pub mod error;
pub mod geometry;
pub mod matrix;

pub use cluster::{alignment, elbow, kmeans, stability};
pub use cluster::{
    align_labels, assign_clusters, canonical_order, cluster_stability_score, compute_inertia,
    elbow_curve, init_centroids, update_centroids, KMeansConfig, KMeansResult, StabilityConfig,
};
pub use error::{Error, Result};
pub use matrix::ObservationMatrix;
