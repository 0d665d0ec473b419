//! K-means clustering for dense vectors.
//!
//! `lloyd` is a small library implementing the classic k-means algorithm:
//! random-subset initialization followed by Lloyd iterations.
//!
//! The primary public API is under [`cluster`], which provides:
//! - [`Kmeans`]: configuration plus the Lloyd driver loop
//! - [`KmeansFit`]: the outcome of a run (centroids, labels, inertia)
//! - [`Clustering`]: the common hard-clustering interface

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;

pub use cluster::{Clustering, Kmeans, KmeansFit};
pub use error::{Error, Result};
