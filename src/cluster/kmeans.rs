//! K-means clustering (Lloyd's algorithm).
//!
//! Partitions data into k clusters by minimizing **within-cluster sum of
//! squares** (WCSS):
//!
//! ```text
//! WCSS = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
//! ```
//!
//! # The Algorithm
//!
//! 1. Initialize k centroids by drawing k distinct points from the data
//! 2. **Assign**: each point → nearest centroid (Euclidean distance)
//! 3. **Update**: each centroid → mean of its assigned points
//! 4. Repeat until the centroids stop moving or the iteration budget runs out
//!
//! **Why it converges**: WCSS decreases monotonically and is bounded below
//! by 0, so the loop must reach a fixed point (a local minimum, not
//! necessarily the global one).
//!
//! # Policies worth knowing
//!
//! - **Initialization** draws k distinct points uniformly at random, by
//!   shuffling the index range and keeping the first k. No k-means++
//!   spreading; with distinct input points the initial centroids are
//!   guaranteed distinct, nothing more.
//! - **Ties** in the assignment step go to the lowest cluster index: the
//!   scan uses a strict `<` against the running minimum, so a later centroid
//!   at exactly equal distance never takes the point.
//! - **Empty clusters** are left at the all-zero vector by the update step.
//!   The cluster effectively jumps to the origin and may or may not
//!   reacquire members depending on the data's geometry. Most
//!   implementations reseed instead; this one keeps the simpler policy, so
//!   callers with data far from the origin should expect an emptied cluster
//!   to stay empty.
//! - **Convergence** is exact coordinate equality between consecutive
//!   centroid sets by default. Lloyd iterations reach a genuine fixed point
//!   on real data, so this terminates in practice; [`Kmeans::with_tol`]
//!   relaxes the test to a squared-shift threshold for callers who want an
//!   earlier stop.

use super::traits::Clustering;
use crate::error::{Error, Result};
use rand::prelude::*;

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum iterations.
    max_iter: usize,
    /// Convergence tolerance on total squared centroid shift.
    /// `0.0` means exact coordinate equality.
    tol: f32,
    /// Random seed.
    seed: Option<u64>,
}

impl Kmeans {
    /// Create a new k-means clusterer with `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            tol: 0.0,
            seed: None,
        }
    }

    /// Set the maximum number of Lloyd iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the convergence tolerance.
    ///
    /// The loop stops once the total squared shift of all centroid
    /// coordinates between consecutive iterations is at most `tol`. The
    /// default of `0.0` requires the centroids to repeat exactly.
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Set the random seed for reproducible initialization.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run Lloyd iterations on `data` and return the full outcome.
    ///
    /// Validates the configuration against the dataset first: `data` must be
    /// non-empty, all points must share one dimensionality, and `k` must be
    /// in `1..=n`.
    ///
    /// On convergence, [`KmeansFit::labels`] and [`KmeansFit::centroids`]
    /// are consistent: the labels were computed against exactly the returned
    /// centroids. When the iteration budget runs out instead, the centroids
    /// are one update ahead of the labels ([`KmeansFit::converged`] tells
    /// the two stops apart).
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<KmeansFit> {
        let n = data.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }

        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }

        if self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }

        let d = data[0].len();
        for point in data {
            if point.len() != d {
                return Err(Error::DimensionMismatch {
                    expected: d,
                    found: point.len(),
                });
            }
        }

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let mut centroids = self.init_centroids(data, &mut rng);
        let mut labels = vec![0usize; n];
        let mut n_iter = 0;
        let mut converged = false;

        for _ in 0..self.max_iter {
            n_iter += 1;

            // Assignment step.
            for (label, point) in labels.iter_mut().zip(data) {
                *label = nearest_centroid(point, &centroids);
            }

            // Update step.
            let new_centroids = self.update_centroids(data, &labels, d);

            if self.centroids_settled(&centroids, &new_centroids) {
                // Keep the pre-update centroids: they are the ones the
                // final labels were assigned against.
                converged = true;
                break;
            }

            centroids = new_centroids;
        }

        let inertia = data
            .iter()
            .zip(&labels)
            .map(|(point, &label)| squared_euclidean(point, &centroids[label]))
            .sum();

        Ok(KmeansFit {
            centroids,
            labels,
            inertia,
            n_iter,
            converged,
        })
    }

    /// Select k distinct points uniformly at random as initial centroids.
    fn init_centroids(&self, data: &[Vec<f32>], rng: &mut impl Rng) -> Vec<Vec<f32>> {
        let mut indices: Vec<usize> = (0..data.len()).collect();
        indices.shuffle(rng);
        indices[..self.k].iter().map(|&i| data[i].clone()).collect()
    }

    /// Recompute each centroid as the mean of its assigned points.
    ///
    /// A cluster with no assigned points keeps the zero vector its
    /// accumulator started from.
    fn update_centroids(&self, data: &[Vec<f32>], labels: &[usize], d: usize) -> Vec<Vec<f32>> {
        let mut centroids = vec![vec![0.0f32; d]; self.k];
        let mut counts = vec![0usize; self.k];

        for (point, &label) in data.iter().zip(labels) {
            counts[label] += 1;
            for (acc, &x) in centroids[label].iter_mut().zip(point) {
                *acc += x;
            }
        }

        for (centroid, &count) in centroids.iter_mut().zip(&counts) {
            if count > 0 {
                for x in centroid.iter_mut() {
                    *x /= count as f32;
                }
            }
        }

        centroids
    }

    /// Convergence test between consecutive centroid sets.
    fn centroids_settled(&self, old: &[Vec<f32>], new: &[Vec<f32>]) -> bool {
        if self.tol == 0.0 {
            return old == new;
        }

        let shift: f32 = old
            .iter()
            .zip(new)
            .map(|(a, b)| squared_euclidean(a, b))
            .sum();
        shift <= self.tol
    }
}

impl Default for Kmeans {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// Outcome of a k-means run.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Final centroids, one row per cluster, indexed by cluster label.
    pub centroids: Vec<Vec<f32>>,
    /// Cluster label per input point, each in `0..k`.
    pub labels: Vec<usize>,
    /// Within-cluster sum of squared distances of the final labeling.
    pub inertia: f32,
    /// Number of Lloyd iterations executed.
    pub n_iter: usize,
    /// Whether the centroids settled before the iteration budget ran out.
    pub converged: bool,
}

impl KmeansFit {
    /// Label new points by their nearest centroid.
    ///
    /// Uses the same distance and tie-break rules as the fitting loop, so
    /// `predict` on the training data of a converged fit reproduces
    /// [`KmeansFit::labels`].
    pub fn predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        if self.centroids.is_empty() {
            return Err(Error::InvalidParameter {
                name: "centroids",
                message: "model has no centroids",
            });
        }

        let d = self.centroids[0].len();
        data.iter()
            .map(|point| {
                if point.len() != d {
                    return Err(Error::DimensionMismatch {
                        expected: d,
                        found: point.len(),
                    });
                }
                Ok(nearest_centroid(point, &self.centroids))
            })
            .collect()
    }
}

/// Index of the centroid nearest to `point`.
///
/// Scans in index order with a strict `<`, so exact-distance ties resolve to
/// the lowest cluster index.
fn nearest_centroid(point: &[f32], centroids: &[Vec<f32>]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;

    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = euclidean(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = idx;
        }
    }

    best
}

#[inline]
fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    squared_euclidean(a, b).sqrt()
}

#[inline]
fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kmeans_two_clouds() {
        // The classic toy dataset: three low points, three high points.
        let data = vec![
            vec![1.0, 2.0],
            vec![1.5, 1.8],
            vec![5.0, 8.0],
            vec![8.0, 8.0],
            vec![1.0, 0.6],
            vec![9.0, 11.0],
        ];

        let kmeans = Kmeans::new(2).with_seed(42);
        let labels = kmeans.fit_predict(&data).unwrap();

        // Points 0, 1, 4 together; points 2, 3, 5 together; groups disjoint.
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[0], labels[4]);
        assert_eq!(labels[2], labels[3]);
        assert_eq!(labels[2], labels[5]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_kmeans_all_points_assigned() {
        let data: Vec<Vec<f32>> = (0..50)
            .map(|i| vec![i as f32 * 0.1, (i % 5) as f32])
            .collect();

        let kmeans = Kmeans::new(5).with_seed(123);
        let labels = kmeans.fit_predict(&data).unwrap();

        assert_eq!(labels.len(), data.len());
        for &label in &labels {
            assert!(label < 5, "label {} out of range", label);
        }
    }

    #[test]
    fn test_kmeans_deterministic_with_seed() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
        ];

        let kmeans1 = Kmeans::new(2).with_seed(42);
        let kmeans2 = Kmeans::new(2).with_seed(42);

        let labels1 = kmeans1.fit_predict(&data).unwrap();
        let labels2 = kmeans2.fit_predict(&data).unwrap();

        assert_eq!(labels1, labels2, "same seed should give same result");
    }

    #[test]
    fn test_kmeans_k_equals_n() {
        // Each point becomes its own cluster and the fit is immediately
        // stable: every point sits at distance zero from its own centroid.
        let data = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];

        let kmeans = Kmeans::new(3).with_seed(42);
        let fit = kmeans.fit(&data).unwrap();

        let unique: std::collections::HashSet<_> = fit.labels.iter().collect();
        assert_eq!(unique.len(), 3);
        assert_eq!(fit.inertia, 0.0);
    }

    #[test]
    fn test_kmeans_single_cluster_is_dataset_mean() {
        let data = vec![
            vec![1.0, 2.0],
            vec![3.0, 4.0],
            vec![5.0, 6.0],
            vec![7.0, 8.0],
        ];

        let fit = Kmeans::new(1).with_seed(7).fit(&data).unwrap();

        assert!(fit.labels.iter().all(|&l| l == 0));
        assert!(fit.converged);
        assert_eq!(fit.centroids[0], vec![4.0, 5.0]);
    }

    #[test]
    fn test_kmeans_emptied_cluster_goes_to_origin() {
        // Both candidate centroids start at (1, 1); the tie-break sends
        // both points to cluster 0, so cluster 1 empties and its centroid
        // drops to the zero vector on the first update.
        let data = vec![vec![1.0, 1.0], vec![1.0, 1.0]];

        let fit = Kmeans::new(2).with_seed(0).fit(&data).unwrap();

        assert_eq!(fit.labels, vec![0, 0]);
        assert!(fit.converged);
        assert_eq!(fit.centroids[0], vec![1.0, 1.0]);
        assert_eq!(fit.centroids[1], vec![0.0, 0.0]);
    }

    #[test]
    fn test_kmeans_iteration_budget_respected() {
        let data: Vec<Vec<f32>> = (0..40).map(|i| vec![(i % 7) as f32, i as f32]).collect();

        let fit = Kmeans::new(4).with_max_iter(3).with_seed(9).fit(&data).unwrap();

        assert!(fit.n_iter <= 3);
        assert_eq!(fit.labels.len(), data.len());
    }

    #[test]
    fn test_kmeans_converged_fit_is_stable_under_predict() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.2, 0.1],
            vec![7.0, 7.0],
            vec![7.1, 6.9],
        ];

        let fit = Kmeans::new(2).with_seed(11).fit(&data).unwrap();
        assert!(fit.converged);

        // Re-labeling the training data against the returned centroids
        // reproduces the fit's own labels.
        let relabeled = fit.predict(&data).unwrap();
        assert_eq!(relabeled, fit.labels);
    }

    #[test]
    fn test_predict_tie_breaks_to_lower_index() {
        let fit = KmeansFit {
            centroids: vec![vec![0.0, 0.0], vec![2.0, 0.0]],
            labels: vec![],
            inertia: 0.0,
            n_iter: 0,
            converged: true,
        };

        // (1, 0) is exactly equidistant from both centroids.
        let labels = fit.predict(&[vec![1.0, 0.0]]).unwrap();
        assert_eq!(labels, vec![0]);
    }

    #[test]
    fn test_kmeans_empty_input_error() {
        let data: Vec<Vec<f32>> = vec![];
        let kmeans = Kmeans::new(2);
        assert!(kmeans.fit_predict(&data).is_err());
    }

    #[test]
    fn test_kmeans_k_zero_error() {
        let data = vec![vec![0.0, 0.0]];
        let kmeans = Kmeans::new(0);
        assert!(matches!(
            kmeans.fit(&data),
            Err(Error::InvalidParameter { name: "k", .. })
        ));
    }

    #[test]
    fn test_kmeans_k_larger_than_n_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        let kmeans = Kmeans::new(5);
        assert!(matches!(
            kmeans.fit(&data),
            Err(Error::InvalidClusterCount {
                requested: 5,
                n_items: 2
            })
        ));
    }

    #[test]
    fn test_kmeans_ragged_input_error() {
        let data = vec![vec![0.0, 0.0], vec![1.0]];
        let kmeans = Kmeans::new(1);
        assert!(matches!(
            kmeans.fit(&data),
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_predict_dimension_mismatch_error() {
        let data = vec![vec![0.0, 0.0], vec![5.0, 5.0]];
        let fit = Kmeans::new(2).with_seed(3).fit(&data).unwrap();

        assert!(matches!(
            fit.predict(&[vec![1.0, 2.0, 3.0]]),
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn test_kmeans_default_config() {
        let kmeans = Kmeans::default();
        assert_eq!(kmeans.n_clusters(), 2);
    }
}
