use ndarray::ArrayView1;

use crate::{FeatureSubset, Float};

/// A distance metric evaluated over a subset of the feature columns.
///
/// The "reduced" distance preserves the ordering of the true distance and is
/// cheaper to compute (for L2 it skips the square root), so neighbor searches
/// compare reduced distances and convert only when a true distance is needed.
pub trait Distance<F: Float>: Clone + Send + Sync {
    /// Reduced distance between `a` and `b` restricted to `features`
    /// (one-based indices). Every index must be in bounds for both views.
    fn rdistance_on(&self, a: ArrayView1<F>, b: ArrayView1<F>, features: &FeatureSubset) -> F;

    /// Converts a reduced distance into the true distance.
    fn rdist_to_dist(&self, rdist: F) -> F;

    /// True distance between `a` and `b` restricted to `features`.
    fn distance_on(&self, a: ArrayView1<F>, b: ArrayView1<F>, features: &FeatureSubset) -> F {
        self.rdist_to_dist(self.rdistance_on(a, b, features))
    }
}

/// Euclidean distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct L2Dist;

impl<F: Float> Distance<F> for L2Dist {
    #[inline]
    fn rdistance_on(&self, a: ArrayView1<F>, b: ArrayView1<F>, features: &FeatureSubset) -> F {
        features
            .iter()
            .map(|feature| {
                let diff = a[feature - 1] - b[feature - 1];
                diff * diff
            })
            .sum()
    }

    #[inline]
    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, array};
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_l2_on_subset() {
        let a = array![0.0, 0.0, 100.0];
        let b = array![3.0, 4.0, -100.0];
        let first_two: FeatureSubset = [1, 2].into_iter().collect();
        assert_abs_diff_eq!(L2Dist.distance_on(a.view(), b.view(), &first_two), 5.0);
        assert_abs_diff_eq!(L2Dist.rdistance_on(a.view(), b.view(), &first_two), 25.0);
    }

    #[test]
    fn test_empty_subset_is_zero() {
        let a = array![1.0, 2.0];
        let b = array![5.0, -2.0];
        assert_eq!(L2Dist.distance_on(a.view(), b.view(), &FeatureSubset::new()), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let n_features = 6;
        let subsets: Vec<FeatureSubset> = vec![
            FeatureSubset::full(n_features),
            [2, 5].into_iter().collect(),
            [6].into_iter().collect(),
            [4, 1, 3].into_iter().collect(),
        ];
        for _ in 0..50 {
            let x: Array1<f64> = (0..n_features).map(|_| rng.random_range(-5.0..5.0)).collect();
            let y: Array1<f64> = (0..n_features).map(|_| rng.random_range(-5.0..5.0)).collect();
            for subset in &subsets {
                assert_eq!(
                    L2Dist.distance_on(x.view(), y.view(), subset),
                    L2Dist.distance_on(y.view(), x.view(), subset)
                );
            }
        }
    }
}
