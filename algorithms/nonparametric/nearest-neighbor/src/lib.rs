use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;
// These are the core components from our shared library.
use featsel_helpers::{Dataset, Distance, FeatureSubset, Float};

/// Errors that can occur when scoring a feature subset.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// Leave-one-out needs at least one neighbor besides the held-out instance
    InsufficientData { instances: usize },
    /// A feature index is 0 or larger than the dataset's feature count
    FeatureOutOfRange { feature: usize, n_features: usize },
    /// Invalid distance comparison (likely due to NaN values in data)
    InvalidDistance,
}

impl Display for EvaluationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationError::InsufficientData { instances } => write!(
                f,
                "Leave-one-out evaluation needs at least 2 instances, got {}",
                instances
            ),
            EvaluationError::FeatureOutOfRange {
                feature,
                n_features,
            } => write!(
                f,
                "Feature {} is out of range, the dataset has features 1..={}",
                feature, n_features
            ),
            EvaluationError::InvalidDistance => write!(
                f,
                "Invalid distance comparison (likely due to NaN values in data)"
            ),
        }
    }
}

impl Error for EvaluationError {}

/// How a candidate feature relates to the subset being scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    /// The candidate is added to the subset before scoring.
    Forward,
    /// The subset is scored as given; the candidate has already been removed.
    Backward,
}

/// Outcome of a leave-one-out run that may stop early.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    /// Every instance was classified.
    Scored {
        accuracy: f64,
        correct: usize,
        misses: usize,
    },
    /// The miss budget was exceeded after `evaluated` instances.
    Pruned { misses: usize, evaluated: usize },
}

impl Evaluation {
    /// The accuracy, or `0.0` for a pruned run.
    pub fn accuracy(&self) -> f64 {
        match *self {
            Evaluation::Scored { accuracy, .. } => accuracy,
            Evaluation::Pruned { .. } => 0.0,
        }
    }

    pub fn misses(&self) -> usize {
        match *self {
            Evaluation::Scored { misses, .. } | Evaluation::Pruned { misses, .. } => misses,
        }
    }

    pub fn is_pruned(&self) -> bool {
        matches!(self, Evaluation::Pruned { .. })
    }
}

/// Leave-one-out 1-nearest-neighbor scorer over a fixed dataset.
///
/// Each instance is held out once and classified with the label of its single
/// nearest other instance, measuring distance only over the requested
/// features. Ties go to the instance that comes first in the dataset.
///
/// # Type Parameters
///
/// * `L`: The type of the label (e.g., `i64`, `String`, or a custom `enum`).
/// * `F`: The float type for the features (e.g., `f32`, `f64`).
/// * `D`: The distance metric, which must implement the `Distance` trait.
#[derive(Debug, Clone)]
pub struct LeaveOneOut<'a, L, F, D>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
    D: Distance<F>,
{
    dataset: &'a Dataset<L, F>,
    distance: D,
}

impl<'a, L, F, D> LeaveOneOut<'a, L, F, D>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
    D: Distance<F>,
{
    /// Creates a scorer over `dataset`.
    ///
    /// # Errors
    ///
    /// Returns `EvaluationError::InsufficientData` if the dataset has fewer
    /// than 2 instances, since no instance would have a neighbor.
    pub fn new(dataset: &'a Dataset<L, F>, distance: D) -> Result<Self, EvaluationError> {
        if dataset.n_instances() < 2 {
            return Err(EvaluationError::InsufficientData {
                instances: dataset.n_instances(),
            });
        }
        Ok(Self { dataset, distance })
    }

    pub fn dataset(&self) -> &'a Dataset<L, F> {
        self.dataset
    }

    /// The features distances are measured over: `subset` plus `candidate` in
    /// forward mode, `subset` alone otherwise.
    pub fn effective_features(
        &self,
        subset: &FeatureSubset,
        candidate: Option<usize>,
        direction: SearchDirection,
    ) -> Result<FeatureSubset, EvaluationError> {
        let features = match (direction, candidate) {
            (SearchDirection::Forward, Some(feature)) => subset.with(feature),
            _ => subset.clone(),
        };
        let n_features = self.dataset.n_features();
        if let Some(feature) = features.iter().find(|&f| f == 0 || f > n_features) {
            return Err(EvaluationError::FeatureOutOfRange {
                feature,
                n_features,
            });
        }
        Ok(features)
    }

    /// Index of the instance closest to `held_out` over `features`, excluding
    /// `held_out` itself. The first instance wins ties.
    ///
    /// `features` must already be range-checked (see
    /// [`LeaveOneOut::effective_features`]).
    ///
    /// # Errors
    ///
    /// Returns `EvaluationError::InvalidDistance` if a distance is NaN.
    pub fn nearest_neighbor(
        &self,
        held_out: usize,
        features: &FeatureSubset,
    ) -> Result<usize, EvaluationError> {
        let points = self.dataset.points();
        let query = points[held_out].features.view();
        let mut nearest: Option<(usize, F)> = None;

        for (j, other) in points.iter().enumerate() {
            if j == held_out {
                continue;
            }
            let dist = self.distance.rdistance_on(query, other.features.view(), features);
            if dist.is_nan() {
                return Err(EvaluationError::InvalidDistance);
            }
            if nearest.is_none_or(|(_, best)| dist < best) {
                nearest = Some((j, dist));
            }
        }

        nearest
            .map(|(j, _)| j)
            .ok_or(EvaluationError::InsufficientData {
                instances: points.len(),
            })
    }

    /// Leave-one-out accuracy of `subset` (plus `candidate` in forward mode),
    /// a value in `[0, 1]`.
    pub fn evaluate(
        &self,
        subset: &FeatureSubset,
        candidate: Option<usize>,
        direction: SearchDirection,
    ) -> Result<f64, EvaluationError> {
        let budget = self.dataset.n_instances();
        self.evaluate_with_budget(subset, candidate, direction, budget)
            .map(|evaluation| evaluation.accuracy())
    }

    /// Like [`LeaveOneOut::evaluate`], but gives up as soon as more than
    /// `miss_budget` instances have been misclassified.
    ///
    /// A budget of at least the dataset size never prunes.
    pub fn evaluate_with_budget(
        &self,
        subset: &FeatureSubset,
        candidate: Option<usize>,
        direction: SearchDirection,
        miss_budget: usize,
    ) -> Result<Evaluation, EvaluationError> {
        let features = self.effective_features(subset, candidate, direction)?;
        let points = self.dataset.points();
        let mut correct = 0;
        let mut misses = 0;

        for (i, point) in points.iter().enumerate() {
            let neighbor = self.nearest_neighbor(i, &features)?;
            if points[neighbor].label == point.label {
                correct += 1;
            } else {
                misses += 1;
            }

            if misses > miss_budget {
                log::trace!(
                    "Pruned {} after {} of {} instances ({} misses > budget {})",
                    features,
                    i + 1,
                    points.len(),
                    misses,
                    miss_budget
                );
                return Ok(Evaluation::Pruned {
                    misses,
                    evaluated: i + 1,
                });
            }
        }

        Ok(Evaluation::Scored {
            accuracy: correct as f64 / points.len() as f64,
            correct,
            misses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use featsel_helpers::{DataPoint, L2Dist};
    use ndarray::{Array1, array};
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn separable() -> Dataset<i64, f64> {
        // Feature 1 separates the classes, feature 2 is noise.
        Dataset::new(vec![
            DataPoint::new(array![0.0, 5.0], 1),
            DataPoint::new(array![0.0, 6.0], 1),
            DataPoint::new(array![10.0, 5.0], 2),
            DataPoint::new(array![10.0, 6.0], 2),
        ])
        .unwrap()
    }

    fn subset(features: &[usize]) -> FeatureSubset {
        features.iter().copied().collect()
    }

    #[test]
    fn test_informative_feature_scores_perfectly() {
        let data = separable();
        let loo = LeaveOneOut::new(&data, L2Dist).unwrap();
        let acc = loo
            .evaluate(&FeatureSubset::new(), Some(1), SearchDirection::Forward)
            .unwrap();
        assert_eq!(acc, 1.0);
        let acc = loo
            .evaluate(&FeatureSubset::new(), Some(2), SearchDirection::Forward)
            .unwrap();
        assert_eq!(acc, 0.0);
    }

    #[test]
    fn test_backward_ignores_candidate() {
        let data = separable();
        let loo = LeaveOneOut::new(&data, L2Dist).unwrap();
        let with_candidate = loo
            .evaluate(&subset(&[2]), Some(1), SearchDirection::Backward)
            .unwrap();
        let without = loo.evaluate(&subset(&[2]), None, SearchDirection::Backward).unwrap();
        assert_eq!(with_candidate, without);
        assert_eq!(with_candidate, 0.0);
    }

    #[test]
    fn test_forward_candidate_already_in_subset_is_not_doubled() {
        let data = separable();
        let loo = LeaveOneOut::new(&data, L2Dist).unwrap();
        let features = loo
            .effective_features(&subset(&[1]), Some(1), SearchDirection::Forward)
            .unwrap();
        assert_eq!(features.as_slice(), &[1]);
    }

    #[test]
    fn test_identical_points_with_opposite_labels() {
        let data = Dataset::new(vec![
            DataPoint::new(array![3.0, 3.0], 1_i64),
            DataPoint::new(array![3.0, 3.0], 2),
        ])
        .unwrap();
        let loo = LeaveOneOut::new(&data, L2Dist).unwrap();
        for features in [subset(&[1]), subset(&[2]), subset(&[1, 2])] {
            assert_eq!(
                loo.evaluate(&features, None, SearchDirection::Backward).unwrap(),
                0.0
            );
        }
    }

    #[test]
    fn test_ties_go_to_first_instance() {
        let data = Dataset::new(vec![
            DataPoint::new(array![0.0], 1_i64),
            DataPoint::new(array![1.0], 2),
            DataPoint::new(array![-1.0], 1),
            DataPoint::new(array![1.0], 1),
        ])
        .unwrap();
        let loo = LeaveOneOut::new(&data, L2Dist).unwrap();
        let all = subset(&[1]);
        // instances 1, 2 are both at distance 1 from instance 0
        assert_eq!(loo.nearest_neighbor(0, &all).unwrap(), 1);
        // instance 3 coincides with instance 1, so each is the other's neighbor
        assert_eq!(loo.nearest_neighbor(1, &all).unwrap(), 3);
        assert_eq!(loo.nearest_neighbor(3, &all).unwrap(), 1);
    }

    #[test]
    fn test_empty_subset_picks_first_other_instance() {
        let data = separable();
        let loo = LeaveOneOut::new(&data, L2Dist).unwrap();
        assert_eq!(loo.nearest_neighbor(0, &FeatureSubset::new()).unwrap(), 1);
        assert_eq!(loo.nearest_neighbor(2, &FeatureSubset::new()).unwrap(), 0);
    }

    #[test]
    fn test_error_on_insufficient_data() {
        let data = Dataset::new(vec![DataPoint::new(array![1.0], 1_i64)]).unwrap();
        let result = LeaveOneOut::new(&data, L2Dist);
        assert!(matches!(
            result,
            Err(EvaluationError::InsufficientData { instances: 1 })
        ));
    }

    #[test]
    fn test_error_on_feature_out_of_range() {
        let data = separable();
        let loo = LeaveOneOut::new(&data, L2Dist).unwrap();
        let result = loo.evaluate(&subset(&[1]), Some(3), SearchDirection::Forward);
        assert_eq!(
            result,
            Err(EvaluationError::FeatureOutOfRange {
                feature: 3,
                n_features: 2
            })
        );
        let result = loo.evaluate(&subset(&[0]), None, SearchDirection::Backward);
        assert!(matches!(
            result,
            Err(EvaluationError::FeatureOutOfRange { feature: 0, .. })
        ));
    }

    #[test]
    fn test_error_on_nan_distance() {
        let data = Dataset::new(vec![
            DataPoint::new(array![f64::NAN], 1_i64),
            DataPoint::new(array![1.0], 2),
        ])
        .unwrap();
        let loo = LeaveOneOut::new(&data, L2Dist).unwrap();
        let result = loo.evaluate(&subset(&[1]), None, SearchDirection::Backward);
        assert_eq!(result, Err(EvaluationError::InvalidDistance));
    }

    #[test]
    fn test_one_miss_in_three() {
        let data = Dataset::new(vec![
            DataPoint::new(array![0.0], 1_i64),
            DataPoint::new(array![0.1], 1),
            DataPoint::new(array![5.0], 2),
        ])
        .unwrap();
        let loo = LeaveOneOut::new(&data, L2Dist).unwrap();
        let acc = loo.evaluate(&subset(&[1]), None, SearchDirection::Backward).unwrap();
        assert_abs_diff_eq!(acc, 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_budget_prunes_once_exceeded() {
        let data = separable();
        let loo = LeaveOneOut::new(&data, L2Dist).unwrap();
        // Feature 2 alone misclassifies every instance.
        let pruned = loo
            .evaluate_with_budget(&FeatureSubset::new(), Some(2), SearchDirection::Forward, 1)
            .unwrap();
        assert_eq!(
            pruned,
            Evaluation::Pruned {
                misses: 2,
                evaluated: 2
            }
        );
        assert!(pruned.is_pruned());
        assert_eq!(pruned.accuracy(), 0.0);
    }

    #[test]
    fn test_budget_equal_to_misses_does_not_prune() {
        let data = separable();
        let loo = LeaveOneOut::new(&data, L2Dist).unwrap();
        let scored = loo
            .evaluate_with_budget(&FeatureSubset::new(), Some(2), SearchDirection::Forward, 4)
            .unwrap();
        assert_eq!(
            scored,
            Evaluation::Scored {
                accuracy: 0.0,
                correct: 0,
                misses: 4
            }
        );
    }

    #[test]
    fn test_accuracy_is_a_fraction() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let n_features = 4;
        let points = (0..30)
            .map(|_| {
                let features: Array1<f64> =
                    (0..n_features).map(|_| rng.random_range(-1.0..1.0)).collect();
                DataPoint::new(features, rng.random_range(1..=2_i64))
            })
            .collect();
        let data = Dataset::new(points).unwrap();
        let loo = LeaveOneOut::new(&data, L2Dist).unwrap();

        for _ in 0..20 {
            let features: FeatureSubset = (1..=n_features)
                .filter(|_| rng.random_bool(0.5))
                .collect();
            let evaluation = loo
                .evaluate_with_budget(&features, None, SearchDirection::Backward, data.n_instances())
                .unwrap();
            let Evaluation::Scored {
                accuracy,
                correct,
                misses,
            } = evaluation
            else {
                panic!("a budget of n never prunes");
            };
            assert!((0.0..=1.0).contains(&accuracy));
            assert_eq!(correct + misses, data.n_instances());
            assert_abs_diff_eq!(accuracy, correct as f64 / data.n_instances() as f64);
        }
    }
}
