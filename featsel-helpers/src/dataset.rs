use ndarray::Array1;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

use crate::{DataPoint, Float};

/// Errors that can occur while building or normalizing a [`Dataset`].
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// An instance has a different number of features than the first one.
    MismatchedDimensions {
        instance: usize,
        expected: usize,
        found: usize,
    },
    /// Sample statistics need at least two instances.
    InsufficientData { instances: usize },
    /// A feature column has zero (or non-finite) sample variance.
    DegenerateColumn { feature: usize },
    /// A feature value is NaN or infinite.
    NonFiniteValue { instance: usize, feature: usize },
    /// The dataset was already standardized once.
    AlreadyNormalized,
}

impl Display for DatasetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::MismatchedDimensions {
                instance,
                expected,
                found,
            } => write!(
                f,
                "Instance {} has {} features, expected {}",
                instance, found, expected
            ),
            DatasetError::InsufficientData { instances } => write!(
                f,
                "At least 2 instances are required, the dataset has {}",
                instances
            ),
            DatasetError::DegenerateColumn { feature } => write!(
                f,
                "Feature {} has zero variance and cannot be standardized",
                feature
            ),
            DatasetError::NonFiniteValue { instance, feature } => write!(
                f,
                "Feature {} of instance {} is not a finite number",
                feature, instance
            ),
            DatasetError::AlreadyNormalized => write!(f, "Dataset is already normalized"),
        }
    }
}

impl Error for DatasetError {}

/// An in-memory table of labeled instances sharing one feature count.
///
/// The dataset is standardized at most once through [`Dataset::normalize`]
/// and is read-only afterwards.
#[derive(Debug, Clone)]
pub struct Dataset<L, F>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
{
    points: Vec<DataPoint<L, F>>,
    n_features: usize,
    normalized: bool,
}

impl<L, F> Dataset<L, F>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
{
    /// Builds a dataset, checking that every instance has the same number of
    /// features as the first.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::MismatchedDimensions` for the first instance whose
    /// feature count differs.
    pub fn new(points: Vec<DataPoint<L, F>>) -> Result<Self, DatasetError> {
        let n_features = points.first().map_or(0, |p| p.features.len());
        for (instance, point) in points.iter().enumerate() {
            if point.features.len() != n_features {
                return Err(DatasetError::MismatchedDimensions {
                    instance,
                    expected: n_features,
                    found: point.features.len(),
                });
            }
        }
        Ok(Self {
            points,
            n_features,
            normalized: false,
        })
    }

    pub fn n_instances(&self) -> usize {
        self.points.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    pub fn points(&self) -> &[DataPoint<L, F>] {
        &self.points
    }

    pub fn get(&self, instance: usize) -> Option<&DataPoint<L, F>> {
        self.points.get(instance)
    }

    /// Number of instances per label, in order of first appearance.
    pub fn class_counts(&self) -> Vec<(L, usize)> {
        let mut counts: Vec<(L, usize)> = Vec::new();
        for point in &self.points {
            match counts.iter_mut().find(|(label, _)| *label == point.label) {
                Some((_, count)) => *count += 1,
                None => counts.push((point.label.clone(), 1)),
            }
        }
        counts
    }

    /// Values of the one-based feature column `feature`.
    pub fn column(&self, feature: usize) -> Option<Array1<F>> {
        if feature == 0 || feature > self.n_features {
            return None;
        }
        Some(self.points.iter().map(|p| p.features[feature - 1]).collect())
    }

    /// Standardizes every feature column in place to zero mean and unit sample
    /// variance (denominator `n - 1`). Labels are untouched.
    ///
    /// All column statistics are computed before any value is written, so on
    /// error the dataset is left unchanged.
    ///
    /// # Errors
    ///
    /// * `DatasetError::AlreadyNormalized` if called a second time.
    /// * `DatasetError::InsufficientData` with fewer than 2 instances.
    /// * `DatasetError::NonFiniteValue` if any feature value is NaN or infinite.
    /// * `DatasetError::DegenerateColumn` if a column has zero variance.
    pub fn normalize(&mut self) -> Result<(), DatasetError> {
        if self.normalized {
            return Err(DatasetError::AlreadyNormalized);
        }
        if self.points.len() < 2 {
            return Err(DatasetError::InsufficientData {
                instances: self.points.len(),
            });
        }

        let mut stats = Vec::with_capacity(self.n_features);
        for feature in 1..=self.n_features {
            let column: Array1<F> = self.points.iter().map(|p| p.features[feature - 1]).collect();
            if let Some(instance) = column.iter().position(|v| !v.is_finite()) {
                return Err(DatasetError::NonFiniteValue { instance, feature });
            }
            stats.push(column_stats(&column).ok_or(DatasetError::DegenerateColumn { feature })?);
        }

        for point in &mut self.points {
            for (value, &(mean, std_dev)) in point.features.iter_mut().zip(&stats) {
                *value = (*value - mean) / std_dev;
            }
        }
        self.normalized = true;
        log::debug!(
            "Normalized {} features over {} instances",
            self.n_features,
            self.points.len()
        );
        Ok(())
    }
}

/// Sample mean and sample standard deviation of `column`, or `None` when the
/// column cannot be standardized.
fn column_stats<F: Float>(column: &Array1<F>) -> Option<(F, F)> {
    let mean = column.mean()?;
    let std_dev = column.var(F::one()).sqrt();
    if std_dev.is_finite() && std_dev > F::zero() {
        Some((mean, std_dev))
    } else {
        None
    }
}
