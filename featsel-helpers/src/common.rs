use ndarray::Array1;
use crate::Float;
use std::fmt::Debug;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A single labeled instance: a class label plus its feature values.
///
/// Features are stored zero-based in `features`; a [`FeatureSubset`](crate::FeatureSubset)
/// names them one-based, as they appear after the label in the input row.
///
/// L: The type of the label (e.g., i64, String, enum).
/// F: The float type for the features (e.g., f32, f64).
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct DataPoint<L, F>
where
    L: Clone + Eq + std::hash::Hash + Debug,
    F: Float,
{
    pub features: Array1<F>,
    pub label: L,
}

impl<L, F> DataPoint<L, F>
where
    L: Clone + Eq + std::hash::Hash + Debug,
    F: Float,
{
    pub fn new(features: Array1<F>, label: L) -> Self {
        DataPoint { features, label }
    }
}
