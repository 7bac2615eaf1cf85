use ndarray::NdFloat;

use num_traits::FromPrimitive;

use std::iter::Sum;

// Include submodules
mod common;
mod dataset;
mod distance;
mod subset;

// Re-export types from submodules
pub use common::DataPoint;
pub use dataset::{Dataset, DatasetError};
pub use distance::{Distance, L2Dist};
pub use subset::FeatureSubset;

/// Feature value type shared by every crate in the workspace.
pub trait Float: NdFloat + FromPrimitive + Sum {}

impl Float for f32 {}

impl Float for f64 {}
