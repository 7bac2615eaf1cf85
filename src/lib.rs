//! Wrapper feature selection for a 1-nearest-neighbor classifier.
//!
//! Load a dataset, normalize it once, then run one of the search strategies:
//!
//! ```no_run
//! let mut dataset = featsel::load_dataset("data.txt")?;
//! dataset.normalize()?;
//! let report = featsel::run_forward_selection(&dataset)?;
//! println!("best {} at {:.1}%", report.best_subset, report.best_accuracy * 100.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod loader;

pub use featsel_helpers::{DataPoint, Dataset, DatasetError, Distance, FeatureSubset, Float, L2Dist};
pub use loader::{LoadError, load_dataset, parse_dataset};
pub use nearest_neighbor::{Evaluation, EvaluationError, LeaveOneOut, SearchDirection};
pub use subset_search::{
    MissBudget, Round, SearchConfig, SearchError, SearchReport, Strategy, Trial, run,
    run_backward_elimination, run_forward_selection, run_pruned_forward_selection,
};
