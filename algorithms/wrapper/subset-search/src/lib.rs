//! Wrapper feature selection for a 1-nearest-neighbor classifier.
//!
//! Each strategy greedily grows or shrinks a feature subset, scoring every
//! candidate with leave-one-out accuracy, and returns a [`SearchReport`]
//! holding the full trace and the best subset seen. None of them guarantee
//! the globally optimal subset.

use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

use featsel_helpers::{Dataset, Float, L2Dist};
use nearest_neighbor::EvaluationError;

mod config;
mod report;
mod search;

pub use config::{MissBudget, SearchConfig, Strategy};
pub use report::{Round, SearchReport, Trial};

/// Errors that abort a search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The dataset has no feature columns to search over.
    EmptyFeatureSet,
    /// The evaluator rejected the dataset or a subset.
    Evaluation(EvaluationError),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::EmptyFeatureSet => {
                write!(f, "The dataset has no features to select from")
            }
            SearchError::Evaluation(e) => write!(f, "Evaluation failed: {}", e),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SearchError::EmptyFeatureSet => None,
            SearchError::Evaluation(e) => Some(e),
        }
    }
}

impl From<EvaluationError> for SearchError {
    fn from(e: EvaluationError) -> Self {
        SearchError::Evaluation(e)
    }
}

/// Greedy forward selection starting from the empty subset.
pub fn run_forward_selection<L, F>(dataset: &Dataset<L, F>) -> Result<SearchReport, SearchError>
where
    L: Clone + Eq + Hash + Debug + Send + Sync,
    F: Float,
{
    run(Strategy::Forward, dataset, &SearchConfig::default())
}

/// Greedy backward elimination starting from the full subset.
pub fn run_backward_elimination<L, F>(
    dataset: &Dataset<L, F>,
) -> Result<SearchReport, SearchError>
where
    L: Clone + Eq + Hash + Debug + Send + Sync,
    F: Float,
{
    run(Strategy::Backward, dataset, &SearchConfig::default())
}

/// Forward selection that abandons candidates once they exceed the round's
/// miss budget (see [`MissBudget::RoundBest`]).
pub fn run_pruned_forward_selection<L, F>(
    dataset: &Dataset<L, F>,
) -> Result<SearchReport, SearchError>
where
    L: Clone + Eq + Hash + Debug + Send + Sync,
    F: Float,
{
    run(Strategy::PrunedForward, dataset, &SearchConfig::default())
}

/// Runs `strategy` over `dataset` with Euclidean distance.
///
/// # Errors
///
/// * `SearchError::EmptyFeatureSet` if the dataset has no features.
/// * `SearchError::Evaluation` if the dataset has fewer than 2 instances or
///   contains values that produce NaN distances.
pub fn run<L, F>(
    strategy: Strategy,
    dataset: &Dataset<L, F>,
    config: &SearchConfig,
) -> Result<SearchReport, SearchError>
where
    L: Clone + Eq + Hash + Debug + Send + Sync,
    F: Float,
{
    search::greedy_search(dataset, L2Dist, strategy, config)
}
