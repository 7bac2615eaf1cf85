use featsel_helpers::FeatureSubset;

use crate::Strategy;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// One evaluated subset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Trial {
    /// The subset that was scored.
    pub subset: FeatureSubset,
    /// The feature added (forward) or removed (backward); `None` for the
    /// backward baseline.
    pub feature: Option<usize>,
    /// Leave-one-out accuracy, `0.0` when pruned.
    pub accuracy: f64,
    /// Scoring stopped early because the candidate could not win.
    pub pruned: bool,
}

/// One step of a greedy search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Round {
    /// 1-based round number.
    pub number: usize,
    /// Candidates in evaluation order.
    pub trials: Vec<Trial>,
    /// The feature the round added or removed.
    pub feature: usize,
    /// The subset after applying the round's choice.
    pub subset: FeatureSubset,
    pub accuracy: f64,
    /// The round's accuracy is below the best seen so far.
    pub accuracy_decreased: bool,
}

/// Full trace of a search plus its best result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct SearchReport {
    pub strategy: Strategy,
    pub n_instances: usize,
    pub n_features: usize,
    /// Full feature set scored before the first backward round.
    pub baseline: Option<Trial>,
    pub rounds: Vec<Round>,
    pub best_subset: FeatureSubset,
    pub best_accuracy: f64,
}

impl SearchReport {
    /// Every trial in evaluation order, baseline first.
    pub fn trials(&self) -> impl Iterator<Item = &Trial> {
        self.baseline
            .iter()
            .chain(self.rounds.iter().flat_map(|round| round.trials.iter()))
    }

    /// Number of subsets handed to the evaluator.
    pub fn evaluations(&self) -> usize {
        self.trials().count()
    }

    /// Number of candidates abandoned by the miss budget.
    pub fn pruned(&self) -> usize {
        self.trials().filter(|trial| trial.pruned).count()
    }

    /// The subset chosen in the final round (or the baseline when no round
    /// ran). Not necessarily the best subset.
    pub fn final_subset(&self) -> Option<&FeatureSubset> {
        self.rounds
            .last()
            .map(|round| &round.subset)
            .or(self.baseline.as_ref().map(|trial| &trial.subset))
    }
}
