use std::fmt::Debug;
use std::hash::Hash;
use std::time::Instant;

use featsel_helpers::{Dataset, Distance, FeatureSubset, Float};
use nearest_neighbor::{Evaluation, LeaveOneOut, SearchDirection};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{MissBudget, Round, SearchConfig, SearchError, SearchReport, Strategy, Trial};

/// Greedy hill-climbing over feature subsets, one feature per round and no
/// backtracking.
///
/// Forward runs `F` rounds from the empty subset; backward scores the full
/// subset as a baseline and runs `F - 1` rounds. Within a round candidates are
/// visited in increasing feature order and a later candidate replaces the
/// current choice only with strictly higher accuracy.
pub(crate) fn greedy_search<L, F, D>(
    dataset: &Dataset<L, F>,
    distance: D,
    strategy: Strategy,
    config: &SearchConfig,
) -> Result<SearchReport, SearchError>
where
    L: Clone + Eq + Hash + Debug + Send + Sync,
    F: Float,
    D: Distance<F>,
{
    let n_features = dataset.n_features();
    if n_features == 0 {
        return Err(SearchError::EmptyFeatureSet);
    }
    if !dataset.is_normalized() {
        log::warn!("Running {} on a dataset that was not normalized", strategy);
    }

    let start = Instant::now();
    let evaluator = LeaveOneOut::new(dataset, distance)?;
    let direction = strategy.direction();
    log::info!(
        "Beginning {} over {} features and {} instances",
        strategy,
        n_features,
        dataset.n_instances()
    );

    let (mut current, n_rounds) = match direction {
        SearchDirection::Forward => (FeatureSubset::new(), n_features),
        SearchDirection::Backward => (FeatureSubset::full(n_features), n_features - 1),
    };

    let mut best: Option<(FeatureSubset, f64)> = None;
    let baseline = match direction {
        SearchDirection::Forward => None,
        SearchDirection::Backward => {
            let accuracy = evaluator.evaluate(&current, None, direction)?;
            log::debug!("Baseline {} accuracy is {:.1}%", current, accuracy * 100.0);
            best = Some((current.clone(), accuracy));
            Some(Trial {
                subset: current.clone(),
                feature: None,
                accuracy,
                pruned: false,
            })
        }
    };

    let mut rounds = Vec::with_capacity(n_rounds);
    for number in 1..=n_rounds {
        let candidates: Vec<usize> = (1..=n_features)
            .filter(|&feature| match direction {
                SearchDirection::Forward => !current.contains(feature),
                SearchDirection::Backward => current.contains(feature),
            })
            .collect();

        let trials = if strategy.is_pruned() {
            pruned_trials(&evaluator, &current, &candidates, direction, config.miss_budget)?
        } else {
            exact_trials(&evaluator, &current, &candidates, direction)?
        };

        let mut choice: Option<(usize, f64)> = None;
        for trial in &trials {
            let Some(feature) = trial.feature else {
                continue;
            };
            if choice.is_none_or(|(_, accuracy)| trial.accuracy > accuracy) {
                choice = Some((feature, trial.accuracy));
            }
        }
        let Some((feature, accuracy)) = choice else {
            break;
        };

        let best_accuracy = best.as_ref().map(|(_, accuracy)| *accuracy);
        let accuracy_decreased = best_accuracy.is_some_and(|best| accuracy < best);
        if accuracy_decreased {
            log::warn!(
                "Round {}: accuracy has decreased to {:.1}%, continuing search in case of local maxima",
                number,
                accuracy * 100.0
            );
        }

        match direction {
            SearchDirection::Forward => current.insert(feature),
            SearchDirection::Backward => current.remove(feature),
        };
        log::info!(
            "Round {}: feature set {} was best, accuracy is {:.1}%",
            number,
            current,
            accuracy * 100.0
        );

        if best_accuracy.is_none_or(|best| accuracy > best) {
            best = Some((current.clone(), accuracy));
        }
        rounds.push(Round {
            number,
            trials,
            feature,
            subset: current.clone(),
            accuracy,
            accuracy_decreased,
        });
    }

    let (best_subset, best_accuracy) = best.unwrap_or_default();
    log::info!(
        "Finished {} in {:?}: best subset {} with accuracy {:.1}%",
        strategy,
        start.elapsed(),
        best_subset,
        best_accuracy * 100.0
    );

    Ok(SearchReport {
        strategy,
        n_instances: dataset.n_instances(),
        n_features,
        baseline,
        rounds,
        best_subset,
        best_accuracy,
    })
}

/// The subset a candidate is reported under: the current subset with the
/// candidate added (forward) or removed (backward).
fn trial_subset(current: &FeatureSubset, feature: usize, direction: SearchDirection) -> FeatureSubset {
    match direction {
        SearchDirection::Forward => current.with(feature),
        SearchDirection::Backward => current.without(feature),
    }
}

fn evaluate_candidate<L, F, D>(
    evaluator: &LeaveOneOut<'_, L, F, D>,
    current: &FeatureSubset,
    feature: usize,
    direction: SearchDirection,
    miss_budget: usize,
) -> Result<Evaluation, SearchError>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
    D: Distance<F>,
{
    let evaluation = match direction {
        SearchDirection::Forward => {
            evaluator.evaluate_with_budget(current, Some(feature), direction, miss_budget)?
        }
        SearchDirection::Backward => evaluator.evaluate_with_budget(
            &current.without(feature),
            None,
            direction,
            miss_budget,
        )?,
    };
    Ok(evaluation)
}

fn exact_trials<L, F, D>(
    evaluator: &LeaveOneOut<'_, L, F, D>,
    current: &FeatureSubset,
    candidates: &[usize],
    direction: SearchDirection,
) -> Result<Vec<Trial>, SearchError>
where
    L: Clone + Eq + Hash + Debug + Send + Sync,
    F: Float,
    D: Distance<F>,
{
    let budget = evaluator.dataset().n_instances();

    // Collecting keeps candidate order, so the tie-break is unaffected.
    #[cfg(feature = "parallel")]
    let candidates = candidates.par_iter();
    #[cfg(not(feature = "parallel"))]
    let candidates = candidates.iter();

    candidates
        .map(|&feature| {
            let evaluation = evaluate_candidate(evaluator, current, feature, direction, budget)?;
            let subset = trial_subset(current, feature, direction);
            log::debug!(
                "Using feature(s) {} accuracy is {:.1}%",
                subset,
                evaluation.accuracy() * 100.0
            );
            Ok(Trial {
                subset,
                feature: Some(feature),
                accuracy: evaluation.accuracy(),
                pruned: false,
            })
        })
        .collect()
}

/// Scores candidates in order, threading the miss budget from one candidate
/// to the next.
fn pruned_trials<L, F, D>(
    evaluator: &LeaveOneOut<'_, L, F, D>,
    current: &FeatureSubset,
    candidates: &[usize],
    direction: SearchDirection,
    policy: MissBudget,
) -> Result<Vec<Trial>, SearchError>
where
    L: Clone + Eq + Hash + Debug,
    F: Float,
    D: Distance<F>,
{
    let mut budget = policy.initial(evaluator.dataset().n_instances());
    let mut trials = Vec::with_capacity(candidates.len());

    for &feature in candidates {
        let evaluation = evaluate_candidate(evaluator, current, feature, direction, budget)?;
        let subset = trial_subset(current, feature, direction);
        match evaluation {
            Evaluation::Scored { accuracy, misses, .. } => {
                log::debug!(
                    "Using feature(s) {} accuracy is {:.1}%",
                    subset,
                    accuracy * 100.0
                );
                budget = policy.tighten(budget, misses);
            }
            Evaluation::Pruned { misses, evaluated } => log::debug!(
                "Skipping feature {}: {} misses after {} instances exceed the budget of {}",
                feature,
                misses,
                evaluated,
                budget
            ),
        }
        trials.push(Trial {
            subset,
            feature: Some(feature),
            accuracy: evaluation.accuracy(),
            pruned: evaluation.is_pruned(),
        });
    }
    Ok(trials)
}
