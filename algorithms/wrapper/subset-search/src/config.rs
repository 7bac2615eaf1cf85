use std::fmt::{Display, Formatter};
use std::str::FromStr;

use nearest_neighbor::SearchDirection;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// The three subset-search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "kebab-case")
)]
pub enum Strategy {
    /// Start empty, add the best feature each round.
    Forward,
    /// Start full, remove the feature whose absence scores best each round.
    Backward,
    /// Forward selection that stops scoring candidates once they are
    /// certain to lose the round.
    PrunedForward,
}

impl Strategy {
    pub fn direction(&self) -> SearchDirection {
        match self {
            Strategy::Forward | Strategy::PrunedForward => SearchDirection::Forward,
            Strategy::Backward => SearchDirection::Backward,
        }
    }

    pub fn is_pruned(&self) -> bool {
        matches!(self, Strategy::PrunedForward)
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Forward => write!(f, "Forward Selection"),
            Strategy::Backward => write!(f, "Backward Elimination"),
            Strategy::PrunedForward => write!(f, "Pruned Forward Selection"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "forward" => Ok(Strategy::Forward),
            "2" | "backward" => Ok(Strategy::Backward),
            "3" | "pruned" | "pruned-forward" | "custom" => Ok(Strategy::PrunedForward),
            other => Err(format!(
                "Unknown strategy '{}', expected forward, backward or pruned (1, 2 or 3)",
                other
            )),
        }
    }
}

/// How many misclassifications a pruned evaluation may accumulate before it
/// is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "kebab-case")
)]
pub enum MissBudget {
    /// Fewest misses of any fully scored candidate earlier in the same round.
    /// Only candidates that cannot win the round get pruned, so the result
    /// matches unpruned forward selection.
    #[default]
    RoundBest,
    /// A constant budget. May prune a candidate that would have won.
    Fixed(usize),
    /// Budget equal to the dataset size, which never prunes.
    Unlimited,
}

impl MissBudget {
    /// Budget for the first candidate of a round over `n_instances`.
    pub fn initial(&self, n_instances: usize) -> usize {
        match *self {
            MissBudget::RoundBest | MissBudget::Unlimited => n_instances,
            MissBudget::Fixed(budget) => budget,
        }
    }

    /// Budget after a candidate was fully scored with `misses`.
    pub fn tighten(&self, budget: usize, misses: usize) -> usize {
        match self {
            MissBudget::RoundBest => budget.min(misses),
            MissBudget::Fixed(_) | MissBudget::Unlimited => budget,
        }
    }
}

impl Display for MissBudget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MissBudget::RoundBest => write!(f, "round-best"),
            MissBudget::Fixed(budget) => write!(f, "{}", budget),
            MissBudget::Unlimited => write!(f, "unlimited"),
        }
    }
}

impl FromStr for MissBudget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "round-best" | "round_best" => Ok(MissBudget::RoundBest),
            "unlimited" | "none" => Ok(MissBudget::Unlimited),
            other => other
                .parse::<usize>()
                .map(MissBudget::Fixed)
                .map_err(|_| format!("Invalid miss budget '{}'", other)),
        }
    }
}

/// Tunables shared by all strategies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", default)
)]
pub struct SearchConfig {
    /// Only consulted by [`Strategy::PrunedForward`].
    pub miss_budget: MissBudget,
}
