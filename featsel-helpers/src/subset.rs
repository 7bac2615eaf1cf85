use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A set of one-based feature indices.
///
/// Membership defines the semantics; insertion order is kept only so reports
/// list features in the order a search picked them. An index is never stored
/// twice.
#[derive(Debug, Clone, Default, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", transparent)
)]
pub struct FeatureSubset {
    features: Vec<usize>,
}

impl FeatureSubset {
    /// The empty subset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every feature `1..=n_features`, in index order.
    pub fn full(n_features: usize) -> Self {
        Self {
            features: (1..=n_features).collect(),
        }
    }

    /// Adds `feature`. Returns `false` if it was already present.
    pub fn insert(&mut self, feature: usize) -> bool {
        if self.contains(feature) {
            return false;
        }
        self.features.push(feature);
        true
    }

    /// Removes `feature`. Returns `false` if it was not present.
    pub fn remove(&mut self, feature: usize) -> bool {
        match self.features.iter().position(|&f| f == feature) {
            Some(pos) => {
                self.features.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, feature: usize) -> bool {
        self.features.contains(&feature)
    }

    /// A copy with `feature` appended (unchanged if already present).
    pub fn with(&self, feature: usize) -> Self {
        let mut subset = self.clone();
        subset.insert(feature);
        subset
    }

    /// A copy with `feature` removed.
    pub fn without(&self, feature: usize) -> Self {
        let mut subset = self.clone();
        subset.remove(feature);
        subset
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.features.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.features
    }
}

impl PartialEq for FeatureSubset {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|f| other.contains(f))
    }
}

impl FromIterator<usize> for FeatureSubset {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut subset = FeatureSubset::new();
        for feature in iter {
            subset.insert(feature);
        }
        subset
    }
}

impl Display for FeatureSubset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, feature) in self.features.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", feature)?;
        }
        write!(f, "}}")
    }
}
