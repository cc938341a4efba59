//! Feature subset enumeration

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::error::{EvalError, EvalResult};

/// A combination of canonical properties used as regression inputs.
///
/// Names are stored in candidate-list order, so two subsets drawn from the
/// same candidate list compare equal exactly when they hold the same names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FeatureSubset {
    features: Vec<String>,
}

impl FeatureSubset {
    /// Build a subset from an explicit list of names.
    pub fn new<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            features: features.into_iter().map(Into::into).collect(),
        }
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    /// True when every feature of the subset is in `columns`.
    pub fn is_within<S: AsRef<str>>(&self, columns: &[S]) -> bool {
        self.features
            .iter()
            .all(|f| columns.iter().any(|c| c.as_ref() == f))
    }
}

impl fmt::Display for FeatureSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.features.join(", "))
    }
}

/// Enumerate every combination of the candidate properties of size 1 through `max_size`.
///
/// Subsets come out grouped by size, and within a size in lexicographic order of
/// candidate indices: `["a","b","c"]` with `max_size = 2` yields
/// `[a] [b] [c] [a,b] [a,c] [b,c]`.
pub fn enumerate_subsets<S: AsRef<str>>(
    candidate_properties: &[S],
    max_size: usize,
) -> EvalResult<Vec<FeatureSubset>> {
    let m = candidate_properties.len();
    if max_size < 1 || max_size > m {
        return Err(EvalError::InvalidSubsetSize {
            max_size,
            candidates: m,
        });
    }

    let mut seen = HashSet::with_capacity(m);
    for name in candidate_properties {
        if !seen.insert(name.as_ref()) {
            return Err(EvalError::DuplicateCandidate(name.as_ref().to_string()));
        }
    }

    let mut subsets = Vec::with_capacity(count_subsets(m, max_size));
    for size in 1..=max_size {
        // Index combination, advanced in lexicographic order
        let mut indices: Vec<usize> = (0..size).collect();
        loop {
            subsets.push(FeatureSubset::new(
                indices.iter().map(|&i| candidate_properties[i].as_ref()),
            ));

            // Rightmost index that can still move forward
            let Some(pos) = (0..size).rev().find(|&i| indices[i] != i + m - size) else {
                break;
            };
            indices[pos] += 1;
            for i in (pos + 1)..size {
                indices[i] = indices[i - 1] + 1;
            }
        }
    }

    Ok(subsets)
}

/// Number of subsets `enumerate_subsets` produces: C(m,1) + ... + C(m,k).
pub fn count_subsets(m: usize, max_size: usize) -> usize {
    let mut total = 0usize;
    let mut binom = 1usize;
    for k in 1..=max_size.min(m) {
        binom = binom * (m - k + 1) / k;
        total += binom;
    }
    total
}
