//! Ground truth: whether each stimulus matches the one `n_back` steps earlier.

use serde::Serialize;

/// The correct answer for one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Truth {
    Match,
    NoMatch,
    /// The first `n_back` trials have nothing to compare against.
    NotApplicable,
}

impl Truth {
    /// `Some(true)` for a match, `Some(false)` for a non-match, `None` otherwise.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Match => Some(true),
            Self::NoMatch => Some(false),
            Self::NotApplicable => None,
        }
    }
}

impl std::fmt::Display for Truth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match => write!(f, "match"),
            Self::NoMatch => write!(f, "no-match"),
            Self::NotApplicable => write!(f, "n/a"),
        }
    }
}

/// Ground truth for position `index` of `sequence`.
///
/// Panics if `index` is out of bounds.
pub fn truth_at(sequence: &[u8], n_back: usize, index: usize) -> Truth {
    if index < n_back {
        Truth::NotApplicable
    } else if sequence[index] == sequence[index - n_back] {
        Truth::Match
    } else {
        Truth::NoMatch
    }
}

/// Ground truth for every position of `sequence`.
pub fn evaluate(sequence: &[u8], n_back: usize) -> Vec<Truth> {
    (0..sequence.len())
        .map(|i| truth_at(sequence, n_back, i))
        .collect()
}
