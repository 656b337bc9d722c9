//! Error types for the nback engine.
//!
//! Configuration problems are recoverable (the caller re-prompts before a
//! session starts). Capture and display problems are fatal to the running
//! session. A trial that times out is not an error; see
//! [`Response::NoResponse`](crate::capture::Response::NoResponse).

use std::io;

use thiserror::Error;

/// A game configuration was rejected before the session started.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `total` must be strictly greater than `n_back`.
    #[error("total ({total}) must be greater than n-back ({n_back})")]
    TotalNotAboveNBack { n_back: usize, total: usize },

    /// `n_back` of zero would compare every stimulus with itself.
    #[error("n-back must be at least 1")]
    ZeroNBack,

    /// A numeric field could not be parsed.
    #[error("{field} must be a whole number, got '{input}'")]
    NotNumeric { field: &'static str, input: String },

    /// A numeric field is outside its accepted bounds.
    #[error("{field} = {value} is out of range ({min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    /// Match and no-match gestures are bound to the same key.
    #[error("match and no-match keys must differ (both are '{0}')")]
    SameKeys(char),

    /// A gesture key is not a printable character.
    #[error("key {0:?} cannot be used as a gesture")]
    UnusableKey(char),

    /// A supplied stimulus sequence does not fit the configuration.
    #[error("sequence has {actual} stimuli, expected {expected}")]
    SequenceLength { expected: usize, actual: usize },

    /// A supplied stimulus lies outside `1..=range_max`.
    #[error("stimulus {value} at position {index} is outside 1..={range_max}")]
    StimulusOutOfRange {
        index: usize,
        value: u8,
        range_max: u8,
    },
}

/// The input collaborator failed while waiting for a decision.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Raw mode could not be set, or polling/reading the terminal failed.
    #[error("terminal input unavailable: {0}")]
    Input(#[from] io::Error),

    /// The countdown could not be drawn.
    #[error("countdown display failed: {0}")]
    Display(#[source] io::Error),

    /// The player pressed Ctrl-C or Esc during a capture.
    #[error("interrupted")]
    Interrupted,
}

/// A running session was aborted. No partial score is produced.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("display failed: {0}")]
    Display(#[source] io::Error),

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

impl GameError {
    /// Whether the session ended because the player asked to quit.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Self::Capture(CaptureError::Interrupted))
    }
}
