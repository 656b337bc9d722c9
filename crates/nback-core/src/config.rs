//! Game configuration and validation.
//!
//! [`GameSettings`] is the plain, user-editable form (every field public, with
//! defaults). [`GameSettings::validate`] is the only way to obtain a
//! [`GameConfig`], so a session can never start with `total <= n_back`.

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_N_BACK: usize = 2;
pub const DEFAULT_TOTAL: usize = 10;
pub const MAX_N_BACK: usize = 20;
pub const MAX_TOTAL: usize = 500;

/// Stimuli are drawn from `1..=range_max`; single digits only.
pub const DEFAULT_RANGE_MAX: u8 = 9;
pub const MIN_RANGE_MAX: u8 = 2;
pub const MAX_RANGE_MAX: u8 = 9;

pub const DEFAULT_RESPONSE_WINDOW: Duration = Duration::from_secs(2);
pub const MIN_RESPONSE_WINDOW: Duration = Duration::from_millis(100);
pub const MAX_RESPONSE_WINDOW: Duration = Duration::from_secs(60);

/// How long warm-up trials (index < n_back) stay on screen.
pub const DEFAULT_HOLD: Duration = Duration::from_secs(2);
pub const MAX_HOLD: Duration = Duration::from_secs(60);

/// Blank pause between two trials.
pub const DEFAULT_GAP: Duration = Duration::from_millis(100);
pub const MAX_GAP: Duration = Duration::from_secs(10);

pub const DEFAULT_MATCH_KEY: char = 'v';
pub const DEFAULT_NO_MATCH_KEY: char = 'n';

// ---------------------------------------------------------------------------
// GameSettings
// ---------------------------------------------------------------------------

/// Unvalidated game parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub n_back: usize,
    pub total: usize,
    pub range_max: u8,
    pub response_window: Duration,
    pub hold: Duration,
    pub gap: Duration,
    pub match_key: char,
    pub no_match_key: char,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            n_back: DEFAULT_N_BACK,
            total: DEFAULT_TOTAL,
            range_max: DEFAULT_RANGE_MAX,
            response_window: DEFAULT_RESPONSE_WINDOW,
            hold: DEFAULT_HOLD,
            gap: DEFAULT_GAP,
            match_key: DEFAULT_MATCH_KEY,
            no_match_key: DEFAULT_NO_MATCH_KEY,
        }
    }
}

impl GameSettings {
    /// Default settings with the given `n_back` and `total`.
    pub fn new(n_back: usize, total: usize) -> Self {
        Self {
            n_back,
            total,
            ..Self::default()
        }
    }

    /// Check every field and produce a [`GameConfig`].
    pub fn validate(self) -> Result<GameConfig, ConfigError> {
        if self.n_back == 0 {
            return Err(ConfigError::ZeroNBack);
        }
        check_bound("n-back", self.n_back as u64, 1, MAX_N_BACK as u64)?;
        check_bound("total", self.total as u64, 2, MAX_TOTAL as u64)?;
        if self.total <= self.n_back {
            return Err(ConfigError::TotalNotAboveNBack {
                n_back: self.n_back,
                total: self.total,
            });
        }
        check_bound(
            "range",
            u64::from(self.range_max),
            u64::from(MIN_RANGE_MAX),
            u64::from(MAX_RANGE_MAX),
        )?;
        check_bound(
            "response window (ms)",
            millis(self.response_window),
            millis(MIN_RESPONSE_WINDOW),
            millis(MAX_RESPONSE_WINDOW),
        )?;
        check_bound("hold (ms)", millis(self.hold), 0, millis(MAX_HOLD))?;
        check_bound("gap (ms)", millis(self.gap), 0, millis(MAX_GAP))?;

        let match_key = gesture_key(self.match_key)?;
        let no_match_key = gesture_key(self.no_match_key)?;
        if match_key == no_match_key {
            return Err(ConfigError::SameKeys(match_key));
        }

        Ok(GameConfig {
            n_back: self.n_back,
            total: self.total,
            range_max: self.range_max,
            response_window: self.response_window,
            hold: self.hold,
            gap: self.gap,
            match_key,
            no_match_key,
        })
    }
}

fn check_bound(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Gesture keys are compared case-insensitively, so store them lowercased.
fn gesture_key(c: char) -> Result<char, ConfigError> {
    if c.is_control() || c.is_whitespace() {
        return Err(ConfigError::UnusableKey(c));
    }
    Ok(c.to_ascii_lowercase())
}

/// Parse a user-typed count such as `"  12 "`.
pub fn parse_count(field: &'static str, input: &str) -> Result<usize, ConfigError> {
    let trimmed = input.trim();
    trimmed.parse().map_err(|_| ConfigError::NotNumeric {
        field,
        input: trimmed.to_string(),
    })
}

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Validated game parameters. Invariant: `1 <= n_back < total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    n_back: usize,
    total: usize,
    range_max: u8,
    response_window: Duration,
    hold: Duration,
    gap: Duration,
    match_key: char,
    no_match_key: char,
}

impl GameConfig {
    /// Validate `n_back`/`total` with every other field at its default.
    pub fn new(n_back: usize, total: usize) -> Result<Self, ConfigError> {
        GameSettings::new(n_back, total).validate()
    }

    pub fn n_back(&self) -> usize {
        self.n_back
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn range_max(&self) -> u8 {
        self.range_max
    }

    /// Deadline for each scored trial.
    pub fn response_window(&self) -> Duration {
        self.response_window
    }

    pub fn hold(&self) -> Duration {
        self.hold
    }

    pub fn gap(&self) -> Duration {
        self.gap
    }

    pub fn match_key(&self) -> char {
        self.match_key
    }

    pub fn no_match_key(&self) -> char {
        self.no_match_key
    }

    /// Upper bound on the wall-clock length of a session, ignoring render time.
    pub fn max_session_duration(&self) -> Duration {
        let per_trial = self.hold.max(self.response_window) + self.gap;
        per_trial * u32::try_from(self.total).unwrap_or(u32::MAX)
    }
}
