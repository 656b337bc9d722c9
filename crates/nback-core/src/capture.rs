//! Deadline-bounded response capture.
//!
//! One call waits for the player to press the match or no-match key, or for
//! the deadline to pass. The wait is a single loop over [`Keys::poll`] with
//! every timeout clamped to the time left before a monotonic deadline, so the
//! call returns within the deadline plus scheduling slack no matter what
//! arrives on the input (nothing, garbage, or a flood of keys). No threads,
//! timers or signals are involved.

use std::time::{Duration, Instant};

use log::{debug, trace};
use serde::Serialize;

use crate::config::GameConfig;
use crate::error::CaptureError;
use crate::io::{Key, Keys, RawModeGuard, STATUS_LINE, Screen};

/// Granularity of the on-screen countdown. Advisory only.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// What the player did on one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Match,
    NoMatch,
    /// Silence until the deadline. A valid outcome, not an error.
    NoResponse,
}

impl Response {
    /// Boolean claim made by the player. Silence claims "no match".
    pub fn as_bool(self) -> bool {
        matches!(self, Self::Match)
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match => write!(f, "match"),
            Self::NoMatch => write!(f, "no-match"),
            Self::NoResponse => write!(f, "-"),
        }
    }
}

/// Result of one capture call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    pub response: Response,
    /// Time from the start of the call to the decision (or the deadline).
    pub elapsed: Duration,
}

impl Capture {
    /// A trial on which no capture was attempted.
    pub fn skipped() -> Self {
        Self {
            response: Response::NoResponse,
            elapsed: Duration::ZERO,
        }
    }
}

/// Maps gesture keys to decisions and runs the bounded wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCapture {
    match_key: char,
    no_match_key: char,
    tick: Duration,
}

impl ResponseCapture {
    /// `match_key` and `no_match_key` are matched case-insensitively.
    pub fn new(match_key: char, no_match_key: char) -> Self {
        Self {
            match_key: match_key.to_ascii_lowercase(),
            no_match_key: no_match_key.to_ascii_lowercase(),
            tick: DEFAULT_TICK,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.match_key(), config.no_match_key())
    }

    /// Change the countdown refresh interval (clamped to at least 1 ms).
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick.max(Duration::from_millis(1));
        self
    }

    /// Decision encoded by `key`, if it is one of the two gestures.
    pub fn classify(&self, key: Key) -> Option<Response> {
        let Key::Char(c) = key else {
            return None;
        };
        let c = c.to_ascii_lowercase();
        if c == self.match_key {
            Some(Response::Match)
        } else if c == self.no_match_key {
            Some(Response::NoMatch)
        } else {
            None
        }
    }

    /// Status-line text for `left` time remaining.
    pub fn countdown_text(&self, left: Duration) -> String {
        let secs = left.as_millis().div_ceil(1000);
        format!(
            "'{}' = match, '{}' = no match   [{secs}s]",
            self.match_key, self.no_match_key
        )
    }

    /// Wait up to `deadline` for a gesture.
    ///
    /// Raw mode is held for exactly the duration of this call. The first
    /// gesture ends the wait, so nothing can replace a decision once made.
    pub fn capture<S, K>(
        &self,
        screen: &mut S,
        keys: &mut K,
        deadline: Duration,
    ) -> Result<Capture, CaptureError>
    where
        S: Screen + ?Sized,
        K: Keys + ?Sized,
    {
        let started = Instant::now();
        let until = started + deadline;
        let mut guard = RawModeGuard::acquire(keys)?;
        let mut next_tick = started;

        loop {
            let now = Instant::now();
            if now >= until {
                debug!("no response within {}ms", deadline.as_millis());
                screen
                    .show("no answer", STATUS_LINE)
                    .map_err(CaptureError::Display)?;
                return Ok(Capture {
                    response: Response::NoResponse,
                    elapsed: now - started,
                });
            }

            if now >= next_tick {
                screen
                    .show(&self.countdown_text(until - now), STATUS_LINE)
                    .map_err(CaptureError::Display)?;
                while next_tick <= now {
                    next_tick += self.tick;
                }
            }

            let wait = until.min(next_tick).saturating_duration_since(now);
            if !guard.keys().poll(wait)? {
                continue;
            }

            match guard.keys().read()? {
                Key::Interrupt => return Err(CaptureError::Interrupted),
                key => match self.classify(key) {
                    Some(response) => {
                        let elapsed = started.elapsed();
                        debug!("{response} after {}ms", elapsed.as_millis());
                        return Ok(Capture { response, elapsed });
                    }
                    None => trace!("ignoring {key:?}"),
                },
            }
        }
    }
}

impl Default for ResponseCapture {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_MATCH_KEY,
            crate::config::DEFAULT_NO_MATCH_KEY,
        )
    }
}
