//! # nback-core
//!
//! **The N-back working-memory game, without the terminal.**
//!
//! Digits are shown one at a time. From position `n_back` onward the player
//! decides, within a fixed response window, whether the current digit equals
//! the one shown `n_back` steps earlier.
//!
//! ## Quick Start
//!
//! ```no_run
//! use nback_core::{GameConfig, GameLoop, StimulusGenerator};
//! # fn play(screen: &mut impl nback_core::Screen, keys: &mut impl nback_core::Keys)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//!
//! let config = GameConfig::new(2, 10)?;
//! let mut generator = StimulusGenerator::from_os();
//! let log = GameLoop::new(config, &mut generator).run(screen, keys)?;
//! print!("{}", log.render());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! Config → StimulusGenerator → sequence → ground truth → GameLoop
//! (display → capture → record, per trial) → report
//!
//! The terminal is reached only through the [`Screen`] and [`Keys`] traits.
//! [`ResponseCapture`] waits on [`Keys::poll`] with a timeout clamped to a
//! monotonic deadline, so a trial never waits longer than its window.

pub mod capture;
pub mod config;
pub mod error;
pub mod game;
pub mod io;
pub mod report;
pub mod stimulus;
pub mod truth;

#[cfg(test)]
mod testing;

pub use capture::{Capture, Response, ResponseCapture};
pub use config::{GameConfig, GameSettings, parse_count};
pub use error::{CaptureError, ConfigError, GameError};
pub use game::{GameLoop, Phase, SessionLog, Trial};
pub use io::{Key, Keys, RawModeGuard, Screen};
pub use report::{Summary, Verdict, report, verdict};
pub use stimulus::{StimulusGenerator, StimulusSequence};
pub use truth::{Truth, evaluate};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
