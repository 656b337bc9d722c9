//! The game loop: `Setup → Running(i) → Done`.
//!
//! Each trial is rendered, then either held on screen (the first `n_back`
//! trials, which have nothing to compare against) or handed to
//! [`ResponseCapture`]. A trial is appended to the log only once it is fully
//! settled, and any display or capture failure aborts the whole session.

use std::thread;
use std::time::Duration;

use log::{debug, info};
use serde::{Serialize, Serializer};

use crate::capture::{Capture, Response, ResponseCapture};
use crate::config::GameConfig;
use crate::error::{ConfigError, GameError};
use crate::io::{HEADER_LINE, Keys, STATUS_LINE, STIMULUS_LINE, Screen};
use crate::report::{self, Summary};
use crate::stimulus::{StimulusGenerator, StimulusSequence};
use crate::truth::{self, Truth};

/// Where the loop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Running(usize),
    Done,
}

// ---------------------------------------------------------------------------
// Trial
// ---------------------------------------------------------------------------

/// One completed trial. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trial {
    index: usize,
    stimulus: u8,
    truth: Truth,
    response: Response,
    #[serde(rename = "reaction_ms", serialize_with = "as_millis")]
    reaction: Option<Duration>,
}

impl Trial {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn stimulus(&self) -> u8 {
        self.stimulus
    }

    pub fn truth(&self) -> Truth {
        self.truth
    }

    pub fn response(&self) -> Response {
        self.response
    }

    /// Time to the gesture; `None` when the player stayed silent.
    pub fn reaction(&self) -> Option<Duration> {
        self.reaction
    }
}

fn as_millis<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    match d {
        Some(d) => s.serialize_some(&u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
        None => s.serialize_none(),
    }
}

/// A trial that has been shown but not yet answered.
///
/// `settle` consumes it, so a trial can receive exactly one response.
#[derive(Debug)]
struct PendingTrial {
    index: usize,
    stimulus: u8,
    truth: Truth,
}

impl PendingTrial {
    fn settle(self, capture: Capture) -> Trial {
        let reaction = match capture.response {
            Response::NoResponse => None,
            _ => Some(capture.elapsed),
        };
        Trial {
            index: self.index,
            stimulus: self.stimulus,
            truth: self.truth,
            response: capture.response,
            reaction,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionLog
// ---------------------------------------------------------------------------

/// Finalized result of a session, produced only after the last trial.
#[derive(Debug, Clone, Serialize)]
pub struct SessionLog {
    pub n_back: usize,
    pub total: usize,
    pub range_max: u8,
    pub response_window_ms: u64,
    pub trials: Vec<Trial>,
}

impl SessionLog {
    pub fn sequence(&self) -> Vec<u8> {
        self.trials.iter().map(Trial::stimulus).collect()
    }

    pub fn responses(&self) -> Vec<Response> {
        self.trials.iter().map(Trial::response).collect()
    }

    pub fn truths(&self) -> Vec<Truth> {
        self.trials.iter().map(Trial::truth).collect()
    }

    pub fn summary(&self) -> Summary {
        Summary::from_trials(&self.trials)
    }

    /// Per-trial table followed by the summary line.
    pub fn render(&self) -> String {
        let mut out = report::report(&self.sequence(), &self.responses(), &self.truths());
        out.push_str(&self.summary().to_string());
        out.push('\n');
        out
    }
}

// ---------------------------------------------------------------------------
// GameLoop
// ---------------------------------------------------------------------------

/// Single-owner session state.
#[derive(Debug)]
pub struct GameLoop {
    config: GameConfig,
    sequence: StimulusSequence,
    truth: Vec<Truth>,
    trials: Vec<Trial>,
    phase: Phase,
    capture: ResponseCapture,
}

impl GameLoop {
    /// Generate a fresh sequence for `config` and set up a session.
    pub fn new<R: rand::Rng>(config: GameConfig, generator: &mut StimulusGenerator<R>) -> Self {
        let sequence = generator.generate(config.total(), config.range_max());
        Self::build(config, sequence)
    }

    /// Set up a session over a fixed sequence.
    pub fn with_sequence(
        config: GameConfig,
        sequence: StimulusSequence,
    ) -> Result<Self, ConfigError> {
        if sequence.len() != config.total() {
            return Err(ConfigError::SequenceLength {
                expected: config.total(),
                actual: sequence.len(),
            });
        }
        let sequence = StimulusSequence::from_values(sequence.to_vec(), config.range_max())?;
        Ok(Self::build(config, sequence))
    }

    fn build(config: GameConfig, sequence: StimulusSequence) -> Self {
        let truth = truth::evaluate(&sequence, config.n_back());
        let capture = ResponseCapture::from_config(&config);
        Self {
            trials: Vec::with_capacity(config.total()),
            config,
            sequence,
            truth,
            phase: Phase::Setup,
            capture,
        }
    }

    /// Replace the capture settings (e.g. a faster countdown tick).
    pub fn with_capture(mut self, capture: ResponseCapture) -> Self {
        self.capture = capture;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn sequence(&self) -> &StimulusSequence {
        &self.sequence
    }

    pub fn truth(&self) -> &[Truth] {
        &self.truth
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Play every trial in order and return the finished log.
    ///
    /// Consumes the session: after an error there is nothing left to resume.
    pub fn run<S, K>(mut self, screen: &mut S, keys: &mut K) -> Result<SessionLog, GameError>
    where
        S: Screen + ?Sized,
        K: Keys + ?Sized,
    {
        info!(
            "starting {}-back session: {} trials, window {}ms",
            self.config.n_back(),
            self.config.total(),
            self.config.response_window().as_millis()
        );
        self.phase = Phase::Running(0);

        while let Phase::Running(index) = self.phase {
            let trial = self.play_trial(index, screen, keys)?;
            debug!(
                "trial {}: stimulus {} truth {} response {}",
                index + 1,
                trial.stimulus,
                trial.truth,
                trial.response
            );
            self.trials.push(trial);
            self.phase = if index + 1 < self.sequence.len() {
                Phase::Running(index + 1)
            } else {
                Phase::Done
            };
        }

        info!("session finished");
        Ok(SessionLog {
            n_back: self.config.n_back(),
            total: self.config.total(),
            range_max: self.config.range_max(),
            response_window_ms: u64::try_from(self.config.response_window().as_millis())
                .unwrap_or(u64::MAX),
            trials: self.trials,
        })
    }

    fn play_trial<S, K>(
        &self,
        index: usize,
        screen: &mut S,
        keys: &mut K,
    ) -> Result<Trial, GameError>
    where
        S: Screen + ?Sized,
        K: Keys + ?Sized,
    {
        let pending = PendingTrial {
            index,
            stimulus: self.sequence[index],
            truth: self.truth[index],
        };
        let n_back = self.config.n_back();

        screen.clear().map_err(GameError::Display)?;
        screen
            .show(
                &format!(
                    "{n_back}-back   trial {}/{}",
                    index + 1,
                    self.config.total()
                ),
                HEADER_LINE,
            )
            .map_err(GameError::Display)?;
        screen
            .show(&pending.stimulus.to_string(), STIMULUS_LINE)
            .map_err(GameError::Display)?;

        let trial = if pending.truth == Truth::NotApplicable {
            screen
                .show(
                    &format!("memorize ({} of {n_back})", index + 1),
                    STATUS_LINE,
                )
                .map_err(GameError::Display)?;
            thread::sleep(self.config.hold());
            pending.settle(Capture::skipped())
        } else {
            let capture = self
                .capture
                .capture(screen, keys, self.config.response_window())?;
            pending.settle(capture)
        };

        screen.clear().map_err(GameError::Display)?;
        thread::sleep(self.config.gap());
        Ok(trial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameSettings;
    use crate::io::Key;
    use crate::testing::{RecordingScreen, ScriptedKeys};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn fast_config(n_back: usize, total: usize) -> GameConfig {
        let mut s = GameSettings::new(n_back, total);
        s.response_window = ms(150);
        s.hold = Duration::ZERO;
        s.gap = Duration::ZERO;
        s.validate().unwrap()
    }

    fn seq(values: &[u8]) -> StimulusSequence {
        StimulusSequence::from_values(values.to_vec(), 9).unwrap()
    }

    #[test]
    fn warm_up_trials_skip_capture() {
        let game = GameLoop::with_sequence(fast_config(2, 5), seq(&[1, 2, 1, 3, 3])).unwrap();
        let mut screen = RecordingScreen::default();
        let mut keys = ScriptedKeys::new(vec![
            vec![(ms(0), Key::Char('v'))],
            vec![(ms(0), Key::Char('n'))],
            vec![],
        ]);
        let log = game.run(&mut screen, &mut keys).unwrap();

        assert_eq!(keys.entered, 3, "only scored trials capture");
        assert_eq!(
            log.responses(),
            vec![
                Response::NoResponse,
                Response::NoResponse,
                Response::Match,
                Response::NoMatch,
                Response::NoResponse,
            ]
        );
        assert_eq!(
            log.truths(),
            vec![
                Truth::NotApplicable,
                Truth::NotApplicable,
                Truth::Match,
                Truth::NoMatch,
                Truth::NoMatch,
            ]
        );
        assert_eq!(log.sequence(), vec![1, 2, 1, 3, 3]);
    }

    #[test]
    fn with_capture_overrides_keys_and_tick() {
        let game = GameLoop::with_sequence(fast_config(1, 2), seq(&[4, 4]))
            .unwrap()
            .with_capture(ResponseCapture::new('x', 'y').with_tick(ms(20)));
        let mut screen = RecordingScreen::default();
        let mut keys = ScriptedKeys::new(vec![vec![
            (ms(0), Key::Char('v')),
            (ms(60), Key::Char('x')),
        ]]);
        let log = game.run(&mut screen, &mut keys).unwrap();

        assert_eq!(log.responses()[1], Response::Match);
        let ticks = screen
            .shown_on(STATUS_LINE)
            .into_iter()
            .filter(|l| l.starts_with("'x' = match"))
            .count();
        assert!(ticks >= 3, "expected a countdown refresh every 20ms, got {ticks}");
    }

    #[test]
    fn trials_are_logged_in_order() {
        let game = GameLoop::with_sequence(fast_config(1, 4), seq(&[5, 6, 7, 8])).unwrap();
        let mut screen = RecordingScreen::default();
        let mut keys = ScriptedKeys::new(vec![vec![]; 3]);
        let log = game.run(&mut screen, &mut keys).unwrap();
        let indices: Vec<usize> = log.trials.iter().map(Trial::index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(screen.shown_on(STIMULUS_LINE), vec!["5", "6", "7", "8"]);
    }

    #[test]
    fn reaction_recorded_only_for_gestures() {
        let game = GameLoop::with_sequence(fast_config(1, 3), seq(&[2, 2, 3])).unwrap();
        let mut screen = RecordingScreen::default();
        let mut keys = ScriptedKeys::new(vec![vec![(ms(10), Key::Char('v'))], vec![]]);
        let log = game.run(&mut screen, &mut keys).unwrap();
        assert_eq!(log.trials[0].reaction(), None);
        assert!(log.trials[1].reaction().is_some_and(|d| d >= ms(10)));
        assert_eq!(log.trials[2].reaction(), None);
    }

    #[test]
    fn settled_trial_keeps_its_first_decision() {
        let pending = PendingTrial {
            index: 3,
            stimulus: 4,
            truth: Truth::Match,
        };
        let trial = pending.settle(Capture {
            response: Response::Match,
            elapsed: ms(300),
        });
        assert_eq!(trial.response(), Response::Match);
        assert_eq!(trial.reaction(), Some(ms(300)));
    }

    #[test]
    fn display_failure_aborts_session() {
        let game = GameLoop::with_sequence(fast_config(1, 3), seq(&[1, 1, 1])).unwrap();
        let mut screen = RecordingScreen {
            fail_after: Some(5),
            ..RecordingScreen::default()
        };
        let mut keys = ScriptedKeys::new(vec![vec![]; 2]);
        let err = game.run(&mut screen, &mut keys).unwrap_err();
        assert!(matches!(err, GameError::Display(_)));
        assert!(!keys.raw);
    }

    #[test]
    fn capture_failure_aborts_session_and_restores_mode() {
        let game = GameLoop::with_sequence(fast_config(1, 3), seq(&[1, 1, 1])).unwrap();
        let mut screen = RecordingScreen::default();
        let mut keys = ScriptedKeys::default();
        keys.fail_poll = true;
        let err = game.run(&mut screen, &mut keys).unwrap_err();
        assert!(matches!(err, GameError::Capture(_)));
        assert!(!err.is_interrupt());
        assert!(!keys.raw);
        assert_eq!(keys.entered, keys.left);
    }

    #[test]
    fn interrupt_aborts_session() {
        let game = GameLoop::with_sequence(fast_config(1, 3), seq(&[1, 1, 1])).unwrap();
        let mut screen = RecordingScreen::default();
        let mut keys = ScriptedKeys::new(vec![vec![(ms(0), Key::Interrupt)]]);
        let err = game.run(&mut screen, &mut keys).unwrap_err();
        assert!(err.is_interrupt());
    }

    #[test]
    fn with_sequence_checks_length_and_range() {
        assert_eq!(
            GameLoop::with_sequence(fast_config(1, 3), seq(&[1, 2])).unwrap_err(),
            ConfigError::SequenceLength {
                expected: 3,
                actual: 2
            }
        );
        let mut s = GameSettings::new(1, 3);
        s.range_max = 3;
        let config = s.validate().unwrap();
        assert!(matches!(
            GameLoop::with_sequence(config, seq(&[1, 2, 9])),
            Err(ConfigError::StimulusOutOfRange { index: 2, .. })
        ));
    }

    #[test]
    fn new_generates_sequence_of_configured_length() {
        let mut generator = StimulusGenerator::seeded(3);
        let game = GameLoop::new(fast_config(2, 12), &mut generator);
        assert_eq!(game.phase(), Phase::Setup);
        assert_eq!(game.sequence().len(), 12);
        assert_eq!(game.truth().len(), 12);
        assert!(game.sequence().iter().all(|&v| (1..=9).contains(&v)));
    }

    #[test]
    fn session_finishes_within_bound() {
        let config = fast_config(1, 4);
        let bound = config.max_session_duration() + ms(300);
        let game = GameLoop::with_sequence(config, seq(&[1, 2, 3, 4])).unwrap();
        let mut screen = RecordingScreen::default();
        let mut keys = ScriptedKeys::new(vec![vec![]; 3]);
        let start = std::time::Instant::now();
        game.run(&mut screen, &mut keys).unwrap();
        assert!(start.elapsed() < bound);
    }

    #[test]
    fn log_serializes_reaction_in_millis() {
        let game = GameLoop::with_sequence(fast_config(1, 2), seq(&[7, 7])).unwrap();
        let mut screen = RecordingScreen::default();
        let mut keys = ScriptedKeys::new(vec![vec![(ms(0), Key::Char('v'))]]);
        let log = game.run(&mut screen, &mut keys).unwrap();
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["n_back"], 1);
        assert_eq!(json["trials"][0]["reaction_ms"], serde_json::Value::Null);
        assert!(json["trials"][1]["reaction_ms"].is_u64());
        assert_eq!(json["trials"][1]["response"], "match");
        assert_eq!(json["trials"][1]["truth"], "match");
    }
}
