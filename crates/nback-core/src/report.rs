//! Scoring and the end-of-game table.

use serde::Serialize;

use crate::capture::Response;
use crate::game::Trial;
use crate::truth::Truth;

/// Outcome of comparing one response with its ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Ok,
    Fail,
    NotApplicable,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Fail => write!(f, "FAIL"),
            Self::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// `N/A` for warm-up trials, `OK` when the player's claim equals the truth.
pub fn verdict(response: Response, truth: Truth) -> Verdict {
    match truth.as_bool() {
        None => Verdict::NotApplicable,
        Some(expected) if expected == response.as_bool() => Verdict::Ok,
        Some(_) => Verdict::Fail,
    }
}

/// Render the per-trial table: `stimulus | response | truth | result`.
///
/// The three slices are parallel and must have the same length.
pub fn report(sequence: &[u8], responses: &[Response], truth: &[Truth]) -> String {
    debug_assert_eq!(sequence.len(), responses.len());
    debug_assert_eq!(sequence.len(), truth.len());

    let mut out = format!(
        "{:>8}  {:<9} {:<9} {:<6}\n",
        "stimulus", "response", "truth", "result"
    );
    out.push_str(&"-".repeat(36));
    out.push('\n');
    for ((stimulus, response), truth) in sequence.iter().zip(responses).zip(truth) {
        out.push_str(&format!(
            "{:>8}  {:<9} {:<9} {:<6}\n",
            stimulus,
            response.to_string(),
            truth.to_string(),
            verdict(*response, *truth).to_string()
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Signal-detection counts over the scored trials.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub scored: usize,
    pub correct: usize,
    pub hits: usize,
    pub misses: usize,
    pub false_alarms: usize,
    pub correct_rejections: usize,
    pub no_response: usize,
    /// `correct / scored`, or 0 when nothing was scored.
    pub accuracy: f64,
    pub mean_reaction_ms: Option<f64>,
}

impl Summary {
    pub fn from_trials(trials: &[Trial]) -> Self {
        let mut s = Self::default();
        let mut reaction_total = 0.0;
        let mut reaction_count = 0usize;

        for trial in trials {
            let Some(target) = trial.truth().as_bool() else {
                continue;
            };
            s.scored += 1;
            let claimed = trial.response().as_bool();
            match (target, claimed) {
                (true, true) => s.hits += 1,
                (true, false) => s.misses += 1,
                (false, true) => s.false_alarms += 1,
                (false, false) => s.correct_rejections += 1,
            }
            if trial.response() == Response::NoResponse {
                s.no_response += 1;
            }
            if let Some(rt) = trial.reaction() {
                reaction_total += rt.as_secs_f64() * 1000.0;
                reaction_count += 1;
            }
        }

        s.correct = s.hits + s.correct_rejections;
        if s.scored > 0 {
            s.accuracy = s.correct as f64 / s.scored as f64;
        }
        if reaction_count > 0 {
            s.mean_reaction_ms = Some(reaction_total / reaction_count as f64);
        }
        s
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "score {}/{} ({:.0}%)  hits {}  misses {}  false alarms {}  unanswered {}",
            self.correct,
            self.scored,
            self.accuracy * 100.0,
            self.hits,
            self.misses,
            self.false_alarms,
            self.no_response
        )?;
        if let Some(rt) = self.mean_reaction_ms {
            write!(f, "  mean rt {rt:.0}ms")?;
        }
        Ok(())
    }
}
