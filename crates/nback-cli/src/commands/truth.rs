//! `nback truth`: print the correct answers for a given digit sequence.

use nback_core::config::MAX_RANGE_MAX;
use nback_core::{ConfigError, StimulusSequence, Truth};

/// Check the arguments and compute the expected answers.
pub fn answers(n_back: usize, digits: &[u8]) -> Result<Vec<Truth>, ConfigError> {
    if n_back == 0 {
        return Err(ConfigError::ZeroNBack);
    }
    let sequence = StimulusSequence::from_values(digits.to_vec(), MAX_RANGE_MAX)?;
    Ok(nback_core::evaluate(&sequence, n_back))
}

/// Format one row per position: index, digit, expected answer.
pub fn render(sequence: &[u8], truth: &[Truth]) -> String {
    let mut out = format!("{:>5}  {:>5}  {}\n", "#", "digit", "answer");
    for (i, (digit, t)) in sequence.iter().zip(truth).enumerate() {
        out.push_str(&format!("{:>5}  {:>5}  {t}\n", i + 1, digit));
    }
    out
}

pub fn run(n_back: usize, digits: &[u8], json: bool) {
    let truth = match answers(n_back, digits) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string(&truth) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", render(digits, &truth));
    }
}
