//! Interactive prompts for the session parameters.
//!
//! Counts missing from the command line are asked for on stdin. Bad input or
//! an invalid `n_back`/`total` pair is reported and asked again; anything else
//! wrong with the settings is returned as an error.

use std::io::{self, BufRead, Write};

use nback_core::{ConfigError, GameConfig, GameSettings, parse_count};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("reading input: {0}")]
    Io(#[from] io::Error),
}

/// Ask for one count until the answer parses. Empty input takes `default`.
pub fn ask_count<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    field: &'static str,
    default: usize,
) -> Result<usize, SetupError> {
    loop {
        write!(output, "{field} [{default}]: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
        }
        if line.trim().is_empty() {
            return Ok(default);
        }
        match parse_count(field, &line) {
            Ok(value) => return Ok(value),
            Err(e) => writeln!(output, "  {e}")?,
        }
    }
}

/// Whether asking again can fix `e`: the field at fault must be one that
/// was prompted for rather than fixed on the command line.
fn can_reprompt(e: &ConfigError, n_back: Option<usize>, total: Option<usize>) -> bool {
    match e {
        ConfigError::ZeroNBack => n_back.is_none(),
        ConfigError::OutOfRange { field: "n-back", .. } => n_back.is_none(),
        ConfigError::OutOfRange { field: "total", .. } => total.is_none(),
        ConfigError::TotalNotAboveNBack { .. } => n_back.is_none() || total.is_none(),
        _ => false,
    }
}

/// Fill in `n_back`/`total` (prompting for whichever is `None`) and validate.
pub fn ask_config<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    mut settings: GameSettings,
    n_back: Option<usize>,
    total: Option<usize>,
) -> Result<GameConfig, SetupError> {
    loop {
        settings.n_back = match n_back {
            Some(n) => n,
            None => ask_count(input, output, "n-back", settings.n_back)?,
        };
        settings.total = match total {
            Some(t) => t,
            None => ask_count(input, output, "total", settings.total)?,
        };

        match settings.clone().validate() {
            Ok(config) => return Ok(config),
            Err(e) if can_reprompt(&e, n_back, total) => {
                log::debug!("re-prompting after {e:?}");
                writeln!(output, "  {e}")?;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(
        input: &str,
        n_back: Option<usize>,
        total: Option<usize>,
    ) -> (Result<GameConfig, SetupError>, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = ask_config(&mut reader, &mut out, GameSettings::default(), n_back, total);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn empty_answers_take_defaults() {
        let (config, _) = run("\n\n", None, None);
        let config = config.unwrap();
        assert_eq!(config.n_back(), 2);
        assert_eq!(config.total(), 10);
    }

    #[test]
    fn non_numeric_is_asked_again() {
        let (config, out) = run("two\n3\n8\n", None, None);
        let config = config.unwrap();
        assert_eq!((config.n_back(), config.total()), (3, 8));
        assert!(out.contains("must be a whole number"));
    }

    #[test]
    fn total_not_above_n_back_is_asked_again() {
        let (config, out) = run("5\n5\n5\n6\n", None, None);
        let config = config.unwrap();
        assert_eq!((config.n_back(), config.total()), (5, 6));
        assert!(out.contains("must be greater than n-back"));
    }

    #[test]
    fn only_missing_fields_are_prompted() {
        let (config, out) = run("4\n", Some(3), None);
        assert_eq!(config.unwrap().total(), 4);
        assert!(!out.contains("n-back ["));
        assert!(out.contains("total ["));
    }

    #[test]
    fn fixed_invalid_pair_is_an_error() {
        let (config, _) = run("", Some(5), Some(3));
        assert!(matches!(
            config,
            Err(SetupError::Config(ConfigError::TotalNotAboveNBack { .. }))
        ));
    }

    #[test]
    fn bad_n_back_flag_is_not_reprompted_through_total() {
        let (config, out) = run("6\n7\n8\n", Some(0), None);
        assert!(matches!(config, Err(SetupError::Config(ConfigError::ZeroNBack))));
        assert_eq!(out.matches("total [").count(), 1);

        let (config, _) = run("6\n", Some(25), None);
        assert!(matches!(
            config,
            Err(SetupError::Config(ConfigError::OutOfRange { field: "n-back", .. }))
        ));
    }

    #[test]
    fn bad_total_flag_is_not_reprompted_through_n_back() {
        let (config, out) = run("2\n3\n", None, Some(1000));
        assert!(matches!(
            config,
            Err(SetupError::Config(ConfigError::OutOfRange { field: "total", .. }))
        ));
        assert_eq!(out.matches("n-back [").count(), 1);
    }

    #[test]
    fn pair_error_is_reprompted_when_one_side_was_asked() {
        let (config, out) = run("3\n6\n", Some(4), None);
        assert_eq!(config.unwrap().total(), 6);
        assert!(out.contains("must be greater than n-back"));
    }

    #[test]
    fn closed_input_is_an_error() {
        let (config, _) = run("", None, None);
        assert!(matches!(config, Err(SetupError::Io(_))));
    }

    #[test]
    fn unrelated_setting_error_is_not_reprompted() {
        let mut settings = GameSettings::default();
        settings.range_max = 0;
        let mut reader = Cursor::new(b"2\n10\n".to_vec());
        let mut out = Vec::new();
        let result = ask_config(&mut reader, &mut out, settings, None, None);
        assert!(matches!(
            result,
            Err(SetupError::Config(ConfigError::OutOfRange { field: "range", .. }))
        ));
    }
}
