//! `nback play`: run one interactive session and print the score.

use std::io;
use std::time::Duration;

use nback_core::config::GameSettings;
use nback_core::{GameLoop, SessionLog, StimulusGenerator, Summary};
use serde::Serialize;

use crate::prompt;
use crate::terminal::{EXIT_INTERRUPTED, GameScreen, RawKeys};

pub struct PlayCommandConfig {
    pub n_back: Option<usize>,
    pub total: Option<usize>,
    pub range: u8,
    pub window_ms: u64,
    pub hold_ms: u64,
    pub gap_ms: u64,
    pub match_key: char,
    pub no_match_key: char,
    pub seed: Option<u64>,
    pub json: bool,
}

impl PlayCommandConfig {
    fn settings(&self) -> GameSettings {
        let mut settings = GameSettings::default();
        if let Some(n) = self.n_back {
            settings.n_back = n;
        }
        if let Some(t) = self.total {
            settings.total = t;
        }
        settings.range_max = self.range;
        settings.response_window = Duration::from_millis(self.window_ms);
        settings.hold = Duration::from_millis(self.hold_ms);
        settings.gap = Duration::from_millis(self.gap_ms);
        settings.match_key = self.match_key;
        settings.no_match_key = self.no_match_key;
        settings
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    log: &'a SessionLog,
    summary: Summary,
}

pub fn run(cfg: &PlayCommandConfig) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let config = match prompt::ask_config(
        &mut stdin.lock(),
        &mut stdout,
        cfg.settings(),
        cfg.n_back,
        cfg.total,
    ) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut generator = match cfg.seed {
        Some(seed) => StimulusGenerator::seeded(seed),
        None => StimulusGenerator::from_os(),
    };
    let game = GameLoop::new(config, &mut generator);
    let config = game.config();

    let intro = format!(
        "{}-back, {} digits. Press '{}' when a digit matches the one {} back, '{}' when it does not.\n\
         Esc or Ctrl-C quits. Ready!",
        config.n_back(),
        config.total(),
        config.match_key(),
        config.n_back(),
        config.no_match_key()
    );
    // Keep stdout clean for `--json`.
    if cfg.json {
        eprintln!("{intro}");
    } else {
        println!("{intro}");
    }
    std::thread::sleep(Duration::from_millis(1500));

    // Terminal state is restored when `screen` and `keys` drop, before any
    // output below.
    let result = match GameScreen::open() {
        Ok(mut screen) => {
            let mut keys = RawKeys::new();
            game.run(&mut screen, &mut keys)
        }
        Err(e) => {
            eprintln!("Error: cannot open terminal: {e}");
            std::process::exit(1);
        }
    };

    let log = match result {
        Ok(log) => log,
        Err(e) if e.is_interrupt() => {
            eprintln!("Interrupted.");
            std::process::exit(EXIT_INTERRUPTED);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if cfg.json {
        let report = JsonReport {
            log: &log,
            summary: log.summary(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!("Game done!\n");
        print!("{}", log.render());
    }
}
