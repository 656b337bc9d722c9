//! CLI for nback: a timed N-back working-memory drill in the terminal.

mod commands;
mod prompt;
mod terminal;

use clap::{Parser, Subcommand};
use nback_core::config::{
    DEFAULT_GAP, DEFAULT_HOLD, DEFAULT_MATCH_KEY, DEFAULT_NO_MATCH_KEY, DEFAULT_RANGE_MAX,
    DEFAULT_RESPONSE_WINDOW,
};

#[derive(Parser)]
#[command(name = "nback")]
#[command(about = "nback: a timed N-back working-memory drill in the terminal")]
#[command(version = nback_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one session. n-back and total are asked for when not given.
    Play {
        /// How many positions back a digit is compared against
        #[arg(short = 'n', long)]
        n_back: Option<usize>,

        /// Number of digits shown in the session
        #[arg(short = 't', long)]
        total: Option<usize>,

        /// Largest digit shown (digits are drawn from 1..=RANGE)
        #[arg(long, default_value_t = DEFAULT_RANGE_MAX)]
        range: u8,

        /// Time allowed to answer each scored digit, in milliseconds
        #[arg(long, default_value_t = DEFAULT_RESPONSE_WINDOW.as_millis() as u64)]
        window_ms: u64,

        /// How long each warm-up digit stays on screen, in milliseconds
        #[arg(long, default_value_t = DEFAULT_HOLD.as_millis() as u64)]
        hold_ms: u64,

        /// Blank pause between digits, in milliseconds
        #[arg(long, default_value_t = DEFAULT_GAP.as_millis() as u64)]
        gap_ms: u64,

        /// Key meaning "matches the digit n back"
        #[arg(long, default_value_t = DEFAULT_MATCH_KEY, value_parser = commands::parse_key)]
        match_key: char,

        /// Key meaning "does not match"
        #[arg(long, default_value_t = DEFAULT_NO_MATCH_KEY, value_parser = commands::parse_key)]
        no_match_key: char,

        /// Seed the digit generator for a reproducible sequence
        #[arg(long)]
        seed: Option<u64>,

        /// Print the session log and summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the correct answer for every position of a digit sequence
    Truth {
        /// How many positions back a digit is compared against
        #[arg(short = 'n', long)]
        n_back: usize,

        /// Digits 1-9, space separated
        #[arg(required = true, num_args = 1..)]
        digits: Vec<u8>,

        /// Print the answers as a JSON array
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            n_back,
            total,
            range,
            window_ms,
            hold_ms,
            gap_ms,
            match_key,
            no_match_key,
            seed,
            json,
        } => {
            commands::play::run(&commands::play::PlayCommandConfig {
                n_back,
                total,
                range,
                window_ms,
                hold_ms,
                gap_ms,
                match_key,
                no_match_key,
                seed,
                json,
            });
        }
        Commands::Truth {
            n_back,
            digits,
            json,
        } => commands::truth::run(n_back, &digits, json),
    }
}
