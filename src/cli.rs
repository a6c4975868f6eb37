//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pt_model::{CadenceType, Note, Tonality};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "pitchtrainer", version)]
#[command(about = "Cadence-primed ear training quiz", long_about = None)]
pub struct Args {
    /// Show debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the interactive quiz (default)
    Quiz(QuizArgs),
    /// Synthesize one note and play it or save it as WAV
    Tone {
        /// Note name, e.g. C, F#, Bb
        note: String,
        /// Write the tone to this file instead of playing it
        #[arg(long, value_name = "FILE")]
        wav: Option<PathBuf>,
    },
    /// Print stored sessions and their scores
    History(HistoryArgs),
}

impl Command {
    /// Bare `pitchtrainer` runs the quiz with default settings.
    pub fn or_default(command: Option<Command>) -> Command {
        command.unwrap_or_else(|| Command::Quiz(QuizArgs::default()))
    }
}

/// Quiz settings. Flags override values from `--config`.
#[derive(clap::Args, Debug, Default)]
pub struct QuizArgs {
    /// TOML settings file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rounds per session
    #[arg(long, value_name = "N")]
    pub rounds: Option<usize>,

    /// Seconds allowed to answer each round
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Enabled target notes, comma separated
    #[arg(long, value_name = "NOTES", value_delimiter = ',')]
    pub notes: Option<Vec<Note>>,

    /// Enabled cadences: I-IV-V-I, I-V-I, II-V-I
    #[arg(long, value_name = "CADENCES", value_delimiter = ',')]
    pub cadences: Option<Vec<CadenceType>>,

    /// Enabled keys, comma separated
    #[arg(long, value_name = "KEYS", value_delimiter = ',')]
    pub tonalities: Option<Vec<Tonality>>,

    /// Directory holding the cadence WAV files
    #[arg(long, value_name = "DIR")]
    pub audio_dir: Option<PathBuf>,

    /// Session history file
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,

    /// Seed for reproducible note draws
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run silently without opening an audio device
    #[arg(long)]
    pub no_audio: bool,
}

#[derive(clap::Args, Debug, Default)]
pub struct HistoryArgs {
    /// TOML settings file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Session history file
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,
}
