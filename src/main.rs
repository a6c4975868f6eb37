//! pitchtrainer - ear training in the terminal.
//!
//! Plays a cadence to establish a key, then a single note; you name the
//! note before the timer runs out.

mod app;
mod cli;
mod commands;
mod settings;

use anyhow::Result;
use clap::Parser;
use pt_formats::HistoryStore;
use tracing_subscriber::EnvFilter;

use app::QuizApp;
use cli::{Args, Command, HistoryArgs};
use settings::QuizSettings;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    match Command::or_default(args.command) {
        Command::Quiz(quiz) => {
            let settings = QuizSettings::from_args(&quiz)?;
            QuizApp::new(&settings)?.run()
        }
        Command::Tone { note, wav } => commands::tone(&note, wav.as_deref()),
        Command::History(HistoryArgs { config, history }) => {
            let mut settings = match config {
                Some(path) => QuizSettings::load(&path)?,
                None => QuizSettings::default(),
            };
            if let Some(path) = history {
                settings.history_file = path;
            }
            commands::history(&HistoryStore::new(settings.history_file))
        }
    }
}

/// Log to stderr so diagnostics never land in the quiz prompt.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
