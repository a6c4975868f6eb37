//! Terminal host for the quiz.
//!
//! Stdin is read on a helper thread; the main thread polls the trainer
//! every [`POLL_INTERVAL`] so timeouts and lingering feedback fire on time
//! without waiting for a keystroke.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};
use pt_audio::{AudioOutput, CpalOutput, NullOutput};
use pt_formats::{CadenceLibrary, HistoryStore};
use pt_master::{
    Clock, Feedback, MonotonicClock, Notice, Phase, RoundConfig, RoundResult, Trainer,
    TrainerOptions,
};

use crate::settings::QuizSettings;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A line typed by the user, stamped when it was read.
struct Line {
    text: String,
    at: Duration,
}

impl Line {
    fn is_quit(&self) -> bool {
        matches!(self.text.trim(), "q" | "quit" | "exit")
    }
}

pub struct QuizApp {
    trainer: Trainer<MonotonicClock>,
    lines: Receiver<Line>,
}

impl QuizApp {
    pub fn new(settings: &QuizSettings) -> Result<Self> {
        let config = settings.round_config()?;
        let library = CadenceLibrary::new(&settings.audio_dir);
        for path in library.missing_for(&config) {
            tracing::warn!(path = %path.display(), "cadence clip not found; its rounds play the tone alone");
        }

        let clock = MonotonicClock::new();
        let trainer = Trainer::new(
            config,
            library,
            open_output(settings.no_audio),
            HistoryStore::new(&settings.history_file),
            clock,
            TrainerOptions {
                cadence_gap: settings.cadence_gap()?,
                seed: settings.seed,
            },
        );

        Ok(Self {
            trainer,
            lines: spawn_stdin_reader(clock),
        })
    }

    /// Run sessions until the user quits or stdin closes.
    pub fn run(&mut self) -> Result<()> {
        print_intro(self.trainer.state().config());

        loop {
            let notices = self.trainer.start_session();
            let rejected = notices
                .iter()
                .any(|n| matches!(n, Notice::ConfigRejected(_)));
            show(&notices);
            if rejected {
                bail!("cannot start a session with these settings");
            }

            if !self.play_session() {
                self.trainer.abandon();
                println!("Session abandoned.");
                return Ok(());
            }

            for (i, round) in self.trainer.state().rounds().iter().enumerate() {
                println!("{}", round_line(i + 1, round));
            }
            prompt("Press Enter for a new session, or q to quit: ");
            let next = self.lines.recv().ok();
            // A finished session is saved whichever way the user leaves.
            show(&self.trainer.start_new_session());
            match next {
                Some(line) if !line.is_quit() => continue,
                _ => return Ok(()),
            }
        }
    }

    /// Feed guesses and pulses until the session completes. Returns false
    /// if the user quit first.
    fn play_session(&mut self) -> bool {
        loop {
            match self.lines.recv_timeout(POLL_INTERVAL) {
                Ok(line) if line.is_quit() => return false,
                Ok(line) => {
                    if line.text.trim().is_empty() {
                        continue;
                    }
                    show(&self.trainer.guess_at(&line.text, line.at));
                }
                Err(RecvTimeoutError::Timeout) => show(&self.trainer.pulse()),
                Err(RecvTimeoutError::Disconnected) => return false,
            }

            if self.trainer.state().phase() == &Phase::SessionComplete {
                return true;
            }
        }
    }
}

fn open_output(no_audio: bool) -> Box<dyn AudioOutput> {
    if no_audio {
        return Box::new(NullOutput::default());
    }
    match CpalOutput::open() {
        Ok(output) => Box::new(output),
        Err(e) => {
            tracing::warn!("audio unavailable ({}); running silently", e);
            Box::new(NullOutput::default())
        }
    }
}

fn spawn_stdin_reader(clock: MonotonicClock) -> Receiver<Line> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for text in io::stdin().lock().lines() {
            let Ok(text) = text else { break };
            let line = Line {
                text,
                at: clock.now(),
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn print_intro(config: &RoundConfig) {
    let join = |items: Vec<String>| items.join(" ");
    println!("Pitch trainer: name the note played after the cadence.");
    println!(
        "Notes: {}",
        join(config.notes.iter().map(|n| n.to_string()).collect())
    );
    println!(
        "Cadences: {}  Keys: {}",
        join(config.cadences.iter().map(|c| c.to_string()).collect()),
        join(config.tonalities.iter().map(|t| t.to_string()).collect())
    );
    println!(
        "{} rounds, {:.1} s to answer each. Type q to quit.",
        config.rounds_per_session,
        config.response_timeout.as_secs_f64()
    );
}

fn show(notices: &[Notice]) {
    for notice in notices {
        match notice {
            Notice::ConfigRejected(errors) => {
                for error in errors {
                    println!("{}", error);
                }
            }
            Notice::RoundStarted { round, of } => {
                println!();
                prompt(&format!("Round {}/{}. Your guess: ", round, of));
            }
            Notice::Feedback { feedback, .. } => {
                let mark = match feedback {
                    Feedback::Correct { .. } => "✅",
                    Feedback::Wrong { .. } => "❌",
                    Feedback::TimedOut { .. } => "⏱️",
                };
                println!();
                println!("{} {}", mark, feedback);
            }
            Notice::SessionComplete(summary) => {
                println!();
                println!("{}", summary);
            }
            Notice::SessionSaved { path, sessions } => {
                println!("Saved to {} ({} sessions).", path.display(), sessions);
            }
            // Already reported on stderr through tracing.
            Notice::Warning(_) => {}
        }
    }
}

/// One row of the end-of-session breakdown.
fn round_line(number: usize, round: &RoundResult) -> String {
    let mark = if round.correct() { "✅" } else { "❌" };
    format!(
        "{:>3}. {} {:<8} in {:<3} target {:<2} guess {:<4} {:.1} s",
        number,
        mark,
        round.cadence().to_string(),
        round.tonality().to_string(),
        round.target().to_string(),
        round.guess().to_string(),
        round.elapsed().as_secs_f64()
    )
}

fn prompt(text: &str) {
    print!("{}", text);
    let _ = io::stdout().flush();
}
