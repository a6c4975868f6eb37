//! Controller inputs and the side effects it requests.

use core::fmt;
use std::time::Duration;

use pt_model::{
    CadenceType, ConfigError, Guess, Note, RoundConfig, RoundResult, SessionSummary, Tonality,
};
use serde::{Deserialize, Serialize};

/// One external event fed to [`ControllerState::tick`](crate::ControllerState::tick).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Input {
    /// Nothing happened; evaluate timeouts and due stimuli.
    Pulse,
    /// Replace the round configuration. Only honoured between sessions.
    Configure(RoundConfig),
    StartSession,
    /// Text the user submitted, stamped when it arrived.
    Guess { text: String, at: Duration },
    /// Close a finished session (persisting it) and return to idle.
    StartNewSession,
    /// Drop the current session without persisting anything.
    Abandon,
}

/// What to play for a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stimulus {
    /// 1-based round number.
    pub round: usize,
    pub of: usize,
    pub cadence: CadenceType,
    pub tonality: Tonality,
    pub target: Note,
}

/// How a round ended, for the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    Correct { target: Note },
    Wrong { target: Note, guess: Guess },
    TimedOut { target: Note },
}

impl Feedback {
    pub(crate) fn for_result(result: &RoundResult) -> Self {
        let target = result.target();
        match result.guess() {
            Guess::NoAnswer => Feedback::TimedOut { target },
            _ if result.correct() => Feedback::Correct { target },
            guess => Feedback::Wrong {
                target,
                guess: guess.clone(),
            },
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Correct { .. } => write!(f, "Correct!"),
            Feedback::Wrong { target, .. } => write!(f, "Wrong! It was {}", target),
            Feedback::TimedOut { target } => write!(f, "Timed out! It was {}", target),
        }
    }
}

/// A side effect the host must carry out after a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Session start refused; one entry per offending field.
    ConfigRejected(Vec<ConfigError>),
    /// Play the cadence clip, then the synthesized target.
    PlayStimulus(Stimulus),
    /// Show round feedback for at least `linger`.
    ShowFeedback { feedback: Feedback, linger: Duration },
    /// Every round is resolved.
    SessionComplete(SessionSummary),
    /// Append this finished session to the history.
    PersistSession(Vec<RoundResult>),
}
