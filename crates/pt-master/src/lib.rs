//! Session controller for pitchtrainer.
//!
//! [`ControllerState::tick`] is the whole quiz: a pure step from one state
//! and one input to the next state plus the side effects the host must
//! carry out. [`Trainer`] is a ready-made host that carries them out
//! against the cadence library, an audio output and the history file.

mod clock;
mod controller;
mod event;
mod trainer;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use controller::{ControllerState, PendingRound, Phase, Transition};
pub use event::{Effect, Feedback, Input, Stimulus};
pub use trainer::{Notice, Trainer, TrainerOptions};

// Re-export common types so callers don't need pt-model directly.
pub use pt_model::{
    CadenceType, ConfigError, ConfigField, Guess, Note, RoundConfig, RoundResult, SessionRecord,
    SessionSummary, Tonality,
};
