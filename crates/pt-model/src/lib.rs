//! Core quiz types for pitchtrainer.
//!
//! This crate defines the data model shared by every other crate: the
//! twelve-note vocabulary, cadence lookup keys, round configuration,
//! resolved round results and the audio clip container. The synthesizer
//! emits clips, the controller consumes configuration and produces
//! results, and the history store serializes them.

mod audio_clip;
mod cadence;
mod config;
mod note;
mod round;

pub use audio_clip::AudioClip;
pub use cadence::{CadenceParseError, CadenceType, Tonality};
pub use config::{ConfigError, ConfigField, RoundConfig};
pub use note::{Note, NoteError};
pub use round::{Guess, RoundRecord, RoundResult, SessionRecord, SessionSummary, NO_ANSWER};
