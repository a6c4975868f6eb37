//! Round configuration supplied by the settings surface.

use core::fmt;
use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cadence::{CadenceType, Tonality};
use crate::note::Note;

/// Which configuration field an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigField {
    Notes,
    Cadences,
    Tonalities,
    RoundsPerSession,
    ResponseTimeout,
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigField::Notes => "note",
            ConfigField::Cadences => "cadence",
            ConfigField::Tonalities => "tonality",
            ConfigField::RoundsPerSession => "rounds per session",
            ConfigField::ResponseTimeout => "response timeout",
        })
    }
}

/// A user-correctable problem that blocks a session from starting.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    /// A required selection set is empty.
    #[error("Select at least one {0}.")]
    EmptySelection(ConfigField),
    #[error("Rounds per session must be at least 1.")]
    NoRounds,
    #[error("Response timeout must be greater than zero.")]
    ZeroTimeout,
}

impl ConfigError {
    /// The field the user has to fix.
    pub fn field(&self) -> ConfigField {
        match self {
            ConfigError::EmptySelection(field) => *field,
            ConfigError::NoRounds => ConfigField::RoundsPerSession,
            ConfigError::ZeroTimeout => ConfigField::ResponseTimeout,
        }
    }
}

/// Enabled choices and timing for a session.
///
/// Sets rather than lists so a duplicated selection can't bias the
/// uniform draws.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub notes: BTreeSet<Note>,
    pub cadences: BTreeSet<CadenceType>,
    pub tonalities: BTreeSet<Tonality>,
    pub rounds_per_session: usize,
    /// Time allowed from stimulus dispatch to guess.
    pub response_timeout: Duration,
    /// Minimum time round feedback stays up before the next stimulus.
    pub feedback_linger: Duration,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            notes: [Note::C, Note::D, Note::E, Note::F, Note::G, Note::A, Note::B]
                .into_iter()
                .collect(),
            cadences: [CadenceType::Dominant].into_iter().collect(),
            tonalities: [Tonality::new(Note::C)].into_iter().collect(),
            rounds_per_session: 3,
            response_timeout: Duration::from_secs(3),
            feedback_linger: Duration::from_millis(1500),
        }
    }
}

impl RoundConfig {
    /// Check every field, reporting one error per problem.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.notes.is_empty() {
            errors.push(ConfigError::EmptySelection(ConfigField::Notes));
        }
        if self.cadences.is_empty() {
            errors.push(ConfigError::EmptySelection(ConfigField::Cadences));
        }
        if self.tonalities.is_empty() {
            errors.push(ConfigError::EmptySelection(ConfigField::Tonalities));
        }
        if self.rounds_per_session == 0 {
            errors.push(ConfigError::NoRounds);
        }
        if self.response_timeout.is_zero() {
            errors.push(ConfigError::ZeroTimeout);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
