//! Quiz settings: TOML file, then command-line overrides.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use pt_model::{CadenceType, Note, RoundConfig, Tonality};
use serde::{Deserialize, Serialize};

use crate::cli::QuizArgs;

/// Everything the quiz host needs to run.
///
/// Missing keys in a settings file keep their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    pub notes: Vec<Note>,
    pub cadences: Vec<CadenceType>,
    pub tonalities: Vec<Tonality>,
    pub rounds: usize,
    pub timeout_secs: f64,
    pub feedback_secs: f64,
    /// Silence between cadence and target tone.
    pub cadence_gap_secs: f64,
    pub audio_dir: PathBuf,
    pub history_file: PathBuf,
    pub seed: Option<u64>,
    pub no_audio: bool,
}

impl Default for QuizSettings {
    fn default() -> Self {
        let config = RoundConfig::default();
        Self {
            notes: config.notes.into_iter().collect(),
            cadences: config.cadences.into_iter().collect(),
            tonalities: config.tonalities.into_iter().collect(),
            rounds: config.rounds_per_session,
            timeout_secs: config.response_timeout.as_secs_f64(),
            feedback_secs: config.feedback_linger.as_secs_f64(),
            cadence_gap_secs: 0.2,
            audio_dir: PathBuf::from("audio"),
            history_file: PathBuf::from("session_data.json"),
            seed: None,
            no_audio: false,
        }
    }
}

impl QuizSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing settings in {}", path.display()))
    }

    /// Settings file (if any) with flags applied on top.
    pub fn from_args(args: &QuizArgs) -> Result<Self> {
        let mut settings = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(rounds) = args.rounds {
            settings.rounds = rounds;
        }
        if let Some(timeout) = args.timeout {
            settings.timeout_secs = timeout;
        }
        if let Some(notes) = &args.notes {
            settings.notes = notes.clone();
        }
        if let Some(cadences) = &args.cadences {
            settings.cadences = cadences.clone();
        }
        if let Some(tonalities) = &args.tonalities {
            settings.tonalities = tonalities.clone();
        }
        if let Some(dir) = &args.audio_dir {
            settings.audio_dir = dir.clone();
        }
        if let Some(path) = &args.history {
            settings.history_file = path.clone();
        }
        if args.seed.is_some() {
            settings.seed = args.seed;
        }
        settings.no_audio |= args.no_audio;

        tracing::debug!(?settings, "resolved quiz settings");
        Ok(settings)
    }

    /// The controller's view of these settings.
    ///
    /// Empty selections pass through untouched; the controller reports
    /// them when a session is started.
    pub fn round_config(&self) -> Result<RoundConfig> {
        Ok(RoundConfig {
            notes: self.notes.iter().copied().collect::<BTreeSet<_>>(),
            cadences: self.cadences.iter().copied().collect(),
            tonalities: self.tonalities.iter().copied().collect(),
            rounds_per_session: self.rounds,
            response_timeout: seconds("timeout_secs", self.timeout_secs)?,
            feedback_linger: seconds("feedback_secs", self.feedback_secs)?,
        })
    }

    pub fn cadence_gap(&self) -> Result<Duration> {
        seconds("cadence_gap_secs", self.cadence_gap_secs)
    }
}

fn seconds(name: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .with_context(|| format!("{} must be a non-negative number of seconds, got {}", name, value))
}
