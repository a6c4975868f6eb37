//! Host-side driver that runs the controller against real resources.

use std::path::PathBuf;
use std::time::Duration;

use pt_audio::AudioOutput;
use pt_formats::{CadenceLibrary, HistoryStore};
use pt_model::{ConfigError, RoundConfig, RoundResult, SessionRecord, SessionSummary};
use pt_synth::compose_playback_clip;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::clock::{Clock, MonotonicClock};
use crate::controller::ControllerState;
use crate::event::{Effect, Feedback, Input, Stimulus};

/// Silence between the end of the cadence and the target tone.
const DEFAULT_CADENCE_GAP: Duration = Duration::from_millis(200);

#[derive(Clone, Copy, Debug)]
pub struct TrainerOptions {
    pub cadence_gap: Duration,
    /// Fixed seed for reproducible draws. Random when `None`.
    pub seed: Option<u64>,
}

impl Default for TrainerOptions {
    fn default() -> Self {
        Self {
            cadence_gap: DEFAULT_CADENCE_GAP,
            seed: None,
        }
    }
}

/// Something the user should see.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    ConfigRejected(Vec<ConfigError>),
    RoundStarted { round: usize, of: usize },
    Feedback { feedback: Feedback, linger: Duration },
    SessionComplete(SessionSummary),
    SessionSaved { path: PathBuf, sessions: usize },
    /// A non-fatal problem; the quiz carries on.
    Warning(String),
}

/// Headless quiz: owns the controller state and carries out its effects.
///
/// Stimuli are played through the audio output, finished sessions are
/// appended to the history file, and everything meant for the user comes
/// back as [`Notice`]s.
pub struct Trainer<C: Clock = MonotonicClock> {
    state: ControllerState,
    rng: Pcg32,
    clock: C,
    library: CadenceLibrary,
    output: Box<dyn AudioOutput>,
    history: HistoryStore,
    cadence_gap: Duration,
    last_session: Option<SessionRecord>,
}

impl<C: Clock> Trainer<C> {
    pub fn new(
        config: RoundConfig,
        library: CadenceLibrary,
        mut output: Box<dyn AudioOutput>,
        history: HistoryStore,
        clock: C,
        options: TrainerOptions,
    ) -> Self {
        if let Err(e) = output.start() {
            tracing::warn!("audio output failed to start: {}", e);
        }
        let seed = options.seed.unwrap_or_else(rand::random);
        tracing::debug!(seed, "trainer rng seeded");

        Self {
            state: ControllerState::new(config),
            rng: Pcg32::seed_from_u64(seed),
            clock,
            library,
            output,
            history,
            cadence_gap: options.cadence_gap,
            last_session: None,
        }
    }

    // --- Accessors ---

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// The most recently finished session, kept even if saving it failed.
    pub fn last_session(&self) -> Option<&SessionRecord> {
        self.last_session.as_ref()
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    // --- Inputs ---

    pub fn configure(&mut self, config: RoundConfig) -> Vec<Notice> {
        self.handle(Input::Configure(config))
    }

    pub fn start_session(&mut self) -> Vec<Notice> {
        self.handle(Input::StartSession)
    }

    /// Submit a guess stamped with the current time.
    pub fn guess(&mut self, text: &str) -> Vec<Notice> {
        let at = self.clock.now();
        self.guess_at(text, at)
    }

    /// Submit a guess stamped when it was typed.
    pub fn guess_at(&mut self, text: &str, at: Duration) -> Vec<Notice> {
        self.handle(Input::Guess {
            text: text.to_string(),
            at,
        })
    }

    /// Let time-driven transitions fire. Call this regularly.
    pub fn pulse(&mut self) -> Vec<Notice> {
        self.handle(Input::Pulse)
    }

    pub fn start_new_session(&mut self) -> Vec<Notice> {
        self.handle(Input::StartNewSession)
    }

    pub fn abandon(&mut self) -> Vec<Notice> {
        let notices = self.handle(Input::Abandon);
        self.output.flush();
        notices
    }

    /// Tick the controller with `input` and execute what it asks for.
    pub fn handle(&mut self, input: Input) -> Vec<Notice> {
        let now = self.clock.now();
        let state = std::mem::take(&mut self.state);
        let transition = state.tick(input, now, &mut self.rng);
        self.state = transition.state;

        let mut notices = Vec::new();
        for effect in transition.effects {
            self.execute(effect, &mut notices);
        }
        notices
    }

    fn execute(&mut self, effect: Effect, notices: &mut Vec<Notice>) {
        match effect {
            Effect::ConfigRejected(errors) => notices.push(Notice::ConfigRejected(errors)),
            Effect::PlayStimulus(stimulus) => {
                notices.push(Notice::RoundStarted {
                    round: stimulus.round,
                    of: stimulus.of,
                });
                self.play_stimulus(stimulus, notices);
            }
            Effect::ShowFeedback { feedback, linger } => {
                notices.push(Notice::Feedback { feedback, linger })
            }
            Effect::SessionComplete(summary) => notices.push(Notice::SessionComplete(summary)),
            Effect::PersistSession(rounds) => self.persist(&rounds, notices),
        }
    }

    /// Cadence, gap, then the target tone. A missing cadence leaves the
    /// tone alone; the round goes ahead either way.
    fn play_stimulus(&mut self, stimulus: Stimulus, notices: &mut Vec<Notice>) {
        let tone = pt_synth::synthesize(stimulus.target);
        let clip = match self.library.load(stimulus.cadence, stimulus.tonality) {
            Ok(cadence) => compose_playback_clip(cadence, &tone, self.cadence_gap),
            Err(e) => {
                tracing::warn!("{}; playing the tone alone", e);
                notices.push(Notice::Warning(e.to_string()));
                tone
            }
        };

        if let Err(e) = self.output.play_clip(&clip) {
            tracing::warn!("playback failed: {}", e);
            notices.push(Notice::Warning(format!("playback failed: {}", e)));
        }
    }

    fn persist(&mut self, rounds: &[RoundResult], notices: &mut Vec<Notice>) {
        let record = SessionRecord::new(chrono::Local::now().to_rfc3339(), rounds);
        match self.history.append(&record) {
            Ok(sessions) => notices.push(Notice::SessionSaved {
                path: self.history.path().to_path_buf(),
                sessions,
            }),
            Err(e) => {
                tracing::warn!("session not saved: {}", e);
                notices.push(Notice::Warning(format!("session not saved: {}", e)));
            }
        }
        self.last_session = Some(record);
    }
}
