//! The quiz state machine.
//!
//! A session walks `Idle -> AwaitingStimulus -> AwaitingResponse -> ...`
//! until `rounds_per_session` rounds are resolved, then parks in
//! `SessionComplete` until the user starts over. Resolving a round is not a
//! resting state: it happens inside a single tick, which records the
//! result and either schedules the next stimulus or completes the session.
//!
//! Every transition is driven by [`ControllerState::tick`], which takes the
//! current time explicitly and never performs I/O.

use std::mem;
use std::time::Duration;

use pt_model::{CadenceType, Guess, Note, RoundConfig, RoundResult, SessionSummary, Tonality};
use rand::seq::IteratorRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::event::{Effect, Feedback, Input, Stimulus};

/// The round waiting for an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRound {
    pub cadence: CadenceType,
    pub tonality: Tonality,
    pub target: Note,
    /// When the stimulus was dispatched. The response window opens here.
    pub started_at: Duration,
}

impl PendingRound {
    fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }

    fn resolve(&self, guess: Guess, elapsed: Duration) -> RoundResult {
        RoundResult::resolve(self.cadence, self.tonality, self.target, guess, elapsed)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    /// Next stimulus goes out once `now >= ready_at`. Feedback for the
    /// previous round stays up until then.
    AwaitingStimulus { ready_at: Duration },
    AwaitingResponse(PendingRound),
    SessionComplete,
}

/// Everything the quiz remembers between ticks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    config: RoundConfig,
    phase: Phase,
    /// Resolved rounds of the current session, in order.
    rounds: Vec<RoundResult>,
}

/// Result of one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: ControllerState,
    pub effects: Vec<Effect>,
}

impl ControllerState {
    pub fn new(config: RoundConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            rounds: Vec::new(),
        }
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn rounds(&self) -> &[RoundResult] {
        &self.rounds
    }

    /// True from session start until every round is resolved.
    pub fn is_active(&self) -> bool {
        matches!(
            self.phase,
            Phase::AwaitingStimulus { .. } | Phase::AwaitingResponse(_)
        )
    }

    /// `(current round, rounds per session)` while a session is running.
    /// The round number is 1-based and counts the round being played or
    /// about to be played.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.is_active()
            .then(|| (self.rounds.len() + 1, self.config.rounds_per_session))
    }

    /// Score of the finished session.
    pub fn summary(&self) -> Option<SessionSummary> {
        (self.phase == Phase::SessionComplete).then(|| SessionSummary::from_rounds(&self.rounds))
    }

    /// Apply one input at time `now`.
    ///
    /// After the input itself is handled, the tick also fires whatever the
    /// clock makes due: an expired response window, then a stimulus whose
    /// linger has passed. Inputs that make no sense in the current phase are
    /// logged and dropped.
    pub fn tick<R: Rng + ?Sized>(
        mut self,
        input: Input,
        now: Duration,
        rng: &mut R,
    ) -> Transition {
        let mut effects = Vec::new();

        match input {
            Input::Pulse => {}
            Input::Configure(config) => self.configure(config),
            Input::StartSession => self.start_session(now, &mut effects),
            Input::Guess { text, at } => self.guess(&text, at.min(now), now, &mut effects),
            Input::StartNewSession => self.start_new_session(&mut effects),
            Input::Abandon => self.abandon(),
        }

        self.expire_response(now, &mut effects);
        self.dispatch_due_stimulus(now, rng, &mut effects);

        Transition {
            state: self,
            effects,
        }
    }

    fn configure(&mut self, config: RoundConfig) {
        match self.phase {
            Phase::Idle | Phase::SessionComplete => self.config = config,
            _ => tracing::warn!("configuration change ignored while a session is running"),
        }
    }

    fn start_session(&mut self, now: Duration, effects: &mut Vec<Effect>) {
        if self.phase != Phase::Idle {
            tracing::debug!(phase = ?self.phase, "start ignored outside idle");
            return;
        }
        if let Err(errors) = self.config.validate() {
            tracing::info!(?errors, "session start rejected");
            effects.push(Effect::ConfigRejected(errors));
            return;
        }

        tracing::info!(rounds = self.config.rounds_per_session, "session started");
        self.rounds.clear();
        self.phase = Phase::AwaitingStimulus { ready_at: now };
    }

    fn guess(&mut self, text: &str, at: Duration, now: Duration, effects: &mut Vec<Effect>) {
        let Phase::AwaitingResponse(pending) = self.phase else {
            tracing::debug!(phase = ?self.phase, "guess ignored outside a round");
            return;
        };
        if at < pending.started_at {
            // Typed before this round's stimulus went out.
            tracing::debug!("guess ignored: submitted before the stimulus");
            return;
        }

        // A window too long to represent never closes.
        let in_time = pending
            .started_at
            .checked_add(self.config.response_timeout)
            .map_or(true, |deadline| at < deadline);
        let result = if in_time {
            pending.resolve(Guess::parse(text), pending.elapsed(at))
        } else {
            tracing::debug!("guess arrived after the deadline");
            pending.resolve(Guess::NoAnswer, pending.elapsed(now))
        };
        self.record(result, now, effects);
    }

    fn start_new_session(&mut self, effects: &mut Vec<Effect>) {
        if self.phase != Phase::SessionComplete {
            tracing::debug!(phase = ?self.phase, "new session ignored before completion");
            return;
        }
        effects.push(Effect::PersistSession(mem::take(&mut self.rounds)));
        self.phase = Phase::Idle;
    }

    fn abandon(&mut self) {
        if self.phase != Phase::Idle {
            tracing::info!(resolved = self.rounds.len(), "session abandoned");
        }
        self.rounds.clear();
        self.phase = Phase::Idle;
    }

    fn expire_response(&mut self, now: Duration, effects: &mut Vec<Effect>) {
        let Phase::AwaitingResponse(pending) = self.phase else {
            return;
        };
        let elapsed = pending.elapsed(now);
        // Same boundary as a guess: the window is [start, start + timeout).
        if elapsed >= self.config.response_timeout {
            tracing::debug!(?elapsed, "round timed out");
            self.record(pending.resolve(Guess::NoAnswer, elapsed), now, effects);
        }
    }

    fn dispatch_due_stimulus<R: Rng + ?Sized>(
        &mut self,
        now: Duration,
        rng: &mut R,
        effects: &mut Vec<Effect>,
    ) {
        match self.phase {
            Phase::AwaitingStimulus { ready_at } if now >= ready_at => {}
            _ => return,
        }

        // Selections were validated non-empty when the session started and
        // configuration is frozen until it ends.
        let target = *self
            .config
            .notes
            .iter()
            .choose(rng)
            .expect("note selection validated non-empty");
        let cadence = *self
            .config
            .cadences
            .iter()
            .choose(rng)
            .expect("cadence selection validated non-empty");
        let tonality = *self
            .config
            .tonalities
            .iter()
            .choose(rng)
            .expect("tonality selection validated non-empty");

        let stimulus = Stimulus {
            round: self.rounds.len() + 1,
            of: self.config.rounds_per_session,
            cadence,
            tonality,
            target,
        };
        tracing::debug!(?stimulus, "dispatching stimulus");
        effects.push(Effect::PlayStimulus(stimulus));
        self.phase = Phase::AwaitingResponse(PendingRound {
            cadence,
            tonality,
            target,
            started_at: now,
        });
    }

    /// Store a resolved round and move on.
    fn record(&mut self, result: RoundResult, now: Duration, effects: &mut Vec<Effect>) {
        debug_assert!(self.rounds.len() < self.config.rounds_per_session);

        effects.push(Effect::ShowFeedback {
            feedback: Feedback::for_result(&result),
            linger: self.config.feedback_linger,
        });
        self.rounds.push(result);

        if self.rounds.len() >= self.config.rounds_per_session {
            let summary = SessionSummary::from_rounds(&self.rounds);
            tracing::info!(correct = summary.correct, total = summary.total, "session complete");
            effects.push(Effect::SessionComplete(summary));
            self.phase = Phase::SessionComplete;
        } else {
            self.phase = Phase::AwaitingStimulus {
                ready_at: now.saturating_add(self.config.feedback_linger),
            };
        }
    }
}
