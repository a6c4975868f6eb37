//! Integration test: whole sessions through the trainer with a hand-driven
//! clock, a recording audio output and a real history file.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use pt_audio::{AudioError, AudioOutput};
use pt_formats::{clip_to_wav, CadenceLibrary, HistoryStore};
use pt_master::{
    CadenceType, Feedback, ManualClock, Notice, Note, Phase, RoundConfig, SessionSummary,
    Tonality, Trainer, TrainerOptions,
};
use pt_model::AudioClip;
use pt_synth::Frame;

/// Remembers the length of every clip it is asked to play.
#[derive(Clone, Default)]
struct RecordingOutput {
    clips: Rc<RefCell<Vec<usize>>>,
}

impl AudioOutput for RecordingOutput {
    fn sample_rate(&self) -> u32 {
        44_100
    }

    fn write(&mut self, frames: &[Frame]) -> Result<(), AudioError> {
        self.clips.borrow_mut().push(frames.len());
        Ok(())
    }

    fn flush(&mut self) {}

    fn start(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

const CADENCE_FRAMES: usize = 22_050;
const GAP_FRAMES: usize = 8_820;
const TONE_FRAMES: usize = 8_820;

fn write_cadence(dir: &Path, cadence: CadenceType, tonality: Tonality) {
    let library = CadenceLibrary::new(dir);
    let clip = AudioClip::from_mono(vec![0.1; CADENCE_FRAMES], 44_100);
    fs::write(library.clip_path(cadence, tonality), clip_to_wav(&clip)).unwrap();
}

fn config() -> RoundConfig {
    RoundConfig {
        notes: [Note::C, Note::D].into_iter().collect(),
        rounds_per_session: 3,
        response_timeout: Duration::from_secs(3),
        feedback_linger: Duration::from_millis(1500),
        ..RoundConfig::default()
    }
}

struct Rig {
    trainer: Trainer<ManualClock>,
    clock: ManualClock,
    played: Rc<RefCell<Vec<usize>>>,
    history: HistoryStore,
    _dir: tempfile::TempDir,
}

fn rig(config: RoundConfig, with_cadence: bool) -> Rig {
    let dir = tempfile::tempdir().unwrap();
    let audio_dir = dir.path().join("audio");
    fs::create_dir(&audio_dir).unwrap();
    if with_cadence {
        write_cadence(&audio_dir, CadenceType::Dominant, Tonality::new(Note::C));
    }

    let history = HistoryStore::new(dir.path().join("session_data.json"));
    let output = RecordingOutput::default();
    let played = output.clips.clone();
    let clock = ManualClock::new();
    let trainer = Trainer::new(
        config,
        CadenceLibrary::new(audio_dir),
        Box::new(output),
        history.clone(),
        clock.clone(),
        TrainerOptions {
            seed: Some(42),
            ..TrainerOptions::default()
        },
    );
    Rig {
        trainer,
        clock,
        played,
        history,
        _dir: dir,
    }
}

fn target(trainer: &Trainer<ManualClock>) -> Note {
    match trainer.state().phase() {
        Phase::AwaitingResponse(pending) => pending.target,
        other => panic!("no round in progress: {:?}", other),
    }
}

/// Play one session: right, wrong, then silence. Returns the summary notice.
fn play_session(rig: &mut Rig) -> SessionSummary {
    let notices = rig.trainer.start_session();
    assert_eq!(notices, vec![Notice::RoundStarted { round: 1, of: 3 }]);

    // Round 1: right answer after 0.8 s.
    let note = target(&rig.trainer);
    rig.clock.advance(Duration::from_millis(800));
    let notices = rig.trainer.guess(note.name());
    assert_eq!(
        notices,
        vec![Notice::Feedback {
            feedback: Feedback::Correct { target: note },
            linger: Duration::from_millis(1500),
        }]
    );

    // Next stimulus waits out the feedback.
    rig.clock.advance(Duration::from_millis(1000));
    assert!(rig.trainer.pulse().is_empty());
    rig.clock.advance(Duration::from_millis(500));
    assert_eq!(
        rig.trainer.pulse(),
        vec![Notice::RoundStarted { round: 2, of: 3 }]
    );

    // Round 2: wrong answer.
    let note = target(&rig.trainer);
    let wrong = if note == Note::C { "D" } else { "C" };
    rig.clock.advance(Duration::from_millis(1200));
    let notices = rig.trainer.guess(wrong);
    assert!(matches!(
        &notices[..],
        [Notice::Feedback { feedback: Feedback::Wrong { target, .. }, .. }] if *target == note
    ));

    rig.clock.advance(Duration::from_millis(1500));
    rig.trainer.pulse();

    // Round 3: no answer.
    rig.clock.advance(Duration::from_millis(3100));
    let notices = rig.trainer.pulse();
    assert_eq!(notices.len(), 2);
    assert!(matches!(
        notices[0],
        Notice::Feedback { feedback: Feedback::TimedOut { .. }, .. }
    ));
    match &notices[1] {
        Notice::SessionComplete(summary) => *summary,
        other => panic!("expected completion, got {:?}", other),
    }
}

#[test]
fn two_sessions_are_appended_in_order() {
    let mut rig = rig(config(), true);

    let first = play_session(&mut rig);
    assert_eq!(first, SessionSummary { total: 3, correct: 1 });
    assert_eq!(first.to_string(), "You got 1 out of 3 correct.");
    let saved = rig.trainer.start_new_session();
    assert!(matches!(&saved[..], [Notice::SessionSaved { sessions: 1, .. }]));

    play_session(&mut rig);
    let saved = rig.trainer.start_new_session();
    assert!(matches!(&saved[..], [Notice::SessionSaved { sessions: 2, .. }]));

    let stored = rig.history.load().unwrap();
    assert_eq!(stored.len(), 2);
    for session in &stored {
        let guesses: Vec<String> = session.results.iter().map(|r| r.guess.to_string()).collect();
        assert_eq!(guesses[2], "?");
        assert_eq!(
            session.results.iter().map(|r| r.correct).collect::<Vec<_>>(),
            vec![true, false, false]
        );
        assert!((session.results[0].time - 0.8).abs() < 1e-9);
        assert!((session.results[1].time - 1.2).abs() < 1e-9);
        assert!((session.results[2].time - 3.1).abs() < 1e-9);
    }
    assert!(stored[0].timestamp <= stored[1].timestamp);
}

#[test]
fn stimulus_is_cadence_gap_then_tone() {
    let mut rig = rig(config(), true);
    rig.trainer.start_session();
    assert_eq!(
        *rig.played.borrow(),
        vec![CADENCE_FRAMES + GAP_FRAMES + TONE_FRAMES]
    );
}

#[test]
fn missing_cadence_still_plays_the_tone() {
    let mut rig = rig(config(), false);
    let notices = rig.trainer.start_session();
    assert_eq!(notices.len(), 2);
    assert!(matches!(&notices[1], Notice::Warning(w) if w.contains("missing audio file")));
    assert_eq!(*rig.played.borrow(), vec![TONE_FRAMES]);

    // The round is live and scores normally.
    let note = target(&rig.trainer);
    rig.clock.advance(Duration::from_millis(300));
    assert!(matches!(
        &rig.trainer.guess(note.name())[..],
        [Notice::Feedback { feedback: Feedback::Correct { .. }, .. }]
    ));
}

#[test]
fn abandoned_session_is_not_saved() {
    let mut rig = rig(config(), true);
    rig.trainer.start_session();
    rig.clock.advance(Duration::from_millis(500));
    rig.trainer.guess("C");
    rig.trainer.abandon();

    assert_eq!(rig.trainer.state().phase(), &Phase::Idle);
    assert!(rig.history.load().unwrap().is_empty());
    assert!(rig.trainer.last_session().is_none());
}

#[test]
fn rejected_config_reports_every_problem() {
    let mut rig = rig(
        RoundConfig {
            cadences: Default::default(),
            tonalities: Default::default(),
            ..config()
        },
        true,
    );
    let notices = rig.trainer.start_session();
    match &notices[..] {
        [Notice::ConfigRejected(errors)] => {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            assert_eq!(
                messages,
                vec!["Select at least one cadence.", "Select at least one tonality."]
            );
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert!(rig.played.borrow().is_empty());
}
