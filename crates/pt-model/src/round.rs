//! Resolved rounds and session summaries.

use core::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cadence::{CadenceType, Tonality};
use crate::note::Note;

/// Recorded guess for a round that timed out.
pub const NO_ANSWER: &str = "?";

/// The final answer of a round.
///
/// Serializes tagged, so a typed `?` stays distinct from a timeout. The
/// history file uses the bare text form instead (see [`RoundRecord`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Guess {
    /// One of the twelve notes.
    Note(Note),
    /// Text that names no note. Always incorrect.
    Unrecognized(String),
    /// The response window expired first.
    NoAnswer,
}

impl Guess {
    /// Normalize submitted text into a guess. Never fails.
    pub fn parse(text: &str) -> Self {
        match Note::parse_lenient(text) {
            Some(note) => Guess::Note(note),
            None => Guess::Unrecognized(text.trim().to_string()),
        }
    }

    pub fn note(&self) -> Option<Note> {
        match self {
            Guess::Note(note) => Some(*note),
            _ => None,
        }
    }

    pub fn is_correct_for(&self, target: Note) -> bool {
        self.note() == Some(target)
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guess::Note(note) => note.fmt(f),
            Guess::Unrecognized(text) => f.write_str(text),
            Guess::NoAnswer => f.write_str(NO_ANSWER),
        }
    }
}

impl From<String> for Guess {
    fn from(value: String) -> Self {
        if value == NO_ANSWER {
            Guess::NoAnswer
        } else {
            Guess::parse(&value)
        }
    }
}

impl From<Guess> for String {
    fn from(guess: Guess) -> Self {
        guess.to_string()
    }
}

/// A round after resolution. Fields are fixed at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    cadence: CadenceType,
    tonality: Tonality,
    target: Note,
    guess: Guess,
    correct: bool,
    elapsed: Duration,
}

impl RoundResult {
    /// Score `guess` against `target`.
    pub fn resolve(
        cadence: CadenceType,
        tonality: Tonality,
        target: Note,
        guess: Guess,
        elapsed: Duration,
    ) -> Self {
        let correct = guess.is_correct_for(target);
        Self {
            cadence,
            tonality,
            target,
            guess,
            correct,
            elapsed,
        }
    }

    pub fn cadence(&self) -> CadenceType {
        self.cadence
    }

    pub fn tonality(&self) -> Tonality {
        self.tonality
    }

    pub fn target(&self) -> Note {
        self.target
    }

    pub fn guess(&self) -> &Guess {
        &self.guess
    }

    pub fn correct(&self) -> bool {
        self.correct
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The persisted form of this round.
    pub fn to_record(&self) -> RoundRecord {
        RoundRecord {
            guess: self.guess.clone(),
            target: self.target,
            correct: self.correct,
            time: self.elapsed.as_secs_f64(),
        }
    }
}

/// One round as stored in the session history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    #[serde(with = "guess_text")]
    pub guess: Guess,
    pub target: Note,
    pub correct: bool,
    /// Response time in seconds.
    pub time: f64,
}

/// One completed session as stored in the session history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub timestamp: String,
    pub results: Vec<RoundRecord>,
}

impl SessionRecord {
    pub fn new(timestamp: impl Into<String>, rounds: &[RoundResult]) -> Self {
        Self {
            timestamp: timestamp.into(),
            results: rounds.iter().map(RoundResult::to_record).collect(),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            total: self.results.len(),
            correct: self.results.iter().filter(|r| r.correct).count(),
        }
    }
}

/// Score of a finished session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total: usize,
    pub correct: usize,
}

impl SessionSummary {
    pub fn from_rounds(rounds: &[RoundResult]) -> Self {
        Self {
            total: rounds.len(),
            correct: rounds.iter().filter(|r| r.correct()).count(),
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "You got {} out of {} correct.", self.correct, self.total)
    }
}

/// Guess as bare text, `?` for no answer.
mod guess_text {
    use super::*;

    pub fn serialize<S: Serializer>(guess: &Guess, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(guess)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Guess, D::Error> {
        String::deserialize(deserializer).map(Guess::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(guess: Guess, target: Note) -> RoundResult {
        RoundResult::resolve(
            CadenceType::Dominant,
            Tonality::new(Note::C),
            target,
            guess,
            Duration::from_millis(1200),
        )
    }

    #[test]
    fn spelling_variants_all_score_correct() {
        for text in ["c#", " C# ", "C#"] {
            let result = resolve(Guess::parse(text), Note::CSharp);
            assert!(result.correct(), "{:?} should match C#", text);
        }
    }

    #[test]
    fn unknown_text_scores_incorrect() {
        let guess = Guess::parse("H");
        assert_eq!(guess, Guess::Unrecognized("H".to_string()));
        for target in Note::ALL {
            assert!(!resolve(guess.clone(), target).correct());
        }
    }

    #[test]
    fn no_answer_never_correct() {
        for target in Note::ALL {
            assert!(!resolve(Guess::NoAnswer, target).correct());
        }
    }

    #[test]
    fn record_matches_history_schema() {
        let rounds = vec![
            resolve(Guess::parse("d"), Note::D),
            resolve(Guess::NoAnswer, Note::G),
        ];
        let record = SessionRecord::new("2024-01-01T10:00:00+00:00", &rounds);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "timestamp": "2024-01-01T10:00:00+00:00",
                "results": [
                    { "guess": "D", "target": "D", "correct": true, "time": 1.2 },
                    { "guess": "?", "target": "G", "correct": false, "time": 1.2 }
                ]
            })
        );
    }

    #[test]
    fn stored_guess_text_reads_back() {
        let back: Vec<RoundRecord> = serde_json::from_str(
            r#"[
                { "guess": "?", "target": "C", "correct": false, "time": 3.1 },
                { "guess": "Bb", "target": "Bb", "correct": true, "time": 0.9 },
                { "guess": "xyz", "target": "C", "correct": false, "time": 1.0 }
            ]"#,
        )
        .unwrap();
        let guesses: Vec<Guess> = back.into_iter().map(|r| r.guess).collect();
        assert_eq!(
            guesses,
            vec![
                Guess::NoAnswer,
                Guess::Note(Note::BFlat),
                Guess::Unrecognized("xyz".to_string()),
            ]
        );
    }

    #[test]
    fn typed_question_mark_is_not_a_timeout() {
        let typed = Guess::parse("?");
        assert_eq!(typed, Guess::Unrecognized("?".to_string()));
        for guess in [typed, Guess::NoAnswer, Guess::parse("h#"), Guess::parse("f#")] {
            let json = serde_json::to_string(&guess).unwrap();
            assert_eq!(serde_json::from_str::<Guess>(&json).unwrap(), guess, "{}", json);
        }
    }

    #[test]
    fn summary_counts_correct_rounds() {
        let rounds = vec![
            resolve(Guess::parse("C"), Note::C),
            resolve(Guess::parse("C"), Note::D),
            resolve(Guess::NoAnswer, Note::E),
        ];
        let summary = SessionSummary::from_rounds(&rounds);
        assert_eq!(summary, SessionSummary { total: 3, correct: 1 });
        assert_eq!(summary.to_string(), "You got 1 out of 3 correct.");
        assert_eq!(SessionRecord::new("t", &rounds).summary(), summary);
    }
}
