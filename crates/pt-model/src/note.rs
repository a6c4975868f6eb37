//! The twelve-note vocabulary.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for note parsing.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NoteError {
    /// Text is not one of the twelve fixed note spellings.
    #[error("invalid note '{0}': expected one of C, C#, D, Eb, E, F, F#, G, Ab, A, Bb, B")]
    InvalidNote(String),
}

/// One of the twelve chromatic pitch classes.
///
/// Spellings are fixed (`Eb`, never `D#`). Every note sits in the
/// fourth octave when it needs a frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Note {
    C,
    CSharp,
    D,
    EFlat,
    E,
    F,
    FSharp,
    G,
    AFlat,
    A,
    BFlat,
    B,
}

/// Number of Note variants.
const NOTE_COUNT: usize = 12;

impl Note {
    /// All notes in chromatic order starting from C.
    pub const ALL: [Note; NOTE_COUNT] = [
        Note::C,
        Note::CSharp,
        Note::D,
        Note::EFlat,
        Note::E,
        Note::F,
        Note::FSharp,
        Note::G,
        Note::AFlat,
        Note::A,
        Note::BFlat,
        Note::B,
    ];

    /// Reference frequencies in Hz, fourth octave, equal temperament (A = 440).
    const FREQUENCIES: [f64; NOTE_COUNT] = [
        261.63, 277.18, 293.66, 311.13, 329.63, 349.23, 369.99, 392.00, 415.30, 440.00, 466.16,
        493.88,
    ];

    const NAMES: [&'static str; NOTE_COUNT] = [
        "C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
    ];

    /// Canonical spelling.
    pub const fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    /// Reference frequency in Hz.
    pub const fn frequency(self) -> f64 {
        Self::FREQUENCIES[self as usize]
    }

    /// Parse a note leniently: surrounding whitespace is trimmed, case is
    /// ignored, and a trailing octave `4` is accepted (`"c#4"`).
    ///
    /// Returns `None` for anything outside the twelve spellings.
    pub fn parse_lenient(text: &str) -> Option<Self> {
        let text = text.trim();
        let bare = match text.strip_suffix('4') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => text,
        };
        Self::ALL
            .iter()
            .copied()
            .find(|note| note.name().eq_ignore_ascii_case(bare))
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Note {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s).ok_or_else(|| NoteError::InvalidNote(s.to_string()))
    }
}

impl TryFrom<String> for Note {
    type Error = NoteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Note> for String {
    fn from(note: Note) -> Self {
        note.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip_through_parse() {
        for note in Note::ALL {
            assert_eq!(note.name().parse::<Note>().unwrap(), note);
        }
    }

    #[test]
    fn parse_ignores_case_and_whitespace() {
        assert_eq!(" c# ".parse::<Note>().unwrap(), Note::CSharp);
        assert_eq!("EB".parse::<Note>().unwrap(), Note::EFlat);
        assert_eq!("bb".parse::<Note>().unwrap(), Note::BFlat);
    }

    #[test]
    fn parse_accepts_fourth_octave_suffix() {
        assert_eq!("C#4".parse::<Note>().unwrap(), Note::CSharp);
        assert_eq!("a4".parse::<Note>().unwrap(), Note::A);
    }

    #[test]
    fn parse_rejects_other_spellings() {
        for bad in ["H", "D#", "Db", "C5", "", "4", "C##"] {
            assert_eq!(
                bad.parse::<Note>(),
                Err(NoteError::InvalidNote(bad.to_string())),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn frequencies_match_reference_table() {
        assert_eq!(Note::C.frequency(), 261.63);
        assert_eq!(Note::A.frequency(), 440.00);
        assert_eq!(Note::B.frequency(), 493.88);
    }

    #[test]
    fn frequencies_rise_chromatically() {
        for pair in Note::ALL.windows(2) {
            let ratio = pair[1].frequency() / pair[0].frequency();
            // 2^(1/12) ≈ 1.059463
            assert!((ratio - 1.059463).abs() < 0.001, "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn serializes_as_name() {
        let json = serde_json::to_string(&Note::FSharp).unwrap();
        assert_eq!(json, "\"F#\"");
        let back: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Note::FSharp);
        assert!(serde_json::from_str::<Note>("\"H\"").is_err());
    }
}
