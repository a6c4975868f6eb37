//! Cadence progressions and key centers.
//!
//! Both are lookup keys into the pre-rendered cadence clips; nothing in
//! the workspace synthesizes a cadence.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::note::{Note, NoteError};

/// A roman-numeral chord progression that establishes the key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CadenceType {
    /// I-IV-V-I
    Authentic,
    /// I-V-I
    Dominant,
    /// II-V-I
    TwoFiveOne,
}

/// Error for text that names no known cadence.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid cadence '{0}': expected one of I-IV-V-I, I-V-I, II-V-I")]
pub struct CadenceParseError(pub String);

impl CadenceType {
    pub const ALL: [CadenceType; 3] = [
        CadenceType::Authentic,
        CadenceType::Dominant,
        CadenceType::TwoFiveOne,
    ];

    /// Roman-numeral label, also the file-name stem of its clips.
    pub const fn label(self) -> &'static str {
        match self {
            CadenceType::Authentic => "I-IV-V-I",
            CadenceType::Dominant => "I-V-I",
            CadenceType::TwoFiveOne => "II-V-I",
        }
    }
}

impl fmt::Display for CadenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CadenceType {
    type Err = CadenceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CadenceParseError(s.to_string()))
    }
}

impl TryFrom<String> for CadenceType {
    type Error = CadenceParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CadenceType> for String {
    fn from(cadence: CadenceType) -> Self {
        cadence.label().to_string()
    }
}

/// Key center a cadence is played in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tonality(Note);

impl Tonality {
    pub const fn new(root: Note) -> Self {
        Self(root)
    }

    pub const fn root(self) -> Note {
        self.0
    }

    /// All twelve key centers in chromatic order.
    pub fn all() -> impl Iterator<Item = Tonality> {
        Note::ALL.into_iter().map(Tonality)
    }
}

impl fmt::Display for Tonality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Tonality {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Tonality)
    }
}

impl From<Note> for Tonality {
    fn from(root: Note) -> Self {
        Tonality(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back() {
        for cadence in CadenceType::ALL {
            assert_eq!(cadence.label().parse::<CadenceType>().unwrap(), cadence);
        }
        assert_eq!("ii-v-i".parse::<CadenceType>().unwrap(), CadenceType::TwoFiveOne);
    }

    #[test]
    fn unknown_cadence_rejected() {
        assert!("I-VI-IV-V".parse::<CadenceType>().is_err());
    }

    #[test]
    fn tonality_uses_note_spelling() {
        let key: Tonality = "eb".parse().unwrap();
        assert_eq!(key.root(), Note::EFlat);
        assert_eq!(key.to_string(), "Eb");
        assert_eq!(Tonality::all().count(), 12);
    }
}
