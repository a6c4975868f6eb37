//! Sine-tone rendering for target notes.
//!
//! Every tone starts at phase 0, so the same note always renders the same
//! buffer. `libm::sin` keeps that true across platforms.

use core::f64::consts::TAU;

use pt_model::{AudioClip, Note, NoteError};
use thiserror::Error;

/// Error type for synthesis.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SynthError {
    /// The requested note is outside the twelve-note set.
    #[error(transparent)]
    InvalidNote(#[from] NoteError),
}

/// Fixed rendering parameters for a tone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneParams {
    pub sample_rate: u32,
    pub duration_secs: f64,
    /// Peak amplitude (full scale = 1.0).
    pub amplitude: f64,
}

impl ToneParams {
    /// 44.1 kHz, 0.2 s, half scale.
    pub const STANDARD: ToneParams = ToneParams {
        sample_rate: 44_100,
        duration_secs: 0.2,
        amplitude: 0.5,
    };

    /// Number of samples a tone occupies: `round(sample_rate * duration)`.
    pub fn frame_count(&self) -> usize {
        libm::round(self.sample_rate as f64 * self.duration_secs).max(0.0) as usize
    }
}

impl Default for ToneParams {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Render `note` with the standard parameters.
pub fn synthesize(note: Note) -> AudioClip {
    synthesize_with(note, &ToneParams::STANDARD)
}

/// Render `note` as a mono sine wave: `amplitude * sin(2π·f·k/sample_rate)`.
pub fn synthesize_with(note: Note, params: &ToneParams) -> AudioClip {
    let len = params.frame_count();
    let rate = params.sample_rate as f64;
    let freq = note.frequency();

    let samples = (0..len)
        .map(|k| {
            let t = k as f64 / rate;
            (params.amplitude * libm::sin(TAU * freq * t)) as f32
        })
        .collect();

    AudioClip::from_mono(samples, params.sample_rate)
}

/// Parse `name` and render it with the standard parameters.
pub fn synthesize_named(name: &str) -> Result<AudioClip, SynthError> {
    let note: Note = name.parse()?;
    Ok(synthesize(note))
}
