//! Audio frame type.

use pt_model::AudioClip;

use crate::resample::resample_linear;

/// A stereo audio frame (16-bit integer).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub left: i16,
    pub right: i16,
}

impl Frame {
    /// Create a silent frame.
    pub const fn silence() -> Self {
        Self { left: 0, right: 0 }
    }

    /// Create a mono frame (same value for both channels).
    pub const fn mono(value: i16) -> Self {
        Self {
            left: value,
            right: value,
        }
    }

    /// Convert to normalized f32 (left, right).
    pub fn to_f32(self) -> (f32, f32) {
        (self.left as f32 / 32768.0, self.right as f32 / 32768.0)
    }
}

/// Quantize a normalized sample to 16-bit PCM, clamping out-of-range input.
pub fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16
}

/// Convert a clip to stereo frames at `sample_rate`.
///
/// Mono clips play on both sides; channels beyond the second are dropped.
pub fn clip_to_frames(clip: &AudioClip, sample_rate: u32) -> Vec<Frame> {
    let clip = resample_linear(clip, sample_rate);
    if clip.channels() == 0 {
        return Vec::new();
    }
    (0..clip.frames())
        .map(|i| Frame {
            left: f32_to_i16(clip.sample(0, i)),
            right: f32_to_i16(clip.sample(1, i)),
        })
        .collect()
}
