//! Splicing a target tone after a cadence clip.

use std::time::Duration;

use pt_model::AudioClip;

use crate::resample::resample_linear;

/// Join `cadence`, `gap` of silence, and `tone` into one playable clip.
///
/// The result takes the cadence's sample rate and channel layout: the
/// tone is resampled if needed and a mono tone is copied to every cadence
/// channel. With a zero gap this is plain concatenation.
pub fn compose_playback_clip(cadence: &AudioClip, tone: &AudioClip, gap: Duration) -> AudioClip {
    if cadence.channels() == 0 {
        return tone.clone();
    }

    let tone = resample_linear(tone, cadence.sample_rate()).with_channels(cadence.channels());
    let gap_frames = libm::round(gap.as_secs_f64() * cadence.sample_rate() as f64) as usize;

    let mut clip = cadence.clone();
    clip.pad_silence(gap_frames);
    clip.append(&tone);
    clip
}
