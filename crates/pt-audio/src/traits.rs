//! Audio output trait and error types.

use pt_model::AudioClip;
use pt_synth::{clip_to_frames, Frame};
use thiserror::Error;

/// Error type for audio operations.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Failed to initialize audio device
    #[error("device init error: {0}")]
    DeviceInit(String),
    /// Failed to create audio stream
    #[error("stream create error: {0}")]
    StreamCreate(String),
    /// Playback error
    #[error("playback error: {0}")]
    Playback(String),
    /// No audio device available
    #[error("no audio device available")]
    NoDevice,
    /// The output queue was full; the tail of the clip was dropped
    #[error("output queue full, dropped {dropped} frames")]
    Overrun { dropped: usize },
}

/// Trait for audio output backends.
///
/// Writes queue audio and return immediately; callers never wait for a
/// clip to finish sounding.
pub trait AudioOutput {
    /// Get the sample rate.
    fn sample_rate(&self) -> u32;

    /// Queue frames after anything already queued.
    fn write(&mut self, frames: &[Frame]) -> Result<(), AudioError>;

    /// Discard queued frames that have not been played yet.
    fn flush(&mut self);

    /// Start playback.
    fn start(&mut self) -> Result<(), AudioError>;

    /// Stop playback.
    fn stop(&mut self) -> Result<(), AudioError>;

    /// Cut off whatever is sounding and play `clip` from its first frame.
    fn play_clip(&mut self, clip: &AudioClip) -> Result<(), AudioError> {
        let frames = clip_to_frames(clip, self.sample_rate());
        self.flush();
        self.write(&frames)
    }
}
