//! Tone synthesis and clip composition for pitchtrainer.
//!
//! Renders target notes as sine tones, splices them after cadence clips,
//! and converts clips to the 16-bit stereo frames the output backend
//! consumes.

mod analysis;
mod compose;
mod frame;
mod resample;
mod tone;

pub use analysis::estimate_frequency;
pub use compose::compose_playback_clip;
pub use frame::{clip_to_frames, f32_to_i16, Frame};
pub use resample::resample_linear;
pub use tone::{synthesize, synthesize_named, synthesize_with, SynthError, ToneParams};
