//! Output that discards everything, for headless runs.

use pt_synth::Frame;

use crate::traits::{AudioError, AudioOutput};

/// Silent output. Counts what it was asked to play.
#[derive(Debug)]
pub struct NullOutput {
    sample_rate: u32,
    frames_written: usize,
}

impl NullOutput {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            frames_written: 0,
        }
    }

    /// Total frames accepted since creation.
    pub fn frames_written(&self) -> usize {
        self.frames_written
    }
}

impl Default for NullOutput {
    fn default() -> Self {
        Self::new(44_100)
    }
}

impl AudioOutput for NullOutput {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn write(&mut self, frames: &[Frame]) -> Result<(), AudioError> {
        self.frames_written += frames.len();
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
