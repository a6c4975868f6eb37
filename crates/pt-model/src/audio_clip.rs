//! Multichannel f32 audio clip with planar layout.

use std::time::Duration;

/// A finite multichannel f32 clip in planar layout.
///
/// Data is stored as `channels` contiguous planes of `frames` samples each.
/// `data[ch * frames + frame]` gives the sample for channel `ch` at `frame`.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioClip {
    data: Vec<f32>,
    channels: u16,
    frames: usize,
    sample_rate: u32,
}

impl AudioClip {
    /// Create a silent clip with the given dimensions.
    pub fn new(channels: u16, frames: usize, sample_rate: u32) -> Self {
        Self {
            data: vec![0.0; channels as usize * frames],
            channels,
            frames,
            sample_rate,
        }
    }

    /// Wrap a mono sample buffer.
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            frames: samples.len(),
            data: samples,
            channels: 1,
            sample_rate,
        }
    }

    /// Build from one plane per channel. Planes are truncated to the shortest.
    pub fn from_planes(planes: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        let frames = planes.iter().map(Vec::len).min().unwrap_or(0);
        let mut data = Vec::with_capacity(planes.len() * frames);
        for plane in &planes {
            data.extend_from_slice(&plane[..frames]);
        }
        Self {
            data,
            channels: planes.len() as u16,
            frames,
            sample_rate,
        }
    }

    /// Number of channels.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames as f64 / self.sample_rate as f64)
    }

    /// Read-only access to one channel's sample data.
    pub fn channel(&self, ch: u16) -> &[f32] {
        let start = ch as usize * self.frames;
        &self.data[start..start + self.frames]
    }

    /// Mutable access to one channel's sample data.
    pub fn channel_mut(&mut self, ch: u16) -> &mut [f32] {
        let start = ch as usize * self.frames;
        let len = self.frames;
        &mut self.data[start..start + len]
    }

    /// Sample at `frame`, reading channel 0 when `ch` is past the last channel.
    pub fn sample(&self, ch: u16, frame: usize) -> f32 {
        let ch = if ch < self.channels { ch } else { 0 };
        self.channel(ch)[frame]
    }

    /// Remap to `channels` channels.
    ///
    /// Mono is replicated to every output channel; folding down to mono
    /// averages the inputs; any other layout copies overlapping channels
    /// and fills the rest from channel 0.
    pub fn with_channels(&self, channels: u16) -> AudioClip {
        if channels == self.channels {
            return self.clone();
        }
        let mut out = AudioClip::new(channels, self.frames, self.sample_rate);
        if channels == 1 && self.channels > 1 {
            let scale = 1.0 / self.channels as f32;
            for ch in 0..self.channels {
                let src = self.channel(ch);
                for (dst, s) in out.channel_mut(0).iter_mut().zip(src) {
                    *dst += s * scale;
                }
            }
        } else {
            for ch in 0..channels {
                let src = if ch < self.channels { ch } else { 0 };
                out.channel_mut(ch).copy_from_slice(self.channel(src));
            }
        }
        out
    }

    /// Append `other` after this clip's last frame.
    ///
    /// `other` must already match this clip's channel count.
    pub fn append(&mut self, other: &AudioClip) {
        debug_assert_eq!(self.channels, other.channels, "append across channel layouts");
        let frames = self.frames + other.frames;
        let mut data = Vec::with_capacity(self.channels as usize * frames);
        for ch in 0..self.channels {
            data.extend_from_slice(self.channel(ch));
            data.extend_from_slice(other.channel(ch));
        }
        self.data = data;
        self.frames = frames;
    }

    /// Append `frames` frames of silence.
    pub fn pad_silence(&mut self, frames: usize) {
        let silence = AudioClip::new(self.channels, frames, self.sample_rate);
        self.append(&silence);
    }

    /// Largest absolute sample value across all channels.
    pub fn peak(&self) -> f32 {
        self.data.iter().fold(0.0, |peak, s| peak.max(s.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_silent() {
        let clip = AudioClip::new(2, 4, 44100);
        assert_eq!(clip.channels(), 2);
        assert_eq!(clip.frames(), 4);
        assert!(clip.channel(0).iter().all(|&s| s == 0.0));
        assert!(clip.channel(1).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn channel_mut_writes_correctly() {
        let mut clip = AudioClip::new(2, 2, 44100);
        clip.channel_mut(0)[0] = 1.0;
        clip.channel_mut(1)[1] = -0.5;
        assert_eq!(clip.channel(0), &[1.0, 0.0]);
        assert_eq!(clip.channel(1), &[0.0, -0.5]);
    }

    #[test]
    fn mono_replicates_to_stereo() {
        let mono = AudioClip::from_mono(vec![0.25, -0.5], 44100);
        let stereo = mono.with_channels(2);
        assert_eq!(stereo.channels(), 2);
        assert_eq!(stereo.channel(0), &[0.25, -0.5]);
        assert_eq!(stereo.channel(1), &[0.25, -0.5]);
    }

    #[test]
    fn stereo_folds_to_mono_average() {
        let stereo = AudioClip::from_planes(vec![vec![1.0, 0.0], vec![0.0, -1.0]], 44100);
        let mono = stereo.with_channels(1);
        assert_eq!(mono.channel(0), &[0.5, -0.5]);
    }

    #[test]
    fn append_keeps_planes_separate() {
        let mut a = AudioClip::from_planes(vec![vec![1.0], vec![2.0]], 8000);
        let b = AudioClip::from_planes(vec![vec![3.0, 4.0], vec![5.0, 6.0]], 8000);
        a.append(&b);
        assert_eq!(a.frames(), 3);
        assert_eq!(a.channel(0), &[1.0, 3.0, 4.0]);
        assert_eq!(a.channel(1), &[2.0, 5.0, 6.0]);
    }

    #[test]
    fn pad_silence_extends_with_zeros() {
        let mut clip = AudioClip::from_mono(vec![0.5], 8000);
        clip.pad_silence(2);
        assert_eq!(clip.channel(0), &[0.5, 0.0, 0.0]);
    }

    #[test]
    fn from_planes_truncates_to_shortest() {
        let clip = AudioClip::from_planes(vec![vec![1.0, 2.0, 3.0], vec![4.0]], 8000);
        assert_eq!(clip.frames(), 1);
        assert_eq!(clip.channel(0), &[1.0]);
    }

    #[test]
    fn duration_from_frames() {
        let clip = AudioClip::new(1, 8820, 44100);
        assert_eq!(clip.duration(), Duration::from_millis(200));
        assert!(AudioClip::new(1, 0, 44100).is_empty());
    }

    #[test]
    fn peak_spans_channels() {
        let clip = AudioClip::from_planes(vec![vec![0.1, -0.3], vec![0.2, 0.0]], 8000);
        assert_eq!(clip.peak(), 0.3);
    }
}
