//! Sample-rate conversion.

use pt_model::AudioClip;

/// Convert `clip` to `target_rate` by linear interpolation.
///
/// Output length is `round(frames * target_rate / source_rate)`. A clip
/// already at the target rate (or with an unknown rate of 0) is returned
/// unchanged.
pub fn resample_linear(clip: &AudioClip, target_rate: u32) -> AudioClip {
    let source_rate = clip.sample_rate();
    if source_rate == target_rate || source_rate == 0 || target_rate == 0 || clip.is_empty() {
        return clip.clone();
    }

    let ratio = source_rate as f64 / target_rate as f64;
    let out_frames = libm::round(clip.frames() as f64 / ratio) as usize;
    let last = clip.frames() - 1;

    let planes = (0..clip.channels())
        .map(|ch| {
            let src = clip.channel(ch);
            (0..out_frames)
                .map(|i| {
                    let pos = i as f64 * ratio;
                    let idx = (pos as usize).min(last);
                    let next = (idx + 1).min(last);
                    let frac = (pos - idx as f64) as f32;
                    src[idx] + (src[next] - src[idx]) * frac
                })
                .collect()
        })
        .collect();

    AudioClip::from_planes(planes, target_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_rate_is_identity() {
        let clip = AudioClip::from_mono(vec![0.1, 0.2, 0.3], 44100);
        assert_eq!(resample_linear(&clip, 44100), clip);
    }

    #[test]
    fn upsampling_doubles_length_and_interpolates() {
        let clip = AudioClip::from_mono(vec![0.0, 1.0, 0.0], 8000);
        let out = resample_linear(&clip, 16000);
        assert_eq!(out.frames(), 6);
        assert_eq!(out.sample_rate(), 16000);
        assert_eq!(out.channel(0)[..4], [0.0, 0.5, 1.0, 0.5]);
    }

    #[test]
    fn downsampling_keeps_channels() {
        let clip = AudioClip::from_planes(vec![vec![1.0; 100], vec![-1.0; 100]], 48000);
        let out = resample_linear(&clip, 24000);
        assert_eq!(out.channels(), 2);
        assert_eq!(out.frames(), 50);
        assert!(out.channel(1).iter().all(|&s| s == -1.0));
    }
}
