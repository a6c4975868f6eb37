//! Pitch measurement for rendered tones.

/// Estimate the fundamental of a periodic signal from its rising zero crossings.
///
/// Crossing positions are interpolated between samples, so a 0.2 s tone
/// resolves to well under a percent. Returns `None` when fewer than two
/// rising crossings exist.
pub fn estimate_frequency(samples: &[f32], sample_rate: u32) -> Option<f64> {
    let mut first: Option<f64> = None;
    let mut last = 0.0;
    let mut crossings = 0usize;

    for (i, pair) in samples.windows(2).enumerate() {
        let (a, b) = (pair[0] as f64, pair[1] as f64);
        if a < 0.0 && b >= 0.0 {
            let position = i as f64 + a / (a - b);
            if first.is_none() {
                first = Some(position);
            }
            last = position;
            crossings += 1;
        }
    }

    let first = first?;
    if crossings < 2 || sample_rate == 0 {
        return None;
    }
    let periods = (crossings - 1) as f64;
    Some(periods * sample_rate as f64 / (last - first))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|k| (2.0 * core::f64::consts::PI * freq * k as f64 / rate as f64).sin() as f32)
            .collect()
    }

    #[test]
    fn measures_plain_sine() {
        let measured = estimate_frequency(&sine(100.0, 8000, 8000), 8000).unwrap();
        assert!((measured - 100.0).abs() < 0.1, "measured {}", measured);
    }

    #[test]
    fn silence_has_no_frequency() {
        assert_eq!(estimate_frequency(&[0.0; 512], 44100), None);
    }

    #[test]
    fn single_crossing_is_not_enough() {
        assert_eq!(estimate_frequency(&[-1.0, 1.0, 1.0], 44100), None);
    }
}
