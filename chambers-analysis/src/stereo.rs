//! Stereo image measurements

/// Split interleaved stereo into (left, right); a trailing odd sample is dropped
pub fn split_interleaved(samples: &[f32]) -> (Vec<f32>, Vec<f32>) {
    samples.chunks_exact(2).map(|frame| (frame[0], frame[1])).unzip()
}

/// Normalized zero-lag cross-correlation of two channels (-1.0 to 1.0)
///
/// Returns 0.0 when either channel is silent.
pub fn correlation(left: &[f32], right: &[f32]) -> f32 {
    let mut lr = 0.0f64;
    let mut ll = 0.0f64;
    let mut rr = 0.0f64;
    for (&l, &r) in left.iter().zip(right.iter()) {
        let (l, r) = (f64::from(l), f64::from(r));
        lr += l * r;
        ll += l * l;
        rr += r * r;
    }
    let denom = (ll * rr).sqrt();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    (lr / denom).clamp(-1.0, 1.0) as f32
}

/// Mean value of a channel
pub fn dc_offset(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|&s| f64::from(s)).sum::<f64>() / samples.len() as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_interleaved() {
        let (l, r) = split_interleaved(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(l, vec![1.0, 3.0]);
        assert_eq!(r, vec![2.0, 4.0]);
    }

    #[test]
    fn test_correlation_extremes() {
        let a: Vec<f32> = (0..100).map(|i| (i as f32 * 0.1).sin()).collect();
        let inverted: Vec<f32> = a.iter().map(|s| -s).collect();
        assert!((correlation(&a, &a) - 1.0).abs() < 1e-6);
        assert!((correlation(&a, &inverted) + 1.0).abs() < 1e-6);
        assert_eq!(correlation(&a, &[0.0; 100]), 0.0);
    }

    #[test]
    fn test_dc_offset() {
        assert!((dc_offset(&[0.5, 0.3, 0.1]) - 0.3).abs() < 1e-6);
        assert_eq!(dc_offset(&[]), 0.0);
    }
}
