//! Loudness over time and decay-time estimation

use crate::AnalysisError;

/// Level reported for digital silence
pub const SILENCE_DB: f32 = -200.0;

/// Schroeder fit range (T30, extrapolated to 60 dB)
const FIT_START_DB: f64 = -5.0;
const FIT_END_DB: f64 = -35.0;

/// Root mean square of a buffer; 0.0 when empty
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum / samples.len() as f64).sqrt() as f32
}

/// Absolute peak of a buffer
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

/// Linear amplitude to dBFS, floored at [`SILENCE_DB`]
pub fn to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        return SILENCE_DB;
    }
    (20.0 * linear.log10()).max(SILENCE_DB)
}

/// RMS of consecutive blocks of `block_size` samples (last partial block included)
pub fn block_rms(samples: &[f32], block_size: usize) -> Vec<f32> {
    samples.chunks(block_size.max(1)).map(rms).collect()
}

/// RMS level in dB of a window starting at `start_secs`
pub fn windowed_rms_db(
    samples: &[f32],
    sample_rate: u32,
    start_secs: f32,
    window_secs: f32,
) -> Result<f32, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidSampleRate(sample_rate));
    }
    let start = (start_secs.max(0.0) * sample_rate as f32) as usize;
    let len = ((window_secs.max(0.0) * sample_rate as f32) as usize).max(1);
    let end = start + len;
    if end > samples.len() {
        return Err(AnalysisError::SignalTooShort {
            needed: end,
            available: samples.len(),
        });
    }
    Ok(to_db(rms(&samples[start..end])))
}

/// RT60 from the Schroeder backward-integrated energy curve
///
/// Fits a line between -5 dB and -35 dB of the integrated curve and
/// extrapolates the slope to 60 dB of decay.
pub fn schroeder_rt60(impulse_response: &[f32], sample_rate: u32) -> Result<f32, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidSampleRate(sample_rate));
    }
    if impulse_response.len() < 2 {
        return Err(AnalysisError::SignalTooShort {
            needed: 2,
            available: impulse_response.len(),
        });
    }

    let mut curve = vec![0.0f64; impulse_response.len()];
    let mut acc = 0.0f64;
    for (slot, &s) in curve.iter_mut().zip(impulse_response.iter()).rev() {
        acc += f64::from(s) * f64::from(s);
        *slot = acc;
    }
    let total = curve[0];
    if total <= 0.0 {
        return Err(AnalysisError::Silent);
    }

    let db = |e: f64| if e > 0.0 { 10.0 * (e / total).log10() } else { f64::NEG_INFINITY };

    let Some(start) = curve.iter().position(|&e| db(e) <= FIT_START_DB) else {
        return Err(AnalysisError::DecayTooShallow {
            reached_db: 0.0,
            needed_db: FIT_END_DB as f32,
        });
    };
    let Some(end) = curve.iter().position(|&e| db(e) <= FIT_END_DB) else {
        let reached = curve.iter().rev().find(|&&e| e > 0.0).map_or(0.0, |&e| db(e));
        return Err(AnalysisError::DecayTooShallow {
            reached_db: reached as f32,
            needed_db: FIT_END_DB as f32,
        });
    };

    // Least-squares slope of dB over time
    let rate = f64::from(sample_rate);
    let n = (end - start + 1) as f64;
    let (mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0);
    for (i, &e) in curve.iter().enumerate().take(end + 1).skip(start) {
        let x = i as f64 / rate;
        let y = db(e);
        sx += x;
        sy += y;
        sxx += x * x;
        sxy += x * y;
    }
    let denom = n * sxx - sx * sx;
    if denom <= 0.0 {
        return Err(AnalysisError::SignalTooShort {
            needed: start + 2,
            available: end + 1,
        });
    }
    let slope = (n * sxy - sx * sy) / denom;
    if slope >= 0.0 {
        return Err(AnalysisError::DecayTooShallow {
            reached_db: FIT_END_DB as f32,
            needed_db: FIT_END_DB as f32,
        });
    }

    Ok((-60.0 / slope) as f32)
}
