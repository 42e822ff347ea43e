//! Tuned constants for the Chambers network
//!
//! The three ceilings (feedback, wet limiter, freeze limiter) were tuned
//! independently by ear and against the decay tests. They are kept as
//! separate fields; changing any of them changes the sound of the tail.

/// Per-parameter smoothing time constants in milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingTimes {
    /// Feedback amount; smooth enough to keep the tail intact while moving
    pub time_ms: f32,
    /// Damping; slower to avoid high-frequency flutter
    pub mass_ms: f32,
    /// Diffusion and injection gain
    pub density_ms: f32,
    pub bloom_ms: f32,
    /// Low-end containment; slow to avoid pumping
    pub gravity_ms: f32,
    /// Matrix morph
    pub warp_ms: f32,
    pub drift_ms: f32,
}

impl Default for SmoothingTimes {
    fn default() -> Self {
        Self {
            time_ms: 40.0,
            mass_ms: 60.0,
            density_ms: 30.0,
            bloom_ms: 40.0,
            gravity_ms: 80.0,
            warp_ms: 250.0,
            drift_ms: 1500.0,
        }
    }
}

/// Tuning for a [`Chambers`](crate::Chambers) instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChambersTuning {
    /// Feedback at Time = 0
    pub feedback_min: f32,
    /// Feedback at Time = 1
    pub feedback_max: f32,
    /// Hard ceiling applied after mapping; must stay below 1.0
    pub feedback_ceiling: f32,
    /// Wet output limiter
    pub wet_ceiling: f32,
    /// Limiter applied to written samples while frozen
    pub freeze_ceiling: f32,
    /// Live -> frozen fade
    pub freeze_engage_ms: f32,
    /// Frozen -> live ramp
    pub freeze_release_ms: f32,
    /// Damping at Mass = 0 and Mass = 1 (before per-line offsets)
    pub damping_min: f32,
    pub damping_max: f32,
    /// Gravity high-pass cutoff range in Hz
    pub gravity_min_hz: f32,
    pub gravity_max_hz: f32,
    /// Minimum warp movement before the matrix is rebuilt
    pub warp_epsilon: f32,
    /// Drift depth at Drift = 1, in samples (capped at 1.0)
    pub drift_depth_samples: f32,
    /// Range of per-line drift oscillator rates in Hz
    pub drift_rate_min_hz: f32,
    pub drift_rate_max_hz: f32,
    /// Input magnitude that (re)starts the bloom envelope
    pub envelope_threshold: f32,
    /// Envelope decay time range mapped from Time, in seconds
    pub envelope_min_secs: f32,
    pub envelope_max_secs: f32,
    /// Extra swell at Bloom = 1 (1.5x peak)
    pub bloom_peak_gain: f32,
    pub smoothing: SmoothingTimes,
}

impl Default for ChambersTuning {
    fn default() -> Self {
        Self {
            feedback_min: 0.35,
            feedback_max: 0.995,
            feedback_ceiling: 0.995,
            wet_ceiling: 0.95,
            freeze_ceiling: 0.9,
            freeze_engage_ms: 50.0,
            freeze_release_ms: 40.0,
            damping_min: 0.1,
            damping_max: 0.95,
            gravity_min_hz: 20.0,
            gravity_max_hz: 200.0,
            warp_epsilon: 1.0e-4,
            drift_depth_samples: 1.0,
            drift_rate_min_hz: 0.05,
            drift_rate_max_hz: 0.35,
            envelope_threshold: 1.0e-3,
            envelope_min_secs: 1.0,
            envelope_max_secs: 12.0,
            bloom_peak_gain: 0.5,
            smoothing: SmoothingTimes::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ceilings_are_independent() {
        let tuning = ChambersTuning::default();
        assert!(tuning.feedback_ceiling < 1.0);
        assert_eq!(tuning.wet_ceiling, 0.95);
        assert_eq!(tuning.freeze_ceiling, 0.9);
        assert!(tuning.feedback_max <= tuning.feedback_ceiling);
    }

    #[test]
    fn test_smoothing_times_span_expected_range() {
        let s = SmoothingTimes::default();
        let all = [
            s.time_ms,
            s.mass_ms,
            s.density_ms,
            s.bloom_ms,
            s.gravity_ms,
            s.warp_ms,
            s.drift_ms,
        ];
        assert!(all.iter().all(|&t| (30.0..=1500.0).contains(&t)));
    }
}
