//! One-pole exponential parameter smoother
//!
//! Turns step changes from automation into a per-sample trajectory so
//! feedback, damping and diffusion coefficients never jump.

/// Fallback rate used when `prepare` receives a non-positive sample rate.
const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

/// Once this close to the target the smoother lands on it exactly, so the
/// residue never decays into denormals or stalls an ulp away.
const SETTLE_EPSILON: f32 = 1.0e-6;

/// Exponential smoother: `current = target + (current - target) * coefficient`
#[derive(Debug, Clone)]
pub struct ParameterSmoother {
    sample_rate: f64,
    smoothing_time_ms: f32,
    target: f32,
    current: f32,
    coefficient: f32,
}

impl Default for ParameterSmoother {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            smoothing_time_ms: 0.0,
            target: 0.0,
            current: 0.0,
            coefficient: 0.0,
        }
    }
}

impl ParameterSmoother {
    /// Create a smoother with the given time constant (ms)
    pub fn new(smoothing_time_ms: f32) -> Self {
        let mut smoother = Self::default();
        smoother.set_smoothing_time_ms(smoothing_time_ms);
        smoother
    }

    /// Set the sample rate and recompute the coefficient
    pub fn prepare(&mut self, sample_rate: f64) {
        self.sample_rate = if sample_rate > 0.0 {
            sample_rate
        } else {
            DEFAULT_SAMPLE_RATE
        };
        self.update_coefficient();
    }

    /// Set the time constant in milliseconds (negative values clamp to 0 = no smoothing)
    pub fn set_smoothing_time_ms(&mut self, time_ms: f32) {
        self.smoothing_time_ms = time_ms.max(0.0);
        self.update_coefficient();
    }

    /// Set the destination value
    pub fn set_target(&mut self, value: f32) {
        self.target = value;
    }

    /// Get the destination value
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Get the last produced value
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Get the per-sample decay coefficient
    pub fn coefficient(&self) -> f32 {
        self.coefficient
    }

    /// Advance one sample and return the smoothed value
    #[inline]
    pub fn next_value(&mut self) -> f32 {
        if self.coefficient <= 0.0 {
            self.current = self.target;
            return self.current;
        }

        let residue = (self.current - self.target) * self.coefficient;
        self.current = if residue.abs() < SETTLE_EPSILON {
            self.target
        } else {
            self.target + residue
        };

        self.current
    }

    /// Jump to `value` without slewing
    pub fn reset(&mut self, value: f32) {
        self.current = value;
        self.target = value;
    }

    fn update_coefficient(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coefficient = 0.0;
            return;
        }

        let time_seconds = f64::from(self.smoothing_time_ms) * 0.001;
        self.coefficient = (-1.0 / (time_seconds * self.sample_rate)).exp() as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_snaps_both_values() {
        let mut smoother = ParameterSmoother::new(50.0);
        smoother.prepare(48000.0);
        smoother.reset(0.7);
        assert_eq!(smoother.current(), 0.7);
        assert_eq!(smoother.target(), 0.7);
        assert_eq!(smoother.next_value(), 0.7);
    }

    #[test]
    fn test_zero_time_disables_smoothing() {
        let mut smoother = ParameterSmoother::new(0.0);
        smoother.prepare(48000.0);
        smoother.set_target(0.25);
        assert_eq!(smoother.coefficient(), 0.0);
        assert_eq!(smoother.next_value(), 0.25);
    }

    #[test]
    fn test_negative_time_clamps_to_zero() {
        let mut smoother = ParameterSmoother::new(-20.0);
        smoother.prepare(48000.0);
        smoother.set_target(1.0);
        assert_eq!(smoother.next_value(), 1.0);
    }

    #[test]
    fn test_coefficient_matches_time_constant() {
        let mut smoother = ParameterSmoother::default();
        smoother.prepare(48000.0);
        smoother.set_smoothing_time_ms(100.0);
        let expected = (-1.0f64 / (0.1 * 48000.0)).exp() as f32;
        assert!((smoother.coefficient() - expected).abs() < 1e-7);
    }

    #[test]
    fn test_reaches_63_percent_after_one_time_constant() {
        let mut smoother = ParameterSmoother::default();
        smoother.prepare(48000.0);
        smoother.set_smoothing_time_ms(10.0);
        smoother.set_target(1.0);

        let mut value = 0.0;
        for _ in 0..480 {
            value = smoother.next_value();
        }
        assert!((value - 0.632).abs() < 0.01, "value={value}");
    }

    #[test]
    fn test_converges_within_one_percent_after_five_time_constants() {
        let mut smoother = ParameterSmoother::default();
        smoother.prepare(48000.0);
        smoother.set_target(1.0);
        smoother.set_smoothing_time_ms(100.0);

        // 5 * 100 ms at 48 kHz
        let mut value = 0.0;
        for _ in 0..24000 {
            value = smoother.next_value();
        }
        assert!((value - 1.0).abs() < 0.01, "value={value}");
    }

    #[test]
    fn test_flushes_tiny_values_to_zero() {
        let mut smoother = ParameterSmoother::default();
        smoother.prepare(48000.0);
        smoother.set_smoothing_time_ms(0.01);
        smoother.reset(1.0e-6);
        smoother.set_target(0.0);
        for _ in 0..64 {
            smoother.next_value();
        }
        assert_eq!(smoother.current(), 0.0);
    }

    #[test]
    fn test_settles_exactly_on_non_zero_target() {
        let mut smoother = ParameterSmoother::new(1.0);
        smoother.prepare(48000.0);
        smoother.reset(0.2);
        smoother.set_target(0.7);
        for _ in 0..4800 {
            smoother.next_value();
        }
        assert_eq!(smoother.current(), 0.7);
        assert_eq!(smoother.next_value(), 0.7);
    }

    #[test]
    fn test_invalid_sample_rate_falls_back() {
        let mut smoother = ParameterSmoother::new(10.0);
        smoother.prepare(0.0);
        let expected = (-1.0f64 / (0.01 * DEFAULT_SAMPLE_RATE)).exp() as f32;
        assert!((smoother.coefficient() - expected).abs() < 1e-7);
    }
}
