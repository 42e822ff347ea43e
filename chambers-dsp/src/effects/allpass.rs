//! Single-section allpass diffuser
//!
//! Canonical one-multiplier allpass used for input and late diffusion.
//! It raises echo density without touching loudness or spectral tilt.

/// Coefficient bound that keeps the recursion from ringing
pub const MAX_DIFFUSER_COEFFICIENT: f32 = 0.74;

/// Schroeder allpass with a configurable delay and coefficient
#[derive(Debug, Clone)]
pub struct AllpassDiffuser {
    delay_samples: usize,
    buffer: Vec<f32>,
    write_pos: usize,
    coefficient: f32,
}

impl Default for AllpassDiffuser {
    fn default() -> Self {
        Self {
            delay_samples: 1,
            buffer: Vec::new(),
            write_pos: 0,
            coefficient: 0.5,
        }
    }
}

impl AllpassDiffuser {
    /// Create an unprepared diffuser
    pub fn new(delay_samples: usize, coefficient: f32) -> Self {
        let mut diffuser = Self::default();
        diffuser.set_delay_samples(delay_samples);
        diffuser.set_coefficient(coefficient);
        diffuser
    }

    /// Set delay length (minimum 1 sample). Takes effect on the next `prepare()`.
    pub fn set_delay_samples(&mut self, samples: usize) {
        self.delay_samples = samples.max(1);
    }

    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }

    /// Set coefficient (-0.74 - 0.74)
    #[inline]
    pub fn set_coefficient(&mut self, coefficient: f32) {
        self.coefficient = coefficient.clamp(-MAX_DIFFUSER_COEFFICIENT, MAX_DIFFUSER_COEFFICIENT);
    }

    pub fn coefficient(&self) -> f32 {
        self.coefficient
    }

    /// Allocate and zero the delay buffer
    pub fn prepare(&mut self) {
        self.buffer = vec![0.0; self.delay_samples + 1];
        self.write_pos = 0;
    }

    pub fn is_prepared(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Clear state without reallocating
    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Process one sample
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let len = self.buffer.len();
        if len == 0 {
            return input;
        }

        let read_pos = if self.write_pos >= self.delay_samples {
            self.write_pos - self.delay_samples
        } else {
            self.write_pos + len - self.delay_samples
        };

        let delayed = self.buffer[read_pos];
        let output = delayed - self.coefficient * input;
        self.buffer[self.write_pos] = input + self.coefficient * output;

        self.write_pos += 1;
        if self.write_pos >= len {
            self.write_pos = 0;
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn energy(samples: &[f32]) -> f64 {
        samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum()
    }

    #[test]
    fn test_parameter_clamping() {
        let mut diffuser = AllpassDiffuser::new(0, 2.0);
        assert_eq!(diffuser.delay_samples(), 1);
        assert_eq!(diffuser.coefficient(), 0.74);

        diffuser.set_coefficient(-5.0);
        assert_eq!(diffuser.coefficient(), -0.74);
    }

    #[test]
    fn test_unprepared_passes_through() {
        let mut diffuser = AllpassDiffuser::new(10, 0.5);
        assert!(!diffuser.is_prepared());
        assert_eq!(diffuser.process_sample(0.3), 0.3);
    }

    #[test]
    fn test_impulse_response_shape() {
        let mut diffuser = AllpassDiffuser::new(4, 0.5);
        diffuser.prepare();

        let mut response = Vec::new();
        response.push(diffuser.process_sample(1.0));
        for _ in 0..8 {
            response.push(diffuser.process_sample(0.0));
        }

        // y[0] = -c, y[D] = 1 - c^2, y[2D] = c(1 - c^2)
        assert!((response[0] + 0.5).abs() < 1e-6);
        assert!(response[1..4].iter().all(|&s| s == 0.0));
        assert!((response[4] - 0.75).abs() < 1e-6);
        assert!((response[8] - 0.375).abs() < 1e-6);
    }

    #[test]
    fn test_energy_preserved_across_coefficients() {
        let mut rng = StdRng::seed_from_u64(7);
        let input: Vec<f32> = (0..48000).map(|_| rng.gen_range(-1.0..1.0)).collect();

        for coefficient in [-0.74, -0.5, -0.1, 0.0, 0.3, 0.6, 0.74] {
            let mut diffuser = AllpassDiffuser::new(157, coefficient);
            diffuser.prepare();

            // Run the signal, then flush until the recursion has died away
            let mut output: Vec<f32> = input.iter().map(|&x| diffuser.process_sample(x)).collect();
            output.extend((0..157 * 200).map(|_| diffuser.process_sample(0.0)));

            let ratio = energy(&output) / energy(&input);
            assert!(
                (ratio - 1.0).abs() < 1e-3,
                "coefficient {coefficient}: energy ratio {ratio}"
            );
        }
    }

    #[test]
    fn test_reset_clears_state() {
        let mut diffuser = AllpassDiffuser::new(3, 0.6);
        diffuser.prepare();
        for _ in 0..10 {
            diffuser.process_sample(1.0);
        }
        diffuser.reset();
        let out: Vec<f32> = (0..6).map(|_| diffuser.process_sample(0.0)).collect();
        assert!(out.iter().all(|&s| s == 0.0));
    }
}
