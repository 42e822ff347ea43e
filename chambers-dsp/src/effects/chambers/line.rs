//! One delay line of the network with its in-loop filters and drift LFO

use std::f32::consts::TAU;

/// Recirculating values below this are written as zero
const DENORMAL_FLOOR: f32 = 1.0e-25;

/// Circular delay buffer plus per-line filter and modulation state
#[derive(Debug, Clone, Default)]
pub(crate) struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
    /// Nominal delay in samples
    delay_samples: f32,
    /// Delay used for the most recent read (nominal + drift)
    effective_delay: f32,
    drift_phase: f32,
    /// Phase increment per sample (radians)
    drift_increment: f32,
    damping_state: f32,
    gravity_state: f32,
}

impl DelayLine {
    /// Allocate `buffer_len` zeroed samples and set the nominal delay
    pub(crate) fn prepare(
        &mut self,
        buffer_len: usize,
        delay_samples: f32,
        drift_phase: f32,
        drift_increment: f32,
    ) {
        self.buffer = vec![0.0; buffer_len];
        self.delay_samples = delay_samples;
        self.effective_delay = delay_samples;
        self.drift_phase = drift_phase;
        self.drift_increment = drift_increment;
        self.write_pos = 0;
        self.damping_state = 0.0;
        self.gravity_state = 0.0;
    }

    pub(crate) fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
        self.effective_delay = self.delay_samples;
        self.damping_state = 0.0;
        self.gravity_state = 0.0;
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.buffer.len()
    }

    pub(crate) fn delay_samples(&self) -> f32 {
        self.delay_samples
    }

    pub(crate) fn effective_delay(&self) -> f32 {
        self.effective_delay
    }

    pub(crate) fn write_pos(&self) -> usize {
        self.write_pos
    }

    pub(crate) fn drift_phase(&self) -> f32 {
        self.drift_phase
    }

    pub(crate) fn drift_increment(&self) -> f32 {
        self.drift_increment
    }

    /// Read `delay + depth * sin(phase)` samples behind the write cursor
    ///
    /// `depth` is in samples and must already be capped; the result is
    /// linearly interpolated between the two neighbouring taps.
    #[inline]
    pub(crate) fn read(&mut self, depth: f32) -> f32 {
        let len = self.len();
        let offset = if depth != 0.0 {
            depth * self.drift_phase.sin()
        } else {
            0.0
        };
        let delay = (self.delay_samples + offset).clamp(1.0, (len - 2) as f32);
        self.effective_delay = delay;

        let delay_int = delay as usize;
        let frac = delay - delay_int as f32;

        let pos_a = if self.write_pos >= delay_int {
            self.write_pos - delay_int
        } else {
            self.write_pos + len - delay_int
        };
        let pos_b = if pos_a == 0 { len - 1 } else { pos_a - 1 };

        let a = self.buffer[pos_a];
        if frac == 0.0 {
            return a;
        }
        a * (1.0 - frac) + self.buffer[pos_b] * frac
    }

    #[inline]
    pub(crate) fn advance_drift(&mut self) {
        self.drift_phase += self.drift_increment;
        if self.drift_phase >= TAU {
            self.drift_phase -= TAU;
        }
    }

    /// One-pole low-pass; `coefficient == 1.0` passes the input unchanged
    #[inline]
    pub(crate) fn damp(&mut self, input: f32, coefficient: f32) -> f32 {
        if coefficient >= 1.0 {
            self.damping_state = input;
            return input;
        }
        self.damping_state += coefficient * (input - self.damping_state);
        self.damping_state
    }

    /// Low-frequency residue removed by the gravity stage
    ///
    /// Returns the high-passed signal; `pole` is the one-pole low-pass
    /// coefficient of the cutoff.
    #[inline]
    pub(crate) fn contain(&mut self, input: f32, pole: f32) -> f32 {
        self.gravity_state += (1.0 - pole) * (input - self.gravity_state);
        input - self.gravity_state
    }

    /// Write at the cursor and advance it
    #[inline]
    pub(crate) fn write(&mut self, value: f32) {
        self.buffer[self.write_pos] = if value.abs() < DENORMAL_FLOOR {
            0.0
        } else {
            value
        };
        self.write_pos += 1;
        if self.write_pos >= self.buffer.len() {
            self.write_pos = 0;
        }
    }

    /// Energy of the samples still ahead of the read tap (integer delay only)
    #[cfg(test)]
    pub(crate) fn window_energy(&self) -> f64 {
        let len = self.len();
        let delay = self.delay_samples as usize;
        (1..=delay)
            .map(|back| {
                let s = f64::from(self.buffer[(self.write_pos + len - back) % len]);
                s * s
            })
            .sum()
    }
}
