//! Bloom envelope: how the tail swells after a transient before decaying

/// Envelope ceiling (Bloom = 1 plateau with full peak gain)
const MAX_ENVELOPE: f32 = 1.5;

#[derive(Debug, Clone)]
pub(crate) struct BloomEnvelope {
    elapsed_secs: f32,
    value: f32,
    armed: bool,
    sample_period: f32,
}

impl Default for BloomEnvelope {
    fn default() -> Self {
        Self {
            elapsed_secs: 0.0,
            value: 1.0,
            armed: true,
            sample_period: 1.0 / 48000.0,
        }
    }
}

/// Shape parameters taken from the tuning
#[derive(Debug, Clone, Copy)]
pub(crate) struct BloomShape {
    pub threshold: f32,
    pub min_secs: f32,
    pub max_secs: f32,
    pub peak_gain: f32,
}

impl BloomEnvelope {
    pub(crate) fn prepare(&mut self, sample_rate: f64) {
        self.sample_period = (1.0 / sample_rate) as f32;
        self.restart();
    }

    /// Back to the start of a fresh envelope, ready to trigger
    pub(crate) fn restart(&mut self) {
        self.elapsed_secs = 0.0;
        self.value = 1.0;
        self.armed = true;
    }

    #[inline]
    pub(crate) fn value(&self) -> f32 {
        self.value
    }

    #[cfg(test)]
    pub(crate) fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs
    }

    /// Track transients and update the envelope for one sample
    ///
    /// `time` picks the decay length, `bloom` blends a plain exponential
    /// with a plateau-then-decay curve.
    #[inline]
    pub(crate) fn step(&mut self, input_magnitude: f32, time: f32, bloom: f32, shape: &BloomShape) -> f32 {
        if input_magnitude > shape.threshold {
            if self.armed {
                self.elapsed_secs = 0.0;
                self.armed = false;
            }
        } else {
            self.armed = true;
        }
        self.elapsed_secs += self.sample_period;

        let t = self.elapsed_secs;
        let decay_secs = shape.min_secs + (shape.max_secs - shape.min_secs) * time;
        let exp_env = (-t / decay_secs).exp();

        let plateau_secs = decay_secs * (0.25 + 0.35 * bloom);
        let plateau_env = if t < plateau_secs {
            1.0
        } else {
            (-(t - plateau_secs) / decay_secs).exp()
        };
        let bloom_gain = 1.0 + shape.peak_gain * bloom * bloom;

        let target = exp_env + bloom * (plateau_env * bloom_gain - exp_env);
        self.value = target.clamp(0.0, MAX_ENVELOPE);
        self.value
    }
}
