//! Chambers - 8-line feedback delay network reverb
//!
//! Signal flow per sample:
//! - input diffusion (2 allpasses) -> mid/side injection with per-line signs
//! - 8 delay lines read with drift-modulated fractional delay
//! - feedback matrix (Hadamard <-> Householder, morphed by Warp) on the raw reads
//! - per-line damping low-pass and gravity high-pass containment, then write-back
//! - late diffusion (8 allpasses) on the reads, constant-power stereo output
//!
//! Freeze pins feedback to unity, locks the matrix to a snapshot taken
//! when freeze engages and stops injection, damping, diffusion and drift.

mod bloom;
mod freeze;
mod line;
mod matrix;

pub use freeze::FreezePhase;
pub use matrix::Matrix8x8;

use std::f32::consts::TAU;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::allpass::MAX_DIFFUSER_COEFFICIENT;
use super::{AllpassDiffuser, Effect};
use crate::{
    AudioBlock, ChambersParams, ChambersTuning, DspError, ParamId, ParamSnapshot, ParameterSmoother,
};
use bloom::{BloomEnvelope, BloomShape};
use freeze::{FreezeEdge, FreezeState};
use line::DelayLine;

/// Number of delay lines in the network
pub const NUM_LINES: usize = 8;

/// Line lengths at 48 kHz. Primes share no factor with 48000 = 2^7 * 3 * 5^3
/// and span ~50 ms to ~1.23 s.
const DELAY_SAMPLES_48K: [f32; NUM_LINES] = [
    2411.0, 4201.0, 7001.0, 11003.0, 17011.0, 26003.0, 39019.0, 59009.0,
];

/// Input diffusion delays at 48 kHz (3 - 5 ms, incommensurate)
const INPUT_DIFFUSER_SAMPLES_48K: [f32; 2] = [149.0, 223.0];

/// Late diffusion delays at 48 kHz (under 10 ms, one per line)
const LATE_DIFFUSER_SAMPLES_48K: [f32; NUM_LINES] =
    [157.0, 173.0, 197.0, 223.0, 251.0, 281.0, 313.0, 347.0];

/// Per-line damping offsets so the lines lose highs at slightly different rates
const DAMPING_OFFSETS: [f32; NUM_LINES] = [
    -0.035, -0.025, -0.015, -0.005, 0.005, 0.015, 0.025, 0.035,
];

const LATE_DIFFUSER_COEFF_OFFSETS: [f32; NUM_LINES] = [
    -0.06, -0.045, -0.03, -0.015, 0.015, 0.03, 0.045, 0.06,
];

/// Injection signs for the mid and side components
const INPUT_MID: [f32; NUM_LINES] = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
const INPUT_SIDE: [f32; NUM_LINES] = [1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0];

/// Constant-power pan weights for positions {-0.9, 0.9, -0.7, 0.7, -0.5, 0.5, -0.3, 0.3}.
/// No sign flips, so the mono sum keeps every line.
const OUTPUT_LEFT: [f32; NUM_LINES] = [
    0.996_917_3, 0.078_459_1, 0.972_369_9, 0.233_445_4,
    0.923_879_5, 0.382_683_4, 0.852_640_2, 0.522_498_6,
];
const OUTPUT_RIGHT: [f32; NUM_LINES] = [
    0.078_459_1, 0.996_917_3, 0.233_445_4, 0.972_369_9,
    0.382_683_4, 0.923_879_5, 0.522_498_6, 0.852_640_2,
];

/// sum(L^2) == sum(R^2) == 4.0, so 0.5 brings the mix back to unity
const OUTPUT_GAIN: f32 = 0.5;

const INV_SQRT_8: f32 = 0.353_553_4;

/// Drift never moves a tap further than this from nominal
const MAX_DRIFT_SAMPLES: f32 = 1.0;

const MAX_DAMPING: f32 = 0.98;
const MAX_EARLY_MIX: f32 = 0.7;
const MIN_LATE_COEFF: f32 = 0.05;

/// Seed used by [`Chambers::new`] for the drift oscillators
pub const DEFAULT_DRIFT_SEED: u64 = 0x4348_414d;

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// One-pole low-pass pole for a cutoff frequency
fn one_pole_coeff(cutoff_hz: f32, sample_rate: f64) -> f32 {
    (-std::f64::consts::TAU * f64::from(cutoff_hz) / sample_rate).exp() as f32
}

#[inline]
fn finite_or_zero(x: f32) -> f32 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// Per-parameter smoothers, advanced once per sample
#[derive(Debug, Clone, Default)]
struct Smoothers {
    time: ParameterSmoother,
    mass: ParameterSmoother,
    density: ParameterSmoother,
    bloom: ParameterSmoother,
    gravity: ParameterSmoother,
    warp: ParameterSmoother,
    drift: ParameterSmoother,
}

/// Smoothed parameter values for one sample
#[derive(Debug, Clone, Copy)]
struct Frame {
    time: f32,
    mass: f32,
    density: f32,
    bloom: f32,
    gravity: f32,
    warp: f32,
    drift: f32,
}

impl Smoothers {
    fn all_mut(&mut self) -> [(ParamId, &mut ParameterSmoother); ParamId::COUNT] {
        [
            (ParamId::Time, &mut self.time),
            (ParamId::Mass, &mut self.mass),
            (ParamId::Density, &mut self.density),
            (ParamId::Bloom, &mut self.bloom),
            (ParamId::Gravity, &mut self.gravity),
            (ParamId::Warp, &mut self.warp),
            (ParamId::Drift, &mut self.drift),
        ]
    }

    #[inline]
    fn next(&mut self) -> Frame {
        Frame {
            time: self.time.next_value().clamp(0.0, 1.0),
            mass: self.mass.next_value().clamp(0.0, 1.0),
            density: self.density.next_value().clamp(0.0, 1.0),
            bloom: self.bloom.next_value().clamp(0.0, 1.0),
            gravity: self.gravity.next_value().clamp(0.0, 1.0),
            warp: self.warp.next_value().clamp(0.0, 1.0),
            drift: self.drift.next_value().clamp(0.0, 1.0),
        }
    }
}

/// The Chambers feedback delay network
pub struct Chambers {
    params: Arc<ChambersParams>,
    tuning: ChambersTuning,
    drift_seed: u64,

    sample_rate: f64,
    channels: usize,
    /// Shared length of every delay buffer; 0 until prepared
    buffer_len: usize,

    lines: [DelayLine; NUM_LINES],
    input_diffusers: [AllpassDiffuser; 2],
    late_diffusers: [AllpassDiffuser; NUM_LINES],

    smoothers: Smoothers,
    smoothers_primed: bool,

    live_matrix: Matrix8x8,
    /// Warp value `live_matrix` was built from
    live_warp: f32,
    frozen_matrix: Matrix8x8,
    /// Matrix used for the most recent sample
    active_matrix: Matrix8x8,

    freeze: FreezeState,
    envelope: BloomEnvelope,
    bloom_shape: BloomShape,
    gravity_pole_min: f32,
    gravity_pole_max: f32,

    /// External "memory" injection, interleaved stereo, valid for one block
    injection: Vec<f32>,
    injection_frames: usize,
}

impl Default for Chambers {
    fn default() -> Self {
        Self::new()
    }
}

impl Chambers {
    /// Create an unprepared network with default tuning
    pub fn new() -> Self {
        Self::with_tuning(ChambersTuning::default(), DEFAULT_DRIFT_SEED)
    }

    /// Default tuning with a specific drift seed
    pub fn with_seed(drift_seed: u64) -> Self {
        Self::with_tuning(ChambersTuning::default(), drift_seed)
    }

    /// Create an unprepared network with explicit tuning and drift seed
    ///
    /// The seed fixes each line's drift phase and rate, so two instances
    /// with the same seed modulate identically.
    pub fn with_tuning(tuning: ChambersTuning, drift_seed: u64) -> Self {
        let bloom_shape = BloomShape {
            threshold: tuning.envelope_threshold,
            min_secs: tuning.envelope_min_secs,
            max_secs: tuning.envelope_max_secs,
            peak_gain: tuning.bloom_peak_gain,
        };

        Self {
            params: Arc::new(ChambersParams::new()),
            tuning,
            drift_seed,
            sample_rate: 0.0,
            channels: 0,
            buffer_len: 0,
            lines: Default::default(),
            input_diffusers: Default::default(),
            late_diffusers: Default::default(),
            smoothers: Smoothers::default(),
            smoothers_primed: false,
            live_matrix: Matrix8x8::hadamard(),
            live_warp: 0.0,
            frozen_matrix: Matrix8x8::hadamard(),
            active_matrix: Matrix8x8::hadamard(),
            freeze: FreezeState::default(),
            envelope: BloomEnvelope::default(),
            bloom_shape,
            gravity_pole_min: 0.0,
            gravity_pole_max: 0.0,
            injection: Vec::new(),
            injection_frames: 0,
        }
    }

    /// Handle for the control thread
    pub fn params(&self) -> Arc<ChambersParams> {
        Arc::clone(&self.params)
    }

    /// Set decay time (0.0 - 1.0)
    pub fn set_time(&self, time: f32) {
        self.params.set(ParamId::Time, time);
    }

    /// Set high-frequency damping (0.0 - 1.0)
    pub fn set_mass(&self, mass: f32) {
        self.params.set(ParamId::Mass, mass);
    }

    /// Set diffusion and injection density (0.0 - 1.0)
    pub fn set_density(&self, density: f32) {
        self.params.set(ParamId::Density, density);
    }

    /// Set envelope swell (0.0 - 1.0)
    pub fn set_bloom(&self, bloom: f32) {
        self.params.set(ParamId::Bloom, bloom);
    }

    /// Set low-end containment (0.0 - 1.0)
    pub fn set_gravity(&self, gravity: f32) {
        self.params.set(ParamId::Gravity, gravity);
    }

    /// Set matrix morph, Hadamard at 0.0, Householder at 1.0
    pub fn set_warp(&self, warp: f32) {
        self.params.set(ParamId::Warp, warp);
    }

    /// Set delay modulation depth (0.0 - 1.0)
    pub fn set_drift(&self, drift: f32) {
        self.params.set(ParamId::Drift, drift);
    }

    pub fn set_freeze(&self, frozen: bool) {
        self.params.set_freeze(frozen);
    }

    /// Attach a memory signal for the next `process()` call only
    ///
    /// `samples` is interleaved stereo. Frames beyond the prepared block
    /// size are dropped and non-finite samples are replaced with silence.
    /// `None` detaches any pending injection.
    pub fn set_external_injection(&mut self, samples: Option<&[f32]>) {
        let Some(samples) = samples else {
            self.injection_frames = 0;
            return;
        };

        let frames = (samples.len() / 2).min(self.injection.len() / 2);
        for (dst, &src) in self.injection.iter_mut().zip(&samples[..frames * 2]) {
            *dst = finite_or_zero(src);
        }
        self.injection_frames = frames;
    }

    pub fn has_pending_injection(&self) -> bool {
        self.injection_frames > 0
    }

    pub fn is_prepared(&self) -> bool {
        self.buffer_len > 0
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer_len
    }

    pub fn freeze_phase(&self) -> FreezePhase {
        self.freeze.phase()
    }

    /// 1.0 fully live, 0.0 fully frozen
    pub fn freeze_blend(&self) -> f32 {
        self.freeze.blend()
    }

    /// Matrix used for the most recent sample
    pub fn active_matrix(&self) -> &Matrix8x8 {
        &self.active_matrix
    }

    /// Snapshot taken when freeze last engaged
    pub fn frozen_matrix(&self) -> &Matrix8x8 {
        &self.frozen_matrix
    }

    /// Matrix for the current smoothed warp
    pub fn live_matrix(&self) -> &Matrix8x8 {
        &self.live_matrix
    }

    /// Nominal delay of a line in samples
    pub fn nominal_delay(&self, line: usize) -> f32 {
        self.lines[line].delay_samples()
    }

    /// Delay used for the most recent read of a line, drift included
    pub fn effective_delay(&self, line: usize) -> f32 {
        self.lines[line].effective_delay()
    }

    /// Drift oscillator (phase in radians, rate in Hz) of a line
    pub fn drift_oscillator(&self, line: usize) -> (f32, f32) {
        let l = &self.lines[line];
        let rate_hz = l.drift_increment() * self.sample_rate as f32 / TAU;
        (l.drift_phase(), rate_hz)
    }

    /// Write cursor of a line
    pub fn write_position(&self, line: usize) -> usize {
        self.lines[line].write_pos()
    }

    fn samples_for_ms(&self, ms: f32) -> usize {
        (self.sample_rate * f64::from(ms) / 1000.0).round().max(1.0) as usize
    }

    fn prime_smoothers(&mut self) {
        let snapshot = self.params.snapshot();
        for (id, smoother) in self.smoothers.all_mut() {
            smoother.reset(snapshot_value(&snapshot, id));
        }
        self.live_warp = snapshot.warp;
        self.live_matrix = Matrix8x8::warp(snapshot.warp);
        self.active_matrix = self.live_matrix;
        self.smoothers_primed = true;
    }

    /// Pick up new targets and freeze edges (start of block)
    fn begin_block(&mut self) {
        if !self.smoothers_primed {
            self.prime_smoothers();
        }

        let snapshot = self.params.snapshot();
        for (id, smoother) in self.smoothers.all_mut() {
            smoother.set_target(snapshot_value(&snapshot, id));
        }

        match self.freeze.update(snapshot.freeze) {
            FreezeEdge::Engaged => {
                self.frozen_matrix = self.live_matrix;
            }
            FreezeEdge::Released => self.envelope.restart(),
            FreezeEdge::None => {}
        }
    }

    /// Choose the feedback matrix for this sample
    #[inline]
    fn update_matrix(&mut self, warp: f32) {
        if self.freeze.is_frozen() {
            self.active_matrix = self.frozen_matrix;
            return;
        }

        if (warp - self.live_warp).abs() > self.tuning.warp_epsilon {
            self.live_warp = warp;
            self.live_matrix = Matrix8x8::warp(warp);
        }

        if self.freeze.is_ramping() && self.frozen_matrix != self.live_matrix {
            // Release: fade from the snapshot back to the live topology
            self.active_matrix =
                Matrix8x8::blend(&self.frozen_matrix, &self.live_matrix, self.freeze.blend())
                    .orthonormalize();
            return;
        }

        self.active_matrix = self.live_matrix;
    }

    /// Process one frame; `right == None` for mono
    #[inline]
    fn process_frame(&mut self, left: f32, right: Option<f32>, frame: usize) -> (f32, f32) {
        // 1. Freeze ramp
        self.freeze.advance();
        let blend = self.freeze.blend();
        let frozen = self.freeze.is_frozen();
        let hold_drift = frozen || self.freeze.is_ramping();

        // 2-3. Smoothed parameters and matrix
        let p = self.smoothers.next();
        self.update_matrix(p.warp);
        let t = &self.tuning;

        // 4. Derived coefficients
        let feedback_base = lerp(t.feedback_min, t.feedback_max, p.time).min(t.feedback_ceiling);
        // Exactly 1.0 while frozen
        let feedback = 1.0 + blend * (feedback_base - 1.0);

        let damping_base = lerp(t.damping_min, t.damping_max, p.mass);
        let mut damping = [1.0; NUM_LINES];
        for (coeff, offset) in damping.iter_mut().zip(DAMPING_OFFSETS) {
            let target = 1.0 - (damping_base + offset).clamp(0.0, MAX_DAMPING);
            *coeff = 1.0 + blend * (target - 1.0);
        }

        let input_gain = lerp(0.18, 0.32, p.density) * INV_SQRT_8 * blend;
        let early_mix = (lerp(0.45, 0.25, p.density) * blend).clamp(0.0, MAX_EARLY_MIX);

        let input_coeff = lerp(0.12, 0.6, p.density);
        for diffuser in &mut self.input_diffusers {
            diffuser.set_coefficient(input_coeff);
        }
        let late_base = lerp(0.18, 0.7, p.density);
        for (diffuser, offset) in self.late_diffusers.iter_mut().zip(LATE_DIFFUSER_COEFF_OFFSETS) {
            diffuser.set_coefficient((late_base * (1.0 + offset)).clamp(MIN_LATE_COEFF, MAX_DIFFUSER_COEFFICIENT));
        }

        let gravity_pole = lerp(self.gravity_pole_min, self.gravity_pole_max, p.gravity);
        let drift_depth = (p.drift * t.drift_depth_samples).min(MAX_DRIFT_SAMPLES) * blend;

        // Inputs
        let in_l = finite_or_zero(left);
        let in_r = right.map_or(in_l, finite_or_zero);
        let magnitude = in_l.abs().max(in_r.abs());

        let (mem_mid, mem_side) = if frame < self.injection_frames {
            let ml = self.injection[frame * 2];
            let mr = self.injection[frame * 2 + 1];
            (0.5 * (ml + mr), 0.5 * (ml - mr))
        } else {
            (0.0, 0.0)
        };

        let (diff_l, diff_r) = if blend > 0.0 {
            let processed_l = self.input_diffusers[0].process_sample(in_l);
            let processed_r = self.input_diffusers[1].process_sample(in_r);
            (
                in_l + blend * (processed_l - in_l),
                in_r + blend * (processed_r - in_r),
            )
        } else {
            (in_l, in_r)
        };
        let mid = 0.5 * (diff_l + diff_r) + mem_mid;
        let side = 0.5 * (diff_l - diff_r) + mem_side;

        // 5. Line reads
        let mut raw = [0.0; NUM_LINES];
        for (out, line) in raw.iter_mut().zip(self.lines.iter_mut()) {
            *out = line.read(drift_depth);
            if !hold_drift {
                line.advance_drift();
            }
        }

        // 6. Late diffusion (output path only)
        let mut diffused = raw;
        if blend > 0.0 {
            for (out, diffuser) in diffused.iter_mut().zip(self.late_diffusers.iter_mut()) {
                *out = diffuser.process_sample(*out);
            }
        }

        // 7. Feedback mix on the undiffused reads
        let mixed = self.active_matrix.apply(&raw);

        // 8. Bloom envelope
        if !frozen {
            self.envelope.step(magnitude, p.time, p.bloom, &self.bloom_shape);
        }
        let envelope = 1.0 + blend * (self.envelope.value() - 1.0);

        // 9. Output
        let mut live_l = 0.0;
        let mut live_r = 0.0;
        let mut held_l = 0.0;
        let mut held_r = 0.0;
        for i in 0..NUM_LINES {
            live_l += diffused[i] * OUTPUT_LEFT[i];
            live_r += diffused[i] * OUTPUT_RIGHT[i];
            held_l += raw[i] * OUTPUT_LEFT[i];
            held_r += raw[i] * OUTPUT_RIGHT[i];
        }
        let scale = OUTPUT_GAIN * envelope;
        let wet_l = ((held_l + blend * (live_l - held_l)) * scale).clamp(-t.wet_ceiling, t.wet_ceiling);
        let wet_r = ((held_r + blend * (live_r - held_r)) * scale).clamp(-t.wet_ceiling, t.wet_ceiling);

        // 10. Injection and write-back
        let freeze_ceiling = t.freeze_ceiling;
        for (i, line) in self.lines.iter_mut().enumerate() {
            let injection = (mid * INPUT_MID[i] + side * INPUT_SIDE[i]) * input_gain;
            let damped = line.damp(injection + mixed[i] * feedback, damping[i]);
            let contained = line.contain(damped, gravity_pole);
            let mut value = damped + blend * (contained - damped);
            if frozen {
                value = value.clamp(-freeze_ceiling, freeze_ceiling);
            }
            line.write(value);
        }

        // 11. Early reflections + wet
        let wet_blend = 1.0 - early_mix;
        match right {
            Some(_) => (
                in_l * early_mix + wet_l * wet_blend,
                in_r * early_mix + wet_r * wet_blend,
            ),
            None => {
                let mono = 0.5 * (in_l + in_r) * early_mix + (wet_l + wet_r) * 0.5 * wet_blend;
                (mono, mono)
            }
        }
    }
}

fn snapshot_value(snapshot: &ParamSnapshot, id: ParamId) -> f32 {
    match id {
        ParamId::Time => snapshot.time,
        ParamId::Mass => snapshot.mass,
        ParamId::Density => snapshot.density,
        ParamId::Bloom => snapshot.bloom,
        ParamId::Gravity => snapshot.gravity,
        ParamId::Warp => snapshot.warp,
        ParamId::Drift => snapshot.drift,
    }
}

impl Effect for Chambers {
    fn prepare(
        &mut self,
        sample_rate: f64,
        max_block_size: usize,
        channels: usize,
    ) -> Result<(), DspError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(DspError::InvalidSampleRate(sample_rate));
        }
        if max_block_size == 0 {
            return Err(DspError::ZeroBlockSize);
        }
        if !(1..=2).contains(&channels) {
            return Err(DspError::UnsupportedChannels(channels));
        }

        self.sample_rate = sample_rate;
        self.channels = channels;

        let scale = (sample_rate / 48000.0) as f32;
        // Whole-sample delays keep the frozen loop off the interpolating read
        let delays = DELAY_SAMPLES_48K.map(|d| (d * scale).round().max(1.0));
        let max_delay = delays.iter().cloned().fold(1.0f32, f32::max);
        self.buffer_len = max_delay.ceil() as usize + 2;

        let t = self.tuning;
        let mut rng = StdRng::seed_from_u64(self.drift_seed);
        for (line, &delay) in self.lines.iter_mut().zip(delays.iter()) {
            let phase = rng.gen_range(0.0..TAU);
            let rate_hz = rng.gen_range(t.drift_rate_min_hz..=t.drift_rate_max_hz);
            let increment = TAU * rate_hz / sample_rate as f32;
            line.prepare(self.buffer_len, delay, phase, increment);
        }

        let scaled = |samples: f32| ((samples * scale).round() as usize).max(1);
        for (diffuser, &samples) in self.input_diffusers.iter_mut().zip(INPUT_DIFFUSER_SAMPLES_48K.iter()) {
            diffuser.set_delay_samples(scaled(samples));
            diffuser.prepare();
        }
        for (diffuser, &samples) in self.late_diffusers.iter_mut().zip(LATE_DIFFUSER_SAMPLES_48K.iter()) {
            diffuser.set_delay_samples(scaled(samples));
            diffuser.prepare();
        }

        self.gravity_pole_min = one_pole_coeff(t.gravity_min_hz, sample_rate);
        self.gravity_pole_max = one_pole_coeff(t.gravity_max_hz, sample_rate);

        let s = t.smoothing;
        let times = [
            s.time_ms,
            s.mass_ms,
            s.density_ms,
            s.bloom_ms,
            s.gravity_ms,
            s.warp_ms,
            s.drift_ms,
        ];
        for ((_, smoother), time_ms) in self.smoothers.all_mut().into_iter().zip(times) {
            smoother.prepare(sample_rate);
            smoother.set_smoothing_time_ms(time_ms);
        }
        self.smoothers_primed = false;

        let engage = self.samples_for_ms(t.freeze_engage_ms);
        let release = self.samples_for_ms(t.freeze_release_ms);
        self.freeze.prepare(engage, release);
        self.envelope.prepare(sample_rate);

        self.injection = vec![0.0; max_block_size * 2];
        self.injection_frames = 0;

        debug!(
            sample_rate,
            max_block_size,
            channels,
            buffer_len = self.buffer_len,
            freeze_engage_samples = engage,
            freeze_release_samples = release,
            "Chambers prepared"
        );

        Ok(())
    }

    fn reset(&mut self) {
        for line in &mut self.lines {
            line.reset();
        }
        for diffuser in self.input_diffusers.iter_mut().chain(self.late_diffusers.iter_mut()) {
            diffuser.reset();
        }
        self.smoothers_primed = false;
        self.freeze.settle();
        self.envelope.restart();
        self.injection_frames = 0;
    }

    fn process(&mut self, block: AudioBlock<'_>) {
        if self.buffer_len == 0 {
            self.injection_frames = 0;
            return;
        }

        self.begin_block();

        match block {
            AudioBlock::Interleaved(samples) if self.channels == 2 => {
                for (frame, pair) in samples.chunks_exact_mut(2).enumerate() {
                    let (l, r) = self.process_frame(pair[0], Some(pair[1]), frame);
                    pair[0] = l;
                    pair[1] = r;
                }
            }
            AudioBlock::Interleaved(samples) => {
                for (frame, sample) in samples.iter_mut().enumerate() {
                    *sample = self.process_frame(*sample, None, frame).0;
                }
            }
            AudioBlock::Planar {
                left,
                right: Some(right),
            } => {
                for (frame, (l, r)) in left.iter_mut().zip(right.iter_mut()).enumerate() {
                    let (out_l, out_r) = self.process_frame(*l, Some(*r), frame);
                    *l = out_l;
                    *r = out_r;
                }
            }
            AudioBlock::Planar { left, right: None } => {
                for (frame, sample) in left.iter_mut().enumerate() {
                    *sample = self.process_frame(*sample, None, frame).0;
                }
            }
        }

        // Injection is only ever consumed by one block
        self.injection_frames = 0;
    }

    fn name(&self) -> &'static str {
        "Chambers"
    }
}
