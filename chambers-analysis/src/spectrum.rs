//! FFT-based spectral centroid for judging tail brightness

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::AnalysisError;

/// Averages Hann-windowed magnitude spectra over a signal and reports
/// their centroid in Hz
pub struct CentroidAnalyzer {
    sample_rate: u32,
    fft_size: usize,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    /// Pre-allocated FFT buffer
    fft_buffer: Vec<Complex<f32>>,
}

impl CentroidAnalyzer {
    pub fn new(sample_rate: u32, fft_size: usize) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidSampleRate(sample_rate));
        }
        let fft_size = fft_size.max(2);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        let window: Vec<f32> = (0..fft_size)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / fft_size as f32).cos()))
            .collect();

        Ok(Self {
            sample_rate,
            fft_size,
            fft,
            window,
            fft_buffer: vec![Complex::new(0.0, 0.0); fft_size],
        })
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Spectral centroid of a mono signal, frames hopped by half the FFT size
    pub fn centroid(&mut self, samples: &[f32]) -> Result<f32, AnalysisError> {
        if samples.len() < self.fft_size {
            return Err(AnalysisError::SignalTooShort {
                needed: self.fft_size,
                available: samples.len(),
            });
        }

        let bins = self.fft_size / 2;
        let mut magnitudes = vec![0.0f64; bins];
        let hop = (self.fft_size / 2).max(1);

        let mut start = 0;
        while start + self.fft_size <= samples.len() {
            let frame = &samples[start..start + self.fft_size];
            for ((buf, &s), &w) in self.fft_buffer.iter_mut().zip(frame).zip(&self.window) {
                *buf = Complex::new(s * w, 0.0);
            }
            self.fft.process(&mut self.fft_buffer);
            for (mag, c) in magnitudes.iter_mut().zip(&self.fft_buffer[..bins]) {
                *mag += f64::from(c.norm());
            }
            start += hop;
        }

        let bin_width = f64::from(self.sample_rate) / self.fft_size as f64;
        let total: f64 = magnitudes.iter().sum();
        if total <= f64::EPSILON {
            return Err(AnalysisError::Silent);
        }
        let weighted: f64 = magnitudes
            .iter()
            .enumerate()
            .map(|(bin, &m)| bin as f64 * bin_width * m)
            .sum();
        Ok((weighted / total) as f32)
    }
}
