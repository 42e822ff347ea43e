//! Summary of a rendered stereo tail

use std::fmt;

use tracing::debug;

use crate::{
    correlation, dc_offset, peak, rms, schroeder_rt60, split_interleaved, to_db, AnalysisError,
    CentroidAnalyzer,
};

const CENTROID_FFT_SIZE: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailReport {
    pub duration_secs: f32,
    pub peak_db: f32,
    pub rms_db: f32,
    /// `None` when the render never decays far enough to fit
    pub rt60_secs: Option<f32>,
    pub correlation: f32,
    pub dc_left: f32,
    pub dc_right: f32,
    pub centroid_hz: Option<f32>,
}

impl TailReport {
    /// Measure an interleaved stereo render
    pub fn measure(interleaved: &[f32], sample_rate: u32) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidSampleRate(sample_rate));
        }
        let (left, right) = split_interleaved(interleaved);
        if left.is_empty() {
            return Err(AnalysisError::SignalTooShort {
                needed: 2,
                available: interleaved.len(),
            });
        }
        let mono: Vec<f32> = left
            .iter()
            .zip(right.iter())
            .map(|(l, r)| 0.5 * (l + r))
            .collect();

        let rt60_secs = match schroeder_rt60(&mono, sample_rate) {
            Ok(rt60) => Some(rt60),
            Err(e) => {
                debug!("No RT60 for render: {}", e);
                None
            }
        };

        let centroid_hz = CentroidAnalyzer::new(sample_rate, CENTROID_FFT_SIZE)
            .and_then(|mut analyzer| analyzer.centroid(&mono))
            .map_err(|e| debug!("No spectral centroid for render: {}", e))
            .ok();

        Ok(Self {
            duration_secs: left.len() as f32 / sample_rate as f32,
            peak_db: to_db(peak(interleaved)),
            rms_db: to_db(rms(interleaved)),
            rt60_secs,
            correlation: correlation(&left, &right),
            dc_left: dc_offset(&left),
            dc_right: dc_offset(&right),
            centroid_hz,
        })
    }
}

impl fmt::Display for TailReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "duration     {:.2} s", self.duration_secs)?;
        writeln!(f, "peak         {:.1} dBFS", self.peak_db)?;
        writeln!(f, "rms          {:.1} dBFS", self.rms_db)?;
        match self.rt60_secs {
            Some(rt60) => writeln!(f, "rt60         {:.2} s", rt60)?,
            None => writeln!(f, "rt60         n/a")?,
        }
        writeln!(f, "correlation  {:.3}", self.correlation)?;
        writeln!(f, "dc offset    {:.2e} / {:.2e}", self.dc_left, self.dc_right)?;
        match self.centroid_hz {
            Some(hz) => write!(f, "centroid     {:.0} Hz", hz),
            None => write!(f, "centroid     n/a"),
        }
    }
}
