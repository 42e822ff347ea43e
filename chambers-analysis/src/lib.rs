//! Offline analysis for Chambers renders
//!
//! Measurements used to judge a reverb tail: windowed loudness, Schroeder
//! decay time, stereo correlation, DC offset and spectral centroid.

mod decay;
mod error;
mod report;
mod spectrum;
mod stereo;

pub use decay::{block_rms, peak, rms, schroeder_rt60, to_db, windowed_rms_db, SILENCE_DB};
pub use error::AnalysisError;
pub use report::TailReport;
pub use spectrum::CentroidAnalyzer;
pub use stereo::{correlation, dc_offset, split_interleaved};
