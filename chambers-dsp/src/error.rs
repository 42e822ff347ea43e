//! Errors raised while configuring effects
//!
//! Only `prepare()` can fail. The audio path never returns errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum DspError {
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),
    #[error("Block size must be greater than zero")]
    ZeroBlockSize,
    #[error("Unsupported channel count: {0} (expected 1 or 2)")]
    UnsupportedChannels(usize),
}
