//! Audio effects for Chambers

mod allpass;
mod chambers;

pub use allpass::AllpassDiffuser;
pub use chambers::{Chambers, FreezePhase, Matrix8x8, DEFAULT_DRIFT_SEED, NUM_LINES};

use crate::{AudioBlock, DspError};

/// Capability interface implemented by every effect module
///
/// `process` must be real-time safe: no allocation, locking or logging.
pub trait Effect: Send {
    /// Size and clear all buffers for the given format
    fn prepare(
        &mut self,
        sample_rate: f64,
        max_block_size: usize,
        channels: usize,
    ) -> Result<(), DspError>;

    /// Clear all state without reallocating
    fn reset(&mut self);

    /// Process audio samples in place
    fn process(&mut self, block: AudioBlock<'_>);

    /// Get effect name
    fn name(&self) -> &'static str;
}
