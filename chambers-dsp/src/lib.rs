//! Chambers reverb core
//!
//! This crate provides the audio-rate part of the reverb:
//! - Smoother: click-free per-sample parameter trajectories
//! - Effects: allpass diffusion and the 8-line Chambers feedback delay network
//! - Params: lock-free parameter handle shared with the control thread
//! - Tuning: the empirically tuned constants, gathered in one place

mod block;
mod error;
mod params;
mod smoother;
mod tuning;
pub mod effects;

pub use block::AudioBlock;
pub use error::DspError;
pub use effects::{
    AllpassDiffuser, Chambers, Effect, FreezePhase, Matrix8x8, DEFAULT_DRIFT_SEED, NUM_LINES,
};
pub use params::{ChambersParams, ParamId, ParamSnapshot};
pub use smoother::ParameterSmoother;
pub use tuning::{ChambersTuning, SmoothingTimes};
