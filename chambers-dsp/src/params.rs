//! Lock-free parameter handle shared between control and audio threads
//!
//! The control thread writes normalized values with relaxed atomics; the
//! audio thread takes one [`ParamSnapshot`] per block. Every parameter is
//! meaningful on its own, so no ordering between them is required.

use atomic_float::AtomicF32;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Continuous Chambers parameters, all normalized to 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    Time,
    Mass,
    Density,
    Bloom,
    Gravity,
    Warp,
    Drift,
}

impl ParamId {
    pub const COUNT: usize = 7;

    pub const ALL: [ParamId; Self::COUNT] = [
        ParamId::Time,
        ParamId::Mass,
        ParamId::Density,
        ParamId::Bloom,
        ParamId::Gravity,
        ParamId::Warp,
        ParamId::Drift,
    ];

    /// Position in [`ParamId::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Value used until the control layer says otherwise
    pub fn default_value(self) -> f32 {
        match self {
            ParamId::Time => 0.55,
            ParamId::Mass => 0.5,
            ParamId::Density => 0.5,
            ParamId::Bloom => 0.0,
            ParamId::Gravity => 0.0,
            ParamId::Warp => 0.0,
            ParamId::Drift => 0.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamId::Time => "time",
            ParamId::Mass => "mass",
            ParamId::Density => "density",
            ParamId::Bloom => "bloom",
            ParamId::Gravity => "gravity",
            ParamId::Warp => "warp",
            ParamId::Drift => "drift",
        }
    }

    /// Look up a parameter by its lowercase name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

/// Values published to the audio thread for one block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    pub time: f32,
    pub mass: f32,
    pub density: f32,
    pub bloom: f32,
    pub gravity: f32,
    pub warp: f32,
    pub drift: f32,
    pub freeze: bool,
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self {
            time: ParamId::Time.default_value(),
            mass: ParamId::Mass.default_value(),
            density: ParamId::Density.default_value(),
            bloom: ParamId::Bloom.default_value(),
            gravity: ParamId::Gravity.default_value(),
            warp: ParamId::Warp.default_value(),
            drift: ParamId::Drift.default_value(),
            freeze: false,
        }
    }
}

/// Shared parameter storage
pub struct ChambersParams {
    values: [AtomicF32; ParamId::COUNT],
    freeze: AtomicBool,
    /// One warning per parameter for rejected or clamped input
    warned: [AtomicBool; ParamId::COUNT],
}

impl Default for ChambersParams {
    fn default() -> Self {
        Self {
            values: ParamId::ALL.map(|id| AtomicF32::new(id.default_value())),
            freeze: AtomicBool::new(false),
            warned: std::array::from_fn(|_| AtomicBool::new(false)),
        }
    }
}

impl ChambersParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter
    ///
    /// Non-finite input keeps the previous value; out-of-range input is
    /// clamped into 0.0 - 1.0.
    pub fn set(&self, id: ParamId, value: f32) {
        if !value.is_finite() {
            self.warn_once(id, value, "ignoring non-finite value");
            return;
        }

        let clamped = value.clamp(0.0, 1.0);
        if clamped != value {
            self.warn_once(id, value, "clamping out-of-range value");
        }

        self.values[id.index()].store(clamped, Ordering::Relaxed);
    }

    /// Get the current target of a parameter
    pub fn get(&self, id: ParamId) -> f32 {
        self.values[id.index()].load(Ordering::Relaxed)
    }

    pub fn set_freeze(&self, frozen: bool) {
        self.freeze.store(frozen, Ordering::Relaxed);
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze.load(Ordering::Relaxed)
    }

    /// Read every value once (audio thread, start of block)
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            time: self.get(ParamId::Time),
            mass: self.get(ParamId::Mass),
            density: self.get(ParamId::Density),
            bloom: self.get(ParamId::Bloom),
            gravity: self.get(ParamId::Gravity),
            warp: self.get(ParamId::Warp),
            drift: self.get(ParamId::Drift),
            freeze: self.is_frozen(),
        }
    }

    fn warn_once(&self, id: ParamId, value: f32, action: &str) {
        if cfg!(debug_assertions) && !self.warned[id.index()].swap(true, Ordering::Relaxed) {
            warn!(param = id.name(), value, "Chambers: {action}");
        }
    }
}
