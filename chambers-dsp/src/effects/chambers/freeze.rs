//! Freeze state machine
//!
//! `blend` is 1.0 when fully live and 0.0 when fully frozen. Edges are
//! detected once per block; the ramps themselves advance per sample.

/// Where the network is in the freeze cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreezePhase {
    Live,
    Engaging,
    Frozen,
    Releasing,
}

/// Edge seen by [`FreezeState::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FreezeEdge {
    None,
    Engaged,
    Released,
}

#[derive(Debug, Clone)]
pub(crate) struct FreezeState {
    is_frozen: bool,
    was_frozen: bool,
    ramp_remaining: usize,
    ramp_step: f32,
    blend: f32,
    engage_samples: usize,
    release_samples: usize,
}

impl Default for FreezeState {
    fn default() -> Self {
        Self {
            is_frozen: false,
            was_frozen: false,
            ramp_remaining: 0,
            ramp_step: 0.0,
            blend: 1.0,
            engage_samples: 1,
            release_samples: 1,
        }
    }
}

impl FreezeState {
    /// Set ramp lengths in samples (minimum 1)
    pub(crate) fn prepare(&mut self, engage_samples: usize, release_samples: usize) {
        self.engage_samples = engage_samples.max(1);
        self.release_samples = release_samples.max(1);
        self.settle();
    }

    /// Drop any running ramp and jump to the steady state of the current mode
    pub(crate) fn settle(&mut self) {
        self.ramp_remaining = 0;
        self.ramp_step = 0.0;
        self.blend = if self.is_frozen { 0.0 } else { 1.0 };
        self.was_frozen = self.is_frozen;
    }

    /// Apply the requested freeze flag (once per block)
    pub(crate) fn update(&mut self, frozen: bool) -> FreezeEdge {
        self.is_frozen = frozen;
        let edge = match (self.was_frozen, frozen) {
            (false, true) => {
                self.ramp_remaining = self.engage_samples;
                self.ramp_step = 1.0 / self.engage_samples as f32;
                FreezeEdge::Engaged
            }
            (true, false) => {
                self.ramp_remaining = self.release_samples;
                self.ramp_step = 1.0 / self.release_samples as f32;
                FreezeEdge::Released
            }
            _ => FreezeEdge::None,
        };
        self.was_frozen = frozen;
        edge
    }

    /// Move the blend one sample along the active ramp
    #[inline]
    pub(crate) fn advance(&mut self) {
        if self.ramp_remaining > 0 {
            self.ramp_remaining -= 1;
            if self.is_frozen {
                self.blend = (self.blend - self.ramp_step).max(0.0);
            } else {
                self.blend = (self.blend + self.ramp_step).min(1.0);
            }
        }

        if self.ramp_remaining == 0 {
            self.blend = if self.is_frozen { 0.0 } else { 1.0 };
        }
    }

    #[inline]
    pub(crate) fn blend(&self) -> f32 {
        self.blend
    }

    #[inline]
    pub(crate) fn is_frozen(&self) -> bool {
        self.is_frozen
    }

    #[inline]
    pub(crate) fn is_ramping(&self) -> bool {
        self.ramp_remaining > 0
    }

    pub(crate) fn phase(&self) -> FreezePhase {
        match (self.is_frozen, self.is_ramping()) {
            (false, false) => FreezePhase::Live,
            (true, true) => FreezePhase::Engaging,
            (true, false) => FreezePhase::Frozen,
            (false, true) => FreezePhase::Releasing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(engage: usize, release: usize) -> FreezeState {
        let mut s = FreezeState::default();
        s.prepare(engage, release);
        s
    }

    #[test]
    fn test_starts_live() {
        let s = state(10, 10);
        assert_eq!(s.phase(), FreezePhase::Live);
        assert_eq!(s.blend(), 1.0);
    }

    #[test]
    fn test_engage_ramps_to_zero() {
        let mut s = state(4, 8);
        assert_eq!(s.update(true), FreezeEdge::Engaged);
        assert_eq!(s.phase(), FreezePhase::Engaging);

        s.advance();
        assert!((s.blend() - 0.75).abs() < 1e-6);
        for _ in 0..3 {
            s.advance();
        }
        assert_eq!(s.blend(), 0.0);
        assert_eq!(s.phase(), FreezePhase::Frozen);
    }

    #[test]
    fn test_release_ramps_to_one() {
        let mut s = state(2, 4);
        s.update(true);
        s.advance();
        s.advance();
        assert_eq!(s.update(false), FreezeEdge::Released);
        assert_eq!(s.phase(), FreezePhase::Releasing);

        s.advance();
        assert!((s.blend() - 0.25).abs() < 1e-6);
        for _ in 0..3 {
            s.advance();
        }
        assert_eq!(s.blend(), 1.0);
        assert_eq!(s.phase(), FreezePhase::Live);
    }

    #[test]
    fn test_edges_detected_once() {
        let mut s = state(4, 4);
        assert_eq!(s.update(true), FreezeEdge::Engaged);
        assert_eq!(s.update(true), FreezeEdge::None);
        assert_eq!(s.update(false), FreezeEdge::Released);
        assert_eq!(s.update(false), FreezeEdge::None);
    }

    #[test]
    fn test_toggle_mid_ramp_reverses_from_current_blend() {
        let mut s = state(4, 4);
        s.update(true);
        s.advance();
        s.advance();
        assert!((s.blend() - 0.5).abs() < 1e-6);

        s.update(false);
        s.advance();
        assert!((s.blend() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_settle_jumps_to_steady_state() {
        let mut s = state(100, 100);
        s.update(true);
        s.advance();
        s.settle();
        assert_eq!(s.blend(), 0.0);
        assert!(!s.is_ramping());
    }
}
