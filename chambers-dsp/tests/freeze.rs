//! Freeze round trip on a live impulse response

mod common;

use chambers_analysis::rms;
use chambers_dsp::{FreezePhase, Matrix8x8};
use common::{
    impulse_left, prepared, prepared_at, render, silence, window, window_at, SAMPLE_RATE_HZ,
};

const SR: usize = SAMPLE_RATE_HZ as usize;

#[test]
fn test_freeze_holds_then_release_decays() {
    let mut chambers = prepared();
    let mut out = Vec::new();

    // 1 s of live tail, then freeze at t = 1 s
    render(&mut chambers, 0, SR, impulse_left, &mut out);
    chambers.set_freeze(true);
    render(&mut chambers, SR, 6 * SR, silence, &mut out);
    assert_eq!(chambers.freeze_phase(), FreezePhase::Frozen);

    let at_2 = rms(window(&out, 3.0, 0.5));
    let at_5 = rms(window(&out, 6.0, 0.5));
    assert!(at_2 > 0.0);
    let ratio = at_5 / at_2;
    assert!(
        (0.75..=1.33).contains(&ratio),
        "frozen tail moved: {at_2} -> {at_5}"
    );

    // Release at t = 7 s
    chambers.set_freeze(false);
    render(&mut chambers, 7 * SR, 4 * SR, silence, &mut out);
    assert_eq!(chambers.freeze_phase(), FreezePhase::Live);

    let after_release = rms(window(&out, 7.1, 0.5));
    let later = rms(window(&out, 9.5, 0.5));
    assert!(
        later < after_release * 0.3,
        "tail did not resume decaying: {after_release} -> {later}"
    );
}

/// Impulse at Time 1, freeze at 1 s, then 8 s of frozen silence.
/// Returns the frozen RMS at 8.5 s over the frozen RMS at 2 s.
fn frozen_level_ratio(sample_rate: f64, warp: f32) -> f32 {
    let sr = sample_rate as usize;
    let mut chambers = prepared_at(sample_rate);
    chambers.set_time(1.0);
    chambers.set_warp(warp);
    let mut out = Vec::new();

    render(&mut chambers, 0, sr, impulse_left, &mut out);
    chambers.set_freeze(true);
    render(&mut chambers, sr, 8 * sr, silence, &mut out);
    assert_eq!(chambers.freeze_phase(), FreezePhase::Frozen);

    let early = rms(window_at(&out, sample_rate, 2.0, 0.5));
    let late = rms(window_at(&out, sample_rate, 8.5, 0.5));
    assert!(early > 0.0);
    late / early
}

#[test]
fn test_freeze_sustains_at_mid_warp() {
    for warp in [0.25, 0.5] {
        let ratio = frozen_level_ratio(SAMPLE_RATE_HZ as f64, warp);
        assert!(
            (0.9..=1.15).contains(&ratio),
            "warp {warp}: frozen level ratio {ratio}"
        );
    }
}

#[test]
fn test_freeze_sustains_at_44k1() {
    for warp in [0.0, 0.5] {
        let ratio = frozen_level_ratio(44100.0, warp);
        assert!(
            (0.95..=1.1).contains(&ratio),
            "warp {warp}: frozen level ratio {ratio}"
        );
    }
}

#[test]
fn test_frozen_output_ignores_new_input() {
    let mut quiet = prepared();
    let mut loud = prepared();
    let mut quiet_out = Vec::new();
    let mut loud_out = Vec::new();

    for chambers in [&mut quiet, &mut loud] {
        let mut scratch = Vec::new();
        render(chambers, 0, SR / 2, impulse_left, &mut scratch);
        chambers.set_freeze(true);
        render(chambers, SR / 2, SR / 4, silence, &mut scratch);
    }

    render(&mut quiet, 0, SR, silence, &mut quiet_out);
    render(&mut loud, 0, SR, |_| (0.5, -0.5), &mut loud_out);

    // Only the early reflection path differs, and it is fully closed while frozen
    assert_eq!(quiet_out, loud_out);
}

#[test]
fn test_warp_moves_do_not_reach_frozen_tail() {
    let mut chambers = prepared();
    chambers.set_warp(0.0);
    let mut out = Vec::new();
    render(&mut chambers, 0, SR / 2, impulse_left, &mut out);
    chambers.set_freeze(true);
    render(&mut chambers, SR / 2, SR / 4, silence, &mut out);

    for warp in [0.2, 0.6, 1.0] {
        chambers.set_warp(warp);
        render(&mut chambers, 0, SR / 4, silence, &mut out);
        assert_eq!(*chambers.active_matrix(), Matrix8x8::warp(0.0));
    }
}
