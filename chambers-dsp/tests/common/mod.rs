//! Shared rendering helpers for the integration tests

#![allow(dead_code)]

use chambers_dsp::{AudioBlock, Chambers, Effect};

pub const SAMPLE_RATE: f64 = 48000.0;
pub const SAMPLE_RATE_HZ: u32 = 48000;
pub const BLOCK: usize = 512;

pub fn prepared() -> Chambers {
    prepared_at(SAMPLE_RATE)
}

pub fn prepared_at(sample_rate: f64) -> Chambers {
    let mut chambers = Chambers::new();
    chambers
        .prepare(sample_rate, BLOCK, 2)
        .expect("stereo at a positive rate is a valid format");
    chambers
}

/// Process `frames` stereo frames in `BLOCK`-sized chunks, appending the
/// interleaved output. `input(frame)` supplies (left, right) per absolute frame.
pub fn render(
    chambers: &mut Chambers,
    start_frame: usize,
    frames: usize,
    mut input: impl FnMut(usize) -> (f32, f32),
    out: &mut Vec<f32>,
) {
    let mut done = 0;
    let mut block = vec![0.0f32; BLOCK * 2];
    while done < frames {
        let n = BLOCK.min(frames - done);
        let buffer = &mut block[..n * 2];
        for (i, frame) in buffer.chunks_exact_mut(2).enumerate() {
            let (l, r) = input(start_frame + done + i);
            frame[0] = l;
            frame[1] = r;
        }
        chambers.process(AudioBlock::Interleaved(&mut *buffer));
        out.extend_from_slice(buffer);
        done += n;
    }
}

/// Unit impulse on the left channel at frame 0
pub fn impulse_left(frame: usize) -> (f32, f32) {
    if frame == 0 {
        (1.0, 0.0)
    } else {
        (0.0, 0.0)
    }
}

pub fn silence(_: usize) -> (f32, f32) {
    (0.0, 0.0)
}

/// Interleaved window `[start_secs, start_secs + len_secs)`
pub fn window(out: &[f32], start_secs: f32, len_secs: f32) -> &[f32] {
    window_at(out, SAMPLE_RATE, start_secs, len_secs)
}

pub fn window_at(out: &[f32], sample_rate: f64, start_secs: f32, len_secs: f32) -> &[f32] {
    let start = (start_secs * sample_rate as f32) as usize * 2;
    let end = start + (len_secs * sample_rate as f32) as usize * 2;
    &out[start..end.min(out.len())]
}
