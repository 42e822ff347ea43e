//! Offline rendering through the Chambers network

use std::path::Path;

use anyhow::{bail, Context, Result};
use chambers_dsp::{AudioBlock, Chambers, Effect};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Length of the generated noise burst
const NOISE_BURST_SECS: f32 = 0.1;
const NOISE_LEVEL: f32 = 0.5;

/// Dry signal fed into the network
#[derive(Debug, Clone)]
pub enum Source {
    /// Unit impulse on the left channel
    Impulse,
    /// Short seeded white-noise burst on both channels
    Noise { seed: u64 },
    /// Interleaved stereo samples, silence after the end
    Samples(Vec<f32>),
}

impl Source {
    /// Fill an interleaved stereo block starting at `start_frame`
    fn fill(&self, start_frame: usize, block: &mut [f32], sample_rate: u32, rng: &mut StdRng) {
        match self {
            Source::Impulse => {
                block.fill(0.0);
                if start_frame == 0 && !block.is_empty() {
                    block[0] = 1.0;
                }
            }
            Source::Noise { .. } => {
                let burst_frames = (NOISE_BURST_SECS * sample_rate as f32) as usize;
                for (i, frame) in block.chunks_exact_mut(2).enumerate() {
                    if start_frame + i < burst_frames {
                        frame[0] = rng.gen_range(-NOISE_LEVEL..NOISE_LEVEL);
                        frame[1] = rng.gen_range(-NOISE_LEVEL..NOISE_LEVEL);
                    } else {
                        frame.fill(0.0);
                    }
                }
            }
            Source::Samples(samples) => {
                let start = (start_frame * 2).min(samples.len());
                let available = (samples.len() - start).min(block.len());
                block[..available].copy_from_slice(&samples[start..start + available]);
                block[available..].fill(0.0);
            }
        }
    }

    fn seed(&self) -> u64 {
        match self {
            Source::Noise { seed } => *seed,
            _ => 0,
        }
    }
}

/// How a render is laid out in time
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub sample_rate: u32,
    pub block_size: usize,
    pub seconds: f32,
    /// Run the network with one channel and duplicate the result
    pub mono: bool,
    pub freeze_at: Option<f32>,
    pub release_at: Option<f32>,
}

impl RenderSettings {
    fn frame_at(&self, secs: f32) -> usize {
        (secs.max(0.0) * self.sample_rate as f32) as usize
    }
}

/// Render `settings.seconds` of output, interleaved stereo
pub fn render(chambers: &mut Chambers, source: &Source, settings: &RenderSettings) -> Result<Vec<f32>> {
    if let (Some(freeze), Some(release)) = (settings.freeze_at, settings.release_at) {
        if release <= freeze {
            bail!("release time {release} s must come after freeze time {freeze} s");
        }
    }

    let channels = if settings.mono { 1 } else { 2 };
    chambers
        .prepare(f64::from(settings.sample_rate), settings.block_size, channels)
        .context("failed to prepare Chambers")?;

    let total_frames = settings.frame_at(settings.seconds);
    let freeze_frame = settings.freeze_at.map(|t| settings.frame_at(t));
    let release_frame = settings.release_at.map(|t| settings.frame_at(t));

    let mut rng = StdRng::seed_from_u64(source.seed());
    let mut output = Vec::with_capacity(total_frames * 2);
    let mut stereo = vec![0.0f32; settings.block_size * 2];
    let mut mono = vec![0.0f32; settings.block_size];

    let params = chambers.params();
    let mut frame = 0;
    while frame < total_frames {
        if freeze_frame.is_some_and(|f| frame >= f) && release_frame.map_or(true, |r| frame < r) {
            if !params.is_frozen() {
                info!(seconds = frame as f32 / settings.sample_rate as f32, "Freeze engaged");
                chambers.set_freeze(true);
            }
        } else if params.is_frozen() {
            info!(seconds = frame as f32 / settings.sample_rate as f32, "Freeze released");
            chambers.set_freeze(false);
        }

        let frames = settings.block_size.min(total_frames - frame);
        let block = &mut stereo[..frames * 2];
        source.fill(frame, block, settings.sample_rate, &mut rng);

        if settings.mono {
            let mono_block = &mut mono[..frames];
            for (m, pair) in mono_block.iter_mut().zip(block.chunks_exact(2)) {
                *m = 0.5 * (pair[0] + pair[1]);
            }
            chambers.process(AudioBlock::mono(&mut *mono_block));
            for &m in mono_block.iter() {
                output.push(m);
                output.push(m);
            }
        } else {
            chambers.process(AudioBlock::Interleaved(&mut *block));
            output.extend_from_slice(block);
        }

        frame += frames;
    }

    debug!(frames = total_frames, "Render finished");
    Ok(output)
}

/// Read a WAV file as interleaved stereo (mono is duplicated, extra channels dropped)
pub fn read_wav(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        bail!("{} has no channels", path.display());
    }

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .with_context(|| format!("failed to decode {}", path.display()))?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()
                .with_context(|| format!("failed to decode {}", path.display()))?
        }
    };

    let mut stereo = Vec::with_capacity(samples.len() / channels * 2);
    for frame in samples.chunks_exact(channels) {
        let left = frame[0];
        let right = if channels > 1 { frame[1] } else { left };
        stereo.push(left);
        stereo.push(right);
    }

    debug!(
        path = %path.display(),
        sample_rate = spec.sample_rate,
        channels,
        frames = stereo.len() / 2,
        "Loaded input"
    );
    Ok((stereo, spec.sample_rate))
}

/// Write interleaved stereo as 32-bit float WAV
pub fn write_wav(path: &Path, interleaved: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for &sample in interleaved {
        writer.write_sample(sample)?;
    }
    writer
        .finalize()
        .with_context(|| format!("failed to finalize {}", path.display()))?;
    Ok(())
}
