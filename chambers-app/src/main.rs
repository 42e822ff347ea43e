//! Chambers - offline renderer for the Chambers reverb
//!
//! Renders an impulse, a noise burst or a WAV file through the network,
//! optionally freezing and releasing the tail, then reports how it decays.

mod config;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chambers_analysis::TailReport;
use chambers_dsp::{Chambers, ChambersTuning, ParamId, DEFAULT_DRIFT_SEED};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use render::{read_wav, render, write_wav, RenderSettings, Source};

#[derive(Parser)]
#[command(author, version, about = "Offline renderer for the Chambers reverb")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a signal through Chambers and report the tail.
    Render(RenderArgs),
    /// Show or initialise the defaults file.
    Config(ConfigArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SourceKind {
    Impulse,
    Noise,
}

#[derive(Args)]
struct RenderArgs {
    /// Output WAV path (32-bit float stereo).
    #[arg(long, short)]
    output: PathBuf,
    /// Input WAV file; overrides --source.
    #[arg(long, short)]
    input: Option<PathBuf>,
    /// Generated dry signal when no input file is given.
    #[arg(long, value_enum, default_value_t = SourceKind::Impulse)]
    source: SourceKind,
    /// Render length in seconds.
    #[arg(long)]
    seconds: Option<f32>,
    #[arg(long)]
    sample_rate: Option<u32>,
    #[arg(long)]
    block_size: Option<usize>,
    /// Run the network in mono.
    #[arg(long)]
    mono: bool,
    /// Engage freeze at this time (seconds).
    #[arg(long)]
    freeze_at: Option<f32>,
    /// Release freeze at this time (seconds).
    #[arg(long)]
    release_at: Option<f32>,
    /// Drift oscillator seed.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    time: Option<f32>,
    #[arg(long)]
    mass: Option<f32>,
    #[arg(long)]
    density: Option<f32>,
    #[arg(long)]
    bloom: Option<f32>,
    #[arg(long)]
    gravity: Option<f32>,
    #[arg(long)]
    warp: Option<f32>,
    #[arg(long)]
    drift: Option<f32>,
}

impl RenderArgs {
    fn param(&self, id: ParamId) -> Option<f32> {
        match id {
            ParamId::Time => self.time,
            ParamId::Mass => self.mass,
            ParamId::Density => self.density,
            ParamId::Bloom => self.bloom,
            ParamId::Gravity => self.gravity,
            ParamId::Warp => self.warp,
            ParamId::Drift => self.drift,
        }
    }
}

#[derive(Args)]
struct ConfigArgs {
    /// Write the current defaults to the config file.
    #[arg(long)]
    init: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => execute_render(args),
        Commands::Config(args) => execute_config(args),
    }
}

fn execute_render(args: RenderArgs) -> Result<()> {
    let config = Config::load();

    let (source, input_rate) = match &args.input {
        Some(path) => {
            let (samples, rate) = read_wav(path)?;
            (Source::Samples(samples), Some(rate))
        }
        None => match args.source {
            SourceKind::Impulse => (Source::Impulse, None),
            SourceKind::Noise => (
                Source::Noise {
                    seed: args.seed.or(config.seed).unwrap_or(0),
                },
                None,
            ),
        },
    };

    let sample_rate = match (input_rate, args.sample_rate) {
        (Some(file_rate), Some(requested)) if file_rate != requested => {
            warn!(file_rate, requested, "Input sample rate wins over --sample-rate");
            file_rate
        }
        (Some(file_rate), _) => file_rate,
        (None, requested) => requested.unwrap_or(config.sample_rate),
    };

    let settings = RenderSettings {
        sample_rate,
        block_size: args.block_size.unwrap_or(config.block_size),
        seconds: args.seconds.unwrap_or(config.seconds),
        mono: args.mono,
        freeze_at: args.freeze_at,
        release_at: args.release_at,
    };

    let seed = args.seed.or(config.seed).unwrap_or(DEFAULT_DRIFT_SEED);
    let mut chambers = Chambers::with_tuning(ChambersTuning::default(), seed);
    for id in ParamId::ALL {
        let value = args.param(id).unwrap_or_else(|| config.param(id));
        chambers.params().set(id, value);
    }

    info!(
        sample_rate = settings.sample_rate,
        seconds = settings.seconds,
        mono = settings.mono,
        "Rendering"
    );
    let output = render(&mut chambers, &source, &settings)?;

    let path = match (&config.output_dir, args.output.parent()) {
        (Some(dir), Some(parent)) if parent.as_os_str().is_empty() => dir.join(&args.output),
        _ => args.output.clone(),
    };
    write_wav(&path, &output, settings.sample_rate)?;
    info!(path = %path.display(), "Wrote render");

    let report = TailReport::measure(&output, settings.sample_rate)
        .context("failed to analyse render")?;
    println!("{report}");
    Ok(())
}

fn execute_config(args: ConfigArgs) -> Result<()> {
    let config = Config::load();
    if args.init {
        let path = config.save().context("failed to write config")?;
        println!("Wrote {}", path.display());
    } else {
        println!("# {}", Config::config_path().display());
        for id in ParamId::ALL {
            println!("{}={}", id.name(), config.param(id));
        }
        println!("sample_rate={}", config.sample_rate);
        println!("block_size={}", config.block_size);
        println!("seconds={}", config.seconds);
    }
    Ok(())
}
