//! Render defaults persisted between runs
//!
//! Stored as `key=value` lines in the user config directory. Unknown keys
//! are ignored; unparsable values keep their defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chambers_dsp::ParamId;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Macro values in [`ParamId::ALL`] order
    pub params: [f32; ParamId::COUNT],
    pub sample_rate: u32,
    pub block_size: usize,
    pub seconds: f32,
    /// Drift seed; the engine default when unset
    pub seed: Option<u64>,
    /// Where renders go when `--output` is a bare file name
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            params: ParamId::ALL.map(ParamId::default_value),
            sample_rate: 48000,
            block_size: 512,
            seconds: 10.0,
            seed: None,
            output_dir: None,
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        Self::load_from(&path).unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn save(&self) -> io::Result<PathBuf> {
        let path = Self::config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.serialize())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chambers")
            .join("config.txt")
    }

    pub fn param(&self, id: ParamId) -> f32 {
        self.params[id.index()]
    }

    fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if let Some(id) = ParamId::from_name(key) {
                match value.parse::<f32>() {
                    Ok(v) if v.is_finite() => config.params[id.index()] = v.clamp(0.0, 1.0),
                    _ => warn!(key, value, "Ignoring invalid parameter value in config"),
                }
                continue;
            }

            match key {
                "sample_rate" => {
                    parse_into(key, value, &mut config.sample_rate);
                }
                "block_size" => {
                    parse_into(key, value, &mut config.block_size);
                }
                "seconds" => {
                    parse_into(key, value, &mut config.seconds);
                }
                "seed" => {
                    let mut seed = 0u64;
                    if parse_into(key, value, &mut seed) {
                        config.seed = Some(seed);
                    }
                }
                "output_dir" => {
                    if !value.is_empty() {
                        config.output_dir = Some(PathBuf::from(value));
                    }
                }
                _ => {} // Ignore unknown keys
            }
        }

        config
    }

    fn serialize(&self) -> String {
        let mut lines = vec!["# Chambers render defaults".to_string()];
        for id in ParamId::ALL {
            lines.push(format!("{}={}", id.name(), self.param(id)));
        }
        lines.push(format!("sample_rate={}", self.sample_rate));
        lines.push(format!("block_size={}", self.block_size));
        lines.push(format!("seconds={}", self.seconds));
        if let Some(seed) = self.seed {
            lines.push(format!("seed={}", seed));
        }
        if let Some(ref dir) = self.output_dir {
            lines.push(format!("output_dir={}", dir.display()));
        }
        lines.join("\n")
    }
}

fn parse_into<T: std::str::FromStr>(key: &str, value: &str, slot: &mut T) -> bool {
    match value.parse() {
        Ok(v) => {
            *slot = v;
            true
        }
        Err(_) => {
            warn!(key, value, "Ignoring invalid value in config");
            false
        }
    }
}
