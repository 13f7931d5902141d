use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::common::error::Result;
use crate::sched::SimTime;

const DEFAULT_CYCLES: u64 = 100;
const DEFAULT_PERIOD: SimTime = 10;
const DEFAULT_MAX_DELTAS: usize = 1000;
const DEFAULT_STRIDE: u32 = 4;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub kernel: KernelConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

impl Config {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses a TOML configuration document.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default)]
    pub trace: bool,

    #[serde(default = "default_cycles")]
    pub cycles: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            cycles: DEFAULT_CYCLES,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct KernelConfig {
    #[serde(default = "default_period")]
    pub period: SimTime,

    #[serde(default = "default_max_deltas")]
    pub max_deltas: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            max_deltas: DEFAULT_MAX_DELTAS,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LogConfig {
    #[serde(default)]
    pub enabled: bool,

    /// JSON-lines file receiving `change_save` output.
    pub save_path: Option<String>,

    #[serde(default)]
    pub dump: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_stride")]
    pub stride: u32,

    /// Freeze the program counter every N cycles; 0 never stalls.
    #[serde(default)]
    pub stall_every: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            stride: DEFAULT_STRIDE,
            stall_every: 0,
        }
    }
}

fn default_cycles() -> u64 {
    DEFAULT_CYCLES
}

fn default_period() -> SimTime {
    DEFAULT_PERIOD
}

fn default_max_deltas() -> usize {
    DEFAULT_MAX_DELTAS
}

fn default_stride() -> u32 {
    DEFAULT_STRIDE
}
