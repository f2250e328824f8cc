use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_bpm")]
    pub bpm: f64,
    #[serde(default = "default_key")]
    pub key: String,
    #[serde(default = "default_major")]
    pub major: bool,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Seconds of input to analyze; 0 analyzes the whole file
    #[serde(default = "default_duration")]
    pub duration: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_notes_dir")]
    pub notes_dir: PathBuf,
    #[serde(default = "default_midi_dir")]
    pub midi_dir: PathBuf,
    #[serde(default = "default_ticks_per_beat")]
    pub ticks_per_beat: u16,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bpm: default_bpm(),
            key: default_key(),
            major: default_major(),
            threshold: default_threshold(),
            duration: default_duration(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            notes_dir: default_notes_dir(),
            midi_dir: default_midi_dir(),
            ticks_per_beat: default_ticks_per_beat(),
        }
    }
}

fn default_bpm() -> f64 { 84.0 }
fn default_key() -> String { "D".into() }
fn default_major() -> bool { true }
fn default_threshold() -> f64 { 38.0 }
fn default_duration() -> Option<f32> { Some(27.0) }
fn default_notes_dir() -> PathBuf { PathBuf::from(".") }
fn default_midi_dir() -> PathBuf { PathBuf::from("output_midi") }
fn default_ticks_per_beat() -> u16 { crate::encode::midi::DEFAULT_TICKS_PER_BEAT }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(err) => {
            log::warn!("Invalid config {}: {}", path.display(), err);
            None
        }
    }
}

/// Explicit path, else `notegrid.toml` in the working directory, else the
/// per-user config file.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("notegrid.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("notegrid").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("notegrid").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
