use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::face::PitchAxis;
use crate::voice::SchedulerConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "AudioConfig::default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "AudioConfig::default_frame_rate_hz")]
    pub frame_rate_hz: f32,
    #[serde(default)]
    pub output_guard: OutputGuardSetting,
    #[serde(default = "AudioConfig::default_master_gain")]
    pub master_gain: f32,
}

impl AudioConfig {
    fn default_sample_rate() -> u32 {
        48_000
    }
    fn default_frame_rate_hz() -> f32 {
        60.0
    }
    fn default_master_gain() -> f32 {
        0.5
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: Self::default_sample_rate(),
            frame_rate_hz: Self::default_frame_rate_hz(),
            output_guard: OutputGuardSetting::default(),
            master_gain: Self::default_master_gain(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutputGuardSetting {
    None,
    #[default]
    SoftClip,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ClassifierConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputConfig {
    #[serde(default)]
    pub pitch_axis: PitchAxis,
    #[serde(default = "InputConfig::default_input_min")]
    pub input_min: f32,
    #[serde(default = "InputConfig::default_input_max")]
    pub input_max: f32,
}

impl InputConfig {
    fn default_input_min() -> f32 {
        -1.0
    }
    fn default_input_max() -> f32 {
        1.0
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            pitch_axis: PitchAxis::default(),
            input_min: Self::default_input_min(),
            input_max: Self::default_input_max(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_stats_interval_sec")]
    pub stats_interval_sec: f32,
}

impl LoggingConfig {
    fn default_stats_interval_sec() -> f32 {
        1.0
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval_sec: Self::default_stats_interval_sec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub voices: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Every default value commented out under its section header.
    fn commented_defaults(text: &str) -> String {
        text.lines()
            .map(|line| match line.split_once(" = ") {
                Some((key, value)) => format!("# {key} = {}\n", shortest_float(value)),
                None => format!("{line}\n"),
            })
            .collect()
    }

    /// Read `path`, or write a commented default file there when it is
    /// missing. Unreadable or malformed files fall back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "failed to parse config; using defaults");
                    }
                },
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to read config; using defaults");
                }
            }
            return Self::default();
        }

        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path, Self::commented_defaults(&text)) {
                    warn!(path = %path.display(), error = %err, "failed to write default config");
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to serialize default config; continuing with defaults");
            }
        }
        default_cfg
    }
}

/// `toml` writes f32 fields widened to f64 (`0.4000000059604645`).
/// Print such values in their shortest f32 form instead.
fn shortest_float(value: &str) -> String {
    match value.parse::<f32>() {
        Ok(v) if value.contains('.') => format!("{v:?}"),
        _ => value.to_string(),
    }
}
