//! Patch snapshots and their persistence.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::pitch::MIDI_MAX;
use crate::music::{ChordType, NoteName, PitchClassSet};
use crate::voice::{EngineSettings, EngineSettingsError};

pub const MAX_VOICES: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse patch: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid patch: {0}")]
    Invalid(String),
    #[error("invalid engine settings: {0}")]
    Engine(#[from] EngineSettingsError),
    #[error("patch not found: {0}")]
    NotFound(String),
    #[error("invalid patch name {0:?}")]
    InvalidName(String),
}

/// Immutable performance preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchSettings {
    pub key: NoteName,
    pub chord_type: ChordType,
    pub num_of_voices: usize,
    pub glissando_speed_ms: f32,
    /// Lowest playable MIDI note.
    pub voice_pitch_level: u8,
    /// Width of the playable window in semitones.
    pub note_range_size: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_mask: Option<PitchClassSet>,
    pub vibrato_amount_percent: f32,
    pub vibrato_rate_hz: f32,
    pub engine: EngineSettings,
}

impl Default for PatchSettings {
    fn default() -> Self {
        Self {
            key: NoteName::C,
            chord_type: ChordType::Major,
            num_of_voices: 1,
            glissando_speed_ms: 120.0,
            voice_pitch_level: 48,
            note_range_size: 24,
            scale_mask: None,
            vibrato_amount_percent: 30.0,
            vibrato_rate_hz: 5.5,
            engine: EngineSettings::default(),
        }
    }
}

impl PatchSettings {
    pub fn validate(&self) -> Result<(), PatchError> {
        let invalid = |msg: String| Err(PatchError::Invalid(msg));
        if self.num_of_voices == 0 || self.num_of_voices > MAX_VOICES {
            return invalid(format!(
                "num_of_voices must be within 1..={MAX_VOICES}, got {}",
                self.num_of_voices
            ));
        }
        if !self.glissando_speed_ms.is_finite() || self.glissando_speed_ms < 0.0 {
            return invalid(format!(
                "glissando_speed_ms must be >= 0, got {}",
                self.glissando_speed_ms
            ));
        }
        if self.voice_pitch_level > MIDI_MAX {
            return invalid(format!(
                "voice_pitch_level must be a MIDI note, got {}",
                self.voice_pitch_level
            ));
        }
        if self.note_range_size == 0 {
            return invalid("note_range_size must be > 0".to_string());
        }
        if !self.vibrato_amount_percent.is_finite()
            || !(0.0..=100.0).contains(&self.vibrato_amount_percent)
        {
            return invalid(format!(
                "vibrato_amount_percent must be within [0, 100], got {}",
                self.vibrato_amount_percent
            ));
        }
        if !self.vibrato_rate_hz.is_finite() || !(0.0..=20.0).contains(&self.vibrato_rate_hz) {
            return invalid(format!(
                "vibrato_rate_hz must be within [0, 20], got {}",
                self.vibrato_rate_hz
            ));
        }
        if let Some(mask) = self.scale_mask {
            if mask.mask() > PitchClassSet::CHROMATIC.mask() {
                return invalid(format!("scale_mask has bits above 11: {:#x}", mask.mask()));
            }
        }
        Ok(self.engine.validate()?)
    }

    /// Playable note window `(lowest, highest)`, clipped to the MIDI range.
    pub fn note_range(&self) -> (u8, u8) {
        let lowest = self.voice_pitch_level.min(MIDI_MAX);
        let highest = lowest.saturating_add(self.note_range_size).min(MIDI_MAX);
        (lowest, highest)
    }

    pub fn from_json_str(text: &str) -> Result<Self, PatchError> {
        let patch: Self = serde_json::from_str(text)?;
        patch.validate()?;
        Ok(patch)
    }

    pub fn load_file(path: &Path) -> Result<Self, PatchError> {
        let text = fs::read_to_string(path).map_err(|source| PatchError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

/// Named patch storage.
pub trait PatchStore {
    fn load(&self, name: &str) -> Result<PatchSettings, PatchError>;
    fn save(&mut self, name: &str, patch: &PatchSettings) -> Result<(), PatchError>;
    /// Stored names in ascending order.
    fn list(&self) -> Result<Vec<String>, PatchError>;
    fn remove(&mut self, name: &str) -> Result<(), PatchError>;
}

fn check_name(name: &str) -> Result<(), PatchError> {
    let ok = !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '))
        && !name.starts_with(' ');
    if ok {
        Ok(())
    } else {
        Err(PatchError::InvalidName(name.to_string()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPatchStore {
    patches: BTreeMap<String, PatchSettings>,
}

impl PatchStore for MemoryPatchStore {
    fn load(&self, name: &str) -> Result<PatchSettings, PatchError> {
        self.patches
            .get(name)
            .cloned()
            .ok_or_else(|| PatchError::NotFound(name.to_string()))
    }

    fn save(&mut self, name: &str, patch: &PatchSettings) -> Result<(), PatchError> {
        check_name(name)?;
        patch.validate()?;
        self.patches.insert(name.to_string(), patch.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, PatchError> {
        Ok(self.patches.keys().cloned().collect())
    }

    fn remove(&mut self, name: &str) -> Result<(), PatchError> {
        self.patches
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| PatchError::NotFound(name.to_string()))
    }
}

/// One pretty-printed `<name>.json` file per patch.
#[derive(Debug, Clone)]
pub struct JsonDirPatchStore {
    dir: PathBuf,
}

impl JsonDirPatchStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PatchError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| PatchError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, PatchError> {
        check_name(name)?;
        Ok(self.dir.join(format!("{name}.json")))
    }
}

impl PatchStore for JsonDirPatchStore {
    fn load(&self, name: &str) -> Result<PatchSettings, PatchError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(PatchError::NotFound(name.to_string()));
        }
        PatchSettings::load_file(&path)
    }

    fn save(&mut self, name: &str, patch: &PatchSettings) -> Result<(), PatchError> {
        let path = self.path_for(name)?;
        patch.validate()?;
        let text = serde_json::to_string_pretty(patch)?;
        fs::write(&path, text).map_err(|source| PatchError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(name, path = %path.display(), "patch saved");
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, PatchError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| PatchError::Io {
            path: self.dir.display().to_string(),
            source,
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(dir = %self.dir.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) if check_name(stem).is_ok() => names.push(stem.to_string()),
                _ => {}
            }
        }
        names.sort();
        Ok(names)
    }

    fn remove(&mut self, name: &str) -> Result<(), PatchError> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(PatchError::NotFound(name.to_string()))
            }
            Err(source) => Err(PatchError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}
