use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::core::pitch::MIDI_MAX;
use crate::face::PitchAxis;
use crate::patch::PatchSettings;

/// Live performance knobs read on every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSettings {
    pub pitch_axis: PitchAxis,
    pub input_min: f32,
    pub input_max: f32,
    pub lowest_note: u8,
    pub highest_note: u8,
    pub voice_count: usize,
    pub glissando_ms: f32,
    pub vibrato_amount_percent: f32,
    pub vibrato_rate_hz: f32,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self::from_patch(&PatchSettings::default())
    }
}

impl PerformanceSettings {
    pub fn from_patch(patch: &PatchSettings) -> Self {
        let mut settings = Self {
            pitch_axis: PitchAxis::default(),
            input_min: -1.0,
            input_max: 1.0,
            lowest_note: 0,
            highest_note: 0,
            voice_count: 0,
            glissando_ms: 0.0,
            vibrato_amount_percent: 0.0,
            vibrato_rate_hz: 0.0,
        };
        settings.apply_patch(patch);
        settings
    }

    /// Copy the patch-owned fields; input mapping is left alone.
    pub fn apply_patch(&mut self, patch: &PatchSettings) {
        let (lowest, highest) = patch.note_range();
        self.lowest_note = lowest;
        self.highest_note = highest;
        self.voice_count = patch.num_of_voices;
        self.glissando_ms = patch.glissando_speed_ms;
        self.vibrato_amount_percent = patch.vibrato_amount_percent;
        self.vibrato_rate_hz = patch.vibrato_rate_hz;
    }

    pub fn input_range(&self) -> RangeInclusive<f32> {
        self.input_min..=self.input_max
    }

    /// Store a note window with `lowest <= highest`, clipped to MIDI.
    pub fn set_note_range(&mut self, lowest: u8, highest: u8) {
        let (lo, hi) = if lowest <= highest {
            (lowest, highest)
        } else {
            (highest, lowest)
        };
        self.lowest_note = lo.min(MIDI_MAX);
        self.highest_note = hi.min(MIDI_MAX);
    }
}
