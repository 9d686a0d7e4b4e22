//! Single source of truth for which MIDI notes are currently playable.
//!
//! The model owns the key/chord/mask state and republishes an immutable
//! [`QuantizationTable`] on every mutation. Readers hold an `Arc` snapshot, so
//! a table is never observed half-built even if the control thread and the
//! frame thread differ.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::chord::ChordType;
use super::note::NoteName;
use super::scale::{PitchClassSet, ScaleType};
use crate::core::pitch::MIDI_MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScaleState {
    pub key: NoteName,
    pub chord_type: ChordType,
    #[serde(default)]
    pub custom_mask: Option<PitchClassSet>,
}

impl ScaleState {
    pub fn scale_type(&self) -> ScaleType {
        self.chord_type.default_scale()
    }

    pub fn current_scale_pitch_classes(&self) -> PitchClassSet {
        match self.custom_mask {
            Some(mask) => mask,
            None => self.scale_type().pitch_classes(self.key.pitch_class()),
        }
    }

    pub fn chord_pitch_classes(&self) -> PitchClassSet {
        self.chord_type.pitch_classes(self.key.pitch_class())
    }
}

/// Ascending MIDI notes whose pitch class is in the active set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuantizationTable {
    notes: Vec<u8>,
}

impl QuantizationTable {
    pub fn build(pitch_classes: PitchClassSet) -> Self {
        let notes = (0..=MIDI_MAX)
            .filter(|&midi| pitch_classes.contains(midi % 12))
            .collect();
        Self { notes }
    }

    pub fn notes(&self) -> &[u8] {
        &self.notes
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Notes inside `[lowest, highest]`, still ascending.
    pub fn in_range(&self, lowest: u8, highest: u8) -> &[u8] {
        let start = self.notes.partition_point(|&n| n < lowest);
        let end = self.notes.partition_point(|&n| n <= highest);
        if start >= end { &[] } else { &self.notes[start..end] }
    }
}

#[derive(Debug, Clone)]
pub struct ScaleModel {
    state: ScaleState,
    table: Arc<QuantizationTable>,
}

impl Default for ScaleModel {
    fn default() -> Self {
        Self::new(NoteName::C, ChordType::Major)
    }
}

impl ScaleModel {
    pub fn new(key: NoteName, chord_type: ChordType) -> Self {
        let state = ScaleState {
            key,
            chord_type,
            custom_mask: None,
        };
        let table = Arc::new(QuantizationTable::build(state.current_scale_pitch_classes()));
        Self { state, table }
    }

    pub fn from_state(state: ScaleState) -> Self {
        let mut model = Self::new(state.key, state.chord_type);
        if let Some(mask) = state.custom_mask {
            model.set_custom_mask(mask);
        }
        model
    }

    pub fn state(&self) -> ScaleState {
        self.state
    }

    pub fn key(&self) -> NoteName {
        self.state.key
    }

    pub fn chord_type(&self) -> ChordType {
        self.state.chord_type
    }

    pub fn scale_type(&self) -> ScaleType {
        self.state.scale_type()
    }

    pub fn custom_mask(&self) -> Option<PitchClassSet> {
        self.state.custom_mask
    }

    pub fn current_scale_pitch_classes(&self) -> PitchClassSet {
        self.state.current_scale_pitch_classes()
    }

    pub fn chord_pitch_classes(&self) -> PitchClassSet {
        self.state.chord_pitch_classes()
    }

    /// Snapshot of the current table. Later mutations publish a new table and
    /// leave this one untouched.
    pub fn table(&self) -> Arc<QuantizationTable> {
        Arc::clone(&self.table)
    }

    pub fn set_key_and_chord(&mut self, key: NoteName, chord_type: ChordType) {
        self.state.key = key;
        self.state.chord_type = chord_type;
        self.state.custom_mask = None;
        self.rebuild();
    }

    pub fn set_custom_mask(&mut self, mask: PitchClassSet) {
        self.state.custom_mask = Some(mask);
        self.rebuild();
    }

    pub fn toggle_pitch_class(&mut self, pc: u8) {
        let next = self.current_scale_pitch_classes().toggled(pc);
        self.set_custom_mask(next);
    }

    pub fn clear_custom_mask(&mut self) {
        if self.state.custom_mask.take().is_some() {
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        let pcs = self.current_scale_pitch_classes();
        if pcs.is_empty() {
            warn!("scale has no pitch classes; quantizer will fall back to the lowest note");
        }
        self.table = Arc::new(QuantizationTable::build(pcs));
        debug!(
            key = self.state.key.name(),
            chord = ?self.state.chord_type,
            mask = pcs.mask(),
            notes = self.table.len(),
            "quantization table rebuilt"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_major_table_contains_only_white_keys() {
        let model = ScaleModel::default();
        let table = model.table();
        assert!(table.notes().iter().all(|n| ![1, 3, 6, 8, 10].contains(&(n % 12))));
        assert_eq!(table.notes().first(), Some(&0));
        assert_eq!(table.notes().last(), Some(&127));
        assert!(table.notes().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn chord_drives_scale() {
        let mut model = ScaleModel::default();
        model.set_key_and_chord(NoteName::G, ChordType::Dominant7);
        assert_eq!(model.scale_type(), ScaleType::Mixolydian);
        // G mixolydian == C major pitch classes
        assert_eq!(
            model.current_scale_pitch_classes(),
            ScaleType::Major.pitch_classes(0)
        );
        assert_eq!(model.chord_pitch_classes().pitch_classes(), vec![2, 5, 7, 11]);
    }

    #[test]
    fn custom_mask_overrides_and_clears() {
        let mut model = ScaleModel::default();
        let mask = PitchClassSet::from_pitch_classes([0, 7]);
        model.set_custom_mask(mask);
        assert_eq!(model.current_scale_pitch_classes(), mask);
        assert!(model.table().notes().iter().all(|n| n % 12 == 0 || n % 12 == 7));

        model.clear_custom_mask();
        assert_eq!(model.custom_mask(), None);
        let c_major = QuantizationTable::build(ScaleType::Major.pitch_classes(0));
        assert_eq!(model.table().len(), c_major.len());
    }

    #[test]
    fn set_key_and_chord_clears_mask() {
        let mut model = ScaleModel::default();
        model.set_custom_mask(PitchClassSet::from_pitch_classes([1]));
        model.set_key_and_chord(NoteName::A, ChordType::Minor);
        assert_eq!(model.custom_mask(), None);
        assert_eq!(
            model.current_scale_pitch_classes(),
            ScaleType::Major.pitch_classes(0)
        );
    }

    #[test]
    fn toggle_twice_restores_prior_set() {
        let mut model = ScaleModel::new(NoteName::D, ChordType::Minor);
        let before = model.current_scale_pitch_classes();
        model.toggle_pitch_class(4);
        assert_ne!(model.current_scale_pitch_classes(), before);
        model.toggle_pitch_class(4);
        assert_eq!(model.current_scale_pitch_classes(), before);
    }

    #[test]
    fn toggling_last_member_empties_table() {
        let mut model = ScaleModel::default();
        model.set_custom_mask(PitchClassSet::from_pitch_classes([5]));
        model.toggle_pitch_class(5);
        assert!(model.current_scale_pitch_classes().is_empty());
        assert!(model.table().is_empty());
    }

    #[test]
    fn published_snapshot_is_not_mutated() {
        let mut model = ScaleModel::default();
        let before = model.table();
        let before_len = before.len();
        model.set_custom_mask(PitchClassSet::from_pitch_classes([0]));
        assert_eq!(before.len(), before_len);
        assert_ne!(model.table().len(), before_len);
    }

    #[test]
    fn in_range_slices_table() {
        let table = QuantizationTable::build(ScaleType::Major.pitch_classes(0));
        assert_eq!(table.in_range(60, 67), &[60, 62, 64, 65, 67]);
        assert_eq!(table.in_range(61, 61), &[] as &[u8]);
        assert_eq!(table.in_range(70, 60), &[] as &[u8]);
    }
}
