use super::scale::PitchClassSet;
use crate::core::pitch::MIDI_MAX;

/// Lead note first, then successively lower chord tones. Stops early when the
/// keyboard runs out; callers pad with [`pad_voicing`].
pub fn voice_chord(
    lead_note: u8,
    chord_pitch_classes: PitchClassSet,
    voice_count: usize,
) -> Vec<u8> {
    HarmonyGenerator::new(chord_pitch_classes).voice_chord(lead_note, voice_count)
}

/// Repeat the last note until `notes.len() == voice_count`.
pub fn pad_voicing(mut notes: Vec<u8>, voice_count: usize) -> Vec<u8> {
    if let Some(&last) = notes.last() {
        notes.resize(voice_count.max(notes.len()), last);
    }
    notes
}

/// Caches the descending chord-tone list for one chord.
#[derive(Debug, Clone)]
pub struct HarmonyGenerator {
    chord: PitchClassSet,
    descending: Vec<u8>,
}

impl HarmonyGenerator {
    pub fn new(chord: PitchClassSet) -> Self {
        let mut descending: Vec<u8> = (0..=MIDI_MAX)
            .filter(|&n| chord.contains(n % 12))
            .collect();
        descending.reverse();
        Self { chord, descending }
    }

    pub fn chord(&self) -> PitchClassSet {
        self.chord
    }

    pub fn set_chord(&mut self, chord: PitchClassSet) {
        if chord != self.chord {
            *self = Self::new(chord);
        }
    }

    pub fn voice_chord(&self, lead_note: u8, voice_count: usize) -> Vec<u8> {
        if voice_count == 0 {
            return Vec::new();
        }
        let mut notes = Vec::with_capacity(voice_count);
        notes.push(lead_note);
        let start = self.descending.partition_point(|&n| n >= lead_note);
        notes.extend(self.descending[start..].iter().take(voice_count - 1));
        notes
    }

    /// [`voice_chord`](Self::voice_chord) padded to exactly `voice_count`.
    pub fn voice_chord_padded(&self, lead_note: u8, voice_count: usize) -> Vec<u8> {
        pad_voicing(self.voice_chord(lead_note, voice_count), voice_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c_triad() -> PitchClassSet {
        PitchClassSet::from_pitch_classes([0, 4, 7])
    }

    #[test]
    fn triad_below_middle_c() {
        assert_eq!(voice_chord(60, c_triad(), 3), vec![60, 55, 52]);
        assert_eq!(voice_chord(60, c_triad(), 4), vec![60, 55, 52, 48]);
    }

    #[test]
    fn lead_need_not_be_a_chord_tone() {
        assert_eq!(voice_chord(62, c_triad(), 3), vec![62, 60, 55]);
    }

    #[test]
    fn stops_early_at_bottom_of_keyboard() {
        assert_eq!(voice_chord(1, c_triad(), 5), vec![1, 0]);
        assert_eq!(voice_chord(0, c_triad(), 3), vec![0]);
    }

    #[test]
    fn padding_repeats_last_note() {
        let harmony = HarmonyGenerator::new(c_triad());
        assert_eq!(harmony.voice_chord_padded(1, 5), vec![1, 0, 0, 0, 0]);
        assert_eq!(pad_voicing(vec![60, 55], 2), vec![60, 55]);
        assert_eq!(pad_voicing(Vec::new(), 3), Vec::<u8>::new());
    }

    #[test]
    fn zero_voices_is_empty() {
        assert!(voice_chord(60, c_triad(), 0).is_empty());
    }

    #[test]
    fn empty_chord_yields_lead_only() {
        assert_eq!(voice_chord(60, PitchClassSet::EMPTY, 3), vec![60]);
    }

    #[test]
    fn harmony_is_strictly_descending() {
        let chord = PitchClassSet::from_pitch_classes([2, 5, 7, 11]);
        for lead in 20..=127u8 {
            let notes = voice_chord(lead, chord, 4);
            assert_eq!(notes[0], lead);
            assert!(notes.windows(2).all(|w| w[0] > w[1]), "lead {lead}: {notes:?}");
            assert!(notes[1..].iter().all(|n| chord.contains(n % 12)));
        }
    }

    #[test]
    fn set_chord_rebuilds_cache() {
        let mut generator = HarmonyGenerator::new(c_triad());
        generator.set_chord(PitchClassSet::from_pitch_classes([9, 0, 4]));
        assert_eq!(generator.voice_chord(60, 3), vec![60, 57, 52]);
    }
}
