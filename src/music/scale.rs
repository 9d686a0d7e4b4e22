use serde::{Deserialize, Serialize};

/// A set of pitch classes stored as a 12-bit mask, bit `n` = semitone `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PitchClassSet(u16);

impl PitchClassSet {
    pub const EMPTY: PitchClassSet = PitchClassSet(0);
    pub const CHROMATIC: PitchClassSet = PitchClassSet(0x0FFF);

    /// Bits above 11 are discarded.
    pub fn from_mask(mask: u16) -> Self {
        Self(mask & 0x0FFF)
    }

    pub fn from_pitch_classes<I: IntoIterator<Item = u8>>(pcs: I) -> Self {
        let mut mask = 0u16;
        for pc in pcs {
            mask |= 1 << (pc % 12);
        }
        Self(mask)
    }

    pub fn mask(self) -> u16 {
        self.0
    }

    pub fn contains(self, pc: u8) -> bool {
        self.0 & (1 << (pc % 12)) != 0
    }

    pub fn toggled(self, pc: u8) -> Self {
        Self(self.0 ^ (1 << (pc % 12)))
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Ascending pitch classes in the set.
    pub fn pitch_classes(self) -> Vec<u8> {
        (0..12u8).filter(|&pc| self.contains(pc)).collect()
    }

    /// Rotate the set up by `semitones`.
    pub fn transposed(self, semitones: u8) -> Self {
        Self::from_pitch_classes(self.pitch_classes().into_iter().map(|pc| pc + semitones % 12))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    Major,
    Minor,
    Pentatonic,
    Chromatic,
    Mixolydian,
    Diminished,
    WholeTone,
    Locrian,
}

impl ScaleType {
    pub const ALL: [ScaleType; 8] = [
        ScaleType::Major,
        ScaleType::Minor,
        ScaleType::Pentatonic,
        ScaleType::Chromatic,
        ScaleType::Mixolydian,
        ScaleType::Diminished,
        ScaleType::WholeTone,
        ScaleType::Locrian,
    ];

    /// Ascending semitone intervals of one octave, starting at 0.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ScaleType::Major => &[0, 2, 4, 5, 7, 9, 11],
            ScaleType::Minor => &[0, 2, 3, 5, 7, 8, 10],
            ScaleType::Pentatonic => &[0, 2, 4, 7, 9],
            ScaleType::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            ScaleType::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            ScaleType::Diminished => &[0, 2, 3, 5, 6, 8, 9, 11],
            ScaleType::WholeTone => &[0, 2, 4, 6, 8, 10],
            ScaleType::Locrian => &[0, 1, 3, 5, 6, 8, 10],
        }
    }

    pub fn pitch_classes(self, key_pc: u8) -> PitchClassSet {
        PitchClassSet::from_pitch_classes(self.intervals().iter().map(|&iv| iv + key_pc % 12))
    }

    pub fn name(self) -> &'static str {
        match self {
            ScaleType::Major => "Major",
            ScaleType::Minor => "Minor",
            ScaleType::Pentatonic => "Pentatonic",
            ScaleType::Chromatic => "Chromatic",
            ScaleType::Mixolydian => "Mixolydian",
            ScaleType::Diminished => "Diminished",
            ScaleType::WholeTone => "Whole Tone",
            ScaleType::Locrian => "Locrian",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_round_trips_every_subset() {
        for mask in 0u16..4096 {
            let set = PitchClassSet::from_mask(mask);
            let pcs = set.pitch_classes();
            assert_eq!(PitchClassSet::from_pitch_classes(pcs.iter().copied()), set);
            assert_eq!(pcs.len(), set.len());
        }
    }

    #[test]
    fn from_mask_discards_high_bits() {
        assert_eq!(PitchClassSet::from_mask(0xF001).mask(), 0x0001);
    }

    #[test]
    fn intervals_are_ascending_and_rooted() {
        for scale in ScaleType::ALL {
            let iv = scale.intervals();
            assert_eq!(iv[0], 0, "{scale:?}");
            assert!(iv.windows(2).all(|w| w[0] < w[1]), "{scale:?}");
            assert!(iv.iter().all(|&x| x < 12), "{scale:?}");
        }
    }

    #[test]
    fn transposition_wraps() {
        let g_major = ScaleType::Major.pitch_classes(7);
        assert_eq!(g_major.pitch_classes(), vec![0, 2, 4, 6, 7, 9, 11]);
        let c_major = ScaleType::Major.pitch_classes(0);
        assert_eq!(c_major.transposed(7), g_major);
    }

    #[test]
    fn toggle_twice_is_identity() {
        let set = ScaleType::Pentatonic.pitch_classes(2);
        for pc in 0..12 {
            assert_eq!(set.toggled(pc).toggled(pc), set);
        }
    }
}
