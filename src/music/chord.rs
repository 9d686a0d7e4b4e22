use serde::{Deserialize, Serialize};

use super::scale::{PitchClassSet, ScaleType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordType {
    #[default]
    Major,
    Minor,
    Dominant7,
    Diminished,
    HalfDiminished,
    Augmented,
}

impl ChordType {
    pub const ALL: [ChordType; 6] = [
        ChordType::Major,
        ChordType::Minor,
        ChordType::Dominant7,
        ChordType::Diminished,
        ChordType::HalfDiminished,
        ChordType::Augmented,
    ];

    /// Chord-tone offsets in semitones from the root.
    pub fn tones(self) -> &'static [u8] {
        match self {
            ChordType::Major => &[0, 4, 7],
            ChordType::Minor => &[0, 3, 7],
            ChordType::Dominant7 => &[0, 4, 7, 10],
            ChordType::Diminished => &[0, 3, 6],
            ChordType::HalfDiminished => &[0, 3, 6, 10],
            ChordType::Augmented => &[0, 4, 8],
        }
    }

    /// Scale used for quantization when no custom mask is set.
    pub fn default_scale(self) -> ScaleType {
        match self {
            ChordType::Major => ScaleType::Major,
            ChordType::Minor => ScaleType::Minor,
            ChordType::Dominant7 => ScaleType::Mixolydian,
            ChordType::Diminished => ScaleType::Diminished,
            ChordType::HalfDiminished => ScaleType::Locrian,
            ChordType::Augmented => ScaleType::WholeTone,
        }
    }

    pub fn pitch_classes(self, root_pc: u8) -> PitchClassSet {
        PitchClassSet::from_pitch_classes(self.tones().iter().map(|&t| t + root_pc % 12))
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ChordType::Major => "",
            ChordType::Minor => "m",
            ChordType::Dominant7 => "7",
            ChordType::Diminished => "dim",
            ChordType::HalfDiminished => "m7b5",
            ChordType::Augmented => "aug",
        }
    }
}
