use serde::{Deserialize, Serialize};

/// Vowel vocabulary of the classifier. `Silent` is the "none" class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vowel {
    A,
    Ae,
    E,
    Eh,
    I,
    Ih,
    O,
    U,
    Uh,
    Schwa,
    Silent,
}

/// Tongue and lip shape for one vowel, in vocal-tract control units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VowelPreset {
    pub tongue_position: f32,
    pub tongue_diameter: f32,
    pub lip_open: f32,
}

/// Per-frame vocal-tract controls handed to every voice.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VocalTractParams {
    pub tongue_position: f32,
    pub tongue_diameter: f32,
    pub lip_open: f32,
    pub jaw_open: f32,
}

impl Vowel {
    /// The ten voiced vowels, without the `Silent` sentinel.
    pub const VOICED: [Vowel; 10] = [
        Vowel::A,
        Vowel::Ae,
        Vowel::E,
        Vowel::Eh,
        Vowel::I,
        Vowel::Ih,
        Vowel::O,
        Vowel::U,
        Vowel::Uh,
        Vowel::Schwa,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Vowel::A => "ɑ",
            Vowel::Ae => "æ",
            Vowel::E => "e",
            Vowel::Eh => "ɛ",
            Vowel::I => "i",
            Vowel::Ih => "ɪ",
            Vowel::O => "o",
            Vowel::U => "u",
            Vowel::Uh => "ʊ",
            Vowel::Schwa => "ə",
            Vowel::Silent => "none",
        }
    }

    /// Map a classifier output label to a vowel. Unknown labels map to `None`
    /// and are ignored by the blend.
    pub fn from_label(label: &str) -> Option<Vowel> {
        let vowel = match label.trim() {
            "ɑ" | "a" | "aa" | "ah" => Vowel::A,
            "æ" | "ae" => Vowel::Ae,
            "e" | "ey" | "ei" => Vowel::E,
            "ɛ" | "eh" => Vowel::Eh,
            "i" | "iy" | "ee" => Vowel::I,
            "ɪ" | "ih" => Vowel::Ih,
            "o" | "ow" | "oh" => Vowel::O,
            "u" | "uw" | "oo" => Vowel::U,
            "ʊ" | "uh" => Vowel::Uh,
            "ə" | "ax" | "schwa" => Vowel::Schwa,
            "none" | "sil" | "_" => Vowel::Silent,
            _ => return None,
        };
        Some(vowel)
    }

    pub fn preset(self) -> VowelPreset {
        let (tongue_position, tongue_diameter, lip_open) = match self {
            Vowel::A => (0.25, 1.60, 1.40),
            Vowel::Ae => (0.70, 1.50, 1.30),
            Vowel::E => (0.85, 0.90, 1.00),
            Vowel::Eh => (0.75, 1.20, 1.10),
            Vowel::I => (0.95, 0.40, 0.80),
            Vowel::Ih => (0.85, 0.65, 0.85),
            Vowel::O => (0.20, 1.00, 0.50),
            Vowel::U => (0.10, 0.50, 0.25),
            Vowel::Uh => (0.20, 0.70, 0.40),
            Vowel::Schwa => (0.50, 1.00, 0.90),
            Vowel::Silent => (0.50, 1.00, 0.00),
        };
        VowelPreset {
            tongue_position,
            tongue_diameter,
            lip_open,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_symbol_maps_back() {
        for vowel in Vowel::VOICED.into_iter().chain([Vowel::Silent]) {
            assert_eq!(Vowel::from_label(vowel.symbol()), Some(vowel));
        }
    }

    #[test]
    fn unknown_labels_are_dropped() {
        assert_eq!(Vowel::from_label("zz"), None);
        assert_eq!(Vowel::from_label(""), None);
        assert_eq!(Vowel::from_label(" aa "), Some(Vowel::A));
    }

    #[test]
    fn presets_stay_in_control_range() {
        for vowel in Vowel::VOICED {
            let p = vowel.preset();
            for v in [p.tongue_position, p.tongue_diameter, p.lip_open] {
                assert!((0.0..=2.0).contains(&v), "{vowel:?}: {v}");
            }
        }
    }
}
