//! Musical model: note names, chords, scales, quantization and harmony.

pub mod chord;
pub mod harmony;
pub mod note;
pub mod quantizer;
pub mod scale;
pub mod scale_model;

pub use chord::ChordType;
pub use harmony::{HarmonyGenerator, pad_voicing, voice_chord};
pub use note::{NoteName, note_label};
pub use quantizer::quantize;
pub use scale::{PitchClassSet, ScaleType};
pub use scale_model::{QuantizationTable, ScaleModel, ScaleState};
