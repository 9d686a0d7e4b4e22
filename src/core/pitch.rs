//! Equal-tempered pitch conversions (A4 = MIDI 69 = 440 Hz).

pub const A4_HZ: f32 = 440.0;
pub const A4_MIDI: f32 = 69.0;
pub const MIDI_MAX: u8 = 127;

#[inline]
pub fn midi_to_hz(note: f32) -> f32 {
    A4_HZ * 2f32.powf((note - A4_MIDI) / 12.0)
}

/// Shift a frequency by a (possibly fractional) number of semitones.
#[inline]
pub fn shift_semitones(freq_hz: f32, semitones: f32) -> f32 {
    freq_hz * 2f32.powf(semitones / 12.0)
}
