use facechoir::music::{ChordType, NoteName, PitchClassSet, QuantizationTable, ScaleModel, quantize};
use proptest::prelude::*;

fn table(mask: u16) -> QuantizationTable {
    QuantizationTable::build(PitchClassSet::from_mask(mask))
}

proptest! {
    #[test]
    fn quantize_is_monotone(
        mask in 1u16..0x1000,
        lo in 0u8..=127,
        width in 0u8..=48,
        a in -2.0f32..2.0,
        b in -2.0f32..2.0,
    ) {
        let hi = lo.saturating_add(width).min(127);
        let t = table(mask);
        let (x, y) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(quantize(x, -1.0..=1.0, lo, hi, &t) <= quantize(y, -1.0..=1.0, lo, hi, &t));
    }

    #[test]
    fn bounds_hit_first_and_last_note(mask in 1u16..0x1000, lo in 0u8..=100, width in 0u8..=27) {
        let hi = lo + width;
        let t = table(mask);
        let notes = t.in_range(lo, hi).to_vec();
        prop_assume!(!notes.is_empty());
        prop_assert_eq!(quantize(-1.0, -1.0..=1.0, lo, hi, &t), notes[0]);
        prop_assert_eq!(quantize(1.0, -1.0..=1.0, lo, hi, &t), *notes.last().unwrap());
        prop_assert_eq!(quantize(-7.5, -1.0..=1.0, lo, hi, &t), notes[0]);
        prop_assert_eq!(quantize(f32::INFINITY, -1.0..=1.0, lo, hi, &t), *notes.last().unwrap());
    }

    #[test]
    fn result_is_a_playable_note_or_lowest(
        mask in 0u16..0x1000,
        lo in 0u8..=127,
        width in 0u8..=24,
        raw in proptest::num::f32::ANY,
    ) {
        let hi = lo.saturating_add(width).min(127);
        let t = table(mask);
        let note = quantize(raw, -1.0..=1.0, lo, hi, &t);
        if t.in_range(lo, hi).is_empty() {
            prop_assert_eq!(note, lo);
        } else {
            prop_assert!(t.in_range(lo, hi).contains(&note));
        }
    }

    #[test]
    fn mask_round_trips(mask in 0u16..0x1000) {
        let set = PitchClassSet::from_mask(mask);
        prop_assert_eq!(PitchClassSet::from_pitch_classes(set.pitch_classes()), set);
        prop_assert_eq!(set.mask(), mask);
    }

    #[test]
    fn double_toggle_restores(pc in 0u8..12, key in 0u8..12) {
        let mut model = ScaleModel::default();
        model.set_key_and_chord(NoteName::from_pitch_class(key), ChordType::Minor);
        let before = model.current_scale_pitch_classes();
        model.toggle_pitch_class(pc);
        prop_assert_ne!(model.current_scale_pitch_classes(), before);
        model.toggle_pitch_class(pc);
        prop_assert_eq!(model.current_scale_pitch_classes(), before);
        let published = model.table();
        let rebuilt = QuantizationTable::build(before);
        prop_assert_eq!(published.notes(), rebuilt.notes());
    }
}

#[test]
fn empty_window_falls_back_to_lowest() {
    let t = table(0b1); // C only
    assert_eq!(quantize(0.5, -1.0..=1.0, 61, 70, &t), 61);
    let empty = table(0);
    assert!(empty.is_empty());
    assert_eq!(quantize(0.0, -1.0..=1.0, 40, 80, &empty), 40);
}

#[test]
fn degenerate_input_range_maps_to_lowest_note() {
    let t = table(0x0FFF);
    assert_eq!(quantize(0.3, 0.5..=0.5, 60, 72, &t), 60);
    assert_eq!(quantize(f32::NAN, -1.0..=1.0, 60, 72, &t), 60);
}
