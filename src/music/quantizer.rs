use std::ops::RangeInclusive;

use super::scale_model::QuantizationTable;

/// Map `raw` from `input_range` onto the playable notes in
/// `[lowest_note, highest_note]`.
///
/// Pure and total: out-of-range and NaN input clamp to the range, and a window
/// with no playable note returns `lowest_note`.
pub fn quantize(
    raw: f32,
    input_range: RangeInclusive<f32>,
    lowest_note: u8,
    highest_note: u8,
    table: &QuantizationTable,
) -> u8 {
    let candidates = table.in_range(lowest_note, highest_note);
    if candidates.is_empty() {
        return lowest_note;
    }
    let t = normalize(raw, &input_range);
    let last = (candidates.len() - 1) as f32;
    let idx = (t * last).round() as usize;
    candidates[idx.min(candidates.len() - 1)]
}

/// Clamp `raw` into `range` and rescale to [0, 1]. NaN maps to 0.
pub fn normalize(raw: f32, range: &RangeInclusive<f32>) -> f32 {
    let (lo, hi) = (*range.start(), *range.end());
    let span = hi - lo;
    if raw.is_nan() || !span.is_finite() || span <= 0.0 {
        return 0.0;
    }
    ((raw.clamp(lo, hi) - lo) / span).clamp(0.0, 1.0)
}
