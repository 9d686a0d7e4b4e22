use std::f32::consts::TAU;

#[inline]
pub fn wrap_0_tau(x: f32) -> f32 {
    x.rem_euclid(TAU)
}

/// Advance an oscillator phase by `rate_hz * dt_sec` cycles, wrapped to [0, TAU).
#[inline]
pub fn advance(phase: f32, rate_hz: f32, dt_sec: f32) -> f32 {
    if !rate_hz.is_finite() || !dt_sec.is_finite() || dt_sec <= 0.0 {
        return wrap_0_tau(phase);
    }
    wrap_0_tau(phase + TAU * rate_hz * dt_sec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn wrap_0_tau_in_range() {
        let values = [-10.0 * TAU, -TAU, -PI, -0.1, 0.0, PI, TAU, 3.5 * TAU];
        for v in values {
            let w = wrap_0_tau(v);
            assert!((0.0..TAU).contains(&w), "wrap_0_tau out of range: {w}");
        }
    }

    #[test]
    fn advance_accumulates_and_wraps() {
        let p = advance(0.0, 5.0, 0.05);
        assert!((p - 0.25 * TAU).abs() < 1e-5, "quarter cycle: {p}");
        let wrapped = advance(0.9 * TAU, 1.0, 0.2);
        assert!((wrapped - 0.1 * TAU).abs() < 1e-4, "wrapped: {wrapped}");
    }

    #[test]
    fn advance_ignores_non_positive_dt() {
        assert_eq!(advance(1.0, 5.0, 0.0), 1.0);
        assert_eq!(advance(1.0, 5.0, -0.1), 1.0);
        assert_eq!(advance(1.0, f32::NAN, 0.1), 1.0);
    }
}
