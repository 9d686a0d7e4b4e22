use crate::core::phase;
use crate::core::pitch::shift_semitones;

/// Sinusoidal pitch wobble that only engages after `activation_time`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vibrato {
    activation_time: f64,
    phase: f32,
}

impl Vibrato {
    pub fn hold_until(&mut self, time: f64) {
        self.activation_time = time;
    }

    pub fn activation_time(&self) -> f64 {
        self.activation_time
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn is_engaged(&self, now: f64) -> bool {
        now > self.activation_time
    }

    /// Modulate `target_hz` by `sin(phase) * amount% * attenuation` semitones,
    /// then advance the phase by one frame.
    pub fn apply(
        &mut self,
        target_hz: f32,
        amount_percent: f32,
        attenuation: f32,
        rate_hz: f32,
        dt_sec: f32,
    ) -> f32 {
        let amount = if amount_percent.is_finite() {
            amount_percent.max(0.0)
        } else {
            0.0
        };
        let offset = self.phase.sin() * amount * attenuation / 100.0;
        self.phase = phase::advance(self.phase, rate_hz.max(0.0), dt_sec);
        shift_semitones(target_hz, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, TAU};

    #[test]
    fn waits_for_activation() {
        let mut v = Vibrato::default();
        v.hold_until(1.5);
        assert!(!v.is_engaged(1.5));
        assert!(v.is_engaged(1.5001));
    }

    #[test]
    fn full_amount_at_peak_is_one_semitone() {
        let mut v = Vibrato {
            activation_time: 0.0,
            phase: FRAC_PI_2,
        };
        let hz = v.apply(440.0, 100.0, 1.0, 0.0, 0.0);
        assert!((hz - 440.0 * 2f32.powf(1.0 / 12.0)).abs() < 1e-3);
    }

    #[test]
    fn phase_wraps() {
        let mut v = Vibrato::default();
        for _ in 0..1000 {
            v.apply(220.0, 50.0, 0.4, 5.5, 1.0 / 60.0);
            assert!((0.0..TAU).contains(&v.phase()));
        }
    }

    #[test]
    fn zero_amount_leaves_target() {
        let mut v = Vibrato::default();
        v.apply(1.0, 0.0, 1.0, 5.0, 0.1);
        assert_eq!(v.apply(330.0, 0.0, 1.0, 5.0, 0.1), 330.0);
    }
}
