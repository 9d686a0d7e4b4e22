/// Linear frequency slide between two targets.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Glissando {
    start_time: f64,
    end_time: f64,
    start_frequency: f32,
    target_frequency: f32,
    active: bool,
}

impl Glissando {
    pub fn begin(&mut self, now: f64, duration_sec: f64, from_hz: f32, to_hz: f32) {
        let duration_sec = if duration_sec.is_finite() {
            duration_sec.max(0.0)
        } else {
            0.0
        };
        self.start_time = now;
        self.end_time = now + duration_sec;
        self.start_frequency = from_hz;
        self.target_frequency = to_hz;
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn target_frequency(&self) -> f32 {
        self.target_frequency
    }

    pub fn progress(&self, now: f64) -> f64 {
        let span = self.end_time - self.start_time;
        if span <= 0.0 || now >= self.end_time {
            return 1.0;
        }
        ((now - self.start_time) / span).clamp(0.0, 1.0)
    }

    /// Frequency at `now`; the slide switches itself off once it arrives.
    pub fn sample(&mut self, now: f64) -> f32 {
        let t = self.progress(now);
        if t >= 1.0 {
            self.active = false;
            return self.target_frequency;
        }
        let from = self.start_frequency as f64;
        let to = self.target_frequency as f64;
        (from + (to - from) * t) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_then_completes() {
        let mut g = Glissando::default();
        g.begin(1.0, 0.2, 200.0, 400.0);
        assert_eq!(g.sample(1.0), 200.0);
        assert!((g.sample(1.1) - 300.0).abs() < 1e-3);
        assert!(g.is_active());
        assert_eq!(g.sample(1.25), 400.0);
        assert!(!g.is_active());
    }

    #[test]
    fn zero_duration_is_immediate() {
        let mut g = Glissando::default();
        g.begin(3.0, 0.0, 100.0, 150.0);
        assert_eq!(g.sample(3.0), 150.0);
        assert!(!g.is_active());
    }

    #[test]
    fn progress_is_clamped_before_start() {
        let mut g = Glissando::default();
        g.begin(2.0, 1.0, 100.0, 200.0);
        assert_eq!(g.progress(1.0), 0.0);
        g.begin(2.0, f64::NAN, 100.0, 200.0);
        assert_eq!(g.end_time(), 2.0);
    }
}
