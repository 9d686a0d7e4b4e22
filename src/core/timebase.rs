/// Clock shared by the offline renderer and the frame driver: audio runs at
/// `fs`, control frames are `hop` samples apart.
#[derive(Clone, Copy, Debug)]
pub struct Timebase {
    pub fs: f32,
    pub hop: usize,
}

impl Timebase {
    /// Build a timebase whose hop approximates the given control rate.
    pub fn from_frame_rate(fs: f32, frame_rate_hz: f32) -> Self {
        let fs = if fs.is_finite() && fs > 0.0 { fs } else { 48_000.0 };
        let rate = if frame_rate_hz.is_finite() && frame_rate_hz > 0.0 {
            frame_rate_hz
        } else {
            60.0
        };
        let hop = ((fs / rate).round() as usize).max(1);
        Self { fs, hop }
    }

    pub fn sample_to_sec(&self, s: u64) -> f64 {
        s as f64 / self.fs as f64
    }

    pub fn sec_to_sample(&self, sec: f64) -> u64 {
        if sec <= 0.0 {
            return 0;
        }
        (sec * self.fs as f64).round() as u64
    }

    pub fn frame_start_sample(&self, frame_idx: u64) -> u64 {
        frame_idx.saturating_mul(self.hop as u64)
    }

    pub fn frame_start_sec(&self, frame_idx: u64) -> f64 {
        self.sample_to_sec(self.frame_start_sample(frame_idx))
    }

    pub fn frame_dt_sec(&self) -> f64 {
        self.hop as f64 / self.fs as f64
    }
}

#[cfg(test)]
mod tests {
    use super::Timebase;

    #[test]
    fn sec_sample_round_trip() {
        let tb = Timebase {
            fs: 48_000.0,
            hop: 800,
        };
        let s = 12_345;
        let sec = tb.sample_to_sec(s);
        assert_eq!(tb.sec_to_sample(sec), s);
    }

    #[test]
    fn frame_rate_sets_hop() {
        let tb = Timebase::from_frame_rate(48_000.0, 60.0);
        assert_eq!(tb.hop, 800);
        assert!((tb.frame_dt_sec() - 1.0 / 60.0).abs() < 1e-9);
        assert!((tb.frame_start_sec(3) - 0.05).abs() < 1e-9);
    }

    #[test]
    fn invalid_rates_fall_back() {
        let tb = Timebase::from_frame_rate(f32::NAN, 0.0);
        assert_eq!(tb.fs, 48_000.0);
        assert_eq!(tb.hop, 800);
    }
}
