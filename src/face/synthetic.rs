//! Seeded synthetic face stream used by the `demo` command and benches.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::sample::{Blendshapes, FaceSample, Orientation};

/// Mouth gestures the stream cycles through, as (jaw, smile, pucker, funnel).
const GESTURES: [(f32, f32, f32, f32); 5] = [
    (0.70, 0.05, 0.00, 0.10), // open "ah"
    (0.25, 0.60, 0.00, 0.00), // spread "ee"
    (0.20, 0.00, 0.75, 0.30), // rounded "oo"
    (0.45, 0.10, 0.20, 0.50), // "oh"
    (0.10, 0.00, 0.00, 0.00), // rest
];

#[derive(Debug, Clone)]
pub struct SyntheticFace {
    rng: StdRng,
    sweep_hz: f64,
    gesture_sec: f64,
    jitter: f32,
}

impl SyntheticFace {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            sweep_hz: 0.15,
            gesture_sec: 1.2,
            jitter: 0.02,
        }
    }

    pub fn with_sweep_hz(mut self, hz: f64) -> Self {
        self.sweep_hz = hz.max(0.0);
        self
    }

    /// Sample at absolute time `t` seconds. Head pitch sweeps slowly through
    /// [-1, 1]; the mouth crossfades between gestures.
    pub fn sample_at(&mut self, t: f64) -> FaceSample {
        let t = t.max(0.0);
        let pitch = (std::f64::consts::TAU * self.sweep_hz * t).sin() as f32;
        let yaw = 0.3 * (std::f64::consts::TAU * self.sweep_hz * 0.37 * t).sin() as f32;

        let pos = t / self.gesture_sec;
        let idx = pos.floor() as usize % GESTURES.len();
        let next = (idx + 1) % GESTURES.len();
        let frac = (pos.fract() as f32 * 2.0 - 1.0).clamp(0.0, 1.0);
        let lerp = |a: f32, b: f32| a + (b - a) * frac;
        let (j0, s0, p0, f0) = GESTURES[idx];
        let (j1, s1, p1, f1) = GESTURES[next];

        let jaw = self.noisy(lerp(j0, j1));
        let smile = self.noisy(lerp(s0, s1));
        let pucker = self.noisy(lerp(p0, p1));
        let funnel = self.noisy(lerp(f0, f1));

        FaceSample {
            orientation: Orientation {
                yaw: self.noisy_signed(yaw),
                pitch: self.noisy_signed(pitch),
                roll: 0.0,
            },
            blendshapes: Blendshapes {
                jaw_open: jaw,
                mouth_smile_left: smile,
                mouth_smile_right: smile,
                mouth_pucker: pucker,
                mouth_funnel: funnel,
                mouth_lower_down_left: jaw * 0.5,
                mouth_lower_down_right: jaw * 0.5,
                ..Blendshapes::default()
            },
            camera: None,
        }
    }

    fn noisy(&mut self, v: f32) -> f32 {
        (v + self.rng.random_range(-self.jitter..=self.jitter)).clamp(0.0, 1.0)
    }

    fn noisy_signed(&mut self, v: f32) -> f32 {
        (v + self.rng.random_range(-self.jitter..=self.jitter)).clamp(-1.0, 1.0)
    }
}
