use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use crate::face::VocalTractParams;

/// Target gain and ramp length requested by the scheduler. `seq` changes on
/// every new request so the render side can tell a fresh fade from a stale one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeRequest {
    pub target_gain: f32,
    pub duration_sec: f32,
    pub seq: u64,
}

/// Everything the render side needs for one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSnapshot {
    pub frequency: f32,
    pub vocal_tract: VocalTractParams,
    pub nasality: f32,
    pub tenseness: f32,
    pub running: bool,
}

/// Lock-free parameter block shared between the scheduler (single writer)
/// and a voice engine (reader). Floats are stored as bit patterns.
#[derive(Debug, Default)]
pub struct VoiceControls {
    frequency_bits: AtomicU32,
    tongue_position_bits: AtomicU32,
    tongue_diameter_bits: AtomicU32,
    lip_open_bits: AtomicU32,
    jaw_open_bits: AtomicU32,
    nasality_bits: AtomicU32,
    tenseness_bits: AtomicU32,
    running: AtomicBool,
    fade_target_bits: AtomicU32,
    fade_duration_bits: AtomicU32,
    fade_seq: AtomicU64,
}

#[inline]
fn load_f32(cell: &AtomicU32) -> f32 {
    f32::from_bits(cell.load(Ordering::Relaxed))
}

#[inline]
fn store_f32(cell: &AtomicU32, value: f32) {
    cell.store(value.to_bits(), Ordering::Relaxed);
}

impl VoiceControls {
    pub fn new(nasality: f32, tenseness: f32) -> Self {
        let controls = Self::default();
        controls.set_nasality(nasality);
        controls.set_tenseness(tenseness);
        controls
    }

    pub fn set_frequency(&self, hz: f32) {
        if hz.is_finite() && hz >= 0.0 {
            store_f32(&self.frequency_bits, hz);
        }
    }

    pub fn frequency(&self) -> f32 {
        load_f32(&self.frequency_bits)
    }

    pub fn set_vocal_tract(&self, params: VocalTractParams) {
        store_f32(&self.tongue_position_bits, params.tongue_position);
        store_f32(&self.tongue_diameter_bits, params.tongue_diameter);
        store_f32(&self.lip_open_bits, params.lip_open);
        store_f32(&self.jaw_open_bits, params.jaw_open);
    }

    pub fn vocal_tract(&self) -> VocalTractParams {
        VocalTractParams {
            tongue_position: load_f32(&self.tongue_position_bits),
            tongue_diameter: load_f32(&self.tongue_diameter_bits),
            lip_open: load_f32(&self.lip_open_bits),
            jaw_open: load_f32(&self.jaw_open_bits),
        }
    }

    pub fn set_nasality(&self, v: f32) {
        store_f32(&self.nasality_bits, v.clamp(0.0, 1.0));
    }

    pub fn set_tenseness(&self, v: f32) {
        store_f32(&self.tenseness_bits, v.clamp(0.0, 1.0));
    }

    /// Mark the voice as sounding. Gain stays where the last fade left it.
    pub fn start(&self) {
        self.running.store(true, Ordering::Release);
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn fade_to(&self, target_gain: f32, duration_sec: f32) {
        store_f32(&self.fade_target_bits, target_gain.clamp(0.0, 1.0));
        store_f32(&self.fade_duration_bits, duration_sec.max(0.0));
        self.fade_seq.fetch_add(1, Ordering::Release);
    }

    pub fn fade(&self) -> FadeRequest {
        let seq = self.fade_seq.load(Ordering::Acquire);
        FadeRequest {
            target_gain: load_f32(&self.fade_target_bits),
            duration_sec: load_f32(&self.fade_duration_bits),
            seq,
        }
    }

    pub fn snapshot(&self) -> VoiceSnapshot {
        VoiceSnapshot {
            frequency: self.frequency(),
            vocal_tract: self.vocal_tract(),
            nasality: load_f32(&self.nasality_bits),
            tenseness: load_f32(&self.tenseness_bits),
            running: self.is_running(),
        }
    }
}

/// Render-side gain follower for [`FadeRequest`]s.
#[derive(Debug, Clone, Default)]
pub struct GainRamp {
    gain: f32,
    step: f32,
    target: f32,
    remaining: u32,
    seen_seq: u64,
}

impl GainRamp {
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Pick up a new fade request, if any. Called once per block.
    pub fn sync(&mut self, fade: FadeRequest, sample_rate: f32) {
        if fade.seq == self.seen_seq {
            return;
        }
        self.seen_seq = fade.seq;
        self.target = fade.target_gain;
        let samples = (fade.duration_sec * sample_rate.max(1.0)).round();
        if samples < 1.0 {
            self.gain = self.target;
            self.remaining = 0;
            self.step = 0.0;
        } else {
            self.remaining = samples as u32;
            self.step = (self.target - self.gain) / samples;
        }
    }

    #[inline]
    pub fn tick(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.gain = if self.remaining == 0 {
                self.target
            } else {
                self.gain + self.step
            };
        }
        self.gain
    }

    pub fn is_silent(&self) -> bool {
        self.remaining == 0 && self.gain <= 0.0
    }

    pub fn reset(&mut self) {
        self.gain = 0.0;
        self.remaining = 0;
        self.step = 0.0;
        self.target = 0.0;
    }
}
