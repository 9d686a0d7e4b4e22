use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::engine::EngineSettings;
use super::mixer::{Mixer, VoiceId};
use super::state::{VoicePhase, VoiceState};
use crate::core::pitch::midi_to_hz;
use crate::face::VocalTractParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub fade_in_sec: f64,
    pub fade_out_sec: f64,
    pub start_stagger_sec: f64,
    pub retarget_threshold_hz: f32,
    pub harmony_vibrato_attenuation: f32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fade_in_sec: 0.1,
            fade_out_sec: 0.1,
            start_stagger_sec: 0.1,
            retarget_threshold_hz: 0.1,
            harmony_vibrato_attenuation: 0.4,
        }
    }
}

impl SchedulerConfig {
    fn sanitized(mut self) -> Self {
        let non_negative = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        self.fade_in_sec = non_negative(self.fade_in_sec);
        self.fade_out_sec = non_negative(self.fade_out_sec);
        self.start_stagger_sec = non_negative(self.start_stagger_sec);
        if !self.retarget_threshold_hz.is_finite() || self.retarget_threshold_hz < 0.0 {
            self.retarget_threshold_hz = 0.0;
        }
        if !self.harmony_vibrato_attenuation.is_finite() {
            self.harmony_vibrato_attenuation = 0.0;
        }
        self
    }
}

/// Owns the voice pool and drives every voice once per frame.
///
/// Pooled voices are indexed by harmony position (0 = lead). Voices removed
/// by a shrink keep fading on a retiring list and are detached from the
/// mixer only once their fade-out has completed.
#[derive(Debug)]
pub struct VoiceScheduler<M: Mixer> {
    mixer: M,
    engine: EngineSettings,
    config: SchedulerConfig,
    voices: Vec<VoiceState>,
    retiring: Vec<VoiceState>,
    playing: bool,
    next_id: u64,
    last_frame_time: Option<f64>,
}

impl<M: Mixer> VoiceScheduler<M> {
    pub fn new(mixer: M, engine: EngineSettings, config: SchedulerConfig) -> Self {
        Self {
            mixer,
            engine,
            config: config.sanitized(),
            voices: Vec::new(),
            retiring: Vec::new(),
            playing: false,
            next_id: 0,
            last_frame_time: None,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn engine_settings(&self) -> &EngineSettings {
        &self.engine
    }

    pub fn mixer(&self) -> &M {
        &self.mixer
    }

    pub fn mixer_mut(&mut self) -> &mut M {
        &mut self.mixer
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn retiring_count(&self) -> usize {
        self.retiring.len()
    }

    pub fn voices(&self) -> &[VoiceState] {
        &self.voices
    }

    /// Current frequency per pooled voice; 0 for a voice with no target yet.
    pub fn voice_frequencies(&self) -> Vec<f32> {
        self.voices
            .iter()
            .map(|v| v.current_frequency.unwrap_or(0.0))
            .collect()
    }

    pub fn voice_phases(&self) -> Vec<VoicePhase> {
        self.voices.iter().map(|v| v.phase).collect()
    }

    fn spawn_voice(&mut self) -> VoiceState {
        let id = VoiceId(self.next_id);
        self.next_id += 1;
        let engine = self.engine.create_engine();
        let controls = engine.controls();
        self.mixer.add_input(id, engine);
        VoiceState::new(id, controls)
    }

    fn retire(&mut self, mut voice: VoiceState, now: f64) {
        if voice.begin_stop(now, self.config.fade_out_sec) {
            self.retiring.push(voice);
        } else {
            self.mixer.remove_input(voice.id());
        }
    }

    pub fn set_voice_count(&mut self, count: usize, now: f64) {
        let previous = self.voices.len();
        if count == previous {
            return;
        }
        if count > previous {
            for _ in previous..count {
                let mut voice = self.spawn_voice();
                if self.playing {
                    voice.begin_start(now, self.config.fade_in_sec);
                }
                self.voices.push(voice);
            }
        } else {
            let excess: Vec<VoiceState> = self.voices.drain(count..).collect();
            for voice in excess {
                self.retire(voice, now);
            }
        }
        info!(
            from = previous,
            to = count,
            retiring = self.retiring.len(),
            "voice count changed"
        );
    }

    /// Swap the engine type. Existing voices fade out and fresh ones replace
    /// them at the same pool size.
    pub fn set_engine(&mut self, engine: EngineSettings, now: f64) {
        if engine == self.engine {
            return;
        }
        self.engine = engine;
        let count = self.voices.len();
        let old: Vec<VoiceState> = self.voices.drain(..).collect();
        for voice in old {
            self.retire(voice, now);
        }
        self.set_voice_count(count, now);
        debug!(kind = ?self.engine, "voice engine replaced");
    }

    /// Start every pooled voice, voice `i` delayed by `i * stagger_sec`.
    pub fn start_playing(&mut self, now: f64, stagger_sec: f64) {
        let stagger = if stagger_sec.is_finite() {
            stagger_sec.max(0.0)
        } else {
            0.0
        };
        self.playing = true;
        for (i, voice) in self.voices.iter_mut().enumerate() {
            if matches!(voice.phase, VoicePhase::Starting { .. } | VoicePhase::Active) {
                continue;
            }
            let at = now + stagger * i as f64;
            if at <= now {
                voice.begin_start(now, self.config.fade_in_sec);
            } else {
                voice.phase = VoicePhase::Scheduled { at };
            }
        }
        info!(voices = self.voices.len(), stagger_sec = stagger, "playback started");
    }

    pub fn stop_playing(&mut self, now: f64) {
        self.playing = false;
        for voice in &mut self.voices {
            voice.begin_stop(now, self.config.fade_out_sec);
        }
        info!(voices = self.voices.len(), "playback stopped");
    }

    /// Advance timed lifecycle transitions without touching pitch.
    pub fn tick(&mut self, now: f64) {
        let fade_in = self.config.fade_in_sec;
        for voice in &mut self.voices {
            voice.advance(now, fade_in);
        }
        let mut finished = Vec::new();
        self.retiring.retain_mut(|voice| {
            if voice.advance(now, fade_in) {
                finished.push(voice.id());
                false
            } else {
                true
            }
        });
        for id in finished {
            self.mixer.remove_input(id);
            debug!(%id, "retired voice detached");
        }
    }

    pub fn update_frame(
        &mut self,
        notes: &[u8],
        vocal_tract: VocalTractParams,
        glissando_ms: f32,
        vibrato_amount_percent: f32,
        vibrato_rate_hz: f32,
        now: f64,
    ) {
        self.tick(now);
        let dt = match self.last_frame_time {
            Some(prev) if now > prev => (now - prev) as f32,
            _ => 0.0,
        };
        self.last_frame_time = Some(now);
        let glide_sec = if glissando_ms.is_finite() {
            glissando_ms.max(0.0) as f64 / 1000.0
        } else {
            0.0
        };
        let threshold = self.config.retarget_threshold_hz;
        let harmony_attenuation = self.config.harmony_vibrato_attenuation;

        for (i, voice) in self.voices.iter_mut().enumerate() {
            voice.controls().set_vocal_tract(vocal_tract);
            let Some(&note) = notes.get(i).or(notes.last()) else {
                continue;
            };
            let target = midi_to_hz(note as f32);

            match (voice.last_target, voice.current_frequency) {
                (Some(last), Some(current)) => {
                    if (target - last).abs() > threshold {
                        voice.glissando.begin(now, glide_sec, current, target);
                        voice.vibrato.hold_until(voice.glissando.end_time());
                        voice.last_target = Some(target);
                    }
                }
                _ => {
                    voice.current_frequency = Some(target);
                    voice.last_target = Some(target);
                    voice.vibrato.hold_until(now);
                }
            }
            let target = voice.last_target.unwrap_or(target);

            let freq = if voice.glissando.is_active() {
                voice.glissando.sample(now)
            } else if voice.vibrato.is_engaged(now) {
                let attenuation = if i == 0 { 1.0 } else { harmony_attenuation };
                voice.vibrato.apply(
                    target,
                    vibrato_amount_percent,
                    attenuation,
                    vibrato_rate_hz,
                    dt,
                )
            } else {
                target
            };
            voice.current_frequency = Some(freq);
            voice.controls().set_frequency(freq);
        }
    }
}
