use std::sync::Arc;

use super::controls::VoiceControls;
use super::glide::Glissando;
use super::mixer::VoiceId;
use super::vibrato::Vibrato;

/// Lifecycle of one pooled voice. Times are absolute seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum VoicePhase {
    #[default]
    Idle,
    Scheduled { at: f64 },
    Starting { until: f64 },
    Active,
    Stopping { until: f64 },
}

impl VoicePhase {
    pub fn is_sounding(self) -> bool {
        matches!(
            self,
            VoicePhase::Starting { .. } | VoicePhase::Active | VoicePhase::Stopping { .. }
        )
    }
}

#[derive(Debug)]
pub struct VoiceState {
    id: VoiceId,
    controls: Arc<VoiceControls>,
    pub(crate) current_frequency: Option<f32>,
    pub(crate) last_target: Option<f32>,
    pub(crate) glissando: Glissando,
    pub(crate) vibrato: Vibrato,
    pub(crate) phase: VoicePhase,
}

impl VoiceState {
    pub fn new(id: VoiceId, controls: Arc<VoiceControls>) -> Self {
        Self {
            id,
            controls,
            current_frequency: None,
            last_target: None,
            glissando: Glissando::default(),
            vibrato: Vibrato::default(),
            phase: VoicePhase::Idle,
        }
    }

    pub fn id(&self) -> VoiceId {
        self.id
    }

    pub fn controls(&self) -> &Arc<VoiceControls> {
        &self.controls
    }

    pub fn current_frequency(&self) -> Option<f32> {
        self.current_frequency
    }

    pub fn last_target(&self) -> Option<f32> {
        self.last_target
    }

    pub fn glissando(&self) -> &Glissando {
        &self.glissando
    }

    pub fn vibrato(&self) -> &Vibrato {
        &self.vibrato
    }

    pub fn phase(&self) -> VoicePhase {
        self.phase
    }

    pub(crate) fn begin_start(&mut self, now: f64, fade_in_sec: f64) {
        self.controls.start();
        self.controls.fade_to(1.0, fade_in_sec as f32);
        self.phase = VoicePhase::Starting {
            until: now + fade_in_sec,
        };
    }

    /// Returns false when the voice never sounded and can be dropped at once.
    pub(crate) fn begin_stop(&mut self, now: f64, fade_out_sec: f64) -> bool {
        match self.phase {
            VoicePhase::Idle | VoicePhase::Scheduled { .. } => {
                self.controls.stop();
                self.phase = VoicePhase::Idle;
                false
            }
            VoicePhase::Stopping { .. } => true,
            VoicePhase::Starting { .. } | VoicePhase::Active => {
                self.controls.fade_to(0.0, fade_out_sec as f32);
                self.phase = VoicePhase::Stopping {
                    until: now + fade_out_sec,
                };
                true
            }
        }
    }

    /// Advance timed transitions. Returns true when a fade-out just finished.
    pub(crate) fn advance(&mut self, now: f64, fade_in_sec: f64) -> bool {
        loop {
            match self.phase {
                VoicePhase::Scheduled { at } if now >= at => self.begin_start(at, fade_in_sec),
                VoicePhase::Starting { until } if now >= until => {
                    self.phase = VoicePhase::Active;
                    return false;
                }
                VoicePhase::Stopping { until } if now >= until => {
                    self.controls.stop();
                    self.phase = VoicePhase::Idle;
                    return true;
                }
                _ => return false,
            }
        }
    }
}
