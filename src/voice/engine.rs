use std::f32::consts::TAU;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::controls::{GainRamp, VoiceControls};
use crate::core::phase::wrap_0_tau;

pub const MAX_HARMONICS: usize = 64;

/// A synthesizer voice driven through a shared [`VoiceControls`] block.
pub trait VoiceEngine: Send + fmt::Debug {
    fn controls(&self) -> Arc<VoiceControls>;
    /// Mix one block into `out` (additive).
    fn render(&mut self, out: &mut [f32], sample_rate: f32);
    fn kind(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineSettingsError {
    #[error("{name} must be within [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f32 },
    #[error("harmonics must be within 1..={MAX_HARMONICS}, got {0}")]
    Harmonics(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineSettings {
    VocalTract {
        #[serde(default)]
        nasality: f32,
        #[serde(default = "default_tenseness")]
        tenseness: f32,
    },
    OscillatorBank {
        #[serde(default = "default_harmonics")]
        harmonics: usize,
        #[serde(default = "default_brightness")]
        brightness: f32,
    },
}

fn default_tenseness() -> f32 {
    0.6
}

fn default_harmonics() -> usize {
    16
}

fn default_brightness() -> f32 {
    0.5
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings::OscillatorBank {
            harmonics: default_harmonics(),
            brightness: default_brightness(),
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<(), EngineSettingsError> {
        let unit = |name: &'static str, value: f32| {
            if value.is_finite() && (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(EngineSettingsError::OutOfUnitRange { name, value })
            }
        };
        match *self {
            EngineSettings::VocalTract {
                nasality,
                tenseness,
            } => {
                unit("nasality", nasality)?;
                unit("tenseness", tenseness)
            }
            EngineSettings::OscillatorBank {
                harmonics,
                brightness,
            } => {
                if harmonics == 0 || harmonics > MAX_HARMONICS {
                    return Err(EngineSettingsError::Harmonics(harmonics));
                }
                unit("brightness", brightness)
            }
        }
    }

    pub fn create_engine(&self) -> Box<dyn VoiceEngine> {
        match *self {
            EngineSettings::VocalTract {
                nasality,
                tenseness,
            } => Box::new(VocalTractVoice::new(nasality, tenseness)),
            EngineSettings::OscillatorBank {
                harmonics,
                brightness,
            } => Box::new(OscillatorBankVoice::new(harmonics, brightness)),
        }
    }
}

/// Control surface for an external vocal-tract synthesizer. The DSP lives
/// elsewhere, so this engine renders nothing.
#[derive(Debug)]
pub struct VocalTractVoice {
    controls: Arc<VoiceControls>,
}

impl VocalTractVoice {
    pub fn new(nasality: f32, tenseness: f32) -> Self {
        Self {
            controls: Arc::new(VoiceControls::new(nasality, tenseness)),
        }
    }
}

impl VoiceEngine for VocalTractVoice {
    fn controls(&self) -> Arc<VoiceControls> {
        Arc::clone(&self.controls)
    }

    fn render(&mut self, _out: &mut [f32], _sample_rate: f32) {}

    fn kind(&self) -> &'static str {
        "vocal_tract"
    }
}

/// Additive harmonic voice. Spectral tilt follows `brightness` and lip
/// opening; a single broad peak tracks tongue position as a rough second
/// formant.
#[derive(Debug)]
pub struct OscillatorBankVoice {
    controls: Arc<VoiceControls>,
    brightness: f32,
    phases: Vec<f32>,
    amps: Vec<f32>,
    ramp: GainRamp,
}

impl OscillatorBankVoice {
    pub fn new(harmonics: usize, brightness: f32) -> Self {
        let harmonics = harmonics.clamp(1, MAX_HARMONICS);
        Self {
            controls: Arc::new(VoiceControls::new(0.0, 0.5)),
            brightness: brightness.clamp(0.0, 1.0),
            phases: vec![0.0; harmonics],
            amps: vec![0.0; harmonics],
            ramp: GainRamp::default(),
        }
    }

    fn update_amps(&mut self, f0: f32, lip_open: f32, tongue_position: f32, nyquist: f32) {
        let tilt = 2.5 - 1.5 * self.brightness - 0.4 * (lip_open / 2.0).clamp(0.0, 1.0);
        let f2 = 800.0 + 1600.0 * tongue_position.clamp(0.0, 1.0);
        let mut total = 0.0;
        for (k, amp) in self.amps.iter_mut().enumerate() {
            let n = (k + 1) as f32;
            let f = f0 * n;
            if f >= nyquist {
                *amp = 0.0;
                continue;
            }
            let d = (f - f2) / 300.0;
            *amp = n.powf(-tilt) * (1.0 + (-d * d).exp());
            total += *amp;
        }
        if total > 0.0 {
            for amp in &mut self.amps {
                *amp /= total;
            }
        }
    }
}

impl VoiceEngine for OscillatorBankVoice {
    fn controls(&self) -> Arc<VoiceControls> {
        Arc::clone(&self.controls)
    }

    fn render(&mut self, out: &mut [f32], sample_rate: f32) {
        let snap = self.controls.snapshot();
        if !snap.running {
            self.ramp.reset();
            return;
        }
        self.ramp.sync(self.controls.fade(), sample_rate);
        if snap.frequency <= 0.0 || sample_rate <= 0.0 {
            return;
        }
        self.update_amps(
            snap.frequency,
            snap.vocal_tract.lip_open,
            snap.vocal_tract.tongue_position,
            sample_rate * 0.5,
        );
        let inc = TAU * snap.frequency / sample_rate;
        for sample in out.iter_mut() {
            let gain = self.ramp.tick();
            let mut acc = 0.0;
            for (k, (phase, amp)) in self.phases.iter_mut().zip(&self.amps).enumerate() {
                if *amp > 0.0 {
                    acc += phase.sin() * amp;
                }
                *phase = wrap_0_tau(*phase + inc * (k + 1) as f32);
            }
            *sample += acc * gain;
        }
    }

    fn kind(&self) -> &'static str {
        "oscillator_bank"
    }
}
