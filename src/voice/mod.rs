//! Voice pool, per-voice pitch motion and the synth/mixer surface.

pub mod controls;
pub mod engine;
pub mod glide;
pub mod mixer;
pub mod scheduler;
pub mod state;
pub mod vibrato;

pub use controls::{FadeRequest, GainRamp, VoiceControls, VoiceSnapshot};
pub use engine::{
    EngineSettings, EngineSettingsError, OscillatorBankVoice, VocalTractVoice, VoiceEngine,
};
pub use glide::Glissando;
pub use mixer::{ChannelMixer, MixBus, Mixer, MixerCommand, VoiceId, channel_mixer};
pub use scheduler::{SchedulerConfig, VoiceScheduler};
pub use state::{VoicePhase, VoiceState};
pub use vibrato::Vibrato;
