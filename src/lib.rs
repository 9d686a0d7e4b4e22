//! Facial-expression-to-voice instrument core.
//!
//! Face-tracking frames become vowel-shaped vocal-tract controls and scale
//! quantized pitches, which a voice scheduler turns into harmonised voices
//! with glissando and vibrato.

pub mod audio;
pub mod config;
pub mod core;
pub mod face;
pub mod music;
pub mod patch;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod voice;
