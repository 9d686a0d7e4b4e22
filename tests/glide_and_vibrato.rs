use facechoir::core::pitch::midi_to_hz;
use facechoir::face::VocalTractParams;
use facechoir::voice::{EngineSettings, Mixer, SchedulerConfig, VoiceEngine, VoiceId, VoiceScheduler};

#[derive(Debug, Default)]
struct NullMixer;

impl Mixer for NullMixer {
    fn add_input(&mut self, _id: VoiceId, _engine: Box<dyn VoiceEngine>) {}
    fn remove_input(&mut self, _id: VoiceId) {}
}

const VT: VocalTractParams = VocalTractParams {
    tongue_position: 0.5,
    tongue_diameter: 1.0,
    lip_open: 0.4,
    jaw_open: 0.3,
};

fn lead_scheduler() -> VoiceScheduler<NullMixer> {
    let mut s = VoiceScheduler::new(NullMixer, EngineSettings::default(), SchedulerConfig::default());
    s.set_voice_count(1, 0.0);
    s.start_playing(0.0, 0.0);
    s
}

#[test]
fn glissando_reaches_target_and_clears() {
    let mut s = lead_scheduler();
    s.update_frame(&[60], VT, 200.0, 0.0, 5.0, 0.0);
    let from = midi_to_hz(60.0);
    let to = midi_to_hz(67.0);
    assert_eq!(s.voice_frequencies()[0], from);

    s.update_frame(&[67], VT, 200.0, 0.0, 5.0, 1.0);
    assert!(s.voices()[0].glissando().is_active());
    assert_eq!(s.voice_frequencies()[0], from);

    s.update_frame(&[67], VT, 200.0, 0.0, 5.0, 1.1);
    let mid = s.voice_frequencies()[0];
    assert!((mid - (from + to) / 2.0).abs() < 0.01, "mid {mid}");

    s.update_frame(&[67], VT, 200.0, 0.0, 5.0, 1.2);
    assert_eq!(s.voice_frequencies()[0], to);
    assert!(!s.voices()[0].glissando().is_active());
    assert_eq!(s.voices()[0].last_target(), Some(to));
}

#[test]
fn zero_length_glissando_jumps() {
    let mut s = lead_scheduler();
    s.update_frame(&[60], VT, 0.0, 0.0, 5.0, 0.0);
    s.update_frame(&[72], VT, 0.0, 0.0, 5.0, 0.5);
    assert_eq!(s.voice_frequencies()[0], midi_to_hz(72.0));
    assert!(!s.voices()[0].glissando().is_active());
}

#[test]
fn vibrato_waits_for_glissando_end() {
    let mut s = lead_scheduler();
    let target = midi_to_hz(64.0);
    s.update_frame(&[60], VT, 300.0, 80.0, 6.0, 0.0);
    s.update_frame(&[64], VT, 300.0, 80.0, 6.0, 1.0);
    assert!((s.voices()[0].vibrato().activation_time() - 1.3).abs() < 1e-9);

    for i in 1..18 {
        let t = 1.0 + i as f64 / 60.0;
        s.update_frame(&[64], VT, 300.0, 80.0, 6.0, t);
        let f = s.voice_frequencies()[0];
        assert!(f <= target + 1e-3, "overshoot at {t}: {f}");
        assert_eq!(s.voices()[0].vibrato().phase(), 0.0);
    }

    // After the slide the pitch starts to wobble around the target.
    let mut deviated = false;
    for i in 1..=30 {
        let now = 1.3 + i as f64 / 60.0;
        s.update_frame(&[64], VT, 300.0, 80.0, 6.0, now);
        let f = s.voice_frequencies()[0];
        let cents = 1200.0 * (f / target).log2();
        assert!(cents.abs() <= 80.0 + 1e-2, "cents {cents}");
        if cents.abs() > 5.0 {
            deviated = true;
        }
    }
    assert!(deviated);
}

#[test]
fn vocal_tract_is_written_every_frame() {
    let mut s = lead_scheduler();
    s.update_frame(&[60], VT, 0.0, 0.0, 5.0, 0.0);
    let other = VocalTractParams {
        lip_open: 1.2,
        ..VT
    };
    s.update_frame(&[60], other, 0.0, 0.0, 5.0, 0.016);
    assert_eq!(s.voices()[0].controls().vocal_tract(), other);
}
