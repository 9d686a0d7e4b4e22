use facechoir::core::pitch::midi_to_hz;
use facechoir::face::{FaceSample, Orientation, VowelClassifier};
use facechoir::music::{ChordType, NoteName};
use facechoir::pipeline::{FaceToMusicPipeline, PerformanceSettings, PipelineState};
use facechoir::voice::{EngineSettings, SchedulerConfig, VoiceScheduler, channel_mixer};

fn pitched(pitch: f32) -> FaceSample {
    FaceSample {
        orientation: Orientation {
            pitch,
            ..Orientation::default()
        },
        ..FaceSample::default()
    }
}

#[test]
fn c_major_three_voices_from_middle_c() {
    let (mixer, mut bus) = channel_mixer();
    let scheduler = VoiceScheduler::new(mixer, EngineSettings::default(), SchedulerConfig::default());
    let performance = PerformanceSettings {
        voice_count: 3,
        lowest_note: 60,
        highest_note: 60,
        ..PerformanceSettings::default()
    };
    let mut pipeline =
        FaceToMusicPipeline::new(VowelClassifier::without_model(), scheduler, performance);
    pipeline.set_key_and_chord(NoteName::C, ChordType::Major);

    let stats = pipeline.process(&pitched(0.3), 0.0).clone();
    assert_eq!(stats.state, PipelineState::Playing);
    assert_eq!(stats.lead_note, Some(60));
    assert_eq!(stats.lead_label.as_deref(), Some("C4"));
    assert_eq!(stats.harmony_labels, vec!["G3", "E3"]);

    let expected: Vec<f32> = [60u8, 55, 52].iter().map(|&n| midi_to_hz(n as f32)).collect();
    assert_eq!(stats.voice_frequencies, expected);

    for (voice, hz) in pipeline.scheduler().voices().iter().zip(&expected) {
        assert_eq!(voice.controls().frequency(), *hz);
    }
    bus.apply_pending();
    assert_eq!(bus.input_count(), 3);
}

#[test]
fn head_pitch_sweeps_through_the_scale() {
    let (mixer, _bus) = channel_mixer();
    let scheduler = VoiceScheduler::new(mixer, EngineSettings::default(), SchedulerConfig::default());
    let performance = PerformanceSettings {
        voice_count: 1,
        lowest_note: 60,
        highest_note: 72,
        ..PerformanceSettings::default()
    };
    let mut pipeline =
        FaceToMusicPipeline::new(VowelClassifier::without_model(), scheduler, performance);

    let mut leads = Vec::new();
    for (i, pitch) in [-1.0f32, -0.5, 0.0, 0.5, 1.0].into_iter().enumerate() {
        let stats = pipeline.process(&pitched(pitch), i as f64 / 60.0);
        leads.push(stats.lead_note.expect("lead"));
    }
    // C major between C4 and C5 has 8 notes; index = round(t * 7).
    assert_eq!(leads, vec![60, 64, 67, 69, 72]);
}

#[test]
fn custom_mask_changes_lead_but_not_harmony_chord() {
    let (mixer, _bus) = channel_mixer();
    let scheduler = VoiceScheduler::new(mixer, EngineSettings::default(), SchedulerConfig::default());
    let performance = PerformanceSettings {
        voice_count: 2,
        lowest_note: 61,
        highest_note: 61,
        ..PerformanceSettings::default()
    };
    let mut pipeline =
        FaceToMusicPipeline::new(VowelClassifier::without_model(), scheduler, performance);

    // C# is not in C major: the empty window falls back to its lower bound.
    let stats = pipeline.process(&pitched(0.0), 0.0).clone();
    assert_eq!(stats.lead_note, Some(61));

    pipeline.toggle_pitch_class(1);
    assert!(pipeline.scale().current_scale_pitch_classes().contains(1));
    let stats = pipeline.process(&pitched(0.0), 0.1).clone();
    assert_eq!(stats.lead_note, Some(61));
    assert_eq!(stats.harmony_labels, vec!["C4"]);
}
