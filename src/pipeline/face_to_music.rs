use crossbeam_channel::Receiver;
use tracing::{debug, info, trace, warn};

use super::command::{ControlCommand, ControlHandle, control_channel};
use super::events::{EventBus, PipelineEvent};
use super::performance::PerformanceSettings;
use super::stats::{PipelineState, PipelineStats};
use crate::face::{FaceSample, VowelClassifier};
use crate::music::{
    ChordType, HarmonyGenerator, NoteName, PitchClassSet, ScaleModel, note_label, quantize,
};
use crate::patch::{MAX_VOICES, PatchError, PatchSettings};
use crate::voice::{Mixer, VoiceScheduler};

/// Per-frame orchestrator from face samples to voice parameters.
///
/// Owns every piece of musical state. A single driver calls [`process`]
/// once per frame with a monotonically increasing `now` in seconds.
///
/// [`process`]: FaceToMusicPipeline::process
#[derive(Debug)]
pub struct FaceToMusicPipeline<M: Mixer> {
    scale: ScaleModel,
    harmony: HarmonyGenerator,
    classifier: VowelClassifier,
    scheduler: VoiceScheduler<M>,
    performance: PerformanceSettings,
    state: PipelineState,
    enabled: bool,
    commands: Option<Receiver<ControlCommand>>,
    events: EventBus,
    stats: PipelineStats,
    frame: u64,
    notes: Vec<u8>,
}

impl<M: Mixer> FaceToMusicPipeline<M> {
    pub fn new(
        classifier: VowelClassifier,
        mut scheduler: VoiceScheduler<M>,
        mut performance: PerformanceSettings,
    ) -> Self {
        performance.voice_count = clamp_voice_count(performance.voice_count);
        scheduler.set_voice_count(performance.voice_count, 0.0);
        let scale = ScaleModel::default();
        let harmony = HarmonyGenerator::new(scale.chord_pitch_classes());
        Self {
            scale,
            harmony,
            classifier,
            scheduler,
            performance,
            state: PipelineState::WaitingForFaceData,
            enabled: true,
            commands: None,
            events: EventBus::default(),
            stats: PipelineStats::default(),
            frame: 0,
            notes: Vec::new(),
        }
    }

    /// Create the control queue. A later call replaces the previous queue.
    pub fn control_handle(&mut self) -> ControlHandle {
        let (handle, rx) = control_channel();
        self.commands = Some(rx);
        handle
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn scale(&self) -> &ScaleModel {
        &self.scale
    }

    pub fn harmony(&self) -> &HarmonyGenerator {
        &self.harmony
    }

    pub fn classifier(&self) -> &VowelClassifier {
        &self.classifier
    }

    pub fn scheduler(&self) -> &VoiceScheduler<M> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut VoiceScheduler<M> {
        &mut self.scheduler
    }

    pub fn performance(&self) -> &PerformanceSettings {
        &self.performance
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn set_key_and_chord(&mut self, key: NoteName, chord_type: ChordType) {
        self.scale.set_key_and_chord(key, chord_type);
        self.scale_changed();
    }

    pub fn set_custom_mask(&mut self, mask: PitchClassSet) {
        self.scale.set_custom_mask(mask);
        self.scale_changed();
    }

    pub fn toggle_pitch_class(&mut self, pc: u8) {
        self.scale.toggle_pitch_class(pc);
        self.scale_changed();
    }

    pub fn clear_custom_mask(&mut self) {
        self.scale.clear_custom_mask();
        self.scale_changed();
    }

    fn scale_changed(&mut self) {
        self.harmony.set_chord(self.scale.chord_pitch_classes());
        let event = PipelineEvent::ScaleChanged {
            key: self.scale.key(),
            chord_type: self.scale.chord_type(),
            pitch_classes: self.scale.current_scale_pitch_classes(),
            custom: self.scale.custom_mask().is_some(),
        };
        self.events.publish(&event);
    }

    /// Resize the voice pool. Counts above [`MAX_VOICES`] are clamped.
    pub fn set_voice_count(&mut self, count: usize, now: f64) {
        let count = clamp_voice_count(count);
        let from = self.scheduler.voice_count();
        self.performance.voice_count = count;
        if from == count {
            return;
        }
        self.scheduler.set_voice_count(count, now);
        self.events
            .publish(&PipelineEvent::VoiceCountChanged { from, to: count });
    }

    /// Re-seed scale, voices, motion and engine from a patch.
    pub fn apply_patch(&mut self, patch: &PatchSettings, now: f64) -> Result<(), PatchError> {
        patch.validate()?;
        self.scale.set_key_and_chord(patch.key, patch.chord_type);
        if let Some(mask) = patch.scale_mask {
            self.scale.set_custom_mask(mask);
        }
        self.scale_changed();
        self.performance.apply_patch(patch);
        self.scheduler.set_engine(patch.engine.clone(), now);
        self.set_voice_count(patch.num_of_voices, now);
        info!(
            key = %patch.key,
            chord = patch.chord_type.symbol(),
            voices = patch.num_of_voices,
            "patch applied"
        );
        self.events.publish(&PipelineEvent::PatchApplied);
        Ok(())
    }

    /// Allow playback to start on the next frame.
    pub fn activate(&mut self) {
        if !self.enabled {
            debug!("pipeline activated");
        }
        self.enabled = true;
    }

    /// Face lost: fade voices out and wait for face data again.
    pub fn deactivate(&mut self, now: f64) {
        self.enabled = false;
        self.classifier.reset();
        if self.state == PipelineState::Playing {
            self.scheduler.stop_playing(now);
            self.events.publish(&PipelineEvent::PlaybackStopped { at: now });
        }
        self.state = PipelineState::WaitingForFaceData;
        self.stats.state = self.state;
    }

    fn drain_commands(&mut self, now: f64) {
        let pending: Vec<ControlCommand> = match &self.commands {
            Some(rx) => rx.try_iter().collect(),
            None => return,
        };
        for command in pending {
            self.apply_command(command, now);
        }
    }

    pub fn apply_command(&mut self, command: ControlCommand, now: f64) {
        trace!(target: "facechoir::control", ?command, "applying control command");
        match command {
            ControlCommand::SetKeyAndChord { key, chord_type } => {
                self.set_key_and_chord(key, chord_type)
            }
            ControlCommand::SetCustomMask(mask) => self.set_custom_mask(mask),
            ControlCommand::TogglePitchClass(pc) => self.toggle_pitch_class(pc),
            ControlCommand::ClearCustomMask => self.clear_custom_mask(),
            ControlCommand::SetVoiceCount(count) => self.set_voice_count(count, now),
            ControlCommand::SetGlissandoMs(ms) => self.performance.glissando_ms = ms.max(0.0),
            ControlCommand::SetVibrato {
                amount_percent,
                rate_hz,
            } => {
                self.performance.vibrato_amount_percent = amount_percent;
                self.performance.vibrato_rate_hz = rate_hz;
            }
            ControlCommand::SetNoteRange { lowest, highest } => {
                self.performance.set_note_range(lowest, highest)
            }
            ControlCommand::SetPitchAxis(axis) => self.performance.pitch_axis = axis,
            ControlCommand::ApplyPatch(patch) => {
                if let Err(err) = self.apply_patch(&patch, now) {
                    warn!(error = %err, "rejected patch from control queue");
                }
            }
            ControlCommand::Activate => self.activate(),
            ControlCommand::Deactivate => self.deactivate(now),
        }
    }

    pub fn process(&mut self, sample: &FaceSample, now: f64) -> &PipelineStats {
        self.drain_commands(now);
        self.frame += 1;

        let vowel = self.classifier.process(sample);

        let raw = sample.axis_value(self.performance.pitch_axis);
        let table = self.scale.table();
        let lead = quantize(
            raw,
            self.performance.input_range(),
            self.performance.lowest_note,
            self.performance.highest_note,
            &table,
        );

        self.notes = self
            .harmony
            .voice_chord_padded(lead, self.scheduler.voice_count());

        self.scheduler.update_frame(
            &self.notes,
            vowel.params,
            self.performance.glissando_ms,
            self.performance.vibrato_amount_percent,
            self.performance.vibrato_rate_hz,
            now,
        );

        if self.enabled && self.state == PipelineState::WaitingForFaceData {
            let stagger = self.scheduler.config().start_stagger_sec;
            self.scheduler.start_playing(now, stagger);
            self.state = PipelineState::Playing;
            self.events.publish(&PipelineEvent::PlaybackStarted { at: now });
        }

        trace!(
            target: "facechoir::frame",
            frame = self.frame,
            raw,
            lead,
            voices = self.notes.len(),
            "frame processed"
        );

        self.stats = PipelineStats {
            frame: self.frame,
            state: self.state,
            lead_note: Some(lead),
            lead_label: Some(note_label(lead)),
            harmony_labels: self.notes.iter().skip(1).map(|&n| note_label(n)).collect(),
            voice_frequencies: self.scheduler.voice_frequencies(),
            top_vowel: vowel.top,
            vocal_tract: vowel.params,
        };
        &self.stats
    }
}

fn clamp_voice_count(count: usize) -> usize {
    if count > MAX_VOICES {
        warn!(requested = count, max = MAX_VOICES, "voice count clamped");
        MAX_VOICES
    } else {
        count
    }
}
