//! Offline frame driver: face samples in, mono audio blocks out.

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::core::timebase::Timebase;
use crate::face::{FaceSample, VowelClassifier};
use crate::patch::{PatchError, PatchSettings};
use crate::pipeline::{FaceToMusicPipeline, PerformanceSettings, PipelineStats};
use crate::voice::{ChannelMixer, EngineSettings, MixBus, VoiceScheduler, channel_mixer};

#[derive(Debug)]
pub struct OfflineRenderer {
    pipeline: FaceToMusicPipeline<ChannelMixer>,
    bus: MixBus,
    timebase: Timebase,
    frame_idx: u64,
    stats_every: u64,
    block: Vec<f32>,
}

impl OfflineRenderer {
    pub fn new(
        config: &AppConfig,
        patch: &PatchSettings,
        classifier: VowelClassifier,
    ) -> Result<Self, PatchError> {
        patch.validate()?;
        let mut patch = patch.clone();
        if matches!(patch.engine, EngineSettings::VocalTract { .. }) {
            warn!("vocal tract voices render silence offline; using an oscillator bank");
            patch.engine = EngineSettings::default();
        }

        let timebase = Timebase::from_frame_rate(
            config.audio.sample_rate as f32,
            config.audio.frame_rate_hz,
        );
        let (mixer, bus) = channel_mixer();
        let bus = bus.with_master_gain(config.audio.master_gain);
        let scheduler = VoiceScheduler::new(mixer, patch.engine.clone(), config.voices.clone());

        let mut performance = PerformanceSettings::from_patch(&patch);
        performance.pitch_axis = config.input.pitch_axis;
        performance.input_min = config.input.input_min;
        performance.input_max = config.input.input_max;

        let mut pipeline = FaceToMusicPipeline::new(classifier, scheduler, performance);
        pipeline.apply_patch(&patch, 0.0)?;

        let frame_rate = 1.0 / timebase.frame_dt_sec();
        let interval = config.logging.stats_interval_sec.max(0.0) as f64;
        let stats_every = (interval * frame_rate).round() as u64;

        Ok(Self {
            pipeline,
            bus,
            timebase,
            frame_idx: 0,
            stats_every,
            block: vec![0.0; timebase.hop],
        })
    }

    pub fn timebase(&self) -> Timebase {
        self.timebase
    }

    pub fn pipeline(&self) -> &FaceToMusicPipeline<ChannelMixer> {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut FaceToMusicPipeline<ChannelMixer> {
        &mut self.pipeline
    }

    pub fn bus(&self) -> &MixBus {
        &self.bus
    }

    /// Start time of the next frame in seconds.
    pub fn now(&self) -> f64 {
        self.timebase.frame_start_sec(self.frame_idx)
    }

    /// Run one control frame, then render its audio block. `None` means no
    /// face data for this frame: voices keep their last state.
    pub fn render_frame(&mut self, sample: Option<&FaceSample>) -> &[f32] {
        let now = self.now();
        match sample {
            Some(sample) => {
                let stats = self.pipeline.process(sample, now);
                if self.stats_every > 0 && self.frame_idx % self.stats_every == 0 {
                    log_stats(stats, now);
                }
            }
            None => self.pipeline.scheduler_mut().tick(now),
        }
        let fs = self.timebase.fs;
        self.bus.render(&mut self.block, fs);
        self.frame_idx += 1;
        &self.block
    }

    /// Face lost: fade out and render until every voice is quiet.
    pub fn finish(&mut self) -> Vec<f32> {
        let now = self.now();
        self.pipeline.deactivate(now);
        let tail_sec = self.pipeline.scheduler().config().fade_out_sec + 0.05;
        let frames = (tail_sec / self.timebase.frame_dt_sec()).ceil() as u64 + 1;
        let mut tail = Vec::with_capacity(frames as usize * self.timebase.hop);
        for _ in 0..frames {
            tail.extend_from_slice(self.render_frame(None));
        }
        tail
    }
}

fn log_stats(stats: &PipelineStats, now: f64) {
    let vowel = stats
        .top_vowel
        .map(|(v, p)| format!("{} {:.0}%", v.symbol(), p * 100.0));
    info!(
        target: "facechoir::stats",
        t = now,
        lead = stats.lead_label.as_deref().unwrap_or("-"),
        harmony = ?stats.harmony_labels,
        freqs = ?stats.voice_frequencies,
        vowel = vowel.as_deref().unwrap_or("-"),
        "frame stats"
    );
}
