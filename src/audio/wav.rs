use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::debug;

use super::guard::{OutputGuard, OutputGuardMode, OutputGuardStats};

/// 16-bit mono WAV sink with an output guard in front.
pub struct WavOutput {
    writer: WavWriter<BufWriter<File>>,
    guard: OutputGuard,
    scratch: Vec<f32>,
    samples_written: u64,
}

impl std::fmt::Debug for WavOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WavOutput")
            .field("samples_written", &self.samples_written)
            .finish()
    }
}

impl WavOutput {
    pub fn create(
        path: &Path,
        sample_rate: u32,
        guard_mode: OutputGuardMode,
    ) -> Result<Self, hound::Error> {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let writer = WavWriter::create(path, spec)?;
        debug!(path = %path.display(), sample_rate, "wav output opened");
        Ok(Self {
            writer,
            guard: OutputGuard::new(guard_mode),
            scratch: Vec::new(),
            samples_written: 0,
        })
    }

    pub fn write_block(&mut self, samples: &[f32]) -> Result<(), hound::Error> {
        self.scratch.clear();
        self.scratch.extend_from_slice(samples);
        self.guard.process(&mut self.scratch);
        for &s in &self.scratch {
            let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            self.writer.write_sample(v)?;
        }
        self.samples_written += samples.len() as u64;
        Ok(())
    }

    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    pub fn finalize(self) -> Result<OutputGuardStats, hound::Error> {
        let stats = self.guard.stats();
        self.writer.finalize()?;
        Ok(stats)
    }
}
