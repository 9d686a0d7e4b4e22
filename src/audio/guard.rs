use crate::config::OutputGuardSetting;

#[derive(Clone, Copy, Debug)]
pub struct SoftClipParams {
    pub ceiling: f32,
    pub drive: f32,
}

impl Default for SoftClipParams {
    fn default() -> Self {
        Self {
            ceiling: 0.98,
            drive: 1.5,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum OutputGuardMode {
    None,
    SoftClip(SoftClipParams),
}

impl Default for OutputGuardMode {
    fn default() -> Self {
        Self::SoftClip(SoftClipParams::default())
    }
}

impl From<OutputGuardSetting> for OutputGuardMode {
    fn from(setting: OutputGuardSetting) -> Self {
        match setting {
            OutputGuardSetting::None => Self::None,
            OutputGuardSetting::SoftClip => Self::SoftClip(SoftClipParams::default()),
        }
    }
}

/// Running totals across every processed block.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OutputGuardStats {
    pub max_abs_in: f32,
    pub max_abs_out: f32,
    pub num_over: u64,
    pub num_non_finite: u64,
}

/// Last stage before the file: replaces non-finite samples and tames peaks.
#[derive(Debug, Default)]
pub struct OutputGuard {
    mode: OutputGuardMode,
    stats: OutputGuardStats,
}

impl OutputGuard {
    pub fn new(mode: OutputGuardMode) -> Self {
        Self {
            mode,
            stats: OutputGuardStats::default(),
        }
    }

    pub fn stats(&self) -> OutputGuardStats {
        self.stats
    }

    pub fn process(&mut self, samples: &mut [f32]) {
        for s in samples.iter_mut() {
            let x = if s.is_finite() {
                *s
            } else {
                self.stats.num_non_finite += 1;
                0.0
            };
            let abs_in = x.abs();
            self.stats.max_abs_in = self.stats.max_abs_in.max(abs_in);
            let y = match self.mode {
                OutputGuardMode::None => x.clamp(-1.0, 1.0),
                OutputGuardMode::SoftClip(params) => {
                    let ceiling = params.ceiling.abs().max(1e-6);
                    if abs_in > ceiling {
                        self.stats.num_over += 1;
                    }
                    (x * params.drive.max(0.0)).tanh() * ceiling
                }
            };
            self.stats.max_abs_out = self.stats.max_abs_out.max(y.abs());
            *s = y;
        }
    }
}
