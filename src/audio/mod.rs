pub mod guard;
pub mod wav;

pub use guard::{OutputGuard, OutputGuardMode, OutputGuardStats, SoftClipParams};
pub use wav::WavOutput;
