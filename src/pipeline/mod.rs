//! Frame loop wiring face input to voices.

pub mod command;
pub mod events;
pub mod face_to_music;
pub mod performance;
pub mod stats;

pub use command::{ControlCommand, ControlHandle, control_channel};
pub use events::{EventBus, PipelineEvent, SubscriptionId};
pub use face_to_music::FaceToMusicPipeline;
pub use performance::PerformanceSettings;
pub use stats::{PipelineState, PipelineStats};
