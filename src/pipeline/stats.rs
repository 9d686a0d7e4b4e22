use serde::Serialize;

use crate::face::{VocalTractParams, Vowel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    #[default]
    WaitingForFaceData,
    Playing,
}

/// Read-only view of the last processed frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineStats {
    pub frame: u64,
    pub state: PipelineState,
    pub lead_note: Option<u8>,
    pub lead_label: Option<String>,
    pub harmony_labels: Vec<String>,
    pub voice_frequencies: Vec<f32>,
    pub top_vowel: Option<(Vowel, f32)>,
    pub vocal_tract: VocalTractParams,
}
