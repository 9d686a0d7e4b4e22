use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::face::PitchAxis;
use crate::music::{ChordType, NoteName, PitchClassSet};
use crate::patch::PatchSettings;

/// Edits requested from outside the frame loop. Applied in send order at the
/// start of the next frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    SetKeyAndChord { key: NoteName, chord_type: ChordType },
    SetCustomMask(PitchClassSet),
    TogglePitchClass(u8),
    ClearCustomMask,
    SetVoiceCount(usize),
    SetGlissandoMs(f32),
    SetVibrato { amount_percent: f32, rate_hz: f32 },
    SetNoteRange { lowest: u8, highest: u8 },
    SetPitchAxis(PitchAxis),
    ApplyPatch(Box<PatchSettings>),
    Activate,
    Deactivate,
}

/// Sending half of the control queue, cheap to clone into UI code.
#[derive(Debug, Clone)]
pub struct ControlHandle {
    tx: Sender<ControlCommand>,
}

impl ControlHandle {
    /// Returns false once the pipeline has been dropped.
    pub fn send(&self, command: ControlCommand) -> bool {
        self.tx.send(command).is_ok()
    }
}

pub fn control_channel() -> (ControlHandle, Receiver<ControlCommand>) {
    let (tx, rx) = unbounded();
    (ControlHandle { tx }, rx)
}
