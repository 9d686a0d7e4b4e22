use std::fmt;

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use tracing::debug;

use super::engine::VoiceEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceId(pub u64);

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "voice#{}", self.0)
    }
}

/// Mixer graph topology as seen from the control side.
pub trait Mixer {
    fn add_input(&mut self, id: VoiceId, engine: Box<dyn VoiceEngine>);
    fn remove_input(&mut self, id: VoiceId);
}

#[derive(Debug)]
pub enum MixerCommand {
    Add(VoiceId, Box<dyn VoiceEngine>),
    Remove(VoiceId),
}

/// Control-side handle that forwards topology changes to a [`MixBus`].
///
/// Engines the bus detaches come back through `retired` and are dropped
/// here, off the render side.
#[derive(Debug, Clone)]
pub struct ChannelMixer {
    tx: Sender<MixerCommand>,
    retired: Receiver<Box<dyn VoiceEngine>>,
}

impl ChannelMixer {
    /// Drop engines the bus has handed back. Returns how many were freed.
    pub fn drop_retired(&self) -> usize {
        self.retired.try_iter().count()
    }
}

impl Mixer for ChannelMixer {
    fn add_input(&mut self, id: VoiceId, engine: Box<dyn VoiceEngine>) {
        self.drop_retired();
        if self.tx.send(MixerCommand::Add(id, engine)).is_err() {
            debug!(target: "facechoir::mixer", %id, "mix bus gone; dropping add");
        }
    }

    fn remove_input(&mut self, id: VoiceId) {
        self.drop_retired();
        if self.tx.send(MixerCommand::Remove(id)).is_err() {
            debug!(target: "facechoir::mixer", %id, "mix bus gone; dropping remove");
        }
    }
}

/// Render-side owner of the voice engines.
#[derive(Debug)]
pub struct MixBus {
    rx: Receiver<MixerCommand>,
    retired: Sender<Box<dyn VoiceEngine>>,
    inputs: Vec<(VoiceId, Box<dyn VoiceEngine>)>,
    master_gain: f32,
}

pub fn channel_mixer() -> (ChannelMixer, MixBus) {
    let (tx, rx) = unbounded();
    let (retired_tx, retired_rx) = unbounded();
    (
        ChannelMixer {
            tx,
            retired: retired_rx,
        },
        MixBus {
            rx,
            retired: retired_tx,
            inputs: Vec::new(),
            master_gain: 0.5,
        },
    )
}

impl MixBus {
    pub fn with_master_gain(mut self, gain: f32) -> Self {
        self.master_gain = gain.max(0.0);
        self
    }

    /// Apply queued topology changes in send order. Returns how many were applied.
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.rx.try_recv() {
                Ok(MixerCommand::Add(id, engine)) => {
                    self.detach(id);
                    debug!(target: "facechoir::mixer", %id, kind = engine.kind(), "input attached");
                    self.inputs.push((id, engine));
                }
                Ok(MixerCommand::Remove(id)) => {
                    self.detach(id);
                    debug!(target: "facechoir::mixer", %id, "input detached");
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
            applied += 1;
        }
        applied
    }

    fn detach(&mut self, id: VoiceId) {
        if let Some(idx) = self.inputs.iter().position(|(existing, _)| *existing == id) {
            let (_, engine) = self.inputs.remove(idx);
            // A closed channel hands the engine back inside the error, dropped here.
            let _ = self.retired.send(engine);
        }
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn contains(&self, id: VoiceId) -> bool {
        self.inputs.iter().any(|(existing, _)| *existing == id)
    }

    pub fn input_ids(&self) -> Vec<VoiceId> {
        self.inputs.iter().map(|(id, _)| *id).collect()
    }

    /// Overwrite `out` with the sum of all inputs.
    pub fn render(&mut self, out: &mut [f32], sample_rate: f32) {
        self.apply_pending();
        out.fill(0.0);
        for (_, engine) in &mut self.inputs {
            engine.render(out, sample_rate);
        }
        if self.master_gain != 1.0 {
            for s in out.iter_mut() {
                *s *= self.master_gain;
            }
        }
    }
}
