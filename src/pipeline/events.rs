use std::fmt;

use serde::Serialize;

use crate::music::{ChordType, NoteName, PitchClassSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    ScaleChanged {
        key: NoteName,
        chord_type: ChordType,
        pitch_classes: PitchClassSet,
        custom: bool,
    },
    VoiceCountChanged {
        from: usize,
        to: usize,
    },
    PlaybackStarted {
        at: f64,
    },
    PlaybackStopped {
        at: f64,
    },
    PatchApplied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&PipelineEvent) + Send>;

/// Synchronous fan-out of pipeline events. Handlers run on the publishing
/// thread, in registration order.
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<(SubscriptionId, Handler)>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

impl EventBus {
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&PipelineEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(existing, _)| *existing != id);
        self.handlers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn publish(&mut self, event: &PipelineEvent) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn delivers_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::default();
        for tag in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            bus.subscribe(move |event| {
                if let PipelineEvent::VoiceCountChanged { to, .. } = event {
                    log.lock().expect("log").push(format!("{tag}:{to}"));
                }
            });
        }
        bus.publish(&PipelineEvent::VoiceCountChanged { from: 1, to: 2 });
        assert_eq!(
            *log.lock().expect("log"),
            vec!["first:2", "second:2", "third:2"]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Arc::new(Mutex::new(0));
        let mut bus = EventBus::default();
        let c = Arc::clone(&count);
        let id = bus.subscribe(move |_| *c.lock().expect("count") += 1);
        bus.publish(&PipelineEvent::PatchApplied);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&PipelineEvent::PatchApplied);
        assert_eq!(*count.lock().expect("count"), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
