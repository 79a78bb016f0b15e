use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};

use super::{MapEvent, CHANGE_EVENT_NAME};
use crate::surface::ViewId;

/// One event addressed to a host view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub view: ViewId,
    pub name: String,
    pub event: MapEvent,
}

/// The UI framework's event transport
pub trait EventSink: Send + Sync {
    fn emit(&self, view: ViewId, event: MapEvent);
}

/// Event sink that forwards envelopes over a crossbeam channel
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: Sender<EventEnvelope>,
}

impl ChannelEventSink {
    /// Create an unbounded sink and the receiver that drains it
    pub fn new() -> (Self, Receiver<EventEnvelope>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, view: ViewId, event: MapEvent) {
        let envelope = EventEnvelope {
            view,
            name: CHANGE_EVENT_NAME.to_string(),
            event,
        };
        if self.tx.send(envelope).is_err() {
            log::debug!("event receiver dropped; discarding event for view {:?}", view);
        }
    }
}
