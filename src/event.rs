//! Channel-based fan-out of viewer events.
//!
//! Producers own an [`EventDispatcher`] per event type; consumers hold
//! the receiving end of a channel and drain it at their own pace.
//! Dropped receivers are pruned on the next emit.

use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};

use crate::types::SceneId;

/// The dims selection of a scene changed and its slices are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimsUpdated {
    pub scene_id: SceneId,
}

/// A consumer asked for the scene to be drawn again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedrawRequested {
    pub scene_id: SceneId,
}

/// Fan-out point for one event type.
pub struct EventDispatcher<E: Clone> {
    senders: Vec<Sender<E>>,
}

impl<E: Clone> EventDispatcher<E> {
    pub fn new() -> Self {
        Self {
            senders: Vec::new(),
        }
    }

    /// Open a new subscription. The returned receiver sees every event
    /// emitted after this call.
    pub fn subscribe(&mut self) -> Receiver<E> {
        let (sender, receiver) = mpsc::channel();
        self.senders.push(sender);
        receiver
    }

    /// Deliver `event` to all live subscribers, returning how many
    /// received it. Subscribers whose receiver was dropped are removed.
    pub fn emit(&mut self, event: E) -> usize {
        self.senders
            .retain(|sender| sender.send(event.clone()).is_ok());
        self.senders.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.senders.len()
    }
}

impl<E: Clone> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}
