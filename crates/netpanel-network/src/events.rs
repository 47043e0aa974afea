/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::model::ModelId;

/// Structural and display notifications fired by a network.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEvent {
    /// A top-level model (or a restored member) became live. Members created
    /// together with their container are covered by the container's event.
    ModelAdded(ModelId),
    /// A model stopped being live. Members removed with their container are
    /// covered by the container's event.
    ModelRemoved(ModelId),
    /// Simulation time readout changed.
    TimeDisplayUpdated(f64),
    /// One update pass finished; views should repaint.
    UpdateCompleted,
}

/// Fan-out of network events to any number of channel subscribers.
#[derive(Debug, Default)]
pub(crate) struct EventHub {
    subscribers: Vec<Sender<NetworkEvent>>,
}

impl EventHub {
    pub(crate) fn subscribe(&mut self) -> Receiver<NetworkEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver to every subscriber, dropping the ones whose receiver is gone.
    pub(crate) fn fire(&mut self, event: NetworkEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
