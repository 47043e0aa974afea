/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! In-process clipboard holding model copies.

use std::collections::HashSet;

use log::debug;
use netpanel_network::{ModelId, Network, NetworkModel, Vector};

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    models: Vec<NetworkModel>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.models.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn models(&self) -> &[NetworkModel] {
        &self.models
    }

    /// Copy `ids` with everything they own. Loose synapses whose endpoints
    /// are both copied come along too.
    pub fn add(&mut self, network: &Network, ids: &[ModelId]) {
        let mut seen: HashSet<ModelId> = self.models.iter().map(NetworkModel::id).collect();
        for id in ids {
            self.push_with_members(network, *id, &mut seen);
        }

        let internal: Vec<NetworkModel> = network
            .models()
            .filter(|model| !seen.contains(&model.id()))
            .filter(|model| match model {
                NetworkModel::Synapse(synapse) => {
                    synapse.parent.is_none() && seen.contains(&synapse.source) && seen.contains(&synapse.target)
                },
                _ => false,
            })
            .cloned()
            .collect();
        self.models.extend(internal);
        debug!("clipboard holds {} models", self.models.len());
    }

    fn push_with_members(&mut self, network: &Network, id: ModelId, seen: &mut HashSet<ModelId>) {
        if !seen.insert(id) {
            return;
        }
        let Some(model) = network.get(id) else {
            return;
        };
        self.models.push(model.clone());
        for member in model.members() {
            self.push_with_members(network, member, seen);
        }
    }

    /// Insert fresh copies shifted by `offset`. Returns the top-level copies.
    pub fn paste(&self, network: &mut Network, offset: Vector) -> Vec<ModelId> {
        network.insert_copies(&self.models, offset)
    }
}
