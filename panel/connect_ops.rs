/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Quick connections from the source selection to the selection.

use log::{info, warn};
use netpanel_network::{ModelId, ModelKind, Network};

use super::NetworkPanel;
use crate::scene::Scene;
use crate::selection::SelectionManager;

const MATRIX_ENDPOINTS: [ModelKind; 3] = [ModelKind::NeuronArray, ModelKind::NeuronCollection, ModelKind::NeuronGroup];
const NEURON_HOLDERS: [ModelKind; 3] = [ModelKind::Neuron, ModelKind::NeuronCollection, ModelKind::NeuronGroup];

#[derive(Clone, Copy)]
enum Side {
    Source,
    Target,
}

fn selected_of(selection: &SelectionManager, scene: &Scene, side: Side, kind: ModelKind) -> Vec<ModelId> {
    match side {
        Side::Source => selection.filter_selected_source_models(scene, kind),
        Side::Target => selection.filter_selected_models(scene, kind),
    }
}

impl NetworkPanel {
    /// Neurons on one side: loose neurons, then collection members, then
    /// group members.
    fn side_neurons(&self, network: &Network, side: Side) -> Vec<ModelId> {
        NEURON_HOLDERS
            .into_iter()
            .flat_map(|kind| selected_of(&self.selection, &self.scene, side, kind))
            .flat_map(|id| network.neurons_of(id))
            .collect()
    }

    /// Connect the source selection to the selection.
    ///
    /// When both sides hold a neuron group the first group of each is joined
    /// by a synapse group. Otherwise every source-side neuron is wired to the
    /// target-side neurons with the current connection strategy. Returns the
    /// new models.
    pub fn connect_selected_models(&mut self, network: &mut Network) -> Vec<ModelId> {
        let source_groups = selected_of(&self.selection, &self.scene, Side::Source, ModelKind::NeuronGroup);
        let target_groups = selected_of(&self.selection, &self.scene, Side::Target, ModelKind::NeuronGroup);

        let added = match (source_groups.first(), target_groups.first()) {
            (Some(source), Some(target)) => match network.add_synapse_group(*source, *target, &self.connection) {
                Ok(id) => vec![id],
                Err(err) => {
                    warn!("cannot connect {source} to {target}: {err}");
                    Vec::new()
                },
            },
            _ => {
                let sources = self.side_neurons(network, Side::Source);
                let targets = self.side_neurons(network, Side::Target);
                network.connect(&self.connection, &sources, &targets)
            },
        };
        info!("quick connect added {} models", added.len());
        self.pump_network_events(network);
        added
    }

    /// Add a weight matrix for every (source, target) pair of selected
    /// arrays, collections and groups.
    pub fn connect_with_weight_matrix(&mut self, network: &mut Network) -> Vec<ModelId> {
        let connectable = |side| -> Vec<ModelId> {
            MATRIX_ENDPOINTS
                .into_iter()
                .flat_map(|kind| selected_of(&self.selection, &self.scene, side, kind))
                .collect()
        };
        let sources = connectable(Side::Source);
        let targets = connectable(Side::Target);

        let mut added = Vec::new();
        for source in &sources {
            for target in &targets {
                match network.add_weight_matrix(*source, *target) {
                    Ok(id) => added.push(id),
                    Err(err) => warn!("cannot connect {source} to {target}: {err}"),
                }
            }
        }
        self.pump_network_events(network);
        added
    }
}
