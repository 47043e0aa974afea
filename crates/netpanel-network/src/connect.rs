/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Strategies for wiring source neurons to target neurons.

use serde::{Deserialize, Serialize};

use crate::model::ModelId;
use crate::network::Network;

/// Axis used to pair neurons up for one-to-one connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    X,
    Y,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConnectionStrategy {
    AllToAll { allow_self_connections: bool },
    /// Pair the i-th source with the i-th target, both sorted along
    /// `orientation`. Surplus neurons on either side stay unconnected.
    OneToOne {
        orientation: Orientation,
        bidirectional: bool,
    },
}

impl Default for ConnectionStrategy {
    fn default() -> Self {
        ConnectionStrategy::AllToAll {
            allow_self_connections: false,
        }
    }
}

impl ConnectionStrategy {
    /// Source/target pairs to connect. Ids that are not neurons in `network`
    /// are skipped.
    pub fn pairs(&self, network: &Network, sources: &[ModelId], targets: &[ModelId]) -> Vec<(ModelId, ModelId)> {
        let is_neuron = |id: &&ModelId| network.neuron(**id).is_some();
        let sources: Vec<ModelId> = sources.iter().filter(is_neuron).copied().collect();
        let targets: Vec<ModelId> = targets.iter().filter(is_neuron).copied().collect();

        match *self {
            ConnectionStrategy::AllToAll {
                allow_self_connections,
            } => sources
                .iter()
                .flat_map(|source| targets.iter().map(move |target| (*source, *target)))
                .filter(|(source, target)| allow_self_connections || source != target)
                .collect(),
            ConnectionStrategy::OneToOne {
                orientation,
                bidirectional,
            } => {
                let sources = sorted_along(network, sources, orientation);
                let targets = sorted_along(network, targets, orientation);
                let mut pairs = Vec::new();
                for (source, target) in sources.into_iter().zip(targets) {
                    pairs.push((source, target));
                    if bidirectional {
                        pairs.push((target, source));
                    }
                }
                pairs
            },
        }
    }
}

fn sorted_along(network: &Network, mut ids: Vec<ModelId>, orientation: Orientation) -> Vec<ModelId> {
    let coordinate = |id: &ModelId| {
        network
            .neuron(*id)
            .map(|neuron| match orientation {
                Orientation::X => neuron.position.x,
                Orientation::Y => neuron.position.y,
            })
            .unwrap_or(0.0)
    };
    ids.sort_by(|a, b| coordinate(a).total_cmp(&coordinate(b)));
    ids
}
