/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Per-kind creation of visual nodes.
//!
//! Every model struct knows how to build its own visual node, so adding a
//! model kind means adding one `Materialize` impl.

use netpanel_network::{
    Classifier, ModelId, Network, NetworkModel, Neuron, NeuronArray, NeuronCollection, NeuronGroup,
    Subnetwork, Synapse, SynapseGroup, TextObject, WeightMatrix,
};

use super::{Scene, VisualKey, VisualKind, VisualNode};
use crate::error::PanelError;

/// Build, register and return the visual node for a model.
pub trait Materialize {
    fn materialize(&self, network: &Network, scene: &mut Scene) -> Result<VisualKey, PanelError>;
}

/// Registered visual node of an endpoint `model` depends on.
fn resolve(scene: &Scene, model: ModelId, endpoint: ModelId) -> Result<VisualKey, PanelError> {
    scene
        .key_for(endpoint)
        .ok_or(PanelError::MissingEndpoint { model, endpoint })
}

/// Materialize owned members in order. On failure the members created so far
/// are removed again so the scene is left as it was.
fn materialize_members(
    network: &Network,
    scene: &mut Scene,
    members: impl IntoIterator<Item = ModelId>,
) -> Result<Vec<VisualKey>, PanelError> {
    let mut created = Vec::new();
    for member in members {
        let result = network
            .get(member)
            .ok_or(PanelError::UnknownModel(member))
            .and_then(|model| model.materialize(network, scene));
        match result {
            Ok(key) => created.push(key),
            Err(err) => {
                for key in created {
                    scene.remove(key);
                }
                return Err(err);
            },
        }
    }
    Ok(created)
}

fn wrap_members(scene: &mut Scene, node: VisualNode, members: Vec<VisualKey>) -> Result<VisualKey, PanelError> {
    match scene.insert(node) {
        Ok(container) => {
            for member in members {
                scene.contain(container, member);
            }
            Ok(container)
        },
        Err(err) => {
            for member in members {
                scene.remove(member);
            }
            Err(err)
        },
    }
}

impl Materialize for Neuron {
    fn materialize(&self, _network: &Network, scene: &mut Scene) -> Result<VisualKey, PanelError> {
        scene.insert(VisualNode::new(self.id, VisualKind::Neuron))
    }
}

impl Materialize for Synapse {
    fn materialize(&self, _network: &Network, scene: &mut Scene) -> Result<VisualKey, PanelError> {
        let source = resolve(scene, self.id, self.source)?;
        let target = resolve(scene, self.id, self.target)?;
        scene.insert(VisualNode::new(self.id, VisualKind::Synapse { source, target }).lowered())
    }
}

impl Materialize for NeuronArray {
    fn materialize(&self, _network: &Network, scene: &mut Scene) -> Result<VisualKey, PanelError> {
        scene.insert(VisualNode::new(self.id, VisualKind::NeuronArray))
    }
}

impl Materialize for NeuronCollection {
    fn materialize(&self, _network: &Network, scene: &mut Scene) -> Result<VisualKey, PanelError> {
        let members = self
            .neurons
            .iter()
            .map(|neuron| resolve(scene, self.id, *neuron))
            .collect::<Result<Vec<_>, _>>()?;
        let key = scene.insert(VisualNode::new(self.id, VisualKind::NeuronCollection))?;
        for member in members {
            scene.outline(key, member);
        }
        Ok(key)
    }
}

impl Materialize for NeuronGroup {
    /// Member positions are expected to be laid out already
    /// (see `Network::prepare_for_display`).
    fn materialize(&self, network: &Network, scene: &mut Scene) -> Result<VisualKey, PanelError> {
        let members = materialize_members(network, scene, self.neurons.iter().copied())?;
        wrap_members(scene, VisualNode::new(self.id, VisualKind::NeuronGroup(self.kind)), members)
    }
}

impl Materialize for SynapseGroup {
    fn materialize(&self, _network: &Network, scene: &mut Scene) -> Result<VisualKey, PanelError> {
        let source = resolve(scene, self.id, self.source)?;
        let target = resolve(scene, self.id, self.target)?;
        scene.insert(VisualNode::new(self.id, VisualKind::SynapseGroup { source, target }).lowered())
    }
}

impl Materialize for WeightMatrix {
    fn materialize(&self, _network: &Network, scene: &mut Scene) -> Result<VisualKey, PanelError> {
        let source = resolve(scene, self.id, self.source)?;
        let target = resolve(scene, self.id, self.target)?;
        scene.insert(VisualNode::new(self.id, VisualKind::WeightMatrix { source, target }).lowered())
    }
}

impl Materialize for Subnetwork {
    fn materialize(&self, network: &Network, scene: &mut Scene) -> Result<VisualKey, PanelError> {
        let members = materialize_members(network, scene, self.member_ids())?;
        wrap_members(scene, VisualNode::new(self.id, VisualKind::Subnetwork(self.kind)), members)
    }
}

impl Materialize for TextObject {
    fn materialize(&self, _network: &Network, scene: &mut Scene) -> Result<VisualKey, PanelError> {
        scene.insert(VisualNode::new(self.id, VisualKind::Text))
    }
}

impl Materialize for Classifier {
    fn materialize(&self, _network: &Network, scene: &mut Scene) -> Result<VisualKey, PanelError> {
        scene.insert(VisualNode::new(self.id, VisualKind::Classifier))
    }
}

impl Materialize for NetworkModel {
    fn materialize(&self, network: &Network, scene: &mut Scene) -> Result<VisualKey, PanelError> {
        match self {
            NetworkModel::Neuron(model) => model.materialize(network, scene),
            NetworkModel::Synapse(model) => model.materialize(network, scene),
            NetworkModel::NeuronArray(model) => model.materialize(network, scene),
            NetworkModel::NeuronCollection(model) => model.materialize(network, scene),
            NetworkModel::NeuronGroup(model) => model.materialize(network, scene),
            NetworkModel::SynapseGroup(model) => model.materialize(network, scene),
            NetworkModel::WeightMatrix(model) => model.materialize(network, scene),
            NetworkModel::Subnetwork(model) => model.materialize(network, scene),
            NetworkModel::Text(model) => model.materialize(network, scene),
            NetworkModel::Classifier(model) => model.materialize(network, scene),
        }
    }
}
