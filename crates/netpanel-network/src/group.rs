/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Composite models: collections, groups and subnetworks.

use serde::{Deserialize, Serialize};

use crate::Point;
use crate::layout::GroupLayout;
use crate::model::{ModelId, ModelKind};

/// Loose neurons gathered under one label. Does not own its neurons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuronCollection {
    pub id: ModelId,
    #[serde(default)]
    pub parent: Option<ModelId>,
    pub neurons: Vec<ModelId>,
    #[serde(default)]
    pub label: String,
}

impl NeuronCollection {
    pub fn new(neurons: Vec<ModelId>) -> Self {
        Self {
            id: ModelId::PENDING,
            parent: None,
            neurons,
            label: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeuronGroupKind {
    Plain,
    Competitive,
    /// Self-organizing map.
    Som,
}

/// Neurons owned and laid out as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuronGroup {
    pub id: ModelId,
    #[serde(default)]
    pub parent: Option<ModelId>,
    pub kind: NeuronGroupKind,
    pub neurons: Vec<ModelId>,
    /// Anchor the layout positions members from.
    pub origin: Point,
    #[serde(default)]
    pub layout: Option<GroupLayout>,
    /// Set until the layout has been applied to member positions once.
    #[serde(default)]
    pub needs_layout: bool,
    #[serde(default)]
    pub label: String,
}

impl NeuronGroup {
    pub fn new(kind: NeuronGroupKind, origin: Point, layout: Option<GroupLayout>) -> Self {
        Self {
            id: ModelId::PENDING,
            parent: None,
            kind,
            neurons: Vec::new(),
            origin,
            needs_layout: layout.is_some(),
            layout,
            label: String::new(),
        }
    }
}

/// Synapses between two neuron groups, owned as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynapseGroup {
    pub id: ModelId,
    #[serde(default)]
    pub parent: Option<ModelId>,
    pub source: ModelId,
    pub target: ModelId,
    pub synapses: Vec<ModelId>,
    #[serde(default)]
    pub label: String,
}

impl SynapseGroup {
    pub fn new(source: ModelId, target: ModelId) -> Self {
        Self {
            id: ModelId::PENDING,
            parent: None,
            source,
            target,
            synapses: Vec::new(),
            label: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubnetworkKind {
    Plain,
    Hopfield,
    Competitive,
    Som,
    Backprop,
}

/// A network-within-the-network with a fixed topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subnetwork {
    pub id: ModelId,
    #[serde(default)]
    pub parent: Option<ModelId>,
    pub kind: SubnetworkKind,
    #[serde(default)]
    pub neuron_groups: Vec<ModelId>,
    #[serde(default)]
    pub neuron_arrays: Vec<ModelId>,
    #[serde(default)]
    pub weight_matrices: Vec<ModelId>,
    #[serde(default)]
    pub synapse_groups: Vec<ModelId>,
    #[serde(default)]
    pub label: String,
}

impl Subnetwork {
    pub fn new(kind: SubnetworkKind) -> Self {
        Self {
            id: ModelId::PENDING,
            parent: None,
            kind,
            neuron_groups: Vec::new(),
            neuron_arrays: Vec::new(),
            weight_matrices: Vec::new(),
            synapse_groups: Vec::new(),
            label: String::new(),
        }
    }

    /// Members in the order they are displayed: groups, arrays, matrices,
    /// synapse groups.
    pub fn member_ids(&self) -> Vec<ModelId> {
        self.neuron_groups
            .iter()
            .chain(&self.neuron_arrays)
            .chain(&self.weight_matrices)
            .chain(&self.synapse_groups)
            .copied()
            .collect()
    }

    pub(crate) fn list_for(&mut self, kind: ModelKind) -> Option<&mut Vec<ModelId>> {
        match kind {
            ModelKind::NeuronGroup => Some(&mut self.neuron_groups),
            ModelKind::NeuronArray => Some(&mut self.neuron_arrays),
            ModelKind::WeightMatrix => Some(&mut self.weight_matrices),
            ModelKind::SynapseGroup => Some(&mut self.synapse_groups),
            _ => None,
        }
    }

    pub(crate) fn detach(&mut self, member: ModelId) -> Option<usize> {
        for list in [
            &mut self.neuron_groups,
            &mut self.neuron_arrays,
            &mut self.weight_matrices,
            &mut self.synapse_groups,
        ] {
            if let Some(index) = list.iter().position(|id| *id == member) {
                list.remove(index);
                return Some(index);
            }
        }
        None
    }
}
