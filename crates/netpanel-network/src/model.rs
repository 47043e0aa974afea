/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::annotation::{Classifier, TextObject};
use crate::group::{NeuronCollection, NeuronGroup, Subnetwork, SynapseGroup};
use crate::matrix::{NeuronArray, WeightMatrix};
use crate::neuron::Neuron;
use crate::synapse::Synapse;
use crate::{Point, Vector};

/// Stable model identity. Generated by the owning network, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(u64);

impl ModelId {
    /// Placeholder carried by models that have not been added to a network yet.
    pub const PENDING: ModelId = ModelId(0);

    pub fn raw(self) -> u64 {
        self.0
    }

    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn is_pending(self) -> bool {
        self == Self::PENDING
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Concrete kind of a model object, used for selection filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    Neuron,
    Synapse,
    NeuronArray,
    NeuronCollection,
    NeuronGroup,
    SynapseGroup,
    WeightMatrix,
    Subnetwork,
    Text,
    Classifier,
}

impl ModelKind {
    /// Kinds that can sit at either end of a weight matrix.
    pub fn is_matrix_connectable(self) -> bool {
        matches!(
            self,
            ModelKind::NeuronArray | ModelKind::NeuronCollection | ModelKind::NeuronGroup
        )
    }

    /// Rank used to order models so that every model comes after the models it
    /// depends on.
    pub(crate) fn restore_rank(self) -> u8 {
        match self {
            ModelKind::Neuron => 0,
            ModelKind::NeuronArray => 1,
            ModelKind::Classifier => 2,
            ModelKind::Text => 3,
            ModelKind::NeuronGroup => 4,
            ModelKind::NeuronCollection => 5,
            ModelKind::Subnetwork => 6,
            ModelKind::Synapse => 7,
            ModelKind::SynapseGroup => 8,
            ModelKind::WeightMatrix => 9,
        }
    }
}

/// Every model object the network can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum NetworkModel {
    Neuron(Neuron),
    Synapse(Synapse),
    NeuronArray(NeuronArray),
    NeuronCollection(NeuronCollection),
    NeuronGroup(NeuronGroup),
    SynapseGroup(SynapseGroup),
    WeightMatrix(WeightMatrix),
    Subnetwork(Subnetwork),
    Text(TextObject),
    Classifier(Classifier),
}

macro_rules! each_model {
    ($model:expr, $inner:ident => $body:expr) => {
        match $model {
            NetworkModel::Neuron($inner) => $body,
            NetworkModel::Synapse($inner) => $body,
            NetworkModel::NeuronArray($inner) => $body,
            NetworkModel::NeuronCollection($inner) => $body,
            NetworkModel::NeuronGroup($inner) => $body,
            NetworkModel::SynapseGroup($inner) => $body,
            NetworkModel::WeightMatrix($inner) => $body,
            NetworkModel::Subnetwork($inner) => $body,
            NetworkModel::Text($inner) => $body,
            NetworkModel::Classifier($inner) => $body,
        }
    };
}

impl NetworkModel {
    pub fn id(&self) -> ModelId {
        each_model!(self, m => m.id)
    }

    pub(crate) fn set_id(&mut self, id: ModelId) {
        each_model!(self, m => m.id = id)
    }

    /// Owning container, if this model is a member of a group or subnetwork.
    pub fn parent(&self) -> Option<ModelId> {
        each_model!(self, m => m.parent)
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ModelId>) {
        each_model!(self, m => m.parent = parent)
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            NetworkModel::Neuron(_) => ModelKind::Neuron,
            NetworkModel::Synapse(_) => ModelKind::Synapse,
            NetworkModel::NeuronArray(_) => ModelKind::NeuronArray,
            NetworkModel::NeuronCollection(_) => ModelKind::NeuronCollection,
            NetworkModel::NeuronGroup(_) => ModelKind::NeuronGroup,
            NetworkModel::SynapseGroup(_) => ModelKind::SynapseGroup,
            NetworkModel::WeightMatrix(_) => ModelKind::WeightMatrix,
            NetworkModel::Subnetwork(_) => ModelKind::Subnetwork,
            NetworkModel::Text(_) => ModelKind::Text,
            NetworkModel::Classifier(_) => ModelKind::Classifier,
        }
    }

    /// Models owned by this one. Deleting the owner deletes them too.
    pub fn members(&self) -> Vec<ModelId> {
        match self {
            NetworkModel::NeuronGroup(group) => group.neurons.clone(),
            NetworkModel::SynapseGroup(group) => group.synapses.clone(),
            NetworkModel::Subnetwork(subnet) => subnet.member_ids(),
            _ => Vec::new(),
        }
    }

    /// Models this one points at without owning them.
    pub fn references(&self) -> Vec<ModelId> {
        match self {
            NetworkModel::Synapse(s) => vec![s.source, s.target],
            NetworkModel::WeightMatrix(m) => vec![m.source, m.target],
            NetworkModel::SynapseGroup(g) => vec![g.source, g.target],
            NetworkModel::NeuronCollection(c) => c.neurons.clone(),
            _ => Vec::new(),
        }
    }

    /// Whether deleting `id` must also delete this model. Collections only
    /// lose the member instead.
    pub(crate) fn depends_on(&self, id: ModelId) -> bool {
        !matches!(self, NetworkModel::NeuronCollection(_)) && self.references().contains(&id)
    }

    /// Remove `member` from this model's member or reference lists, returning
    /// its former index.
    pub(crate) fn detach(&mut self, member: ModelId) -> Option<usize> {
        let list = match self {
            NetworkModel::NeuronGroup(group) => &mut group.neurons,
            NetworkModel::SynapseGroup(group) => &mut group.synapses,
            NetworkModel::NeuronCollection(collection) => &mut collection.neurons,
            NetworkModel::Subnetwork(subnet) => return subnet.detach(member),
            _ => return None,
        };
        let index = list.iter().position(|id| *id == member)?;
        list.remove(index);
        Some(index)
    }

    /// Inverse of [`NetworkModel::detach`].
    pub(crate) fn attach(&mut self, member: ModelId, member_kind: ModelKind, index: usize) {
        let list = match self {
            NetworkModel::NeuronGroup(group) => &mut group.neurons,
            NetworkModel::SynapseGroup(group) => &mut group.synapses,
            NetworkModel::NeuronCollection(collection) => &mut collection.neurons,
            NetworkModel::Subnetwork(subnet) => match subnet.list_for(member_kind) {
                Some(list) => list,
                None => return,
            },
            _ => return,
        };
        if !list.contains(&member) {
            list.insert(index.min(list.len()), member);
        }
    }

    /// Rewrite every id this model holds through `map`. Returns `false` when a
    /// referenced id has no mapping, in which case the model is left partially
    /// rewritten and must be discarded.
    pub(crate) fn remap(&mut self, map: &HashMap<ModelId, ModelId>) -> bool {
        fn swap(id: &mut ModelId, map: &HashMap<ModelId, ModelId>) -> bool {
            match map.get(id) {
                Some(new_id) => {
                    *id = *new_id;
                    true
                },
                None => false,
            }
        }
        fn swap_all(ids: &mut [ModelId], map: &HashMap<ModelId, ModelId>) -> bool {
            ids.iter_mut().all(|id| swap(id, map))
        }

        let mut id = self.id();
        if !swap(&mut id, map) {
            return false;
        }
        self.set_id(id);
        let parent = self.parent().and_then(|parent| map.get(&parent).copied());
        self.set_parent(parent);

        match self {
            NetworkModel::Synapse(s) => swap(&mut s.source, map) && swap(&mut s.target, map),
            NetworkModel::WeightMatrix(m) => swap(&mut m.source, map) && swap(&mut m.target, map),
            NetworkModel::SynapseGroup(g) => {
                swap(&mut g.source, map)
                    && swap(&mut g.target, map)
                    && swap_all(&mut g.synapses, map)
            },
            NetworkModel::NeuronCollection(c) => swap_all(&mut c.neurons, map),
            NetworkModel::NeuronGroup(g) => swap_all(&mut g.neurons, map),
            NetworkModel::Subnetwork(s) => {
                swap_all(&mut s.neuron_groups, map)
                    && swap_all(&mut s.neuron_arrays, map)
                    && swap_all(&mut s.weight_matrices, map)
                    && swap_all(&mut s.synapse_groups, map)
            },
            NetworkModel::Neuron(_)
            | NetworkModel::NeuronArray(_)
            | NetworkModel::Text(_)
            | NetworkModel::Classifier(_) => true,
        }
    }

    /// Location of models that have one of their own.
    pub fn position(&self) -> Option<Point> {
        match self {
            NetworkModel::Neuron(n) => Some(n.position),
            NetworkModel::NeuronArray(a) => Some(a.position),
            NetworkModel::NeuronGroup(g) => Some(g.origin),
            NetworkModel::Text(t) => Some(t.position),
            NetworkModel::Classifier(c) => Some(c.position),
            _ => None,
        }
    }

    pub fn translate(&mut self, by: Vector) {
        match self {
            NetworkModel::Neuron(n) => n.position += by,
            NetworkModel::NeuronArray(a) => a.position += by,
            NetworkModel::NeuronGroup(g) => g.origin += by,
            NetworkModel::Text(t) => t.position += by,
            NetworkModel::Classifier(c) => c.position += by,
            _ => {},
        }
    }
}
