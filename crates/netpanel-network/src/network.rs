/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The network: owner of every model object.

use std::collections::{BTreeMap, HashMap, HashSet};

use crossbeam_channel::Receiver;
use log::debug;

use crate::connect::ConnectionStrategy;
use crate::error::NetworkError;
use crate::events::{EventHub, NetworkEvent};
use crate::group::{
    NeuronCollection, NeuronGroup, NeuronGroupKind, Subnetwork, SubnetworkKind, SynapseGroup,
};
use crate::layout::{GroupLayout, LineOrientation};
use crate::matrix::{NeuronArray, WeightMatrix};
use crate::model::{ModelId, ModelKind, NetworkModel};
use crate::neuron::Neuron;
use crate::synapse::Synapse;
use crate::{Point, Vector};

/// Vertical distance between stacked subnetwork layers.
const LAYER_SPACING: f64 = 120.0;

/// Spacing of neurons in groups built for subnetworks.
const SUBNETWORK_NEURON_SPACING: f64 = 50.0;

/// A container or collection that lost a member during a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detached {
    pub container: ModelId,
    pub member: ModelId,
    pub index: usize,
}

/// Everything a delete took out of the network, in removal order
/// (dependents before the models they depend on). Enough to restore the
/// network exactly, ids included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemovedModels {
    models: Vec<NetworkModel>,
    detached: Vec<Detached>,
}

impl RemovedModels {
    pub fn models(&self) -> &[NetworkModel] {
        &self.models
    }

    pub fn ids(&self) -> Vec<ModelId> {
        self.models.iter().map(NetworkModel::id).collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Append a later removal. Restoring the merged record undoes both.
    pub fn extend(&mut self, later: RemovedModels) {
        self.models.extend(later.models);
        self.detached.extend(later.detached);
    }
}

/// Owner of all model objects. Structural changes are announced to
/// subscribers as [`NetworkEvent`]s.
#[derive(Debug)]
pub struct Network {
    pub(crate) models: BTreeMap<ModelId, NetworkModel>,
    pub(crate) next_id: u64,
    pub(crate) time: f64,
    events: EventHub,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    pub fn new() -> Self {
        Self {
            models: BTreeMap::new(),
            next_id: 1,
            time: 0.0,
            events: EventHub::default(),
        }
    }

    pub(crate) fn from_parts(models: BTreeMap<ModelId, NetworkModel>, next_id: u64, time: f64) -> Self {
        Self {
            models,
            next_id,
            time,
            events: EventHub::default(),
        }
    }

    /// Subscribe to structural events. Each subscriber gets its own channel.
    pub fn subscribe(&mut self) -> Receiver<NetworkEvent> {
        self.events.subscribe()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn contains(&self, id: ModelId) -> bool {
        self.models.contains_key(&id)
    }

    pub fn get(&self, id: ModelId) -> Option<&NetworkModel> {
        self.models.get(&id)
    }

    pub fn get_mut(&mut self, id: ModelId) -> Option<&mut NetworkModel> {
        self.models.get_mut(&id)
    }

    pub fn kind_of(&self, id: ModelId) -> Option<ModelKind> {
        self.models.get(&id).map(NetworkModel::kind)
    }

    /// Every model in id (creation) order.
    pub fn models(&self) -> impl Iterator<Item = &NetworkModel> {
        self.models.values()
    }

    pub fn ids_of_kind(&self, kind: ModelKind) -> Vec<ModelId> {
        self.models
            .values()
            .filter(|model| model.kind() == kind)
            .map(NetworkModel::id)
            .collect()
    }

    pub fn neuron(&self, id: ModelId) -> Option<&Neuron> {
        match self.models.get(&id) {
            Some(NetworkModel::Neuron(neuron)) => Some(neuron),
            _ => None,
        }
    }

    pub fn neuron_mut(&mut self, id: ModelId) -> Option<&mut Neuron> {
        match self.models.get_mut(&id) {
            Some(NetworkModel::Neuron(neuron)) => Some(neuron),
            _ => None,
        }
    }

    pub fn synapse(&self, id: ModelId) -> Option<&Synapse> {
        match self.models.get(&id) {
            Some(NetworkModel::Synapse(synapse)) => Some(synapse),
            _ => None,
        }
    }

    pub fn synapse_mut(&mut self, id: ModelId) -> Option<&mut Synapse> {
        match self.models.get_mut(&id) {
            Some(NetworkModel::Synapse(synapse)) => Some(synapse),
            _ => None,
        }
    }

    pub fn neuron_array_mut(&mut self, id: ModelId) -> Option<&mut NeuronArray> {
        match self.models.get_mut(&id) {
            Some(NetworkModel::NeuronArray(array)) => Some(array),
            _ => None,
        }
    }

    pub fn weight_matrix(&self, id: ModelId) -> Option<&WeightMatrix> {
        match self.models.get(&id) {
            Some(NetworkModel::WeightMatrix(matrix)) => Some(matrix),
            _ => None,
        }
    }

    pub fn weight_matrix_mut(&mut self, id: ModelId) -> Option<&mut WeightMatrix> {
        match self.models.get_mut(&id) {
            Some(NetworkModel::WeightMatrix(matrix)) => Some(matrix),
            _ => None,
        }
    }

    pub fn neuron_group(&self, id: ModelId) -> Option<&NeuronGroup> {
        match self.models.get(&id) {
            Some(NetworkModel::NeuronGroup(group)) => Some(group),
            _ => None,
        }
    }

    /// Neurons a model stands for: itself for a neuron, members for
    /// collections and groups, nothing otherwise.
    pub fn neurons_of(&self, id: ModelId) -> Vec<ModelId> {
        match self.models.get(&id) {
            Some(NetworkModel::Neuron(_)) => vec![id],
            Some(NetworkModel::NeuronCollection(collection)) => collection.neurons.clone(),
            Some(NetworkModel::NeuronGroup(group)) => group.neurons.clone(),
            _ => Vec::new(),
        }
    }

    /// Activation-vector length of a weight-matrix endpoint.
    pub fn connectable_len(&self, id: ModelId) -> Result<usize, NetworkError> {
        match self.models.get(&id) {
            Some(NetworkModel::NeuronArray(array)) => Ok(array.len()),
            Some(NetworkModel::NeuronCollection(collection)) => Ok(collection.neurons.len()),
            Some(NetworkModel::NeuronGroup(group)) => Ok(group.neurons.len()),
            Some(other) => Err(NetworkError::WrongKind {
                id,
                expected: "neuron array, collection or group",
                actual: other.kind(),
            }),
            None => Err(NetworkError::UnknownModel(id)),
        }
    }

    fn allocate_id(&mut self) -> ModelId {
        let id = ModelId::from_raw(self.next_id);
        self.next_id += 1;
        id
    }

    /// Insert without announcing. Assigns an id to pending models.
    fn insert_silent(&mut self, mut model: NetworkModel) -> ModelId {
        if model.id().is_pending() {
            let id = self.allocate_id();
            model.set_id(id);
        }
        let id = model.id();
        self.models.insert(id, model);
        id
    }

    /// Add a model and announce it.
    pub fn add_model(&mut self, model: NetworkModel) -> ModelId {
        let id = self.insert_silent(model);
        self.events.fire(NetworkEvent::ModelAdded(id));
        id
    }

    pub fn add_neuron(&mut self, neuron: Neuron) -> ModelId {
        self.add_model(NetworkModel::Neuron(neuron))
    }

    pub fn add_synapse(&mut self, synapse: Synapse) -> Result<ModelId, NetworkError> {
        self.expect_kind(synapse.source, ModelKind::Neuron, "neuron")?;
        self.expect_kind(synapse.target, ModelKind::Neuron, "neuron")?;
        Ok(self.add_model(NetworkModel::Synapse(synapse)))
    }

    pub fn add_neuron_array(&mut self, array: NeuronArray) -> ModelId {
        self.add_model(NetworkModel::NeuronArray(array))
    }

    pub fn add_neuron_collection(&mut self, neurons: Vec<ModelId>) -> Result<ModelId, NetworkError> {
        for neuron in &neurons {
            self.expect_kind(*neuron, ModelKind::Neuron, "neuron")?;
        }
        Ok(self.add_model(NetworkModel::NeuronCollection(NeuronCollection::new(neurons))))
    }

    /// Add a group of `count` fresh neurons. Members are announced with the
    /// group; the layout is applied when the group is first displayed.
    pub fn add_neuron_group(
        &mut self,
        kind: NeuronGroupKind,
        count: usize,
        origin: Point,
        layout: Option<GroupLayout>,
    ) -> ModelId {
        let id = self.build_neuron_group(kind, count, origin, layout, None);
        self.events.fire(NetworkEvent::ModelAdded(id));
        id
    }

    pub fn add_synapse_group(
        &mut self,
        source: ModelId,
        target: ModelId,
        strategy: &ConnectionStrategy,
    ) -> Result<ModelId, NetworkError> {
        let id = self.build_synapse_group(source, target, strategy, None)?;
        self.events.fire(NetworkEvent::ModelAdded(id));
        Ok(id)
    }

    /// Connect two matrix-connectable models. Matrices leaving a collection
    /// or group start as identity, matrices leaving an array start random.
    pub fn add_weight_matrix(&mut self, source: ModelId, target: ModelId) -> Result<ModelId, NetworkError> {
        let id = self.build_weight_matrix(source, target, None)?;
        self.events.fire(NetworkEvent::ModelAdded(id));
        Ok(id)
    }

    /// Build a subnetwork with the given layer sizes. Every member is
    /// announced with the subnetwork.
    pub fn add_subnetwork(&mut self, kind: SubnetworkKind, origin: Point, layers: &[usize]) -> Result<ModelId, NetworkError> {
        let id = self.allocate_id();
        let mut subnet = Subnetwork::new(kind);
        subnet.id = id;
        let first = layers.first().copied().unwrap_or(0);
        let line = Some(GroupLayout::Line {
            spacing: SUBNETWORK_NEURON_SPACING,
            orientation: LineOrientation::Horizontal,
        });
        let layer_origin = |i: usize| origin + Vector::new(0.0, -LAYER_SPACING * i as f64);

        match kind {
            SubnetworkKind::Backprop => {
                for (i, len) in layers.iter().enumerate() {
                    let mut array = NeuronArray::new(layer_origin(i), *len);
                    array.parent = Some(id);
                    subnet.neuron_arrays.push(self.insert_silent(NetworkModel::NeuronArray(array)));
                }
                let arrays = subnet.neuron_arrays.clone();
                for pair in arrays.windows(2) {
                    let matrix = self.build_weight_matrix(pair[0], pair[1], Some(id))?;
                    subnet.weight_matrices.push(matrix);
                }
            },
            SubnetworkKind::Hopfield => {
                let layout = Some(GroupLayout::grid(SUBNETWORK_NEURON_SPACING));
                let group = self.build_neuron_group(NeuronGroupKind::Plain, first, origin, layout, Some(id));
                subnet.neuron_groups.push(group);
                let recurrent = ConnectionStrategy::default();
                subnet
                    .synapse_groups
                    .push(self.build_synapse_group(group, group, &recurrent, Some(id))?);
            },
            SubnetworkKind::Competitive | SubnetworkKind::Som => {
                let output_kind = if kind == SubnetworkKind::Som {
                    NeuronGroupKind::Som
                } else {
                    NeuronGroupKind::Competitive
                };
                let output_len = layers.get(1).copied().unwrap_or(first);
                let input = self.build_neuron_group(NeuronGroupKind::Plain, first, layer_origin(0), line.clone(), Some(id));
                let output = self.build_neuron_group(output_kind, output_len, layer_origin(1), line, Some(id));
                subnet.neuron_groups.extend([input, output]);
                subnet.synapse_groups.push(self.build_synapse_group(
                    input,
                    output,
                    &ConnectionStrategy::default(),
                    Some(id),
                )?);
            },
            SubnetworkKind::Plain => {
                for (i, len) in layers.iter().enumerate() {
                    let group = self.build_neuron_group(
                        NeuronGroupKind::Plain,
                        *len,
                        layer_origin(i),
                        line.clone(),
                        Some(id),
                    );
                    subnet.neuron_groups.push(group);
                }
                let groups = subnet.neuron_groups.clone();
                for pair in groups.windows(2) {
                    let synapses = self.build_synapse_group(pair[0], pair[1], &ConnectionStrategy::default(), Some(id))?;
                    subnet.synapse_groups.push(synapses);
                }
            },
        }

        self.models.insert(id, NetworkModel::Subnetwork(subnet));
        self.events.fire(NetworkEvent::ModelAdded(id));
        Ok(id)
    }

    fn build_neuron_group(
        &mut self,
        kind: NeuronGroupKind,
        count: usize,
        origin: Point,
        layout: Option<GroupLayout>,
        parent: Option<ModelId>,
    ) -> ModelId {
        let id = self.allocate_id();
        let mut group = NeuronGroup::new(kind, origin, layout);
        group.id = id;
        group.parent = parent;
        for _ in 0..count {
            let mut neuron = Neuron::new(origin);
            neuron.parent = Some(id);
            group.neurons.push(self.insert_silent(NetworkModel::Neuron(neuron)));
        }
        self.models.insert(id, NetworkModel::NeuronGroup(group));
        id
    }

    fn build_synapse_group(
        &mut self,
        source: ModelId,
        target: ModelId,
        strategy: &ConnectionStrategy,
        parent: Option<ModelId>,
    ) -> Result<ModelId, NetworkError> {
        self.expect_kind(source, ModelKind::NeuronGroup, "neuron group")?;
        self.expect_kind(target, ModelKind::NeuronGroup, "neuron group")?;
        let id = self.allocate_id();
        let mut group = SynapseGroup::new(source, target);
        group.id = id;
        group.parent = parent;
        let pairs = strategy.pairs(self, &self.neurons_of(source), &self.neurons_of(target));
        for (from, to) in pairs {
            let mut synapse = Synapse::new(from, to);
            synapse.parent = Some(id);
            group.synapses.push(self.insert_silent(NetworkModel::Synapse(synapse)));
        }
        self.models.insert(id, NetworkModel::SynapseGroup(group));
        Ok(id)
    }

    fn build_weight_matrix(
        &mut self,
        source: ModelId,
        target: ModelId,
        parent: Option<ModelId>,
    ) -> Result<ModelId, NetworkError> {
        let rows = self.connectable_len(source)?;
        let cols = self.connectable_len(target)?;
        let mut matrix = WeightMatrix::new(source, target, rows, cols);
        matrix.parent = parent;
        if self.kind_of(source) == Some(ModelKind::NeuronArray) {
            matrix.randomize(&mut rand::thread_rng());
        } else {
            matrix.diagonalize();
        }

        let reverse: Vec<ModelId> = self
            .models
            .values()
            .filter_map(|model| match model {
                NetworkModel::WeightMatrix(m) if m.source == target && m.target == source => Some(m.id),
                _ => None,
            })
            .collect();
        if !reverse.is_empty() {
            matrix.use_curve = true;
            for id in reverse {
                if let Some(m) = self.weight_matrix_mut(id) {
                    m.use_curve = true;
                }
            }
        }

        Ok(self.insert_silent(NetworkModel::WeightMatrix(matrix)))
    }

    fn expect_kind(&self, id: ModelId, kind: ModelKind, expected: &'static str) -> Result<(), NetworkError> {
        match self.kind_of(id) {
            Some(actual) if actual == kind => Ok(()),
            Some(actual) => Err(NetworkError::WrongKind { id, expected, actual }),
            None => Err(NetworkError::UnknownModel(id)),
        }
    }

    /// Connect source neurons to target neurons with individual synapses.
    /// Ids that are not neurons are ignored.
    pub fn connect(
        &mut self,
        strategy: &ConnectionStrategy,
        sources: &[ModelId],
        targets: &[ModelId],
    ) -> Vec<ModelId> {
        let pairs = strategy.pairs(self, sources, targets);
        pairs
            .into_iter()
            .map(|(from, to)| self.add_model(NetworkModel::Synapse(Synapse::new(from, to))))
            .collect()
    }

    /// Apply any pending auto-layout of `id` (a group, or a subnetwork's
    /// groups) to member positions. Returns whether anything moved.
    pub fn prepare_for_display(&mut self, id: ModelId) -> bool {
        match self.models.get(&id) {
            Some(NetworkModel::NeuronGroup(_)) => self.apply_group_layout(id),
            Some(NetworkModel::Subnetwork(subnet)) => {
                let groups = subnet.neuron_groups.clone();
                groups
                    .into_iter()
                    .fold(false, |moved, group| self.apply_group_layout(group) || moved)
            },
            _ => false,
        }
    }

    fn apply_group_layout(&mut self, id: ModelId) -> bool {
        let Some(NetworkModel::NeuronGroup(group)) = self.models.get_mut(&id) else {
            return false;
        };
        if !group.needs_layout {
            return false;
        }
        group.needs_layout = false;
        let Some(layout) = group.layout.clone() else {
            return false;
        };
        let positions = layout.positions(group.origin, group.neurons.len());
        let members = group.neurons.clone();
        for (neuron, position) in members.into_iter().zip(positions) {
            if let Some(neuron) = self.neuron_mut(neuron) {
                neuron.position = position;
            }
        }
        true
    }

    /// Delete a model together with its members and every model that cannot
    /// exist without it (synapses of a deleted neuron, matrices of a deleted
    /// array ...). Collections and surviving containers just lose the member.
    pub fn delete(&mut self, id: ModelId) -> Result<RemovedModels, NetworkError> {
        if !self.models.contains_key(&id) {
            return Err(NetworkError::UnknownModel(id));
        }

        let mut order = Vec::new();
        let mut seen = HashSet::new();
        self.collect_removal(id, &mut order, &mut seen);

        let holders: Vec<ModelId> = self
            .models
            .values()
            .filter(|model| !seen.contains(&model.id()))
            .filter(|model| {
                matches!(
                    model.kind(),
                    ModelKind::NeuronGroup
                        | ModelKind::SynapseGroup
                        | ModelKind::Subnetwork
                        | ModelKind::NeuronCollection
                )
            })
            .map(NetworkModel::id)
            .collect();
        let mut detached = Vec::new();
        for holder in holders {
            let Some(model) = self.models.get_mut(&holder) else {
                continue;
            };
            for member in &order {
                if let Some(index) = model.detach(*member) {
                    detached.push(Detached {
                        container: holder,
                        member: *member,
                        index,
                    });
                }
            }
        }

        let models: Vec<NetworkModel> = order
            .iter()
            .filter_map(|removed| self.models.remove(removed))
            .collect();
        for model in &models {
            let covered_by_parent = model.parent().is_some_and(|parent| seen.contains(&parent));
            if !covered_by_parent {
                self.events.fire(NetworkEvent::ModelRemoved(model.id()));
            }
        }
        debug!("deleted {id} ({} models removed)", models.len());

        Ok(RemovedModels { models, detached })
    }

    fn collect_removal(&self, id: ModelId, order: &mut Vec<ModelId>, seen: &mut HashSet<ModelId>) {
        if !seen.insert(id) {
            return;
        }
        let Some(model) = self.models.get(&id) else {
            return;
        };
        let dependents: Vec<ModelId> = self
            .models
            .values()
            .filter(|other| other.depends_on(id))
            .map(NetworkModel::id)
            .collect();
        for dependent in dependents {
            self.collect_removal(dependent, order, seen);
        }
        for member in model.members() {
            self.collect_removal(member, order, seen);
        }
        order.push(id);
    }

    /// Put back what a delete removed, with the original ids. Announces the
    /// restored models that are not covered by a restored container.
    pub fn restore(&mut self, removed: RemovedModels) -> Result<Vec<ModelId>, NetworkError> {
        if let Some(taken) = removed
            .models
            .iter()
            .map(NetworkModel::id)
            .find(|id| self.models.contains_key(id))
        {
            return Err(NetworkError::DuplicateId(taken));
        }

        let ids: HashSet<ModelId> = removed.models.iter().map(NetworkModel::id).collect();
        let mut announced = Vec::new();
        for model in removed.models.into_iter().rev() {
            let id = model.id();
            self.next_id = self.next_id.max(id.raw() + 1);
            if model.parent().is_none_or(|parent| !ids.contains(&parent)) {
                announced.push(id);
            }
            self.models.insert(id, model);
        }
        for detached in removed.detached.iter().rev() {
            let Some(kind) = self.kind_of(detached.member) else {
                continue;
            };
            if let Some(container) = self.models.get_mut(&detached.container) {
                container.attach(detached.member, kind, detached.index);
            }
        }
        // merged deletes can list a container after the members it outlines
        announced.sort_by_key(|id| self.kind_of(*id).map(ModelKind::restore_rank));
        for id in &announced {
            self.events.fire(NetworkEvent::ModelAdded(*id));
        }
        Ok(announced)
    }

    /// Insert fresh copies of `models`, shifted by `offset`. Internal
    /// references are rewritten to the copies; a model referencing something
    /// outside the copied set is dropped. Returns the announced copies.
    pub fn insert_copies(&mut self, models: &[NetworkModel], offset: Vector) -> Vec<ModelId> {
        let map: HashMap<ModelId, ModelId> = models
            .iter()
            .map(|model| (model.id(), self.allocate_id()))
            .collect();

        let mut copies: Vec<NetworkModel> = models
            .iter()
            .filter_map(|model| {
                let mut copy = model.clone();
                if copy.remap(&map) {
                    copy.translate(offset);
                    Some(copy)
                } else {
                    debug!("not copying {}: it references models outside the copy", model.id());
                    None
                }
            })
            .collect();

        let kept: HashSet<ModelId> = copies.iter().map(NetworkModel::id).collect();
        for copy in &mut copies {
            for member in copy.members() {
                if !kept.contains(&member) {
                    copy.detach(member);
                }
            }
            if let NetworkModel::NeuronGroup(group) = copy {
                group.needs_layout = false;
            }
        }
        copies.sort_by_key(|model| model.kind().restore_rank());

        let mut announced = Vec::new();
        for copy in copies {
            let root = copy.parent().is_none();
            let id = self.insert_silent(copy);
            if root {
                announced.push(id);
            }
        }
        for id in &announced {
            self.events.fire(NetworkEvent::ModelAdded(*id));
        }
        announced
    }

    /// Models that are not covered by a container, ordered so every model
    /// comes after what it depends on. Views build themselves in this order.
    pub fn all_models_in_deserialization_order(&self) -> Vec<ModelId> {
        let mut roots: Vec<&NetworkModel> = self
            .models
            .values()
            .filter(|model| model.parent().is_none_or(|parent| !self.models.contains_key(&parent)))
            .collect();
        roots.sort_by_key(|model| (model.kind().restore_rank(), model.id()));
        roots.into_iter().map(NetworkModel::id).collect()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn update_time_display(&mut self, time: f64) {
        self.time = time;
        self.events.fire(NetworkEvent::TimeDisplayUpdated(time));
    }

    pub fn notify_update_completed(&mut self) {
        self.events.fire(NetworkEvent::UpdateCompleted);
    }
}
