/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Scene graph of visual nodes for the network panel.
//!
//! Core structures:
//! - `Scene`: visual nodes backed by petgraph::StableGraph plus the model registry
//! - `VisualNode`: wrapper around exactly one model id
//! - `SceneEdge`: containment (owning) or outline (collection) relation

use std::collections::HashMap;

use euclid::default::Box2D;
use netpanel_network::{
    ModelId, ModelKind, NetworkModel, Network, NeuronGroupKind, Point, SubnetworkKind, Vector,
};
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use serde::Serialize;

use crate::error::PanelError;

pub mod factory;

pub use factory::Materialize;

/// Stable visual node handle (petgraph NodeIndex, survives other deletions)
pub type VisualKey = NodeIndex;

/// Axis-aligned box in network space
pub type Bounds = Box2D<f64>;

/// Side of the square drawn for a neuron
pub const NEURON_SIZE: f64 = 24.0;

/// Padding between a container outline and its members
pub const CONTAINER_PADDING: f64 = 10.0;

const ARRAY_CELL_WIDTH: f64 = 10.0;
const ARRAY_MIN_WIDTH: f64 = 40.0;
const ARRAY_HEIGHT: f64 = 40.0;
const TEXT_CHAR_WIDTH: f64 = 7.0;
const TEXT_HEIGHT: f64 = 16.0;
const CLASSIFIER_SIZE: (f64, f64) = (80.0, 60.0);

/// Relation between two visual nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SceneEdge {
    /// Container owns member; removing the container removes the member
    Contains,

    /// Collection outlines a neuron it does not own
    Outlines,
}

/// Visual variant, mirroring the model kind it wraps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VisualKind {
    Neuron,
    Synapse { source: VisualKey, target: VisualKey },
    NeuronArray,
    NeuronCollection,
    NeuronGroup(NeuronGroupKind),
    SynapseGroup { source: VisualKey, target: VisualKey },
    WeightMatrix { source: VisualKey, target: VisualKey },
    Subnetwork(SubnetworkKind),
    Text,
    Classifier,
}

impl VisualKind {
    /// Model kind this visual variant stands for
    pub fn model_kind(self) -> ModelKind {
        match self {
            VisualKind::Neuron => ModelKind::Neuron,
            VisualKind::Synapse { .. } => ModelKind::Synapse,
            VisualKind::NeuronArray => ModelKind::NeuronArray,
            VisualKind::NeuronCollection => ModelKind::NeuronCollection,
            VisualKind::NeuronGroup(_) => ModelKind::NeuronGroup,
            VisualKind::SynapseGroup { .. } => ModelKind::SynapseGroup,
            VisualKind::WeightMatrix { .. } => ModelKind::WeightMatrix,
            VisualKind::Subnetwork(_) => ModelKind::Subnetwork,
            VisualKind::Text => ModelKind::Text,
            VisualKind::Classifier => ModelKind::Classifier,
        }
    }

    /// Source and target keys of edge-like variants
    pub fn endpoints(self) -> Option<(VisualKey, VisualKey)> {
        match self {
            VisualKind::Synapse { source, target }
            | VisualKind::SynapseGroup { source, target }
            | VisualKind::WeightMatrix { source, target } => Some((source, target)),
            _ => None,
        }
    }
}

/// Visual counterpart of one model object
#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    /// Wrapped model
    pub model: ModelId,

    pub kind: VisualKind,

    pub visible: bool,

    /// Drawn beneath other nodes (edges and connection groups)
    pub lowered: bool,
}

impl VisualNode {
    pub fn new(model: ModelId, kind: VisualKind) -> Self {
        Self {
            model,
            kind,
            visible: true,
            lowered: false,
        }
    }

    pub fn lowered(mut self) -> Self {
        self.lowered = true;
        self
    }
}

/// Visual nodes plus the model-to-node registry
#[derive(Debug, Clone, Default)]
pub struct Scene {
    inner: StableGraph<VisualNode, SceneEdge, Directed>,

    /// Model id to visual node. One entry per live visual node.
    registry: HashMap<ModelId, VisualKey>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the visual node for `id`, register it, and attach it to the
    /// visual node of its owning container when that one is displayed
    pub fn materialize(&mut self, network: &Network, id: ModelId) -> Result<VisualKey, PanelError> {
        let model = network.get(id).ok_or(PanelError::UnknownModel(id))?;
        let key = model.materialize(network, self)?;
        if let Some(container) = model.parent().and_then(|parent| self.key_for(parent)) {
            self.contain(container, key);
        }
        if model.kind() == ModelKind::Neuron {
            self.restore_outlines(network, id);
        }
        Ok(key)
    }

    /// Re-outline `neuron` from every displayed collection that lists it.
    /// Outlines follow the collection's member order.
    fn restore_outlines(&mut self, network: &Network, neuron: ModelId) {
        let collections: Vec<(VisualKey, Vec<ModelId>)> = network
            .models()
            .filter_map(|model| match model {
                NetworkModel::NeuronCollection(collection) if collection.neurons.contains(&neuron) => self
                    .key_for(collection.id)
                    .map(|key| (key, collection.neurons.clone())),
                _ => None,
            })
            .collect();
        for (key, members) in collections {
            let stale: Vec<_> = self
                .inner
                .edges_directed(key, Direction::Outgoing)
                .filter(|edge| *edge.weight() == SceneEdge::Outlines)
                .map(|edge| edge.id())
                .collect();
            for edge in stale {
                self.inner.remove_edge(edge);
            }
            for member in members {
                if let Some(member) = self.key_for(member) {
                    self.outline(key, member);
                }
            }
        }
    }

    /// Register a new visual node. Fails if its model already has one.
    pub(crate) fn insert(&mut self, node: VisualNode) -> Result<VisualKey, PanelError> {
        if self.registry.contains_key(&node.model) {
            return Err(PanelError::AlreadyRegistered(node.model));
        }
        let model = node.model;
        let key = self.inner.add_node(node);
        self.registry.insert(model, key);
        Ok(key)
    }

    pub(crate) fn contain(&mut self, container: VisualKey, member: VisualKey) {
        if self.inner.find_edge(container, member).is_none() {
            self.inner.add_edge(container, member, SceneEdge::Contains);
        }
    }

    pub(crate) fn outline(&mut self, collection: VisualKey, member: VisualKey) {
        if self.inner.find_edge(collection, member).is_none() {
            self.inner.add_edge(collection, member, SceneEdge::Outlines);
        }
    }

    /// Remove a visual node and everything it contains. Returns the removed
    /// nodes as (key, model) pairs, members before their container.
    pub fn remove(&mut self, key: VisualKey) -> Vec<(VisualKey, ModelId)> {
        let mut removed = Vec::new();
        self.remove_into(key, &mut removed);
        removed
    }

    fn remove_into(&mut self, key: VisualKey, removed: &mut Vec<(VisualKey, ModelId)>) {
        for member in self.members_of(key) {
            self.remove_into(member, removed);
        }
        if let Some(node) = self.inner.remove_node(key) {
            if self.registry.get(&node.model) == Some(&key) {
                self.registry.remove(&node.model);
            }
            removed.push((key, node.model));
        }
    }

    /// Visual node registered for a model
    pub fn key_for(&self, model: ModelId) -> Option<VisualKey> {
        self.registry.get(&model).copied()
    }

    /// Model wrapped by a visual node
    pub fn model_of(&self, key: VisualKey) -> Option<ModelId> {
        self.inner.node_weight(key).map(|node| node.model)
    }

    /// Get a visual node by key
    pub fn node(&self, key: VisualKey) -> Option<&VisualNode> {
        self.inner.node_weight(key)
    }

    /// Get a mutable visual node by key
    pub fn node_mut(&mut self, key: VisualKey) -> Option<&mut VisualNode> {
        self.inner.node_weight_mut(key)
    }

    /// Iterate over all visual nodes as (key, node) pairs
    pub fn nodes(&self) -> impl Iterator<Item = (VisualKey, &VisualNode)> {
        self.inner.node_indices().map(move |key| (key, &self.inner[key]))
    }

    /// Iterate over registry entries
    pub fn registry(&self) -> impl Iterator<Item = (ModelId, VisualKey)> + '_ {
        self.registry.iter().map(|(model, key)| (*model, *key))
    }

    pub fn registry_len(&self) -> usize {
        self.registry.len()
    }

    /// Count of visual nodes
    pub fn len(&self) -> usize {
        self.inner.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Owned members of a container node, in the order they were added
    pub fn members_of(&self, key: VisualKey) -> Vec<VisualKey> {
        self.related(key, SceneEdge::Contains)
    }

    /// Neurons outlined by a collection node, in the order they were added
    pub fn outlined_by(&self, key: VisualKey) -> Vec<VisualKey> {
        self.related(key, SceneEdge::Outlines)
    }

    fn related(&self, key: VisualKey, relation: SceneEdge) -> Vec<VisualKey> {
        let mut related: Vec<VisualKey> = self
            .inner
            .edges_directed(key, Direction::Outgoing)
            .filter(|edge| *edge.weight() == relation)
            .map(|edge| edge.target())
            .collect();
        // petgraph yields the most recent edge first
        related.reverse();
        related
    }

    /// Container that owns this node, if any
    pub fn container_of(&self, key: VisualKey) -> Option<VisualKey> {
        self.inner
            .edges_directed(key, Direction::Incoming)
            .find(|edge| *edge.weight() == SceneEdge::Contains)
            .map(|edge| edge.source())
    }

    /// Nodes not owned by any container
    pub fn top_level(&self) -> Vec<VisualKey> {
        self.inner
            .node_indices()
            .filter(|key| self.container_of(*key).is_none())
            .collect()
    }

    /// Bounds of a visual node, derived from its model's geometry
    pub fn bounds(&self, key: VisualKey, network: &Network) -> Option<Bounds> {
        let node = self.inner.node_weight(key)?;
        match (node.kind, network.get(node.model)?) {
            (VisualKind::Neuron, NetworkModel::Neuron(neuron)) => Some(neuron_bounds(neuron.position)),
            (VisualKind::NeuronArray, NetworkModel::NeuronArray(array)) => {
                let width = (array.len() as f64 * ARRAY_CELL_WIDTH).max(ARRAY_MIN_WIDTH);
                Some(Box2D::new(array.position, array.position + Vector::new(width, ARRAY_HEIGHT)))
            },
            (VisualKind::Text, NetworkModel::Text(text)) => {
                let width = (text.text.chars().count().max(1)) as f64 * TEXT_CHAR_WIDTH;
                Some(Box2D::new(text.position, text.position + Vector::new(width, TEXT_HEIGHT)))
            },
            (VisualKind::Classifier, NetworkModel::Classifier(classifier)) => Some(Box2D::new(
                classifier.position,
                classifier.position + Vector::new(CLASSIFIER_SIZE.0, CLASSIFIER_SIZE.1),
            )),
            (kind, _) => {
                if let Some((source, target)) = kind.endpoints() {
                    let from = self.bounds(source, network)?.center();
                    let to = self.bounds(target, network)?.center();
                    return Some(Box2D::from_points([from, to]));
                }
                let members = self
                    .members_of(key)
                    .into_iter()
                    .chain(self.outlined_by(key))
                    .filter_map(|member| self.bounds(member, network));
                union(members).map(|bounds| bounds.inflate(CONTAINER_PADDING, CONTAINER_PADDING))
            },
        }
    }

    /// Union of the bounds of every top-level node
    pub fn union_bounds(&self, network: &Network) -> Option<Bounds> {
        union(
            self.top_level()
                .into_iter()
                .filter_map(|key| self.bounds(key, network)),
        )
    }

    /// Serializable description of the scene, ordered by model id
    pub fn summary(&self, network: &Network) -> SceneSummary {
        let mut nodes: Vec<NodeSummary> = self
            .nodes()
            .map(|(key, node)| NodeSummary {
                model: node.model,
                kind: node.kind.model_kind(),
                container: self.container_of(key).and_then(|container| self.model_of(container)),
                visible: node.visible,
                lowered: node.lowered,
                bounds: self.bounds(key, network).map(bounds_array),
            })
            .collect();
        nodes.sort_by_key(|node| node.model);
        SceneSummary { nodes }
    }
}

fn neuron_bounds(centre: Point) -> Bounds {
    let half = Vector::new(NEURON_SIZE / 2.0, NEURON_SIZE / 2.0);
    Box2D::new(centre - half, centre + half)
}

fn union(boxes: impl IntoIterator<Item = Bounds>) -> Option<Bounds> {
    boxes.into_iter().reduce(|acc, next| acc.union(&next))
}

pub(crate) fn bounds_array(bounds: Bounds) -> [f64; 4] {
    [bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y]
}

/// Portable description of one visual node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSummary {
    pub model: ModelId,
    pub kind: ModelKind,
    pub container: Option<ModelId>,
    pub visible: bool,
    pub lowered: bool,
    /// `[min_x, min_y, max_x, max_y]`
    pub bounds: Option<[f64; 4]>,
}

/// Portable description of a scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSummary {
    pub nodes: Vec<NodeSummary>,
}
