/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Domain model behind the network editing panel.
//!
//! Core structures:
//! - `Network`: owner of every model object, keyed by `ModelId`
//! - `NetworkModel`: the concrete model kinds (neurons, synapses, arrays, groups ...)
//! - `NetworkEvent`: structural change notifications delivered over channels
//!
//! This crate carries no simulation loop. It only stores the objects the panel
//! displays and the edit primitives the panel applies to them.

pub mod annotation;
pub mod connect;
pub mod error;
pub mod events;
pub mod group;
pub mod layout;
pub mod matrix;
pub mod model;
pub mod network;
pub mod neuron;
pub mod snapshot;
pub mod synapse;

pub use annotation::{Classifier, TextObject};
pub use connect::{ConnectionStrategy, Orientation};
pub use error::NetworkError;
pub use events::NetworkEvent;
pub use group::{
    NeuronCollection, NeuronGroup, NeuronGroupKind, Subnetwork, SubnetworkKind, SynapseGroup,
};
pub use layout::{GroupLayout, LineOrientation};
pub use matrix::{NeuronArray, WeightMatrix};
pub use model::{ModelId, ModelKind, NetworkModel};
pub use network::{Detached, Network, RemovedModels};
pub use neuron::{BinaryRule, LinearRule, Neuron, UpdateRule};
pub use snapshot::NetworkSnapshot;
pub use synapse::Synapse;

/// Position in network (model) space.
pub type Point = euclid::default::Point2D<f64>;

/// Offset in network (model) space.
pub type Vector = euclid::default::Vector2D<f64>;
