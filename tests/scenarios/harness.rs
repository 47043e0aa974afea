/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::time::Duration;

use netpanel::network::{ModelId, Network, Neuron, Point};
use netpanel::{NetworkPanel, PanelConfig, VisualKey};

/// A network with a panel attached.
pub struct Session {
    pub network: Network,
    pub panel: NetworkPanel,
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(PanelConfig::default())
    }

    pub fn with_config(config: PanelConfig) -> Self {
        let mut network = Network::new();
        let panel = NetworkPanel::new(&mut network, config);
        Self { network, panel }
    }

    pub fn from_network(mut network: Network) -> Self {
        let panel = NetworkPanel::new(&mut network, PanelConfig::default());
        Self { network, panel }
    }

    pub fn pump(&mut self) {
        self.panel.pump_network_events(&mut self.network);
    }

    /// Add loose neurons at `points` and display them.
    pub fn neurons(&mut self, points: &[(f64, f64)]) -> Vec<ModelId> {
        let ids = points
            .iter()
            .map(|(x, y)| self.network.add_neuron(Neuron::new(Point::new(*x, *y))))
            .collect();
        self.pump();
        ids
    }

    pub fn keys(&self, ids: &[ModelId]) -> Vec<VisualKey> {
        ids.iter()
            .map(|id| self.panel.scene().key_for(*id).expect("model is displayed"))
            .collect()
    }

    pub fn select(&mut self, ids: &[ModelId]) {
        let keys = self.keys(ids);
        self.panel.selection_mut().set_many(keys);
    }

    pub fn select_source(&mut self, ids: &[ModelId]) {
        let keys = self.keys(ids);
        self.panel.selection_mut().set_many_source(keys);
    }

    pub fn position(&self, id: ModelId) -> (f64, f64) {
        let neuron = self.network.neuron(id).expect("neuron exists");
        (neuron.position.x, neuron.position.y)
    }

    /// Models outlined by the visual node of `collection`, in outline order.
    pub fn outlined(&self, collection: ModelId) -> Vec<ModelId> {
        let scene = self.panel.scene();
        let key = scene.key_for(collection).expect("collection is displayed");
        scene
            .outlined_by(key)
            .into_iter()
            .filter_map(|member| scene.model_of(member))
            .collect()
    }

    /// The collection's outline matches its member list.
    pub fn assert_outline_matches(&self, collection: ModelId) {
        assert_eq!(self.outlined(collection), self.network.neurons_of(collection));
    }

    /// Apply fits until none comes due within `quiet`.
    pub fn settle_camera(&mut self, quiet: Duration) {
        while self.panel.wait_for_camera_fit(&self.network, quiet) {}
    }

    /// Every registry entry points at a node wrapping that model, and the
    /// registry covers exactly the displayed models.
    pub fn assert_registry_consistent(&self) {
        let scene = self.panel.scene();
        assert_eq!(scene.registry_len(), scene.len());
        for (model, key) in scene.registry() {
            assert_eq!(scene.node(key).map(|node| node.model), Some(model));
            assert!(self.network.contains(model), "{model} is displayed but gone");
        }
    }
}
