/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Edits applied to the current selection.
//!
//! Every operation works on a snapshot of the selection taken when it is
//! called. Empty selections make them no-ops.

use log::debug;
use netpanel_network::{ModelId, ModelKind, Network, NetworkModel, Neuron, RemovedModels};

use super::NetworkPanel;
use crate::scene::VisualKind;
use crate::undo::UndoableAction;

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl NetworkPanel {
    fn selected(&self, kind: ModelKind) -> Vec<ModelId> {
        self.selection.filter_selected_models(&self.scene, kind)
    }

    fn each_selected_neuron(&self, network: &mut Network, mut edit: impl FnMut(&mut Neuron)) {
        for id in self.selected(ModelKind::Neuron) {
            if let Some(neuron) = network.neuron_mut(id) {
                edit(neuron);
            }
        }
    }

    /// Add `neuron` at the next placement position. Undoable.
    pub fn place_neuron(&mut self, network: &mut Network, mut neuron: Neuron) -> ModelId {
        neuron.position = self.placement.next_position();
        let id = network.add_neuron(neuron);
        self.record(UndoableAction::added(vec![id]));
        self.pump_network_events(network);
        id
    }

    /// Delete every selected model, as one undoable step, then force a fit.
    pub fn delete_selected_objects(&mut self, network: &mut Network) {
        let ids = self.selection.selected_models(&self.scene);
        let mut removed = RemovedModels::default();
        let mut deleted = Vec::new();
        for id in ids {
            if !network.contains(id) {
                // went with an earlier deletion
                continue;
            }
            match network.delete(id) {
                Ok(batch) => {
                    removed.extend(batch);
                    deleted.push(id);
                },
                Err(err) => debug!("cannot delete {id}: {err}"),
            }
        }
        if !deleted.is_empty() {
            self.record(UndoableAction::deleted(deleted, removed));
        }
        self.pump_network_events(network);
        self.zoom_to_fit_page_forced();
    }

    /// Put the selected models on the clipboard and start a new paste burst.
    pub fn copy(&mut self, network: &Network) {
        if self.selection.is_empty() {
            return;
        }
        let ids = self.selection.selected_models(&self.scene);
        self.clipboard.clear();
        self.clipboard.add(network, &ids);
        self.placement.set_new_copy();
    }

    pub fn cut(&mut self, network: &mut Network) {
        self.copy(network);
        self.delete_selected_objects(network);
    }

    /// Insert the clipboard contents, each paste further offset from the
    /// originals. The copies become the selection. Undoable.
    pub fn paste(&mut self, network: &mut Network) -> Vec<ModelId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let offset = self.placement.paste_offset();
        let pasted = self.clipboard.paste(network, offset);
        if pasted.is_empty() {
            return pasted;
        }
        self.record(UndoableAction::added(pasted.clone()));
        self.pump_network_events(network);
        let keys: Vec<_> = pasted.iter().filter_map(|id| self.scene.key_for(*id)).collect();
        self.selection.set_many(keys);
        pasted
    }

    pub fn duplicate(&mut self, network: &mut Network) -> Vec<ModelId> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.copy(network);
        self.paste(network)
    }

    /// Line selected neurons up on the topmost one's y.
    pub fn align_vertical(&mut self, network: &mut Network) {
        self.align(network, Axis::Y);
    }

    /// Line selected neurons up on the leftmost one's x.
    pub fn align_horizontal(&mut self, network: &mut Network) {
        self.align(network, Axis::X);
    }

    fn align(&mut self, network: &mut Network, axis: Axis) {
        let ids = self.selected(ModelKind::Neuron);
        let min = ids
            .iter()
            .filter_map(|id| network.neuron(*id))
            .map(|neuron| coordinate(neuron, axis))
            .reduce(f64::min);
        let Some(min) = min else {
            return;
        };
        for id in ids {
            if let Some(neuron) = network.neuron_mut(id) {
                set_coordinate(neuron, axis, min);
            }
        }
    }

    pub fn space_horizontal(&mut self, network: &mut Network) {
        self.space(network, Axis::X);
    }

    pub fn space_vertical(&mut self, network: &mut Network) {
        self.space(network, Axis::Y);
    }

    /// Spread selected neurons along `axis`, keeping their order.
    fn space(&mut self, network: &mut Network, axis: Axis) {
        let mut neurons: Vec<(ModelId, f64)> = self
            .selected(ModelKind::Neuron)
            .into_iter()
            .filter_map(|id| network.neuron(id).map(|neuron| (id, coordinate(neuron, axis))))
            .collect();
        if neurons.len() < 2 {
            return;
        }
        neurons.sort_by(|a, b| a.1.total_cmp(&b.1));
        let min = neurons[0].1;
        let max = neurons[neurons.len() - 1].1;
        let spacing = (max - min) / neurons.len() as f64 - 1.0;
        for (i, (id, _)) in neurons.into_iter().enumerate() {
            if let Some(neuron) = network.neuron_mut(id) {
                set_coordinate(neuron, axis, min + spacing * i as f64);
            }
        }
    }

    /// Move selected neurons by `(dx, dy)` nudge steps.
    pub fn nudge(&mut self, network: &mut Network, dx: f64, dy: f64) {
        let step = self.config.nudge_amount;
        self.each_selected_neuron(network, |neuron| neuron.offset(dx * step, dy * step));
    }

    /// Flip clamping on selected neurons and freezing on selected synapses.
    pub fn toggle_clamping(&mut self, network: &mut Network) {
        self.each_selected_neuron(network, Neuron::toggle_clamped);
        for id in self.selected(ModelKind::Synapse) {
            if let Some(synapse) = network.synapse_mut(id) {
                synapse.toggle_frozen();
            }
        }
    }

    pub fn increment_selected_objects(&mut self, network: &mut Network) {
        self.step_selected(network, Step::Up, false);
    }

    pub fn decrement_selected_objects(&mut self, network: &mut Network) {
        self.step_selected(network, Step::Down, false);
    }

    /// Like [`NetworkPanel::increment_selected_objects`], but neurons use
    /// their rule's contextual step.
    pub fn contextual_increment_selected_objects(&mut self, network: &mut Network) {
        self.step_selected(network, Step::Up, true);
    }

    pub fn contextual_decrement_selected_objects(&mut self, network: &mut Network) {
        self.step_selected(network, Step::Down, true);
    }

    fn step_selected(&mut self, network: &mut Network, step: Step, contextual: bool) {
        self.each_selected_neuron(network, |neuron| match (step, contextual) {
            (Step::Up, false) => neuron.increment_activation(),
            (Step::Down, false) => neuron.decrement_activation(),
            (Step::Up, true) => neuron.contextual_increment(),
            (Step::Down, true) => neuron.contextual_decrement(),
        });
        for id in self.selected(ModelKind::Synapse) {
            if let Some(synapse) = network.synapse_mut(id) {
                match step {
                    Step::Up => synapse.increment_weight(),
                    Step::Down => synapse.decrement_weight(),
                }
            }
        }
        for id in self.selected(ModelKind::NeuronArray) {
            if let Some(array) = network.neuron_array_mut(id) {
                match step {
                    Step::Up => array.increment(),
                    Step::Down => array.decrement(),
                }
            }
        }
        for id in self.selected(ModelKind::WeightMatrix) {
            if let Some(matrix) = network.weight_matrix_mut(id) {
                match step {
                    Step::Up => matrix.increment(),
                    Step::Down => matrix.decrement(),
                }
            }
        }
    }

    /// Reset selected objects: activations, strengths and weights go to zero.
    pub fn clear_selected_objects(&mut self, network: &mut Network) {
        let ids = self.selection.selected_models(&self.scene);
        for id in ids {
            let members = match network.get_mut(id) {
                Some(NetworkModel::Neuron(neuron)) => {
                    neuron.clear();
                    continue;
                },
                Some(NetworkModel::Synapse(synapse)) => {
                    synapse.force_set_strength(0.0);
                    continue;
                },
                Some(NetworkModel::NeuronArray(array)) => {
                    array.clear();
                    continue;
                },
                Some(NetworkModel::WeightMatrix(matrix)) => {
                    matrix.clear();
                    continue;
                },
                Some(NetworkModel::NeuronGroup(group)) => group.neurons.clone(),
                _ => continue,
            };
            for member in members {
                if let Some(neuron) = network.neuron_mut(member) {
                    neuron.clear();
                }
            }
        }
    }

    /// Clear every displayed neuron.
    pub fn clear_neurons(&mut self, network: &mut Network) {
        let neurons: Vec<ModelId> = self
            .scene
            .nodes()
            .filter(|(_, node)| node.kind == VisualKind::Neuron)
            .map(|(_, node)| node.model)
            .collect();
        for id in neurons {
            if let Some(neuron) = network.neuron_mut(id) {
                neuron.clear();
            }
        }
    }

    /// Replace the selection with the neurons of the selected groups.
    pub fn select_neurons_in_groups(&mut self) {
        let groups = self
            .selection
            .filter_selected_nodes(&self.scene, |kind| matches!(kind, VisualKind::NeuronGroup(_)));
        if groups.is_empty() {
            return;
        }
        let neurons: Vec<_> = groups
            .into_iter()
            .flat_map(|group| self.scene.members_of(group))
            .collect();
        self.selection.set_many(neurons);
    }
}

#[derive(Clone, Copy)]
enum Step {
    Up,
    Down,
}

fn coordinate(neuron: &Neuron, axis: Axis) -> f64 {
    match axis {
        Axis::X => neuron.position.x,
        Axis::Y => neuron.position.y,
    }
}

fn set_coordinate(neuron: &mut Neuron, axis: Axis, value: f64) {
    match axis {
        Axis::X => neuron.position.x = value,
        Axis::Y => neuron.position.y = value,
    }
}

#[cfg(test)]
mod tests {
    use netpanel_network::{NeuronArray, NeuronGroupKind, Point, Synapse};
    use rstest::rstest;

    use super::*;
    use crate::config::PanelConfig;

    fn setup(points: &[(f64, f64)]) -> (Network, NetworkPanel, Vec<ModelId>) {
        let mut network = Network::new();
        let ids: Vec<ModelId> = points
            .iter()
            .map(|(x, y)| network.add_neuron(Neuron::new(Point::new(*x, *y))))
            .collect();
        let mut panel = NetworkPanel::new(&mut network, PanelConfig::default());
        select(&mut panel, &ids);
        (network, panel, ids)
    }

    fn select(panel: &mut NetworkPanel, ids: &[ModelId]) {
        let keys: Vec<_> = ids.iter().filter_map(|id| panel.scene().key_for(*id)).collect();
        panel.selection_mut().set_many(keys);
    }

    fn xs(network: &Network, ids: &[ModelId]) -> Vec<f64> {
        ids.iter().filter_map(|id| network.neuron(*id)).map(|n| n.position.x).collect()
    }

    fn ys(network: &Network, ids: &[ModelId]) -> Vec<f64> {
        ids.iter().filter_map(|id| network.neuron(*id)).map(|n| n.position.y).collect()
    }

    #[test]
    fn test_align_vertical_snaps_to_min_y() {
        let (mut network, mut panel, ids) = setup(&[(10.0, 5.0), (20.0, 3.0), (30.0, 9.0)]);
        panel.align_vertical(&mut network);
        assert_eq!(ys(&network, &ids), vec![3.0, 3.0, 3.0]);
        assert_eq!(xs(&network, &ids), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_align_horizontal_snaps_to_min_x() {
        let (mut network, mut panel, ids) = setup(&[(10.0, 5.0), (-4.0, 3.0)]);
        panel.align_horizontal(&mut network);
        assert_eq!(xs(&network, &ids), vec![-4.0, -4.0]);
    }

    #[test]
    fn test_space_horizontal() {
        let (mut network, mut panel, ids) = setup(&[(30.0, 0.0), (0.0, 0.0), (20.0, 0.0), (10.0, 0.0)]);
        panel.space_horizontal(&mut network);
        // sorted order: ids[1], ids[3], ids[2], ids[0]; spacing = 30 / 4 - 1
        assert_eq!(xs(&network, &ids), vec![19.5, 0.0, 13.0, 6.5]);
    }

    #[test]
    fn test_space_vertical_needs_two_neurons() {
        let (mut network, mut panel, ids) = setup(&[(0.0, 40.0)]);
        panel.space_vertical(&mut network);
        assert_eq!(ys(&network, &ids), vec![40.0]);
    }

    #[rstest]
    #[case(1.0, 0.0, (2.0, 0.0))]
    #[case(-1.0, 1.0, (-2.0, 2.0))]
    #[case(0.0, -3.0, (0.0, -6.0))]
    fn test_nudge_scales_by_nudge_amount(#[case] dx: f64, #[case] dy: f64, #[case] expected: (f64, f64)) {
        let (mut network, mut panel, ids) = setup(&[(0.0, 0.0)]);
        panel.nudge(&mut network, dx, dy);
        let neuron = network.neuron(ids[0]).unwrap();
        assert_eq!((neuron.position.x, neuron.position.y), expected);
    }

    #[test]
    fn test_empty_selection_ops_are_harmless() {
        let (mut network, mut panel, ids) = setup(&[(5.0, 5.0), (9.0, 1.0)]);
        panel.selection_mut().clear();
        panel.align_vertical(&mut network);
        panel.space_horizontal(&mut network);
        panel.nudge(&mut network, 1.0, 1.0);
        panel.increment_selected_objects(&mut network);
        panel.delete_selected_objects(&mut network);
        assert_eq!(xs(&network, &ids), vec![5.0, 9.0]);
        assert_eq!(network.len(), 2);
        assert!(!panel.undo_manager().can_undo());
    }

    #[test]
    fn test_toggle_clamping_flips_neurons_and_synapses() {
        let (mut network, mut panel, ids) = setup(&[(0.0, 0.0), (50.0, 0.0)]);
        let s = network.add_synapse(Synapse::new(ids[0], ids[1])).unwrap();
        panel.pump_network_events(&mut network);
        select(&mut panel, &[ids[0], s]);

        panel.toggle_clamping(&mut network);
        assert!(network.neuron(ids[0]).unwrap().clamped);
        assert!(!network.neuron(ids[1]).unwrap().clamped);
        assert!(network.synapse(s).unwrap().frozen);
    }

    #[test]
    fn test_increment_and_clear_mixed_selection() {
        let (mut network, mut panel, ids) = setup(&[(0.0, 0.0), (50.0, 0.0)]);
        let s = network.add_synapse(Synapse::new(ids[0], ids[1])).unwrap();
        let array = network.add_neuron_array(NeuronArray::new(Point::new(0.0, 100.0), 2));
        panel.pump_network_events(&mut network);
        select(&mut panel, &[ids[0], s, array]);

        panel.increment_selected_objects(&mut network);
        assert!((network.neuron(ids[0]).unwrap().activation - 0.1).abs() < 1e-9);
        assert_eq!(network.synapse(s).unwrap().strength, 2.0);
        let Some(NetworkModel::NeuronArray(a)) = network.get(array) else {
            panic!("array missing");
        };
        assert!(a.activations.iter().all(|v| (v - 0.1).abs() < 1e-9));

        panel.clear_selected_objects(&mut network);
        assert_eq!(network.neuron(ids[0]).unwrap().activation, 0.0);
        assert_eq!(network.synapse(s).unwrap().strength, 0.0);
    }

    #[test]
    fn test_clear_group_clears_members() {
        let mut network = Network::new();
        let group = network.add_neuron_group(NeuronGroupKind::Plain, 2, Point::origin(), None);
        for neuron in network.neurons_of(group) {
            network.neuron_mut(neuron).unwrap().activation = 0.7;
        }
        let mut panel = NetworkPanel::new(&mut network, PanelConfig::default());
        select(&mut panel, &[group]);
        panel.clear_selected_objects(&mut network);
        for neuron in network.neurons_of(group) {
            assert_eq!(network.neuron(neuron).unwrap().activation, 0.0);
        }
    }

    #[test]
    fn test_select_neurons_in_groups() {
        let mut network = Network::new();
        let group = network.add_neuron_group(NeuronGroupKind::Plain, 3, Point::origin(), None);
        let mut panel = NetworkPanel::new(&mut network, PanelConfig::default());
        select(&mut panel, &[group]);
        panel.select_neurons_in_groups();
        assert_eq!(panel.selection().selected_models(panel.scene()), network.neurons_of(group));
    }

    #[test]
    fn test_place_neuron_advances_and_is_undoable() {
        let mut network = Network::new();
        let mut panel = NetworkPanel::new(&mut network, PanelConfig::default());
        let a = panel.place_neuron(&mut network, Neuron::new(Point::new(999.0, 999.0)));
        let b = panel.place_neuron(&mut network, Neuron::new(Point::origin()));
        assert_eq!(network.neuron(a).unwrap().position, Point::new(0.0, 0.0));
        assert_eq!(network.neuron(b).unwrap().position, Point::new(45.0, 0.0));

        assert!(panel.undo(&mut network));
        assert!(!network.contains(b));
        assert!(panel.scene().key_for(b).is_none());
        assert!(panel.redo(&mut network));
        assert!(panel.scene().key_for(b).is_some());
    }

    #[test]
    fn test_delete_selected_then_undo_restores_synapses() {
        let (mut network, mut panel, ids) = setup(&[(0.0, 0.0), (50.0, 0.0)]);
        let s = network.add_synapse(Synapse::new(ids[0], ids[1])).unwrap();
        panel.pump_network_events(&mut network);
        select(&mut panel, &[ids[0]]);

        panel.delete_selected_objects(&mut network);
        assert!(!network.contains(s));
        assert!(panel.scene().key_for(ids[0]).is_none());

        assert!(panel.undo(&mut network));
        let ks = panel.scene().key_for(s).unwrap();
        let ka = panel.scene().key_for(ids[0]).unwrap();
        let kb = panel.scene().key_for(ids[1]).unwrap();
        assert_eq!(panel.scene().node(ks).unwrap().kind, VisualKind::Synapse { source: ka, target: kb });
    }

    #[test]
    fn test_paste_offsets_and_selects_copies() {
        let (mut network, mut panel, ids) = setup(&[(0.0, 0.0), (50.0, 0.0)]);
        network.add_synapse(Synapse::new(ids[0], ids[1])).unwrap();
        panel.pump_network_events(&mut network);
        select(&mut panel, &ids);

        panel.copy(&network);
        let first = panel.paste(&mut network);
        let second = panel.paste(&mut network);
        assert_eq!(first.len(), 3);
        assert_eq!(network.neuron(first[0]).unwrap().position, Point::new(15.0, 15.0));
        assert_eq!(network.neuron(second[0]).unwrap().position, Point::new(30.0, 30.0));
        assert_eq!(panel.selection().selected_models(panel.scene()), second);
    }

    #[test]
    fn test_cut_removes_and_paste_brings_back_copies() {
        let (mut network, mut panel, ids) = setup(&[(0.0, 0.0)]);
        panel.cut(&mut network);
        assert!(network.is_empty());
        let pasted = panel.paste(&mut network);
        assert_eq!(pasted.len(), 1);
        assert_ne!(pasted[0], ids[0]);
    }
}
