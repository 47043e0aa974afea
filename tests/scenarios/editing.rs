/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use netpanel::network::{NeuronGroupKind, Point, Synapse};
use rstest::rstest;

use crate::harness::Session;

#[test]
fn align_vertical_moves_everything_to_the_top() {
    let mut session = Session::new();
    let ids = session.neurons(&[(0.0, 10.0), (30.0, 40.0), (60.0, 25.0)]);
    session.select(&ids);
    session.panel.align_vertical(&mut session.network);
    for id in &ids {
        assert_eq!(session.position(*id).1, 10.0);
    }
}

#[test]
fn space_horizontal_uses_range_over_count() {
    let mut session = Session::new();
    let ids = session.neurons(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0)]);
    session.select(&ids);
    session.panel.space_horizontal(&mut session.network);

    let spacing = (30.0 - 0.0) / 4.0 - 1.0;
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(session.position(*id).0, spacing * i as f64);
    }
}

#[rstest]
#[case::right(1.0, 0.0)]
#[case::down(0.0, 1.0)]
#[case::diagonal(-1.0, -1.0)]
fn nudge_moves_only_selected_neurons(#[case] dx: f64, #[case] dy: f64) {
    let mut session = Session::new();
    let ids = session.neurons(&[(0.0, 0.0), (50.0, 50.0)]);
    session.select(&ids[..1]);
    session.panel.nudge(&mut session.network, dx, dy);

    let amount = session.panel.config().nudge_amount;
    assert_eq!(session.position(ids[0]), (dx * amount, dy * amount));
    assert_eq!(session.position(ids[1]), (50.0, 50.0));
}

#[test]
fn deleted_model_leaves_both_selections() {
    let mut session = Session::new();
    let ids = session.neurons(&[(0.0, 0.0), (40.0, 0.0)]);
    session.select(&ids);
    session.select_source(&ids);

    session.network.delete(ids[0]).unwrap();
    session.pump();

    let panel = &session.panel;
    assert_eq!(panel.selection().selected_models(panel.scene()), vec![ids[1]]);
    assert_eq!(panel.selection().selection().len(), 1);
    assert_eq!(panel.selection().source_selection().len(), 1);
}

#[test]
fn deleting_a_group_clears_its_members_from_the_selection() {
    let mut session = Session::new();
    let group = session
        .network
        .add_neuron_group(NeuronGroupKind::Plain, 3, Point::origin(), None);
    session.pump();
    session.select(&[group]);
    session.panel.select_neurons_in_groups();
    assert_eq!(session.panel.selection().selection().len(), 3);

    session.network.delete(group).unwrap();
    session.pump();
    assert!(session.panel.selection().is_empty());
    assert!(session.panel.scene().is_empty());
}

#[test]
fn duplicate_selects_the_copies() {
    let mut session = Session::new();
    let ids = session.neurons(&[(0.0, 0.0), (40.0, 0.0)]);
    session.network.add_synapse(Synapse::new(ids[0], ids[1])).unwrap();
    session.pump();
    session.select(&ids);

    let copies = session.panel.duplicate(&mut session.network);
    assert_eq!(copies.len(), 3);
    assert_eq!(session.position(copies[0]), (15.0, 15.0));
    let panel = &session.panel;
    assert_eq!(panel.selection().selected_models(panel.scene()), copies);
    session.assert_registry_consistent();
}

#[test]
fn toggle_clamping_twice_is_identity() {
    let mut session = Session::new();
    let ids = session.neurons(&[(0.0, 0.0)]);
    session.select(&ids);
    session.panel.toggle_clamping(&mut session.network);
    assert!(session.network.neuron(ids[0]).unwrap().clamped);
    session.panel.toggle_clamping(&mut session.network);
    assert!(!session.network.neuron(ids[0]).unwrap().clamped);
}

#[test]
fn clear_neurons_resets_every_activation() {
    let mut session = Session::new();
    let ids = session.neurons(&[(0.0, 0.0), (40.0, 0.0)]);
    session.select(&ids);
    session.panel.increment_selected_objects(&mut session.network);
    session.panel.contextual_increment_selected_objects(&mut session.network);
    session.panel.selection_mut().clear();
    session.panel.clear_neurons(&mut session.network);
    for id in ids {
        assert_eq!(session.network.neuron(id).unwrap().activation, 0.0);
    }
}
