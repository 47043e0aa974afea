/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use netpanel::network::{ModelId, NeuronGroupKind, Neuron, Point};
use netpanel::{PanelConfig, UndoableAction};

use crate::harness::Session;

#[test]
fn undo_removes_added_node_and_redo_brings_it_back() {
    let mut session = Session::new();
    let id = session.network.add_neuron(Neuron::new(Point::new(5.0, 5.0)));
    session.pump();
    let action = UndoableAction::added(vec![id]);
    let mut undo = netpanel::UndoManager::default();
    undo.add_undoable_action(action);

    assert!(undo.undo(&mut session.network));
    session.pump();
    assert!(!session.network.contains(id));
    assert!(session.panel.scene().key_for(id).is_none());

    assert!(undo.redo(&mut session.network));
    session.pump();
    assert!(session.network.contains(id));
    assert!(session.panel.scene().key_for(id).is_some());
    session.assert_registry_consistent();
}

#[test]
fn undo_with_empty_history_is_a_no_op() {
    let mut session = Session::new();
    let ids = session.neurons(&[(0.0, 0.0)]);
    assert!(!session.panel.undo(&mut session.network));
    assert!(!session.panel.redo(&mut session.network));
    assert!(session.network.contains(ids[0]));
}

#[test]
fn delete_then_undo_restores_the_whole_scene() {
    let mut session = Session::new();
    let ids = session.neurons(&[(0.0, 0.0), (40.0, 0.0), (80.0, 0.0)]);
    session
        .network
        .connect(&Default::default(), &ids[..1], &ids[1..]);
    session.pump();
    let before = session.panel.scene().summary(&session.network);

    session.select(&ids[..2]);
    session.panel.delete_selected_objects(&mut session.network);
    assert_eq!(session.network.len(), 1);

    assert!(session.panel.undo(&mut session.network));
    assert_eq!(session.panel.scene().summary(&session.network), before);
    session.assert_registry_consistent();

    assert!(session.panel.redo(&mut session.network));
    assert_eq!(session.network.len(), 1);
    session.assert_registry_consistent();
}

#[test]
fn history_is_capped_by_config() {
    let config = PanelConfig {
        max_undo_steps: 3,
        ..PanelConfig::default()
    };
    let mut session = Session::with_config(config);
    for _ in 0..5 {
        session.panel.place_neuron(&mut session.network, Neuron::new(Point::origin()));
    }
    assert_eq!(session.panel.undo_manager().undo_len(), 3);
    while session.panel.undo(&mut session.network) {}
    assert_eq!(session.network.len(), 2);
}

fn with_collection(session: &mut Session) -> (Vec<ModelId>, ModelId) {
    let ids = session.neurons(&[(0.0, 0.0), (40.0, 0.0), (80.0, 0.0)]);
    let collection = session.network.add_neuron_collection(ids[..2].to_vec()).unwrap();
    session.pump();
    (ids, collection)
}

#[test]
fn undo_delete_of_member_and_collection_redisplays_both() {
    let mut session = Session::new();
    let (ids, collection) = with_collection(&mut session);
    session.select(&[ids[0], collection]);

    session.panel.delete_selected_objects(&mut session.network);
    assert!(!session.network.contains(collection));
    session.assert_registry_consistent();
    assert_eq!(session.panel.scene().registry_len(), session.network.len());

    assert!(session.panel.undo(&mut session.network));
    assert!(session.panel.scene().key_for(collection).is_some());
    assert_eq!(session.panel.scene().registry_len(), session.network.len());
    session.assert_registry_consistent();
    session.assert_outline_matches(collection);

    assert!(session.panel.redo(&mut session.network));
    assert_eq!(session.panel.scene().registry_len(), session.network.len());
    session.assert_registry_consistent();
}

#[test]
fn undo_delete_of_a_member_restores_the_outline() {
    let mut session = Session::new();
    let (ids, collection) = with_collection(&mut session);
    session.assert_outline_matches(collection);
    session.select(&ids[..1]);

    session.panel.delete_selected_objects(&mut session.network);
    assert_eq!(session.outlined(collection), vec![ids[1]]);
    session.assert_outline_matches(collection);
    session.assert_registry_consistent();

    assert!(session.panel.undo(&mut session.network));
    assert_eq!(session.outlined(collection), ids[..2].to_vec());
    session.assert_outline_matches(collection);
    session.assert_registry_consistent();

    assert!(session.panel.redo(&mut session.network));
    session.assert_outline_matches(collection);
    session.assert_registry_consistent();
}

#[test]
fn undo_delete_of_a_group_member_and_a_loose_neuron() {
    let mut session = Session::new();
    let (ids, _) = with_collection(&mut session);
    let group = session
        .network
        .add_neuron_group(NeuronGroupKind::Plain, 2, Point::new(0.0, 100.0), None);
    session.pump();
    let member = session.network.neurons_of(group)[0];
    session.select(&[member, ids[2]]);

    session.panel.delete_selected_objects(&mut session.network);
    session.assert_registry_consistent();

    assert!(session.panel.undo(&mut session.network));
    let scene = session.panel.scene();
    let member_key = scene.key_for(member).unwrap();
    assert_eq!(scene.container_of(member_key), scene.key_for(group));
    assert_eq!(scene.registry_len(), session.network.len());
    session.assert_registry_consistent();
}
