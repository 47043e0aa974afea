/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use netpanel::network::{
    GroupLayout, Network, NetworkModel, NeuronArray, NeuronGroupKind, Point, SubnetworkKind, Synapse,
    TextObject,
};

use crate::harness::Session;

fn populated() -> Session {
    let mut session = Session::new();
    let ids = session.neurons(&[(0.0, 0.0), (40.0, 0.0)]);
    session.network.add_synapse(Synapse::new(ids[0], ids[1])).unwrap();
    session.network.add_neuron_group(
        NeuronGroupKind::Plain,
        3,
        Point::new(0.0, 100.0),
        Some(GroupLayout::default()),
    );
    let array = session.network.add_neuron_array(NeuronArray::new(Point::new(0.0, 200.0), 4));
    let other = session.network.add_neuron_array(NeuronArray::new(Point::new(0.0, 300.0), 2));
    session.network.add_weight_matrix(array, other).unwrap();
    session
        .network
        .add_subnetwork(SubnetworkKind::Competitive, Point::new(300.0, 0.0), &[3, 2])
        .unwrap();
    session
        .network
        .add_model(NetworkModel::Text(TextObject::new(Point::new(-50.0, -50.0), "notes")));
    session.pump();
    session
}

#[test]
fn reloaded_network_rebuilds_the_same_scene() {
    let session = populated();
    let before = session.panel.scene().summary(&session.network);
    let json = session.network.to_json().unwrap();

    let reloaded = Session::from_network(Network::from_json(&json).unwrap());
    assert_eq!(reloaded.panel.scene().summary(&reloaded.network), before);
    assert!(reloaded.panel.selection().is_empty());
    reloaded.assert_registry_consistent();
}

#[test]
fn reloaded_network_keeps_allocating_fresh_ids() {
    let session = populated();
    let json = session.network.to_json().unwrap();
    let highest = session.network.models().map(|model| model.id()).max().unwrap();

    let mut reloaded = Session::from_network(Network::from_json(&json).unwrap());
    let fresh = reloaded.neurons(&[(500.0, 500.0)]);
    assert!(fresh[0] > highest);
}
