/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use netpanel::VisualKind;
use netpanel::network::{ConnectionStrategy, ModelKind, NeuronGroupKind, Point};

use crate::harness::Session;

#[test]
fn quick_connect_from_group_members_to_loose_neurons() {
    let mut session = Session::new();
    let group = session
        .network
        .add_neuron_group(NeuronGroupKind::Plain, 2, Point::origin(), None);
    let targets = session.neurons(&[(0.0, 100.0), (50.0, 100.0), (100.0, 100.0)]);
    session.select_source(&[group]);
    session.select(&targets);

    let synapses = session.panel.connect_selected_models(&mut session.network);
    assert_eq!(synapses.len(), 6);
    for id in &synapses {
        let synapse = session.network.synapse(*id).unwrap();
        let key = session.panel.scene().key_for(*id).unwrap();
        let [source, target] = session.keys(&[synapse.source, synapse.target])[..] else {
            panic!("endpoints are displayed");
        };
        assert_eq!(
            session.panel.scene().node(key).unwrap().kind,
            VisualKind::Synapse { source, target }
        );
    }
    session.assert_registry_consistent();
}

#[test]
fn self_connections_follow_the_strategy() {
    let mut session = Session::new();
    let ids = session.neurons(&[(0.0, 0.0), (40.0, 0.0)]);
    session.select_source(&ids);
    session.select(&ids);
    assert_eq!(session.panel.connect_selected_models(&mut session.network).len(), 2);

    session.panel.set_connection_strategy(ConnectionStrategy::AllToAll {
        allow_self_connections: true,
    });
    assert_eq!(session.panel.connect_selected_models(&mut session.network).len(), 4);
}

#[test]
fn synapse_group_hides_its_synapses() {
    let mut session = Session::new();
    let source = session
        .network
        .add_neuron_group(NeuronGroupKind::Plain, 2, Point::origin(), None);
    let target = session
        .network
        .add_neuron_group(NeuronGroupKind::Plain, 2, Point::new(0.0, 100.0), None);
    session.pump();
    let displayed = session.panel.scene().len();
    session.select_source(&[source]);
    session.select(&[target]);

    let added = session.panel.connect_selected_models(&mut session.network);
    assert_eq!(session.network.kind_of(added[0]), Some(ModelKind::SynapseGroup));
    assert_eq!(session.panel.scene().len(), displayed + 1);

    session.network.delete(source).unwrap();
    session.pump();
    assert!(session.panel.scene().key_for(added[0]).is_none());
    session.assert_registry_consistent();
}

#[test]
fn weight_matrix_goes_away_with_its_source() {
    let mut session = Session::new();
    let input = session
        .network
        .add_neuron_group(NeuronGroupKind::Plain, 3, Point::origin(), None);
    let output = session
        .network
        .add_neuron_group(NeuronGroupKind::Plain, 3, Point::new(0.0, 100.0), None);
    session.pump();
    session.select_source(&[input]);
    session.select(&[output]);

    let matrices = session.panel.connect_with_weight_matrix(&mut session.network);
    assert_eq!(matrices.len(), 1);
    let matrix = session.network.weight_matrix(matrices[0]).unwrap();
    assert_eq!(matrix.get(1, 1), Some(1.0));
    assert_eq!(matrix.get(0, 1), Some(0.0));

    session.network.delete(input).unwrap();
    session.pump();
    assert!(!session.network.contains(matrices[0]));
    assert!(session.panel.scene().key_for(matrices[0]).is_none());
}
