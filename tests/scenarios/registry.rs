/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use netpanel::VisualKind;
use netpanel::network::{ModelKind, Network, Neuron, Point, Synapse};

use crate::harness::Session;

#[test]
fn synapse_announced_with_its_endpoints_references_their_nodes() {
    let mut session = Session::new();
    let a = session.network.add_neuron(Neuron::new(Point::origin()));
    let b = session.network.add_neuron(Neuron::new(Point::new(40.0, 0.0)));
    let s = session.network.add_synapse(Synapse::new(a, b)).unwrap();
    session.pump();

    let [ka, kb, ks] = session.keys(&[a, b, s])[..] else {
        panic!("every model is displayed");
    };
    let node = session.panel.scene().node(ks).unwrap();
    assert_eq!(node.kind, VisualKind::Synapse { source: ka, target: kb });
    session.assert_registry_consistent();
}

#[test]
fn synapse_whose_endpoint_is_gone_is_never_displayed() {
    let mut session = Session::new();
    let a = session.network.add_neuron(Neuron::new(Point::origin()));
    let b = session.network.add_neuron(Neuron::new(Point::new(40.0, 0.0)));
    let s = session.network.add_synapse(Synapse::new(a, b)).unwrap();
    session.network.delete(b).unwrap();
    session.pump();

    assert!(session.panel.scene().key_for(s).is_none());
    assert!(session.panel.scene().key_for(b).is_none());
    assert_eq!(session.panel.scene().registry_len(), session.network.len());
    session.assert_registry_consistent();
}

#[test]
fn rebuilt_panel_registers_each_model_once() {
    let mut network = Network::new();
    let a = network.add_neuron(Neuron::new(Point::origin()));
    let b = network.add_neuron(Neuron::new(Point::new(40.0, 0.0)));
    network.add_synapse(Synapse::new(b, a)).unwrap();
    network.add_neuron_collection(vec![a, b]).unwrap();

    // models added before the panel attached are displayed once, not replayed
    let mut session = Session::from_network(network);
    let displayed = session.panel.scene().len();
    assert_eq!(session.panel.pump_network_events(&mut session.network), 0);
    assert_eq!(session.panel.scene().len(), displayed);
    assert_eq!(session.panel.scene().registry_len(), session.network.len());
    session.assert_registry_consistent();
}

#[test]
fn registry_tracks_adds_and_removes() {
    let mut session = Session::new();
    let ids = session.neurons(&[(0.0, 0.0), (40.0, 0.0), (80.0, 0.0)]);
    session.network.connect(&Default::default(), &ids, &ids);
    session.pump();
    assert_eq!(session.panel.scene().registry_len(), session.network.len());
    assert_eq!(session.network.ids_of_kind(ModelKind::Synapse).len(), 6);

    session.network.delete(ids[1]).unwrap();
    session.pump();
    assert_eq!(session.panel.scene().registry_len(), session.network.len());
    session.assert_registry_consistent();
}
