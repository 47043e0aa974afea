/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::time::Duration;

use anyhow::{Context, Result};
use netpanel::network::{GroupLayout, Network, NeuronArray, NeuronGroupKind, Neuron, Point};
use netpanel::{NetworkPanel, PanelConfig};
use tracing_subscriber::EnvFilter;

mod cli;

fn init_tracing(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(filter) => EnvFilter::try_new(filter)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("cannot install tracing subscriber: {err}"))
}

fn main() -> Result<()> {
    let options = cli::options().run();
    init_tracing(options.log.as_deref())?;

    let config = match &options.config {
        Some(path) => PanelConfig::load(path)?,
        None => PanelConfig::default(),
    };
    let mut network = match &options.load {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            Network::from_json(&json)?
        },
        None => Network::new(),
    };

    let mut panel = NetworkPanel::new(&mut network, config);
    if options.load.is_none() {
        demo_session(&mut panel, &mut network, options.neurons);
    }

    if panel.wait_for_camera_fit(&network, Duration::from_millis(500)) {
        tracing::info!(bounds = ?panel.camera().view_bounds(), "camera fitted");
    }
    if let Some(path) = &options.save {
        std::fs::write(path, network.to_json()?).with_context(|| format!("writing {}", path.display()))?;
    }

    let summary = panel.scene().summary(&network);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Place a row of neurons, wire them into a group, add a pair of arrays
/// joined by a weight matrix, then tidy up and exercise undo.
fn demo_session(panel: &mut NetworkPanel, network: &mut Network, neurons: usize) {
    let row: Vec<_> = (0..neurons)
        .map(|_| panel.place_neuron(network, Neuron::new(Point::origin())))
        .collect();

    let group = network.add_neuron_group(
        NeuronGroupKind::Plain,
        neurons.max(1),
        Point::new(0.0, 150.0),
        Some(GroupLayout::default()),
    );
    panel.pump_network_events(network);

    let row_keys: Vec<_> = row.iter().filter_map(|id| panel.scene().key_for(*id)).collect();
    panel.selection_mut().set_many_source(row_keys.clone());
    if let Some(key) = panel.scene().key_for(group) {
        panel.selection_mut().set(key);
    }
    let synapses = panel.connect_selected_models(network);
    tracing::info!(count = synapses.len(), "connected row to group");

    let input = network.add_neuron_array(NeuronArray::new(Point::new(0.0, 300.0), neurons.max(1)));
    let output = network.add_neuron_array(NeuronArray::new(Point::new(0.0, 400.0), 2));
    panel.pump_network_events(network);
    if let (Some(source), Some(target)) = (panel.scene().key_for(input), panel.scene().key_for(output)) {
        panel.selection_mut().set_source(source);
        panel.selection_mut().set(target);
        panel.connect_with_weight_matrix(network);
    }

    panel.selection_mut().set_many(row_keys);
    panel.nudge(network, 0.0, 5.0);
    panel.align_vertical(network);
    panel.increment_selected_objects(network);
    panel.copy(network);
    panel.paste(network);
    panel.delete_selected_objects(network);
    panel.undo(network);
    panel.selection_mut().clear_source();
}
