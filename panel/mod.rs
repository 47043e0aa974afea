/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The view coordinator.
//!
//! `NetworkPanel` mirrors a `Network` into a `Scene`: it drains the
//! network's structural events, keeps the model registry in step, purges
//! selection of destroyed nodes and schedules camera fits. All state is
//! owned by the UI thread; only the fit timer runs elsewhere.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, error};
use netpanel_network::{ConnectionStrategy, ModelId, ModelKind, Network, NetworkEvent};

use crate::camera::{Camera, FitDue, FitTimer};
use crate::clipboard::Clipboard;
use crate::config::PanelConfig;
use crate::error::PanelError;
use crate::placement::PlacementManager;
use crate::scene::{Scene, VisualKind};
use crate::selection::SelectionManager;
use crate::undo::{UndoManager, UndoableAction};

mod connect_ops;
mod edit_ops;

/// Pointer mode of the panel. Auto-zoom only applies in selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Selection,
    Text,
    Wand,
}

/// Notifications the panel emits about displayed models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// The model's visual node was destroyed after the model left the network.
    ModelDeleted(ModelId),
}

pub struct NetworkPanel {
    config: PanelConfig,
    scene: Scene,
    selection: SelectionManager,
    undo: UndoManager,
    placement: PlacementManager,
    clipboard: Clipboard,
    camera: Camera,
    fit_timer: FitTimer,
    network_events: Receiver<NetworkEvent>,
    subscribers: Vec<Sender<PanelEvent>>,
    edit_mode: EditMode,
    auto_zoom: bool,
    loose_weights_visible: bool,
    connection: ConnectionStrategy,
    time_label: String,
    repaints: u64,
}

impl NetworkPanel {
    /// Attach a panel to `network` and display every model it already holds.
    pub fn new(network: &mut Network, config: PanelConfig) -> Self {
        let network_events = network.subscribe();
        let mut panel = Self {
            scene: Scene::new(),
            selection: SelectionManager::new(),
            undo: UndoManager::new(config.max_undo_steps),
            placement: PlacementManager::new(config.placement_offset(), config.paste_step()),
            clipboard: Clipboard::new(),
            camera: Camera::default(),
            fit_timer: FitTimer::new(config.fit_delay()),
            network_events,
            subscribers: Vec::new(),
            edit_mode: EditMode::default(),
            auto_zoom: config.auto_zoom,
            loose_weights_visible: config.loose_weights_visible,
            connection: ConnectionStrategy::default(),
            time_label: format_time(network.time()),
            repaints: 0,
            config,
        };
        for id in network.all_models_in_deserialization_order() {
            panel.display(network, id, false);
        }
        panel.zoom_to_fit_page();
        panel
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionManager {
        &mut self.selection
    }

    pub fn undo_manager(&self) -> &UndoManager {
        &self.undo
    }

    pub fn placement_mut(&mut self) -> &mut PlacementManager {
        &mut self.placement
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn subscribe(&mut self) -> Receiver<PanelEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Drain pending network events and update the scene. Returns how many
    /// events were handled.
    pub fn pump_network_events(&mut self, network: &mut Network) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.network_events.try_recv() {
            handled += 1;
            match event {
                NetworkEvent::ModelAdded(id) => self.display(network, id, true),
                NetworkEvent::ModelRemoved(id) => self.on_model_removed(id),
                NetworkEvent::TimeDisplayUpdated(time) => self.time_label = format_time(time),
                NetworkEvent::UpdateCompleted => self.repaints += 1,
            }
        }
        handled
    }

    fn display(&mut self, network: &mut Network, id: ModelId, select_neuron: bool) {
        let Some(model) = network.get(id) else {
            debug!("{id} was removed before it could be displayed");
            return;
        };
        let parent_kind = model.parent().and_then(|parent| network.kind_of(parent));
        if parent_kind == Some(ModelKind::SynapseGroup) {
            // drawn by the synapse group
            return;
        }
        let standalone_neuron = model.kind() == ModelKind::Neuron && parent_kind.is_none();

        network.prepare_for_display(id);
        match self.scene.materialize(network, id) {
            Ok(key) => {
                if let Some(node) = self.scene.node_mut(key) {
                    if matches!(node.kind, VisualKind::Synapse { .. }) {
                        node.visible = self.loose_weights_visible;
                    }
                }
                if select_neuron && standalone_neuron {
                    self.selection.set(key);
                }
                self.zoom_to_fit_page();
            },
            Err(PanelError::AlreadyRegistered(id)) => debug!("{id} is already displayed"),
            Err(err) => error!("{err}"),
        }
    }

    fn on_model_removed(&mut self, id: ModelId) {
        if let Some(key) = self.scene.key_for(id) {
            for (removed, _) in self.scene.remove(key) {
                self.selection.purge(removed);
            }
        }
        self.subscribers
            .retain(|subscriber| subscriber.send(PanelEvent::ModelDeleted(id)).is_ok());
        self.zoom_to_fit_page();
    }

    /// Schedule a debounced camera fit. Runs only when auto-zoom is on and
    /// the panel is in selection mode.
    pub fn zoom_to_fit_page(&self) {
        self.fit_timer.request(false);
    }

    /// Schedule a debounced camera fit that runs regardless of mode.
    pub fn zoom_to_fit_page_forced(&self) {
        self.fit_timer.request(true);
    }

    /// Apply fits that came due since the last call. Returns whether the
    /// camera moved.
    pub fn poll_camera_fit(&mut self, network: &Network) -> bool {
        match self.fit_timer.try_due() {
            Some(due) => self.apply_fit(network, due),
            None => false,
        }
    }

    /// Wait up to `timeout` for a scheduled fit and apply it.
    pub fn wait_for_camera_fit(&mut self, network: &Network, timeout: Duration) -> bool {
        match self.fit_timer.wait_due(timeout) {
            Some(due) => self.apply_fit(network, due),
            None => false,
        }
    }

    fn apply_fit(&mut self, network: &Network, due: FitDue) -> bool {
        let allowed = due.force || (self.auto_zoom && self.edit_mode == EditMode::Selection);
        if !allowed {
            return false;
        }
        let Some(bounds) = self.scene.union_bounds(network) else {
            return false;
        };
        let margin = self.config.fit_margin;
        self.camera.set_view_bounds(bounds.inflate(margin, margin));
        true
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, mode: EditMode) {
        self.edit_mode = mode;
    }

    pub fn auto_zoom(&self) -> bool {
        self.auto_zoom
    }

    pub fn set_auto_zoom(&mut self, auto_zoom: bool) {
        self.auto_zoom = auto_zoom;
        self.zoom_to_fit_page();
    }

    pub fn loose_weights_visible(&self) -> bool {
        self.loose_weights_visible
    }

    /// Show or hide every loose synapse node.
    pub fn set_loose_weights_visible(&mut self, visible: bool) {
        self.loose_weights_visible = visible;
        let synapses: Vec<_> = self
            .scene
            .nodes()
            .filter(|(_, node)| matches!(node.kind, VisualKind::Synapse { .. }))
            .map(|(key, _)| key)
            .collect();
        for key in synapses {
            if let Some(node) = self.scene.node_mut(key) {
                node.visible = visible;
            }
        }
    }

    pub fn connection_strategy(&self) -> &ConnectionStrategy {
        &self.connection
    }

    pub fn set_connection_strategy(&mut self, strategy: ConnectionStrategy) {
        self.connection = strategy;
    }

    pub fn time_label(&self) -> &str {
        &self.time_label
    }

    /// Completed network updates seen since the panel was created.
    pub fn repaint_count(&self) -> u64 {
        self.repaints
    }

    /// Revert the latest recorded edit and bring the scene up to date.
    pub fn undo(&mut self, network: &mut Network) -> bool {
        let undone = self.undo.undo(network);
        self.pump_network_events(network);
        undone
    }

    pub fn redo(&mut self, network: &mut Network) -> bool {
        let redone = self.undo.redo(network);
        self.pump_network_events(network);
        redone
    }

    pub(crate) fn record(&mut self, action: UndoableAction) {
        self.undo.add_undoable_action(action);
    }
}

fn format_time(time: f64) -> String {
    format!("Time: {time:.3}")
}
