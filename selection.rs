/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Selection and source-selection of visual nodes.

use std::collections::HashSet;
use std::ops::Deref;

use crossbeam_channel::{Receiver, Sender, unbounded};
use netpanel_network::{ModelId, ModelKind};

use crate::scene::{Scene, VisualKey, VisualKind};

/// Set of selected visual nodes with insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    nodes: HashSet<VisualKey>,
    order: Vec<VisualKey>,
    revision: u64,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic revision incremented whenever the set changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Members in the order they were selected.
    pub fn ordered(&self) -> &[VisualKey] {
        &self.order
    }

    /// Most recently selected member.
    pub fn primary(&self) -> Option<VisualKey> {
        self.order.last().copied()
    }

    fn bump(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }

    fn insert(&mut self, key: VisualKey) -> bool {
        if !self.nodes.insert(key) {
            return false;
        }
        self.order.push(key);
        self.bump();
        true
    }

    fn remove(&mut self, key: VisualKey) -> bool {
        if !self.nodes.remove(&key) {
            return false;
        }
        self.order.retain(|existing| *existing != key);
        self.bump();
        true
    }

    fn replace(&mut self, keys: impl IntoIterator<Item = VisualKey>) -> bool {
        let mut nodes = HashSet::new();
        let mut order = Vec::new();
        for key in keys {
            if nodes.insert(key) {
                order.push(key);
            }
        }
        if nodes == self.nodes {
            return false;
        }
        self.nodes = nodes;
        self.order = order;
        self.bump();
        true
    }

    fn clear(&mut self) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        self.nodes.clear();
        self.order.clear();
        self.bump();
        true
    }
}

impl Deref for SelectionSet {
    type Target = HashSet<VisualKey>;

    fn deref(&self) -> &Self::Target {
        &self.nodes
    }
}

/// Membership change of one of the two selection sets, with full before and
/// after contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Selection {
        old: HashSet<VisualKey>,
        new: HashSet<VisualKey>,
    },
    SourceSelection {
        old: HashSet<VisualKey>,
        new: HashSet<VisualKey>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Which {
    Selection,
    Source,
}

/// Owner of the selection and source-selection sets.
///
/// Every call that changes membership fires exactly one [`SelectionEvent`];
/// calls that leave membership as it was fire nothing.
#[derive(Debug, Default)]
pub struct SelectionManager {
    selection: SelectionSet,
    source: SelectionSet,
    subscribers: Vec<Sender<SelectionEvent>>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<SelectionEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn source_selection(&self) -> &SelectionSet {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    fn update(&mut self, which: Which, change: impl FnOnce(&mut SelectionSet) -> bool) {
        let set = match which {
            Which::Selection => &mut self.selection,
            Which::Source => &mut self.source,
        };
        let old = set.nodes.clone();
        if !change(set) {
            return;
        }
        let new = set.nodes.clone();
        let event = match which {
            Which::Selection => SelectionEvent::Selection { old, new },
            Which::Source => SelectionEvent::SourceSelection { old, new },
        };
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    /// Make `key` the only selected node.
    pub fn set(&mut self, key: VisualKey) {
        self.update(Which::Selection, |set| set.replace([key]));
    }

    pub fn set_many(&mut self, keys: impl IntoIterator<Item = VisualKey>) {
        self.update(Which::Selection, |set| set.replace(keys));
    }

    pub fn add(&mut self, key: VisualKey) {
        self.update(Which::Selection, |set| set.insert(key));
    }

    pub fn add_many(&mut self, keys: impl IntoIterator<Item = VisualKey>) {
        self.update(Which::Selection, |set| {
            keys.into_iter().fold(false, |changed, key| set.insert(key) || changed)
        });
    }

    pub fn remove(&mut self, key: VisualKey) {
        self.update(Which::Selection, |set| set.remove(key));
    }

    pub fn clear(&mut self) {
        self.update(Which::Selection, SelectionSet::clear);
    }

    pub fn set_source(&mut self, key: VisualKey) {
        self.update(Which::Source, |set| set.replace([key]));
    }

    pub fn set_many_source(&mut self, keys: impl IntoIterator<Item = VisualKey>) {
        self.update(Which::Source, |set| set.replace(keys));
    }

    pub fn add_source(&mut self, key: VisualKey) {
        self.update(Which::Source, |set| set.insert(key));
    }

    pub fn remove_source(&mut self, key: VisualKey) {
        self.update(Which::Source, |set| set.remove(key));
    }

    pub fn clear_source(&mut self) {
        self.update(Which::Source, SelectionSet::clear);
    }

    /// Drop a destroyed node from both sets without notifying anyone.
    pub fn purge(&mut self, key: VisualKey) {
        self.selection.remove(key);
        self.source.remove(key);
    }

    /// Models behind the selected nodes, in selection order.
    pub fn selected_models(&self, scene: &Scene) -> Vec<ModelId> {
        models_of(&self.selection, scene, |_| true)
    }

    /// Selected models of the given kind, in selection order.
    pub fn filter_selected_models(&self, scene: &Scene, kind: ModelKind) -> Vec<ModelId> {
        models_of(&self.selection, scene, |node_kind| node_kind.model_kind() == kind)
    }

    /// Source-selected models of the given kind, in selection order.
    pub fn filter_selected_source_models(&self, scene: &Scene, kind: ModelKind) -> Vec<ModelId> {
        models_of(&self.source, scene, |node_kind| node_kind.model_kind() == kind)
    }

    /// Selected nodes whose visual variant matches `predicate`.
    pub fn filter_selected_nodes(&self, scene: &Scene, predicate: impl Fn(&VisualKind) -> bool) -> Vec<VisualKey> {
        self.selection
            .ordered()
            .iter()
            .copied()
            .filter(|key| scene.node(*key).is_some_and(|node| predicate(&node.kind)))
            .collect()
    }
}

fn models_of(set: &SelectionSet, scene: &Scene, keep: impl Fn(VisualKind) -> bool) -> Vec<ModelId> {
    set.ordered()
        .iter()
        .filter_map(|key| scene.node(*key))
        .filter(|node| keep(node.kind))
        .map(|node| node.model)
        .collect()
}
