/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Undo/redo history of structural edits.

use log::{debug, warn};
use netpanel_network::{ModelId, Network, NetworkError, RemovedModels};

/// Default history depth.
pub const MAX_UNDO_STEPS: usize = 128;

/// One recorded edit, with what is needed to replay either side of it.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoableAction {
    /// Models were added. Undo deletes them, redo restores them.
    AddModels {
        ids: Vec<ModelId>,
        removed: RemovedModels,
    },
    /// Models were deleted. Undo restores them, redo deletes them again.
    DeleteModels {
        ids: Vec<ModelId>,
        removed: RemovedModels,
    },
}

impl UndoableAction {
    pub fn added(ids: Vec<ModelId>) -> Self {
        UndoableAction::AddModels {
            ids,
            removed: RemovedModels::default(),
        }
    }

    pub fn deleted(ids: Vec<ModelId>, removed: RemovedModels) -> Self {
        UndoableAction::DeleteModels { ids, removed }
    }

    pub fn ids(&self) -> &[ModelId] {
        match self {
            UndoableAction::AddModels { ids, .. } | UndoableAction::DeleteModels { ids, .. } => ids,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Undo,
    Redo,
}

/// Delete `ids` (skipping those already gone) and stash what came out.
fn take_out(network: &mut Network, ids: &[ModelId], stash: &mut RemovedModels) -> Result<(), NetworkError> {
    for id in ids {
        if !network.contains(*id) {
            debug!("{id} already removed");
            continue;
        }
        stash.extend(network.delete(*id)?);
    }
    Ok(())
}

fn put_back(network: &mut Network, stash: &mut RemovedModels) -> Result<(), NetworkError> {
    network.restore(std::mem::take(stash))?;
    Ok(())
}

/// Central replay dispatcher for both directions of every action kind.
fn replay(action: &mut UndoableAction, direction: Direction, network: &mut Network) -> Result<(), NetworkError> {
    match (action, direction) {
        (UndoableAction::AddModels { ids, removed }, Direction::Undo)
        | (UndoableAction::DeleteModels { ids, removed }, Direction::Redo) => take_out(network, ids, removed),
        (UndoableAction::AddModels { removed, .. }, Direction::Redo)
        | (UndoableAction::DeleteModels { removed, .. }, Direction::Undo) => put_back(network, removed),
    }
}

/// Bounded undo and redo stacks.
#[derive(Debug)]
pub struct UndoManager {
    undo_stack: Vec<UndoableAction>,
    redo_stack: Vec<UndoableAction>,
    max_steps: usize,
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new(MAX_UNDO_STEPS)
    }
}

impl UndoManager {
    pub fn new(max_steps: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_steps: max_steps.max(1),
        }
    }

    /// Record a performed edit. Clears the redo history and drops the oldest
    /// entries beyond the history depth.
    pub fn add_undoable_action(&mut self, action: UndoableAction) {
        self.undo_stack.push(action);
        self.redo_stack.clear();
        if self.undo_stack.len() > self.max_steps {
            let excess = self.undo_stack.len() - self.max_steps;
            self.undo_stack.drain(0..excess);
        }
    }

    /// Revert the latest edit. Returns `false` when there was nothing to undo
    /// or the replay failed.
    pub fn undo(&mut self, network: &mut Network) -> bool {
        let Some(mut action) = self.undo_stack.pop() else {
            return false;
        };
        if let Err(err) = replay(&mut action, Direction::Undo, network) {
            warn!("undo of {:?} failed: {err}", action.ids());
            return false;
        }
        self.redo_stack.push(action);
        true
    }

    /// Re-apply the latest undone edit.
    pub fn redo(&mut self, network: &mut Network) -> bool {
        let Some(mut action) = self.redo_stack.pop() else {
            return false;
        };
        if let Err(err) = replay(&mut action, Direction::Redo, network) {
            warn!("redo of {:?} failed: {err}", action.ids());
            return false;
        }
        self.undo_stack.push(action);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
