/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use serde::{Deserialize, Serialize};

use crate::model::ModelId;

/// Weighted connection between two neurons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synapse {
    pub id: ModelId,
    #[serde(default)]
    pub parent: Option<ModelId>,
    pub source: ModelId,
    pub target: ModelId,
    pub strength: f64,
    pub increment: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
    /// Frozen synapses ignore bounded strength changes.
    #[serde(default)]
    pub frozen: bool,
}

impl Synapse {
    pub fn new(source: ModelId, target: ModelId) -> Self {
        Self {
            id: ModelId::PENDING,
            parent: None,
            source,
            target,
            strength: 1.0,
            increment: 1.0,
            upper_bound: 10.0,
            lower_bound: -10.0,
            frozen: false,
        }
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub fn increment_weight(&mut self) {
        if self.strength < self.upper_bound {
            self.strength = (self.strength + self.increment).min(self.upper_bound);
        }
    }

    pub fn decrement_weight(&mut self) {
        if self.strength > self.lower_bound {
            self.strength = (self.strength - self.increment).max(self.lower_bound);
        }
    }

    /// Set strength within bounds. No effect on frozen synapses.
    pub fn set_strength(&mut self, strength: f64) {
        if self.frozen {
            return;
        }
        self.strength = strength.clamp(self.lower_bound, self.upper_bound);
    }

    /// Set strength ignoring bounds and the frozen flag.
    pub fn force_set_strength(&mut self, strength: f64) {
        self.strength = strength;
    }

    pub fn toggle_frozen(&mut self) {
        self.frozen = !self.frozen;
    }
}
