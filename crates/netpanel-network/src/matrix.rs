/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Array-valued models: neuron arrays and the weight matrices between them.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Point;
use crate::model::ModelId;

/// A layer of activations stored as one vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuronArray {
    pub id: ModelId,
    #[serde(default)]
    pub parent: Option<ModelId>,
    /// Top-left corner in network space.
    pub position: Point,
    pub activations: Vec<f64>,
    pub increment: f64,
    #[serde(default)]
    pub label: String,
}

impl NeuronArray {
    pub fn new(position: Point, len: usize) -> Self {
        Self {
            id: ModelId::PENDING,
            parent: None,
            position,
            activations: vec![0.0; len],
            increment: 0.1,
            label: String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.activations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activations.is_empty()
    }

    pub fn increment(&mut self) {
        let step = self.increment;
        self.activations.iter_mut().for_each(|a| *a += step);
    }

    pub fn decrement(&mut self) {
        let step = self.increment;
        self.activations.iter_mut().for_each(|a| *a -= step);
    }

    pub fn clear(&mut self) {
        self.activations.iter_mut().for_each(|a| *a = 0.0);
    }
}

/// Dense weights from a source layer (rows) to a target layer (columns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightMatrix {
    pub id: ModelId,
    #[serde(default)]
    pub parent: Option<ModelId>,
    pub source: ModelId,
    pub target: ModelId,
    pub rows: usize,
    pub cols: usize,
    /// Row-major weights, `rows * cols` entries.
    pub weights: Vec<f64>,
    pub increment: f64,
    /// Drawn curved when another matrix runs the opposite way.
    #[serde(default)]
    pub use_curve: bool,
}

impl WeightMatrix {
    /// Zero matrix sized `rows x cols`.
    pub fn new(source: ModelId, target: ModelId, rows: usize, cols: usize) -> Self {
        Self {
            id: ModelId::PENDING,
            parent: None,
            source,
            target,
            rows,
            cols,
            weights: vec![0.0; rows * cols],
            increment: 0.1,
            use_curve: false,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.weights.get(row * self.cols + col).copied()
    }

    pub fn increment(&mut self) {
        let step = self.increment;
        self.weights.iter_mut().for_each(|w| *w += step);
    }

    pub fn decrement(&mut self) {
        let step = self.increment;
        self.weights.iter_mut().for_each(|w| *w -= step);
    }

    pub fn clear(&mut self) {
        self.weights.iter_mut().for_each(|w| *w = 0.0);
    }

    /// Ones on the main diagonal, zeros elsewhere.
    pub fn diagonalize(&mut self) {
        self.clear();
        for i in 0..self.rows.min(self.cols) {
            self.weights[i * self.cols + i] = 1.0;
        }
    }

    /// Uniform random weights in `[-1, 1)`.
    pub fn randomize(&mut self, rng: &mut impl Rng) {
        self.weights
            .iter_mut()
            .for_each(|w| *w = rng.gen_range(-1.0..1.0));
    }

    /// Weighted input each target unit receives from `source_activations`.
    pub fn weighted_inputs(&self, source_activations: &[f64]) -> Vec<f64> {
        (0..self.cols)
            .map(|col| {
                source_activations
                    .iter()
                    .take(self.rows)
                    .enumerate()
                    .map(|(row, a)| a * self.weights[row * self.cols + col])
                    .sum()
            })
            .collect()
    }
}
